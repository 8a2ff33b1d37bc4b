#![cfg(test)]

use crate::api::{Author, Comment, CommentId, PostId};
use crate::{ApiError, CommentFeed, Epoch};
use reqwest::StatusCode;

/// One user or network event against a comment feed
///
/// `target` fields pick among whatever is eligible at that point (displayed
/// comments, outstanding fetches) by reduction modulo the eligible count.
#[derive(Clone, Debug, bolero::generator::TypeGenerator)]
enum FuzzOp {
    SetDraft(String),
    Add { fail: bool },
    Delete { target: usize, fail: bool },
    Edit { target: usize },
    CancelEdit,
    Save { fail: bool },
    BeginFetch,
    SettleFetch { target: usize, fail: bool },
}

fn err() -> ApiError {
    ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Canonical comment store the fuzzed feed is talking to
#[derive(Default)]
struct FakeServer {
    comments: Vec<Comment>,
    minted: u64,
}

impl FakeServer {
    fn mint(&mut self, text: String) -> Comment {
        self.minted += 1;
        Comment {
            id: CommentId(format!("comment-{}", self.minted)),
            user: Author {
                username: String::from("fuzzer"),
            },
            created_at: "2023-01-25T10:03:12.084Z"
                .parse()
                .expect("parsing test timestamp"),
            text,
            post: PostId::stub(),
        }
    }
}

/// Flat restatement of what the feed must be displaying
#[derive(Default)]
struct Model {
    comments: Option<Vec<Comment>>,
    draft: String,
    editing: Option<CommentId>,
}

impl Model {
    fn pick(&self, target: usize) -> Option<CommentId> {
        let list = self.comments.as_ref()?;
        if list.is_empty() {
            return None;
        }
        Some(list[target % list.len()].id.clone())
    }

    fn find_mut(&mut self, id: &CommentId) -> Option<&mut Comment> {
        self.comments.as_mut()?.iter_mut().find(|c| c.id == *id)
    }
}

struct Fuzzer {
    feed: CommentFeed,
    server: FakeServer,
    model: Model,
    inflight: Vec<Epoch>,
    latest: Option<Epoch>,
}

impl Fuzzer {
    fn new() -> Fuzzer {
        Fuzzer {
            feed: CommentFeed::new(PostId::stub()),
            server: FakeServer::default(),
            model: Model::default(),
            inflight: Vec::new(),
            latest: None,
        }
    }

    fn execute(&mut self, op: FuzzOp) {
        match op {
            FuzzOp::SetDraft(text) => {
                self.feed.set_draft(text.clone());
                self.model.draft = text;
            }
            FuzzOp::Add { fail } => match self.feed.begin_add() {
                None => assert!(
                    self.model.editing.is_some(),
                    "add refused outside of edit mode"
                ),
                Some(body) => {
                    assert!(self.model.editing.is_none(), "add offered in edit mode");
                    assert_eq!(body.text, self.model.draft);
                    if fail {
                        self.feed.finish_add(Err(err()));
                    } else {
                        let confirmed = self.server.mint(body.text);
                        self.server.comments.push(confirmed.clone());
                        self.feed.finish_add(Ok(confirmed.clone()));
                        match &mut self.model.comments {
                            Some(list) => list.push(confirmed),
                            None => self.model.comments = Some(vec![confirmed]),
                        }
                    }
                    self.model.draft.clear();
                }
            },
            FuzzOp::Delete { target, fail } => match self.model.pick(target) {
                None => {
                    // nothing is displayed: no deletion can start
                    assert!(self.feed.begin_delete(&CommentId::stub()).is_none());
                }
                Some(id) => {
                    let op = self
                        .feed
                        .begin_delete(&id)
                        .expect("deleting a displayed comment");
                    let list = self.model.comments.as_mut().expect("picked from the list");
                    let at = list
                        .iter()
                        .position(|c| c.id == id)
                        .expect("picked from the list");
                    let removed = list.remove(at);
                    if fail {
                        self.feed.finish_delete(op, Err(err()));
                        self.model
                            .comments
                            .as_mut()
                            .expect("list stays loaded")
                            .push(removed);
                    } else {
                        self.feed.finish_delete(op, Ok(()));
                        self.server.comments.retain(|c| c.id != id);
                    }
                }
            },
            FuzzOp::Edit { target } => match self.model.pick(target) {
                None => assert!(!self.feed.begin_edit(&CommentId::stub())),
                Some(id) => {
                    assert!(self.feed.begin_edit(&id));
                    let text = self
                        .model
                        .find_mut(&id)
                        .expect("picked from the list")
                        .text
                        .clone();
                    self.model.draft = text;
                    self.model.editing = Some(id);
                }
            },
            FuzzOp::CancelEdit => {
                self.feed.cancel_edit();
                self.model.editing = None;
                self.model.draft.clear();
            }
            FuzzOp::Save { fail } => {
                let op = self.feed.begin_save();
                let editing = self.model.editing.clone();
                match (editing, op) {
                    (None, op) => assert!(op.is_none(), "save without an edit cursor"),
                    (Some(id), None) => {
                        // target vanished: the edit must have been dropped
                        assert!(
                            self.model.find_mut(&id).is_none(),
                            "save refused although the comment is displayed"
                        );
                        self.model.editing = None;
                        self.model.draft.clear();
                    }
                    (Some(id), Some(op)) => {
                        let draft = self.model.draft.clone();
                        assert_eq!(op.request().text, draft);
                        let target = self.model.find_mut(&id).expect("a displayed comment");
                        let original = target.clone();
                        target.text = draft.clone();
                        if fail {
                            self.feed.finish_save(op, Err(err()));
                            *self.model.find_mut(&id).expect("still displayed") = original;
                        } else {
                            self.feed.finish_save(op, Ok(()));
                            if let Some(c) = self.server.comments.iter_mut().find(|c| c.id == id)
                            {
                                c.text = draft;
                            }
                        }
                        self.model.editing = None;
                        self.model.draft.clear();
                    }
                }
            }
            FuzzOp::BeginFetch => {
                let epoch = self.feed.begin_fetch();
                self.inflight.push(epoch);
                self.latest = Some(epoch);
                self.model.comments = None;
            }
            FuzzOp::SettleFetch { target, fail } => {
                if !self.inflight.is_empty() {
                    let epoch = self.inflight.remove(target % self.inflight.len());
                    let outcome = if fail {
                        Err(err())
                    } else {
                        Ok(self.server.comments.clone())
                    };
                    let applied = self.feed.finish_fetch(epoch, outcome);
                    assert_eq!(
                        applied,
                        self.latest == Some(epoch),
                        "only the newest generation may land"
                    );
                    if applied {
                        self.model.comments = match fail {
                            true => None,
                            false => Some(self.server.comments.clone()),
                        };
                    }
                }
            }
        }
        self.check();
    }

    fn check(&self) {
        assert_eq!(self.feed.comments().value(), self.model.comments.as_ref());
        assert_eq!(self.feed.draft(), self.model.draft);
        assert_eq!(self.feed.editing(), self.model.editing.as_ref());
    }
}

#[test]
fn compare_with_model() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt::init();
    }
    bolero::check!()
        .with_generator(bolero::generator::gen_with::<Vec<FuzzOp>>().len(1..100usize))
        .cloned()
        .for_each(|ops| {
            let mut fuzzer = Fuzzer::new();
            for op in ops {
                fuzzer.execute(op);
            }
        })
}
