use std::rc::Rc;

use yew::prelude::*;
use yomu_client::api::{AuthToken, Comment, CommentId, PostId};
use yomu_client::{ApiClient, ApiError, CommentFeed, DeleteOp, EditOp, Epoch, ResourceState};

use crate::util;

#[derive(Clone, PartialEq, Properties)]
pub struct CommentsProps {
    pub client: Rc<ApiClient>,
    pub token: AuthToken,
    pub post: PostId,
}

pub enum CommentsMsg {
    Fetched(Epoch, Result<Vec<Comment>, ApiError>),
    DraftChanged(String),
    AddClicked,
    Added(Result<Comment, ApiError>),
    DeleteClicked(CommentId),
    Deleted(DeleteOp, Result<(), ApiError>),
    EditClicked(CommentId),
    CancelClicked,
    SaveClicked,
    Saved(EditOp, Result<(), ApiError>),
}

/// The comment section of one post: the list, and the shared input that
/// either adds a new comment or rewrites the one being edited.
pub struct Comments {
    feed: CommentFeed,
    input: NodeRef,
}

impl Comments {
    fn fetch(&mut self, ctx: &Context<Self>) {
        let epoch = self.feed.begin_fetch();
        let client = ctx.props().client.clone();
        let token = ctx.props().token.clone();
        let post = self.feed.post().clone();
        ctx.link().send_future(async move {
            CommentsMsg::Fetched(epoch, client.comments(Some(&token), &post).await)
        });
    }

    fn focus_input(&self) {
        self.input
            .cast::<web_sys::HtmlInputElement>()
            .expect("comment input is not mounted")
            .focus()
            .expect("failed focusing the comment input");
    }

    fn view_comment(&self, ctx: &Context<Self>, comment: &Comment) -> Html {
        let delete = {
            let id = comment.id.clone();
            ctx.link()
                .callback(move |_| CommentsMsg::DeleteClicked(id.clone()))
        };
        let edit = {
            let id = comment.id.clone();
            ctx.link()
                .callback(move |_| CommentsMsg::EditClicked(id.clone()))
        };
        html! {
            <div key={comment.id.0.clone()} class="comment">
                <p>{ &comment.user.username }</p>
                <p>{ util::format_date(&comment.created_at) }</p>
                <p>{ &comment.text }</p>
                <button type="button" onclick={delete}>{ "Delete" }</button>
                <button type="button" onclick={edit}>{ "Edit" }</button>
            </div>
        }
    }
}

impl Component for Comments {
    type Message = CommentsMsg;
    type Properties = CommentsProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut this = Comments {
            feed: CommentFeed::new(ctx.props().post.clone()),
            input: NodeRef::default(),
        };
        this.fetch(ctx);
        this
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &CommentsProps) -> bool {
        if ctx.props().post != old_props.post {
            // Another post entirely: its draft and edit state do not carry over
            self.feed.rebind(ctx.props().post.clone());
        }
        self.fetch(ctx);
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: CommentsMsg) -> bool {
        match msg {
            CommentsMsg::Fetched(epoch, outcome) => self.feed.finish_fetch(epoch, outcome),
            CommentsMsg::DraftChanged(text) => {
                self.feed.set_draft(text);
                true
            }
            CommentsMsg::AddClicked => match self.feed.begin_add() {
                None => false,
                Some(body) => {
                    let client = ctx.props().client.clone();
                    let token = ctx.props().token.clone();
                    ctx.link().send_future(async move {
                        CommentsMsg::Added(client.add_comment(Some(&token), &body).await)
                    });
                    false
                }
            },
            CommentsMsg::Added(outcome) => {
                self.feed.finish_add(outcome);
                true
            }
            CommentsMsg::DeleteClicked(id) => match self.feed.begin_delete(&id) {
                None => false,
                Some(op) => {
                    let client = ctx.props().client.clone();
                    let token = ctx.props().token.clone();
                    let post = self.feed.post().clone();
                    ctx.link().send_future(async move {
                        let outcome = client
                            .delete_comment(Some(&token), &post, &op.comment().id)
                            .await;
                        CommentsMsg::Deleted(op, outcome)
                    });
                    true
                }
            },
            CommentsMsg::Deleted(op, outcome) => {
                self.feed.finish_delete(op, outcome);
                true
            }
            CommentsMsg::EditClicked(id) => {
                if !self.feed.begin_edit(&id) {
                    return false;
                }
                self.focus_input();
                true
            }
            CommentsMsg::CancelClicked => {
                self.feed.cancel_edit();
                true
            }
            CommentsMsg::SaveClicked => match self.feed.begin_save() {
                // The edited comment is gone; the edit state was dropped
                None => true,
                Some(op) => {
                    let client = ctx.props().client.clone();
                    let token = ctx.props().token.clone();
                    ctx.link().send_future(async move {
                        let outcome = client.update_comment(Some(&token), op.request()).await;
                        CommentsMsg::Saved(op, outcome)
                    });
                    true
                }
            },
            CommentsMsg::Saved(op, outcome) => {
                self.feed.finish_save(op, outcome);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let comments = match self.feed.comments().state() {
            ResourceState::Loaded(comments) => comments
                .iter()
                .map(|comment| self.view_comment(ctx, comment))
                .collect::<Html>(),
            ResourceState::Pending => html! { <p>{ "🔄 loading the comments..." }</p> },
            ResourceState::Failed(_) => html! { <p>{ "⚠️ No comments yet" }</p> },
        };
        let buttons = match self.feed.editing() {
            Some(_) => html! {<>
                <button type="button" onclick={ctx.link().callback(|_| CommentsMsg::SaveClicked)}>
                    { "Save" }
                </button>
                <button type="button" onclick={ctx.link().callback(|_| CommentsMsg::CancelClicked)}>
                    { "Cancel" }
                </button>
            </>},
            None => html! {
                <button type="button" onclick={ctx.link().callback(|_| CommentsMsg::AddClicked)}>
                    { "Add" }
                </button>
            },
        };
        html! {
            <div class="comments">
                { comments }
                <input
                    type="text"
                    ref={self.input.clone()}
                    value={self.feed.draft().to_string()}
                    oninput={ctx.link().callback(|e: InputEvent| {
                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                        CommentsMsg::DraftChanged(input.value())
                    })}
                />
                { buttons }
            </div>
        }
    }
}
