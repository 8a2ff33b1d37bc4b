use crate::api::{Comment, CommentId, NewComment, PostId, UpdateComment};
use crate::{ApiError, Epoch, Resource};

/// In-flight deletion, remembering the optimistically removed comment
///
/// Returned by [`CommentFeed::begin_delete`]; hand it back to
/// [`CommentFeed::finish_delete`] together with the server's answer.
#[derive(Debug)]
pub struct DeleteOp {
    comment: Comment,
}

impl DeleteOp {
    /// The comment that was removed from the displayed list
    pub fn comment(&self) -> &Comment {
        &self.comment
    }
}

/// In-flight edit, carrying the request body and the pre-edit comment
#[derive(Debug)]
pub struct EditOp {
    request: UpdateComment,
    original: Comment,
}

impl EditOp {
    /// Body of the PUT request the caller must issue
    pub fn request(&self) -> &UpdateComment {
        &self.request
    }
}

/// View model for one post's comment section
///
/// Owns the fetched comment list, the draft text shared between add and
/// edit modes, the edit cursor, and one error slot per mutation kind (the
/// fetch error lives in the resource itself). Every operation is split into
/// a synchronous `begin_*` that applies the optimistic change and returns
/// what to send, and a synchronous `finish_*` that reconciles with the
/// server's answer; the caller owns the await in between, and other
/// handlers may run against this same feed while a request is in flight.
#[derive(Debug)]
pub struct CommentFeed {
    post: PostId,
    comments: Resource<Vec<Comment>>,
    draft: String,
    editing: Option<CommentId>,
    add_error: Option<ApiError>,
    edit_error: Option<ApiError>,
    delete_error: Option<ApiError>,
}

impl CommentFeed {
    pub fn new(post: PostId) -> CommentFeed {
        CommentFeed {
            post,
            comments: Resource::new(),
            draft: String::new(),
            editing: None,
            add_error: None,
            edit_error: None,
            delete_error: None,
        }
    }

    pub fn post(&self) -> &PostId {
        &self.post
    }

    pub fn comments(&self) -> &Resource<Vec<Comment>> {
        &self.comments
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: String) {
        self.draft = text;
    }

    /// Comment currently in edit mode, if any
    pub fn editing(&self) -> Option<&CommentId> {
        self.editing.as_ref()
    }

    pub fn add_error(&self) -> Option<&ApiError> {
        self.add_error.as_ref()
    }

    pub fn edit_error(&self) -> Option<&ApiError> {
        self.edit_error.as_ref()
    }

    pub fn delete_error(&self) -> Option<&ApiError> {
        self.delete_error.as_ref()
    }

    /// Rebinds the feed to another post, dropping every per-post state
    ///
    /// The list goes back to pending within the same generation counter, so
    /// an answer still in flight for the previous post cannot land.
    pub fn rebind(&mut self, post: PostId) {
        self.post = post;
        self.draft.clear();
        self.editing = None;
        self.add_error = None;
        self.edit_error = None;
        self.delete_error = None;
        self.comments.restart();
    }

    /// Opens a new fetch generation for the comment list
    ///
    /// Called on mount and again whenever the identity behind the list (the
    /// auth token) changes. The returned epoch must accompany the outcome.
    pub fn begin_fetch(&mut self) -> Epoch {
        self.comments.restart()
    }

    /// Applies a fetch outcome; stale generations are dropped
    pub fn finish_fetch(&mut self, epoch: Epoch, outcome: Result<Vec<Comment>, ApiError>) -> bool {
        self.comments.resolve(epoch, outcome)
    }

    /// Starts adding the draft as a new comment
    ///
    /// Returns the body to POST, or `None` while an edit is active (the add
    /// action is not offered then). There is no optimistic insert: the
    /// comment appears only once the server confirms it, and the draft
    /// stays in place until the request settles.
    pub fn begin_add(&self) -> Option<NewComment> {
        if self.editing.is_some() {
            return None;
        }
        Some(NewComment {
            post: self.post.clone(),
            text: self.draft.clone(),
        })
    }

    /// Reconciles an add: appends the confirmed comment on success, records
    /// the error on failure, and clears the draft either way
    ///
    /// The attempted text is not restored into the draft on failure.
    pub fn finish_add(&mut self, outcome: Result<Comment, ApiError>) {
        match outcome {
            Ok(comment) => {
                match self.comments.value_mut() {
                    Some(list) => list.push(comment),
                    // the list had not resolved yet: show the confirmed
                    // comment on its own
                    None => self.comments.insert(vec![comment]),
                }
                self.add_error = None;
            }
            Err(err) => self.add_error = Some(err),
        }
        self.draft.clear();
    }

    /// Optimistically removes the comment, before any request is sent
    ///
    /// Returns `None` when the list is not loaded or the id is unknown; no
    /// request should be issued then.
    pub fn begin_delete(&mut self, comment: &CommentId) -> Option<DeleteOp> {
        let list = self.comments.value_mut()?;
        let at = list.iter().position(|c| c.id == *comment)?;
        Some(DeleteOp {
            comment: list.remove(at),
        })
    }

    /// Reconciles a deletion; on failure the removed comment is put back at
    /// the tail of the list, not at its original position
    pub fn finish_delete(&mut self, op: DeleteOp, outcome: Result<(), ApiError>) {
        match outcome {
            Ok(()) => self.delete_error = None,
            Err(err) => {
                tracing::debug!(comment = ?op.comment.id, "delete failed, restoring comment");
                match self.comments.value_mut() {
                    Some(list) => list.push(op.comment),
                    None => self.comments.insert(vec![op.comment]),
                }
                self.delete_error = Some(err);
            }
        }
    }

    /// Puts the given comment in edit mode, loading its text into the draft
    ///
    /// Focusing the input is the caller's job. Switching to another comment
    /// while an edit is active retargets the cursor and reloads the draft;
    /// whatever was typed for the previous target is discarded.
    pub fn begin_edit(&mut self, comment: &CommentId) -> bool {
        let text = match self.find(comment) {
            Some(target) => target.text.clone(),
            None => return false,
        };
        self.draft = text;
        self.editing = Some(comment.clone());
        true
    }

    /// Leaves edit mode without saving, emptying the draft
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.draft.clear();
    }

    /// Optimistically rewrites the edited comment's text to the draft
    ///
    /// Returns the request to issue, or `None` when no edit is active or
    /// the edited comment is no longer in the list (it was deleted in the
    /// meantime); in the latter case the edit state is dropped and no
    /// request should be issued.
    pub fn begin_save(&mut self) -> Option<EditOp> {
        let id = self.editing.clone()?;
        let target = self
            .comments
            .value_mut()
            .and_then(|list| list.iter_mut().find(|c| c.id == id));
        let target = match target {
            Some(target) => target,
            None => {
                self.editing = None;
                self.draft.clear();
                return None;
            }
        };
        let original = target.clone();
        target.text = self.draft.clone();
        Some(EditOp {
            request: UpdateComment {
                comment: id,
                text: self.draft.clone(),
                post: self.post.clone(),
            },
            original,
        })
    }

    /// Reconciles a save; on failure the pre-edit comment is restored at
    /// its original position. The edit cursor and the draft are cleared
    /// either way.
    ///
    /// On success the server's echo is not re-applied: the optimistic text
    /// is already in place.
    pub fn finish_save(&mut self, op: EditOp, outcome: Result<(), ApiError>) {
        match outcome {
            Ok(()) => self.edit_error = None,
            Err(err) => {
                tracing::debug!(comment = ?op.original.id, "edit failed, restoring comment");
                if let Some(list) = self.comments.value_mut() {
                    if let Some(at) = list.iter().position(|c| c.id == op.original.id) {
                        list[at] = op.original;
                    }
                }
                self.edit_error = Some(err);
            }
        }
        self.editing = None;
        self.draft.clear();
    }

    fn find(&self, comment: &CommentId) -> Option<&Comment> {
        self.comments
            .value()
            .and_then(|list| list.iter().find(|c| c.id == *comment))
    }
}
