use crate::{Author, PostId, Time, STUB_ID};

#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(String::from(STUB_ID))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: CommentId,

    pub user: Author,

    #[serde(rename = "createdAt")]
    pub created_at: Time,

    pub text: String,

    /// Id of the post this comment belongs to
    pub post: PostId,
}

/// Body for `POST /v1/posts/{post}/comments`
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    #[serde(rename = "postId")]
    pub post: PostId,

    pub text: String,
}

/// Body for `PUT /v1/posts/{post}/comments/{comment}`
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UpdateComment {
    #[serde(rename = "commentId")]
    pub comment: CommentId,

    pub text: String,
    pub post: PostId,
}
