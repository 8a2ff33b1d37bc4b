use crate::{Author, Time, STUB_ID};

#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PostId(pub String);

impl PostId {
    pub fn stub() -> PostId {
        PostId(String::from(STUB_ID))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,

    pub user: Author,

    #[serde(rename = "createdAt")]
    pub created_at: Time,

    pub title: String,
    pub text: String,
}
