use crate::api::{
    AuthToken, Comment, CommentId, Credentials, NewComment, NewUser, Post, PostId, SessionToken,
    SignupOutcome, SignupReply, UpdateComment,
};
use crate::ApiError;

/// Base URL of the production deployment
pub const DEFAULT_HOST: &str = "https://blog-restful-api.adaptable.app";

/// HTTP client for the blog API
///
/// Every method takes the token explicitly; `Authorization: Bearer` is
/// attached exactly when one is given. A status of 400 or above is an error
/// without looking at the body.
#[derive(Clone, Debug)]
pub struct ApiClient {
    host: String,
    client: reqwest::Client,
}

/// Two clients are the same iff they target the same host
impl PartialEq for ApiClient {
    fn eq(&self, other: &ApiClient) -> bool {
        self.host == other.host
    }
}

impl Eq for ApiClient {}

impl ApiClient {
    pub fn new(host: impl Into<String>) -> ApiClient {
        ApiClient {
            host: host.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1{}", self.host, path)
    }

    async fn send(
        req: reqwest::RequestBuilder,
        token: Option<&AuthToken>,
    ) -> Result<reqwest::Response, ApiError> {
        let req = match token {
            Some(token) => req.bearer_auth(&token.0),
            None => req,
        };
        let resp = req.send().await?;
        if resp.status().as_u16() >= 400 {
            tracing::debug!(status = %resp.status(), url = %resp.url(), "request refused");
            return Err(ApiError::Status(resp.status()));
        }
        Ok(resp)
    }

    async fn fetch<R>(
        req: reqwest::RequestBuilder,
        token: Option<&AuthToken>,
    ) -> Result<R, ApiError>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        Ok(Self::send(req, token).await?.json().await?)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, ApiError> {
        let session: SessionToken = Self::fetch(
            self.client.post(self.url("/login")).json(credentials),
            None,
        )
        .await?;
        Ok(session.token)
    }

    pub async fn signup(&self, user: &NewUser) -> Result<SignupOutcome, ApiError> {
        let reply: SignupReply =
            Self::fetch(self.client.post(self.url("/users")).json(user), None).await?;
        Ok(reply.into_outcome())
    }

    pub async fn posts(&self, token: Option<&AuthToken>) -> Result<Vec<Post>, ApiError> {
        Self::fetch(self.client.get(self.url("/posts")), token).await
    }

    pub async fn post(&self, token: Option<&AuthToken>, post: &PostId) -> Result<Post, ApiError> {
        Self::fetch(self.client.get(self.url(&format!("/posts/{}", post.0))), token).await
    }

    pub async fn comments(
        &self,
        token: Option<&AuthToken>,
        post: &PostId,
    ) -> Result<Vec<Comment>, ApiError> {
        Self::fetch(
            self.client.get(self.url(&format!("/posts/{}/comments", post.0))),
            token,
        )
        .await
    }

    pub async fn add_comment(
        &self,
        token: Option<&AuthToken>,
        new: &NewComment,
    ) -> Result<Comment, ApiError> {
        Self::fetch(
            self.client
                .post(self.url(&format!("/posts/{}/comments", new.post.0)))
                .json(new),
            token,
        )
        .await
    }

    /// The response body is ignored; only the status matters
    pub async fn update_comment(
        &self,
        token: Option<&AuthToken>,
        update: &UpdateComment,
    ) -> Result<(), ApiError> {
        Self::send(
            self.client
                .put(self.url(&format!(
                    "/posts/{}/comments/{}",
                    update.post.0, update.comment.0
                )))
                .json(update),
            token,
        )
        .await?;
        Ok(())
    }

    pub async fn delete_comment(
        &self,
        token: Option<&AuthToken>,
        post: &PostId,
        comment: &CommentId,
    ) -> Result<(), ApiError> {
        Self::send(
            self.client
                .delete(self.url(&format!("/posts/{}/comments/{}", post.0, comment.0))),
            token,
        )
        .await?;
        Ok(())
    }
}
