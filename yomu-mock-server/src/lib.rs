use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    routing::{get, post, put},
    Json, Router,
};
use http::{request, StatusCode};
use yomu_api::{
    Author, AuthToken, Comment, CommentId, Credentials, NewComment, NewUser, Post, PostId,
    SessionToken, SignupReply, UpdateComment, ValidationIssue,
};

/// Route a planned failure can be pinned on
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Endpoint {
    Login,
    Signup,
    Posts,
    Post,
    Comments,
    AddComment,
    UpdateComment,
    DeleteComment,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("permission denied")]
    PermissionDenied,

    #[error("not the author of this {0}")]
    Forbidden(&'static str),

    #[error("no such {0}")]
    NotFound(&'static str),

    #[error("planned failure with status {0}")]
    Planned(StatusCode),
}

impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            Error::PermissionDenied => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Planned(status) => status,
        };
        tracing::info!("returning error to client: {self}");
        (status, self.to_string()).into_response()
    }
}

#[derive(Debug)]
struct DbUser {
    username: String,
    password: String,
}

#[derive(Debug, Default)]
struct ServerState {
    users: Vec<DbUser>,
    sessions: HashMap<AuthToken, String>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    planned_failures: HashMap<Endpoint, StatusCode>,
    last_authorization: Option<bool>,
}

/// In-memory stand-in for the deployed blog API
///
/// Cloning hands out another handle onto the same state, so tests can keep
/// one for introspection while the router owns another.
#[derive(Clone, Debug, Default)]
pub struct MockServer(Arc<Mutex<ServerState>>);

impl MockServer {
    pub fn new() -> MockServer {
        MockServer::default()
    }

    fn state(&self) -> MutexGuard<'_, ServerState> {
        self.0.lock().expect("state lock poisoned")
    }

    fn take_planned(&self, endpoint: Endpoint) -> Result<(), Error> {
        match self.state().planned_failures.remove(&endpoint) {
            Some(status) => Err(Error::Planned(status)),
            None => Ok(()),
        }
    }

    fn mint_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Register an account without going through signup
    pub fn test_create_user(&self, username: &str, password: &str) {
        self.state().users.push(DbUser {
            username: String::from(username),
            password: String::from(password),
        });
    }

    pub fn test_create_post(&self, author: &str, title: &str, text: &str) -> PostId {
        let id = PostId(Self::mint_id());
        self.state().posts.push(Post {
            id: id.clone(),
            user: Author {
                username: String::from(author),
            },
            created_at: chrono::Utc::now(),
            title: String::from(title),
            text: String::from(text),
        });
        id
    }

    pub fn test_create_comment(&self, post: &PostId, author: &str, text: &str) -> CommentId {
        let id = CommentId(Self::mint_id());
        self.state().comments.push(Comment {
            id: id.clone(),
            user: Author {
                username: String::from(author),
            },
            created_at: chrono::Utc::now(),
            text: String::from(text),
            post: post.clone(),
        });
        id
    }

    pub fn test_posts(&self) -> Vec<Post> {
        self.state().posts.clone()
    }

    /// Comments of one post, in insertion order
    pub fn test_comments(&self, post: &PostId) -> Vec<Comment> {
        self.state()
            .comments
            .iter()
            .filter(|c| c.post == *post)
            .cloned()
            .collect()
    }

    pub fn test_has_session(&self, token: &AuthToken) -> bool {
        self.state().sessions.contains_key(token)
    }

    /// Whether the last request against a post or comment route carried an
    /// Authorization header (`None` until one was served)
    pub fn test_last_request_had_token(&self) -> Option<bool> {
        self.state().last_authorization
    }

    /// Makes the next call to `endpoint` answer `status` instead of working
    pub fn fail_next(&self, endpoint: Endpoint, status: StatusCode) {
        self.state().planned_failures.insert(endpoint, status);
    }
}

/// Optional bearer identity
///
/// The deployed API serves reads publicly, and the browser client sends
/// whatever its storage holds, including the literal string "null" after a
/// logout in another tab. Anything that does not resolve to a live session
/// is treated as anonymous rather than rejected. Header presence is
/// recorded for test introspection.
pub struct MaybeAuth(pub Option<String>);

#[async_trait]
impl FromRequestParts<MockServer> for MaybeAuth {
    type Rejection = Error;

    async fn from_request_parts(
        req: &mut request::Parts,
        server: &MockServer,
    ) -> Result<MaybeAuth, Error> {
        let header = req.headers.get(http::header::AUTHORIZATION);
        server.state().last_authorization = Some(header.is_some());
        let header = match header {
            None => return Ok(MaybeAuth(None)),
            Some(header) => header,
        };
        let mut words = match header.to_str() {
            Ok(header) => header.split(' '),
            Err(_) => return Ok(MaybeAuth(None)),
        };
        match words.next() {
            Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => (),
            _ => return Ok(MaybeAuth(None)),
        }
        let token = match (words.next(), words.next()) {
            (Some(token), None) => AuthToken(String::from(token)),
            _ => return Ok(MaybeAuth(None)),
        };
        Ok(MaybeAuth(server.state().sessions.get(&token).cloned()))
    }
}

/// Bearer identity, required: mutations answer 401 without a live session
pub struct Auth(pub String);

#[async_trait]
impl FromRequestParts<MockServer> for Auth {
    type Rejection = Error;

    async fn from_request_parts(
        req: &mut request::Parts,
        server: &MockServer,
    ) -> Result<Auth, Error> {
        let MaybeAuth(user) = MaybeAuth::from_request_parts(req, server).await?;
        Ok(Auth(user.ok_or(Error::PermissionDenied)?))
    }
}

async fn login(
    State(server): State<MockServer>,
    Json(data): Json<Credentials>,
) -> Result<Json<SessionToken>, Error> {
    server.take_planned(Endpoint::Login)?;
    let mut state = server.state();
    if !state
        .users
        .iter()
        .any(|u| u.username == data.username && u.password == data.password)
    {
        return Err(Error::PermissionDenied);
    }
    let token = AuthToken(MockServer::mint_id());
    state.sessions.insert(token.clone(), data.username);
    Ok(Json(SessionToken { token }))
}

fn required(issues: &mut Vec<ValidationIssue>, field: &'static str, value: &str) {
    if value.is_empty() {
        issues.push(ValidationIssue {
            msg: format!("{field} is required"),
            param: Some(String::from(field)),
        });
    }
}

/// Signup rejections still answer 200; the issues ride in the body
async fn signup(
    State(server): State<MockServer>,
    Json(data): Json<NewUser>,
) -> Result<Json<SignupReply>, Error> {
    server.take_planned(Endpoint::Signup)?;
    let mut issues = Vec::new();
    required(&mut issues, "first_name", &data.first_name);
    required(&mut issues, "last_name", &data.last_name);
    required(&mut issues, "username", &data.username);
    required(&mut issues, "email", &data.email);
    required(&mut issues, "password", &data.password);
    required(
        &mut issues,
        "password_confirmation",
        &data.password_confirmation,
    );
    if !data.password.is_empty() && data.password != data.password_confirmation {
        issues.push(ValidationIssue {
            msg: String::from("Passwords do not match"),
            param: Some(String::from("password_confirmation")),
        });
    }
    let mut state = server.state();
    if state.users.iter().any(|u| u.username == data.username) {
        issues.push(ValidationIssue {
            msg: String::from("Username already in use"),
            param: Some(String::from("username")),
        });
    }
    if !issues.is_empty() {
        return Ok(Json(SignupReply {
            errors: Some(issues),
        }));
    }
    state.users.push(DbUser {
        username: data.username,
        password: data.password,
    });
    Ok(Json(SignupReply { errors: None }))
}

async fn fetch_posts(
    State(server): State<MockServer>,
    _auth: MaybeAuth,
) -> Result<Json<Vec<Post>>, Error> {
    server.take_planned(Endpoint::Posts)?;
    Ok(Json(server.state().posts.clone()))
}

async fn fetch_post(
    State(server): State<MockServer>,
    _auth: MaybeAuth,
    Path(post): Path<PostId>,
) -> Result<Json<Post>, Error> {
    server.take_planned(Endpoint::Post)?;
    let state = server.state();
    let post = state
        .posts
        .iter()
        .find(|p| p.id == post)
        .ok_or(Error::NotFound("post"))?;
    Ok(Json(post.clone()))
}

async fn fetch_comments(
    State(server): State<MockServer>,
    _auth: MaybeAuth,
    Path(post): Path<PostId>,
) -> Result<Json<Vec<Comment>>, Error> {
    server.take_planned(Endpoint::Comments)?;
    let state = server.state();
    if !state.posts.iter().any(|p| p.id == post) {
        return Err(Error::NotFound("post"));
    }
    Ok(Json(
        state
            .comments
            .iter()
            .filter(|c| c.post == post)
            .cloned()
            .collect(),
    ))
}

async fn add_comment(
    State(server): State<MockServer>,
    Auth(user): Auth,
    Path(post): Path<PostId>,
    Json(data): Json<NewComment>,
) -> Result<Json<Comment>, Error> {
    server.take_planned(Endpoint::AddComment)?;
    let mut state = server.state();
    if !state.posts.iter().any(|p| p.id == post) {
        return Err(Error::NotFound("post"));
    }
    // the body repeats the post id; the path wins
    let comment = Comment {
        id: CommentId(MockServer::mint_id()),
        user: Author { username: user },
        created_at: chrono::Utc::now(),
        text: data.text,
        post,
    };
    state.comments.push(comment.clone());
    Ok(Json(comment))
}

async fn update_comment(
    State(server): State<MockServer>,
    Auth(user): Auth,
    Path((post, comment)): Path<(PostId, CommentId)>,
    Json(data): Json<UpdateComment>,
) -> Result<Json<Comment>, Error> {
    server.take_planned(Endpoint::UpdateComment)?;
    let mut state = server.state();
    let target = state
        .comments
        .iter_mut()
        .find(|c| c.id == comment && c.post == post)
        .ok_or(Error::NotFound("comment"))?;
    if target.user.username != user {
        return Err(Error::Forbidden("comment"));
    }
    target.text = data.text;
    Ok(Json(target.clone()))
}

async fn delete_comment(
    State(server): State<MockServer>,
    Auth(user): Auth,
    Path((post, comment)): Path<(PostId, CommentId)>,
) -> Result<(), Error> {
    server.take_planned(Endpoint::DeleteComment)?;
    let mut state = server.state();
    let at = state
        .comments
        .iter()
        .position(|c| c.id == comment && c.post == post)
        .ok_or(Error::NotFound("comment"))?;
    if state.comments[at].user.username != user {
        return Err(Error::Forbidden("comment"));
    }
    state.comments.remove(at);
    Ok(())
}

/// All routes of the deployed API, backed by `server`
pub fn app(server: MockServer) -> Router {
    Router::new()
        .route("/v1/login", post(login))
        .route("/v1/users", post(signup))
        .route("/v1/posts", get(fetch_posts))
        .route("/v1/posts/:post", get(fetch_post))
        .route(
            "/v1/posts/:post/comments",
            get(fetch_comments).post(add_comment),
        )
        .route(
            "/v1/posts/:post/comments/:comment",
            put(update_comment).delete(delete_comment),
        )
        .with_state(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::AssertUnwindSafe;
    use tower::{Service, ServiceExt};

    macro_rules! do_tokio_test {
        ( $name:ident, $typ:ty, $fn:expr ) => {
            #[test]
            fn $name() {
                let runtime = AssertUnwindSafe(
                    tokio::runtime::Builder::new_current_thread()
                        .enable_all()
                        .build()
                        .expect("failed initializing tokio runtime"),
                );
                bolero::check!()
                    .with_type::<$typ>()
                    .cloned()
                    .for_each(move |v| {
                        let () = runtime.block_on($fn(v));
                    })
            }
        };
    }

    do_tokio_test!(fuzz_maybe_auth_extractor, String, |token| async move {
        if let Ok(req) = http::Request::builder()
            .method(http::Method::GET)
            .uri("/")
            .header(http::header::AUTHORIZATION, token)
            .body(())
        {
            let mut req = req.into_parts().0;
            let server = MockServer::new();
            let res = MaybeAuth::from_request_parts(&mut req, &server).await;
            assert!(
                matches!(res, Ok(MaybeAuth(None))),
                "a token that resolves to no session must stay anonymous"
            );
            assert_eq!(server.test_last_request_had_token(), Some(true));
        }
    });

    async fn run_on_app<Req, Resp>(
        app: &mut Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<&Req>,
    ) -> Result<Resp, StatusCode>
    where
        Req: serde::Serialize,
        Resp: for<'de> serde::Deserialize<'de>,
    {
        app.ready().await.expect("waiting for app to be ready");
        let req = request::Builder::new().method(method).uri(uri);
        let req = match token {
            Some(token) => req.header(http::header::AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        };
        let req = match body {
            Some(body) => req
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(body).expect("serializing request body"),
                )),
            None => req.body(axum::body::Body::empty()),
        }
        .expect("building request");
        let resp = app.call(req).await.expect("running request");
        let status = resp.status();
        let body = hyper::body::to_bytes(resp.into_body())
            .await
            .expect("recovering response bytes");
        if status.as_u16() >= 400 {
            return Err(status);
        }
        if body.is_empty() {
            // deletions answer with an empty body
            return Ok(serde_json::from_slice(b"null").expect("parsing empty response"));
        }
        Ok(serde_json::from_slice(&body)
            .unwrap_or_else(|err| panic!("parsing response body: {err}, body is {body:?}")))
    }

    async fn get_on_app<Resp>(
        app: &mut Router,
        uri: &str,
        token: Option<&str>,
    ) -> Result<Resp, StatusCode>
    where
        Resp: for<'de> serde::Deserialize<'de>,
    {
        run_on_app(app, "GET", uri, token, None::<&()>).await
    }

    async fn login_on_app(app: &mut Router, username: &str, password: &str) -> AuthToken {
        let session: SessionToken = run_on_app(
            app,
            "POST",
            "/v1/login",
            None,
            Some(&Credentials {
                username: String::from(username),
                password: String::from(password),
            }),
        )
        .await
        .expect("logging in");
        session.token
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            first_name: String::from("Ada"),
            last_name: String::from("Lovelace"),
            username: String::from(username),
            email: format!("{username}@example.org"),
            password: String::from("hunter2"),
            password_confirmation: String::from("hunter2"),
        }
    }

    #[tokio::test]
    async fn login_mints_a_session_and_rejects_bad_credentials() {
        let server = MockServer::new();
        server.test_create_user("alice", "hunter2");
        let mut app = app(server.clone());

        let token = login_on_app(&mut app, "alice", "hunter2").await;
        assert!(server.test_has_session(&token));

        let refused = run_on_app::<_, SessionToken>(
            &mut app,
            "POST",
            "/v1/login",
            None,
            Some(&Credentials {
                username: String::from("alice"),
                password: String::from("wrong"),
            }),
        )
        .await;
        assert_eq!(refused.err(), Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn signup_lists_every_missing_field() {
        let mut app = app(MockServer::new());
        let empty = NewUser {
            first_name: String::new(),
            last_name: String::new(),
            username: String::new(),
            email: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
        };
        let reply: SignupReply = run_on_app(&mut app, "POST", "/v1/users", None, Some(&empty))
            .await
            .expect("signup answers 200 even when rejecting");
        let issues = reply.errors.expect("rejection must carry issues");
        assert_eq!(issues.len(), 6);
        assert!(issues.iter().all(|i| i.msg.ends_with("is required")));
    }

    #[tokio::test]
    async fn signup_rejects_mismatched_passwords_and_taken_usernames() {
        let server = MockServer::new();
        server.test_create_user("alice", "hunter2");
        let mut app = app(server);

        let mut mismatched = new_user("bob");
        mismatched.password_confirmation = String::from("different");
        let reply: SignupReply =
            run_on_app(&mut app, "POST", "/v1/users", None, Some(&mismatched))
                .await
                .expect("signup");
        let issues = reply.errors.expect("rejection must carry issues");
        assert_eq!(issues[0].msg, "Passwords do not match");

        let reply: SignupReply =
            run_on_app(&mut app, "POST", "/v1/users", None, Some(&new_user("alice")))
                .await
                .expect("signup");
        let issues = reply.errors.expect("rejection must carry issues");
        assert_eq!(issues[0].msg, "Username already in use");
    }

    #[tokio::test]
    async fn signup_creates_an_account_that_can_log_in() {
        let server = MockServer::new();
        let mut app = app(server.clone());

        let reply: SignupReply =
            run_on_app(&mut app, "POST", "/v1/users", None, Some(&new_user("ada")))
                .await
                .expect("signup");
        assert_eq!(reply.errors, None);

        let token = login_on_app(&mut app, "ada", "hunter2").await;
        assert!(server.test_has_session(&token));
    }

    #[tokio::test]
    async fn comments_are_stored_updated_and_deleted_by_their_author() {
        let server = MockServer::new();
        server.test_create_user("alice", "hunter2");
        server.test_create_user("bob", "123456");
        let post = server.test_create_post("alice", "Intro", "hello world");
        let mut app = app(server.clone());

        let alice = login_on_app(&mut app, "alice", "hunter2").await;
        let bob = login_on_app(&mut app, "bob", "123456").await;

        let comments_uri = format!("/v1/posts/{}/comments", post.0);
        let comment: Comment = run_on_app(
            &mut app,
            "POST",
            &comments_uri,
            Some(&alice.0),
            Some(&NewComment {
                post: post.clone(),
                text: String::from("first!"),
            }),
        )
        .await
        .expect("adding comment");
        assert_eq!(comment.user.username, "alice");
        assert_eq!(comment.post, post);

        let listed: Vec<Comment> = get_on_app(&mut app, &comments_uri, None)
            .await
            .expect("listing comments");
        assert_eq!(listed, vec![comment.clone()]);

        // only the author may touch it
        let comment_uri = format!("/v1/posts/{}/comments/{}", post.0, comment.id.0);
        let update = UpdateComment {
            comment: comment.id.clone(),
            text: String::from("edited"),
            post: post.clone(),
        };
        let refused =
            run_on_app::<_, Comment>(&mut app, "PUT", &comment_uri, Some(&bob.0), Some(&update))
                .await;
        assert_eq!(refused.err(), Some(StatusCode::FORBIDDEN));
        let refused =
            run_on_app::<(), ()>(&mut app, "DELETE", &comment_uri, Some(&bob.0), None).await;
        assert_eq!(refused.err(), Some(StatusCode::FORBIDDEN));

        let updated: Comment =
            run_on_app(&mut app, "PUT", &comment_uri, Some(&alice.0), Some(&update))
                .await
                .expect("updating comment");
        assert_eq!(updated.text, "edited");
        assert_eq!(server.test_comments(&post)[0].text, "edited");

        run_on_app::<(), ()>(&mut app, "DELETE", &comment_uri, Some(&alice.0), None)
            .await
            .expect("deleting comment");
        assert!(server.test_comments(&post).is_empty());
    }

    #[tokio::test]
    async fn mutations_require_a_live_session_but_reads_stay_public() {
        let server = MockServer::new();
        server.test_create_user("alice", "hunter2");
        let post = server.test_create_post("alice", "Intro", "hello world");
        let comments_uri = format!("/v1/posts/{}/comments", post.0);
        let mut app = app(server.clone());

        let body = NewComment {
            post: post.clone(),
            text: String::from("anon"),
        };
        let refused =
            run_on_app::<_, Comment>(&mut app, "POST", &comments_uri, None, Some(&body)).await;
        assert_eq!(refused.err(), Some(StatusCode::UNAUTHORIZED));

        // the storage-held "null" token the browser sends after a logout
        let refused =
            run_on_app::<_, Comment>(&mut app, "POST", &comments_uri, Some("null"), Some(&body))
                .await;
        assert_eq!(refused.err(), Some(StatusCode::UNAUTHORIZED));

        let listed: Vec<Comment> = get_on_app(&mut app, &comments_uri, Some("null"))
            .await
            .expect("anonymous read");
        assert_eq!(listed, vec![]);
        assert_eq!(server.test_last_request_had_token(), Some(true));

        let _: Vec<Post> = get_on_app(&mut app, "/v1/posts", None)
            .await
            .expect("anonymous read");
        assert_eq!(server.test_last_request_had_token(), Some(false));
    }

    #[tokio::test]
    async fn unknown_ids_answer_not_found() {
        let server = MockServer::new();
        server.test_create_user("alice", "hunter2");
        let post = server.test_create_post("alice", "Intro", "hello world");
        let mut app = app(server.clone());
        let alice = login_on_app(&mut app, "alice", "hunter2").await;

        let missing = get_on_app::<Post>(&mut app, "/v1/posts/nope", None).await;
        assert_eq!(missing.err(), Some(StatusCode::NOT_FOUND));

        let missing = get_on_app::<Vec<Comment>>(&mut app, "/v1/posts/nope/comments", None).await;
        assert_eq!(missing.err(), Some(StatusCode::NOT_FOUND));

        let comment_uri = format!("/v1/posts/{}/comments/nope", post.0);
        let missing =
            run_on_app::<(), ()>(&mut app, "DELETE", &comment_uri, Some(&alice.0), None).await;
        assert_eq!(missing.err(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn planned_failures_fire_once() {
        let server = MockServer::new();
        server.test_create_post("alice", "Intro", "hello world");
        server.fail_next(Endpoint::Posts, StatusCode::INTERNAL_SERVER_ERROR);
        let mut app = app(server.clone());

        let failed = get_on_app::<Vec<Post>>(&mut app, "/v1/posts", None).await;
        assert_eq!(failed.err(), Some(StatusCode::INTERNAL_SERVER_ERROR));

        let posts: Vec<Post> = get_on_app(&mut app, "/v1/posts", None)
            .await
            .expect("the failure must not stick");
        assert_eq!(posts.len(), 1);
    }
}
