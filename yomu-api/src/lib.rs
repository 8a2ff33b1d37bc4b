mod auth;
pub use auth::{AuthToken, Credentials, SessionToken};

mod comment;
pub use comment::{Comment, CommentId, NewComment, UpdateComment};

mod post;
pub use post::{Post, PostId};

mod user;
pub use user::{Author, NewUser, SignupOutcome, SignupReply, ValidationIssue};

pub type Time = chrono::DateTime<chrono::Utc>;

/// Placeholder id, in the 24-hex-chars shape the server mints
pub const STUB_ID: &str = "ffffffffffffffffffffffff";

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> Time {
        s.parse().expect("parsing test timestamp")
    }

    #[test]
    fn post_wire_format() {
        let post: Post = serde_json::from_str(
            r#"{
                "_id": "63d0c920f0b6b15a9c6a1dbc",
                "user": { "_id": "63cf9b8e1c9d440000a1b0d3", "username": "alice", "__v": 0 },
                "createdAt": "2023-01-25T10:03:12.084Z",
                "title": "Hello",
                "text": "First post",
                "__v": 0
            }"#,
        )
        .expect("parsing post");
        assert_eq!(post.id, PostId("63d0c920f0b6b15a9c6a1dbc".to_string()));
        assert_eq!(post.user.username, "alice");
        assert_eq!(post.created_at, time("2023-01-25T10:03:12.084Z"));
        assert_eq!(post.title, "Hello");
        assert_eq!(post.text, "First post");
    }

    #[test]
    fn comment_wire_format() {
        let comment: Comment = serde_json::from_str(
            r#"{
                "_id": "63d0ca01f0b6b15a9c6a1dd1",
                "user": { "username": "bob" },
                "createdAt": "2023-01-25T10:07:45.320Z",
                "text": "nice post",
                "post": "63d0c920f0b6b15a9c6a1dbc"
            }"#,
        )
        .expect("parsing comment");
        assert_eq!(comment.id, CommentId("63d0ca01f0b6b15a9c6a1dd1".to_string()));
        assert_eq!(comment.post, PostId("63d0c920f0b6b15a9c6a1dbc".to_string()));
        assert_eq!(comment.text, "nice post");
    }

    #[test]
    fn comment_bodies_use_wire_names() {
        let body = NewComment {
            post: PostId("p1".to_string()),
            text: "hi".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&body).expect("serializing new comment"),
            serde_json::json!({ "postId": "p1", "text": "hi" }),
        );

        let body = UpdateComment {
            comment: CommentId("c1".to_string()),
            text: "hi again".to_string(),
            post: PostId("p1".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&body).expect("serializing comment update"),
            serde_json::json!({ "commentId": "c1", "text": "hi again", "post": "p1" }),
        );
    }

    #[test]
    fn session_token_is_transparent() {
        let session: SessionToken =
            serde_json::from_str(r#"{ "token": "abc.def.ghi" }"#).expect("parsing session");
        assert_eq!(session.token, AuthToken("abc.def.ghi".to_string()));
    }

    #[test]
    fn signup_reply_without_errors_is_created() {
        let reply: SignupReply = serde_json::from_str("{}").expect("parsing empty reply");
        assert_eq!(reply.into_outcome(), SignupOutcome::Created);

        let reply: SignupReply =
            serde_json::from_str(r#"{ "errors": [] }"#).expect("parsing reply");
        assert_eq!(reply.into_outcome(), SignupOutcome::Created);
    }

    #[test]
    fn signup_reply_with_errors_is_rejected() {
        let reply: SignupReply = serde_json::from_str(
            r#"{ "errors": [
                { "msg": "Username already taken", "param": "username" },
                { "msg": "Passwords do not match" }
            ] }"#,
        )
        .expect("parsing reply");
        match reply.into_outcome() {
            SignupOutcome::Rejected(issues) => {
                assert_eq!(issues.len(), 2);
                assert_eq!(issues[0].msg, "Username already taken");
                assert_eq!(issues[0].param.as_deref(), Some("username"));
                assert_eq!(issues[1].param, None);
            }
            outcome => panic!("expected rejection, got {:?}", outcome),
        }
    }
}
