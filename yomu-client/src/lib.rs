mod client;
pub use client::{ApiClient, DEFAULT_HOST};

mod error;
pub use error::ApiError;

mod feed;
pub use feed::{CommentFeed, DeleteOp, EditOp};

mod fuzz;

mod resource;
pub use resource::{Epoch, Resource, ResourceState};

mod session;
pub use session::{MemoryTokenStore, Session, TokenStore};

mod signup;
pub use signup::SignupForm;

pub mod api {
    pub use yomu_api::*;
}
