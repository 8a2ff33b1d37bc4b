mod app;
pub use app::App;

mod comments;
pub use comments::Comments;

mod login;
pub use login::Login;

mod post_item;
pub use post_item::PostItem;

mod post_list;
pub use post_list::PostList;

mod signup;
pub use signup::Signup;
