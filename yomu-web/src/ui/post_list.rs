use std::rc::Rc;

use yew::prelude::*;
use yomu_client::api::{AuthToken, Post};
use yomu_client::{ApiClient, ApiError, Epoch, Resource, ResourceState};

use crate::ui;

#[derive(Clone, PartialEq, Properties)]
pub struct PostListProps {
    pub client: Rc<ApiClient>,
    pub token: AuthToken,
}

pub enum PostListMsg {
    Fetched(Epoch, Result<Vec<Post>, ApiError>),
}

pub struct PostList {
    posts: Resource<Vec<Post>>,
}

impl PostList {
    fn fetch(&mut self, ctx: &Context<Self>) {
        let epoch = self.posts.restart();
        let client = ctx.props().client.clone();
        let token = ctx.props().token.clone();
        ctx.link()
            .send_future(
                async move { PostListMsg::Fetched(epoch, client.posts(Some(&token)).await) },
            );
    }
}

impl Component for PostList {
    type Message = PostListMsg;
    type Properties = PostListProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut this = PostList {
            posts: Resource::new(),
        };
        this.fetch(ctx);
        this
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &PostListProps) -> bool {
        // Another session may not be shown the same posts
        self.fetch(ctx);
        true
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: PostListMsg) -> bool {
        match msg {
            PostListMsg::Fetched(epoch, outcome) => self.posts.resolve(epoch, outcome),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let body = match self.posts.state() {
            ResourceState::Loaded(posts) => posts
                .iter()
                .map(|post| {
                    html! {
                        <ui::PostItem
                            key={post.id.0.clone()}
                            client={ctx.props().client.clone()}
                            token={ctx.props().token.clone()}
                            id={post.id.clone()}
                        />
                    }
                })
                .collect::<Html>(),
            ResourceState::Pending => html! { <p>{ "🔄 Loading the posts..." }</p> },
            ResourceState::Failed(_) => html! { <p>{ "⚠️ No posts yet" }</p> },
        };
        html! {
            <div class="postList">
                { body }
            </div>
        }
    }
}
