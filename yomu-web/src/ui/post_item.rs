use std::rc::Rc;

use yew::prelude::*;
use yomu_client::api::{AuthToken, Post, PostId};
use yomu_client::{ApiClient, ApiError, Epoch, Resource, ResourceState};

use crate::ui;
use crate::util;

#[derive(Clone, PartialEq, Properties)]
pub struct PostItemProps {
    pub client: Rc<ApiClient>,
    pub token: AuthToken,
    pub id: PostId,
}

pub enum PostItemMsg {
    Fetched(Epoch, Result<Post, ApiError>),
}

/// One post, fetched in full by its id, with its comment section
pub struct PostItem {
    post: Resource<Post>,
}

impl PostItem {
    fn fetch(&mut self, ctx: &Context<Self>) {
        let epoch = self.post.restart();
        let client = ctx.props().client.clone();
        let token = ctx.props().token.clone();
        let id = ctx.props().id.clone();
        ctx.link().send_future(async move {
            PostItemMsg::Fetched(epoch, client.post(Some(&token), &id).await)
        });
    }
}

impl Component for PostItem {
    type Message = PostItemMsg;
    type Properties = PostItemProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut this = PostItem {
            post: Resource::new(),
        };
        this.fetch(ctx);
        this
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &PostItemProps) -> bool {
        self.fetch(ctx);
        true
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: PostItemMsg) -> bool {
        match msg {
            PostItemMsg::Fetched(epoch, outcome) => self.post.resolve(epoch, outcome),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match self.post.state() {
            ResourceState::Loaded(post) => html! {
                <div class="post">
                    <p>{ &post.user.username }</p>
                    <p>{ util::format_date(&post.created_at) }</p>
                    <h2>{ &post.title }</h2>
                    <p>{ &post.text }</p>
                    <ui::Comments
                        client={ctx.props().client.clone()}
                        token={ctx.props().token.clone()}
                        post={post.id.clone()}
                    />
                </div>
            },
            ResourceState::Pending => html! { <p>{ "🔄 loading the post..." }</p> },
            ResourceState::Failed(_) => html! { <p>{ "⚠️ Cannot parse this post" }</p> },
        }
    }
}
