use std::rc::Rc;

use yew::prelude::*;
use yomu_client::api::AuthToken;
use yomu_client::{ApiClient, Session, DEFAULT_HOST};

use crate::storage::BrowserTokenStore;
use crate::ui;

pub enum AppMsg {
    LoggedIn(AuthToken),
    LoggedOut,
}

/// Root component. Shows the login and signup forms until a session is
/// open, and the post list while one is.
pub struct App {
    client: Rc<ApiClient>,
    session: Session,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        App {
            client: Rc::new(ApiClient::new(DEFAULT_HOST)),
            session: Session::restore(Box::new(BrowserTokenStore)),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: AppMsg) -> bool {
        match msg {
            AppMsg::LoggedIn(token) => self.session.login(token),
            AppMsg::LoggedOut => self.session.logout(),
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let token = match self.session.token() {
            Some(token) => token.clone(),
            None => {
                return html! {<>
                    <ui::Login
                        client={self.client.clone()}
                        on_login={ctx.link().callback(AppMsg::LoggedIn)}
                    />
                    <br />
                    <hr />
                    <ui::Signup client={self.client.clone()} />
                </>}
            }
        };
        html! {<>
            <button type="button" onclick={ctx.link().callback(|_| AppMsg::LoggedOut)}>
                { "Logout" }
            </button>
            <ui::PostList client={self.client.clone()} {token} />
        </>}
    }
}
