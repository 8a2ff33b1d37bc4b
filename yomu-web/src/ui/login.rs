use std::rc::Rc;

use yew::prelude::*;
use yomu_client::api::{AuthToken, Credentials};
use yomu_client::{ApiClient, ApiError};

#[derive(Clone, PartialEq, Properties)]
pub struct LoginProps {
    pub client: Rc<ApiClient>,
    pub on_login: Callback<AuthToken>,
}

pub enum LoginMsg {
    UsernameChanged(String),
    PasswordChanged(String),
    SubmitClicked,
    Finished(Result<AuthToken, ApiError>),
}

pub struct Login {
    username: String,
    password: String,
}

impl Component for Login {
    type Message = LoginMsg;
    type Properties = LoginProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Login {
            username: String::new(),
            password: String::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: LoginMsg) -> bool {
        match msg {
            LoginMsg::UsernameChanged(username) => self.username = username,
            LoginMsg::PasswordChanged(password) => self.password = password,
            LoginMsg::SubmitClicked => {
                let client = ctx.props().client.clone();
                let credentials = Credentials {
                    username: self.username.clone(),
                    password: self.password.clone(),
                };
                ctx.link().send_future(async move {
                    LoginMsg::Finished(client.login(&credentials).await)
                });
                return false;
            }
            LoginMsg::Finished(Ok(token)) => {
                ctx.props().on_login.emit(token);
                return false;
            }
            LoginMsg::Finished(Err(err)) => {
                tracing::warn!("failed logging in: {err}");
                return false;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        macro_rules! callback_for {
            ($msg:ident) => {
                ctx.link().callback(|e: web_sys::Event| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    LoginMsg::$msg(input.value())
                })
            };
        }
        html! {
            <div>
                <h2>{ "Login" }</h2>
                <form>
                    <label for="username">
                        { "Username:" }
                        <input
                            id="username"
                            type="text"
                            value={self.username.clone()}
                            onchange={callback_for!(UsernameChanged)}
                        />
                    </label>
                    <br />
                    <label for="password">
                        { "Password:" }
                        <input
                            id="password"
                            type="password"
                            value={self.password.clone()}
                            onchange={callback_for!(PasswordChanged)}
                        />
                    </label>
                    <br />
                    <button type="button" onclick={ctx.link().callback(|_| LoginMsg::SubmitClicked)}>
                        { "Login" }
                    </button>
                </form>
            </div>
        }
    }
}
