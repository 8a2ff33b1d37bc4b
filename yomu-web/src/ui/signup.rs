use std::rc::Rc;

use yew::prelude::*;
use yomu_client::api::SignupOutcome;
use yomu_client::{ApiClient, ApiError, SignupForm};

#[derive(Clone, PartialEq, Properties)]
pub struct SignupProps {
    pub client: Rc<ApiClient>,
}

pub enum SignupMsg {
    FirstNameChanged(String),
    LastNameChanged(String),
    UsernameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    PasswordConfirmationChanged(String),
    SubmitClicked,
    Finished(Result<SignupOutcome, ApiError>),
}

pub struct Signup {
    form: SignupForm,
}

impl Component for Signup {
    type Message = SignupMsg;
    type Properties = SignupProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Signup {
            form: SignupForm::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: SignupMsg) -> bool {
        match msg {
            SignupMsg::FirstNameChanged(value) => self.form.first_name = value,
            SignupMsg::LastNameChanged(value) => self.form.last_name = value,
            SignupMsg::UsernameChanged(value) => self.form.username = value,
            SignupMsg::EmailChanged(value) => self.form.email = value,
            SignupMsg::PasswordChanged(value) => self.form.password = value,
            SignupMsg::PasswordConfirmationChanged(value) => {
                self.form.password_confirmation = value
            }
            SignupMsg::SubmitClicked => {
                let client = ctx.props().client.clone();
                let body = self.form.body();
                ctx.link()
                    .send_future(async move { SignupMsg::Finished(client.signup(&body).await) });
                return false;
            }
            SignupMsg::Finished(outcome) => {
                self.form.finish(outcome);
                if let Some(err) = self.form.error() {
                    tracing::warn!("failed signing up: {err}");
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.form.signed_up() {
            return html! {
                <div>
                    <h2>{ "Sign Up" }</h2>
                    <p>{ "You Signed Up Successfully." }</p>
                </div>
            };
        }
        macro_rules! callback_for {
            ($msg:ident) => {
                ctx.link().callback(|e: web_sys::Event| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    SignupMsg::$msg(input.value())
                })
            };
        }
        html! {
            <div>
                <h2>{ "Sign Up" }</h2>
                <form>
                    <label for="firstName">
                        { "First Name:" }
                        <input
                            id="firstName"
                            type="text"
                            value={self.form.first_name.clone()}
                            onchange={callback_for!(FirstNameChanged)}
                        />
                    </label>
                    <br />
                    <label for="lastName">
                        { "Last Name:" }
                        <input
                            id="lastName"
                            type="text"
                            value={self.form.last_name.clone()}
                            onchange={callback_for!(LastNameChanged)}
                        />
                    </label>
                    <br />
                    <label for="username">
                        { "Username:" }
                        <input
                            id="username"
                            type="text"
                            value={self.form.username.clone()}
                            onchange={callback_for!(UsernameChanged)}
                        />
                    </label>
                    <br />
                    <label for="email">
                        { "Email:" }
                        <input
                            id="email"
                            type="email"
                            value={self.form.email.clone()}
                            onchange={callback_for!(EmailChanged)}
                        />
                    </label>
                    <br />
                    <label for="password">
                        { "Password:" }
                        <input
                            id="password"
                            type="password"
                            value={self.form.password.clone()}
                            onchange={callback_for!(PasswordChanged)}
                        />
                    </label>
                    <br />
                    <label for="passwordConfirmation">
                        { "Password Confirmation:" }
                        <input
                            id="passwordConfirmation"
                            type="password"
                            value={self.form.password_confirmation.clone()}
                            onchange={callback_for!(PasswordConfirmationChanged)}
                        />
                    </label>
                    <br />
                    { for self.form.issues().iter().map(|issue| html! { <p>{ &issue.msg }</p> }) }
                    <button type="button" onclick={ctx.link().callback(|_| SignupMsg::SubmitClicked)}>
                        { "Sign Up" }
                    </button>
                </form>
            </div>
        }
    }
}
