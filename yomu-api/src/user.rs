/// Author object embedded in posts and comments
///
/// The server sends more fields; only the username is ever displayed.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Author {
    pub username: String,
}

/// Body for `POST /v1/users`, field names as they appear on the wire
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ValidationIssue {
    pub msg: String,

    /// Name of the offending field, when the server names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

/// Raw body of a `POST /v1/users` response
///
/// The server answers 200 even for rejected signups; rejection is signalled
/// by a non-empty `errors` array in the body.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SignupReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationIssue>>,
}

impl SignupReply {
    pub fn into_outcome(self) -> SignupOutcome {
        match self.errors {
            Some(errors) if !errors.is_empty() => SignupOutcome::Rejected(errors),
            _ => SignupOutcome::Created,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SignupOutcome {
    Created,
    Rejected(Vec<ValidationIssue>),
}
