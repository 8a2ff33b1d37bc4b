use crate::api::{NewUser, SignupOutcome, ValidationIssue};
use crate::ApiError;

/// View model for the signup form
///
/// The six inputs are plain public fields; the UI binds them directly. The
/// outcome state distinguishes a submitted account (the form is replaced by
/// a confirmation), server-side validation issues (rendered above the
/// submit button, fields kept as typed), and a transport failure.
#[derive(Debug, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    signed_up: bool,
    issues: Vec<ValidationIssue>,
    error: Option<ApiError>,
}

impl SignupForm {
    pub fn new() -> SignupForm {
        Default::default()
    }

    /// Body to POST, with the fields as currently typed
    pub fn body(&self) -> NewUser {
        NewUser {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
        }
    }

    /// Applies the server's answer to a submission
    ///
    /// A rejection replaces any issues from the previous attempt and keeps
    /// the fields untouched so they can be corrected.
    pub fn finish(&mut self, outcome: Result<SignupOutcome, ApiError>) {
        match outcome {
            Ok(SignupOutcome::Created) => {
                self.signed_up = true;
                self.issues.clear();
                self.error = None;
            }
            Ok(SignupOutcome::Rejected(issues)) => {
                self.issues = issues;
                self.error = None;
            }
            Err(err) => self.error = Some(err),
        }
    }

    /// True once the server accepted the account
    pub fn signed_up(&self) -> bool {
        self.signed_up
    }

    /// Validation issues from the last rejected attempt
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }
}
