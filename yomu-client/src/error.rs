use reqwest::StatusCode;

/// What went wrong talking to the server
///
/// Signup validation problems are not errors at this level: the server
/// reports them inside successful responses, see
/// [`SignupOutcome`](crate::api::SignupOutcome).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed, or its body could not be decoded
    #[error("failed reaching the server: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with status 400 or above; the body is not read
    #[error("server answered with status {0}")]
    Status(StatusCode),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Network(_) => None,
            ApiError::Status(status) => Some(*status),
        }
    }
}
