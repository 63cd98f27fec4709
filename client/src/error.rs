use thiserror::Error;

/// Every way a submission can fail. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Please enter at least {min} characters.")]
    Validation { min: usize },

    #[error("Request timed out.")]
    Timeout,

    #[error("Rate limit exceeded. Wait a moment.")]
    RateLimited,

    /// Non-success status, or a success body without an answer.
    #[error("{}", .detail.as_deref().unwrap_or("Error"))]
    Server { status: u16, detail: Option<String> },

    #[error("Connection error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}
