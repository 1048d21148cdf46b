use thiserror::Error;

/// Failures surfaced by [`crate::client::ChatClient`].
///
/// The client never recovers from any of these; they propagate unchanged
/// to whoever issued the call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never reached the backend (DNS, refused connection, reset).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend error {status}: {body}")]
    Backend { status: u16, body: String },

    /// The backend answered 2xx but the body was not the JSON we expect.
    #[error("Invalid response from backend: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status for backend errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
