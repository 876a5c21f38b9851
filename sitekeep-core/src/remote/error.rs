use thiserror::Error;

/// Errors that can occur talking to the remote store.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Remote store URL is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The save function answered but refused the write.
    #[error("Save rejected: {0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}
