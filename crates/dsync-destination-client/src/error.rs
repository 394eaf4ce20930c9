use thiserror::Error;

/// Errors produced by the remote destination registry client.
#[derive(Error, Debug)]
pub enum DestinationClientError {
    /// Client could not be built (bad URL template, certificate, unknown region)
    #[error("Invalid destination client configuration: {0}")]
    Config(String),

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Registry answered with a non-success status
    #[error("Unexpected response from destination registry (status {status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Retryable failure persisted through every attempt
    #[error("Destination registry request failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<DestinationClientError>,
    },

    #[error("Destination registry response is missing the {0} header")]
    MissingHeader(&'static str),

    #[error("Destination '{0}' not found")]
    NotFound(String),

    #[error("Failed to decode destination registry response: {0}")]
    Decode(String),

    #[error("Token request failed (status {status}): {body}")]
    Token { status: u16, body: String },
}

impl DestinationClientError {
    /// True when the registry reported that the requested destination does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, DestinationClientError>;
