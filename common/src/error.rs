//! Error taxonomy for every backend call and for editor input.
use thiserror::Error;

/// Failure of a single fetch, poll or parameter edit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The request never produced a response (connection refused, timeout...).
    #[error("network error: {0}")]
    Network(String),

    /// A fetch-by-ticker-list returned a different number of records than requested.
    #[error("requested {requested} stock record(s), received {received}")]
    PartialResult { requested: usize, received: usize },

    /// The response body could not be decoded or is internally inconsistent.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// User-supplied parameter text was rejected before reaching the backend.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// True for the transport family: bad status or no response at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Status(_) | ClientError::Network(_))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Malformed(err.to_string())
    }
}

/// Crate-wide `Result` defaulting to `ClientError`.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;
