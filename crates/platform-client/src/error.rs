//! Error types for platform-client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures of a single HTTP exchange
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not reach the server or the request could not be built
    #[error("Failed to connect to {url}: {message}")]
    Connect { url: String, message: String },

    /// Request exceeded its timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Server answered with a non-2xx status
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Response body was not valid JSON
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl TransportError {
    /// Classify a reqwest error raised while sending or reading
    pub fn from_reqwest(url: impl Into<String>, err: reqwest::Error) -> Self {
        let url = url.into();
        if err.is_timeout() {
            Self::Timeout { url }
        } else if err.is_decode() {
            Self::Decode {
                url,
                message: err.to_string(),
            }
        } else {
            Self::Connect {
                url,
                message: err.to_string(),
            }
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors that can occur while using the platform API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP exchange failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Required configuration value is absent
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// RunSession kept changing until the deadline
    #[error(
        "RunSession {session_id} did not stabilize after {elapsed_secs:.1}s \
         (last runRequests length: {last_length})"
    )]
    StabilizationTimeout {
        session_id: i64,
        elapsed_secs: f64,
        last_length: usize,
    },

    /// Payload did not have the expected shape
    #[error("Data shape error: {0}")]
    DataShape(#[from] rw_core::Error),

    /// Caller passed an unusable argument
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Polling was cancelled by the caller
    #[error("Polling of RunSession {session_id} was cancelled")]
    Cancelled { session_id: i64 },
}

impl ClientError {
    /// Create a Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::DataShape(rw_core::Error::InvalidDocument(err))
    }
}
