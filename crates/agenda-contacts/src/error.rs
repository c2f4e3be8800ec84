//! Error types for agenda-contacts

use thiserror::Error;

/// agenda-contacts error type
#[derive(Error, Debug)]
pub enum ContactsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No response was received from the server
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server answered with a non-2xx status
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx answer without the expected body
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ContactsError {
    /// HTTP status of a server-reported failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ContactsError>;
