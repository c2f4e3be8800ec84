//! Error types for agenda-core

use thiserror::Error;

/// Main error type for agenda-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Contacts API error: {0}")]
    Contacts(#[from] agenda_contacts::ContactsError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for agenda-core
pub type Result<T> = std::result::Result<T, Error>;
