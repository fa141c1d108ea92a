//! Session store errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session '{0}' already exists")]
    AlreadyExists(String),
    #[error("session '{0}' not found")]
    NotFound(String),
    #[error("invalid session id '{0}'")]
    InvalidId(String),
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
