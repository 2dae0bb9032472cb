use thiserror::Error;

use super::ErrorKind;

/// Identity and role errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable identity accompanied the request
    #[error("{0}")]
    Unauthorized(String),

    /// Identity is valid but lacks the required role or ownership
    #[error("{0}")]
    Forbidden(String),
}

impl AuthError {
    pub fn forbidden() -> Self {
        AuthError::Forbidden("Forbidden".to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthorized(_) => ErrorKind::Unauthorized,
            AuthError::Forbidden(_) => ErrorKind::Forbidden,
        }
    }
}
