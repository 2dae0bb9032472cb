use thiserror::Error;

use super::{ErrorKind, StoreError};

/// User administration errors
#[derive(Error, Debug)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(i64),

    #[error("Only employees require approval")]
    NotAnEmployee(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl UserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::NotFound(_) => ErrorKind::NotFound,
            UserError::NotAnEmployee(_) => ErrorKind::Validation,
            UserError::Store(err) => err.kind(),
        }
    }
}
