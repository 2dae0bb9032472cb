use thiserror::Error;

use super::ErrorKind;

/// Record store failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be decoded
    #[error("Store data is corrupt: {0}")]
    Corrupt(String),

    /// Snapshot could not be encoded
    #[error("Store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Store
    }
}
