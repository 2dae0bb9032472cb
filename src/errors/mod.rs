//! Domain-specific error types
//!
//! Each domain has its own error enum. All of them classify into an
//! [`ErrorKind`], which is what callers (the HTTP layer in particular) use to
//! decide how a failure is reported.
//!
//! # Error Categories
//!
//! - **PlanError**: journey plan validation, lookup and ownership
//! - **SaleError**: sale recording and sales queries
//! - **UserError**: user administration
//! - **AuthError**: identity and role checks
//! - **StoreError**: record store failures, the only fatal class
//!
//! # Examples
//!
//! ```rust
//! use fieldops::errors::{ErrorKind, PlanError};
//!
//! let err = PlanError::EmptySchedule;
//! assert_eq!(err.kind(), ErrorKind::Validation);
//! assert!(err.is_client_error());
//! ```

pub mod auth;
pub mod plan;
pub mod sale;
pub mod store;
pub mod user;

pub use auth::AuthError;
pub use plan::PlanError;
pub use sale::SaleError;
pub use store::StoreError;
pub use user::UserError;

/// Broad classification of a failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Unauthorized,
    Store,
}

/// Result type alias for journey plan operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Result type alias for sales operations
pub type SaleResult<T> = Result<T, SaleError>;

/// Result type alias for user administration
pub type UserResult<T> = Result<T, UserError>;

/// Result type alias for identity checks
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type alias for store access
pub type StoreResult<T> = Result<T, StoreError>;
