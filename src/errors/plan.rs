//! Journey plan error types
//!
//! Validation variants appear in the order the upsert checks them; the first
//! failing check is the one reported.

use thiserror::Error;

use super::{AuthError, ErrorKind, StoreError};

/// Journey plan errors
#[derive(Error, Debug)]
pub enum PlanError {
    /// Required field absent or unusable
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Period type other than weekly/monthly
    #[error("periodType must be weekly or monthly")]
    InvalidPeriodType(String),

    /// Start or end date could not be canonicalized
    #[error("Invalid startDate/endDate")]
    InvalidDateRange,

    /// End date precedes start date
    #[error("endDate must be >= startDate")]
    EndBeforeStart,

    /// No day carries any location
    #[error("Select at least one location in at least one day")]
    EmptySchedule,

    /// Query date could not be canonicalized
    #[error("Invalid date")]
    InvalidDate(String),

    /// Referenced user is missing or is not a supervisor
    #[error("Supervisor not found (or not a supervisor)")]
    SupervisorNotFound(i64),

    /// Plan not found by ID
    #[error("Plan {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PlanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanError::MissingField(_)
            | PlanError::InvalidPeriodType(_)
            | PlanError::InvalidDateRange
            | PlanError::EndBeforeStart
            | PlanError::EmptySchedule
            | PlanError::InvalidDate(_) => ErrorKind::Validation,
            PlanError::SupervisorNotFound(_) | PlanError::NotFound(_) => ErrorKind::NotFound,
            PlanError::Auth(err) => err.kind(),
            PlanError::Store(err) => err.kind(),
        }
    }

    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Store)
    }

    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
