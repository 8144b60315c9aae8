//! Lookup error type.

use thiserror::Error;

/// Errors returned by an [`AutomationLookup`](crate::AutomationLookup) backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The backing service could not be reached or refused the request.
    #[error("automation service unavailable: {0}")]
    Unavailable(String),
}
