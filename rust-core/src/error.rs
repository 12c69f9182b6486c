//! Error taxonomy for the analysis core
//!
//! Validation and precondition failures are raised synchronously at the API
//! boundary, before any heavy computation starts. Failures inside the
//! parallel pulse-width search are delivered asynchronously as a single
//! aggregated event instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input data: {0}")]
    InvalidInput(String),

    #[error("Numeric precondition violated: {0}")]
    Precondition(String),

    #[error("Computation failed: {0}")]
    Computation(String),

    #[error("Computation cancelled")]
    Cancelled,
}
