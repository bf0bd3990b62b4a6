//! Error taxonomy for the advisor core
//!
//! - `DataUnavailable`: a collaborator returned nothing. Always recoverable by
//!   substituting neutral defaults.
//! - `InvalidInput`: structurally invalid input (coordinates, malformed crop
//!   records, impossible maturity lengths). Rejected at component boundaries.
//! - `ComputationDegraded`: not a failure. A factor could not be evaluated
//!   properly and contributed its neutral value instead; the note travels with
//!   the result so callers can tell a weaker score from a real one.
//!
//! `Internal` covers failures that are bugs or backend errors; top-level entry
//! points convert them into degraded results instead of propagating.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the advisor core
pub type AdvisorResult<T> = Result<T, AdvisorError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdvisorError {
    /// Collaborator returned no data
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// Input rejected at a component boundary
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected failure inside a component (aggregation backend, arithmetic)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AdvisorError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }
}

/// Degraded factor evaluation, carried alongside a usable result
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[error("{source_name} degraded: {detail}")]
pub struct ComputationDegraded {
    /// Which computation fell back (factor key, "variety_matcher", ...)
    pub source_name: String,
    /// Short explanation of what was missing
    pub detail: String,
    /// Value substituted for the missing computation
    pub substituted: f64,
}

impl ComputationDegraded {
    pub fn new(source_name: impl Into<String>, detail: impl Into<String>, substituted: f64) -> Self {
        Self {
            source_name: source_name.into(),
            detail: detail.into(),
            substituted,
        }
    }
}
