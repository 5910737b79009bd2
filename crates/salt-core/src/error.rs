//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the SALT stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations and
//! carry the offending value so callers can report validation failures
//! without re-deriving context.

use thiserror::Error;

/// Top-level error type for the SALT stack's foundational types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaltError {
    /// A jurisdiction code was not two ASCII uppercase letters.
    #[error("invalid jurisdiction code: {code:?} (expected two uppercase letters)")]
    InvalidJurisdiction {
        /// The value that failed validation.
        code: String,
    },

    /// An entity type string did not name a known variant.
    #[error("unknown entity type: {value:?}")]
    UnknownEntityType {
        /// The value that failed validation.
        value: String,
    },
}
