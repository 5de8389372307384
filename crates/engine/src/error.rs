//! The module contains the errors the engine can return.
//!
//! Every rejected intent maps to exactly one of the first four variants:
//!
//! - [`Validation`] one or more field rules failed on create/update.
//! - [`Hierarchy`] invalid or inactive parent, cycle, or depth over the limit.
//! - [`ReferentialIntegrity`] a delete is blocked by dependent records.
//! - [`KeyNotFound`] an update targets a record that does not exist.
//! - [`InvalidAmount`] a money amount typed by the user does not parse.
//!
//! The `Display` of [`Validation`] is the user-facing text: every violated
//! rule, joined with `"; "`.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Hierarchy`]: EngineError::Hierarchy
//!  [`ReferentialIntegrity`]: EngineError::ReferentialIntegrity
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidAmount`]: EngineError::InvalidAmount
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("{0}")]
    Hierarchy(String),
    #[error("{0}")]
    ReferentialIntegrity(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl EngineError {
    /// Wraps a non-empty list of violations, `Ok(())` otherwise.
    pub(crate) fn check(violations: Vec<String>) -> Result<(), EngineError> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Validation(violations))
        }
    }
}
