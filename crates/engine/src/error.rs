//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`MalformedDate`] returned when a bill date is not a `YYYY-MM-DD` date.
//! - [`InvalidAmount`] and [`InvalidTip`] returned for negative or unusable
//!   numbers.
//! - [`InvalidItem`] returned when an item cannot be charged to anybody.
//! - [`Reconciliation`] returned when the per-person shares do not add up to
//!   the bill total.
//! - [`KeyNotFound`] returned when a participant, item or bill is missing.
//!
//!  [`MalformedDate`]: EngineError::MalformedDate
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidTip`]: EngineError::InvalidTip
//!  [`InvalidItem`]: EngineError::InvalidItem
//!  [`Reconciliation`]: EngineError::Reconciliation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use thiserror::Error;

use crate::Money;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed date: \"{0}\" (expected YYYY-MM-DD)")]
    MalformedDate(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid tip percentage: {0}")]
    InvalidTip(String),
    #[error("Invalid item: {0}")]
    InvalidItem(String),
    #[error("Reconciliation failed: shares sum to {sum}, bill total is {total}")]
    Reconciliation { total: Money, sum: Money },
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MalformedDate(a), Self::MalformedDate(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidTip(a), Self::InvalidTip(b)) => a == b,
            (Self::InvalidItem(a), Self::InvalidItem(b)) => a == b,
            (
                Self::Reconciliation { total: a, sum: x },
                Self::Reconciliation { total: b, sum: y },
            ) => a == b && x == y,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
