#![forbid(unsafe_code)]

//! Errors reported by picker operations.
//!
//! Every public operation logs its error before returning it, so callers that
//! only care about success can test `is_ok()` and rely on the log for detail.

use dpx_core::DateValue;
use thiserror::Error;

use crate::registry::InputId;

pub type Result<T> = std::result::Result<T, PickerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
    #[error("date picker on {input} has already been initiated")]
    AlreadyInitiated { input: InputId },

    #[error("date picker on {input} has not been initiated yet")]
    NotInitiated { input: InputId },

    #[error("options must be an object, got {found}")]
    InvalidConfigType { found: &'static str },

    #[error("option `{option}` has invalid type: expected {expected}")]
    InvalidOptionType {
        option: String,
        expected: &'static str,
    },

    #[error("option `{option}` needs at least {expected} entries, got {found}")]
    InvalidOptionLength {
        option: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("cannot convert {input} to a date")]
    InvalidDateValue { input: String },

    #[error("date {date} is outside the acceptable range {min}..={max}")]
    OutOfRange {
        date: DateValue,
        min: DateValue,
        max: DateValue,
    },

    #[error("option `{option}` doesn't exist")]
    UnknownOption { option: String },

    #[error("{edge} bound of {input} computed an invalid date")]
    InvalidBound { input: InputId, edge: &'static str },

    #[error("{edge} bound of {input} links through more than {depth} pickers")]
    BoundCycle {
        input: InputId,
        edge: &'static str,
        depth: usize,
    },
}

impl PickerError {
    /// Rejections that are logged at warning level rather than as errors.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::InvalidOptionLength { .. })
    }

    pub(crate) fn invalid_date(input: impl std::fmt::Display) -> Self {
        Self::InvalidDateValue {
            input: input.to_string(),
        }
    }
}
