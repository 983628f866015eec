#![forbid(unsafe_code)]

//! Date inputs and min/max bounds.
//!
//! [`DateInput`] is anything a caller may hand the picker as a date: a
//! [`DateValue`], a chrono date or date-time, a millisecond timestamp or a
//! piece of text. It is only turned into a [`DateValue`] when used, with the
//! owning picker's display format available for text.
//!
//! [`Bound`] is a validated min/max limit. It is resolved on every query by
//! [`RangeResolver`](crate::range::RangeResolver), never cached.

use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use dpx_core::format::{Labels, parse_date};
use dpx_core::DateValue;

use crate::error::{PickerError, Result};
use crate::registry::InputId;

/// A value that may be read as a calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(DateValue),
    /// Truncated to its date.
    DateTime(NaiveDateTime),
    /// Milliseconds since the Unix epoch, read in the local calendar.
    Timestamp(i64),
    /// Read with the picker's format, then as ISO `YYYY-MM-DD`, then as
    /// RFC 3339 or `YYYY-MM-DDTHH:MM:SS`.
    Text(String),
}

impl DateInput {
    /// Interpret the input, returning `None` if it is not a date.
    #[must_use]
    pub fn to_date(&self, format: &str, labels: &Labels<'_>) -> Option<DateValue> {
        match self {
            Self::Date(date) => Some(*date),
            Self::DateTime(instant) => Some(DateValue::truncate(*instant)),
            Self::Timestamp(millis) => DateValue::from_timestamp_millis(*millis),
            Self::Text(text) => parse_text(text.trim(), format, labels),
        }
    }
}

fn parse_text(text: &str, format: &str, labels: &Labels<'_>) -> Option<DateValue> {
    if text.is_empty() {
        return None;
    }
    parse_date(text, format, labels)
        .or_else(|| text.parse::<DateValue>().ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| DateValue::from(dt.with_timezone(&Local).date_naive()))
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(DateValue::truncate)
        })
}

impl fmt::Display for DateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{date}"),
            Self::DateTime(instant) => write!(f, "{instant}"),
            Self::Timestamp(millis) => write!(f, "timestamp {millis}"),
            Self::Text(text) => write!(f, "{text:?}"),
        }
    }
}

impl From<DateValue> for DateInput {
    fn from(date: DateValue) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date.into())
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(instant: NaiveDateTime) -> Self {
        Self::DateTime(instant)
    }
}

impl From<i64> for DateInput {
    fn from(millis: i64) -> Self {
        Self::Timestamp(millis)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Callback producing a bound on demand.
pub type ComputedBound = Rc<dyn Fn() -> DateInput>;

/// A resolvable min/max limit.
#[derive(Clone)]
pub enum Bound {
    /// A fixed date.
    Fixed(DateValue),
    /// Follow another picker: its value shifted by one day when it has one,
    /// otherwise its own bound on the same edge.
    Linked(InputId),
    /// Ask a callback every time the bound is needed.
    Computed(ComputedBound),
}

impl Bound {
    pub fn computed(f: impl Fn() -> DateInput + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }
}

impl fmt::Debug for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(date) => f.debug_tuple("Fixed").field(date).finish(),
            Self::Linked(input) => f.debug_tuple("Linked").field(input).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// An unvalidated bound as supplied in options.
#[derive(Clone)]
pub enum BoundSpec {
    Date(DateInput),
    Linked(InputId),
    Computed(ComputedBound),
}

impl BoundSpec {
    pub fn computed(f: impl Fn() -> DateInput + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }

    /// Validate into a [`Bound`]. Only fixed dates can fail here; links and
    /// callbacks are checked when resolved.
    pub fn into_bound(self, format: &str, labels: &Labels<'_>) -> Result<Bound> {
        match self {
            Self::Date(input) => input
                .to_date(format, labels)
                .map(Bound::Fixed)
                .ok_or_else(|| PickerError::invalid_date(&input)),
            Self::Linked(input) => Ok(Bound::Linked(input)),
            Self::Computed(f) => Ok(Bound::Computed(f)),
        }
    }
}

impl fmt::Debug for BoundSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(input) => f.debug_tuple("Date").field(input).finish(),
            Self::Linked(input) => f.debug_tuple("Linked").field(input).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<DateInput> for BoundSpec {
    fn from(input: DateInput) -> Self {
        Self::Date(input)
    }
}

impl From<DateValue> for BoundSpec {
    fn from(date: DateValue) -> Self {
        Self::Date(DateInput::Date(date))
    }
}

impl From<&str> for BoundSpec {
    fn from(text: &str) -> Self {
        Self::Date(DateInput::from(text))
    }
}

impl From<InputId> for BoundSpec {
    fn from(input: InputId) -> Self {
        Self::Linked(input)
    }
}
