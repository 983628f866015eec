#![forbid(unsafe_code)]

//! Core: calendar dates, formatting, input events and geometry for DatePickX.
//!
//! # Role in DatePickX
//! `dpx-core` holds everything that does not depend on a picker instance:
//! the [`DateValue`] type and its arithmetic, the token formatter/parser used
//! for titles and committed values, the keyboard event model hosts translate
//! into, and the rectangle type used for popup placement.
//!
//! `dpx-widgets` builds the picker state machine on top of these.

pub mod date;
pub mod event;
pub mod format;
pub mod geometry;
pub mod logging;

pub use date::{DateValue, Period};
pub use format::{Labels, format_date, parse_date};
