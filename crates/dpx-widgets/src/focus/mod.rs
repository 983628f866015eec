#![forbid(unsafe_code)]

//! Keyboard focus inside an open popup.
//!
//! [`FocusGraph`] wires arrow-key movement between the focusable parts of one
//! rendered view. [`FocusTrap`] owns the focus state of the open popup and
//! keeps Tab traversal confined to it.

mod graph;
mod trap;

pub use graph::{FocusGraph, FocusLayout, FocusTarget, NavDirection, Neighbors};
pub use trap::FocusTrap;
