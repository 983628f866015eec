#![forbid(unsafe_code)]

//! Date picker widgets for DatePickX.
//!
//! A [`PickerRegistry`] owns one picker per bound field and talks to the
//! environment through a [`Host`]. Each picker renders a [`PopupView`] (header,
//! weekday row, cell grid, footer and the keyboard [`FocusGraph`] over them)
//! that the host draws however it likes.
//!
//! ```
//! use dpx_widgets::{HeadlessHost, InputId, OptionsPatch, PickerRegistry};
//!
//! let mut registry = PickerRegistry::new(HeadlessHost::new());
//! let mut picker = registry.picker(InputId(1));
//! picker.init(OptionsPatch::new().format("yyyy-mm-dd")).unwrap();
//! picker.select("2024-03-15").unwrap();
//! assert_eq!(picker.formatted_value(), "2024-03-15");
//! ```

pub mod bound;
pub mod controller;
pub mod error;
pub mod focus;
pub mod global;
pub mod grid;
pub mod host;
pub mod mode;
pub mod options;
pub mod placement;
pub mod range;
pub mod registry;
pub mod text;

pub use bound::{Bound, BoundSpec, DateInput};
pub use controller::{Picker, WidgetState};
pub use error::{PickerError, Result};
pub use focus::{FocusGraph, FocusTarget, FocusTrap, NavDirection};
pub use grid::{Cell, CellFlags, Control, PopupView, RenderInput, render};
pub use host::{ChangeEvent, Clock, FixedClock, HeadlessHost, Host, LocalClock};
pub use mode::Mode;
pub use options::{OptionsPatch, PickerOptions};
pub use placement::{Placement, PopupAnchor};
pub use range::{BoundLookup, Edge, RangeResolver};
pub use registry::{InputId, ListenerId, PickerEvent, PickerRegistry};
pub use text::render_text;

pub use dpx_core::DateValue;
