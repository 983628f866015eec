#![forbid(unsafe_code)]

//! Resolution of min/max bounds.
//!
//! Bounds are evaluated every time they are needed. A linked bound follows
//! another picker: if that picker holds a value, the limit is the value
//! shifted one day away from it (so a start picker never reaches its end
//! picker's date), otherwise the link continues to the other picker's bound on
//! the same edge. Link chains are followed at most [`MAX_LINK_DEPTH`] hops; a
//! longer chain is treated as a cycle and falls back to the widest range.

use dpx_core::DateValue;
use dpx_core::logging::error;

use crate::bound::Bound;
use crate::error::PickerError;
use crate::options::PickerOptions;
use crate::registry::InputId;

/// Link hops followed before a bound is considered cyclic.
pub const MAX_LINK_DEPTH: usize = 32;

/// Access to other pickers while resolving links.
pub trait BoundLookup {
    /// Options and current value of the picker on `input`, if it is known.
    fn linked(&self, input: InputId) -> Option<(&PickerOptions, Option<DateValue>)>;

    /// Options assumed for link targets that have no picker yet.
    fn default_options(&self) -> &PickerOptions;
}

/// Which end of the range is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Min,
    Max,
}

impl Edge {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Unbounded limit on this edge.
    #[must_use]
    pub fn fallback(self) -> DateValue {
        match self {
            Self::Min => DateValue::min_bound(),
            Self::Max => DateValue::max_bound(),
        }
    }

    /// Days a linked value is shifted by.
    const fn shift(self) -> i64 {
        match self {
            Self::Min => 1,
            Self::Max => -1,
        }
    }
}

/// Resolves bounds against a [`BoundLookup`].
pub struct RangeResolver<'a, L: ?Sized> {
    lookup: &'a L,
}

impl<'a, L: BoundLookup + ?Sized> RangeResolver<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Effective lower limit of the picker on `input`.
    #[must_use]
    pub fn min(&self, input: InputId) -> DateValue {
        self.resolve(input, Edge::Min)
    }

    /// Effective upper limit of the picker on `input`.
    #[must_use]
    pub fn max(&self, input: InputId) -> DateValue {
        self.resolve(input, Edge::Max)
    }

    #[must_use]
    pub fn range(&self, input: InputId) -> (DateValue, DateValue) {
        (self.min(input), self.max(input))
    }

    #[must_use]
    pub fn resolve(&self, input: InputId, edge: Edge) -> DateValue {
        let mut current = input;
        for _ in 0..=MAX_LINK_DEPTH {
            let options = self
                .lookup
                .linked(current)
                .map_or_else(|| self.lookup.default_options(), |(options, _)| options);
            let bound = match edge {
                Edge::Min => &options.min_date,
                Edge::Max => &options.max_date,
            };

            match bound {
                Bound::Fixed(date) => return *date,
                Bound::Computed(compute) => {
                    let input_value = compute();
                    return match input_value.to_date(&options.format, &options.labels()) {
                        Some(date) => date,
                        None => {
                            let err = PickerError::InvalidBound {
                                input: current,
                                edge: edge.name(),
                            };
                            error!(%err, value = %input_value, "using unbounded limit");
                            edge.fallback()
                        }
                    };
                }
                Bound::Linked(target) => {
                    let value = self.lookup.linked(*target).and_then(|(_, value)| value);
                    if let Some(value) = value {
                        return value.add_days(edge.shift()).unwrap_or(value);
                    }
                    current = *target;
                }
            }
        }

        let err = PickerError::BoundCycle {
            input,
            edge: edge.name(),
            depth: MAX_LINK_DEPTH,
        };
        error!(%err, "using unbounded limit");
        edge.fallback()
    }
}
