#![forbid(unsafe_code)]

//! Calendar view modes.
//!
//! The popup shows one of three zoom levels. Clicking the title zooms out
//! (`Day -> Month -> Decade`), clicking a cell zooms back in; selecting a day
//! commits the value.

use dpx_core::Period;

/// Zoom level of the popup. Ordered from widest to narrowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Sixteen years around a decade.
    Decade,
    /// Sixteen months around a year.
    Month,
    /// Six weeks around a month.
    #[default]
    Day,
}

impl Mode {
    /// Next mode when a cell is activated, or `None` when a day is picked.
    #[must_use]
    pub const fn drill_down(self) -> Option<Self> {
        match self {
            Self::Decade => Some(Self::Month),
            Self::Month => Some(Self::Day),
            Self::Day => None,
        }
    }

    /// Next mode when the title is activated; `None` at the widest level.
    #[must_use]
    pub const fn drill_up(self) -> Option<Self> {
        match self {
            Self::Day => Some(Self::Month),
            Self::Month => Some(Self::Decade),
            Self::Decade => None,
        }
    }

    /// Value of the popup's `data-dpx-type` attribute.
    #[must_use]
    pub const fn data_attr(self) -> &'static str {
        match self {
            Self::Decade => "year",
            Self::Month => "month",
            Self::Day => "day",
        }
    }

    /// Granularity of one cell.
    #[must_use]
    pub const fn period(self) -> Period {
        match self {
            Self::Decade => Period::Year,
            Self::Month => Period::Month,
            Self::Day => Period::Day,
        }
    }

    #[must_use]
    pub const fn rows(self) -> usize {
        match self {
            Self::Day => 6,
            Self::Month | Self::Decade => 4,
        }
    }

    #[must_use]
    pub const fn cols(self) -> usize {
        match self {
            Self::Day => 7,
            Self::Month | Self::Decade => 4,
        }
    }

    /// Number of cells in the grid.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.rows() * self.cols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drilling_walks_the_ladder() {
        assert_eq!(Mode::default(), Mode::Day);
        assert_eq!(Mode::Day.drill_up(), Some(Mode::Month));
        assert_eq!(Mode::Month.drill_up(), Some(Mode::Decade));
        assert_eq!(Mode::Decade.drill_up(), None);
        assert_eq!(Mode::Decade.drill_down(), Some(Mode::Month));
        assert_eq!(Mode::Day.drill_down(), None);
        assert!(Mode::Decade < Mode::Month && Mode::Month < Mode::Day);
    }

    #[test]
    fn grid_sizes() {
        assert_eq!(Mode::Day.cell_count(), 42);
        assert_eq!(Mode::Month.cell_count(), 16);
        assert_eq!(Mode::Decade.cell_count(), 16);
        assert_eq!(Mode::Decade.data_attr(), "year");
    }
}
