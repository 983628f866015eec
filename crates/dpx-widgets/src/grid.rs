#![forbid(unsafe_code)]

//! Popup rendering: header, weekday row, cell grid and footer.
//!
//! [`render`] is a pure function from the picker state to a [`PopupView`].
//! Nothing in a view outlives the render that produced it; every navigation,
//! commit or option change renders a fresh one.
//!
//! # Layout
//!
//! | Mode   | Grid  | First cell                                  |
//! |--------|-------|---------------------------------------------|
//! | Day    | 6 × 7 | week start on or before the 1st of the month |
//! | Month  | 4 × 4 | two months before January of the year       |
//! | Decade | 4 × 4 | three years before the decade               |
//!
//! Bounds are floored to the mode's period before cells are compared with
//! them, so a month cell is enabled when any of its days is in range.

use bitflags::bitflags;
use dpx_core::format::format_date;
use dpx_core::{DateValue, Period};

use crate::focus::{FocusGraph, FocusLayout};
use crate::mode::Mode;
use crate::options::PickerOptions;
use crate::placement::Placement;

const PREV_LABEL: &str = "\u{276e}";
const NEXT_LABEL: &str = "\u{276f}";

bitflags! {
    /// State flags of one grid cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CellFlags: u8 {
        /// Outside the anchored month, year or decade.
        const OUT_OF_PERIOD = 1 << 0;
        /// Saturday or Sunday (day mode only).
        const WEEKEND       = 1 << 1;
        /// Contains today.
        const CURRENT       = 1 << 2;
        /// Contains the committed value.
        const SELECTED      = 1 << 3;
        /// Outside the resolved bounds.
        const DISABLED      = 1 << 4;
    }
}

/// One selectable period in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cell {
    /// First day of the period the cell stands for.
    pub date: DateValue,
    pub label: String,
    pub tooltip: String,
    pub flags: CellFlags,
}

impl Cell {
    #[inline]
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.flags.contains(CellFlags::DISABLED)
    }

    /// Style classes for markup hosts. Disabled state is an attribute, not a
    /// class, so it is not included.
    #[must_use]
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = vec!["dpx-item"];
        for (flag, class) in [
            (CellFlags::OUT_OF_PERIOD, "dpx-out"),
            (CellFlags::WEEKEND, "dpx-weekend"),
            (CellFlags::CURRENT, "dpx-current"),
            (CellFlags::SELECTED, "dpx-selected"),
        ] {
            if self.flags.contains(flag) {
                classes.push(class);
            }
        }
        classes
    }
}

/// A header or footer button.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Control {
    pub label: String,
    pub tooltip: String,
    /// Date the control navigates to or commits, if any.
    pub target: Option<DateValue>,
    pub disabled: bool,
}

/// A label in the weekday row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WeekdayLabel {
    pub label: String,
    pub weekend: bool,
}

/// Everything needed to draw an open popup.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PopupView {
    pub mode: Mode,
    /// Start of the displayed month, year or decade.
    pub anchor: DateValue,
    pub prev: Control,
    pub title: Control,
    pub next: Control,
    /// Empty outside day mode.
    pub weekdays: Vec<WeekdayLabel>,
    /// Row-major, `mode.cell_count()` entries.
    pub cells: Vec<Cell>,
    pub today: Option<Control>,
    pub clear: Option<Control>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub focus: FocusGraph,
    pub placement: Placement,
}

impl PopupView {
    /// Value of the `data-dpx-type` attribute.
    #[inline]
    #[must_use]
    pub fn data_attr(&self) -> &'static str {
        self.mode.data_attr()
    }

    #[must_use]
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        if col >= self.mode.cols() {
            return None;
        }
        self.cells.get(row * self.mode.cols() + col)
    }
}

/// State a popup is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub options: &'a PickerOptions,
    pub mode: Mode,
    /// Date to center on; the committed value or today when `None`.
    pub pivot: Option<DateValue>,
    pub value: Option<DateValue>,
    pub today: DateValue,
    /// Resolved bounds, not yet floored to the mode.
    pub min: DateValue,
    pub max: DateValue,
}

/// Render the popup for `input`.
#[must_use]
pub fn render(input: &RenderInput<'_>) -> PopupView {
    let RenderInput {
        options,
        mode,
        pivot,
        value,
        today,
        min,
        max,
    } = *input;

    let today_disabled = today < min || today > max;

    let period = mode.period();
    let min = min.floor(period);
    let max = max.floor(period);

    let mut pivot = pivot.or(value).unwrap_or(today);
    if pivot < min {
        pivot = min;
    } else if pivot > max {
        pivot = max;
    }

    let anchor = anchor_of(mode, pivot);
    let decade = anchor.decade_start();
    let labels = options.labels();
    let header_label = |date: DateValue| match mode {
        Mode::Day => format_date(&date, &options.title_format_month, &labels),
        Mode::Month => format_date(&date, &options.title_format_year, &labels),
        Mode::Decade => decade_label(date.decade_start()),
    };

    let title = match mode {
        Mode::Day => Control {
            label: header_label(anchor),
            tooltip: format_date(&anchor, &options.title_format_year, &labels),
            target: Some(anchor),
            disabled: false,
        },
        Mode::Month => Control {
            label: header_label(anchor),
            tooltip: decade_label(decade),
            target: Some(anchor),
            disabled: false,
        },
        Mode::Decade => Control {
            label: decade_label(decade),
            tooltip: decade_label(decade),
            target: Some(anchor),
            disabled: true,
        },
    };

    let prev_target = page(mode, anchor, -1);
    let prev = Control {
        label: PREV_LABEL.to_owned(),
        tooltip: prev_target.map(header_label).unwrap_or_default(),
        target: prev_target,
        disabled: anchor <= min || prev_target.is_none(),
    };

    let next_target = page(mode, anchor, 1);
    let next = Control {
        label: NEXT_LABEL.to_owned(),
        tooltip: next_target.map(header_label).unwrap_or_default(),
        target: next_target,
        disabled: next_target.is_none_or(|target| target > max),
    };

    let weekdays = if mode == Mode::Day {
        weekday_row(options)
    } else {
        Vec::new()
    };

    let current = today.floor(period);
    let selected = value.map(|value| value.floor(period));
    let tooltip_format = options.cell_format(mode);
    let mut cells = Vec::with_capacity(mode.cell_count());
    let mut date = grid_start(mode, anchor, options.monday_first);
    let mut exhausted = false;
    for _ in 0..mode.cell_count() {
        let mut flags = CellFlags::empty();
        let out = match mode {
            Mode::Day => date.floor(Period::Month) != anchor,
            Mode::Month => date.year() != anchor.year(),
            Mode::Decade => date.year() < decade || date.year() > decade + 9,
        };
        flags.set(CellFlags::OUT_OF_PERIOD, out);
        flags.set(CellFlags::WEEKEND, mode == Mode::Day && date.is_weekend());
        flags.set(CellFlags::CURRENT, date == current);
        flags.set(CellFlags::SELECTED, selected == Some(date));
        flags.set(CellFlags::DISABLED, exhausted || date < min || date > max);

        let label = match mode {
            Mode::Day => date.day().to_string(),
            Mode::Month => labels
                .short_months
                .get(date.month0() as usize)
                .cloned()
                .unwrap_or_default(),
            Mode::Decade => date.year().to_string(),
        };

        cells.push(Cell {
            date,
            label,
            tooltip: format_date(&date, tooltip_format, &labels),
            flags,
        });

        // Past the last representable date the grid is padded with disabled
        // copies of it.
        match date.step(period, 1) {
            Some(next) => date = next,
            None => exhausted = true,
        }
    }

    let today = options.today_button.then(|| Control {
        label: options.today_button_label.clone(),
        tooltip: options.today_button_label.clone(),
        target: Some(today),
        disabled: today_disabled,
    });
    let clear = options.clear_button.then(|| Control {
        label: options.clear_button_label.clone(),
        tooltip: options.clear_button_label.clone(),
        target: None,
        disabled: false,
    });

    let enabled: Vec<bool> = cells.iter().map(|cell| !cell.is_disabled()).collect();
    let focus = FocusGraph::build(&FocusLayout {
        prev: !prev.disabled,
        title: !title.disabled,
        next: !next.disabled,
        today: today.as_ref().is_some_and(|c| !c.disabled),
        clear: clear.is_some(),
        cells: &enabled,
        cols: mode.cols(),
    });

    PopupView {
        mode,
        anchor,
        prev,
        title,
        next,
        weekdays,
        cells,
        today,
        clear,
        focus,
        placement: Placement::default(),
    }
}

/// Start of the month, year or decade displayed around `pivot`.
#[must_use]
pub fn anchor_of(mode: Mode, pivot: DateValue) -> DateValue {
    match mode {
        Mode::Day => pivot.floor(Period::Month),
        Mode::Month => pivot.floor(Period::Year),
        Mode::Decade => {
            DateValue::year_start(pivot.decade_start()).unwrap_or_else(|| pivot.floor(Period::Year))
        }
    }
}

/// Anchor of the adjacent page in direction `steps` (±1).
fn page(mode: Mode, anchor: DateValue, steps: i32) -> Option<DateValue> {
    match mode {
        Mode::Day => anchor.add_months(steps),
        Mode::Month => anchor.add_years(steps),
        Mode::Decade => anchor.add_years(steps * 10),
    }
}

fn decade_label(start: i32) -> String {
    format!("{start} - {}", start + 9)
}

fn weekday_row(options: &PickerOptions) -> Vec<WeekdayLabel> {
    let order: Vec<usize> = if options.monday_first {
        (0..7).collect()
    } else {
        std::iter::once(6).chain(0..6).collect()
    };
    order
        .into_iter()
        .map(|index| WeekdayLabel {
            label: options
                .week_day_labels
                .get(index)
                .cloned()
                .unwrap_or_default(),
            weekend: index >= 5,
        })
        .collect()
}

fn grid_start(mode: Mode, anchor: DateValue, monday_first: bool) -> DateValue {
    let start = match mode {
        Mode::Day => {
            let dow = i64::from(anchor.days_from_sunday());
            let back = if monday_first { (dow + 6) % 7 } else { dow };
            anchor.add_days(-back)
        }
        Mode::Month => anchor.add_months(-2),
        Mode::Decade => anchor.add_years(-3),
    };
    start.unwrap_or(anchor)
}
