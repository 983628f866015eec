#![forbid(unsafe_code)]

//! Plain-text rendering of a popup, for logs, snapshots and terminal hosts.
//!
//! ```text
//! ❮      March 2024      ❯
//!  Mo  Tu  We  Th  Fr  St  Su
//!  26  27  28  29   1   2   3
//!  ...
//!       Today  Clear
//! ```
//!
//! Selected cells are bracketed, disabled cells and controls are shown as `·`.
//! Column widths are measured in terminal cells, so wide labels stay aligned.

use std::fmt;

use unicode_width::UnicodeWidthStr;

use crate::grid::{Cell, CellFlags, Control, PopupView};

const DISABLED: &str = "\u{b7}";

/// Render `view` as lines of text, without trailing whitespace.
#[must_use]
pub fn render_text(view: &PopupView) -> Vec<String> {
    let cols = view.mode.cols();
    let cell_width = view
        .cells
        .iter()
        .map(|cell| cell.label.width())
        .chain(view.weekdays.iter().map(|day| day.label.width()))
        .max()
        .unwrap_or(1)
        + 2;
    let total = cell_width * cols;

    let mut lines = Vec::with_capacity(view.cells.len() / cols.max(1) + 3);

    let prev = control_text(&view.prev);
    let next = control_text(&view.next);
    let inner = total.saturating_sub(prev.width() + next.width());
    lines.push(format!("{prev}{}{next}", center(&view.title.label, inner)));

    if !view.weekdays.is_empty() {
        lines.push(
            view.weekdays
                .iter()
                .map(|day| center(&day.label, cell_width))
                .collect(),
        );
    }

    for row in view.cells.chunks(cols.max(1)) {
        lines.push(
            row.iter()
                .map(|cell| center(&cell_text(cell), cell_width))
                .collect(),
        );
    }

    let footer: Vec<&str> = [view.today.as_ref(), view.clear.as_ref()]
        .into_iter()
        .flatten()
        .map(control_text)
        .collect();
    if !footer.is_empty() {
        lines.push(center(&footer.join("  "), total));
    }

    for line in &mut lines {
        line.truncate(line.trim_end().len());
    }
    lines
}

fn control_text(control: &Control) -> &str {
    if control.disabled {
        DISABLED
    } else {
        &control.label
    }
}

fn cell_text(cell: &Cell) -> String {
    if cell.is_disabled() {
        DISABLED.to_owned()
    } else if cell.flags.contains(CellFlags::SELECTED) {
        format!("[{}]", cell.label)
    } else {
        cell.label.clone()
    }
}

fn center(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        return text.to_owned();
    }
    let left = (width - used) / 2;
    let right = width - used - left;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

impl fmt::Display for PopupView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in render_text(self).iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{RenderInput, render};
    use crate::mode::Mode;
    use crate::options::PickerOptions;
    use dpx_core::DateValue;

    fn d(y: i32, m: u32, day: u32) -> DateValue {
        DateValue::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn day_view_layout() {
        let options = PickerOptions::default();
        let view = render(&RenderInput {
            options: &options,
            mode: Mode::Day,
            pivot: None,
            value: Some(d(2024, 3, 15)),
            today: d(2024, 3, 15),
            min: d(2024, 3, 1),
            max: DateValue::max_bound(),
        });
        let lines = render_text(&view);
        assert_eq!(lines.len(), 1 + 1 + 6 + 1);
        assert!(lines[0].starts_with(DISABLED));
        assert!(lines[0].contains("March 2024"));
        assert!(lines[0].ends_with('\u{276f}'));
        assert!(lines[1].contains("Mo"));
        // First row: Feb 26..29 are disabled, then March 1..3.
        assert_eq!(lines[2].matches(DISABLED).count(), 4);
        assert!(lines[4].contains("[15]"));
        assert!(lines[8].contains("Today  Clear"));
        assert_eq!(view.to_string().lines().count(), lines.len());
    }

    #[test]
    fn wide_labels_keep_columns_aligned() {
        let options = PickerOptions {
            short_month_labels: ["一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "十一月", "十二月"]
                .map(String::from)
                .to_vec(),
            ..PickerOptions::default()
        };
        let view = render(&RenderInput {
            options: &options,
            mode: Mode::Month,
            pivot: Some(d(2024, 6, 1)),
            value: None,
            today: d(2024, 3, 15),
            min: DateValue::min_bound(),
            max: DateValue::max_bound(),
        });
        let lines = render_text(&view);
        assert_eq!(lines.len(), 1 + 4 + 1);
        // Columns are 8 cells wide: "十一月" is 6 cells plus padding.
        assert!(lines[1..5].iter().all(|line| line.width() <= 32));
        assert!(lines[1].starts_with(" 十一月"));
        assert!(lines[2].starts_with("  三月"));
    }
}
