#![forbid(unsafe_code)]

//! Token-based date formatting and the matching parser.
//!
//! A format string is scanned left to right. At every position the scanner
//! tries, in order: a run of one or two characters from `d`, `m`, `M`; a single
//! `D`; `yyyy`; `yy`. Anything else is a literal character.
//!
//! | Token  | Output                                   |
//! |--------|------------------------------------------|
//! | `d`    | day of month                             |
//! | `dd`   | day of month, two digits                 |
//! | `D`    | week day label (Monday is label 0)       |
//! | `m`    | month number                             |
//! | `mm`   | month number, two digits                 |
//! | `M`    | short month label                        |
//! | `MM`   | full month label                         |
//! | `yy`   | last two digits of the year              |
//! | `yyyy` | full year                                |
//!
//! Mixed runs such as `dm` or `Md` are scanned as one token that has no
//! meaning, so they are copied to the output unchanged.

use crate::date::DateValue;

/// Label tables used by the `D`, `M` and `MM` tokens.
#[derive(Debug, Clone, Copy)]
pub struct Labels<'a> {
    /// Seven week day labels, Monday first.
    pub week_days: &'a [String],
    /// Twelve short month labels, January first.
    pub short_months: &'a [String],
    /// Twelve full month labels, January first.
    pub months: &'a [String],
}

impl<'a> Labels<'a> {
    fn week_day(&self, date: &DateValue) -> &'a str {
        // Sunday is the last label.
        let index = match date.days_from_sunday() {
            0 => 6,
            n => n as usize - 1,
        };
        label_at(self.week_days, index)
    }
}

fn label_at(labels: &[String], index: usize) -> &str {
    labels.get(index).map_or("", String::as_str)
}

/// A scanned piece of a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(&'a str),
    Day,
    DayPadded,
    WeekDay,
    Month,
    MonthPadded,
    MonthShort,
    MonthFull,
    YearShort,
    YearFull,
}

/// Split a format string into tokens.
#[must_use]
pub fn tokenize(format: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = format;

    while let Some(first) = rest.chars().next() {
        let len = if matches!(first, 'd' | 'm' | 'M') {
            let run = if rest[1..].starts_with(['d', 'm', 'M']) { 2 } else { 1 };
            tokens.push(match &rest[..run] {
                "d" => Token::Day,
                "dd" => Token::DayPadded,
                "m" => Token::Month,
                "mm" => Token::MonthPadded,
                "M" => Token::MonthShort,
                "MM" => Token::MonthFull,
                other => Token::Literal(other),
            });
            run
        } else if first == 'D' {
            tokens.push(Token::WeekDay);
            1
        } else if rest.starts_with("yyyy") {
            tokens.push(Token::YearFull);
            4
        } else if rest.starts_with("yy") {
            tokens.push(Token::YearShort);
            2
        } else {
            let width = first.len_utf8();
            tokens.push(Token::Literal(&rest[..width]));
            width
        };
        rest = &rest[len..];
    }

    tokens
}

/// Render `date` according to `format`.
#[must_use]
pub fn format_date(date: &DateValue, format: &str, labels: &Labels<'_>) -> String {
    let mut out = String::with_capacity(format.len() + 8);
    for token in tokenize(format) {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Day => out.push_str(&date.day().to_string()),
            Token::DayPadded => out.push_str(&format!("{:02}", date.day())),
            Token::WeekDay => out.push_str(labels.week_day(date)),
            Token::Month => out.push_str(&date.month().to_string()),
            Token::MonthPadded => out.push_str(&format!("{:02}", date.month())),
            Token::MonthShort => out.push_str(label_at(labels.short_months, date.month0() as usize)),
            Token::MonthFull => out.push_str(label_at(labels.months, date.month0() as usize)),
            Token::YearShort => {
                let year = date.year().to_string();
                let start = year.len().saturating_sub(2);
                out.push_str(&year[start..]);
            }
            Token::YearFull => out.push_str(&date.year().to_string()),
        }
    }
    out
}

/// Read text written by [`format_date`] back into a date.
///
/// A year token is required; missing month or day tokens default to 1. Two
/// digit years are read as 20xx. Week day labels are accepted and ignored.
#[must_use]
pub fn parse_date(text: &str, format: &str, labels: &Labels<'_>) -> Option<DateValue> {
    let mut rest = text.trim();
    let mut year = None;
    let mut month = 1;
    let mut day = 1;

    for token in tokenize(format) {
        match token {
            Token::Literal(lit) => rest = rest.strip_prefix(lit)?,
            Token::Day => day = take_number(&mut rest, 1, 2)?,
            Token::DayPadded => day = take_number(&mut rest, 2, 2)?,
            Token::Month => month = take_number(&mut rest, 1, 2)?,
            Token::MonthPadded => month = take_number(&mut rest, 2, 2)?,
            Token::MonthShort => month = take_label(&mut rest, labels.short_months)? as u32 + 1,
            Token::MonthFull => month = take_label(&mut rest, labels.months)? as u32 + 1,
            Token::WeekDay => {
                take_label(&mut rest, labels.week_days)?;
            }
            Token::YearShort => year = Some(2000 + take_number(&mut rest, 1, 2)? as i32),
            Token::YearFull => {
                let negative = rest.starts_with('-');
                if negative {
                    rest = &rest[1..];
                }
                let value = take_number(&mut rest, 1, 4)? as i32;
                year = Some(if negative { -value } else { value });
            }
        }
    }

    if !rest.is_empty() {
        return None;
    }
    DateValue::from_ymd(year?, month, day)
}

fn take_number(rest: &mut &str, min: usize, max: usize) -> Option<u32> {
    let digits = rest
        .bytes()
        .take(max)
        .take_while(u8::is_ascii_digit)
        .count();
    if digits < min {
        return None;
    }
    let value = rest[..digits].parse().ok()?;
    *rest = &rest[digits..];
    Some(value)
}

/// Match the longest label that prefixes `rest`, returning its index.
fn take_label(rest: &mut &str, labels: &[String]) -> Option<usize> {
    let (index, label) = labels
        .iter()
        .enumerate()
        .filter(|(_, label)| !label.is_empty() && rest.starts_with(label.as_str()))
        .max_by_key(|(_, label)| label.len())?;
    *rest = &rest[label.len()..];
    Some(index)
}
