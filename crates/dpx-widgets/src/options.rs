#![forbid(unsafe_code)]

//! Picker configuration.
//!
//! [`PickerOptions`] is the complete, validated configuration of one picker.
//! Changes arrive as an [`OptionsPatch`], either built in code or read from
//! JSON with the camelCase keys of the classic browser widget. Each field of a
//! patch is validated on its own: a rejected field is logged, reported back to
//! the caller and leaves the previous value in place, while the remaining
//! fields still apply.

use dpx_core::format::Labels;
use dpx_core::logging::{error, warn};
use dpx_core::DateValue;
use serde_json::Value;

use crate::bound::{Bound, BoundSpec, DateInput};
use crate::error::{PickerError, Result};
use crate::mode::Mode;
use crate::registry::InputId;

pub const WEEK_DAY_COUNT: usize = 7;
pub const MONTH_COUNT: usize = 12;

const WEEK_DAY_LABELS: [&str; WEEK_DAY_COUNT] = ["Mo", "Tu", "We", "Th", "Fr", "St", "Su"];
const SHORT_MONTH_LABELS: [&str; MONTH_COUNT] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTH_LABELS: [&str; MONTH_COUNT] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn owned(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| (*s).to_owned()).collect()
}

/// Validated configuration of a picker.
#[derive(Debug, Clone)]
pub struct PickerOptions {
    /// Start weeks on Monday instead of Sunday.
    pub monday_first: bool,
    /// Format of the committed value written to the field.
    pub format: String,
    pub min_date: Bound,
    pub max_date: Bound,
    /// Seven labels, Monday first.
    pub week_day_labels: Vec<String>,
    pub short_month_labels: Vec<String>,
    pub single_month_labels: Vec<String>,
    pub today_button: bool,
    pub today_button_label: String,
    pub clear_button: bool,
    pub clear_button_label: String,
    pub title_format_day: String,
    pub title_format_month: String,
    pub title_format_year: String,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            monday_first: true,
            format: "yyyy/mm/dd".to_owned(),
            min_date: Bound::Fixed(DateValue::min_bound()),
            max_date: Bound::Fixed(DateValue::max_bound()),
            week_day_labels: owned(&WEEK_DAY_LABELS),
            short_month_labels: owned(&SHORT_MONTH_LABELS),
            single_month_labels: owned(&MONTH_LABELS),
            today_button: true,
            today_button_label: "Today".to_owned(),
            clear_button: true,
            clear_button_label: "Clear".to_owned(),
            title_format_day: "MM dd, yyyy".to_owned(),
            title_format_month: "MM yyyy".to_owned(),
            title_format_year: "yyyy".to_owned(),
        }
    }
}

impl PickerOptions {
    /// Label tables for the formatter.
    #[must_use]
    pub fn labels(&self) -> Labels<'_> {
        Labels {
            week_days: &self.week_day_labels,
            short_months: &self.short_month_labels,
            months: &self.single_month_labels,
        }
    }

    /// Format used for cell tooltips in `mode`.
    #[must_use]
    pub fn cell_format(&self, mode: Mode) -> &str {
        match mode {
            Mode::Decade => &self.title_format_year,
            Mode::Month => &self.title_format_month,
            Mode::Day => &self.title_format_day,
        }
    }

    /// Apply every valid field of `patch` and return the rejected ones.
    ///
    /// Label arrays shorter than required are rejected; longer arrays are
    /// truncated. Bounds given as dates are read with the (possibly updated)
    /// display format. Each rejection is logged here.
    pub fn apply(&mut self, patch: OptionsPatch) -> Vec<PickerError> {
        let OptionsPatch {
            monday_first,
            format,
            min_date,
            max_date,
            week_day_labels,
            short_month_labels,
            single_month_labels,
            today_button,
            today_button_label,
            clear_button,
            clear_button_label,
            title_format_day,
            title_format_month,
            title_format_year,
            mut rejected,
        } = patch;

        assign(&mut self.monday_first, monday_first);
        assign(&mut self.format, format);
        assign(&mut self.today_button, today_button);
        assign(&mut self.today_button_label, today_button_label);
        assign(&mut self.clear_button, clear_button);
        assign(&mut self.clear_button_label, clear_button_label);
        assign(&mut self.title_format_day, title_format_day);
        assign(&mut self.title_format_month, title_format_month);
        assign(&mut self.title_format_year, title_format_year);

        for (option, target, labels, expected) in [
            (
                "weekDayLabels",
                &mut self.week_day_labels,
                week_day_labels,
                WEEK_DAY_COUNT,
            ),
            (
                "shortMonthLabels",
                &mut self.short_month_labels,
                short_month_labels,
                MONTH_COUNT,
            ),
            (
                "singleMonthLabels",
                &mut self.single_month_labels,
                single_month_labels,
                MONTH_COUNT,
            ),
        ] {
            let Some(mut labels) = labels else { continue };
            if labels.len() < expected {
                rejected.push(PickerError::InvalidOptionLength {
                    option,
                    expected,
                    found: labels.len(),
                });
                continue;
            }
            labels.truncate(expected);
            *target = labels;
        }

        if let Some(spec) = min_date {
            match spec.into_bound(&self.format, &self.labels()) {
                Ok(bound) => self.min_date = bound,
                Err(err) => rejected.push(err),
            }
        }
        if let Some(spec) = max_date {
            match spec.into_bound(&self.format, &self.labels()) {
                Ok(bound) => self.max_date = bound,
                Err(err) => rejected.push(err),
            }
        }

        for err in &rejected {
            if err.is_warning() {
                warn!(%err, "option rejected, keeping previous value");
            } else {
                error!(%err, "option rejected, keeping previous value");
            }
        }
        rejected
    }
}

fn assign<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// A set of optional option overrides.
#[derive(Debug, Clone, Default)]
pub struct OptionsPatch {
    pub monday_first: Option<bool>,
    pub format: Option<String>,
    pub min_date: Option<BoundSpec>,
    pub max_date: Option<BoundSpec>,
    pub week_day_labels: Option<Vec<String>>,
    pub short_month_labels: Option<Vec<String>>,
    pub single_month_labels: Option<Vec<String>>,
    pub today_button: Option<bool>,
    pub today_button_label: Option<String>,
    pub clear_button: Option<bool>,
    pub clear_button_label: Option<String>,
    pub title_format_day: Option<String>,
    pub title_format_month: Option<String>,
    pub title_format_year: Option<String>,
    /// Fields already rejected while reading the patch (JSON input).
    rejected: Vec<PickerError>,
}

impl OptionsPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn monday_first(mut self, monday_first: bool) -> Self {
        self.monday_first = Some(monday_first);
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Lower limit: a date, another picker's [`InputId`], or a [`BoundSpec`].
    #[must_use]
    pub fn min_date(mut self, bound: impl Into<BoundSpec>) -> Self {
        self.min_date = Some(bound.into());
        self
    }

    /// Upper limit: a date, another picker's [`InputId`], or a [`BoundSpec`].
    #[must_use]
    pub fn max_date(mut self, bound: impl Into<BoundSpec>) -> Self {
        self.max_date = Some(bound.into());
        self
    }

    #[must_use]
    pub fn week_day_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.week_day_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn short_month_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.short_month_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn single_month_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.single_month_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn today_button(mut self, enabled: bool) -> Self {
        self.today_button = Some(enabled);
        self
    }

    #[must_use]
    pub fn today_button_label(mut self, label: impl Into<String>) -> Self {
        self.today_button_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn clear_button(mut self, enabled: bool) -> Self {
        self.clear_button = Some(enabled);
        self
    }

    #[must_use]
    pub fn clear_button_label(mut self, label: impl Into<String>) -> Self {
        self.clear_button_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn title_format_day(mut self, format: impl Into<String>) -> Self {
        self.title_format_day = Some(format.into());
        self
    }

    #[must_use]
    pub fn title_format_month(mut self, format: impl Into<String>) -> Self {
        self.title_format_month = Some(format.into());
        self
    }

    #[must_use]
    pub fn title_format_year(mut self, format: impl Into<String>) -> Self {
        self.title_format_year = Some(format.into());
        self
    }

    /// Read a patch from a JSON object with camelCase keys.
    ///
    /// Fails only if `value` is not an object. Unknown keys and values of the
    /// wrong JSON type are skipped and reported when the patch is applied.
    /// `minDate`/`maxDate` accept a date string, a millisecond timestamp or
    /// `{"input": <id>}` to link to another picker.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(PickerError::InvalidConfigType {
                found: json_kind(value),
            });
        };

        let mut patch = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "mondayFirst" => patch.monday_first = patch.read_bool(key, value),
                "format" => patch.format = patch.read_string(key, value),
                "minDate" => patch.min_date = patch.read_bound(key, value),
                "maxDate" => patch.max_date = patch.read_bound(key, value),
                "weekDayLabels" => patch.week_day_labels = patch.read_labels(key, value),
                "shortMonthLabels" => patch.short_month_labels = patch.read_labels(key, value),
                "singleMonthLabels" => patch.single_month_labels = patch.read_labels(key, value),
                "todayButton" => patch.today_button = patch.read_bool(key, value),
                "todayButtonLabel" => patch.today_button_label = patch.read_string(key, value),
                "clearButton" => patch.clear_button = patch.read_bool(key, value),
                "clearButtonLabel" => patch.clear_button_label = patch.read_string(key, value),
                "titleFormatDay" => patch.title_format_day = patch.read_string(key, value),
                "titleFormatMonth" => patch.title_format_month = patch.read_string(key, value),
                "titleFormatYear" => patch.title_format_year = patch.read_string(key, value),
                other => patch.rejected.push(PickerError::UnknownOption {
                    option: other.to_owned(),
                }),
            }
        }
        Ok(patch)
    }

    fn mismatch<T>(&mut self, key: &str, expected: &'static str) -> Option<T> {
        self.rejected.push(PickerError::InvalidOptionType {
            option: key.to_owned(),
            expected,
        });
        None
    }

    fn read_bool(&mut self, key: &str, value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => self.mismatch(key, "boolean"),
        }
    }

    fn read_string(&mut self, key: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => self.mismatch(key, "string"),
        }
    }

    fn read_labels(&mut self, key: &str, value: &Value) -> Option<Vec<String>> {
        let labels = value.as_array().and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
        });
        match labels {
            Some(labels) => Some(labels),
            None => self.mismatch(key, "array of strings"),
        }
    }

    fn read_bound(&mut self, key: &str, value: &Value) -> Option<BoundSpec> {
        match value {
            Value::String(text) => Some(BoundSpec::Date(DateInput::Text(text.clone()))),
            Value::Number(n) => match n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)) {
                Some(millis) => Some(BoundSpec::Date(DateInput::Timestamp(millis))),
                None => self.mismatch(key, "date"),
            },
            Value::Object(link) => match link.get("input").and_then(Value::as_u64) {
                Some(id) => Some(BoundSpec::Linked(InputId(id))),
                None => self.mismatch(key, "{\"input\": <id>}"),
            },
            _ => self.mismatch(key, "date string, timestamp or {\"input\": <id>}"),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> DateValue {
        DateValue::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn defaults_match_classic_widget() {
        let options = PickerOptions::default();
        assert!(options.monday_first);
        assert_eq!(options.format, "yyyy/mm/dd");
        assert_eq!(options.week_day_labels.len(), WEEK_DAY_COUNT);
        assert_eq!(options.single_month_labels[11], "December");
        assert!(matches!(options.min_date, Bound::Fixed(date) if date == DateValue::min_bound()));
        assert!(matches!(options.max_date, Bound::Fixed(date) if date == DateValue::max_bound()));
        assert_eq!(options.cell_format(Mode::Day), "MM dd, yyyy");
        assert_eq!(options.cell_format(Mode::Decade), "yyyy");
    }

    #[test]
    fn valid_fields_apply_independently_of_rejected_ones() {
        let mut options = PickerOptions::default();
        let rejected = options.apply(
            OptionsPatch::new()
                .monday_first(false)
                .week_day_labels(["a", "b"])
                .min_date("not a date")
                .max_date(d(2030, 1, 1)),
        );
        assert_eq!(rejected.len(), 2);
        assert!(!options.monday_first);
        assert_eq!(options.week_day_labels[0], "Mo");
        assert!(matches!(options.min_date, Bound::Fixed(date) if date == DateValue::min_bound()));
        assert!(matches!(options.max_date, Bound::Fixed(date) if date == d(2030, 1, 1)));
    }

    #[test]
    fn long_label_arrays_are_truncated() {
        let mut options = PickerOptions::default();
        let labels: Vec<String> = (0..10).map(|i| format!("d{i}")).collect();
        assert!(options.apply(OptionsPatch::new().week_day_labels(labels)).is_empty());
        assert_eq!(options.week_day_labels.len(), WEEK_DAY_COUNT);
        assert_eq!(options.week_day_labels[6], "d6");
    }

    #[test]
    fn bound_text_uses_new_format() {
        let mut options = PickerOptions::default();
        let rejected = options.apply(OptionsPatch::new().format("dd.mm.yyyy").min_date("05.04.2022"));
        assert!(rejected.is_empty());
        assert!(matches!(options.min_date, Bound::Fixed(date) if date == d(2022, 4, 5)));
    }

    #[test]
    fn json_non_object_is_rejected() {
        let err = OptionsPatch::from_json(&json!([1, 2])).unwrap_err();
        assert_eq!(err, PickerError::InvalidConfigType { found: "array" });
    }

    #[test]
    fn json_reports_unknown_and_mistyped_keys() {
        let patch = OptionsPatch::from_json(&json!({
            "mondayFirst": "yes",
            "todayButton": false,
            "color": "red",
            "shortMonthLabels": ["Jan", 2],
            "minDate": {"input": 4},
            "maxDate": "2021-12-31",
        }))
        .unwrap();
        assert_eq!(patch.today_button, Some(false));
        assert!(patch.monday_first.is_none());
        assert!(matches!(patch.min_date, Some(BoundSpec::Linked(InputId(4)))));

        let mut options = PickerOptions::default();
        let rejected = options.apply(patch);
        assert_eq!(rejected.len(), 3);
        assert!(rejected.contains(&PickerError::UnknownOption {
            option: "color".into()
        }));
        assert!(rejected.contains(&PickerError::InvalidOptionType {
            option: "mondayFirst".into(),
            expected: "boolean",
        }));
        assert!(!options.today_button);
        assert!(matches!(options.min_date, Bound::Linked(InputId(4))));
        assert!(matches!(options.max_date, Bound::Fixed(date) if date == d(2021, 12, 31)));
    }
}
