#![forbid(unsafe_code)]

//! Property tests for date truncation and the format/parse pair.
//!
//! Run:
//!   cargo test -p dpx-core --test date_props

use chrono::{NaiveDate, NaiveTime};
use dpx_core::format::{Labels, format_date, parse_date};
use dpx_core::{DateValue, Period};
use proptest::prelude::*;

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn any_date() -> impl Strategy<Value = DateValue> {
    (0i32..=9999, 1u32..=12, 1u32..=31).prop_filter_map("valid calendar date", |(y, m, d)| {
        DateValue::from_ymd(y, m, d)
    })
}

fn numeric_format() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "yyyy/mm/dd",
        "yyyy-mm-dd",
        "dd.mm.yyyy",
        "mm/dd/yyyy",
        "d/m/yyyy",
        "yyyy m d",
    ])
}

proptest! {
    #[test]
    fn truncation_is_idempotent(date in any_date(), secs in 0u32..86_400) {
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap();
        let instant = date.naive().and_time(time);
        let once = DateValue::truncate(instant);
        prop_assert_eq!(once, date);
        prop_assert_eq!(DateValue::truncate(once.midnight()), once);
        prop_assert_eq!(once.midnight().time(), NaiveTime::MIN);
    }

    #[test]
    fn floor_never_moves_forward(date in any_date()) {
        for period in [Period::Day, Period::Month, Period::Year] {
            let floored = date.floor(period);
            prop_assert!(floored <= date);
            prop_assert_eq!(floored.floor(period), floored);
        }
    }

    #[test]
    fn numeric_formats_round_trip(date in any_date(), format in numeric_format()) {
        let week_days = owned(&["Mo", "Tu", "We", "Th", "Fr", "St", "Su"]);
        let months: Vec<String> = (1..=12).map(|m| format!("M{m}")).collect();
        let labels = Labels { week_days: &week_days, short_months: &months, months: &months };

        let text = format_date(&date, format, &labels);
        prop_assert_eq!(parse_date(&text, format, &labels), Some(date), "text was {}", text);
    }
}

#[test]
fn leap_day_round_trips() {
    let week_days = owned(&["Mo", "Tu", "We", "Th", "Fr", "St", "Su"]);
    let months = owned(&[
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ]);
    let labels = Labels {
        week_days: &week_days,
        short_months: &months,
        months: &months,
    };
    let leap = DateValue::from(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    let text = format_date(&leap, "yyyy/mm/dd", &labels);
    assert_eq!(text, "2024/02/29");
    assert_eq!(parse_date(&text, "yyyy/mm/dd", &labels), Some(leap));
}
