#![no_main]

use dpx_core::format::{Labels, format_date, parse_date};
use libfuzzer_sys::fuzz_target;

const WEEK_DAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "St", "Su"];
const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fuzz_target!(|data: &[u8]| {
    // First line is the format, the rest is the text to parse.
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if input.len() > 1024 {
        return;
    }
    let (format, text) = input.split_once('\n').unwrap_or((input, ""));

    let (week_days, short_months, months) = (owned(&WEEK_DAYS), owned(&SHORT_MONTHS), owned(&MONTHS));
    let labels = Labels {
        week_days: &week_days,
        short_months: &short_months,
        months: &months,
    };

    // Parsing must never panic.
    let Some(date) = parse_date(text, format, &labels) else {
        return;
    };

    // Anything that parses formats without panicking, and formatting is
    // stable for the parsed date.
    let once = format_date(&date, format, &labels);
    let twice = format_date(&date, format, &labels);
    assert_eq!(once, twice, "format_date must be deterministic");
});
