#![forbid(unsafe_code)]

//! Property tests for committing values against bounds.
//!
//! Run:
//!   cargo test -p dpx-widgets --test value_props

use dpx_widgets::{DateValue, HeadlessHost, InputId, OptionsPatch, PickerError, PickerRegistry};
use proptest::prelude::*;

const FIELD: InputId = InputId(1);

fn any_date() -> impl Strategy<Value = DateValue> {
    (1900i32..=2100, 1u32..=12, 1u32..=31)
        .prop_filter_map("valid calendar date", |(y, m, d)| DateValue::from_ymd(y, m, d))
}

fn bounded(min: DateValue, max: DateValue) -> PickerRegistry<HeadlessHost> {
    let mut registry = PickerRegistry::new(HeadlessHost::new());
    registry
        .picker(FIELD)
        .init(OptionsPatch::new().min_date(min).max_date(max))
        .unwrap();
    registry
}

proptest! {
    #[test]
    fn select_accepts_exactly_the_closed_range(
        min in any_date(),
        max in any_date(),
        date in any_date(),
    ) {
        let mut registry = bounded(min, max);
        let mut picker = registry.picker(FIELD);
        let result = picker.select(date);

        if min <= date && date <= max {
            prop_assert!(result.is_ok());
            prop_assert_eq!(picker.value(), Some(date));
        } else {
            prop_assert_eq!(result, Err(PickerError::OutOfRange { date, min, max }));
            prop_assert_eq!(picker.value(), None);
        }
    }

    #[test]
    fn ignoring_limits_always_commits(
        min in any_date(),
        max in any_date(),
        date in any_date(),
    ) {
        let mut registry = bounded(min, max);
        let mut picker = registry.picker(FIELD);
        prop_assert!(picker.set_value(Some(date.into()), true).is_ok());
        prop_assert_eq!(picker.value(), Some(date));
    }

    #[test]
    fn committed_text_reads_back(date in any_date(), format in prop::sample::select(vec![
        "yyyy/mm/dd", "dd.mm.yyyy", "mm/dd/yyyy", "d M yyyy", "MM d, yyyy",
    ])) {
        let mut registry = PickerRegistry::new(HeadlessHost::new());
        let mut picker = registry.picker(FIELD);
        picker.init(OptionsPatch::new().format(format)).unwrap();
        picker.select(date).unwrap();
        let text = picker.formatted_value();

        picker.clear().unwrap();
        picker.select(text.as_str()).unwrap();
        prop_assert_eq!(picker.value(), Some(date));
        prop_assert_eq!(registry.host().text(FIELD), text);
    }
}
