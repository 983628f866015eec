#![forbid(unsafe_code)]

//! Option validation and the log records it produces.
//!
//! Every rejected option is logged once; valid fields in the same call still
//! apply. Records are captured with a `tracing_subscriber` layer scoped to
//! each test.
//!
//! Run:
//!   cargo test -p dpx-widgets --test option_validation

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dpx_widgets::{DateValue, HeadlessHost, InputId, OptionsPatch, PickerError, PickerRegistry};
use serde_json::json;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

const FIELD: InputId = InputId(1);

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn err(&self) -> &str {
        self.fields.get("err").map_or("", String::as_str)
    }
}

#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

/// Run `f`, returning its result and the warnings and errors it logged.
fn with_capture<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let capture = EventCapture::default();
    let events = Arc::clone(&capture.events);
    let subscriber = tracing_subscriber::registry().with(capture);
    let result = tracing::subscriber::with_default(subscriber, f);
    let events = events
        .lock()
        .unwrap()
        .iter()
        .filter(|event| event.level <= Level::WARN)
        .cloned()
        .collect();
    (result, events)
}

fn registry() -> PickerRegistry<HeadlessHost> {
    PickerRegistry::new(HeadlessHost::new())
}

#[test]
fn unknown_and_mistyped_options_are_logged_and_skipped() {
    let mut registry = registry();
    let (rejected, events) = with_capture(|| {
        registry.picker(FIELD).init_json(&json!({
            "format": "dd/mm/yyyy",
            "mondayFirst": "yes",
            "colour": "red",
        }))
    });
    let rejected = rejected.unwrap();

    assert_eq!(rejected.len(), 2);
    assert!(rejected.contains(&PickerError::UnknownOption {
        option: "colour".to_owned()
    }));
    assert!(rejected.contains(&PickerError::InvalidOptionType {
        option: "mondayFirst".to_owned(),
        expected: "boolean",
    }));

    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|event| event.level == Level::ERROR));
    assert!(events.iter().any(|event| event.err().contains("`colour` doesn't exist")));

    let state = registry.state(FIELD).unwrap();
    assert_eq!(state.options().format, "dd/mm/yyyy");
    assert!(state.options().monday_first);
}

#[test]
fn short_label_arrays_are_warnings() {
    let mut registry = registry();
    registry.picker(FIELD).init(OptionsPatch::new()).unwrap();

    let (rejected, events) = with_capture(|| {
        registry
            .picker(FIELD)
            .update_options(OptionsPatch::new().week_day_labels(["Mo", "Tu"]))
    });
    assert_eq!(
        rejected.unwrap(),
        [PickerError::InvalidOptionLength {
            option: "weekDayLabels",
            expected: 7,
            found: 2,
        }]
    );
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::WARN);
    assert_eq!(registry.state(FIELD).unwrap().options().week_day_labels[6], "Su");
}

#[test]
fn long_label_arrays_are_truncated() {
    let mut registry = registry();
    let labels: Vec<String> = (1..=14).map(|i| format!("M{i}")).collect();
    let (rejected, events) = with_capture(|| {
        registry
            .picker(FIELD)
            .init(OptionsPatch::new().short_month_labels(labels))
    });
    assert!(rejected.unwrap().is_empty());
    assert!(events.is_empty());
    let options = registry.state(FIELD).unwrap().options().clone();
    assert_eq!(options.short_month_labels.len(), 12);
    assert_eq!(options.short_month_labels[11], "M12");
}

#[test]
fn invalid_bound_keeps_previous_bound() {
    let mut registry = registry();
    let (rejected, _) = with_capture(|| {
        registry
            .picker(FIELD)
            .init(OptionsPatch::new().min_date("2021/02/03").max_date("someday"))
    });
    let rejected = rejected.unwrap();
    assert_eq!(rejected.len(), 1);
    assert!(matches!(rejected[0], PickerError::InvalidDateValue { .. }));

    let picker = registry.picker(FIELD);
    assert_eq!(picker.min_date(), DateValue::from_ymd(2021, 2, 3).unwrap());
    assert_eq!(picker.max_date(), DateValue::max_bound());
}

#[test]
fn non_object_config_fails_the_whole_call() {
    let mut registry = registry();
    let (result, events) = with_capture(|| registry.picker(FIELD).init_json(&json!([1, 2])));
    assert_eq!(
        result.unwrap_err(),
        PickerError::InvalidConfigType { found: "array" }
    );
    assert_eq!(events.len(), 1);
    assert!(!registry.picker(FIELD).is_initiated());
}

#[test]
fn operations_before_init_are_logged_errors() {
    let mut registry = registry();
    let (result, events) = with_capture(|| registry.picker(FIELD).open());
    assert!(result.is_err());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].fields.get("operation").map(String::as_str), Some("open"));

    // Reading the value before init only warns.
    let (value, events) = with_capture(|| registry.picker(FIELD).value());
    assert_eq!(value, None);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::WARN);
}

#[test]
fn defaults_apply_to_later_pickers_only() {
    let mut registry = registry();
    registry.picker(InputId(1)).init(OptionsPatch::new()).unwrap();
    let rejected = registry
        .set_defaults_json(&json!({ "todayButton": false, "clearButtonLabel": "Reset" }))
        .unwrap();
    assert!(rejected.is_empty());
    registry.picker(InputId(2)).init(OptionsPatch::new()).unwrap();

    assert!(registry.state(InputId(1)).unwrap().options().today_button);
    let second = registry.state(InputId(2)).unwrap().options();
    assert!(!second.today_button);
    assert_eq!(second.clear_button_label, "Reset");
}

#[test]
fn out_of_range_values_are_rejected_and_logged() {
    let mut registry = registry();
    registry
        .picker(FIELD)
        .init(OptionsPatch::new().max_date("2020/12/31"))
        .unwrap();
    let (result, events) = with_capture(|| registry.picker(FIELD).select("2021/01/01"));
    assert!(matches!(result, Err(PickerError::OutOfRange { .. })));
    assert_eq!(events.len(), 1);
    assert!(events[0].err().contains("outside the acceptable range"));

    let (result, _) = with_capture(|| registry.picker(FIELD).select("not a date"));
    assert!(matches!(result, Err(PickerError::InvalidDateValue { .. })));
    assert_eq!(registry.host().text(FIELD), "");
}
