#![forbid(unsafe_code)]

//! Operations on one picker.
//!
//! A [`Picker`] is a short-lived handle borrowed from the
//! [`PickerRegistry`]; the state it operates on ([`WidgetState`]) lives in the
//! registry so that linked bounds can read other pickers.
//!
//! Every operation that can fail logs its error before returning it. None of
//! them changes state before its last check has passed.

use dpx_core::DateValue;
use dpx_core::format::format_date;
use dpx_core::logging::{debug, error, warn};
use serde_json::Value;

use crate::bound::DateInput;
use crate::error::{PickerError, Result};
use crate::focus::FocusTarget;
use crate::grid::{PopupView, RenderInput, render};
use crate::host::{ChangeEvent, Host};
use crate::mode::Mode;
use crate::options::{OptionsPatch, PickerOptions};
use crate::range::RangeResolver;
use crate::registry::{InputId, PickerRegistry};

/// Mutable state of one picker.
#[derive(Debug, Clone, Default)]
pub struct WidgetState {
    pub(crate) options: PickerOptions,
    pub(crate) value: Option<DateValue>,
    pub(crate) mode: Mode,
    pub(crate) initiated: bool,
    /// Present while the popup is open.
    pub(crate) view: Option<PopupView>,
}

impl WidgetState {
    #[must_use]
    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    #[must_use]
    pub fn value(&self) -> Option<DateValue> {
        self.value
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn is_initiated(&self) -> bool {
        self.initiated
    }

    #[must_use]
    pub fn view(&self) -> Option<&PopupView> {
        self.view.as_ref()
    }
}

/// Handle to the picker on one field.
pub struct Picker<'r, H: Host> {
    registry: &'r mut PickerRegistry<H>,
    input: InputId,
}

impl<'r, H: Host> Picker<'r, H> {
    pub(crate) fn new(registry: &'r mut PickerRegistry<H>, input: InputId) -> Self {
        Self { registry, input }
    }

    #[must_use]
    pub fn input(&self) -> InputId {
        self.input
    }

    fn state(&self) -> Option<&WidgetState> {
        self.registry.pickers.get(&self.input)
    }

    fn state_mut(&mut self) -> Option<&mut WidgetState> {
        self.registry.pickers.get_mut(&self.input)
    }

    fn ensure_initiated(&self) -> Result<&WidgetState> {
        self.state()
            .filter(|state| state.initiated)
            .ok_or(PickerError::NotInitiated { input: self.input })
    }

    fn logged<T>(&self, operation: &'static str, result: Result<T>) -> Result<T> {
        result.inspect_err(|err| error!(input = %self.input, operation, %err))
    }

    #[must_use]
    pub fn is_initiated(&self) -> bool {
        self.state().is_some_and(|state| state.initiated)
    }

    /// Attach the picker to its field.
    ///
    /// Options start from the registry defaults with `patch` merged over them.
    /// Individually rejected fields keep their default and are returned; the
    /// call itself only fails if the picker is already initiated.
    pub fn init(&mut self, patch: OptionsPatch) -> Result<Vec<PickerError>> {
        if self.is_initiated() {
            return self.logged(
                "init",
                Err(PickerError::AlreadyInitiated { input: self.input }),
            );
        }

        let mut options = self.registry.defaults.clone();
        let rejected = options.apply(patch);

        let input = self.input;
        let state = self.registry.pickers.entry(input).or_default();
        state.options = options;
        state.mode = Mode::Day;
        state.initiated = true;

        self.registry.host.set_read_only(input, true);
        self.registry.host.mount_popup(input);
        debug!(%input, rejected = rejected.len(), "picker initiated");
        Ok(rejected)
    }

    /// [`init`](Self::init) from a JSON object with camelCase keys.
    pub fn init_json(&mut self, config: &Value) -> Result<Vec<PickerError>> {
        if self.is_initiated() {
            return self.logged(
                "init",
                Err(PickerError::AlreadyInitiated { input: self.input }),
            );
        }
        let patch = self.logged("init", OptionsPatch::from_json(config))?;
        self.init(patch)
    }

    /// Detach the picker: close its popup, unmount it and make the field
    /// editable again. The registry entry is dropped; the next access starts
    /// a fresh, uninitiated picker.
    pub fn remove(&mut self) -> Result<()> {
        let checked = self.ensure_initiated().map(|_| ());
        self.logged("remove", checked)?;

        let input = self.input;
        if self.registry.trap.owner() == Some(input) {
            self.registry.close();
        }
        self.registry.host.unmount_popup(input);
        self.registry.host.set_read_only(input, false);
        self.registry.pickers.remove(&input);
        debug!(%input, "picker removed");
        Ok(())
    }

    /// Commit `value`, or clear the picker with `None`.
    ///
    /// Unless `ignore_limits` is set, a date outside the resolved bounds is
    /// rejected. On success the field text is updated, a change event is
    /// dispatched and an open popup is redrawn.
    pub fn set_value(&mut self, value: Option<DateInput>, ignore_limits: bool) -> Result<()> {
        let checked = self.check_value(value.as_ref(), ignore_limits);
        let date = self.logged("set_value", checked)?;

        let input = self.input;
        let Some(state) = self.state_mut() else {
            return Ok(());
        };
        state.value = date;
        let text = date.map_or_else(String::new, |date| {
            format_date(&date, &state.options.format, &state.options.labels())
        });

        self.registry.host.set_text(input, &text);
        self.registry.notify(&ChangeEvent::new(input, date, text));
        if self.is_open() {
            self.redraw(None);
        }
        debug!(%input, value = ?date, "value committed");
        Ok(())
    }

    fn check_value(
        &self,
        value: Option<&DateInput>,
        ignore_limits: bool,
    ) -> Result<Option<DateValue>> {
        let state = self.ensure_initiated()?;
        let Some(value) = value else {
            return Ok(None);
        };
        let date = value
            .to_date(&state.options.format, &state.options.labels())
            .ok_or_else(|| PickerError::invalid_date(value))?;
        if !ignore_limits {
            let (min, max) = RangeResolver::new(&*self.registry).range(self.input);
            if date < min || date > max {
                return Err(PickerError::OutOfRange { date, min, max });
            }
        }
        Ok(Some(date))
    }

    /// Commit a date within the limits.
    pub fn select(&mut self, value: impl Into<DateInput>) -> Result<()> {
        self.set_value(Some(value.into()), false)
    }

    /// Clear the value.
    pub fn clear(&mut self) -> Result<()> {
        self.set_value(None, false)
    }

    /// Committed value. Logs a warning, but still answers, before `init`.
    #[must_use]
    pub fn value(&self) -> Option<DateValue> {
        if !self.is_initiated() {
            let err = PickerError::NotInitiated { input: self.input };
            warn!(input = %self.input, %err, "reading value");
        }
        self.state().and_then(|state| state.value)
    }

    /// Committed value as milliseconds since the epoch at local midnight.
    #[must_use]
    pub fn timestamp(&self) -> Option<i64> {
        self.value().and_then(|date| date.timestamp_millis())
    }

    /// Committed value in the display format, or an empty string.
    #[must_use]
    pub fn formatted_value(&self) -> String {
        let value = self.value();
        match (value, self.state()) {
            (Some(date), Some(state)) => {
                format_date(&date, &state.options.format, &state.options.labels())
            }
            _ => String::new(),
        }
    }

    /// Effective lower limit, following linked and computed bounds.
    #[must_use]
    pub fn min_date(&self) -> DateValue {
        RangeResolver::new(&*self.registry).min(self.input)
    }

    /// Effective upper limit, following linked and computed bounds.
    #[must_use]
    pub fn max_date(&self) -> DateValue {
        RangeResolver::new(&*self.registry).max(self.input)
    }

    /// Change options after `init`. Rejected fields keep their value and are
    /// returned. The field text is reformatted and an open popup redrawn.
    pub fn update_options(&mut self, patch: OptionsPatch) -> Result<Vec<PickerError>> {
        let checked = self.ensure_initiated().map(|_| ());
        self.logged("update_options", checked)?;

        let input = self.input;
        let Some(state) = self.state_mut() else {
            return Ok(Vec::new());
        };
        let rejected = state.options.apply(patch);
        let text = state.value.map(|date| {
            format_date(&date, &state.options.format, &state.options.labels())
        });

        if let Some(text) = text {
            self.registry.host.set_text(input, &text);
        }
        if self.is_open() {
            self.redraw(None);
        }
        Ok(rejected)
    }

    /// [`update_options`](Self::update_options) from a JSON object.
    pub fn update_options_json(&mut self, config: &Value) -> Result<Vec<PickerError>> {
        let patch = self.logged("update_options", OptionsPatch::from_json(config))?;
        self.update_options(patch)
    }

    /// Open the popup in day mode, closing any other open popup. Opening an
    /// already open popup does nothing.
    pub fn open(&mut self) -> Result<()> {
        let checked = self.ensure_initiated().map(|_| ());
        self.logged("open", checked)?;
        if self.is_open() {
            return Ok(());
        }

        self.registry.close();
        let input = self.input;
        if let Some(state) = self.state_mut() {
            state.mode = Mode::Day;
        }
        self.registry.trap.engage(input);
        self.redraw(None);
        debug!(%input, "popup opened");
        Ok(())
    }

    /// Close the popup if it is open. Returns whether it was.
    pub fn close(&mut self) -> bool {
        self.is_open() && self.registry.close().is_some()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.registry.trap.owner() == Some(self.input)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.state().map_or_else(Mode::default, |state| state.mode)
    }

    /// The view on screen, while open.
    #[must_use]
    pub fn view(&self) -> Option<&PopupView> {
        self.state().and_then(|state| state.view.as_ref())
    }

    /// Activate a node of the open popup, as by a click or Enter/Space.
    ///
    /// - prev/next page to their target;
    /// - the title zooms out;
    /// - a year or month cell zooms in on it, a day cell commits it and closes;
    /// - today commits today and closes, clear clears and closes.
    ///
    /// Disabled or missing nodes are ignored. Does nothing while closed.
    pub fn activate(&mut self, target: FocusTarget) -> Result<()> {
        let checked = self.ensure_initiated().map(|_| ());
        self.logged("activate", checked)?;
        let Some(view) = self.view() else {
            return Ok(());
        };

        let mode = view.mode;
        match target {
            FocusTarget::Prev | FocusTarget::Next => {
                let control = if target == FocusTarget::Prev {
                    &view.prev
                } else {
                    &view.next
                };
                if !control.disabled {
                    let pivot = control.target;
                    self.redraw(pivot);
                }
            }
            FocusTarget::Title => {
                if view.title.disabled {
                    return Ok(());
                }
                let pivot = view.title.target;
                if let Some(wider) = mode.drill_up() {
                    self.set_mode(wider);
                    self.redraw(pivot);
                }
            }
            FocusTarget::Cell(index) => {
                let Some(cell) = view.cells.get(index).filter(|cell| !cell.is_disabled()) else {
                    return Ok(());
                };
                let date = cell.date;
                match mode.drill_down() {
                    Some(narrower) => {
                        self.set_mode(narrower);
                        self.redraw(Some(date));
                    }
                    None => {
                        self.select(date)?;
                        self.close();
                    }
                }
            }
            FocusTarget::Today => {
                let Some(today) = view.today.as_ref().filter(|c| !c.disabled) else {
                    return Ok(());
                };
                let date = today.target.unwrap_or_else(|| self.registry.today());
                self.select(date)?;
                self.close();
            }
            FocusTarget::Clear => {
                if view.clear.is_none() {
                    return Ok(());
                }
                self.clear()?;
                self.close();
            }
        }
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) {
        if let Some(state) = self.state_mut() {
            state.mode = mode;
        }
    }

    /// Render and show the popup centered on `pivot`.
    fn redraw(&mut self, pivot: Option<DateValue>) {
        let input = self.input;
        let (min, max) = RangeResolver::new(&*self.registry).range(input);
        let today = self.registry.today();
        let geometry = self.registry.host.geometry(input);

        let registry = &mut *self.registry;
        let Some(state) = registry.pickers.get_mut(&input) else {
            return;
        };
        let mut view = render(&RenderInput {
            options: &state.options,
            mode: state.mode,
            pivot,
            value: state.value,
            today,
            min,
            max,
        });
        if let Some(anchor) = geometry {
            view.placement = anchor.resolve();
        }

        // Cells are rebuilt on every render and do not keep focus.
        if matches!(registry.trap.current(), Some(FocusTarget::Cell(_))) {
            registry.trap.set_current(None);
        }
        registry.trap.retain(&view.focus);

        registry.host.show_popup(input, &view);
        registry.host.confine_tab_order(input, view.focus.tab_order());
        if let Some(target) = registry.trap.current() {
            registry.host.focus(input, target);
        }
        state.view = Some(view);
    }
}
