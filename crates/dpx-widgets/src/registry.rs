#![forbid(unsafe_code)]

//! Picker registry: one controller per bound field.
//!
//! [`PickerRegistry`] maps each [`InputId`] to the state of its picker,
//! creating it on first access and dropping it only on
//! [`remove`](crate::controller::Picker::remove). It also owns what is shared
//! between pickers: the default options new pickers start from, the change
//! listeners, the clock, and the focus trap whose owner is the one popup that
//! may be open.
//!
//! # Invariants
//!
//! - At most one popup is open. The open picker is the owner of the focus
//!   trap; opening another picker first closes it.
//! - Bounds are never cached: every query goes through
//!   [`RangeResolver`](crate::range::RangeResolver) against current state.
//!
//! Hosts translate their native input into [`PickerEvent`] and feed it to
//! [`PickerRegistry::handle_event`].

use std::fmt;

use ahash::AHashMap;
use dpx_core::DateValue;
use dpx_core::event::{KeyCode, KeyEvent};
use dpx_core::logging::{debug, error};
use serde_json::Value;

use crate::controller::{Picker, WidgetState};
use crate::error::{PickerError, Result};
use crate::focus::{FocusGraph, FocusTarget, FocusTrap, NavDirection};
use crate::host::{ChangeEvent, Clock, Host, LocalClock};
use crate::options::{OptionsPatch, PickerOptions};
use crate::range::BoundLookup;

/// Identity of a bound input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct InputId(pub u64);

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input#{}", self.0)
    }
}

/// Handle returned by [`PickerRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ChangeEvent)>;

/// Input routed to the pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    /// A key event. `focused_input` is the bound field holding keyboard
    /// focus, if any; `None` when focus is inside a popup or elsewhere.
    Key {
        key: KeyEvent,
        focused_input: Option<InputId>,
    },
    /// Pointer click on a bound field.
    InputClick(InputId),
    /// Pointer click on a node of the open popup.
    PopupClick(FocusTarget),
    /// Pointer click anywhere outside the open popup and its field.
    OutsideClick,
}

/// All pickers of a document.
pub struct PickerRegistry<H: Host> {
    pub(crate) host: H,
    pub(crate) defaults: PickerOptions,
    pub(crate) pickers: AHashMap<InputId, WidgetState>,
    pub(crate) trap: FocusTrap,
    pub(crate) clock: Box<dyn Clock>,
    listeners: Vec<(ListenerId, InputId, Listener)>,
    next_listener: u64,
}

impl<H: Host> PickerRegistry<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            defaults: PickerOptions::default(),
            pickers: AHashMap::new(),
            trap: FocusTrap::new(),
            clock: Box::new(LocalClock),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Replace the source of "today".
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    #[must_use]
    pub fn today(&self) -> DateValue {
        self.clock.today()
    }

    /// The picker bound to `input`, created uninitiated on first access.
    pub fn picker(&mut self, input: InputId) -> Picker<'_, H> {
        self.pickers.entry(input).or_default();
        Picker::new(self, input)
    }

    /// State of the picker on `input`, if it has been accessed.
    #[must_use]
    pub fn state(&self, input: InputId) -> Option<&WidgetState> {
        self.pickers.get(&input)
    }

    /// Options new pickers start from.
    #[must_use]
    pub fn defaults(&self) -> &PickerOptions {
        &self.defaults
    }

    /// Merge `patch` into the defaults. Already initiated pickers keep their
    /// options. Returns the rejected fields.
    pub fn set_defaults(&mut self, patch: OptionsPatch) -> Vec<PickerError> {
        self.defaults.apply(patch)
    }

    /// [`set_defaults`](Self::set_defaults) from a JSON object.
    pub fn set_defaults_json(&mut self, config: &Value) -> Result<Vec<PickerError>> {
        let patch = OptionsPatch::from_json(config).inspect_err(|err| {
            error!(%err, "defaults not changed");
        })?;
        Ok(self.set_defaults(patch))
    }

    /// The picker whose popup is open.
    #[must_use]
    pub fn open_input(&self) -> Option<InputId> {
        self.trap.owner()
    }

    /// Close the open popup, if any, and return its picker.
    pub fn close(&mut self) -> Option<InputId> {
        let input = self.trap.release()?;
        self.host.hide_popup(input);
        self.host.restore_tab_order();
        if let Some(state) = self.pickers.get_mut(&input) {
            state.view = None;
        }
        debug!(%input, "popup closed");
        Some(input)
    }

    /// Call `listener` after every successful value change of `input`.
    pub fn subscribe(
        &mut self,
        input: InputId,
        listener: impl FnMut(&ChangeEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, input, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _, _)| *listener != id);
        self.listeners.len() != before
    }

    pub(crate) fn notify(&mut self, event: &ChangeEvent) {
        self.host.dispatch_change(event);
        for (_, input, listener) in &mut self.listeners {
            if *input == event.input {
                listener(event);
            }
        }
    }

    fn is_initiated(&self, input: InputId) -> bool {
        self.pickers.get(&input).is_some_and(|state| state.initiated)
    }

    /// Route one input event. Returns `true` if a picker handled it (the host
    /// should then suppress its default action).
    pub fn handle_event(&mut self, event: &PickerEvent) -> bool {
        match *event {
            PickerEvent::Key { key, focused_input } => self.handle_key(key, focused_input),
            PickerEvent::InputClick(input) => {
                self.is_initiated(input) && self.picker(input).open().is_ok()
            }
            PickerEvent::PopupClick(target) => {
                let Some(input) = self.trap.owner() else {
                    return false;
                };
                self.trap.set_current(Some(target));
                // Failures are logged by the picker; the click is consumed.
                let _ = self.picker(input).activate(target);
                true
            }
            PickerEvent::OutsideClick => self.close().is_some(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent, focused_input: Option<InputId>) -> bool {
        if !key.is_press() {
            return false;
        }

        if key.code == KeyCode::Enter
            && let Some(input) = focused_input
        {
            return self.is_initiated(input) && self.picker(input).open().is_ok();
        }
        if key.code == KeyCode::Escape {
            return self.close().is_some();
        }

        let Some(input) = self.trap.owner() else {
            return false;
        };

        if let Some(dir) = NavDirection::from_key(key.code) {
            return self.move_focus(input, |trap, graph| trap.navigate(graph, dir));
        }
        if let Some(forward) = key.tab_forward() {
            return self.move_focus(input, |trap, graph| trap.tab(graph, forward));
        }
        if key.is_activation()
            && let Some(target) = self.trap.current()
        {
            let _ = self.picker(input).activate(target);
            return true;
        }
        false
    }

    fn move_focus(
        &mut self,
        input: InputId,
        step: impl FnOnce(&mut FocusTrap, &FocusGraph) -> Option<FocusTarget>,
    ) -> bool {
        let Some(view) = self.pickers.get(&input).and_then(|state| state.view.as_ref()) else {
            return false;
        };
        if let Some(target) = step(&mut self.trap, &view.focus) {
            self.host.focus(input, target);
        }
        true
    }
}

impl<H: Host> BoundLookup for PickerRegistry<H> {
    fn linked(&self, input: InputId) -> Option<(&PickerOptions, Option<DateValue>)> {
        self.pickers
            .get(&input)
            .filter(|state| state.initiated)
            .map(|state| (&state.options, state.value))
    }

    fn default_options(&self) -> &PickerOptions {
        &self.defaults
    }
}

impl<H: Host> fmt::Debug for PickerRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerRegistry")
            .field("pickers", &self.pickers.len())
            .field("open", &self.trap.owner())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
