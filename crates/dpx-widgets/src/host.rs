#![forbid(unsafe_code)]

//! Environment boundary.
//!
//! The picker never touches a document directly. Everything it needs from the
//! environment (field text, read-only state, popup mounting, focus and tab
//! order) goes through [`Host`]; the current date comes from [`Clock`].
//!
//! [`HeadlessHost`] records every call in memory. Tests drive it directly, and
//! embedders that render popups themselves can read views back from it.

use ahash::AHashMap;
use dpx_core::DateValue;

use crate::focus::FocusTarget;
use crate::grid::PopupView;
use crate::placement::PopupAnchor;
use crate::registry::InputId;

/// Notification dispatched on the bound field after a value change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub input: InputId,
    /// The new value, `None` after clearing.
    pub value: Option<DateValue>,
    /// The field text after the change.
    pub text: String,
    pub bubbles: bool,
    pub cancelable: bool,
}

impl ChangeEvent {
    #[must_use]
    pub fn new(input: InputId, value: Option<DateValue>, text: String) -> Self {
        Self {
            input,
            value,
            text,
            bubbles: true,
            cancelable: true,
        }
    }
}

/// Operations the picker needs from its environment.
pub trait Host {
    /// Mark the bound field read-only (or editable again).
    fn set_read_only(&mut self, input: InputId, read_only: bool);

    /// Replace the text shown in the bound field.
    fn set_text(&mut self, input: InputId, text: &str);

    /// Dispatch a change notification on the bound field.
    fn dispatch_change(&mut self, event: &ChangeEvent);

    /// Insert the (hidden) popup structure next to the field.
    fn mount_popup(&mut self, input: InputId);

    /// Remove the popup structure.
    fn unmount_popup(&mut self, input: InputId);

    /// Show the popup, or redraw it if it is already visible.
    fn show_popup(&mut self, input: InputId, view: &PopupView);

    fn hide_popup(&mut self, input: InputId);

    /// Move keyboard focus to a node of the open popup.
    fn focus(&mut self, input: InputId, target: FocusTarget);

    /// Take every element outside the popup out of the tab order, leaving
    /// `order` as the only tabbable nodes.
    fn confine_tab_order(&mut self, input: InputId, order: &[FocusTarget]);

    /// Undo [`confine_tab_order`](Host::confine_tab_order).
    fn restore_tab_order(&mut self);

    /// Field and viewport geometry for placement, if the host has layout.
    fn geometry(&self, _input: InputId) -> Option<PopupAnchor> {
        None
    }
}

impl<H: Host + ?Sized> Host for Box<H> {
    fn set_read_only(&mut self, input: InputId, read_only: bool) {
        (**self).set_read_only(input, read_only);
    }

    fn set_text(&mut self, input: InputId, text: &str) {
        (**self).set_text(input, text);
    }

    fn dispatch_change(&mut self, event: &ChangeEvent) {
        (**self).dispatch_change(event);
    }

    fn mount_popup(&mut self, input: InputId) {
        (**self).mount_popup(input);
    }

    fn unmount_popup(&mut self, input: InputId) {
        (**self).unmount_popup(input);
    }

    fn show_popup(&mut self, input: InputId, view: &PopupView) {
        (**self).show_popup(input, view);
    }

    fn hide_popup(&mut self, input: InputId) {
        (**self).hide_popup(input);
    }

    fn focus(&mut self, input: InputId, target: FocusTarget) {
        (**self).focus(input, target);
    }

    fn confine_tab_order(&mut self, input: InputId, order: &[FocusTarget]) {
        (**self).confine_tab_order(input, order);
    }

    fn restore_tab_order(&mut self) {
        (**self).restore_tab_order();
    }

    fn geometry(&self, input: InputId) -> Option<PopupAnchor> {
        (**self).geometry(input)
    }
}

/// Source of "today".
///
/// Hosts use the local calendar; tests pin a date.
pub trait Clock {
    fn today(&self) -> DateValue;
}

/// Today's date in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> DateValue {
        DateValue::today()
    }
}

/// A clock stopped on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateValue);

impl Clock for FixedClock {
    fn today(&self) -> DateValue {
        self.0
    }
}

/// Recorded state of one bound field.
#[derive(Debug, Clone, Default)]
pub struct FieldState {
    pub text: String,
    pub read_only: bool,
    pub mounted: bool,
    pub visible: bool,
    /// Most recently shown view.
    pub last_view: Option<PopupView>,
    /// Change notifications in dispatch order.
    pub changes: Vec<ChangeEvent>,
}

/// In-memory [`Host`] that records every call.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    fields: AHashMap<InputId, FieldState>,
    confined: Option<(InputId, Vec<FocusTarget>)>,
    focused: Option<(InputId, FocusTarget)>,
    geometry: AHashMap<InputId, PopupAnchor>,
}

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(&self, input: InputId) -> Option<&FieldState> {
        self.fields.get(&input)
    }

    /// Text currently shown in the field (empty if never set).
    #[must_use]
    pub fn text(&self, input: InputId) -> &str {
        self.fields.get(&input).map_or("", |f| f.text.as_str())
    }

    /// Simulate the user or page typing into the field.
    pub fn set_field_text(&mut self, input: InputId, text: impl Into<String>) {
        self.field_mut(input).text = text.into();
    }

    #[must_use]
    pub fn is_visible(&self, input: InputId) -> bool {
        self.fields.get(&input).is_some_and(|f| f.visible)
    }

    /// The view currently on screen for `input`, if its popup is visible.
    #[must_use]
    pub fn visible_view(&self, input: InputId) -> Option<&PopupView> {
        self.fields
            .get(&input)
            .filter(|f| f.visible)
            .and_then(|f| f.last_view.as_ref())
    }

    #[must_use]
    pub fn changes(&self, input: InputId) -> &[ChangeEvent] {
        self.fields
            .get(&input)
            .map(|f| f.changes.as_slice())
            .unwrap_or_default()
    }

    /// Tab order the document is confined to, if any.
    #[must_use]
    pub fn confined(&self) -> Option<(InputId, &[FocusTarget])> {
        self.confined
            .as_ref()
            .map(|(input, order)| (*input, order.as_slice()))
    }

    #[must_use]
    pub fn focused(&self) -> Option<(InputId, FocusTarget)> {
        self.focused
    }

    /// Report layout for placement of `input`'s popup.
    pub fn set_geometry(&mut self, input: InputId, anchor: PopupAnchor) {
        self.geometry.insert(input, anchor);
    }

    fn field_mut(&mut self, input: InputId) -> &mut FieldState {
        self.fields.entry(input).or_default()
    }
}

impl Host for HeadlessHost {
    fn set_read_only(&mut self, input: InputId, read_only: bool) {
        self.field_mut(input).read_only = read_only;
    }

    fn set_text(&mut self, input: InputId, text: &str) {
        text.clone_into(&mut self.field_mut(input).text);
    }

    fn dispatch_change(&mut self, event: &ChangeEvent) {
        self.field_mut(event.input).changes.push(event.clone());
    }

    fn mount_popup(&mut self, input: InputId) {
        self.field_mut(input).mounted = true;
    }

    fn unmount_popup(&mut self, input: InputId) {
        let field = self.field_mut(input);
        field.mounted = false;
        field.visible = false;
        field.last_view = None;
    }

    fn show_popup(&mut self, input: InputId, view: &PopupView) {
        let field = self.field_mut(input);
        field.visible = true;
        field.last_view = Some(view.clone());
    }

    fn hide_popup(&mut self, input: InputId) {
        self.field_mut(input).visible = false;
        if self.focused.is_some_and(|(owner, _)| owner == input) {
            self.focused = None;
        }
    }

    fn focus(&mut self, input: InputId, target: FocusTarget) {
        self.focused = Some((input, target));
    }

    fn confine_tab_order(&mut self, input: InputId, order: &[FocusTarget]) {
        self.confined = Some((input, order.to_vec()));
    }

    fn restore_tab_order(&mut self) {
        self.confined = None;
    }

    fn geometry(&self, input: InputId) -> Option<PopupAnchor> {
        self.geometry.get(&input).copied()
    }
}
