#![forbid(unsafe_code)]

//! Vertical placement of the popup relative to its field.
//!
//! The popup hangs below the field. It flips above when it would overflow the
//! bottom of the viewport and the space above the field is larger than the
//! popup, but never so far that it leaves the top of the viewport; in that
//! case it stays below and the host scrolls.

use dpx_core::geometry::Rect;

/// Which side of the field the popup is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Placement {
    #[default]
    Below,
    Above,
}

impl Placement {
    /// Class toggled on the popup container by markup hosts.
    #[must_use]
    pub const fn class(self) -> Option<&'static str> {
        match self {
            Self::Below => None,
            Self::Above => Some("to-top"),
        }
    }
}

/// Geometry reported by the host when a popup opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupAnchor {
    /// The bound field.
    pub field: Rect,
    /// Rendered height of the popup.
    pub popup_height: i32,
    /// The visible area.
    pub viewport: Rect,
}

impl PopupAnchor {
    /// Where the popup should be drawn.
    #[must_use]
    pub fn resolve(&self) -> Placement {
        let below = self.area(Placement::Below);
        let overflows = below.bottom() > self.viewport.bottom();
        let room_above = below.y.saturating_sub(self.viewport.y).saturating_add(self.field.height)
            > self.popup_height;
        if overflows && room_above && self.area(Placement::Above).y >= self.viewport.y {
            Placement::Above
        } else {
            Placement::Below
        }
    }

    /// Rectangle the popup occupies with the given placement.
    #[must_use]
    pub fn area(&self, placement: Placement) -> Rect {
        let y = match placement {
            Placement::Below => self.field.bottom(),
            Placement::Above => self.field.y.saturating_sub(self.popup_height),
        };
        Rect::new(self.field.x, y, self.field.width.max(0), self.popup_height)
    }
}
