#![forbid(unsafe_code)]

//! Focus confinement for the open popup.
//!
//! At most one popup is open at a time, so a single trap is enough. Engaging
//! it records which picker owns the popup; while engaged, Tab traversal and
//! arrow keys only move between the nodes of that popup's [`FocusGraph`].
//!
//! # Failure Modes
//!
//! - Navigating with nothing focused lands on the first node of the graph.
//! - If a re-render removes the focused node (e.g. it became disabled), the
//!   trap forgets it; the next key lands on the first node again.
//! - A graph with no nodes leaves focus unchanged.

use super::graph::{FocusGraph, FocusTarget, NavDirection};
use crate::registry::InputId;

/// Focus state of the open popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTrap {
    owner: Option<InputId>,
    current: Option<FocusTarget>,
}

impl FocusTrap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Confine focus to the popup of `owner`, forgetting any previous focus.
    pub fn engage(&mut self, owner: InputId) {
        self.owner = Some(owner);
        self.current = None;
    }

    /// Release the trap, returning the previous owner.
    pub fn release(&mut self) -> Option<InputId> {
        self.current = None;
        self.owner.take()
    }

    #[must_use]
    pub fn owner(&self) -> Option<InputId> {
        self.owner
    }

    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.owner.is_some()
    }

    #[must_use]
    pub fn current(&self) -> Option<FocusTarget> {
        self.current
    }

    /// Record focus moved by the host (e.g. a pointer click).
    pub fn set_current(&mut self, target: Option<FocusTarget>) {
        self.current = target;
    }

    /// Move focus along an arrow direction.
    pub fn navigate(&mut self, graph: &FocusGraph, dir: NavDirection) -> Option<FocusTarget> {
        let next = match self.current.and_then(|from| graph.navigate(from, dir)) {
            Some(target) => target,
            None => graph.first()?,
        };
        self.current = Some(next);
        Some(next)
    }

    /// Move focus to the next (`forward`) or previous node in tab order.
    pub fn tab(&mut self, graph: &FocusGraph, forward: bool) -> Option<FocusTarget> {
        let next = graph.tab_step(self.current, forward)?;
        self.current = Some(next);
        Some(next)
    }

    /// Drop the focused node if `graph` no longer contains it.
    pub fn retain(&mut self, graph: &FocusGraph) {
        if self.current.is_some_and(|node| !graph.contains(node)) {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::FocusLayout;

    fn graph(cells: &[bool]) -> FocusGraph {
        FocusGraph::build(&FocusLayout {
            prev: false,
            title: true,
            next: false,
            today: false,
            clear: true,
            cells,
            cols: 4,
        })
    }

    #[test]
    fn first_arrow_lands_on_first_node() {
        let graph = graph(&[true; 16]);
        let mut trap = FocusTrap::new();
        trap.engage(InputId(1));
        assert_eq!(trap.navigate(&graph, NavDirection::Down), Some(FocusTarget::Title));
        assert_eq!(trap.navigate(&graph, NavDirection::Down), Some(FocusTarget::Cell(0)));
        assert_eq!(trap.navigate(&graph, NavDirection::Right), Some(FocusTarget::Cell(1)));
        assert_eq!(trap.current(), Some(FocusTarget::Cell(1)));
    }

    #[test]
    fn tab_cycles_inside_popup() {
        let graph = graph(&[false, true, false, false]);
        let mut trap = FocusTrap::new();
        trap.engage(InputId(1));
        assert_eq!(trap.tab(&graph, true), Some(FocusTarget::Title));
        assert_eq!(trap.tab(&graph, true), Some(FocusTarget::Cell(1)));
        assert_eq!(trap.tab(&graph, true), Some(FocusTarget::Clear));
        assert_eq!(trap.tab(&graph, true), Some(FocusTarget::Title));
        assert_eq!(trap.tab(&graph, false), Some(FocusTarget::Clear));
    }

    #[test]
    fn retain_forgets_removed_nodes() {
        let mut trap = FocusTrap::new();
        trap.engage(InputId(3));
        trap.set_current(Some(FocusTarget::Cell(2)));
        trap.retain(&graph(&[true, true, false, true]));
        assert_eq!(trap.current(), None);
        assert_eq!(trap.release(), Some(InputId(3)));
        assert!(!trap.is_engaged());
    }
}
