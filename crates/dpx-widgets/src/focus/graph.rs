#![forbid(unsafe_code)]

//! Directional neighbor graph over one rendered popup.
//!
//! Nodes are the enabled header controls (prev, title, next), the enabled
//! grid cells and the enabled footer controls (today, clear). Every node gets
//! a neighbor in all four directions.
//!
//! # Algorithm
//!
//! 1. Header and footer controls form left/right rings in display order.
//! 2. Enabled cells of each grid row form a left/right ring.
//! 3. Enabled cells of each column are chained up/down. The top cell's up
//!    neighbor is a header control chosen by column (falling back to the
//!    footer, then to the column's bottom cell); the bottom cell's down
//!    neighbor is a footer control chosen by column (falling back to the
//!    header, then to the column's top cell).
//! 4. Header controls go down to the first cell and up to the first footer
//!    control (or the last cell). Footer controls go up to the last cell and
//!    down to the first header control (or the first cell).
//!
//! # Invariants
//!
//! - Total: every node has four neighbors, each of which is a node.
//! - Deterministic: the same layout always yields the same graph.
//! - A direction with no candidate falls back to the node itself.

use ahash::AHashMap;
use dpx_core::event::KeyCode;

/// A focusable part of the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusTarget {
    Prev,
    Title,
    Next,
    /// Grid cell by row-major index.
    Cell(usize),
    Today,
    Clear,
}

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NavDirection {
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    #[must_use]
    pub const fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            _ => None,
        }
    }
}

/// The four neighbors of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub left: FocusTarget,
    pub right: FocusTarget,
    pub up: FocusTarget,
    pub down: FocusTarget,
}

impl Neighbors {
    const fn uniform(target: FocusTarget) -> Self {
        Self {
            left: target,
            right: target,
            up: target,
            down: target,
        }
    }

    #[must_use]
    pub const fn get(&self, dir: NavDirection) -> FocusTarget {
        match dir {
            NavDirection::Left => self.left,
            NavDirection::Right => self.right,
            NavDirection::Up => self.up,
            NavDirection::Down => self.down,
        }
    }
}

/// Which parts of a view can take focus.
#[derive(Debug, Clone, Copy)]
pub struct FocusLayout<'a> {
    pub prev: bool,
    pub title: bool,
    pub next: bool,
    pub today: bool,
    pub clear: bool,
    /// Enabled flag per grid cell, row-major.
    pub cells: &'a [bool],
    pub cols: usize,
}

/// Arrow-key adjacency and tab order of one view.
#[derive(Debug, Clone, Default)]
pub struct FocusGraph {
    order: Vec<FocusTarget>,
    edges: AHashMap<FocusTarget, Neighbors>,
}

impl FocusGraph {
    #[must_use]
    pub fn build(layout: &FocusLayout<'_>) -> Self {
        let header: Vec<FocusTarget> = [
            (layout.prev, FocusTarget::Prev),
            (layout.title, FocusTarget::Title),
            (layout.next, FocusTarget::Next),
        ]
        .into_iter()
        .filter_map(|(enabled, target)| enabled.then_some(target))
        .collect();
        let footer: Vec<FocusTarget> = [
            (layout.today, FocusTarget::Today),
            (layout.clear, FocusTarget::Clear),
        ]
        .into_iter()
        .filter_map(|(enabled, target)| enabled.then_some(target))
        .collect();
        let cells: Vec<usize> = layout
            .cells
            .iter()
            .enumerate()
            .filter_map(|(index, enabled)| enabled.then_some(index))
            .collect();

        let cols = layout.cols.max(1);
        let first_cell = cells.first().map(|&index| FocusTarget::Cell(index));
        let last_cell = cells.last().map(|&index| FocusTarget::Cell(index));

        let mut edges = AHashMap::with_capacity(header.len() + cells.len() + footer.len());

        for (i, &node) in header.iter().enumerate() {
            let (left, right) = ring(&header, i);
            edges.insert(
                node,
                Neighbors {
                    left,
                    right,
                    up: footer.first().copied().or(last_cell).unwrap_or(node),
                    down: first_cell.or(footer.first().copied()).unwrap_or(node),
                },
            );
        }

        for (i, &node) in footer.iter().enumerate() {
            let (left, right) = ring(&footer, i);
            edges.insert(
                node,
                Neighbors {
                    left,
                    right,
                    up: last_cell.or(header.last().copied()).unwrap_or(node),
                    down: header.first().copied().or(first_cell).unwrap_or(node),
                },
            );
        }

        for &index in &cells {
            edges.insert(
                FocusTarget::Cell(index),
                Neighbors::uniform(FocusTarget::Cell(index)),
            );
        }

        let rows = layout.cells.len().div_ceil(cols);
        for row in 0..rows {
            let row_nodes: Vec<FocusTarget> = cells
                .iter()
                .filter(|&&index| index / cols == row)
                .map(|&index| FocusTarget::Cell(index))
                .collect();
            for (i, node) in row_nodes.iter().enumerate() {
                let (left, right) = ring(&row_nodes, i);
                if let Some(neighbors) = edges.get_mut(node) {
                    neighbors.left = left;
                    neighbors.right = right;
                }
            }
        }

        let top_line = |col: usize| top_line(layout, &header, col, cols);
        let bottom_line = |col: usize| bottom_line(&footer, col, cols);
        for col in 0..cols {
            let column: Vec<FocusTarget> = cells
                .iter()
                .filter(|&&index| index % cols == col)
                .map(|&index| FocusTarget::Cell(index))
                .collect();
            let (Some(&top), Some(&bottom)) = (column.first(), column.last()) else {
                continue;
            };
            for (i, node) in column.iter().enumerate() {
                let up = if i == 0 {
                    top_line(col).or_else(|| bottom_line(col)).unwrap_or(bottom)
                } else {
                    column[i - 1]
                };
                let down = match column.get(i + 1) {
                    Some(&below) => below,
                    None => bottom_line(col).or_else(|| top_line(col)).unwrap_or(top),
                };
                if let Some(neighbors) = edges.get_mut(node) {
                    neighbors.up = up;
                    neighbors.down = down;
                }
            }
        }

        let mut order = header;
        order.extend(cells.iter().map(|&index| FocusTarget::Cell(index)));
        order.extend(footer);

        Self { order, edges }
    }

    /// Neighbor of `from` in `dir`, or `None` if `from` is not a node.
    #[must_use]
    pub fn navigate(&self, from: FocusTarget, dir: NavDirection) -> Option<FocusTarget> {
        self.edges.get(&from).map(|neighbors| neighbors.get(dir))
    }

    #[must_use]
    pub fn neighbors(&self, node: FocusTarget) -> Option<&Neighbors> {
        self.edges.get(&node)
    }

    #[must_use]
    pub fn contains(&self, node: FocusTarget) -> bool {
        self.edges.contains_key(&node)
    }

    /// First node in tab order.
    #[must_use]
    pub fn first(&self) -> Option<FocusTarget> {
        self.order.first().copied()
    }

    /// Header, then enabled cells, then footer.
    #[must_use]
    pub fn tab_order(&self) -> &[FocusTarget] {
        &self.order
    }

    /// Next (or previous) node in tab order, wrapping at either end.
    ///
    /// Starting outside the graph lands on the first (or last) node.
    #[must_use]
    pub fn tab_step(&self, from: Option<FocusTarget>, forward: bool) -> Option<FocusTarget> {
        let len = self.order.len();
        if len == 0 {
            return None;
        }
        let position = from.and_then(|node| self.order.iter().position(|&n| n == node));
        let index = match (position, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        Some(self.order[index])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Left and right neighbors of `items[i]` in a ring.
fn ring(items: &[FocusTarget], i: usize) -> (FocusTarget, FocusTarget) {
    let len = items.len();
    let left = items[if i == 0 { len - 1 } else { i - 1 }];
    let right = items[if i + 1 == len { 0 } else { i + 1 }];
    (left, right)
}

/// Header control above column `col`.
fn top_line(
    layout: &FocusLayout<'_>,
    header: &[FocusTarget],
    col: usize,
    cols: usize,
) -> Option<FocusTarget> {
    match header {
        [] => None,
        [only] => Some(*only),
        _ if !layout.title => header.get(col / cols.div_ceil(2)).or(header.last()).copied(),
        _ => {
            // Wide grids give the arrows two columns each.
            let edge = if cols >= 7 { 2 } else { 1 };
            Some(if col < edge && layout.prev {
                FocusTarget::Prev
            } else if col + edge >= cols && layout.next {
                FocusTarget::Next
            } else {
                FocusTarget::Title
            })
        }
    }
}

/// Footer control below column `col`; footer controls split the columns evenly.
fn bottom_line(footer: &[FocusTarget], col: usize, cols: usize) -> Option<FocusTarget> {
    if footer.is_empty() {
        return None;
    }
    footer
        .get(col / cols.div_ceil(footer.len()))
        .or(footer.last())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CONTROLS: FocusLayout<'static> = FocusLayout {
        prev: true,
        title: true,
        next: true,
        today: true,
        clear: true,
        cells: &[true; 42],
        cols: 7,
    };

    fn assert_total(graph: &FocusGraph) {
        for &node in graph.tab_order() {
            for dir in NavDirection::ALL {
                let target = graph.navigate(node, dir).expect("node has neighbors");
                assert!(graph.contains(target), "{node:?} {dir:?} -> {target:?}");
            }
        }
    }

    #[test]
    fn full_day_grid() {
        let graph = FocusGraph::build(&ALL_CONTROLS);
        assert_eq!(graph.len(), 3 + 42 + 2);
        assert_total(&graph);

        let cell = FocusTarget::Cell;
        assert_eq!(graph.navigate(cell(0), NavDirection::Left), Some(cell(6)));
        assert_eq!(graph.navigate(cell(6), NavDirection::Right), Some(cell(0)));
        assert_eq!(graph.navigate(cell(8), NavDirection::Up), Some(cell(1)));
        assert_eq!(graph.navigate(cell(8), NavDirection::Down), Some(cell(15)));

        assert_eq!(graph.navigate(cell(1), NavDirection::Up), Some(FocusTarget::Prev));
        assert_eq!(graph.navigate(cell(3), NavDirection::Up), Some(FocusTarget::Title));
        assert_eq!(graph.navigate(cell(5), NavDirection::Up), Some(FocusTarget::Next));

        assert_eq!(graph.navigate(cell(38), NavDirection::Down), Some(FocusTarget::Today));
        assert_eq!(graph.navigate(cell(39), NavDirection::Down), Some(FocusTarget::Clear));

        assert_eq!(graph.navigate(FocusTarget::Prev, NavDirection::Left), Some(FocusTarget::Next));
        assert_eq!(graph.navigate(FocusTarget::Title, NavDirection::Down), Some(cell(0)));
        assert_eq!(graph.navigate(FocusTarget::Title, NavDirection::Up), Some(FocusTarget::Today));
        assert_eq!(graph.navigate(FocusTarget::Clear, NavDirection::Up), Some(cell(41)));
        assert_eq!(graph.navigate(FocusTarget::Clear, NavDirection::Down), Some(FocusTarget::Prev));
    }

    #[test]
    fn narrow_grid_apportions_header() {
        let graph = FocusGraph::build(&FocusLayout {
            cells: &[true; 16],
            cols: 4,
            ..ALL_CONTROLS
        });
        assert_total(&graph);
        let up = |i| graph.navigate(FocusTarget::Cell(i), NavDirection::Up);
        assert_eq!(up(0), Some(FocusTarget::Prev));
        assert_eq!(up(1), Some(FocusTarget::Title));
        assert_eq!(up(2), Some(FocusTarget::Title));
        assert_eq!(up(3), Some(FocusTarget::Next));
    }

    #[test]
    fn disabled_title_splits_columns_between_arrows() {
        let graph = FocusGraph::build(&FocusLayout {
            title: false,
            cells: &[true; 16],
            cols: 4,
            ..ALL_CONTROLS
        });
        let up = |i| graph.navigate(FocusTarget::Cell(i), NavDirection::Up);
        assert_eq!(up(1), Some(FocusTarget::Prev));
        assert_eq!(up(2), Some(FocusTarget::Next));
    }

    #[test]
    fn disabled_cells_are_skipped() {
        let mut cells = [true; 42];
        cells[..10].fill(false);
        cells[30..].fill(false);
        let graph = FocusGraph::build(&FocusLayout {
            prev: false,
            next: false,
            today: false,
            cells: &cells,
            ..ALL_CONTROLS
        });
        assert_total(&graph);
        assert!(!graph.contains(FocusTarget::Cell(3)));
        // Only the title remains in the header and serves every column.
        assert_eq!(
            graph.navigate(FocusTarget::Cell(10), NavDirection::Up),
            Some(FocusTarget::Title)
        );
        assert_eq!(
            graph.navigate(FocusTarget::Cell(10), NavDirection::Left),
            Some(FocusTarget::Cell(13))
        );
        assert_eq!(
            graph.navigate(FocusTarget::Title, NavDirection::Down),
            Some(FocusTarget::Cell(10))
        );
        assert_eq!(
            graph.navigate(FocusTarget::Clear, NavDirection::Up),
            Some(FocusTarget::Cell(29))
        );
    }

    #[test]
    fn lonely_nodes_point_at_themselves() {
        let graph = FocusGraph::build(&FocusLayout {
            prev: false,
            title: false,
            next: false,
            today: false,
            clear: false,
            cells: &[false, false, true, false],
            cols: 4,
        });
        assert_eq!(graph.len(), 1);
        let node = FocusTarget::Cell(2);
        for dir in NavDirection::ALL {
            assert_eq!(graph.navigate(node, dir), Some(node));
        }
    }

    #[test]
    fn tab_steps_wrap() {
        let graph = FocusGraph::build(&FocusLayout {
            cells: &[true, false, true, true],
            cols: 4,
            today: false,
            ..ALL_CONTROLS
        });
        assert_eq!(
            graph.tab_order(),
            [
                FocusTarget::Prev,
                FocusTarget::Title,
                FocusTarget::Next,
                FocusTarget::Cell(0),
                FocusTarget::Cell(2),
                FocusTarget::Cell(3),
                FocusTarget::Clear,
            ]
        );
        assert_eq!(graph.tab_step(Some(FocusTarget::Clear), true), Some(FocusTarget::Prev));
        assert_eq!(graph.tab_step(Some(FocusTarget::Prev), false), Some(FocusTarget::Clear));
        assert_eq!(graph.tab_step(None, true), Some(FocusTarget::Prev));
        assert_eq!(graph.tab_step(Some(FocusTarget::Today), false), Some(FocusTarget::Clear));
        assert_eq!(FocusGraph::default().tab_step(None, true), None);
    }
}
