#![forbid(unsafe_code)]

//! The grid editing proxy: transient cell placements.
//!
//! During an interactive drag the target cell is often already taken.
//! Destroying the occupant just to preview a drop would make dragging
//! lossy, so the proxy keeps a side list of *transient* placements:
//! widgets parked on an occupied cell, overlapping the occupant on
//! screen, waiting to commit once they land on a free cell.
//!
//! # Invariants
//!
//! 1. A widget appears in at most one of {committed cell table,
//!    transient list}. Enforced at the write paths: committing through
//!    [`GridProxy::widget`] purges any stale transient entry, and
//!    creating a transient entry removes the committed cell.
//! 2. Transient entries never participate in layout solving,
//!    serialization, or code generation.
//! 3. The transient list preserves insertion order across removals.

use gridkit_core::{Rect, WidgetId};
use gridkit_layout::{Align, Cell, Grid};
use tracing::trace;

use crate::tree::WidgetTree;

// ---------------------------------------------------------------------------
// MovePolicy
// ---------------------------------------------------------------------------

/// What `move_cell` does when the target origin is already occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePolicy {
    /// Evict the occupant; it becomes un-positioned.
    Overwrite,
    /// Leave the occupant alone and release the moving widget's own
    /// cell instead, leaving it un-positioned.
    Skip,
    /// Leave the occupant alone and park the moving widget as a
    /// transient placement previewing the target.
    Transient,
}

// ---------------------------------------------------------------------------
// GridProxy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct TransientEntry {
    widget: WidgetId,
    cell: Cell,
}

/// Capacity headroom added when the transient list grows.
const TRANSIENT_HEADROOM: usize = 10;

/// A [`Grid`] wrapped with the transient-occupancy protocol.
#[derive(Debug)]
pub struct GridProxy {
    grid: Grid,
    transient: Vec<TransientEntry>,
}

impl GridProxy {
    /// Wrap a fresh grid with the designer's default 3x3 table.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        let mut grid = Grid::new(bounds);
        grid.layout(3, 3);
        Self {
            grid,
            transient: Vec::new(),
        }
    }

    /// Wrap an existing grid.
    #[must_use]
    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            transient: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct access to the wrapped grid. Committing a placement should
    /// go through [`GridProxy::widget`] so transient bookkeeping stays
    /// consistent; everything else is fair game.
    #[inline]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Commit a placement, purging any stale transient entry first.
    pub fn widget(
        &mut self,
        w: WidgetId,
        row: usize,
        col: usize,
        rowspan: usize,
        colspan: usize,
        align: Align,
    ) -> Option<&mut Cell> {
        self.transient_remove(w);
        self.grid.widget(w, row, col, rowspan, colspan, align)
    }

    /// Remove a child from the grid and from the transient list.
    pub fn remove_child(&mut self, w: WidgetId) {
        self.transient_remove(w);
        self.grid.remove_child(w);
    }

    /// Move a cell into the grid or within the grid.
    ///
    /// The widget must already be a child of the grid. Span, alignment,
    /// and minimum size are inherited from the widget's *committed* cell
    /// when it has one, else they default to 1x1 / FILL / 20x20 (a
    /// widget moved while transient starts over from the defaults). The
    /// call is a no-op when the target rectangle exceeds the grid
    /// dimensions or equals the current committed origin.
    ///
    /// Under [`MovePolicy::Transient`] with an occupied target, the
    /// widget's on-screen bounds are proposed (not committed) onto the
    /// occupant's bounds so the preview visually overlaps.
    pub fn move_cell(
        &mut self,
        tree: &mut WidgetTree,
        w: WidgetId,
        to_row: i32,
        to_col: i32,
        how: MovePolicy,
    ) {
        debug_assert!(self.grid.is_child(w), "move_cell widget must be a child");

        let mut rowspan = 1;
        let mut colspan = 1;
        let mut align = Align::FILL;
        let mut min_size = gridkit_layout::DEFAULT_MIN_SIZE;
        if let Some(old) = self.grid.cell(w) {
            if old.row() as i32 == to_row && old.col() as i32 == to_col {
                return;
            }
            rowspan = old.rowspan();
            colspan = old.colspan();
            align = old.align();
            min_size = old.minimum_size();
        }

        if to_row < 0 || to_col < 0 {
            trace!(?w, to_row, to_col, "move_cell target out of bounds");
            return;
        }
        let (row, col) = (to_row as usize, to_col as usize);
        if row + rowspan > self.grid.rows() || col + colspan > self.grid.cols() {
            trace!(?w, to_row, to_col, "move_cell target out of bounds");
            return;
        }

        match how {
            MovePolicy::Overwrite => {
                if let Some(cell) = self.widget(w, row, col, rowspan, colspan, align) {
                    cell.set_minimum_size(min_size.0, min_size.1);
                }
            }
            MovePolicy::Skip => {
                if self.grid.cell_at(row, col).is_none() {
                    if let Some(cell) = self.widget(w, row, col, rowspan, colspan, align) {
                        cell.set_minimum_size(min_size.0, min_size.1);
                    }
                } else if let Some(old) = self.grid.cell(w) {
                    // Target taken: don't move in, and give up our own
                    // cell too, making ourselves homeless.
                    let (r, c) = (old.row(), old.col());
                    self.grid.remove_cell(r, c);
                }
            }
            MovePolicy::Transient => {
                if self.grid.cell_at(row, col).is_none() {
                    if let Some(cell) = self.widget(w, row, col, rowspan, colspan, align) {
                        cell.set_minimum_size(min_size.0, min_size.1);
                    }
                } else {
                    let occupant_bounds = self
                        .grid
                        .occupant(row, col)
                        .map(|occ| tree.bounds(occ))
                        .unwrap_or_default();
                    let cell = self.transient_widget(w, row, col, rowspan, colspan, align);
                    cell.set_minimum_size(min_size.0, min_size.1);
                    trace!(?w, row, col, "parked transient placement");
                    tree.propose_geometry(w, occupant_bounds);
                }
            }
        }
    }

    /// Create or replace the transient entry for a widget.
    ///
    /// If the widget holds a committed cell it is removed here; if it
    /// already has a transient entry, the entry is replaced in place
    /// with the old minimum size carried forward.
    fn transient_widget(
        &mut self,
        w: WidgetId,
        row: usize,
        col: usize,
        rowspan: usize,
        colspan: usize,
        align: Align,
    ) -> &mut Cell {
        let mut carried: Option<(i32, i32)> = None;
        if let Some(old) = self.grid.cell(w) {
            carried = Some(old.minimum_size());
            let (r, c) = (old.row(), old.col());
            self.grid.remove_cell(r, c);
        }

        let mut cell = Cell::new(row, col);
        cell.set_rowspan(rowspan);
        cell.set_colspan(colspan);
        cell.set_align(align);

        match self.transient.iter().position(|e| e.widget == w) {
            Some(i) => {
                let carried = carried.unwrap_or_else(|| self.transient[i].cell.minimum_size());
                cell.set_minimum_size(carried.0, carried.1);
                self.transient[i].cell = cell;
                &mut self.transient[i].cell
            }
            None => {
                if let Some((mw, mh)) = carried {
                    cell.set_minimum_size(mw, mh);
                }
                if self.transient.len() == self.transient.capacity() {
                    self.transient.reserve(TRANSIENT_HEADROOM);
                }
                self.transient.push(TransientEntry { widget: w, cell });
                let last = self.transient.len() - 1;
                &mut self.transient[last].cell
            }
        }
    }

    /// Drop the transient entry for a widget, compacting the list and
    /// preserving the order of the rest.
    fn transient_remove(&mut self, w: WidgetId) {
        if let Some(i) = self.transient.iter().position(|e| e.widget == w) {
            self.transient.remove(i);
        }
    }

    /// Transient cell of a widget, if it has one.
    #[must_use]
    pub fn transient_cell(&self, w: WidgetId) -> Option<&Cell> {
        self.transient
            .iter()
            .find(|e| e.widget == w)
            .map(|e| &e.cell)
    }

    /// The single lookup an editor needs: the committed cell if present,
    /// else the transient cell, else `None`.
    #[must_use]
    pub fn any_cell(&self, w: WidgetId) -> Option<&Cell> {
        self.grid.cell(w).or_else(|| self.transient_cell(w))
    }

    /// Number of parked transient placements.
    #[must_use]
    pub fn transient_count(&self) -> usize {
        self.transient.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    fn setup() -> (WidgetTree, GridProxy, WidgetId, WidgetId) {
        let mut tree = WidgetTree::new();
        let mut proxy = GridProxy::new(Rect::new(0, 0, 300, 300));
        let a = tree.add(NodeKind::Button, Rect::new(0, 0, 20, 20));
        let b = tree.add(NodeKind::Output, Rect::new(50, 50, 20, 20));
        proxy.grid_mut().add_child(a);
        proxy.grid_mut().add_child(b);
        (tree, proxy, a, b)
    }

    #[test]
    fn overwrite_evicts_occupant() {
        let (mut tree, mut proxy, a, b) = setup();
        proxy.move_cell(&mut tree, a, 0, 0, MovePolicy::Overwrite);
        proxy.move_cell(&mut tree, b, 0, 0, MovePolicy::Overwrite);
        assert!(proxy.grid().cell(a).is_none());
        assert_eq!(proxy.grid().occupant(0, 0), Some(b));
        assert_eq!(proxy.transient_count(), 0);
    }

    #[test]
    fn skip_into_occupied_makes_mover_homeless() {
        let (mut tree, mut proxy, a, b) = setup();
        proxy.move_cell(&mut tree, a, 0, 0, MovePolicy::Overwrite);
        proxy.move_cell(&mut tree, b, 1, 1, MovePolicy::Overwrite);
        proxy.move_cell(&mut tree, b, 0, 0, MovePolicy::Skip);
        // Occupant untouched, mover lost its own placement too.
        assert_eq!(proxy.grid().occupant(0, 0), Some(a));
        assert!(proxy.grid().cell(b).is_none());
        assert!(proxy.transient_cell(b).is_none());
    }

    #[test]
    fn skip_into_free_commits() {
        let (mut tree, mut proxy, a, _) = setup();
        proxy.move_cell(&mut tree, a, 2, 1, MovePolicy::Skip);
        assert_eq!(proxy.grid().occupant(2, 1), Some(a));
    }

    #[test]
    fn transient_into_occupied_parks_and_overlaps() {
        let (mut tree, mut proxy, a, b) = setup();
        tree.propose_geometry(a, Rect::new(10, 10, 80, 40));
        proxy.move_cell(&mut tree, a, 0, 0, MovePolicy::Overwrite);
        proxy.move_cell(&mut tree, b, 0, 0, MovePolicy::Transient);

        // A stays committed, B is transient only.
        assert_eq!(proxy.grid().occupant(0, 0), Some(a));
        assert!(proxy.grid().cell(b).is_none());
        let t = proxy.transient_cell(b).expect("transient entry");
        assert_eq!((t.row(), t.col()), (0, 0));
        assert_eq!(proxy.transient_count(), 1);
        assert_eq!(proxy.any_cell(b), Some(t));
        // Preview overlaps the occupant's bounds, proposed not committed.
        assert_eq!(tree.bounds(b), Rect::new(10, 10, 80, 40));
        assert!(!tree.take_geometry_dirty());
    }

    #[test]
    fn transient_commits_when_target_frees_up() {
        let (mut tree, mut proxy, a, b) = setup();
        proxy.move_cell(&mut tree, a, 0, 0, MovePolicy::Overwrite);
        proxy.move_cell(&mut tree, b, 0, 0, MovePolicy::Transient);
        proxy.move_cell(&mut tree, b, 1, 1, MovePolicy::Transient);

        assert_eq!(proxy.grid().occupant(1, 1), Some(b));
        assert_eq!(proxy.transient_count(), 0, "entry removed on commit");
        assert_eq!(proxy.grid().occupant(0, 0), Some(a));
    }

    #[test]
    fn transient_replaces_in_place_on_repeated_moves() {
        let (mut tree, mut proxy, a, b) = setup();
        proxy.move_cell(&mut tree, a, 0, 0, MovePolicy::Overwrite);
        proxy.move_cell(&mut tree, b, 1, 1, MovePolicy::Overwrite);
        // Occupy (1,1)'s neighbors so B keeps colliding.
        proxy.move_cell(&mut tree, b, 0, 0, MovePolicy::Transient);
        assert_eq!(proxy.transient_count(), 1);
        // Move the transient again onto the same occupant.
        proxy.move_cell(&mut tree, b, 0, 0, MovePolicy::Transient);
        assert_eq!(proxy.transient_count(), 1, "replaced, not appended");
    }

    #[test]
    fn transient_releases_committed_cell() {
        let (mut tree, mut proxy, a, b) = setup();
        proxy.move_cell(&mut tree, a, 0, 0, MovePolicy::Overwrite);
        proxy.move_cell(&mut tree, b, 2, 2, MovePolicy::Overwrite);
        proxy.move_cell(&mut tree, b, 0, 0, MovePolicy::Transient);
        assert!(proxy.grid().cell_at(2, 2).is_none(), "old cell released");
        assert!(proxy.grid().cell(b).is_none());
        assert!(proxy.transient_cell(b).is_some());
    }

    #[test]
    fn transient_carries_minimum_size_forward() {
        let (mut tree, mut proxy, a, b) = setup();
        proxy.move_cell(&mut tree, a, 0, 0, MovePolicy::Overwrite);
        proxy.move_cell(&mut tree, b, 2, 2, MovePolicy::Overwrite);
        proxy
            .grid_mut()
            .cell_mut(b)
            .expect("committed")
            .set_minimum_size(60, 30);
        proxy.move_cell(&mut tree, b, 0, 0, MovePolicy::Transient);
        assert_eq!(
            proxy.transient_cell(b).expect("transient").minimum_size(),
            (60, 30)
        );
    }

    #[test]
    fn move_to_own_cell_is_noop() {
        let (mut tree, mut proxy, a, b) = setup();
        proxy.move_cell(&mut tree, a, 1, 1, MovePolicy::Overwrite);
        proxy.move_cell(&mut tree, b, 1, 1, MovePolicy::Transient);
        assert_eq!(proxy.transient_count(), 1);
        // A "moves" onto its own origin: nothing changes, B stays parked.
        proxy.move_cell(&mut tree, a, 1, 1, MovePolicy::Overwrite);
        assert_eq!(proxy.grid().occupant(1, 1), Some(a));
        assert_eq!(proxy.transient_count(), 1);
    }

    #[test]
    fn out_of_bounds_moves_are_noops() {
        let (mut tree, mut proxy, a, _) = setup();
        proxy.move_cell(&mut tree, a, 1, 1, MovePolicy::Overwrite);
        for (r, c) in [(-1, 1), (1, -1), (3, 0), (0, 3)] {
            proxy.move_cell(&mut tree, a, r, c, MovePolicy::Transient);
        }
        let cell = proxy.grid().cell(a).expect("still placed");
        assert_eq!((cell.row(), cell.col()), (1, 1));
        assert_eq!(proxy.transient_count(), 0);
    }

    #[test]
    fn spanning_cell_inherits_span_and_respects_bounds() {
        let (mut tree, mut proxy, a, _) = setup();
        proxy.move_cell(&mut tree, a, 0, 0, MovePolicy::Overwrite);
        proxy
            .grid_mut()
            .cell_mut(a)
            .expect("cell")
            .set_colspan(2);
        // (0,2) would put the 2-wide span past column 3.
        proxy.move_cell(&mut tree, a, 0, 2, MovePolicy::Overwrite);
        assert_eq!(proxy.grid().cell(a).expect("cell").col(), 0, "no-op");
        // (1,1) fits.
        proxy.move_cell(&mut tree, a, 1, 1, MovePolicy::Overwrite);
        let cell = proxy.grid().cell(a).expect("cell");
        assert_eq!((cell.row(), cell.col(), cell.colspan()), (1, 1, 2));
    }

    #[test]
    fn remove_child_purges_transient() {
        let (mut tree, mut proxy, a, b) = setup();
        proxy.move_cell(&mut tree, a, 0, 0, MovePolicy::Overwrite);
        proxy.move_cell(&mut tree, b, 0, 0, MovePolicy::Transient);
        proxy.remove_child(b);
        assert_eq!(proxy.transient_count(), 0);
        assert!(!proxy.grid().is_child(b));
    }

    #[test]
    fn transient_order_preserved_on_removal() {
        let mut tree = WidgetTree::new();
        let mut proxy = GridProxy::new(Rect::new(0, 0, 300, 300));
        let blocker = tree.add(NodeKind::Box, Rect::default());
        proxy.grid_mut().add_child(blocker);
        proxy.move_cell(&mut tree, blocker, 0, 0, MovePolicy::Overwrite);

        let ids: Vec<WidgetId> = (0..4)
            .map(|_| {
                let id = tree.add(NodeKind::Button, Rect::default());
                proxy.grid_mut().add_child(id);
                proxy.move_cell(&mut tree, id, 0, 0, MovePolicy::Transient);
                id
            })
            .collect();
        assert_eq!(proxy.transient_count(), 4);

        // Commit the second one elsewhere; the rest keep their order.
        proxy.move_cell(&mut tree, ids[1], 1, 1, MovePolicy::Transient);
        assert_eq!(proxy.transient_count(), 3);
        for (i, &id) in [ids[0], ids[2], ids[3]].iter().enumerate() {
            let nth = proxy.transient.get(i).expect("entry");
            assert_eq!(nth.widget, id);
        }
    }
}
