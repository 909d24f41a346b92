#![forbid(unsafe_code)]

//! The grid layout engine.
//!
//! # Invariants
//!
//! 1. Every committed [`Cell`] rectangle lies inside `rows() x cols()`;
//!    the write paths (`widget`, `layout`) enforce this.
//! 2. Exactly one cell per occupied origin; spans reserve the rectangle
//!    but only the origin holds the record.
//! 3. A widget has at most one committed cell.
//! 4. `needs_layout` gates recomputation only; every geometry query
//!    self-heals by running the solver first, so correctness never
//!    depends on when dirtying happened.

use gridkit_core::{Margin, Rect, WidgetId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{Align, Cell, DEFAULT_WEIGHT, GAP_UNSET};

// ---------------------------------------------------------------------------
// Track
// ---------------------------------------------------------------------------

/// Sizing configuration of one row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Explicit size in pixels; 0 means auto-computed from content.
    pub size: i32,
    /// Relative share of leftover space for auto tracks.
    pub weight: i32,
    /// Gap after this track; negative means "use the grid default".
    pub gap: i32,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            size: 0,
            weight: DEFAULT_WEIGHT,
            gap: GAP_UNSET,
        }
    }
}

impl Track {
    /// True if all three values are at their serialization defaults.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Solved size and position of one track.
#[derive(Debug, Clone, Copy, Default)]
struct Solved {
    pos: i32,
    size: i32,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A 2D table of rows x columns with at most one child widget per origin.
///
/// The grid owns the committed cell table and the track configuration.
/// Child membership is tracked separately from placement: a child may be
/// un-positioned (no cell) and still belong to the grid.
#[derive(Debug, Clone)]
pub struct Grid {
    bounds: Rect,
    rows: Vec<Track>,
    cols: Vec<Track>,
    margin: Margin,
    /// Grid-level default gaps, used by tracks whose own gap is unset.
    row_gap: i32,
    col_gap: i32,
    children: Vec<WidgetId>,
    cells: FxHashMap<WidgetId, Cell>,
    by_origin: FxHashMap<(usize, usize), WidgetId>,
    needs_layout: bool,
    solved_rows: Vec<Solved>,
    solved_cols: Vec<Solved>,
}

impl Grid {
    /// Create an empty 0x0 grid occupying `bounds`.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            rows: Vec::new(),
            cols: Vec::new(),
            margin: Margin::default(),
            row_gap: 0,
            col_gap: 0,
            children: Vec::new(),
            cells: FxHashMap::default(),
            by_origin: FxHashMap::default(),
            needs_layout: true,
            solved_rows: Vec::new(),
            solved_cols: Vec::new(),
        }
    }

    // -- dimensions and configuration ---------------------------------------

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols.len()
    }

    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Move/resize the grid's own bounding box.
    pub fn set_bounds(&mut self, bounds: Rect) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.needs_layout = true;
        }
    }

    #[inline]
    #[must_use]
    pub fn margin(&self) -> Margin {
        self.margin
    }

    pub fn set_margin(&mut self, margin: Margin) {
        self.margin = margin;
        self.needs_layout = true;
    }

    /// Grid-level default gaps as (row, col).
    #[inline]
    #[must_use]
    pub fn gap(&self) -> (i32, i32) {
        (self.row_gap, self.col_gap)
    }

    pub fn set_gap(&mut self, row_gap: i32, col_gap: i32) {
        self.row_gap = row_gap;
        self.col_gap = col_gap;
        self.needs_layout = true;
    }

    /// Explicit height of a row (0 = auto); 0 when out of bounds.
    #[must_use]
    pub fn row_height(&self, row: usize) -> i32 {
        self.rows.get(row).map_or(0, |t| t.size)
    }

    pub fn set_row_height(&mut self, row: usize, height: i32) {
        if let Some(t) = self.rows.get_mut(row) {
            t.size = height;
            self.needs_layout = true;
        }
    }

    #[must_use]
    pub fn row_weight(&self, row: usize) -> i32 {
        self.rows.get(row).map_or(DEFAULT_WEIGHT, |t| t.weight)
    }

    pub fn set_row_weight(&mut self, row: usize, weight: i32) {
        if let Some(t) = self.rows.get_mut(row) {
            t.weight = weight;
            self.needs_layout = true;
        }
    }

    /// Per-row gap; negative means "use the grid default".
    #[must_use]
    pub fn row_gap(&self, row: usize) -> i32 {
        self.rows.get(row).map_or(GAP_UNSET, |t| t.gap)
    }

    pub fn set_row_gap(&mut self, row: usize, gap: i32) {
        if let Some(t) = self.rows.get_mut(row) {
            t.gap = gap;
            self.needs_layout = true;
        }
    }

    /// Explicit width of a column (0 = auto); 0 when out of bounds.
    #[must_use]
    pub fn col_width(&self, col: usize) -> i32 {
        self.cols.get(col).map_or(0, |t| t.size)
    }

    pub fn set_col_width(&mut self, col: usize, width: i32) {
        if let Some(t) = self.cols.get_mut(col) {
            t.size = width;
            self.needs_layout = true;
        }
    }

    #[must_use]
    pub fn col_weight(&self, col: usize) -> i32 {
        self.cols.get(col).map_or(DEFAULT_WEIGHT, |t| t.weight)
    }

    pub fn set_col_weight(&mut self, col: usize, weight: i32) {
        if let Some(t) = self.cols.get_mut(col) {
            t.weight = weight;
            self.needs_layout = true;
        }
    }

    #[must_use]
    pub fn col_gap(&self, col: usize) -> i32 {
        self.cols.get(col).map_or(GAP_UNSET, |t| t.gap)
    }

    pub fn set_col_gap(&mut self, col: usize, gap: i32) {
        if let Some(t) = self.cols.get_mut(col) {
            t.gap = gap;
            self.needs_layout = true;
        }
    }

    /// Bulk setters used by generated code; extra values are ignored,
    /// missing trailing values leave their tracks unchanged.
    pub fn set_row_heights(&mut self, heights: &[i32]) {
        for (i, &v) in heights.iter().enumerate().take(self.rows()) {
            self.rows[i].size = v;
        }
        self.needs_layout = true;
    }

    pub fn set_row_weights(&mut self, weights: &[i32]) {
        for (i, &v) in weights.iter().enumerate().take(self.rows()) {
            self.rows[i].weight = v;
        }
        self.needs_layout = true;
    }

    pub fn set_row_gaps(&mut self, gaps: &[i32]) {
        for (i, &v) in gaps.iter().enumerate().take(self.rows()) {
            self.rows[i].gap = v;
        }
        self.needs_layout = true;
    }

    pub fn set_col_widths(&mut self, widths: &[i32]) {
        for (i, &v) in widths.iter().enumerate().take(self.cols()) {
            self.cols[i].size = v;
        }
        self.needs_layout = true;
    }

    pub fn set_col_weights(&mut self, weights: &[i32]) {
        for (i, &v) in weights.iter().enumerate().take(self.cols()) {
            self.cols[i].weight = v;
        }
        self.needs_layout = true;
    }

    pub fn set_col_gaps(&mut self, gaps: &[i32]) {
        for (i, &v) in gaps.iter().enumerate().take(self.cols()) {
            self.cols[i].gap = v;
        }
        self.needs_layout = true;
    }

    #[must_use]
    pub fn row_tracks(&self) -> &[Track] {
        &self.rows
    }

    #[must_use]
    pub fn col_tracks(&self) -> &[Track] {
        &self.cols
    }

    /// Resize the table to `rows` x `cols`.
    ///
    /// Existing cells whose rectangle no longer fits are dropped; their
    /// widgets stay children, un-positioned. New track slots get default
    /// size/weight/gap.
    pub fn layout(&mut self, rows: usize, cols: usize) {
        self.rows.resize_with(rows, Track::default);
        self.cols.resize_with(cols, Track::default);
        self.cells
            .retain(|_, c| c.row() + c.rowspan() <= rows && c.col() + c.colspan() <= cols);
        self.rebuild_origin_index();
        self.needs_layout = true;
    }

    /// Copy dimensions, margins, gaps, and per-track configuration from
    /// another grid. Cells are not copied.
    pub fn copy_layout_config(&mut self, src: &Grid) {
        self.layout(src.rows(), src.cols());
        self.margin = src.margin;
        self.row_gap = src.row_gap;
        self.col_gap = src.col_gap;
        self.rows.copy_from_slice(&src.rows);
        self.cols.copy_from_slice(&src.cols);
        self.needs_layout = true;
    }

    // -- membership ---------------------------------------------------------

    #[must_use]
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    #[must_use]
    pub fn is_child(&self, w: WidgetId) -> bool {
        self.children.contains(&w)
    }

    /// Add a child widget, initially un-positioned. No-op if present.
    pub fn add_child(&mut self, w: WidgetId) {
        if !self.is_child(w) {
            self.children.push(w);
            self.needs_layout = true;
        }
    }

    /// Reorder a child within the membership list. Placement is
    /// unaffected; order matters to serialization and generated code,
    /// which address children by index.
    pub fn reorder_child(&mut self, w: WidgetId, index: usize) {
        if let Some(from) = self.children.iter().position(|&c| c == w) {
            self.children.remove(from);
            let index = index.min(self.children.len());
            self.children.insert(index, w);
            self.needs_layout = true;
        }
    }

    /// Remove a child entirely, dropping its cell if it had one.
    pub fn remove_child(&mut self, w: WidgetId) {
        if let Some(idx) = self.children.iter().position(|&c| c == w) {
            self.children.remove(idx);
            if let Some(cell) = self.cells.remove(&w) {
                self.by_origin.remove(&(cell.row(), cell.col()));
            }
            self.needs_layout = true;
        }
    }

    // -- cell table ---------------------------------------------------------

    /// Committed cell of a widget.
    #[must_use]
    pub fn cell(&self, w: WidgetId) -> Option<&Cell> {
        self.cells.get(&w)
    }

    /// Mutable committed cell of a widget.
    ///
    /// Spans set through this are clamped to the grid bounds the next
    /// time geometry is solved, so an over-large span cannot corrupt the
    /// layout even before the caller fixes it up.
    pub fn cell_mut(&mut self, w: WidgetId) -> Option<&mut Cell> {
        self.needs_layout = true;
        self.cells.get_mut(&w)
    }

    /// Committed cell whose origin is (row, col).
    #[must_use]
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.by_origin
            .get(&(row, col))
            .and_then(|w| self.cells.get(w))
    }

    /// Widget whose committed cell originates at (row, col).
    #[must_use]
    pub fn occupant(&self, row: usize, col: usize) -> Option<WidgetId> {
        self.by_origin.get(&(row, col)).copied()
    }

    /// Destructively assign `w` to a rectangle.
    ///
    /// Returns `None` (silently, per the editing contract) if the
    /// rectangle exceeds the grid dimensions. Releases `w`'s prior cell
    /// and evicts any occupant of the target origin; the evicted widget
    /// stays a child, un-positioned. The new cell starts with the default
    /// minimum size regardless of the prior cell.
    pub fn widget(
        &mut self,
        w: WidgetId,
        row: usize,
        col: usize,
        rowspan: usize,
        colspan: usize,
        align: Align,
    ) -> Option<&mut Cell> {
        let rowspan = rowspan.max(1);
        let colspan = colspan.max(1);
        if row + rowspan > self.rows() || col + colspan > self.cols() {
            return None;
        }
        debug_assert!(self.is_child(w), "widget must be a child of the grid");

        if let Some(old) = self.cells.remove(&w) {
            self.by_origin.remove(&(old.row(), old.col()));
        }
        if let Some(occupant) = self.by_origin.remove(&(row, col)) {
            self.cells.remove(&occupant);
        }

        let mut cell = Cell::new(row, col);
        cell.set_rowspan(rowspan);
        cell.set_colspan(colspan);
        cell.set_align(align);
        self.by_origin.insert((row, col), w);
        self.cells.insert(w, cell);
        self.needs_layout = true;
        self.cells.get_mut(&w)
    }

    /// Delete the cell record at an origin; the widget stays a child.
    pub fn remove_cell(&mut self, row: usize, col: usize) {
        if let Some(w) = self.by_origin.remove(&(row, col)) {
            self.cells.remove(&w);
            self.needs_layout = true;
        }
    }

    fn rebuild_origin_index(&mut self) {
        self.by_origin.clear();
        for (&w, cell) in &self.cells {
            self.by_origin.insert((cell.row(), cell.col()), w);
        }
    }

    // -- geometry -----------------------------------------------------------

    /// Mark the layout dirty; the next geometry query re-solves.
    pub fn need_layout(&mut self) {
        self.needs_layout = true;
    }

    /// Effective gap after a row: the row's own gap if set, else the
    /// grid default.
    #[must_use]
    pub fn effective_row_gap(&self, row: usize) -> i32 {
        let gap = self.row_gap(row);
        if gap >= 0 { gap } else { self.row_gap.max(0) }
    }

    /// Effective gap after a column.
    #[must_use]
    pub fn effective_col_gap(&self, col: usize) -> i32 {
        let gap = self.col_gap(col);
        if gap >= 0 { gap } else { self.col_gap.max(0) }
    }

    /// Solve track sizes and positions if anything changed since the
    /// last solve. Idempotent.
    pub fn perform_layout(&mut self) {
        if !self.needs_layout {
            return;
        }

        let row_floors = self.content_floors(true);
        let col_floors = self.content_floors(false);
        let row_gaps: Vec<i32> = (0..self.rows()).map(|r| self.effective_row_gap(r)).collect();
        let col_gaps: Vec<i32> = (0..self.cols()).map(|c| self.effective_col_gap(c)).collect();

        self.solved_rows = solve_axis(
            &self.rows,
            &row_floors,
            &row_gaps,
            self.bounds.y + self.margin.top,
            self.bounds.h - self.margin.top - self.margin.bottom,
        );
        self.solved_cols = solve_axis(
            &self.cols,
            &col_floors,
            &col_gaps,
            self.bounds.x + self.margin.left,
            self.bounds.w - self.margin.left - self.margin.right,
        );
        self.needs_layout = false;
    }

    /// Content floor per track: the largest minimum size among
    /// non-spanning cells originating in it. Fixed tracks keep 0 here;
    /// their explicit size wins in the solver.
    fn content_floors(&self, for_rows: bool) -> Vec<i32> {
        let n = if for_rows { self.rows() } else { self.cols() };
        let mut floors = vec![0; n];
        for cell in self.cells.values() {
            let (min_w, min_h) = cell.minimum_size();
            if for_rows {
                if cell.rowspan() == 1 && cell.row() < n {
                    floors[cell.row()] = floors[cell.row()].max(min_h);
                }
            } else if cell.colspan() == 1 && cell.col() < n {
                floors[cell.col()] = floors[cell.col()].max(min_w);
            }
        }
        floors
    }

    /// Solved height of a row, or 0 when out of bounds.
    pub fn computed_row_height(&mut self, row: usize) -> i32 {
        self.perform_layout();
        self.solved_rows.get(row).map_or(0, |s| s.size)
    }

    /// Solved width of a column, or 0 when out of bounds.
    pub fn computed_col_width(&mut self, col: usize) -> i32 {
        self.perform_layout();
        self.solved_cols.get(col).map_or(0, |s| s.size)
    }

    /// Pixel rectangle of a (possibly spanning) cell region. Spans are
    /// clamped to the grid bounds. Empty if the origin is out of bounds.
    pub fn cell_rect(&mut self, row: usize, col: usize, rowspan: usize, colspan: usize) -> Rect {
        self.perform_layout();
        self.span_rect(row, col, rowspan, colspan)
    }

    /// Same as [`cell_rect`](Self::cell_rect) but assumes the solve is
    /// current; used internally to batch queries.
    fn span_rect(&self, row: usize, col: usize, rowspan: usize, colspan: usize) -> Rect {
        if row >= self.solved_rows.len() || col >= self.solved_cols.len() {
            return Rect::default();
        }
        let end_row = (row + rowspan.max(1)).min(self.solved_rows.len());
        let end_col = (col + colspan.max(1)).min(self.solved_cols.len());

        let x = self.solved_cols[col].pos;
        let y = self.solved_rows[row].pos;
        let mut w: i32 = (col..end_col).map(|c| self.solved_cols[c].size).sum();
        let mut h: i32 = (row..end_row).map(|r| self.solved_rows[r].size).sum();
        // Interior gaps between spanned tracks.
        for c in col..end_col.saturating_sub(1) {
            w += self.effective_col_gap(c);
        }
        for r in row..end_row.saturating_sub(1) {
            h += self.effective_row_gap(r);
        }
        Rect::new(x, y, w, h)
    }

    /// Compute per-child rectangles from the committed cell table.
    ///
    /// Children without a cell are omitted; the caller (the designer's
    /// widget tree, or generated code) applies the rectangles. FILL axes
    /// stretch to the cell rectangle; non-stretch axes take the cell's
    /// minimum size positioned by the edge flags, centered by default.
    pub fn child_layout(&mut self) -> Vec<(WidgetId, Rect)> {
        self.perform_layout();
        let mut out = Vec::with_capacity(self.cells.len());
        for &w in &self.children {
            let Some(cell) = self.cells.get(&w) else {
                continue;
            };
            let region = self.span_rect(cell.row(), cell.col(), cell.rowspan(), cell.colspan());
            out.push((w, place_in_region(cell, region)));
        }
        out
    }
}

/// Align a cell's child inside its solved region.
fn place_in_region(cell: &Cell, region: Rect) -> Rect {
    let (min_w, min_h) = cell.minimum_size();
    let align = cell.align();

    let (x, w) = if align.contains(Align::HORIZONTAL) {
        (region.x, region.w)
    } else if align.contains(Align::LEFT) {
        (region.x, min_w)
    } else if align.contains(Align::RIGHT) {
        (region.right() - min_w, min_w)
    } else {
        (region.x + (region.w - min_w) / 2, min_w)
    };

    let (y, h) = if align.contains(Align::VERTICAL) {
        (region.y, region.h)
    } else if align.contains(Align::TOP) {
        (region.y, min_h)
    } else if align.contains(Align::BOTTOM) {
        (region.bottom() - min_h, min_h)
    } else {
        (region.y + (region.h - min_h) / 2, min_h)
    };

    Rect::new(x, y, w, h)
}

/// Solve one axis: fixed tracks keep their explicit size, auto tracks
/// start at their content floor and share leftover space by weight.
///
/// The share division uses remaining-space / remaining-weight so the
/// allocated sizes sum exactly to the distributable space.
fn solve_axis(tracks: &[Track], floors: &[i32], gaps: &[i32], start: i32, avail: i32) -> Vec<Solved> {
    let n = tracks.len();
    let mut sizes: Vec<i32> = (0..n)
        .map(|i| {
            if tracks[i].size > 0 {
                tracks[i].size
            } else {
                floors[i]
            }
        })
        .collect();

    // Gaps between tracks: the gap of every track but the last.
    let total_gaps: i32 = if n > 1 { gaps[..n - 1].iter().sum() } else { 0 };
    let used: i32 = sizes.iter().sum();
    let mut leftover = avail - total_gaps - used;

    if leftover > 0 {
        let mut remaining_weight: i64 = tracks
            .iter()
            .filter(|t| t.size == 0 && t.weight > 0)
            .map(|t| t.weight as i64)
            .sum();
        for (i, track) in tracks.iter().enumerate() {
            if remaining_weight <= 0 {
                break;
            }
            if track.size == 0 && track.weight > 0 {
                let share = (leftover as i64 * track.weight as i64 / remaining_weight) as i32;
                sizes[i] += share;
                leftover -= share;
                remaining_weight -= track.weight as i64;
            }
        }
    }

    let mut solved = Vec::with_capacity(n);
    let mut pos = start;
    for (i, &size) in sizes.iter().enumerate() {
        solved.push(Solved { pos, size });
        pos += size;
        if i + 1 < n {
            pos += gaps[i];
        }
    }
    solved
}
