#![forbid(unsafe_code)]

//! The grid designer node: persistence, code generation, and gesture
//! mapping over a [`GridProxy`].
//!
//! Serialization and code generation share one rule: emit only what
//! differs from the defaults, but emit track arrays full-length so the
//! array length stays implicitly equal to the dimension count. Only the
//! *committed* cell table is persisted; transient placements are preview
//! state and never reach the file or the generated code.
//!
//! Reading is property-name dispatch. `location` places the child
//! immediately so the properties after it apply to a live cell, which is
//! why the writer puts `location` first in every placement block.
//! Unknown property names fall through to the base widget-node handler,
//! which skips one value word, so newer files load in older readers.

use gridkit_core::{ArrowKey, Margin, Rect, WidgetId};
use gridkit_layout::{Align, DEFAULT_MIN_SIZE, DEFAULT_WEIGHT, GAP_UNSET, Grid};
use tracing::{debug, trace};

use crate::io::{CodeWriter, ProjectReader, ProjectWriter, scan_ints};
use crate::proxy::{GridProxy, MovePolicy};
use crate::tree::{NodeKind, SelectionContext, WidgetTree};

// ---------------------------------------------------------------------------
// Base widget-node hooks
// ---------------------------------------------------------------------------

/// Base properties every widget node writes: optional name, then
/// position and size. Grid-specific properties follow these.
pub fn write_base_properties(
    writer: &mut ProjectWriter,
    level: usize,
    tree: &WidgetTree,
    id: WidgetId,
) {
    if let Some(name) = tree.name(id) {
        writer.write_indent(level + 1);
        writer.write_string(format!("name {{{name}}}"));
    }
    let b = tree.bounds(id);
    writer.write_indent(level + 1);
    writer.write_string(format!("xywh {{{} {} {} {}}}", b.x, b.y, b.w, b.h));
}

/// Base property dispatch. Returns true when the property was consumed.
pub fn read_base_property(
    tree: &mut WidgetTree,
    reader: &mut ProjectReader<'_>,
    id: WidgetId,
    name: &str,
) -> bool {
    match name {
        "name" => {
            if let Some(value) = reader.read_word() {
                tree.set_name(id, Some(value));
            }
            true
        }
        "xywh" => {
            if let Some(value) = reader.read_word()
                && let Some([x, y, w, h]) = scan_ints::<4>(&value)
            {
                // File data, not a user resize.
                tree.propose_geometry(id, Rect::new(x, y, w, h));
            }
            true
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// GridNode
// ---------------------------------------------------------------------------

/// Designer binding of one grid widget.
#[derive(Debug)]
pub struct GridNode {
    widget: WidgetId,
    proxy: GridProxy,
}

impl GridNode {
    /// Create a grid node with the designer's default 3x3 table.
    pub fn new(tree: &mut WidgetTree, bounds: Rect) -> Self {
        let widget = tree.add(NodeKind::Grid, bounds);
        Self {
            widget,
            proxy: GridProxy::new(bounds),
        }
    }

    #[inline]
    #[must_use]
    pub fn widget_id(&self) -> WidgetId {
        self.widget
    }

    #[inline]
    #[must_use]
    pub fn proxy(&self) -> &GridProxy {
        &self.proxy
    }

    #[inline]
    pub fn proxy_mut(&mut self) -> &mut GridProxy {
        &mut self.proxy
    }

    // -- child hooks --------------------------------------------------------

    /// Create a child node; widget kinds also join the grid membership,
    /// initially un-positioned.
    pub fn add_child(&mut self, tree: &mut WidgetTree, kind: NodeKind, bounds: Rect) -> WidgetId {
        let id = tree.add(kind, bounds);
        if kind.is_widget() {
            self.proxy.grid_mut().add_child(id);
        }
        self.proxy.grid_mut().need_layout();
        id
    }

    /// Reorder a child; placement is untouched but serialization and
    /// generated code follow membership order.
    pub fn move_child(&mut self, w: WidgetId, index: usize) {
        self.proxy.grid_mut().reorder_child(w, index);
    }

    /// Remove a child from the grid, its cell, and the transient list.
    pub fn remove_child(&mut self, w: WidgetId) {
        self.proxy.remove_child(w);
    }

    // -- persistence: write -------------------------------------------------

    /// Write the grid's own properties (after the base ones).
    pub fn write_properties(&self, tree: &WidgetTree, writer: &mut ProjectWriter, level: usize) {
        write_base_properties(writer, level, tree, self.widget);
        let grid = self.proxy.grid();
        let (rows, cols) = (grid.rows(), grid.cols());

        writer.write_indent(level + 1);
        writer.write_string(format!("dimensions {{{rows} {cols}}}"));
        let m = grid.margin();
        if !m.is_zero() {
            writer.write_string(format!(
                "margin {{{} {} {} {}}}",
                m.left, m.top, m.right, m.bottom
            ));
        }
        let (rg, cg) = grid.gap();
        if rg != 0 || cg != 0 {
            writer.write_string(format!("gap {{{rg} {cg}}}"));
        }

        write_track_array(writer, level, "rowheights", rows, 0, |i| grid.row_height(i));
        write_track_array(writer, level, "rowweights", rows, DEFAULT_WEIGHT, |i| {
            grid.row_weight(i)
        });
        write_track_array(writer, level, "rowgaps", rows, GAP_UNSET, |i| grid.row_gap(i));
        write_track_array(writer, level, "colwidths", cols, 0, |i| grid.col_width(i));
        write_track_array(writer, level, "colweights", cols, DEFAULT_WEIGHT, |i| {
            grid.col_weight(i)
        });
        write_track_array(writer, level, "colgaps", cols, GAP_UNSET, |i| grid.col_gap(i));
    }

    /// Write the placement block for one child. Children without a
    /// committed cell (including transient ones) get no block.
    pub fn write_parent_properties(
        &self,
        tree: &WidgetTree,
        writer: &mut ProjectWriter,
        child: WidgetId,
        level: usize,
        encapsulate: bool,
    ) {
        if !tree.is_widget(child) {
            return;
        }
        let Some(cell) = self.proxy.grid().cell(child) else {
            return;
        };
        if encapsulate {
            writer.write_indent(level + 2);
            writer.write_string("parent_properties {");
        }
        writer.write_indent(level + 3);
        writer.write_string(format!("location {{{} {}}}", cell.row(), cell.col()));
        if cell.colspan() > 1 {
            writer.write_indent(level + 3);
            writer.write_string(format!("colspan {}", cell.colspan()));
        }
        if cell.rowspan() > 1 {
            writer.write_indent(level + 3);
            writer.write_string(format!("rowspan {}", cell.rowspan()));
        }
        if cell.align() != Align::FILL {
            writer.write_indent(level + 3);
            writer.write_string(format!("align {}", cell.align().bits()));
        }
        let (mw, mh) = cell.minimum_size();
        if (mw, mh) != DEFAULT_MIN_SIZE {
            writer.write_indent(level + 3);
            writer.write_string(format!("minsize {{{mw} {mh}}}"));
        }
        if encapsulate {
            writer.write_indent(level + 2);
            writer.write_string("}");
        }
    }

    /// Write the complete grid block: base + grid properties, then one
    /// nested block per child in membership order.
    pub fn write(&self, tree: &WidgetTree, writer: &mut ProjectWriter, level: usize) {
        writer.write_indent(level);
        writer.write_string("grid {");
        self.write_properties(tree, writer, level);
        for &child in self.proxy.grid().children() {
            let kind = tree.kind(child).unwrap_or(NodeKind::Box);
            writer.write_indent(level + 1);
            writer.write_string(format!("{} {{", kind.keyword()));
            write_base_properties(writer, level + 1, tree, child);
            self.write_parent_properties(tree, writer, child, level, true);
            writer.write_indent(level + 1);
            writer.write_string("}");
        }
        writer.write_indent(level);
        writer.write_string("}");
    }

    // -- persistence: read --------------------------------------------------

    /// Grid property dispatch. Returns true when the property was
    /// consumed; the caller falls back to the base handler otherwise.
    pub fn read_property(&mut self, reader: &mut ProjectReader<'_>, name: &str) -> bool {
        let grid = self.proxy.grid_mut();
        match name {
            "dimensions" => {
                if let Some(value) = reader.read_word()
                    && let Some([rows, cols]) = scan_ints::<2>(&value)
                    && rows >= 0
                    && cols >= 0
                {
                    grid.layout(rows as usize, cols as usize);
                }
                true
            }
            "margin" => {
                if let Some(value) = reader.read_word()
                    && let Some([l, t, r, b]) = scan_ints::<4>(&value)
                {
                    grid.set_margin(Margin::new(l, t, r, b));
                }
                true
            }
            "gap" => {
                if let Some(value) = reader.read_word()
                    && let Some([rg, cg]) = scan_ints::<2>(&value)
                {
                    grid.set_gap(rg, cg);
                }
                true
            }
            "rowheights" => {
                read_track_array(reader, grid.rows(), |i, v| grid.set_row_height(i, v));
                true
            }
            "rowweights" => {
                read_track_array(reader, grid.rows(), |i, v| grid.set_row_weight(i, v));
                true
            }
            "rowgaps" => {
                read_track_array(reader, grid.rows(), |i, v| grid.set_row_gap(i, v));
                true
            }
            "colwidths" => {
                read_track_array(reader, grid.cols(), |i, v| grid.set_col_width(i, v));
                true
            }
            "colweights" => {
                read_track_array(reader, grid.cols(), |i, v| grid.set_col_weight(i, v));
                true
            }
            "colgaps" => {
                read_track_array(reader, grid.cols(), |i, v| grid.set_col_gap(i, v));
                true
            }
            _ => false,
        }
    }

    /// Placement property dispatch for one child. `location` places
    /// immediately; the rest require the cell to exist already.
    pub fn read_parent_property(
        &mut self,
        tree: &mut WidgetTree,
        reader: &mut ProjectReader<'_>,
        child: WidgetId,
        name: &str,
    ) {
        if !tree.is_widget(child) {
            skip_value(reader, name);
            return;
        }
        match name {
            "location" => {
                if let Some(value) = reader.read_word()
                    && let Some([row, col]) = scan_ints::<2>(&value)
                    && row >= 0
                    && col >= 0
                {
                    self.proxy
                        .widget(child, row as usize, col as usize, 1, 1, Align::FILL);
                }
            }
            "colspan" => {
                let v = read_usize(reader);
                let max = self.proxy.grid().cols();
                if let Some(cell) = self.proxy.grid_mut().cell_mut(child) {
                    let col = cell.col();
                    cell.set_colspan(v.min(max.saturating_sub(col)).max(1));
                }
            }
            "rowspan" => {
                let v = read_usize(reader);
                let max = self.proxy.grid().rows();
                if let Some(cell) = self.proxy.grid_mut().cell_mut(child) {
                    let row = cell.row();
                    cell.set_rowspan(v.min(max.saturating_sub(row)).max(1));
                }
            }
            "align" => {
                let v = reader
                    .read_word()
                    .and_then(|w| w.parse::<u16>().ok())
                    .unwrap_or(Align::FILL.bits());
                if let Some(cell) = self.proxy.grid_mut().cell_mut(child) {
                    cell.set_align(Align::from_bits_retain(v));
                }
            }
            "minsize" => {
                if let Some(value) = reader.read_word()
                    && let Some([w, h]) = scan_ints::<2>(&value)
                    && let Some(cell) = self.proxy.grid_mut().cell_mut(child)
                {
                    cell.set_minimum_size(w, h);
                }
            }
            _ => skip_value(reader, name),
        }
    }

    /// Read a complete grid block. The stream must be positioned right
    /// after the `grid` keyword.
    pub fn read(tree: &mut WidgetTree, reader: &mut ProjectReader<'_>) -> Option<GridNode> {
        if reader.read_word_brace()? != "{" {
            return None;
        }
        let mut node = GridNode::new(tree, Rect::default());
        loop {
            let word = reader.read_word()?;
            if word == "}" {
                break;
            }
            if let Some(kind) = NodeKind::from_keyword(&word) {
                node.read_child(tree, reader, kind)?;
            } else if !node.read_property(reader, &word)
                && !read_base_property(tree, reader, node.widget, &word)
            {
                skip_value(reader, &word);
            }
        }
        // The node's own xywh arrived through the base handler.
        let bounds = tree.bounds(node.widget);
        node.proxy.grid_mut().set_bounds(bounds);
        Some(node)
    }

    fn read_child(
        &mut self,
        tree: &mut WidgetTree,
        reader: &mut ProjectReader<'_>,
        kind: NodeKind,
    ) -> Option<()> {
        if reader.read_word_brace()? != "{" {
            return None;
        }
        let child = self.add_child(tree, kind, Rect::default());
        loop {
            let word = reader.read_word()?;
            if word == "}" {
                break;
            }
            if word == "parent_properties" {
                if reader.read_word_brace()? != "{" {
                    return None;
                }
                loop {
                    let prop = reader.read_word()?;
                    if prop == "}" {
                        break;
                    }
                    self.read_parent_property(tree, reader, child, &prop);
                }
            } else if !read_base_property(tree, reader, child, &word) {
                skip_value(reader, &word);
            }
        }
        Some(())
    }

    // -- code generation ----------------------------------------------------

    /// Emit construction and configuration of the grid itself.
    pub fn write_code1(&self, tree: &WidgetTree, code: &mut CodeWriter) {
        let var = self.code_var(tree);
        let grid = self.proxy.grid();
        let b = tree.bounds(self.widget);
        code.write_c(format!(
            "let mut {var} = Grid::new(Rect::new({}, {}, {}, {}));",
            b.x, b.y, b.w, b.h
        ));
        code.write_c(format!("{var}.layout({}, {});", grid.rows(), grid.cols()));
        let m = grid.margin();
        if !m.is_zero() {
            code.write_c(format!(
                "{var}.set_margin(Margin::new({}, {}, {}, {}));",
                m.left, m.top, m.right, m.bottom
            ));
        }
        let (rg, cg) = grid.gap();
        if rg != 0 || cg != 0 {
            code.write_c(format!("{var}.set_gap({rg}, {cg});"));
        }
        write_code_array(code, &var, "set_row_heights", grid.rows(), 0, |i| {
            grid.row_height(i)
        });
        write_code_array(code, &var, "set_row_weights", grid.rows(), DEFAULT_WEIGHT, |i| {
            grid.row_weight(i)
        });
        write_code_array(code, &var, "set_row_gaps", grid.rows(), GAP_UNSET, |i| {
            grid.row_gap(i)
        });
        write_code_array(code, &var, "set_col_widths", grid.cols(), 0, |i| {
            grid.col_width(i)
        });
        write_code_array(code, &var, "set_col_weights", grid.cols(), DEFAULT_WEIGHT, |i| {
            grid.col_weight(i)
        });
        write_code_array(code, &var, "set_col_gaps", grid.cols(), GAP_UNSET, |i| {
            grid.col_gap(i)
        });
    }

    /// Emit one placement call per committed child, with a conditional
    /// minimum-size call where it differs from the default.
    pub fn write_code2(&self, tree: &WidgetTree, code: &mut CodeWriter) {
        let var = self.code_var(tree);
        let grid = self.proxy.grid();
        for (i, &child) in grid.children().iter().enumerate() {
            let Some(cell) = grid.cell(child) else {
                continue;
            };
            let placement = format!(
                "{var}.widget(children[{i}], {}, {}, {}, {}, {})",
                cell.row(),
                cell.col(),
                cell.rowspan(),
                cell.colspan(),
                cell.align().code_expr()
            );
            let (mw, mh) = cell.minimum_size();
            if (mw, mh) != DEFAULT_MIN_SIZE {
                code.write_c(format!("if let Some(cell) = {placement} {{"));
                code.push_indent();
                code.write_c(format!("cell.set_minimum_size({mw}, {mh});"));
                code.pop_indent();
                code.write_c("}");
            } else {
                code.write_c(format!("{placement};"));
            }
        }
    }

    fn code_var(&self, tree: &WidgetTree) -> String {
        tree.name(self.widget).unwrap_or("o").to_string()
    }

    // -- gestures -----------------------------------------------------------

    /// Track a user resize in the cell's minimum size, per axis, for
    /// axes the alignment does not stretch. Without this the next layout
    /// pass would snap the child back to its old size.
    pub fn child_resized(&mut self, tree: &WidgetTree, child: WidgetId) {
        let bounds = tree.bounds(child);
        let Some(cell) = self.proxy.grid_mut().cell_mut(child) else {
            return;
        };
        if !cell.align().contains(Align::VERTICAL) {
            let (mw, _) = cell.minimum_size();
            cell.set_minimum_size(mw, bounds.h);
        }
        if !cell.align().contains(Align::HORIZONTAL) {
            let (_, mh) = cell.minimum_size();
            cell.set_minimum_size(bounds.w, mh);
        }
    }

    /// Resolve a pixel position to the cell under it and park the child
    /// there (transient when the cell is taken). The selected row/column
    /// is the last whose top/left boundary lies above/left of the point;
    /// a point before the first boundary resolves to no cell and the
    /// move no-ops.
    pub fn insert_child_at(&mut self, tree: &mut WidgetTree, child: WidgetId, x: i32, y: i32) {
        let (row, col) = {
            let grid = self.proxy.grid_mut();
            let b = grid.bounds();
            let m = grid.margin();

            let mut row: i32 = -1;
            let mut y0 = b.y + m.top;
            for r in 0..grid.rows() {
                if y > y0 {
                    row = r as i32;
                }
                y0 += grid.computed_row_height(r) + grid.effective_row_gap(r);
            }

            let mut col: i32 = -1;
            let mut x0 = b.x + m.left;
            for c in 0..grid.cols() {
                if x > x0 {
                    col = c as i32;
                }
                x0 += grid.computed_col_width(c) + grid.effective_col_gap(c);
            }
            (row, col)
        };
        debug!(?child, row, col, "drop resolved to cell");
        self.proxy
            .move_cell(tree, child, row, col, MovePolicy::Transient);
    }

    /// Place a child at the first free origin, scanning row-major. When
    /// the selection is a positioned child of this grid, the scan starts
    /// just past the selected cell and wraps. A full grid grows by one
    /// row and places the child at the start of the new row.
    pub fn insert_child_at_next_free_cell(
        &mut self,
        tree: &mut WidgetTree,
        selection: &SelectionContext,
        child: WidgetId,
    ) {
        if self.proxy.grid().cell(child).is_some() {
            return;
        }
        let rows = self.proxy.grid().rows();
        let cols = self.proxy.grid().cols();
        let total = rows * cols;

        let start = selection
            .current
            .filter(|&s| s != child && self.proxy.grid().is_child(s))
            .and_then(|s| self.proxy.any_cell(s))
            .map(|c| (c.row() * cols + c.col() + 1) % total.max(1));

        let begin = start.unwrap_or(0);
        for k in 0..total {
            let idx = (begin + k) % total;
            let (r, c) = (idx / cols, idx % cols);
            if self.proxy.grid().cell_at(r, c).is_none() {
                self.proxy
                    .move_cell(tree, child, r as i32, c as i32, MovePolicy::Overwrite);
                return;
            }
        }
        self.proxy.grid_mut().layout(rows + 1, cols);
        self.proxy
            .move_cell(tree, child, rows as i32, 0, MovePolicy::Transient);
    }

    /// Move the selected child's cell origin by one step, parking as
    /// transient when it lands on an occupied cell.
    pub fn keyboard_move_child(
        &mut self,
        tree: &mut WidgetTree,
        selection: &SelectionContext,
        key: ArrowKey,
    ) {
        let Some(child) = selection.current else {
            return;
        };
        if !self.proxy.grid().is_child(child) {
            return;
        }
        let Some(cell) = self.proxy.any_cell(child) else {
            return;
        };
        let (dr, dc) = key.delta();
        let (row, col) = (cell.row() as i32 + dr, cell.col() as i32 + dc);
        self.proxy
            .move_cell(tree, child, row, col, MovePolicy::Transient);
    }

    /// Apply the solved layout to the children's on-screen geometry.
    /// Layout-driven moves are proposals, never user resizes.
    pub fn layout_widget(&mut self, tree: &mut WidgetTree) {
        for (w, rect) in self.proxy.grid_mut().child_layout() {
            tree.propose_geometry(w, rect);
        }
    }

    /// Clone the layout configuration onto another grid (live-mode
    /// duplication). Cells belong to the duplicate's own children and
    /// are not copied here.
    pub fn copy_properties(&self, dst: &mut Grid) {
        dst.copy_layout_config(self.proxy.grid());
    }
}

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

/// Write a full-length track array when any entry differs from the
/// default.
fn write_track_array(
    writer: &mut ProjectWriter,
    level: usize,
    key: &str,
    len: usize,
    default: i32,
    value: impl Fn(usize) -> i32,
) {
    if (0..len).all(|i| value(i) == default) {
        return;
    }
    writer.write_indent(level + 1);
    writer.write_string(format!("{key} {{"));
    for i in 0..len {
        writer.write_string(value(i).to_string());
    }
    writer.write_string("}");
}

/// Read a `{ v v v }` array of exactly the current dimension count.
fn read_track_array(
    reader: &mut ProjectReader<'_>,
    len: usize,
    mut apply: impl FnMut(usize, i32),
) {
    if reader.read_word_brace().as_deref() != Some("{") {
        return;
    }
    for i in 0..len {
        apply(i, reader.read_int());
    }
    let _ = reader.read_word_brace(); // closing brace
}

/// Emit a bulk-setter call when any entry differs from the default.
fn write_code_array(
    code: &mut CodeWriter,
    var: &str,
    setter: &str,
    len: usize,
    default: i32,
    value: impl Fn(usize) -> i32,
) {
    if (0..len).all(|i| value(i) == default) {
        return;
    }
    let list: Vec<String> = (0..len).map(|i| value(i).to_string()).collect();
    code.write_c(format!("{var}.{setter}(&[{}]);", list.join(", ")));
}

fn read_usize(reader: &mut ProjectReader<'_>) -> usize {
    reader
        .read_word()
        .and_then(|w| w.parse().ok())
        .unwrap_or(1)
}

/// Base fallback for unknown properties: consume one value word so the
/// stream stays aligned, and keep going (forward compatibility).
fn skip_value(reader: &mut ProjectReader<'_>, name: &str) {
    trace!(name, "skipping unknown property");
    let _ = reader.read_word();
}
