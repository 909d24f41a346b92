#![forbid(unsafe_code)]

//! The placement record binding one child to a grid rectangle.

use serde::{Deserialize, Serialize};

use crate::{Align, DEFAULT_MIN_SIZE};

/// A placement record: origin, spans, alignment, and minimum content size.
///
/// Owned by the grid (committed placements) or by the editing proxy
/// (transient placements). The rectangle `row..row+rowspan` x
/// `col..col+colspan` must lie inside the grid dimensions; the grid's
/// write paths enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    row: usize,
    col: usize,
    rowspan: usize,
    colspan: usize,
    align: Align,
    min_w: i32,
    min_h: i32,
}

impl Cell {
    /// Create a 1x1 cell at the given origin with default alignment and
    /// minimum size.
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            rowspan: 1,
            colspan: 1,
            align: Align::FILL,
            min_w: DEFAULT_MIN_SIZE.0,
            min_h: DEFAULT_MIN_SIZE.1,
        }
    }

    #[inline]
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    #[must_use]
    pub fn col(&self) -> usize {
        self.col
    }

    #[inline]
    #[must_use]
    pub fn rowspan(&self) -> usize {
        self.rowspan
    }

    #[inline]
    #[must_use]
    pub fn colspan(&self) -> usize {
        self.colspan
    }

    #[inline]
    #[must_use]
    pub fn align(&self) -> Align {
        self.align
    }

    /// Minimum content size as (width, height).
    #[inline]
    #[must_use]
    pub fn minimum_size(&self) -> (i32, i32) {
        (self.min_w, self.min_h)
    }

    /// Spans are clamped to at least 1.
    pub fn set_rowspan(&mut self, rowspan: usize) {
        self.rowspan = rowspan.max(1);
    }

    pub fn set_colspan(&mut self, colspan: usize) {
        self.colspan = colspan.max(1);
    }

    pub fn set_align(&mut self, align: Align) {
        self.align = align;
    }

    pub fn set_minimum_size(&mut self, w: i32, h: i32) {
        self.min_w = w;
        self.min_h = h;
    }

    pub(crate) fn set_origin(&mut self, row: usize, col: usize) {
        self.row = row;
        self.col = col;
    }

    /// True if every attribute besides the origin is at its default, in
    /// which case serialization emits only the location.
    #[must_use]
    pub fn is_default_shape(&self) -> bool {
        self.rowspan == 1
            && self.colspan == 1
            && self.align == Align::FILL
            && (self.min_w, self.min_h) == DEFAULT_MIN_SIZE
    }
}
