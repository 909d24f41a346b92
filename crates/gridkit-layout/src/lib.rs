#![forbid(unsafe_code)]

//! Constraint-based 2D grid layout solver.
//!
//! A [`Grid`] owns a table of rows x columns, each origin optionally
//! occupied by exactly one [`Cell`] referencing one child widget. Row
//! heights and column widths are computed from explicit sizes, relative
//! weights, and gaps; spanning cells reserve a rectangle but only the
//! origin holds the record.
//!
//! # Example
//!
//! ```
//! use gridkit_core::{Rect, WidgetId};
//! use gridkit_layout::{Align, Grid};
//!
//! let mut grid = Grid::new(Rect::new(0, 0, 320, 240));
//! grid.layout(3, 3);
//!
//! let button = WidgetId(1);
//! grid.add_child(button);
//! grid.widget(button, 0, 0, 1, 2, Align::FILL);
//!
//! let cell = grid.cell(button).unwrap();
//! assert_eq!((cell.row(), cell.col(), cell.colspan()), (0, 0, 2));
//! ```

pub mod align;
pub mod cell;
pub mod grid;

pub use align::Align;
pub use cell::Cell;
pub use grid::{Grid, Track};

/// Default minimum content size of a cell, in pixels.
pub const DEFAULT_MIN_SIZE: (i32, i32) = (20, 20);

/// Default track weight.
pub const DEFAULT_WEIGHT: i32 = 50;

/// Per-track gap value meaning "use the grid-level default gap".
pub const GAP_UNSET: i32 = -1;
