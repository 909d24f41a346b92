#![forbid(unsafe_code)]

//! Cell alignment flags.
//!
//! The numeric bit values are part of the persisted project format
//! (`align N`) and of generated code, so they are fixed here and must not
//! be renumbered.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// How a child is placed inside its cell rectangle.
    ///
    /// `HORIZONTAL`/`VERTICAL` stretch the child to the full cell extent
    /// on that axis; without the stretch flag the child keeps its minimum
    /// size and is positioned by the edge flags, centered if none is set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Align: u16 {
        /// Stretch horizontally to the cell width.
        const HORIZONTAL = 0x0001;
        /// Stretch vertically to the cell height.
        const VERTICAL = 0x0002;
        /// Stretch on both axes (the default).
        const FILL = 0x0003;
        /// Pin to the left cell edge.
        const LEFT = 0x0004;
        /// Pin to the right cell edge.
        const RIGHT = 0x0008;
        /// Pin to the top cell edge.
        const TOP = 0x0010;
        /// Pin to the bottom cell edge.
        const BOTTOM = 0x0020;
    }
}

impl Default for Align {
    fn default() -> Self {
        Self::FILL
    }
}

impl Align {
    /// Centered at minimum size on both axes.
    pub const CENTER: Self = Self::empty();

    /// Rust source expression reproducing this value, for generated code.
    #[must_use]
    pub fn code_expr(self) -> String {
        match self {
            Self::FILL => "Align::FILL".to_string(),
            Self::CENTER => "Align::CENTER".to_string(),
            other => format!("Align::from_bits_retain({})", other.bits()),
        }
    }
}
