#![forbid(unsafe_code)]

//! Core: geometry primitives and widget identities for gridkit.
//!
//! # Role in gridkit
//! `gridkit-core` is the leaf crate. It owns the pixel-space value types
//! (`Rect`, `Margin`), the stable widget identity (`WidgetId`) the layout
//! and designer layers key their tables on, and the arrow-key type used
//! by keyboard gestures.
//!
//! # How it fits in the system
//! The layout engine (`gridkit-layout`) positions children identified by
//! `WidgetId` inside `Rect` bounds. The designer layer (`gridkit-designer`)
//! maps pointer coordinates and arrow keys onto those same types. Nothing
//! here knows about grids, cells, or project files.

pub mod event;
pub mod geometry;
pub mod id;

pub use event::ArrowKey;
pub use geometry::{Margin, Rect};
pub use id::WidgetId;
