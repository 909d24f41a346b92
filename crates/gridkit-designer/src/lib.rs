#![forbid(unsafe_code)]

//! Design-time editing layer over the grid layout engine.
//!
//! # Role in gridkit
//! This crate is what a visual UI builder talks to. It wraps a
//! [`gridkit_layout::Grid`] with:
//!
//! - [`GridProxy`]: the transient-occupancy protocol. A drag can park a
//!   widget on an already-occupied cell without evicting the occupant,
//!   previewing the placement until the target frees up.
//! - [`GridNode`]: the designer binding. Serializes the committed layout
//!   to the brace-delimited project format, reads it back, generates
//!   source code reproducing it, and maps pointer drops and arrow keys
//!   onto proxy operations.
//! - [`WidgetTree`]: the node store. A closed set of node kinds with
//!   checked narrowing, plus the two-phase geometry protocol
//!   (`propose_geometry` for previews, `commit_geometry` for user-driven
//!   resizes).
//!
//! Everything is single-threaded and synchronous; operations complete or
//! no-op immediately.

pub mod io;
pub mod node;
pub mod proxy;
pub mod tree;

pub use io::{CodeWriter, ProjectReader, ProjectWriter};
pub use node::GridNode;
pub use proxy::{GridProxy, MovePolicy};
pub use tree::{NodeKind, SelectionContext, WidgetTree};
