#![forbid(unsafe_code)]

//! The designer's node store.
//!
//! Nodes are addressed by [`WidgetId`] and carry a closed [`NodeKind`];
//! narrowing is a checked accessor, never a reinterpreting cast. The
//! tree also owns every node's on-screen geometry and distinguishes two
//! ways of changing it:
//!
//! - [`propose_geometry`](WidgetTree::propose_geometry): a preview move,
//!   e.g. the proxy overlapping a dragged widget onto an occupant. Never
//!   flagged as a user resize.
//! - [`commit_geometry`](WidgetTree::commit_geometry): a user-driven
//!   change the surrounding editor must react to (minimum-size tracking,
//!   layout recompute).

use gridkit_core::{Rect, WidgetId};

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// Closed set of designer node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A grid container.
    Grid,
    /// A push button.
    Button,
    /// A read-only text output.
    Output,
    /// A plain box widget; also the fallback for unknown child blocks
    /// read from newer project files.
    Box,
    /// A code-only node with no widget and no geometry.
    Function,
}

impl NodeKind {
    /// Keyword used for this kind in the project format.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Button => "button",
            Self::Output => "output",
            Self::Box => "box",
            Self::Function => "function",
        }
    }

    /// Parse a project-format keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "grid" => Some(Self::Grid),
            "button" => Some(Self::Button),
            "output" => Some(Self::Output),
            "box" => Some(Self::Box),
            "function" => Some(Self::Function),
            _ => None,
        }
    }

    /// True for kinds that are real widgets with geometry and may occupy
    /// a grid cell.
    #[must_use]
    pub const fn is_widget(self) -> bool {
        !matches!(self, Self::Function)
    }
}

// ---------------------------------------------------------------------------
// WidgetTree
// ---------------------------------------------------------------------------

/// One node in the designer tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: WidgetId,
    pub kind: NodeKind,
    pub name: Option<String>,
    pub bounds: Rect,
}

/// Flat store of designer nodes with stable, never-reused identities.
#[derive(Debug, Default)]
pub struct WidgetTree {
    nodes: Vec<TreeNode>,
    next_id: u32,
    /// Set by `commit_geometry`; the editor shell drains it to decide
    /// whether a layout pass and minimum-size tracking are due.
    geometry_dirty: bool,
}

impl WidgetTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node.
    pub fn add(&mut self, kind: NodeKind, bounds: Rect) -> WidgetId {
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.nodes.push(TreeNode {
            id,
            kind,
            name: None,
            bounds,
        });
        id
    }

    /// Allocate a named node.
    pub fn add_named(&mut self, kind: NodeKind, bounds: Rect, name: impl Into<String>) -> WidgetId {
        let id = self.add(kind, bounds);
        self.set_name(id, Some(name.into()));
        id
    }

    #[must_use]
    pub fn get(&self, id: WidgetId) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn get_mut(&mut self, id: WidgetId) -> Option<&mut TreeNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    #[must_use]
    pub fn kind(&self, id: WidgetId) -> Option<NodeKind> {
        self.get(id).map(|n| n.kind)
    }

    /// Checked narrowing: the id only if it names a grid node.
    #[must_use]
    pub fn as_grid(&self, id: WidgetId) -> Option<WidgetId> {
        (self.kind(id) == Some(NodeKind::Grid)).then_some(id)
    }

    /// True if the id names a real widget (geometry-bearing) node.
    #[must_use]
    pub fn is_widget(&self, id: WidgetId) -> bool {
        self.kind(id).is_some_and(NodeKind::is_widget)
    }

    #[must_use]
    pub fn name(&self, id: WidgetId) -> Option<&str> {
        self.get(id).and_then(|n| n.name.as_deref())
    }

    pub fn set_name(&mut self, id: WidgetId, name: Option<String>) {
        if let Some(n) = self.get_mut(id) {
            n.name = name;
        }
    }

    /// Current on-screen bounds; empty default for unknown ids.
    #[must_use]
    pub fn bounds(&self, id: WidgetId) -> Rect {
        self.get(id).map_or_else(Rect::default, |n| n.bounds)
    }

    /// Preview geometry change: moves the node on screen without
    /// registering as a user resize.
    pub fn propose_geometry(&mut self, id: WidgetId, bounds: Rect) {
        if let Some(n) = self.get_mut(id) {
            n.bounds = bounds;
        }
    }

    /// User-driven geometry change; flags the tree so the editor runs
    /// minimum-size tracking and a layout pass.
    pub fn commit_geometry(&mut self, id: WidgetId, bounds: Rect) {
        if let Some(n) = self.get_mut(id) {
            n.bounds = bounds;
            self.geometry_dirty = true;
        }
    }

    /// Drain the user-resize flag.
    pub fn take_geometry_dirty(&mut self) -> bool {
        std::mem::take(&mut self.geometry_dirty)
    }
}

// ---------------------------------------------------------------------------
// SelectionContext
// ---------------------------------------------------------------------------

/// The editor's current selection, passed explicitly into the operations
/// that depend on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionContext {
    pub current: Option<WidgetId>,
}

impl SelectionContext {
    #[must_use]
    pub fn of(id: WidgetId) -> Self {
        Self { current: Some(id) }
    }

    /// The selected node, narrowed to a grid. `None` when nothing is
    /// selected or the selection is not a grid.
    #[must_use]
    pub fn selected_grid(&self, tree: &WidgetTree) -> Option<WidgetId> {
        self.current.and_then(|id| tree.as_grid(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip() {
        for kind in [
            NodeKind::Grid,
            NodeKind::Button,
            NodeKind::Output,
            NodeKind::Box,
            NodeKind::Function,
        ] {
            assert_eq!(NodeKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(NodeKind::from_keyword("slider"), None);
    }

    #[test]
    fn narrowing_rejects_non_grid() {
        let mut tree = WidgetTree::new();
        let g = tree.add(NodeKind::Grid, Rect::new(0, 0, 100, 100));
        let b = tree.add(NodeKind::Button, Rect::new(0, 0, 20, 20));
        assert_eq!(tree.as_grid(g), Some(g));
        assert_eq!(tree.as_grid(b), None);
        assert!(tree.is_widget(b));
        let f = tree.add(NodeKind::Function, Rect::default());
        assert!(!tree.is_widget(f));
    }

    #[test]
    fn propose_does_not_flag_commit_does() {
        let mut tree = WidgetTree::new();
        let b = tree.add(NodeKind::Button, Rect::new(0, 0, 20, 20));
        tree.propose_geometry(b, Rect::new(5, 5, 30, 30));
        assert_eq!(tree.bounds(b), Rect::new(5, 5, 30, 30));
        assert!(!tree.take_geometry_dirty());

        tree.commit_geometry(b, Rect::new(0, 0, 40, 40));
        assert!(tree.take_geometry_dirty());
        assert!(!tree.take_geometry_dirty(), "flag drains");
    }

    #[test]
    fn selection_narrowing() {
        let mut tree = WidgetTree::new();
        let g = tree.add(NodeKind::Grid, Rect::new(0, 0, 100, 100));
        let b = tree.add(NodeKind::Button, Rect::new(0, 0, 20, 20));
        assert_eq!(SelectionContext::of(g).selected_grid(&tree), Some(g));
        assert_eq!(SelectionContext::of(b).selected_grid(&tree), None);
        assert_eq!(SelectionContext::default().selected_grid(&tree), None);
    }
}
