#![forbid(unsafe_code)]

//! Stable widget identities.
//!
//! Every designer node and every layout child is addressed by a
//! [`WidgetId`]. Identities are allocated once by the widget tree and
//! never reused within a session, so the layout tables can key on them
//! without dangling references.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque identity of a widget in the designer's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WidgetId(pub u32);

impl WidgetId {
    /// Raw numeric value, for generated code and diagnostics.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "w{}", self.0)
    }
}
