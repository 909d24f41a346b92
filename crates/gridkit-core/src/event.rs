#![forbid(unsafe_code)]

//! Keyboard input relevant to cell editing.
//!
//! The designer only cares about the four arrow keys; everything else is
//! handled by the surrounding editor shell before it reaches the grid.

/// An arrow key, as delivered by the editor shell's keyboard handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

impl ArrowKey {
    /// Row/column delta for moving a cell origin by one step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_unit_steps() {
        for key in [ArrowKey::Up, ArrowKey::Down, ArrowKey::Left, ArrowKey::Right] {
            let (dr, dc) = key.delta();
            assert_eq!(dr.abs() + dc.abs(), 1);
        }
    }
}
