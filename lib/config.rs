//! Placement parameters for legos manufactured by rewrite rules.

use crate::network::Position;

/// Controls where rewrite rules put the legos they create.
///
/// Positions carry no algebraic meaning; they only need to be deterministic so
/// that applying a rule twice to the same input produces identical output.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Layout {
    /// Distance between a replaced lego and the legos created around it.
    pub spacing: f64,
}

impl Default for Layout {
    fn default() -> Self { Self { spacing: 50.0 } }
}

impl Layout {
    /// Create a new layout with a given spacing.
    pub fn new(spacing: f64) -> Self { Self { spacing } }

    /// Return the position `k` steps of `spacing` to the right of `pos`.
    pub fn right_of(&self, pos: Position, k: usize) -> Position {
        Position::new(pos.x + self.spacing * k as f64, pos.y)
    }

    /// Return the position `k` steps of `spacing` below `pos`.
    pub fn below(&self, pos: Position, k: usize) -> Position {
        Position::new(pos.x, pos.y + self.spacing * k as f64)
    }

    /// Return the `k`-th of `n` positions spread evenly on a circle of radius
    /// `spacing` around `pos`.
    pub fn around(&self, pos: Position, k: usize, n: usize) -> Position {
        let n = n.max(1) as f64;
        let angle = std::f64::consts::TAU * k as f64 / n;
        Position::new(
            pos.x + self.spacing * angle.cos(),
            pos.y + self.spacing * angle.sin(),
        )
    }
}
