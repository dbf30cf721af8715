use std::fmt;

/// A logical cell on the grid, zero-based.
///
/// Coordinates carry no bounds of their own; they are validated against the
/// controller's current row and column ranges when used.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoordinate {
    /// Row index, growing downwards on screen.
    pub row: i32,
    /// Column index, growing to the right on screen.
    pub column: i32,
}

impl GridCoordinate {
    /// Creates a new `GridCoordinate`.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row: {}, column: {})", self.row, self.column)
    }
}

/// A position in screen space, in pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenPixel {
    /// Horizontal pixel position.
    pub x: f32,
    /// Vertical pixel position.
    pub y: f32,
}

impl ScreenPixel {
    /// Creates a new `ScreenPixel`.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ScreenPixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Identity of a sprite. Tracking is keyed by this, never by object equality.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpriteId(pub u32);

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sprite#{}", self.0)
    }
}

/// One-cell step on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// One row towards row 0.
    Up,
    /// One row away from row 0.
    Down,
    /// One column towards column 0.
    Left,
    /// One column away from column 0.
    Right,
}

impl Direction {
    /// Returns the `(row_delta, column_delta)` for a single step.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}
