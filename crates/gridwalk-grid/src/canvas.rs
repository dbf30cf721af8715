use crate::traits::DrawingSurface;

/// A straight line segment recorded by a [`LineCanvas`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line<C> {
    /// Start x (px)
    pub x1: f32,
    /// Start y (px)
    pub y1: f32,
    /// End x (px)
    pub x2: f32,
    /// End y (px)
    pub y2: f32,
    /// Line color
    pub color: C,
}

/// An in-memory drawing surface that records every line drawn on it.
///
/// Hosts replay the recorded lines with their own renderer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCanvas<C> {
    width: f32,
    height: f32,
    lines: Vec<Line<C>>,
}

impl<C> LineCanvas<C> {
    /// Creates an empty canvas with the given extent.
    pub fn new(width: f32, height: f32) -> Self {
        LineCanvas {
            width,
            height,
            lines: Vec::new(),
        }
    }

    /// Lines drawn so far, in drawing order.
    pub fn lines(&self) -> &[Line<C>] {
        &self.lines
    }

    /// Returns `true` if nothing has been drawn.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<C: Copy> DrawingSurface for LineCanvas<C> {
    type Color = C;

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: C) {
        self.lines.push(Line { x1, y1, x2, y2, color });
    }
}
