//! Capabilities the grid expects from its host.
//!
//! The grid never owns sprites, canvases or the screen. It talks to them through
//! these traits so any engine can plug in.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::types::SpriteId;

/// Shared handle to a host sprite.
///
/// The controller keeps a clone of the handle once a sprite is registered so the
/// per-frame update can stop it on arrival. The host keeps its own clone to
/// integrate physics and render.
pub type SpriteHandle<S> = Arc<RwLock<S>>;

/// Wraps a sprite into a [`SpriteHandle`].
pub fn handle<S>(sprite: S) -> SpriteHandle<S> {
    Arc::new(RwLock::new(sprite))
}

/// A movable object with an identity, a position and a velocity in pixels.
///
/// The controller writes position and velocity; host physics integrates the
/// position from the velocity between ticks.
pub trait Movable {
    /// Stable identity of this sprite.
    fn id(&self) -> SpriteId;

    /// Horizontal position (px)
    fn x(&self) -> f32;
    /// Vertical position (px)
    fn y(&self) -> f32;
    /// Set the horizontal position (px)
    fn set_x(&mut self, x: f32);
    /// Set the vertical position (px)
    fn set_y(&mut self, y: f32);

    /// Horizontal velocity (px/s)
    fn vx(&self) -> f32;
    /// Vertical velocity (px/s)
    fn vy(&self) -> f32;
    /// Set the horizontal velocity (px/s)
    fn set_vx(&mut self, vx: f32);
    /// Set the vertical velocity (px/s)
    fn set_vy(&mut self, vy: f32);
}

/// A canvas that can draw straight lines.
pub trait DrawingSurface {
    /// Color representation understood by the surface.
    type Color: Copy;

    /// Width of the surface (px)
    fn width(&self) -> f32;

    /// Height of the surface (px)
    fn height(&self) -> f32;

    /// Draw a line from `(x1, y1)` to `(x2, y2)`.
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Self::Color);
}

/// Provides the extent of the screen the grid is laid out on.
///
/// Queried whenever pixel sizes are computed; the result is not cached against
/// later screen-size changes.
pub trait ScreenExtent {
    /// Screen width (px)
    fn width(&self) -> f32;

    /// Screen height (px)
    fn height(&self) -> f32;
}

/// A fixed screen size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenSize {
    /// Width (px)
    pub width: f32,
    /// Height (px)
    pub height: f32,
}

impl ScreenSize {
    /// Creates a new `ScreenSize`.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl ScreenExtent for ScreenSize {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }
}
