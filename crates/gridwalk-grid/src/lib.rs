//! Grid positioning and movement for sprites on a fixed-size screen.
//!
//! [`GridController`] maps `(row, column)` cells to screen pixels, tracks the
//! cell of every sprite it has moved, and animates moves either as instant
//! teleports or as constant-velocity slides. Rendering, input and physics stay
//! with the host, reached through the traits in [`traits`].

pub mod canvas;
pub mod controller;
pub mod error;
pub mod traits;
pub mod types;

pub use canvas::{Line, LineCanvas};
pub use controller::{DEFAULT_SIZE, DEFAULT_SPEED, GridController};
pub use error::GridError;
pub use traits::{DrawingSurface, Movable, ScreenExtent, ScreenSize, SpriteHandle, handle};
pub use types::{Direction, GridCoordinate, ScreenPixel, SpriteId};
