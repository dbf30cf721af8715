use parking_lot::RwLock;
use std::{sync::Arc, time::Instant};

use gridwalk_grid::{GridCoordinate, LineCanvas, ScreenPixel};
use gridwalk_vector::PolarVector;
use macroquad::color::Color;

/// What the render loop needs to draw one frame.
#[derive(Clone, Debug)]
pub struct Scene {
    pub grid_lines: LineCanvas<Color>,
    pub rows: i32,
    pub columns: i32,
    pub cell_size: (f32, f32),
    pub sprite: ScreenPixel,
    pub cell: Option<GridCoordinate>,
    pub velocity: PolarVector,
    pub moving: bool,
    pub tick: u64,
    pub last_tick_ts: Instant,
}

impl Default for Scene {
    fn default() -> Self {
        Scene {
            grid_lines: LineCanvas::new(0.0, 0.0),
            rows: 0,
            columns: 0,
            cell_size: (0.0, 0.0),
            sprite: ScreenPixel::default(),
            cell: None,
            velocity: PolarVector::default(),
            moving: false,
            tick: 0,
            last_tick_ts: Instant::now(),
        }
    }
}

pub type Blackboard = Arc<RwLock<Scene>>;

pub fn snapshot(bb: &Blackboard) -> Scene {
    (*bb.read()).clone()
}

pub fn publish(bb: &Blackboard, scene: Scene) {
    *bb.write() = scene;
}
