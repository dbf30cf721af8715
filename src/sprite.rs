use gridwalk_grid::{Movable, SpriteId};

/// A point sprite with simple Euler-integrated physics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sprite {
    id: u32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Sprite {
    pub fn new(id: u32) -> Self {
        Sprite { id, ..Default::default() }
    }

    /// Advances the position by the current velocity over `dt` seconds.
    pub fn integrate(&mut self, dt: f32) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
    }
}

impl Movable for Sprite {
    fn id(&self) -> SpriteId {
        SpriteId(self.id)
    }

    fn x(&self) -> f32 {
        self.x
    }

    fn y(&self) -> f32 {
        self.y
    }

    fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    fn vx(&self) -> f32 {
        self.vx
    }

    fn vy(&self) -> f32 {
        self.vy
    }

    fn set_vx(&mut self, vx: f32) {
        self.vx = vx;
    }

    fn set_vy(&mut self, vy: f32) {
        self.vy = vy;
    }
}
