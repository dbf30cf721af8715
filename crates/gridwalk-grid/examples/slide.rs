use gridwalk_grid::{GridController, LineCanvas, Movable, ScreenSize, SpriteId, handle};

#[derive(Debug, Default)]
struct Dot {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
}

impl Movable for Dot {
    fn id(&self) -> SpriteId {
        SpriteId(1)
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

fn main() {
    // 3 rows x 4 columns on a 160x120 screen
    let mut grid = GridController::new(ScreenSize::new(160.0, 120.0));
    grid.set_size(3, 4).unwrap();
    grid.set_velocity(100.0);

    let (cell_w, cell_h) = grid.cell_size();
    println!("Cell size: {} x {} px", cell_w, cell_h);

    let canvas: LineCanvas<char> = grid.grid_image('#');
    for line in canvas.lines() {
        println!("  line ({:>5.1}, {:>5.1}) -> ({:>5.1}, {:>5.1})", line.x1, line.y1, line.x2, line.y2);
    }

    let dot = handle(Dot::default());
    grid.place_sprite(&dot, 0, 0, true, false).unwrap();
    println!("\nPlaced at {:?}, pixel ({}, {})", grid.location_of(&dot), dot.read().x, dot.read().y);

    grid.move_right(&dot, false).unwrap();
    println!("Sliding to {:?} with velocity ({}, {})", grid.location_of(&dot), dot.read().vx, dot.read().vy);

    let dt = 1.0 / 60.0;
    let mut frame = 0;
    while grid.is_moving(&dot) == Some(true) {
        {
            let mut d = dot.write();
            d.x += d.vx * dt;
            d.y += d.vy * dt;
        }
        grid.update_all();
        frame += 1;
        println!("Frame {:>2}: x = {:>6.2}", frame, dot.read().x);
    }

    println!("\nArrived after {} frames at ({}, {})", frame, dot.read().x, dot.read().y);

    // Wrapping sends the sprite to the opposite edge instead of failing
    grid.set_wrap_around(true);
    match grid.move_sprite(&dot, 0, 5, true) {
        Ok(cell) => println!("Wrapped to {}", cell),
        Err(e) => eprintln!("Move failed: {}", e),
    }
}
