use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context;
use gridwalk_grid::{GridController, LineCanvas, ScreenPixel, ScreenSize, SpriteHandle, handle};
use gridwalk_vector::PolarVector;
use macroquad::color::Color;
use spin_sleep::SpinSleeper;
use tracing::{debug, info, warn};

use crate::blackboard::{Blackboard, Scene, publish, snapshot};
use crate::bus::{Command, Topic, drain};
use crate::config::Settings;
use crate::sprite::Sprite;

const DEMO_SPRITE_ID: u32 = 1;

/// The demo scene: one sprite on a resizable grid.
pub struct Demo {
    grid: GridController<Sprite>,
    sprite: SpriteHandle<Sprite>,
    rows: i32,
    columns: i32,
    color: Color,
    grid_lines: LineCanvas<Color>,
}

impl Demo {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let screen = ScreenSize::new(settings.screen.width, settings.screen.height);
        let mut grid = GridController::new(screen);
        grid.set_wrap_around(settings.grid.wrap);
        grid.set_velocity(settings.grid.velocity);

        let [r, g, b, a] = settings.grid.color;
        let mut demo = Demo {
            grid,
            sprite: handle(Sprite::new(DEMO_SPRITE_ID)),
            rows: settings.grid.rows,
            columns: settings.grid.columns,
            color: Color::from_rgba(r, g, b, a),
            grid_lines: LineCanvas::new(screen.width, screen.height),
        };
        demo.resize().context("Invalid grid size in settings")?;
        Ok(demo)
    }

    /// Applies the current row/column counts, puts the sprite back on the
    /// first cell and redraws the grid.
    fn resize(&mut self) -> anyhow::Result<()> {
        self.grid.set_size(self.rows, self.columns)?;
        self.grid.place_sprite(&self.sprite, 0, 0, true, false)?;
        self.grid_lines = self.grid.grid_image(self.color);
        Ok(())
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Move { direction, teleport } => {
                match self.grid.move_in(&self.sprite, direction, teleport) {
                    Ok(cell) => debug!(?direction, teleport, %cell, "Sprite moved"),
                    Err(e) => debug!(?direction, "Move rejected: {}", e),
                }
            }
            Command::AddColumn => {
                self.columns += 1;
                if let Err(e) = self.resize() {
                    warn!("Failed to add column: {:#}", e);
                }
            }
            Command::AddRow => {
                self.rows += 1;
                if let Err(e) = self.resize() {
                    warn!("Failed to add row: {:#}", e);
                }
            }
        }
    }

    /// Integrates sprite physics over `dt` seconds, then lets the grid stop
    /// sprites that arrived.
    pub fn step(&mut self, dt: f32) {
        self.sprite.write().integrate(dt);
        let arrived = self.grid.update_all();
        if arrived > 0 {
            debug!(arrived, cell = ?self.grid.location_of(&self.sprite), "Slide finished");
        }
    }

    pub fn scene(&self, tick: u64) -> Scene {
        let (position, velocity) = {
            let s = self.sprite.read();
            (ScreenPixel::new(s.x, s.y), PolarVector::from_cartesian(s.vx, s.vy))
        };
        Scene {
            grid_lines: self.grid_lines.clone(),
            rows: self.grid.rows(),
            columns: self.grid.columns(),
            cell_size: self.grid.cell_size(),
            sprite: position,
            cell: self.grid.location_of(&self.sprite),
            velocity,
            moving: self.grid.is_moving(&self.sprite).unwrap_or(false),
            tick,
            last_tick_ts: Instant::now(),
        }
    }
}

/// Spawns the fixed-rate simulation thread. It owns the grid, drains input
/// commands, integrates physics, runs the per-frame grid update and publishes
/// a scene snapshot every tick. The thread exits once the command topic closes.
pub fn spawn_simulation(
    settings: &Settings,
    commands: &Topic<Command>,
    bb: Blackboard,
) -> anyhow::Result<JoinHandle<()>> {
    let mut demo = Demo::new(settings)?;
    let mut command_rx = commands.subscribe();
    let tick_hz = settings.simulation.tick_hz.max(1);
    let period = Duration::from_secs_f64(1.0 / f64::from(tick_hz));
    let dt = period.as_secs_f32();

    publish(&bb, demo.scene(0));

    info!(tick_hz, "Spawning simulation thread...");
    let join_handle = std::thread::Builder::new()
        .name("simulation".into())
        .spawn(move || {
            info!("Simulation thread started.");
            let sleeper = SpinSleeper::new(100_000);
            let mut tick: u64 = 0;
            loop {
                let Some(pending) = drain(&mut command_rx) else {
                    info!("Command topic closed. Stopping simulation thread.");
                    break;
                };
                for command in pending {
                    demo.apply(command);
                }
                demo.step(dt);
                tick += 1;
                publish(&bb, demo.scene(tick));
                sleeper.sleep(period);
            }
        })
        .context("Failed to spawn simulation thread")?;
    Ok(join_handle)
}

/// Logs the sprite state once a second and warns if the simulation stops
/// publishing.
pub async fn status_task(bb: Blackboard) -> anyhow::Result<()> {
    info!("Status task started.");
    let mut tick = tokio::time::interval(Duration::from_millis(250));
    let mut last_report = Instant::now();
    loop {
        tick.tick().await;
        let scene = snapshot(&bb);
        let age = Instant::now() - scene.last_tick_ts;
        if age > Duration::from_millis(250) {
            warn!(?age, tick = scene.tick, "Simulation has not ticked recently");
        }
        if last_report.elapsed() >= Duration::from_secs(1) {
            last_report = Instant::now();
            info!(
                tick = scene.tick,
                cell = ?scene.cell,
                pixel = %scene.sprite,
                velocity = %scene.velocity,
                moving = scene.moving,
                "Sprite status"
            );
        }
    }
}
