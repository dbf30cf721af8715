use macroquad::prelude::*;
use tracing::info;

use gridwalk_grid::Direction;

use crate::blackboard::{Blackboard, snapshot};
use crate::bus::{Command, Topic};
use crate::config::settings;

const SPRITE_COLOR: Color = ORANGE;
const TEXT_COLOR: Color = LIGHTGRAY;

// Function to configure the macroquad window
pub fn window_conf() -> Conf {
    let screen = &settings().screen;
    Conf {
        window_title: "gridwalk".to_string(),
        window_width: screen.width as i32,
        window_height: screen.height as i32,
        // The grid is laid out in logical pixels; keep the framebuffer 1:1
        high_dpi: false,
        window_resizable: false,
        ..Default::default()
    }
}

/// Maps key presses to demo commands. Down and right slide, up and left
/// teleport; Z adds a column and X adds a row.
fn read_input() -> Vec<Command> {
    let mut commands = Vec::new();
    let moves = [
        (KeyCode::Down, Direction::Down, false),
        (KeyCode::Left, Direction::Left, true),
        (KeyCode::Right, Direction::Right, false),
        (KeyCode::Up, Direction::Up, true),
    ];
    for (key, direction, teleport) in moves {
        if is_key_pressed(key) {
            commands.push(Command::Move { direction, teleport });
        }
    }
    if is_key_pressed(KeyCode::Z) {
        commands.push(Command::AddColumn);
    }
    if is_key_pressed(KeyCode::X) {
        commands.push(Command::AddRow);
    }
    commands
}

pub async fn run_visualization_loop(bb: Blackboard, commands: Topic<Command>) {
    info!("Visualization loop starting inside graphics module...");

    loop {
        for command in read_input() {
            commands.publish(command);
        }

        let scene = snapshot(&bb);

        clear_background(BLACK);
        for line in scene.grid_lines.lines() {
            draw_line(line.x1, line.y1, line.x2, line.y2, 1.0, line.color);
        }

        let (cell_w, cell_h) = scene.cell_size;
        let size = cell_w.min(cell_h) * 0.6;
        draw_rectangle(
            scene.sprite.x - size / 2.0,
            scene.sprite.y - size / 2.0,
            size,
            size,
            SPRITE_COLOR,
        );

        let cell = scene
            .cell
            .map(|c| format!("row {} col {}", c.row, c.column))
            .unwrap_or_else(|| "untracked".to_string());
        draw_text(
            &format!("Grid {}x{}  Sprite: {}  {}", scene.rows, scene.columns, cell, if scene.moving { "sliding" } else { "idle" }),
            10.0,
            20.0,
            20.0,
            TEXT_COLOR,
        );
        draw_text(
            &format!("Velocity {}  [arrows] move  [Z] +column  [X] +row", scene.velocity),
            10.0,
            40.0,
            20.0,
            TEXT_COLOR,
        );

        next_frame().await
    }
}
