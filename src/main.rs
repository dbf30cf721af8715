mod blackboard;   // latest scene snapshot shared with the renderer
mod bus;          // input commands from the renderer to the simulation
mod config;       // settings loading
mod graphics;     // macroquad window and render loop
mod simulation;   // grid, sprite physics and the per-frame update
mod sprite;

use blackboard::Blackboard;
use bus::{Command, Topic};
use graphics::window_conf;

use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("gridwalk demo started. Setting up Tokio runtime and spawning simulation...");

    let settings = crate::config::settings();

    let tokio_rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to start Tokio runtime: {:?}", e);
            return;
        }
    };

    let bb: Blackboard = Blackboard::default();
    let command_topic: Topic<Command> = Topic::new(32);

    if let Err(e) = run(&tokio_rt, settings, &command_topic, bb.clone()) {
        error!("Simulation setup failed: {:?}", e);
        return;
    }

    graphics::run_visualization_loop(bb, command_topic).await;
}

fn run(
    tokio_rt: &tokio::runtime::Runtime,
    settings: &crate::config::Settings,
    commands: &Topic<Command>,
    bb: Blackboard,
) -> anyhow::Result<()> {
    info!("Core simulation setup started.");
    simulation::spawn_simulation(settings, commands, bb.clone())?;

    tokio_rt.spawn(async move {
        if let Err(e) = simulation::status_task(bb).await {
            error!("Status task failed: {:?}", e);
        }
    });
    Ok(())
}
