//! Mode7 engine: a scene-graph 2D engine with a Mode7 perspective view
//!
//! Entities with texture, collision, script, bitmap text and hover
//! components live in named scenes. A debug key, a script or the external
//! editor (through the control channel) flips the view into Mode7: a
//! ground and sky plane projected per scanline, with scaled sprites and a
//! score overlay.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod config;
mod control;
mod game;
mod input;
mod mode7;
mod rasterizer;
mod scene;
mod texture;

use std::path::PathBuf;

use clap::Parser;
use macroquad::prelude::*;

use app::{App, FrameLimiter, RenderMode};
use config::EngineConfig;
use control::{ChannelTransport, ControlTransport, FileFlagTransport};
use input::InputState;
use rasterizer::{MacroquadSurface, WINDOW_HEIGHT, WINDOW_WIDTH};

#[derive(Parser, Debug)]
#[command(name = "mode7-engine")]
#[command(about = "Scene-graph engine with a Mode7 perspective renderer")]
struct Cli {
    /// Engine configuration (RON)
    #[arg(long, default_value = "engine.ron")]
    config: PathBuf,

    /// Scene file to load and activate at start-up
    #[arg(long)]
    scene: Option<String>,

    /// Directory for the editor's control files
    #[arg(long)]
    control_dir: Option<PathBuf>,

    /// Start in Mode7
    #[arg(long)]
    mode7: bool,

    /// Take control requests as JSON lines on stdin instead of flag files
    #[arg(long)]
    console: bool,
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Mode7 Engine v{}", VERSION),
        window_width: WINDOW_WIDTH,
        window_height: WINDOW_HEIGHT,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn open_transport(cli: &Cli, config: &EngineConfig) -> Option<Box<dyn ControlTransport>> {
    if cli.console {
        let (transport, handle) = ChannelTransport::pair();
        return match control::console::spawn(handle) {
            Ok(()) => Some(Box::new(transport)),
            Err(e) => {
                log::error!("failed to start control console: {}", e);
                None
            }
        };
    }
    config
        .control
        .enabled
        .then(|| Box::new(FileFlagTransport::new(config.control.dir.clone())) as Box<dyn ControlTransport>)
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = EngineConfig::load_or_default(&cli.config);
    if let Some(dir) = &cli.control_dir {
        config.control.dir = dir.clone();
    }

    let limiter = FrameLimiter::new(config.target_fps);
    let transport = open_transport(&cli, &config);
    let mut app = App::new(config);
    if let Some(transport) = transport {
        app = app.with_transport(transport);
    }
    app.startup();

    if let Some(scene) = &cli.scene {
        app.load_initial_scene(scene);
    }
    if cli.mode7 {
        app.set_mode(RenderMode::Mode7);
    }

    log::info!("=== Mode7 Engine v{} ===", VERSION);

    let mut surface = MacroquadSurface::new();
    let mut last_frame = get_time();

    loop {
        let frame_start = get_time();
        let dt = (frame_start - last_frame) as f32;
        last_frame = frame_start;

        let input = InputState::poll();
        app.frame(&input, dt, &mut surface);
        if !app.is_running() {
            break;
        }

        limiter.wait(frame_start);
        next_frame().await;
    }

    app.shutdown();
    surface.release();
}
