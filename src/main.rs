use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use bracket_terminal::prelude::*;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use tilewander::input::{ScriptedInput, poll_terminal};
use tilewander::render::{PixelCanvas, TerminalRenderer};
use tilewander::{Flow, Game, GameConfig, run_headless};

#[derive(Parser, Debug)]
#[command(name = "tilewander", about = "Wander an endless tile map and harvest what grows on it")]
struct Args {
    /// JSON config file; missing fields fall back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the config seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Run headless, reading one frame of keys per line from this file.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write the last headless frame as an image; the extension picks the format (e.g. `.png`).
    #[arg(long, requires = "script")]
    snapshot: Option<PathBuf>,

    /// Where the interactive session writes its log.
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

struct TileWanderState {
    game: Game,
    cell_pixels: i32,
}

impl GameState for TileWanderState {
    fn tick(&mut self, ctx: &mut BTerm) {
        let frame = poll_terminal(ctx);
        ctx.cls();
        let flow = {
            let mut renderer = TerminalRenderer::new(ctx, self.cell_pixels);
            self.game.tick(&frame, &mut renderer)
        };
        for line in self.game.drain_console() {
            info!(target: "console", "{line}");
        }
        if flow == Flow::Quit {
            ctx.quit();
        }
    }
}

fn init_tracing(args: &Args) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    if args.script.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return None;
    }

    // The terminal owns stdout and stderr while the session runs.
    let appender = tracing_appender::rolling::never(&args.log_dir, "tilewander.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Some(guard)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_tracing(&args);

    let mut config = match &args.config {
        Some(path) => GameConfig::load_from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    info!(
        window_width = config.window_width,
        window_height = config.window_height,
        fov = config.initial_fov,
        seed = ?config.seed,
        resources = config.catalog.entries().len(),
        "starting"
    );

    match &args.script {
        Some(script) => run_script(&config, script, args.snapshot.as_deref()),
        None => run_terminal(&config),
    }
}

fn run_script(config: &GameConfig, script: &Path, snapshot: Option<&Path>) -> Result<()> {
    let mut input = ScriptedInput::from_file(script)
        .with_context(|| format!("loading script {}", script.display()))?;
    let mut game = Game::new(config);
    let mut canvas = PixelCanvas::new(config.window_width, config.window_height);

    let frames = run_headless(
        &mut game,
        &mut input,
        &mut canvas,
        Duration::from_millis(config.frame_delay_ms),
        |line| println!("{line}"),
    );

    if let Some(path) = snapshot {
        canvas
            .save(path)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
    }

    let position = game.player().position;
    info!(
        frames,
        x = position.x,
        y = position.y,
        tiles = game.grid().len(),
        "script finished"
    );
    Ok(())
}

fn run_terminal(config: &GameConfig) -> Result<()> {
    let (cols, rows) = config.console_size();
    let mut builder = BTermBuilder::simple(cols, rows)
        .map_err(|err| anyhow!("terminal setup failed: {err}"))?
        .with_title("Tile Wander");
    if config.frame_delay_ms > 0 {
        builder = builder.with_fps_cap(1000.0 / config.frame_delay_ms as f32);
    }
    let context = builder
        .build()
        .map_err(|err| anyhow!("terminal setup failed: {err}"))?;

    let state = TileWanderState {
        game: Game::new(config),
        cell_pixels: config.cell_pixels,
    };
    main_loop(context, state).map_err(|err| anyhow!("terminal session ended abnormally: {err}"))
}
