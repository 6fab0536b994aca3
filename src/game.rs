use std::thread;
use std::time::Duration;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::data::ResourceCatalog;
use crate::input::{Command, InputFrame, InputSource};
use crate::map::{GenerationReport, WorldGrid};
use crate::player::{HarvestReport, Player};
use crate::render::{Renderer, draw_map, draw_player};
use crate::viewport::{Fov, Viewport};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Game {
    window_w: i32,
    window_h: i32,
    catalog: ResourceCatalog,
    grid: WorldGrid,
    player: Player,
    fov: Fov,
    viewport: Viewport,
    rng: RandomNumberGenerator,
    console: Vec<String>,
    frame: u64,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => RandomNumberGenerator::seeded(seed),
            None => RandomNumberGenerator::new(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: &GameConfig, rng: RandomNumberGenerator) -> Self {
        let player = Player::new(Point::new(0, 0));
        let fov = config.fov();
        let viewport = Viewport::recompute(
            config.window_width,
            config.window_height,
            fov,
            player.position,
        );
        Self {
            window_w: config.window_width,
            window_h: config.window_height,
            catalog: config.catalog.clone(),
            grid: WorldGrid::new(),
            player,
            fov,
            viewport,
            rng,
            console: Vec::new(),
            frame: 0,
        }
    }

    /// One frame of game logic: input, mutation, generation. Rendering is separate.
    pub fn step(&mut self, input: &InputFrame) -> Flow {
        if input.is_held(Command::Quit) {
            info!(frame = self.frame, "quit requested");
            return Flow::Quit;
        }
        self.frame = self.frame.wrapping_add(1);

        let delta = input.movement();
        if delta != Point::new(0, 0) {
            self.player.step(delta);
        }
        if input.is_held(Command::FovUp) {
            self.fov.increase();
            self.refresh_fov();
        }
        if input.is_held(Command::FovDown) {
            self.fov.decrease();
            self.refresh_fov();
        }
        if input.is_held(Command::Harvest) {
            self.harvest();
        }
        if input.is_held(Command::ShowInventory) {
            self.show_inventory();
        }

        self.regenerate();
        Flow::Continue
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        draw_map(renderer, &self.grid, &self.viewport);
        draw_player(renderer, &self.viewport);
        renderer.present();
    }

    pub fn tick<R: Renderer + ?Sized>(&mut self, input: &InputFrame, renderer: &mut R) -> Flow {
        let flow = self.step(input);
        if flow == Flow::Continue {
            self.render(renderer);
        }
        flow
    }

    pub fn harvest(&mut self) -> HarvestReport {
        let report = self
            .player
            .harvest(&mut self.grid, &self.catalog, &mut self.rng);
        self.console
            .extend(report.drops.iter().map(ToString::to_string));
        report
    }

    pub fn show_inventory(&mut self) {
        self.console.extend(self.player.inventory.lines());
    }

    /// Centers the viewport on the player and runs a generation pass there.
    pub fn regenerate(&mut self) -> GenerationReport {
        self.viewport.recenter(self.player.position);
        self.grid.generate_map(
            self.player.position,
            self.viewport.range_x.clone(),
            self.viewport.range_y.clone(),
            &self.catalog,
            &mut self.rng,
        )
    }

    fn refresh_fov(&mut self) {
        self.viewport =
            Viewport::recompute(self.window_w, self.window_h, self.fov, self.player.position);
        self.grid.forget_explored();
        let report = self.regenerate();
        info!(fov = self.fov.value(), "fov changed");
        debug!(created = report.created, "fov regeneration");
        self.console.push(format!("fov: {}", self.fov.value()));
    }

    pub fn drain_console(&mut self) -> Vec<String> {
        std::mem::take(&mut self.console)
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut WorldGrid {
        &mut self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn fov(&self) -> Fov {
        self.fov
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Drives `game` from `input` until it quits or the input runs dry.
///
/// Returns the number of frames that ran.
pub fn run_headless<I, R, F>(
    game: &mut Game,
    input: &mut I,
    renderer: &mut R,
    frame_delay: Duration,
    mut on_console: F,
) -> u64
where
    I: InputSource + ?Sized,
    R: Renderer + ?Sized,
    F: FnMut(&str),
{
    let mut frames = 0;
    while let Some(frame) = input.poll() {
        let flow = game.tick(&frame, renderer);
        for line in game.drain_console() {
            on_console(&line);
        }
        if flow == Flow::Quit {
            break;
        }
        frames += 1;
        if !frame_delay.is_zero() {
            thread::sleep(frame_delay);
        }
    }
    info!(frames, "headless run finished");
    frames
}
