// main.rs - Desktop viewer: the CSR engine stepped once per UI tick
// Grid size and worker count come from LIFE_* env vars (50x50 by default).

use std::time::{Duration, Instant};

use anyhow::anyhow;
use conway_csr::{
    CycleDetector, Frame, GridTopology, LifeResult, PATTERNS, RandomSoup, Simulation,
    SimulationConfig, StateSupplier,
};
use eframe::egui;
use egui::Color32;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod ui;

const VIEWER_GRID_SIZE: usize = 50;                    // Default active grid (50x50 playing area)

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let defaults = SimulationConfig {
        width: VIEWER_GRID_SIZE,
        height: VIEWER_GRID_SIZE,
        generations: usize::MAX,                        // Runs until paused
        ..SimulationConfig::default()
    };
    let config = defaults.with_env();
    let app = GameOfLife::new(&config)?;
    info!(width = config.width, height = config.height, workers = app.sim.workers(), "viewer starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 950.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CSR Conway's Game of Life",
        options,
        Box::new(|_cc| Box::new(app)),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}

/// Viewer state wrapped around a running simulation.
pub struct GameOfLife {
    sim: Simulation,
    pub frame: Frame,  // Latest generation, for rendering
    pub is_running: bool,
    pub last_update: Instant,
    pub update_interval: Duration,
    pub live_color: Color32,
    pub dead_color: Color32,
    pub selected_pattern: usize,
    pub last_error: Option<String>,
    history: CycleDetector,
    random_seed: u64,
}

impl GameOfLife {
    pub fn new(config: &SimulationConfig) -> LifeResult<Self> {
        let empty = GridTopology::new(config.width, config.height)?.empty_state();
        let sim = Simulation::new(config, empty)?;
        let frame = sim.frame();
        Ok(Self {
            sim,
            frame,
            is_running: false,
            last_update: Instant::now(),
            update_interval: Duration::from_millis(200),
            live_color: Color32::from_rgb(0, 200, 0),
            dead_color: Color32::from_rgb(40, 40, 40),
            selected_pattern: 0,
            last_error: None,
            history: CycleDetector::new(),
            random_seed: 0,
        })
    }

    pub fn generation(&self) -> usize {
        self.frame.generation
    }

    pub fn workers(&self) -> usize {
        self.sim.workers()
    }

    pub fn update_generation(&mut self) {
        match self.sim.step() {
            Ok(frame) => {
                self.frame = frame;
                if self.history.observe(&self.frame.state) {
                    info!(generation = self.frame.generation, "cycle detected, pausing");
                    self.is_running = false;
                }
            }
            Err(e) => {
                error!("generation failed: {e}");
                self.last_error = Some(e.to_string());
                self.is_running = false;
            }
        }
    }

    pub fn clear_grid(&mut self) {
        let empty = self.sim.topology().empty_state();
        self.restart_from(empty);
    }

    pub fn apply_selected_pattern(&mut self) {
        if let Some(pattern) = PATTERNS.get(self.selected_pattern) {
            let state = pattern.initial_state(self.sim.topology());
            self.restart_from(state);
        }
    }

    pub fn apply_random_pattern(&mut self) {
        self.random_seed = self.random_seed.wrapping_add(1);
        let soup = RandomSoup::new(RandomSoup::DEFAULT_DENSITY, self.random_seed);
        let state = soup.initial_state(self.sim.topology());
        self.restart_from(state);
    }

    /// Flips a padded-grid cell; only the interior is editable.
    pub fn toggle_cell(&mut self, row: usize, col: usize) {
        self.sim.toggle(row, col);
        self.frame = self.sim.frame();
        self.history.reset();
        self.history.observe(&self.frame.state);
    }

    fn restart_from(&mut self, state: Vec<u8>) {
        if let Err(e) = self.sim.reset(state) {
            error!("could not reset grid: {e}");
            self.last_error = Some(e.to_string());
            return;
        }
        self.frame = self.sim.frame();
        self.history.reset();
        self.history.observe(&self.frame.state);
        self.last_error = None;
    }
}
