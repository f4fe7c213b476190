// simulation.rs - Build once, then SpMV -> rule application per generation
//
// Constructing a `Simulation` is the Idle -> Running transition: the config is
// validated, the neighbor matrix and the worker pool are built, and the initial
// state is checked. Every `step` replaces the shared state vector wholesale;
// a vector handed to a sink is never written again.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::csr::CsrMatrix;
use crate::error::{LifeError, LifeResult, SinkError};
use crate::history::CycleDetector;
use crate::pool::WorkerPool;
use crate::rules::{ALIVE, DEAD};
use crate::seed::StateSupplier;
use crate::topology::GridTopology;
use crate::{rules, spmv};

/// One generation's state, as handed to a consumer.
#[derive(Clone, Debug)]
pub struct Frame {
    pub generation: usize,
    pub topology: GridTopology,
    pub state: Arc<[u8]>,
}

impl Frame {
    /// Alive-ness of padded cell `(row, col)`.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.state[self.topology.index(row, col)] == ALIVE
    }

    pub fn population(&self) -> usize {
        population(&self.state)
    }

    /// Interior rows, each as a slice of `width` cells.
    pub fn interior_rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let width = self.topology.width();
        self.state
            .chunks_exact(self.topology.padded_width())
            .skip(1)
            .take(self.topology.height())
            .map(move |row| &row[1..=width])
    }
}

/// Consumer of per-generation output: a renderer, encoder or recorder.
pub trait GenerationSink {
    fn accept(&mut self, frame: Frame) -> Result<(), SinkError>;
}

impl<F> GenerationSink for F
where
    F: FnMut(Frame) -> Result<(), SinkError>,
{
    fn accept(&mut self, frame: Frame) -> Result<(), SinkError> {
        self(frame)
    }
}

/// Sink that keeps every frame it is given.
#[derive(Clone, Debug, Default)]
pub struct FrameLog {
    pub frames: Vec<Frame>,
}

impl GenerationSink for FrameLog {
    fn accept(&mut self, frame: Frame) -> Result<(), SinkError> {
        self.frames.push(frame);
        Ok(())
    }
}

/// What a call to [`Simulation::run`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub generations: usize,
    pub population: usize,
    /// Generation whose state repeated a recent one, when stopping on cycles.
    pub cycle_at: Option<usize>,
}

pub struct Simulation {
    config: SimulationConfig,
    topology: GridTopology,
    matrix: Arc<CsrMatrix>,
    pool: WorkerPool,
    state: Arc<[u8]>,
    generation: usize,
}

impl Simulation {
    pub fn new(config: &SimulationConfig, initial: Vec<u8>) -> LifeResult<Self> {
        config.validate()?;
        let topology = GridTopology::new(config.width, config.height)?;
        let state = checked_initial_state(&topology, initial)?;

        let config = SimulationConfig { workers: config.effective_workers(), ..config.clone() };
        let matrix = Arc::new(CsrMatrix::moore_neighbors(&topology));
        let pool = WorkerPool::new(config.workers)?;

        info!(
            width = config.width,
            height = config.height,
            generations = config.generations,
            workers = config.workers,
            nnz = matrix.nnz(),
            "neighbor matrix built"
        );

        Ok(Self { config, topology, matrix, pool, state: state.into(), generation: 0 })
    }

    pub fn from_supplier(
        config: &SimulationConfig,
        supplier: &(impl StateSupplier + ?Sized),
    ) -> LifeResult<Self> {
        config.validate()?;
        let topology = GridTopology::new(config.width, config.height)?;
        Self::new(config, supplier.initial_state(&topology))
    }

    pub fn config(&self) -> &SimulationConfig { &self.config }
    pub fn topology(&self) -> &GridTopology { &self.topology }
    pub fn matrix(&self) -> &CsrMatrix { &self.matrix }
    pub fn workers(&self) -> usize { self.pool.workers() }
    pub fn generation(&self) -> usize { self.generation }
    pub fn state(&self) -> &Arc<[u8]> { &self.state }

    pub fn population(&self) -> usize {
        population(&self.state)
    }

    /// True once the configured number of generations has been computed.
    pub fn is_done(&self) -> bool {
        self.generation >= self.config.generations
    }

    pub fn frame(&self) -> Frame {
        Frame {
            generation: self.generation,
            topology: self.topology,
            state: Arc::clone(&self.state),
        }
    }

    /// Starts over from a new generation zero, keeping the matrix and the pool.
    pub fn reset(&mut self, initial: Vec<u8>) -> LifeResult<()> {
        self.state = checked_initial_state(&self.topology, initial)?.into();
        self.generation = 0;
        Ok(())
    }

    /// Flips padded cell `(row, col)` between generations. Border cells are left alone.
    pub fn toggle(&mut self, row: usize, col: usize) {
        if !self.topology.is_interior(row, col) {
            return;
        }
        let mut state = self.state.to_vec();
        state[self.topology.index(row, col)] ^= ALIVE;
        self.state = state.into();
    }

    /// Advances one generation. Both sub-operations join before this returns.
    pub fn step(&mut self) -> LifeResult<Frame> {
        let counts: Arc<[u32]> = spmv::multiply(&self.pool, &self.matrix, &self.state)?.into();
        let next = rules::apply(&self.pool, &self.state, &counts)?;

        debug_assert!(
            self.topology.border_indices().all(|i| next[i] == DEAD),
            "border cell came alive at generation {}",
            self.generation + 1
        );

        self.state = next.into();
        self.generation += 1;
        debug!(generation = self.generation, population = self.population(), "generation complete");
        Ok(self.frame())
    }

    /// Runs the remaining configured generations, handing each to `sink`.
    pub fn run(&mut self, sink: &mut impl GenerationSink) -> LifeResult<RunSummary> {
        self.drive(sink, None)
    }

    /// Like [`run`](Self::run), but stops as soon as the grid repeats one of
    /// its recent states (a still life or short oscillator).
    pub fn run_until_cycle(&mut self, sink: &mut impl GenerationSink) -> LifeResult<RunSummary> {
        let mut detector = CycleDetector::new();
        detector.observe(&self.state);
        self.drive(sink, Some(detector))
    }

    fn drive(
        &mut self,
        sink: &mut impl GenerationSink,
        mut detector: Option<CycleDetector>,
    ) -> LifeResult<RunSummary> {
        let start = self.generation;
        let mut cycle_at = None;

        while !self.is_done() {
            let frame = self.step()?;
            let repeated = detector.as_mut().is_some_and(|d| d.observe(&frame.state));
            let generation = frame.generation;
            sink.accept(frame).map_err(|source| LifeError::Sink { generation, source })?;

            if repeated {
                info!(generation, "grid repeats a recent state, stopping");
                cycle_at = Some(generation);
                break;
            }
        }

        Ok(RunSummary {
            generations: self.generation - start,
            population: self.population(),
            cycle_at,
        })
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("generation", &self.generation)
            .field("population", &self.population())
            .finish_non_exhaustive()
    }
}

fn population(state: &[u8]) -> usize {
    state.iter().filter(|&&c| c == ALIVE).count()
}

fn checked_initial_state(topology: &GridTopology, mut state: Vec<u8>) -> LifeResult<Vec<u8>> {
    LifeError::check_len(topology.total_cells(), state.len())?;

    if let Some((index, &value)) = state.iter().enumerate().find(|&(_, &c)| c > ALIVE) {
        return Err(LifeError::InvalidCell { index, value });
    }

    let live_border: Vec<usize> = topology.border_indices().filter(|&i| state[i] == ALIVE).collect();
    if !live_border.is_empty() {
        warn!(cells = live_border.len(), "initial state has live border cells, clearing them");
        for i in live_border {
            state[i] = DEAD;
        }
    }
    Ok(state)
}
