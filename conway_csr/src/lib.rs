//! Conway's Game of Life as a sparse matrix-vector product.
//!
//! The 8-neighbor count of every cell is `A x s`, where `A` is a fixed
//! adjacency matrix over the zero-padded grid (stored once in CSR form) and
//! `s` is the 0/1 state vector. Each generation multiplies, then applies the
//! B3/S23 rule, with both steps split across a persistent pool of workers.
//!
//! ```no_run
//! use conway_csr::{FrameLog, RandomSoup, Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::new(160, 40, 100, 4);
//! let mut sim = Simulation::from_supplier(&config, &RandomSoup::new(0.3, 7))?;
//! let mut log = FrameLog::default();
//! let summary = sim.run(&mut log)?;
//! assert_eq!(summary.generations, 100);
//! # Ok::<(), conway_csr::LifeError>(())
//! ```

pub mod config;
pub mod csr;
pub mod error;
pub mod history;
pub mod pool;
pub mod rules;
pub mod seed;
pub mod simulation;
pub mod spmv;
pub mod topology;

pub use config::SimulationConfig;
pub use csr::CsrMatrix;
pub use error::{LifeError, LifeResult, SinkError};
pub use history::CycleDetector;
pub use pool::{WorkerPool, partition};
pub use rules::{ALIVE, DEAD, next_cell};
pub use seed::{PATTERNS, Pattern, RandomSoup, StateSupplier};
pub use simulation::{Frame, FrameLog, GenerationSink, RunSummary, Simulation};
pub use topology::GridTopology;
