// seed.rs - Initial state suppliers: named patterns and random soup

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::rules::ALIVE;
use crate::topology::{BORDER, GridTopology};

/// Anything that can produce a generation-zero state vector for a grid.
pub trait StateSupplier {
    fn initial_state(&self, topology: &GridTopology) -> Vec<u8>;
}

/// A named arrangement of live cells, in `(row, col)` offsets from its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const BLOCK: Pattern = Pattern {
    name: "Block",
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
};

pub const BLINKER: Pattern = Pattern {
    name: "Blinker",
    cells: &[(0, 0), (0, 1), (0, 2)],
};

pub const GLIDER: Pattern = Pattern {
    name: "Glider",
    cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
};

pub const PATTERNS: &[Pattern] = &[
    GLIDER,
    BLINKER,
    BLOCK,
    Pattern {
        name: "Toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top half
            (0, 2), (0, 3), (0, 4), (0, 8), (0, 9), (0, 10),
            (2, 0), (2, 5), (2, 7), (2, 12),
            (3, 0), (3, 5), (3, 7), (3, 12),
            (4, 0), (4, 5), (4, 7), (4, 12),
            (5, 2), (5, 3), (5, 4), (5, 8), (5, 9), (5, 10),
            // Bottom half (mirrored)
            (7, 2), (7, 3), (7, 4), (7, 8), (7, 9), (7, 10),
            (8, 0), (8, 5), (8, 7), (8, 12),
            (9, 0), (9, 5), (9, 7), (9, 12),
            (10, 0), (10, 5), (10, 7), (10, 12),
            (12, 2), (12, 3), (12, 4), (12, 8), (12, 9), (12, 10),
        ],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(0, 2), (1, 1), (1, 2), (2, 0), (2, 1)],
    },
    Pattern {
        name: "Gosper Glider Gun",
        cells: &[
            (4, 0), (4, 1), (5, 0), (5, 1),
            (4, 10), (5, 10), (6, 10), (3, 11), (7, 11), (2, 12), (8, 12),
            (2, 13), (8, 13), (5, 14), (3, 15), (7, 15), (4, 16), (5, 16),
            (6, 16), (5, 17), (2, 20), (3, 20), (4, 20), (2, 21), (3, 21),
            (4, 21), (1, 22), (5, 22), (0, 24), (1, 24), (5, 24), (6, 24),
            (2, 34), (3, 34), (2, 35), (3, 35),
        ],
    },
];

impl Pattern {
    /// Looks a pattern up by name, ignoring case.
    pub fn find(name: &str) -> Option<&'static Pattern> {
        PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Bounding box as `(rows, cols)`.
    pub fn size(&self) -> (usize, usize) {
        let rows = self.cells.iter().map(|&(r, _)| r + 1).max().unwrap_or(0);
        let cols = self.cells.iter().map(|&(_, c)| c + 1).max().unwrap_or(0);
        (rows, cols)
    }

    /// Writes the pattern into `state` with its corner at interior cell `(row, col)`
    /// (zero-based). Cells that land outside the interior are dropped.
    pub fn stamp(&self, topology: &GridTopology, state: &mut [u8], row: usize, col: usize) {
        for &(dr, dc) in self.cells {
            let (r, c) = (row + dr + BORDER, col + dc + BORDER);
            if topology.is_interior(r, c) {
                state[topology.index(r, c)] = ALIVE;
            }
        }
    }

    /// A fresh state with the pattern at interior cell `(row, col)`.
    pub fn placed_at(&self, topology: &GridTopology, row: usize, col: usize) -> Vec<u8> {
        let mut state = topology.empty_state();
        self.stamp(topology, &mut state, row, col);
        state
    }

    /// A fresh state with the pattern centred in the interior.
    pub fn centered(&self, topology: &GridTopology) -> Vec<u8> {
        let (rows, cols) = self.size();
        let row = topology.height().saturating_sub(rows) / 2;
        let col = topology.width().saturating_sub(cols) / 2;
        self.placed_at(topology, row, col)
    }
}

impl StateSupplier for Pattern {
    fn initial_state(&self, topology: &GridTopology) -> Vec<u8> {
        self.centered(topology)
    }
}

/// Uniformly random interior: each cell is alive with probability `density`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomSoup {
    pub density: f64,
    pub seed: u64,
}

impl RandomSoup {
    pub const DEFAULT_DENSITY: f64 = 0.3;                 // ~30% chance of being alive

    /// Clamps `density` into `0..=1`; NaN becomes an empty soup.
    pub fn new(density: f64, seed: u64) -> Self {
        Self { density: probability(density), seed }
    }
}

impl Default for RandomSoup {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DENSITY, 0)
    }
}

fn probability(density: f64) -> f64 {
    if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) }
}

impl StateSupplier for RandomSoup {
    fn initial_state(&self, topology: &GridTopology) -> Vec<u8> {
        // Fields are public, so re-check what `new` guarantees
        let density = probability(self.density);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut state = topology.empty_state();
        // Only fill the interior; the border stays dead
        for i in topology.interior_indices() {
            state[i] = u8::from(rng.gen_bool(density));
        }
        state
    }
}
