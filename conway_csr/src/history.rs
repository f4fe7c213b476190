// history.rs - Detects repeating grids from a short ring of recent hashes

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const HISTORY_LEN: usize = 10;                    // Generations remembered

/// Remembers the hashes of the last [`HISTORY_LEN`] states.
///
/// Catches still lifes and oscillators with period up to `HISTORY_LEN`;
/// longer cycles go unnoticed.
#[derive(Clone, Debug, Default)]
pub struct CycleDetector {
    history: [u64; HISTORY_LEN],
    count: usize,
}

impl CycleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash_state(state: &[u8]) -> u64 {
        let mut hasher = DefaultHasher::new();
        state.hash(&mut hasher);
        hasher.finish()
    }

    /// Records `state`; returns true if it matches one of the remembered states.
    pub fn observe(&mut self, state: &[u8]) -> bool {
        let current = Self::hash_state(state);
        let filled = self.count.min(HISTORY_LEN);
        if self.history[..filled].contains(&current) {
            return true;
        }
        self.history[self.count % HISTORY_LEN] = current;
        self.count += 1;
        false
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
