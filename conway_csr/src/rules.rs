// rules.rs - B3/S23 transition applied over the state vector

use std::sync::Arc;

use crate::error::{LifeError, LifeResult};
use crate::pool::WorkerPool;

pub const DEAD: u8 = 0;
pub const ALIVE: u8 = 1;

/// Next state of one cell given its live-neighbor count.
#[inline]
pub fn next_cell(state: u8, count: u32) -> u8 {
    match (state, count) {
        (ALIVE, 2) | (ALIVE, 3) => ALIVE,   // Survival
        (DEAD, 3)               => ALIVE,   // Birth
        _                       => DEAD,    // Death or stays dead
    }
}

/// Produces the next state vector, one block of cells per worker.
///
/// Border cells have empty matrix rows, so their count is 0 and they stay dead
/// without any special casing here.
pub fn apply(pool: &WorkerPool, state: &Arc<[u8]>, counts: &Arc<[u32]>) -> LifeResult<Vec<u8>> {
    LifeError::check_len(state.len(), counts.len())?;

    let state = Arc::clone(state);
    let counts = Arc::clone(counts);
    pool.scatter(state.len(), move |cells, next| {
        for (slot, i) in next.iter_mut().zip(cells) {
            *slot = next_cell(state[i], counts[i]);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_cell_survives_on_two_or_three() {
        for count in 0..=8 {
            let expected = if count == 2 || count == 3 { ALIVE } else { DEAD };
            assert_eq!(next_cell(ALIVE, count), expected, "count {count}");
        }
    }

    #[test]
    fn dead_cell_is_born_on_exactly_three() {
        for count in 0..=8 {
            let expected = if count == 3 { ALIVE } else { DEAD };
            assert_eq!(next_cell(DEAD, count), expected, "count {count}");
        }
    }

    #[test]
    fn all_dead_is_a_fixed_point() {
        let state: Arc<[u8]> = vec![DEAD; 64].into();
        let counts: Arc<[u32]> = vec![0; 64].into();
        for workers in [1, 3, 8] {
            let pool = WorkerPool::new(workers).unwrap();
            assert_eq!(apply(&pool, &state, &counts).unwrap(), vec![DEAD; 64]);
        }
    }

    #[test]
    fn applies_rule_elementwise() {
        let state: Arc<[u8]> = vec![1, 1, 1, 0, 0, 1, 0].into();
        let counts: Arc<[u32]> = vec![1, 2, 3, 3, 2, 4, 0].into();
        let pool = WorkerPool::new(2).unwrap();
        assert_eq!(apply(&pool, &state, &counts).unwrap(), vec![0, 1, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let state: Arc<[u8]> = vec![0; 4].into();
        let counts: Arc<[u32]> = vec![0; 5].into();
        let result = apply(&WorkerPool::new(1).unwrap(), &state, &counts);
        assert!(matches!(result, Err(LifeError::ShapeMismatch { expected: 4, actual: 5 })));
    }
}
