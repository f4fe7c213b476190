// spmv.rs - Parallel sparse matrix-vector product
//
// counts = matrix x state, with the rows of the matrix split across the pool.

use std::sync::Arc;

use crate::csr::CsrMatrix;
use crate::error::{LifeError, LifeResult};
use crate::pool::WorkerPool;

/// Computes `counts[i] = sum(values[k] * state[col_idx[k]])` over row `i`, for every row.
///
/// Each worker reads the shared matrix and state and writes only the
/// counts for its own block of rows.
pub fn multiply(
    pool: &WorkerPool,
    matrix: &Arc<CsrMatrix>,
    state: &Arc<[u8]>,
) -> LifeResult<Vec<u32>> {
    LifeError::check_len(matrix.cols(), state.len())?;

    let matrix = Arc::clone(matrix);
    let state = Arc::clone(state);
    pool.scatter(matrix.rows(), move |rows, counts| {
        for (count, i) in counts.iter_mut().zip(rows) {
            *count = matrix.row_dot(i, &state);
        }
    })
}
