// csr.rs - Neighbor adjacency matrix in Compressed Sparse Row form
//
// Row i lists the linear indices of the Moore neighbors of cell i. Border rows
// are empty, so their neighbor count is always zero.

use crate::error::{LifeError, LifeResult};
use crate::topology::{GridTopology, MOORE_OFFSETS};

/// Immutable sparse matrix. Built once per run and shared read-only by every worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrMatrix {
    row_ptr: Vec<usize>,    // rows + 1 offsets into col_idx/values
    col_idx: Vec<usize>,    // column of each nonzero
    values: Vec<u32>,       // weight of each nonzero (1 for an adjacency edge)
    cols: usize,
}

impl CsrMatrix {
    /// Builds the Moore-neighborhood adjacency of the padded grid directly in CSR form.
    ///
    /// Rows are visited in row-major order and each interior row receives its
    /// neighbors in [`MOORE_OFFSETS`] order, so the result is fully determined
    /// by the grid dimensions.
    pub fn moore_neighbors(topology: &GridTopology) -> Self {
        let rows = topology.total_cells();
        let nnz = MOORE_OFFSETS.len() * topology.interior_cells();

        let mut row_ptr = Vec::with_capacity(rows + 1);
        let mut col_idx = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);

        for i in 0..rows {
            row_ptr.push(col_idx.len());

            let (row, col) = topology.coords(i);
            if !topology.is_interior(row, col) {
                continue;
            }
            for &(di, dj) in &MOORE_OFFSETS {
                let neighbor = topology.offset(row, col, di, dj);
                // The one-cell border guarantees every interior neighbor exists.
                debug_assert!(
                    neighbor.is_some(),
                    "neighbor ({di},{dj}) of interior cell ({row},{col}) falls outside the padding"
                );
                if let Some((nr, nc)) = neighbor {
                    col_idx.push(topology.index(nr, nc));
                    values.push(1);
                }
            }
        }
        row_ptr.push(col_idx.len());

        debug_assert_eq!(col_idx.len(), nnz);
        Self { row_ptr, col_idx, values, cols: rows }
    }

    /// Compresses a dense square-or-rectangular matrix, skipping zero entries.
    pub fn from_dense(dense: &[Vec<u32>]) -> LifeResult<Self> {
        let cols = dense.first().map_or(0, Vec::len);
        let mut row_ptr = Vec::with_capacity(dense.len() + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        for (i, row) in dense.iter().enumerate() {
            if row.len() != cols {
                return Err(LifeError::malformed(format!(
                    "dense row {i} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            row_ptr.push(col_idx.len());
            for (j, &v) in row.iter().enumerate() {
                if v != 0 {
                    col_idx.push(j);
                    values.push(v);
                }
            }
        }
        row_ptr.push(col_idx.len());

        Ok(Self { row_ptr, col_idx, values, cols })
    }

    /// Assembles a matrix from raw arrays, checking the CSR invariants.
    pub fn from_parts(
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<u32>,
        cols: usize,
    ) -> LifeResult<Self> {
        let matrix = Self { row_ptr, col_idx, values, cols };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Checks structural well-formedness.
    pub fn validate(&self) -> LifeResult<()> {
        let Some((&first, &last)) = self.row_ptr.first().zip(self.row_ptr.last()) else {
            return Err(LifeError::malformed("row_ptr is empty"));
        };
        if first != 0 {
            return Err(LifeError::malformed(format!("row_ptr starts at {first}, expected 0")));
        }
        if self.col_idx.len() != self.values.len() {
            return Err(LifeError::malformed(format!(
                "{} column indices but {} values",
                self.col_idx.len(),
                self.values.len()
            )));
        }
        if last != self.col_idx.len() {
            return Err(LifeError::malformed(format!(
                "row_ptr ends at {last}, expected nnz = {}",
                self.col_idx.len()
            )));
        }
        if let Some(w) = self.row_ptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(LifeError::malformed(format!("row_ptr decreases at row {w}")));
        }
        if let Some(&c) = self.col_idx.iter().find(|&&c| c >= self.cols) {
            return Err(LifeError::malformed(format!(
                "column index {c} out of bounds for {} columns",
                self.cols
            )));
        }
        Ok(())
    }

    pub fn rows(&self) -> usize { self.row_ptr.len() - 1 }
    pub fn cols(&self) -> usize { self.cols }
    pub fn nnz(&self) -> usize { self.col_idx.len() }

    pub fn row_ptr(&self) -> &[usize] { &self.row_ptr }
    pub fn col_idx(&self) -> &[usize] { &self.col_idx }
    pub fn values(&self) -> &[u32] { &self.values }

    /// Column indices and weights of row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> (&[usize], &[u32]) {
        let span = self.row_ptr[i]..self.row_ptr[i + 1];
        (&self.col_idx[span.clone()], &self.values[span])
    }

    /// Weighted sum of row `i` against `state`.
    #[inline]
    pub fn row_dot(&self, i: usize, state: &[u8]) -> u32 {
        let (cols, values) = self.row(i);
        cols.iter()
            .zip(values)
            .map(|(&c, &v)| v * u32::from(state[c]))
            .sum()
    }

    /// Single-threaded reference product.
    pub fn mul_vec(&self, state: &[u8]) -> LifeResult<Vec<u32>> {
        LifeError::check_len(self.cols, state.len())?;
        Ok((0..self.rows()).map(|i| self.row_dot(i, state)).collect())
    }
}
