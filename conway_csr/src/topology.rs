// topology.rs - Padded grid geometry for the flat state vector
//
// The interior is `width x height`; a one-cell dead border surrounds it so
// every interior cell has all 8 Moore neighbors inside the padded rectangle.

use crate::error::{LifeError, LifeResult};

/// Offsets of the Moore neighborhood in scan order (di = -1..1, dj = -1..1, centre skipped).
#[rustfmt::skip]
pub const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

pub const BORDER: usize = 1;                          // Dead cells on each side of the interior

/// Maps `(row, col)` of the padded grid to a linear index and back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridTopology {
    width: usize,   // Nx, interior columns
    height: usize,  // Ny, interior rows
}

impl GridTopology {
    pub fn new(width: usize, height: usize) -> LifeResult<Self> {
        if width == 0 || height == 0 {
            return Err(LifeError::config(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        if Self::padded_len(width, height).is_none() {
            return Err(LifeError::config(format!(
                "padded grid for {width}x{height} overflows usize"
            )));
        }
        Ok(Self { width, height })
    }

    /// `(width+2) * (height+2)`, or `None` if it overflows `usize`.
    pub fn padded_len(width: usize, height: usize) -> Option<usize> {
        let padded_width = width.checked_add(2 * BORDER)?;
        let padded_height = height.checked_add(2 * BORDER)?;
        padded_width.checked_mul(padded_height)
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    pub fn padded_width(&self) -> usize { self.width + 2 * BORDER }
    pub fn padded_height(&self) -> usize { self.height + 2 * BORDER }

    /// Length of every state and count vector.
    pub fn total_cells(&self) -> usize {
        self.padded_width() * self.padded_height()
    }

    pub fn interior_cells(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.padded_height() && col < self.padded_width());
        row * self.padded_width() + col
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.padded_width(), index % self.padded_width())
    }

    #[inline]
    pub fn is_interior(&self, row: usize, col: usize) -> bool {
        (BORDER..=self.height).contains(&row) && (BORDER..=self.width).contains(&col)
    }

    #[inline]
    pub fn is_interior_index(&self, index: usize) -> bool {
        let (row, col) = self.coords(index);
        self.is_interior(row, col)
    }

    /// Padded coordinates of `(row, col)` shifted by `(di, dj)`, if still inside the padded rectangle.
    pub fn offset(&self, row: usize, col: usize, di: isize, dj: isize) -> Option<(usize, usize)> {
        let nr = row.checked_add_signed(di)?;
        let nc = col.checked_add_signed(dj)?;
        (nr < self.padded_height() && nc < self.padded_width()).then_some((nr, nc))
    }

    /// Linear indices of the interior, row-major.
    pub fn interior_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (BORDER..=self.height)
            .flat_map(move |row| (BORDER..=self.width).map(move |col| self.index(row, col)))
    }

    /// Linear indices of the border ring.
    pub fn border_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.total_cells()).filter(move |&i| !self.is_interior_index(i))
    }

    /// An all-dead state vector of the right length.
    pub fn empty_state(&self) -> Vec<u8> {
        vec![0; self.total_cells()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_dimensions() {
        let topo = GridTopology::new(160, 40).unwrap();
        assert_eq!(topo.padded_width(), 162);
        assert_eq!(topo.padded_height(), 42);
        assert_eq!(topo.total_cells(), 162 * 42);
        assert_eq!(topo.interior_cells(), 6400);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(GridTopology::new(0, 5), Err(LifeError::Configuration(_))));
        assert!(matches!(GridTopology::new(5, 0), Err(LifeError::Configuration(_))));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert!(matches!(GridTopology::new(usize::MAX, 1), Err(LifeError::Configuration(_))));
        assert!(matches!(GridTopology::new(1, usize::MAX - 1), Err(LifeError::Configuration(_))));
        assert!(matches!(
            GridTopology::new(usize::MAX / 2, 3),
            Err(LifeError::Configuration(_))
        ));
        assert_eq!(GridTopology::padded_len(3, 4), Some(30));
        assert_eq!(GridTopology::padded_len(usize::MAX - 2, 0), None);
    }

    #[test]
    fn index_and_coords_are_inverse() {
        let topo = GridTopology::new(7, 3).unwrap();
        for i in 0..topo.total_cells() {
            let (row, col) = topo.coords(i);
            assert_eq!(topo.index(row, col), i);
        }
        assert_eq!(topo.index(2, 3), 2 * 9 + 3);
    }

    #[test]
    fn interior_excludes_border_ring() {
        let topo = GridTopology::new(4, 3).unwrap();
        assert!(!topo.is_interior(0, 1));
        assert!(!topo.is_interior(1, 0));
        assert!(!topo.is_interior(4, 1));
        assert!(!topo.is_interior(1, 5));
        assert!(topo.is_interior(1, 1));
        assert!(topo.is_interior(3, 4));

        assert_eq!(topo.interior_indices().count(), 12);
        assert_eq!(topo.border_indices().count(), topo.total_cells() - 12);
        assert!(topo.interior_indices().all(|i| topo.is_interior_index(i)));
    }

    #[test]
    fn offset_stays_inside_padding() {
        let topo = GridTopology::new(2, 2).unwrap();
        assert_eq!(topo.offset(0, 0, -1, 0), None);
        assert_eq!(topo.offset(3, 3, 0, 1), None);
        assert_eq!(topo.offset(1, 1, -1, -1), Some((0, 0)));
    }
}
