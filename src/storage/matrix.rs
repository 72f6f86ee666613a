//! Dense N×N weight matrix
//!
//! Cells are `Option<f32>`: `None` means "no edge", so a zero-weight edge
//! stays distinguishable from an absent one.

use std::fmt;

/// Row-major dense weight matrix
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    num_vertices: usize,
    cells: Vec<Option<f32>>,
}

impl WeightMatrix {
    /// Matrix with `Some(0.0)` on the diagonal and no edges elsewhere
    #[must_use]
    pub fn with_zero_diagonal(num_vertices: usize) -> Self {
        let mut cells = vec![None; num_vertices * num_vertices];
        for v in 0..num_vertices {
            cells[v * num_vertices + v] = Some(0.0);
        }
        Self {
            num_vertices,
            cells,
        }
    }

    /// Record edge `src → dst`, keeping the lighter weight on repeats.
    /// The diagonal is never overwritten.
    pub(crate) fn insert_min(&mut self, src: usize, dst: usize, weight: f32) {
        if src == dst {
            return;
        }
        let cell = &mut self.cells[src * self.num_vertices + dst];
        *cell = Some(cell.map_or(weight, |w| w.min(weight)));
    }

    /// Side length
    #[must_use]
    pub const fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Cell `(src, dst)`, `None` when absent or out of range
    #[must_use]
    pub fn get(&self, src: usize, dst: usize) -> Option<f32> {
        if src >= self.num_vertices || dst >= self.num_vertices {
            return None;
        }
        self.cells[src * self.num_vertices + dst]
    }

    /// Outgoing row of `src` (`num_vertices` cells)
    ///
    /// # Panics
    ///
    /// Panics if `src >= num_vertices`
    #[must_use]
    pub fn row(&self, src: usize) -> &[Option<f32>] {
        let start = src * self.num_vertices;
        &self.cells[start..start + self.num_vertices]
    }
}

/// Tab-separated rendering, `--` for absent edges
impl fmt::Display for WeightMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for src in 0..self.num_vertices {
            for (dst, cell) in self.row(src).iter().enumerate() {
                if dst > 0 {
                    f.write_str("\t")?;
                }
                match cell {
                    Some(w) => write!(f, "{w:.3}")?,
                    None => f.write_str("--")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
