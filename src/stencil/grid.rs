//! Double-buffered halo grid and the sweep engine

use super::Stencil;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::{PartitionedArray, Unit};
use parking_lot::Mutex;
use rand::Rng;

/// A 2D or 3D grid of `f64` with a one-cell halo, held in two buffers
///
/// Linear index is `i·size + j` in 2D and `i·size² + j·size + k` in 3D.
/// Interior cells have every coordinate in `1..=size-2`; coordinates `0` and
/// `size-1` form the halo.
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    dims: usize,
    current: PartitionedArray<f64>,
    next: PartitionedArray<f64>,
}

impl Grid {
    /// Collectively allocate both buffers for a `size^dims` grid
    pub fn alloc(unit: &Unit<'_>, size: usize, dims: usize) -> Result<Self> {
        if dims != 2 && dims != 3 {
            return Err(Error::invalid_argument("dims", format!("expected 2 or 3, got {dims}")));
        }
        let len = size
            .checked_pow(dims as u32)
            .ok_or_else(|| Error::invalid_argument("size", format!("{size}^{dims} overflows")))?;

        let current = unit.all_alloc::<f64>(len)?;
        let next = match unit.all_alloc::<f64>(len) {
            Ok(next) => next,
            Err(e) => {
                unit.all_free(current);
                return Err(e);
            }
        };

        Ok(Self {
            size,
            dims,
            current,
            next,
        })
    }

    /// Cells per axis, halo included
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of axes
    #[inline]
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Total number of cells, halo included
    #[inline]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Returns true for a zero-sized grid
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// The buffer holding the latest published values
    #[inline]
    pub fn current(&self) -> &PartitionedArray<f64> {
        &self.current
    }

    /// The buffer written by the compute phase
    #[inline]
    pub fn next(&self) -> &PartitionedArray<f64> {
        &self.next
    }

    /// Linear index of `[i, j, k]`; `k` is ignored in 2D
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        match self.dims {
            3 => (i * self.size + j) * self.size + k,
            _ => i * self.size + j,
        }
    }

    /// True if the cell at linear index `cell` is not on the halo
    #[inline]
    pub fn is_interior(&self, cell: usize) -> bool {
        let s = self.size;
        let inside = |c: usize| c >= 1 && c + 1 < s;
        match self.dims {
            3 => inside(cell / (s * s)) && inside((cell / s) % s) && inside(cell % s),
            _ => inside(cell / s) && inside(cell % s),
        }
    }

    /// Zero both buffers, halo included
    pub fn zero(&self, unit: &Unit<'_>) {
        unit.forall(0..self.len(), self.current.distribution(), |cell| {
            self.current.set(cell, 0.0);
            self.next.set(cell, 0.0);
        });
        unit.barrier();
    }

    /// Fill the interior of `current` from the generator
    ///
    /// Only the coordinator draws, in linear index order, so the seeded grid
    /// does not depend on the number of units.
    pub fn seed<R: Rng>(&self, unit: &Unit<'_>, rng: &Mutex<R>) {
        if unit.is_coordinator() {
            let mut rng = rng.lock();
            for cell in 0..self.len() {
                if self.is_interior(cell) {
                    self.current.set(cell, f64::sample(&mut *rng));
                }
            }
        }
        unit.barrier();
    }

    /// One relaxation step
    ///
    /// Compute phase: each unit writes `next` for the interior cells it owns.
    /// Copy phase: each unit moves its owned interior cells from `next` into
    /// `current`. Barriers separate the phases and close the sweep, so no unit
    /// reads a neighbor that another unit is still updating.
    pub fn sweep(&self, unit: &Unit<'_>, stencil: &Stencil) {
        let dist = self.current.distribution();
        let factor = stencil.factor();

        unit.forall(0..self.len(), dist, |cell| {
            if !self.is_interior(cell) {
                return;
            }
            let sum = stencil
                .offsets()
                .iter()
                .map(|&off| self.current.get(cell.wrapping_add_signed(off)))
                .sum::<f64>();
            self.next.set(cell, sum * factor);
        });
        unit.barrier();

        unit.forall(0..self.len(), dist, |cell| {
            if self.is_interior(cell) {
                self.current.set(cell, self.next.get(cell));
            }
        });
        unit.barrier();
    }

    /// Run `sweeps` relaxation steps
    pub fn relax(&self, unit: &Unit<'_>, stencil: &Stencil, sweeps: usize) {
        for _ in 0..sweeps {
            self.sweep(unit, stencil);
        }
    }

    /// Collectively release both buffers
    pub fn free(self, unit: &Unit<'_>) {
        unit.all_free(self.current);
        unit.all_free(self.next);
    }
}
