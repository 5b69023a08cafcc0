//! Flat index layout of the shared panel arrays.
//!
//! `Γ`, `w`, `dΓ/dt` and every derivative slot of `Γ` and `w` hold all
//! surfaces' panels in one vector of length $N$. Surfaces occupy consecutive
//! ranges in construction order. Inside a surface with $n_c$ chordwise
//! panels, panel $(i, j)$ sits at
//!
//! $$k = \text{offset}_s + i + j\,n_c$$
//!
//! i.e. the chordwise index varies fastest. Row $k$ and column $k$ of the
//! influence matrix refer to the same panel.

use std::ops::Range;

use ndarray::{s, Array1, ArrayView1, ArrayViewMut1};

use super::topology::Topology;
use super::SystemError;

/// Offset table mapping surface panels to flat indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    shapes: Vec<(usize, usize)>,
    /// `offsets[s]..offsets[s + 1]` is surface `s`; always one longer than
    /// `shapes`.
    offsets: Vec<usize>,
}

impl PanelLayout {
    pub fn new(topology: &Topology) -> Self {
        let shapes: Vec<(usize, usize)> = topology.surfaces().iter().map(|s| s.shape()).collect();
        let mut offsets = Vec::with_capacity(shapes.len() + 1);
        let mut next = 0;
        offsets.push(next);
        for &(nc, ns) in &shapes {
            next += nc * ns;
            offsets.push(next);
        }
        Self { shapes, offsets }
    }

    /// $N$, the length of every flat panel array.
    pub fn total_panels(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }

    pub fn surface_count(&self) -> usize {
        self.shapes.len()
    }

    fn check_surface(&self, surface: usize) -> Result<(), SystemError> {
        if surface < self.shapes.len() {
            Ok(())
        } else {
            Err(SystemError::SurfaceOutOfRange {
                index: surface,
                count: self.shapes.len(),
            })
        }
    }

    /// `(chordwise, spanwise)` shape of a surface.
    pub fn shape(&self, surface: usize) -> Result<(usize, usize), SystemError> {
        self.check_surface(surface)?;
        Ok(self.shapes[surface])
    }

    /// Flat index of a surface's first panel.
    pub fn offset(&self, surface: usize) -> Result<usize, SystemError> {
        self.check_surface(surface)?;
        Ok(self.offsets[surface])
    }

    /// Flat index range of a surface.
    pub fn range(&self, surface: usize) -> Result<Range<usize>, SystemError> {
        self.check_surface(surface)?;
        Ok(self.offsets[surface]..self.offsets[surface + 1])
    }

    /// Flat index of panel `(chordwise, spanwise)` of `surface`.
    pub fn flat_index(
        &self,
        surface: usize,
        chordwise: usize,
        spanwise: usize,
    ) -> Result<usize, SystemError> {
        let (nc, ns) = self.shape(surface)?;
        if chordwise >= nc || spanwise >= ns {
            return Err(SystemError::PanelOutOfRange {
                surface,
                index: (chordwise, spanwise),
                shape: (nc, ns),
            });
        }
        Ok(self.offsets[surface] + chordwise + spanwise * nc)
    }

    /// Inverse of [`flat_index`](Self::flat_index): `(surface, chordwise, spanwise)`.
    pub fn locate(&self, index: usize) -> Result<(usize, usize, usize), SystemError> {
        let total = self.total_panels();
        if index >= total {
            return Err(SystemError::FlatIndexOutOfRange { index, total });
        }
        // Last surface starting at or before `index`; empty surfaces share
        // their offset with the next one and are skipped.
        let surface = self.offsets.partition_point(|&o| o <= index) - 1;
        let local = index - self.offsets[surface];
        let nc = self.shapes[surface].0;
        Ok((surface, local % nc, local / nc))
    }

    /// Surface `surface`'s portion of a flat panel array.
    pub fn view<'a, T>(
        &self,
        values: &'a Array1<T>,
        surface: usize,
    ) -> Result<ArrayView1<'a, T>, SystemError> {
        let range = self.range(surface)?;
        Ok(values.slice(s![range]))
    }

    /// Mutable form of [`view`](Self::view).
    pub fn view_mut<'a, T>(
        &self,
        values: &'a mut Array1<T>,
        surface: usize,
    ) -> Result<ArrayViewMut1<'a, T>, SystemError> {
        let range = self.range(surface)?;
        Ok(values.slice_mut(s![range]))
    }
}
