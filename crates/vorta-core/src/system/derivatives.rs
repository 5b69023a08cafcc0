//! Storage for sensitivities with respect to the freestream parameters.
//!
//! A system carries one shadow copy of `w`, `Γ` and the panel records for
//! each of [`NUM_FREESTREAM_PARAMS`] independent freestream parameters. The
//! copies are held in a [`Derivatives`], a fixed-arity array, so the count
//! is part of the type and no slot can be missing.
//!
//! Slots are addressed by index only. Which physical parameter a slot holds
//! is decided by the solver that fills it.
//!
//! Each slot is a disjoint region of memory, so the five channels can be
//! written concurrently through [`DerivativeChannelMut`] views without
//! locking.

use std::ops::{Index, IndexMut};

use ndarray::{Array1, Array2, ArrayViewMut1};

use super::layout::PanelLayout;
use super::SystemError;
use crate::precision::Precision;
use crate::properties::PanelProperties;

/// Number of independent freestream parameters tracked.
pub const NUM_FREESTREAM_PARAMS: usize = 5;

/// One value per freestream parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivatives<A>([A; NUM_FREESTREAM_PARAMS]);

impl<A> Derivatives<A> {
    /// Build each slot from its index.
    pub fn from_fn(f: impl FnMut(usize) -> A) -> Self {
        Self(std::array::from_fn(f))
    }

    /// Number of slots; always [`NUM_FREESTREAM_PARAMS`].
    pub const fn arity(&self) -> usize {
        NUM_FREESTREAM_PARAMS
    }

    pub fn iter(&self) -> std::slice::Iter<'_, A> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, A> {
        self.0.iter_mut()
    }

    pub fn map<B>(self, f: impl FnMut(A) -> B) -> Derivatives<B> {
        Derivatives(self.0.map(f))
    }

    pub fn as_array(&self) -> &[A; NUM_FREESTREAM_PARAMS] {
        &self.0
    }

    pub fn as_mut_array(&mut self) -> &mut [A; NUM_FREESTREAM_PARAMS] {
        &mut self.0
    }

    pub fn into_inner(self) -> [A; NUM_FREESTREAM_PARAMS] {
        self.0
    }
}

impl<A> From<[A; NUM_FREESTREAM_PARAMS]> for Derivatives<A> {
    fn from(slots: [A; NUM_FREESTREAM_PARAMS]) -> Self {
        Self(slots)
    }
}

impl<A> Index<usize> for Derivatives<A> {
    type Output = A;

    fn index(&self, index: usize) -> &A {
        &self.0[index]
    }
}

impl<A> IndexMut<usize> for Derivatives<A> {
    fn index_mut(&mut self, index: usize) -> &mut A {
        &mut self.0[index]
    }
}

impl<'a, A> IntoIterator for &'a Derivatives<A> {
    type Item = &'a A;
    type IntoIter = std::slice::Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a, A> IntoIterator for &'a mut Derivatives<A> {
    type Item = &'a mut A;
    type IntoIter = std::slice::IterMut<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

impl<A> IntoIterator for Derivatives<A> {
    type Item = A;
    type IntoIter = std::array::IntoIter<A, NUM_FREESTREAM_PARAMS>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Exclusive access to one derivative slot of a system.
///
/// Holds the slot's `dw`, `dΓ` and panel grids; never the baseline arrays.
#[derive(Debug)]
pub struct DerivativeChannelMut<'a, T> {
    /// Which freestream parameter this channel belongs to.
    pub index: usize,
    pub dw: &'a mut Array1<T>,
    pub dgamma: &'a mut Array1<T>,
    pub dpanels: &'a mut [Array2<PanelProperties<T>>],
    layout: &'a PanelLayout,
}

impl<'a, T: Precision> DerivativeChannelMut<'a, T> {
    pub(crate) fn new(
        index: usize,
        layout: &'a PanelLayout,
        dw: &'a mut Array1<T>,
        dgamma: &'a mut Array1<T>,
        dpanels: &'a mut [Array2<PanelProperties<T>>],
    ) -> Self {
        Self {
            index,
            dw,
            dgamma,
            dpanels,
            layout,
        }
    }

    /// One surface's portion of `dΓ` for this parameter.
    pub fn surface_dgamma_mut(&mut self, surface: usize) -> Result<ArrayViewMut1<'_, T>, SystemError> {
        self.layout.view_mut(&mut *self.dgamma, surface)
    }

    /// One surface's portion of `dw` for this parameter.
    pub fn surface_dw_mut(&mut self, surface: usize) -> Result<ArrayViewMut1<'_, T>, SystemError> {
        self.layout.view_mut(&mut *self.dw, surface)
    }

    pub fn layout(&self) -> &PanelLayout {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_fills_every_slot() {
        let d = Derivatives::from_fn(|p| p * 10);
        assert_eq!(d.arity(), 5);
        assert_eq!(d.iter().copied().collect::<Vec<_>>(), vec![0, 10, 20, 30, 40]);
        assert_eq!(d[3], 30);
    }

    #[test]
    fn test_index_mut_touches_only_its_slot() {
        let mut d = Derivatives::from([0.0_f64; 5]);
        d[2] = 1.5;
        assert_eq!(d.into_inner(), [0.0, 0.0, 1.5, 0.0, 0.0]);
    }

    #[test]
    fn test_map_preserves_arity() {
        let d = Derivatives::from_fn(|p| vec![0u8; p]).map(|v| v.len());
        assert_eq!(d.as_array(), &[0, 1, 2, 3, 4]);
    }
}
