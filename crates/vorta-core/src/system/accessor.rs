//! Read-only access to the baseline panel results.
//!
//! [`get_surface_properties`] takes the same surface argument the system was
//! built from and returns the stored panel grids in the matching form: one
//! grid for a single surface, the ordered slice of grids for several. The
//! result borrows the system's storage directly.

use ndarray::Array2;

use super::System;
use crate::precision::Precision;
use crate::properties::PanelProperties;

/// Surface arguments accepted by the system constructors.
pub trait SurfaceGrids<T: Precision> {
    /// Borrowed view of the stored panel results for this argument form.
    type Properties<'a>
    where
        T: 'a;

    fn panel_properties<'a>(&self, system: &'a System<T>) -> Self::Properties<'a>;
}

impl<S, T: Precision> SurfaceGrids<T> for Array2<S> {
    type Properties<'a> = &'a Array2<PanelProperties<T>>
    where
        T: 'a;

    /// # Panics
    /// Panics if `system` holds no surfaces, which cannot happen for a
    /// system built from a single grid.
    fn panel_properties<'a>(&self, system: &'a System<T>) -> Self::Properties<'a> {
        &system.panels[0]
    }
}

impl<S, T: Precision> SurfaceGrids<T> for [Array2<S>] {
    type Properties<'a> = &'a [Array2<PanelProperties<T>>]
    where
        T: 'a;

    fn panel_properties<'a>(&self, system: &'a System<T>) -> Self::Properties<'a> {
        &system.panels
    }
}

impl<S, T: Precision> SurfaceGrids<T> for Vec<Array2<S>> {
    type Properties<'a> = &'a [Array2<PanelProperties<T>>]
    where
        T: 'a;

    fn panel_properties<'a>(&self, system: &'a System<T>) -> Self::Properties<'a> {
        &system.panels
    }
}

/// Baseline panel results currently stored in `system`.
///
/// `surfaces` is the argument the system was constructed from: a single
/// grid yields that surface's grid, a sequence yields every surface's grid in
/// order. Derivative slots are not included.
pub fn get_surface_properties<'a, T, G>(system: &'a System<T>, surfaces: &G) -> G::Properties<'a>
where
    T: Precision,
    G: SurfaceGrids<T> + ?Sized,
{
    surfaces.panel_properties(system)
}
