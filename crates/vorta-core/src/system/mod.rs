//! The lattice system: all mutable numerical state of one analysis.
//!
//! A [`System`] is sized once from a surface [`Topology`] and then written in
//! place by the assembly, solve and post-processing steps, across as many
//! iterations or time steps as the analysis needs. It performs no
//! computation itself.
//!
//! # Storage
//!
//! | Field | Shape | Initial value |
//! |-------|-------|---------------|
//! | `aic` | $N \times N$ | zero |
//! | `w`, `gamma`, `dgammadt` | $N$ | zero |
//! | `v[s]` | $(n_w + 1) \times (n_s + 1)$ | unwritten |
//! | `panels[s]` | $n_c \times n_s$ | unwritten |
//! | `wakes[s]` | $n_w \times n_s$ | unwritten |
//! | `trefftz[s]` | $n_s$ | unwritten |
//! | `wake_shedding_locations[s]` | $n_s + 1$ | unwritten |
//! | `dw[p]`, `dgamma[p]` | $N$ | zero |
//! | `dpanels[p][s]` | $n_c \times n_s$ | unwritten |
//!
//! "Unwritten" cells are NaN in debug builds and zero in release builds (see
//! [`Precision::unwritten`]). Reading them before the solver writes them is a
//! caller error.
//!
//! The flat ordering of the length-$N$ arrays is described by
//! [`PanelLayout`].

pub mod accessor;
pub mod config;
pub mod derivatives;
pub mod layout;
pub mod topology;

use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1};
use thiserror::Error;

use crate::precision::{Precision, PrecisionKind};
use crate::properties::PanelProperties;
use crate::types::{unwritten_vector, SurfacePanel, TrefftzPanel, Vec3, WakePanel};

use config::{SystemOptions, WakeDepth};
use derivatives::{DerivativeChannelMut, Derivatives};
use layout::PanelLayout;
use topology::Topology;

/// Errors raised while sizing or indexing a system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Wake depth list has {depths} entries but there are {surfaces} surfaces")]
    WakeDepthMismatch { surfaces: usize, depths: usize },

    #[error("Surface {index} out of range ({count} surfaces)")]
    SurfaceOutOfRange { index: usize, count: usize },

    #[error("Panel {index:?} out of range for surface {surface} of shape {shape:?}")]
    PanelOutOfRange {
        surface: usize,
        index: (usize, usize),
        shape: (usize, usize),
    },

    #[error("Flat panel index {index} out of range ({total} panels)")]
    FlatIndexOutOfRange { index: usize, total: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Numerical state of a vortex lattice analysis.
///
/// Field shapes are fixed at construction. Solver steps overwrite contents
/// in place; they must not replace an array with one of a different shape.
#[derive(Debug, Clone)]
pub struct System<T: Precision> {
    /// Aerodynamic influence coefficients, $N \times N$.
    pub aic: Array2<T>,
    /// Normal velocity from sources other than the bound vorticity.
    pub w: Array1<T>,
    /// Panel circulation, normalised by freestream speed.
    pub gamma: Array1<T>,
    /// Velocity at the wake vertices of each surface.
    pub v: Vec<Array2<Vec3<T>>>,
    /// Per-panel results of each surface.
    pub panels: Vec<Array2<PanelProperties<T>>>,
    /// Wake rings of each surface; zero rows when there is no wake.
    pub wakes: Vec<Array2<WakePanel<T>>>,
    /// Trefftz-plane trace of each surface.
    pub trefftz: Vec<Vec<TrefftzPanel<T>>>,
    /// Derivative of `w` with respect to each freestream parameter.
    pub dw: Derivatives<Array1<T>>,
    /// Derivative of `gamma` with respect to each freestream parameter.
    pub dgamma: Derivatives<Array1<T>>,
    /// Derivative of `panels` with respect to each freestream parameter.
    pub dpanels: Derivatives<Vec<Array2<PanelProperties<T>>>>,
    /// Trailing-edge vertices from which the next wake row is shed.
    pub wake_shedding_locations: Vec<Vec<Vec3<T>>>,
    /// Rate of change of `gamma` with respect to non-dimensional time.
    pub dgammadt: Array1<T>,
    topology: Topology,
    layout: PanelLayout,
}

impl<T: Precision> System<T> {
    /// Allocate a system for one surface, in the surface's own precision.
    pub fn new(surface: &Array2<SurfacePanel<T>>, wake_depth: usize) -> Self {
        Self::for_surface(surface, wake_depth)
    }

    /// Allocate a system of precision `T` for one surface grid.
    ///
    /// Only the grid's shape is read.
    pub fn for_surface<S>(surface: &Array2<S>, wake_depth: usize) -> Self {
        Self::from_topology(Topology::single(surface.dim(), wake_depth))
    }

    /// Allocate a system of precision `T` for several independently shaped
    /// surface grids.
    ///
    /// `wake_depth` is either one depth for every surface or one per
    /// surface. A per-surface list of the wrong length is rejected before
    /// anything is allocated.
    pub fn for_surfaces<S>(
        surfaces: &[Array2<S>],
        wake_depth: impl Into<WakeDepth>,
    ) -> Result<Self, SystemError> {
        Topology::from_grids(surfaces, wake_depth).map(Self::from_topology)
    }

    /// [`for_surfaces`](Self::for_surfaces) driven by parsed options.
    pub fn with_options<S>(
        surfaces: &[Array2<S>],
        options: &SystemOptions,
    ) -> Result<Self, SystemError> {
        Self::for_surfaces(surfaces, options.wake_depth.clone())
    }

    /// Allocate every array for `topology`.
    pub fn from_topology(topology: Topology) -> Self {
        let layout = PanelLayout::new(&topology);
        let n = layout.total_panels();
        debug!(
            "Allocating lattice system: {} surface(s), {} panels, {} precision",
            topology.surface_count(),
            n,
            T::KIND
        );

        let surfaces = topology.surfaces().to_vec();
        for (s, surface) in surfaces.iter().enumerate() {
            trace!(
                "  surface {}: {}x{} panels, {} wake row(s)",
                s,
                surface.chordwise,
                surface.spanwise,
                surface.wake_depth
            );
        }

        let panel_grids = || -> Vec<Array2<PanelProperties<T>>> {
            surfaces
                .iter()
                .map(|s| Array2::from_elem(s.shape(), PanelProperties::unwritten()))
                .collect()
        };

        Self {
            aic: Array2::zeros((n, n)),
            w: Array1::zeros(n),
            gamma: Array1::zeros(n),
            v: surfaces
                .iter()
                .map(|s| Array2::from_elem((s.wake_depth + 1, s.spanwise + 1), unwritten_vector()))
                .collect(),
            panels: panel_grids(),
            wakes: surfaces
                .iter()
                .map(|s| Array2::from_elem((s.wake_depth, s.spanwise), WakePanel::unwritten()))
                .collect(),
            trefftz: surfaces
                .iter()
                .map(|s| vec![TrefftzPanel::unwritten(); s.spanwise])
                .collect(),
            dw: Derivatives::from_fn(|_| Array1::zeros(n)),
            dgamma: Derivatives::from_fn(|_| Array1::zeros(n)),
            dpanels: Derivatives::from_fn(|_| panel_grids()),
            wake_shedding_locations: surfaces
                .iter()
                .map(|s| vec![unwritten_vector(); s.spanwise + 1])
                .collect(),
            dgammadt: Array1::zeros(n),
            topology,
            layout,
        }
    }

    /// Element precision of every array.
    pub fn precision(&self) -> PrecisionKind {
        T::KIND
    }

    /// $N$, the total panel count.
    pub fn panel_count(&self) -> usize {
        self.layout.total_panels()
    }

    pub fn surface_count(&self) -> usize {
        self.topology.surface_count()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    /// Whether this system can be reused for `topology` without reallocating.
    pub fn matches_topology(&self, topology: &Topology) -> bool {
        &self.topology == topology
    }

    /// Return every array to its freshly allocated state, keeping the
    /// allocations.
    pub fn reset(&mut self) {
        let zero = T::zero();
        self.aic.fill(zero);
        self.w.fill(zero);
        self.gamma.fill(zero);
        self.dgammadt.fill(zero);
        for slot in self.dw.iter_mut().chain(self.dgamma.iter_mut()) {
            slot.fill(zero);
        }

        for grid in &mut self.v {
            grid.fill(unwritten_vector());
        }
        for grid in self.panels.iter_mut().chain(self.dpanels.iter_mut().flatten()) {
            grid.fill(PanelProperties::unwritten());
        }
        for grid in &mut self.wakes {
            grid.fill(WakePanel::unwritten());
        }
        for row in &mut self.trefftz {
            row.fill(TrefftzPanel::unwritten());
        }
        for row in &mut self.wake_shedding_locations {
            row.fill(unwritten_vector());
        }
        trace!("Reset lattice system with {} panels", self.panel_count());
    }

    /// Surface `surface`'s circulation.
    pub fn surface_gamma(&self, surface: usize) -> Result<ArrayView1<'_, T>, SystemError> {
        self.layout.view(&self.gamma, surface)
    }

    pub fn surface_gamma_mut(&mut self, surface: usize) -> Result<ArrayViewMut1<'_, T>, SystemError> {
        self.layout.view_mut(&mut self.gamma, surface)
    }

    pub fn surface_w(&self, surface: usize) -> Result<ArrayView1<'_, T>, SystemError> {
        self.layout.view(&self.w, surface)
    }

    pub fn surface_w_mut(&mut self, surface: usize) -> Result<ArrayViewMut1<'_, T>, SystemError> {
        self.layout.view_mut(&mut self.w, surface)
    }

    pub fn surface_dgammadt(&self, surface: usize) -> Result<ArrayView1<'_, T>, SystemError> {
        self.layout.view(&self.dgammadt, surface)
    }

    /// Split the derivative storage into one exclusive view per freestream
    /// parameter.
    ///
    /// The views borrow only `dw`, `dgamma` and `dpanels`, so they can be
    /// handed to separate workers.
    pub fn derivative_channels_mut(&mut self) -> Derivatives<DerivativeChannelMut<'_, T>> {
        let layout = &self.layout;
        let [w0, w1, w2, w3, w4] = self.dw.as_mut_array().each_mut();
        let [g0, g1, g2, g3, g4] = self.dgamma.as_mut_array().each_mut();
        let [p0, p1, p2, p3, p4] = self.dpanels.as_mut_array().each_mut();
        Derivatives::from([
            DerivativeChannelMut::new(0, layout, w0, g0, p0),
            DerivativeChannelMut::new(1, layout, w1, g1, p1),
            DerivativeChannelMut::new(2, layout, w2, g2, p2),
            DerivativeChannelMut::new(3, layout, w3, g3, p3),
            DerivativeChannelMut::new(4, layout, w4, g4, p4),
        ])
    }

    /// Run `f` on each derivative channel in turn.
    pub fn for_each_derivative_channel<F>(&mut self, f: F)
    where
        F: FnMut(DerivativeChannelMut<'_, T>),
    {
        self.derivative_channels_mut().into_iter().for_each(f);
    }

    /// Run `f` on all derivative channels concurrently.
    #[cfg(feature = "parallel")]
    pub fn par_for_each_derivative_channel<F>(&mut self, f: F)
    where
        F: Fn(DerivativeChannelMut<'_, T>) + Send + Sync,
    {
        use rayon::prelude::*;

        Vec::from(self.derivative_channels_mut().into_inner())
            .into_par_iter()
            .for_each(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(nc: usize, ns: usize) -> Array2<SurfacePanel<f64>> {
        Array2::from_elem((nc, ns), SurfacePanel::default())
    }

    #[test]
    fn test_single_surface_shapes() {
        let sys = System::new(&grid(4, 6), 3);
        assert_eq!(sys.precision(), PrecisionKind::Double);
        assert_eq!(sys.aic.dim(), (24, 24));
        assert_eq!(sys.panels[0].dim(), (4, 6));
        assert_eq!(sys.wakes[0].dim(), (3, 6));
        assert_eq!(sys.trefftz[0].len(), 6);
        assert_eq!(sys.v[0].dim(), (4, 7));
        assert_eq!(sys.wake_shedding_locations[0].len(), 7);
        for slot in &sys.dgamma {
            assert_eq!(slot.len(), 24);
        }
    }

    #[test]
    fn test_explicit_precision_overrides_surface() {
        let sys = System::<f32>::for_surface(&grid(2, 2), 0);
        assert_eq!(sys.precision(), PrecisionKind::Single);
        assert_eq!(sys.panels[0][[0, 0]].precision(), PrecisionKind::Single);
    }

    #[test]
    fn test_neutral_arrays_start_at_zero() {
        let sys = System::new(&grid(2, 3), 1);
        assert!(sys.aic.iter().all(|&x| x == 0.0));
        assert!(sys.gamma.iter().all(|&x| x == 0.0));
        assert!(sys.dw.iter().all(|slot| slot.iter().all(|&x| x == 0.0)));
        assert!(sys.dgammadt.iter().all(|&x| x == 0.0));
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_unwritten_arrays_are_poisoned_in_debug() {
        let sys = System::new(&grid(2, 3), 1);
        assert!(sys.panels[0].iter().all(|p| p.gamma().is_nan()));
        assert!(sys.wakes[0].iter().all(|p| p.gamma.is_nan()));
        assert!(sys.trefftz[0].iter().all(|p| p.gamma.is_nan()));
        assert!(sys.v[0].iter().all(|v| v[0].is_nan()));
        assert!(sys.wake_shedding_locations[0].iter().all(|r| r[2].is_nan()));
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut sys = System::new(&grid(2, 2), 1);
        let fresh_len = sys.aic.len();
        sys.aic.fill(3.0);
        sys.gamma[1] = 2.0;
        sys.dgamma[4][0] = 1.0;
        sys.panels[0][[1, 1]] = PanelProperties::zeroed();

        sys.reset();

        assert_eq!(sys.aic.len(), fresh_len);
        assert!(sys.aic.iter().all(|&x| x == 0.0));
        assert_eq!(sys.gamma[1], 0.0);
        assert_eq!(sys.dgamma[4][0], 0.0);
        if cfg!(debug_assertions) {
            assert!(sys.panels[0][[1, 1]].gamma().is_nan());
        }
    }

    #[test]
    fn test_surface_views_follow_layout() {
        let grids = vec![grid(1, 2), grid(2, 2)];
        let mut sys = System::<f64>::for_surfaces(&grids, 0_usize).unwrap();
        sys.surface_gamma_mut(1).unwrap().fill(5.0);
        assert_eq!(sys.gamma.to_vec(), vec![0.0, 0.0, 5.0, 5.0, 5.0, 5.0]);
        assert_eq!(sys.surface_gamma(0).unwrap().len(), 2);
        assert!(sys.surface_w(2).is_err());
    }

    #[test]
    fn test_channels_write_only_their_slot() {
        let mut sys = System::new(&grid(2, 2), 0);
        sys.for_each_derivative_channel(|mut ch| {
            let value = ch.index as f64 + 1.0;
            ch.dgamma.fill(value);
            ch.surface_dw_mut(0).unwrap().fill(-value);
            ch.dpanels[0][[0, 0]] = PanelProperties::zeroed();
        });

        for (p, slot) in sys.dgamma.iter().enumerate() {
            assert!(slot.iter().all(|&x| x == p as f64 + 1.0));
        }
        assert!(sys.dw[2].iter().all(|&x| x == -3.0));
        assert!(sys.gamma.iter().all(|&x| x == 0.0));
        assert!(sys.dpanels.iter().all(|grids| grids[0][[0, 0]].gamma() == 0.0));
    }
}
