//! Surface topology: the shape information a system is sized from.

use ndarray::Array2;

use super::config::WakeDepth;
use super::SystemError;

/// Panel counts and wake depth of one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceTopology {
    /// Chordwise panel count.
    pub chordwise: usize,
    /// Spanwise panel count.
    pub spanwise: usize,
    /// Chordwise wake rows.
    pub wake_depth: usize,
}

impl SurfaceTopology {
    pub fn panel_count(&self) -> usize {
        self.chordwise * self.spanwise
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.chordwise, self.spanwise)
    }
}

/// Ordered per-surface topology of a system.
///
/// Two systems with equal topologies have identical array shapes, so one can
/// be reused in place of the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Topology {
    surfaces: Vec<SurfaceTopology>,
}

impl Topology {
    /// Build from `(chordwise, spanwise)` shapes and a wake depth setting.
    ///
    /// Fails if a per-surface wake depth list does not match the number of
    /// shapes.
    pub fn new(
        shapes: &[(usize, usize)],
        wake_depth: impl Into<WakeDepth>,
    ) -> Result<Self, SystemError> {
        let depths = wake_depth.into().resolve(shapes.len())?;
        let surfaces = shapes
            .iter()
            .zip(depths)
            .map(|(&(chordwise, spanwise), wake_depth)| SurfaceTopology {
                chordwise,
                spanwise,
                wake_depth,
            })
            .collect();
        Ok(Self { surfaces })
    }

    /// Topology of a single surface.
    pub fn single(shape: (usize, usize), wake_depth: usize) -> Self {
        Self {
            surfaces: vec![SurfaceTopology {
                chordwise: shape.0,
                spanwise: shape.1,
                wake_depth,
            }],
        }
    }

    /// Topology of a sequence of surface grids, whatever their element type.
    pub fn from_grids<S>(
        grids: &[Array2<S>],
        wake_depth: impl Into<WakeDepth>,
    ) -> Result<Self, SystemError> {
        let shapes: Vec<(usize, usize)> = grids.iter().map(|g| g.dim()).collect();
        Self::new(&shapes, wake_depth)
    }

    pub fn surfaces(&self) -> &[SurfaceTopology] {
        &self.surfaces
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Total panel count across all surfaces.
    pub fn total_panels(&self) -> usize {
        self.surfaces.iter().map(SurfaceTopology::panel_count).sum()
    }

    pub fn wake_depths(&self) -> Vec<usize> {
        self.surfaces.iter().map(|s| s.wake_depth).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_panels_sums_surfaces() {
        let topo = Topology::new(&[(2, 3), (3, 5)], 1_usize).unwrap();
        assert_eq!(topo.surface_count(), 2);
        assert_eq!(topo.total_panels(), 21);
        assert_eq!(topo.wake_depths(), vec![1, 1]);
    }

    #[test]
    fn test_from_grids_reads_shapes() {
        let grids = vec![Array2::<u8>::zeros((4, 6)), Array2::<u8>::zeros((1, 2))];
        let topo = Topology::from_grids(&grids, vec![3_usize, 0]).unwrap();
        assert_eq!(topo.surfaces()[0].shape(), (4, 6));
        assert_eq!(topo.surfaces()[1].wake_depth, 0);
    }

    #[test]
    fn test_mismatched_depths_rejected() {
        assert!(Topology::new(&[(2, 3), (3, 5)], vec![1_usize]).is_err());
    }

    #[test]
    fn test_equality_tracks_wake_depth() {
        let a = Topology::single((4, 6), 3);
        let b = Topology::single((4, 6), 2);
        assert_ne!(a, b);
        assert_eq!(a, Topology::new(&[(4, 6)], 3_usize).unwrap());
    }
}
