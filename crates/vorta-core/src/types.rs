//! Panel records shared across the lattice state.
//!
//! [`SurfacePanel`] is the geometry layer's description of one lifting
//! surface panel; only the shape of a grid of them matters when a
//! [`System`](crate::system::System) is sized. [`WakePanel`] and
//! [`TrefftzPanel`] are the per-panel records the solver writes into the
//! wake and far-field storage.

use serde::{Deserialize, Serialize};

use crate::precision::Precision;

/// A 3-component vector stored as a fixed array.
pub type Vec3<T> = [T; 3];

/// One bound-vortex panel of a discretised lifting surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfacePanel<T> {
    /// Left end of the bound vortex.
    pub left: Vec3<T>,
    /// Right end of the bound vortex.
    pub right: Vec3<T>,
    /// Control point where the flow-tangency condition is applied.
    pub control_point: Vec3<T>,
    /// Unit normal at the control point.
    pub normal: Vec3<T>,
}

impl<T: Precision> SurfacePanel<T> {
    pub fn new(left: Vec3<T>, right: Vec3<T>, control_point: Vec3<T>, normal: Vec3<T>) -> Self {
        Self {
            left,
            right,
            control_point,
            normal,
        }
    }
}

/// One vortex ring of a surface's shed wake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WakePanel<T> {
    /// Corners in the order top-left, top-right, bottom-left, bottom-right,
    /// where "top" is the edge nearer the trailing edge.
    pub corners: [Vec3<T>; 4],
    /// Circulation of the ring, normalised by freestream speed.
    pub gamma: T,
}

impl<T: Precision> WakePanel<T> {
    pub fn new(corners: [Vec3<T>; 4], gamma: T) -> Self {
        Self { corners, gamma }
    }

    /// Placeholder for a wake cell the solver has not shed yet.
    pub fn unwritten() -> Self {
        let u = T::unwritten();
        Self {
            corners: [[u; 3]; 4],
            gamma: u,
        }
    }
}

/// One segment of a surface's trace in the Trefftz plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrefftzPanel<T> {
    pub left: Vec3<T>,
    pub centre: Vec3<T>,
    pub right: Vec3<T>,
    /// Trailing circulation carried into the far field.
    pub gamma: T,
}

impl<T: Precision> TrefftzPanel<T> {
    pub fn new(left: Vec3<T>, centre: Vec3<T>, right: Vec3<T>, gamma: T) -> Self {
        Self {
            left,
            centre,
            right,
            gamma,
        }
    }

    pub fn unwritten() -> Self {
        let u = T::unwritten();
        Self {
            left: [u; 3],
            centre: [u; 3],
            right: [u; 3],
            gamma: u,
        }
    }
}

/// Placeholder for a vector the solver has not written yet.
pub fn unwritten_vector<T: Precision>() -> Vec3<T> {
    [T::unwritten(); 3]
}
