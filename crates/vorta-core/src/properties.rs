//! Per-panel results of a solve step.
//!
//! A [`PanelProperties`] value is written into a panel grid after the
//! circulation is known and the panel forces have been integrated. It is a
//! plain value: updating a panel means building a new record and overwriting
//! the grid cell.
//!
//! Normalisation:
//! - `gamma` and `velocity` are divided by the freestream speed $V_\infty$.
//! - `cfb`, `cfl` and `cfr` are divided by $q_\infty S_{\text{ref}}$.

use serde::{Deserialize, Serialize};

use crate::precision::{Precision, PrecisionKind, Promote, Promoted, Scalar, Unified};
use crate::types::{unwritten_vector, Vec3};

/// Circulation, local velocity and force contributions of one panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelProperties<T> {
    gamma: T,
    velocity: Vec3<T>,
    cfb: Vec3<T>,
    cfl: Vec3<T>,
    cfr: Vec3<T>,
}

impl<T: Precision> PanelProperties<T> {
    /// Build a record whose inputs already share the precision `T`.
    ///
    /// Use [`panel_properties`] when the inputs have mixed types.
    ///
    /// # Arguments
    /// * `gamma` - Vortex ring circulation.
    /// * `velocity` - Local velocity at the bound-vortex midpoint.
    /// * `cfb` - Net bound-vortex force coefficient.
    /// * `cfl` - Left-edge bound-vortex force coefficient.
    /// * `cfr` - Right-edge bound-vortex force coefficient.
    pub fn new(gamma: T, velocity: Vec3<T>, cfb: Vec3<T>, cfl: Vec3<T>, cfr: Vec3<T>) -> Self {
        Self {
            gamma,
            velocity,
            cfb,
            cfl,
            cfr,
        }
    }

    /// All-zero record.
    pub fn zeroed() -> Self {
        let z = [T::zero(); 3];
        Self::new(T::zero(), z, z, z, z)
    }

    /// Placeholder for a panel the solver has not written yet.
    pub fn unwritten() -> Self {
        let u = unwritten_vector();
        Self::new(T::unwritten(), u, u, u, u)
    }

    /// Element precision of every field.
    pub fn precision(&self) -> PrecisionKind {
        T::KIND
    }

    pub fn gamma(&self) -> T {
        self.gamma
    }

    pub fn velocity(&self) -> Vec3<T> {
        self.velocity
    }

    pub fn cfb(&self) -> Vec3<T> {
        self.cfb
    }

    pub fn cfl(&self) -> Vec3<T> {
        self.cfl
    }

    pub fn cfr(&self) -> Vec3<T> {
        self.cfr
    }

    /// Sum of the bound-vortex and both edge force coefficients.
    pub fn total_force(&self) -> Vec3<T> {
        std::array::from_fn(|c| self.cfb[c] + self.cfl[c] + self.cfr[c])
    }
}

fn widen3<S: Scalar, T: Precision>(v: Vec3<S>) -> Vec3<T> {
    v.map(|x| x.into_precision())
}

/// Build a [`PanelProperties`] from inputs of mixed numeric type.
///
/// The record's precision is the least upper bound of the five argument
/// types (see [`crate::precision`]); narrower inputs are widened to it and
/// nothing is narrowed.
///
/// ```
/// use vorta_core::precision::PrecisionKind;
/// use vorta_core::properties::panel_properties;
///
/// let p = panel_properties(1.0_f32, [1.0_f32, 0.0, 0.0], [0.0_f64; 3], [0.0_f32; 3], [0_i32; 3]);
/// assert_eq!(p.precision(), PrecisionKind::Double);
/// ```
pub fn panel_properties<G, V, B, L, R>(
    gamma: G,
    velocity: Vec3<V>,
    cfb: Vec3<B>,
    cfl: Vec3<L>,
    cfr: Vec3<R>,
) -> PanelProperties<Unified<G, V, B, L, R>>
where
    G: Promote<V>,
    V: Scalar,
    B: Scalar,
    L: Scalar,
    R: Scalar,
    Promoted<G, V>: Promote<B>,
    Promoted<Promoted<G, V>, B>: Promote<L>,
    Promoted<Promoted<Promoted<G, V>, B>, L>: Promote<R>,
{
    PanelProperties::new(
        gamma.into_precision(),
        widen3(velocity),
        widen3(cfb),
        widen3(cfl),
        widen3(cfr),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_inputs_keep_precision() {
        let p = panel_properties(0.5_f32, [1.0_f32; 3], [0.0_f32; 3], [0.0_f32; 3], [0.0_f32; 3]);
        assert_eq!(p.precision(), PrecisionKind::Single);
        assert_eq!(p.gamma(), 0.5_f32);
    }

    #[test]
    fn test_single_double_input_widens_everything() {
        let p = panel_properties(0.1_f32, [0.2_f32; 3], [0.3_f32; 3], [0.4_f64; 3], [0.5_f32; 3]);
        assert_eq!(p.precision(), PrecisionKind::Double);
        // Widened from f32, not re-parsed as the nearest f64.
        assert_eq!(p.gamma(), 0.1_f32 as f64);
        assert_eq!(p.velocity()[2], 0.2_f32 as f64);
        assert_eq!(p.cfl()[0], 0.4_f64);
    }

    #[test]
    fn test_integer_inputs_become_floating() {
        let p = panel_properties(2_i32, [1_i32, 0, 0], [0_i64; 3], [0_i32; 3], [0_i32; 3]);
        assert_eq!(p.precision(), PrecisionKind::Double);
        assert_eq!(p.gamma(), 2.0);
        assert_eq!(p.velocity(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_integer_and_single_stays_single() {
        let p = panel_properties(1_i32, [1.0_f32; 3], [0_i32; 3], [0_i32; 3], [0_i32; 3]);
        assert_eq!(p.precision(), PrecisionKind::Single);
    }

    #[test]
    fn test_repromotion_is_identity() {
        let first = panel_properties(0.25_f32, [1.0_f32; 3], [0.5_f64; 3], [0.0_f32; 3], [0.0_f32; 3]);
        let again = panel_properties(
            first.gamma(),
            first.velocity(),
            first.cfb(),
            first.cfl(),
            first.cfr(),
        );
        assert_eq!(again.precision(), first.precision());
        assert_eq!(again, first);
    }

    #[test]
    fn test_non_finite_values_pass_through() {
        let p = PanelProperties::new(f64::NAN, [f64::INFINITY, 0.0, 0.0], [0.0; 3], [0.0; 3], [0.0; 3]);
        assert!(p.gamma().is_nan());
        assert!(p.velocity()[0].is_infinite());
    }

    #[test]
    fn test_total_force_sums_contributions() {
        let p = PanelProperties::new(
            1.0,
            [1.0, 0.0, 0.0],
            [0.1, 0.2, 0.3],
            [0.01, 0.02, 0.03],
            [0.001, 0.002, 0.003],
        );
        let f = p.total_force();
        assert_relative_eq!(f[0], 0.111, epsilon = 1e-12);
        assert_relative_eq!(f[1], 0.222, epsilon = 1e-12);
        assert_relative_eq!(f[2], 0.333, epsilon = 1e-12);
    }

    #[test]
    fn test_zeroed_is_zero() {
        let p = PanelProperties::<f32>::zeroed();
        assert_eq!(p.gamma(), 0.0);
        assert_eq!(p.total_force(), [0.0; 3]);
    }

    #[test]
    fn test_json_round_trip() {
        let p = PanelProperties::new(1.5, [1.0, 0.0, 0.0], [0.0, 0.0, 0.2], [0.0; 3], [0.0; 3]);
        let json = serde_json::to_string(&p).unwrap();
        let back: PanelProperties<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
