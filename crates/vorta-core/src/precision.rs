//! Numeric precision of lattice state and promotion of mixed inputs.
//!
//! Every array and record held by a [`System`](crate::system::System) shares
//! one floating element type, fixed when the system is allocated. That type
//! is any [`Precision`] (`f32` or `f64`).
//!
//! Values handed to the promoting
//! [`panel_properties`](crate::properties::panel_properties) constructor may
//! mix precisions. Their common type is computed from an explicit table
//! ([`Promote`]) rather than inferred at run time:
//!
//! | lhs \ rhs | `i32` | `i64` | `f32` | `f64` |
//! |-----------|-------|-------|-------|-------|
//! | `i32`     | `i32` | `i64` | `f32` | `f64` |
//! | `i64`     | `i64` | `i64` | `f32` | `f64` |
//! | `f32`     | `f32` | `f32` | `f32` | `f64` |
//! | `f64`     | `f64` | `f64` | `f64` | `f64` |
//!
//! An all-integer result is finally mapped to `f64` through
//! [`Scalar::Float`]. Conversions only ever go to the upper bound, so nothing
//! is narrowed silently.

use std::fmt::{Debug, Display};

use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Runtime tag describing a floating element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrecisionKind {
    /// IEEE 754 binary32.
    Single,
    /// IEEE 754 binary64.
    Double,
}

impl PrecisionKind {
    /// Storage width in bits.
    pub fn bits(self) -> u32 {
        match self {
            PrecisionKind::Single => 32,
            PrecisionKind::Double => 64,
        }
    }
}

impl Display for PrecisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrecisionKind::Single => write!(f, "f32"),
            PrecisionKind::Double => write!(f, "f64"),
        }
    }
}

/// A numeric type accepted as an argument by the promoting constructors.
pub trait Scalar: Copy + Debug + PartialOrd + Send + Sync + 'static {
    /// Floating type this scalar widens to when no other input is wider.
    type Float: Precision;

    /// Lossless-or-widening view of the value as `f64`.
    fn as_f64(self) -> f64;

    /// Convert to the precision `T`.
    ///
    /// Only called with `T` at least as wide as `Self`, as chosen by
    /// [`Promote`], so the conversion never narrows a float.
    fn into_precision<T: Precision>(self) -> T {
        T::from_widened(self.as_f64())
    }
}

/// Floating element type of a lattice system.
pub trait Precision:
    Float + Scalar<Float = Self> + Default + Display + Send + Sync + 'static
{
    /// Runtime tag for this type.
    const KIND: PrecisionKind;

    /// Build a value from an `f64` that was itself widened from `Self` or
    /// from a narrower scalar.
    fn from_widened(value: f64) -> Self;

    /// Fill value for storage that has a shape but no data yet.
    ///
    /// NaN in debug builds so that a read before the solver writes shows up
    /// in results; zero in release builds.
    fn unwritten() -> Self {
        if cfg!(debug_assertions) {
            Self::nan()
        } else {
            Self::zero()
        }
    }
}

impl Precision for f32 {
    const KIND: PrecisionKind = PrecisionKind::Single;

    fn from_widened(value: f64) -> Self {
        value as f32
    }
}

impl Precision for f64 {
    const KIND: PrecisionKind = PrecisionKind::Double;

    fn from_widened(value: f64) -> Self {
        value
    }
}

macro_rules! impl_scalar {
    ($($ty:ty => $float:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                type Float = $float;

                #[allow(clippy::unnecessary_cast)]
                fn as_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_scalar! {
    i32 => f64,
    i64 => f64,
    f32 => f32,
    f64 => f64,
}

/// Least upper bound of two scalar types.
pub trait Promote<Rhs: Scalar>: Scalar {
    type Output: Scalar;
}

macro_rules! impl_promote {
    ($($lhs:ty, $rhs:ty => $out:ty;)*) => {
        $(
            impl Promote<$rhs> for $lhs {
                type Output = $out;
            }
        )*
    };
}

impl_promote! {
    i32, i32 => i32;
    i32, i64 => i64;
    i32, f32 => f32;
    i32, f64 => f64;
    i64, i32 => i64;
    i64, i64 => i64;
    i64, f32 => f32;
    i64, f64 => f64;
    f32, i32 => f32;
    f32, i64 => f32;
    f32, f32 => f32;
    f32, f64 => f64;
    f64, i32 => f64;
    f64, i64 => f64;
    f64, f32 => f64;
    f64, f64 => f64;
}

/// Upper bound of two scalar types.
pub type Promoted<A, B> = <A as Promote<B>>::Output;

/// Floating upper bound of the five argument types of a panel record.
pub type Unified<A, B, C, D, E> =
    <Promoted<Promoted<Promoted<Promoted<A, B>, C>, D>, E> as Scalar>::Float;
