//! Construction options for a lattice system.
//!
//! The only tunable is the wake depth: the number of chordwise wake rows
//! stored behind each surface. It is either one value applied to every
//! surface or an explicit per-surface list.
//!
//! ```toml
//! wake_depth = 3          # every surface
//! wake_depth = [3, 0, 1]  # one entry per surface
//! ```

use log::warn;
use serde::{Deserialize, Serialize};

use super::SystemError;

/// Number of wake rows per surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WakeDepth {
    /// Same depth behind every surface.
    Uniform(usize),
    /// One depth per surface, in surface order.
    PerSurface(Vec<usize>),
}

impl Default for WakeDepth {
    fn default() -> Self {
        WakeDepth::Uniform(0)
    }
}

impl From<usize> for WakeDepth {
    fn from(depth: usize) -> Self {
        WakeDepth::Uniform(depth)
    }
}

impl From<Vec<usize>> for WakeDepth {
    fn from(depths: Vec<usize>) -> Self {
        WakeDepth::PerSurface(depths)
    }
}

impl From<&[usize]> for WakeDepth {
    fn from(depths: &[usize]) -> Self {
        WakeDepth::PerSurface(depths.to_vec())
    }
}

impl WakeDepth {
    /// Expand to one depth per surface.
    ///
    /// A per-surface list must have exactly `surface_count` entries; it is
    /// never truncated or padded.
    pub fn resolve(&self, surface_count: usize) -> Result<Vec<usize>, SystemError> {
        match self {
            WakeDepth::Uniform(depth) => Ok(vec![*depth; surface_count]),
            WakeDepth::PerSurface(depths) if depths.len() == surface_count => Ok(depths.clone()),
            WakeDepth::PerSurface(depths) => {
                warn!(
                    "rejecting wake depth list of length {} for {} surface(s)",
                    depths.len(),
                    surface_count
                );
                Err(SystemError::WakeDepthMismatch {
                    surfaces: surface_count,
                    depths: depths.len(),
                })
            }
        }
    }
}

/// Options accepted by the multi-surface constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemOptions {
    #[serde(default)]
    pub wake_depth: WakeDepth,
}

impl SystemOptions {
    pub fn with_wake_depth(wake_depth: impl Into<WakeDepth>) -> Self {
        Self {
            wake_depth: wake_depth.into(),
        }
    }

    /// Parse options from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, SystemError> {
        toml::from_str(source).map_err(|e| SystemError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_broadcasts() {
        assert_eq!(WakeDepth::Uniform(2).resolve(3).unwrap(), vec![2, 2, 2]);
    }

    #[test]
    fn test_per_surface_passes_through() {
        let depths = WakeDepth::from(vec![1_usize, 0, 4]);
        assert_eq!(depths.resolve(3).unwrap(), vec![1, 0, 4]);
    }

    #[test]
    fn test_per_surface_length_mismatch_rejected() {
        let err = WakeDepth::from(vec![1_usize]).resolve(2).unwrap_err();
        assert!(matches!(
            err,
            SystemError::WakeDepthMismatch {
                surfaces: 2,
                depths: 1
            }
        ));
    }

    #[test]
    fn test_default_is_no_wake() {
        assert_eq!(SystemOptions::default().wake_depth, WakeDepth::Uniform(0));
    }

    #[test]
    fn test_toml_scalar_and_list() {
        let opts = SystemOptions::from_toml_str("wake_depth = 3").unwrap();
        assert_eq!(opts.wake_depth, WakeDepth::Uniform(3));

        let opts = SystemOptions::from_toml_str("wake_depth = [3, 1]").unwrap();
        assert_eq!(opts.wake_depth, WakeDepth::PerSurface(vec![3, 1]));

        let opts = SystemOptions::from_toml_str("").unwrap();
        assert_eq!(opts, SystemOptions::default());
    }

    #[test]
    fn test_toml_rejects_negative_depth() {
        let err = SystemOptions::from_toml_str("wake_depth = -1").unwrap_err();
        assert!(matches!(err, SystemError::Config(_)));
    }
}
