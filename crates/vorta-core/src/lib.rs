//! # Vorta Core
//!
//! The state container of the Vorta vortex lattice method (VLM) solver.
//! Lifting surfaces are modelled as grids of vortex ring panels; this crate
//! holds every array the assembly, solve and post-processing steps read and
//! write for one analysis.
//!
//! ## Architecture
//!
//! A [`System`] is allocated once for a surface topology (surface count,
//! per-surface panel counts, wake depth) and then mutated in place across
//! solver iterations or time steps. Alongside the baseline state it carries
//! five derivative channels, one per freestream parameter, so sensitivities
//! can be written without re-deriving them.
//!
//! ## Modules
//!
//! - [`precision`] — Floating element types and promotion of mixed inputs.
//! - [`types`] — Surface, wake and Trefftz-plane panel records.
//! - [`properties`] — Per-panel solve results ([`PanelProperties`]).
//! - [`system`] — The [`System`] state, its layout, options and accessors.

pub mod precision;
pub mod properties;
pub mod system;
pub mod types;

pub use precision::{Precision, PrecisionKind};
pub use properties::{panel_properties, PanelProperties};
pub use system::accessor::{get_surface_properties, SurfaceGrids};
pub use system::config::{SystemOptions, WakeDepth};
pub use system::derivatives::{DerivativeChannelMut, Derivatives, NUM_FREESTREAM_PARAMS};
pub use system::layout::PanelLayout;
pub use system::topology::{SurfaceTopology, Topology};
pub use system::{System, SystemError};
pub use types::{SurfacePanel, TrefftzPanel, Vec3, WakePanel};
