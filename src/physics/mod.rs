//! Per-frame string simulation for board connectors
//!
//! The host loop calls [`StringPhysics::step`] once per animation frame and
//! reads back polylines via [`StringPhysics::polyline`] for drawing. Only
//! strands touched by node movement (or freshly registered) do any work; the
//! rest sleep.

pub mod config;
pub mod engine;

pub use config::{PhysicsConfig, MAX_CONNECTIONS, POINTS_COUNT};
pub use engine::{RegisterOutcome, StrandView, StringPhysics};
