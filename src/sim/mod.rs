//! Deterministic simulation module
//!
//! All engine logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable insertion-order iteration
//! - No rendering or platform dependencies

pub mod collision;
pub mod emitter;
pub mod state;
pub mod tick;

pub use collision::{Contact, Edge, SurfaceId, reflect_velocity};
pub use emitter::Emitter;
pub use state::{Ball, Bouncer, FieldSize, RunPhase, SimState, Snapshot};
pub use tick::{CollisionEvent, CollisionSink, NullSink, tick};
