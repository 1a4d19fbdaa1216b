//! Boing - a musical gravity-bounce toy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity store, emission, physics, collisions)
//! - `chime`: Collision event to tone mapping
//! - `engine`: Host-facing facade (input adapters, fixed-step loop, snapshots)
//! - `config`: Data-driven tuning
//!
//! Rendering and audio playback live in the host; the engine only produces
//! snapshots and collision events.

pub mod chime;
pub mod config;
pub mod engine;
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub use engine::Engine;

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;

    /// Gravity acceleration along the gravity direction (units/s²)
    pub const GRAVITY_ACCEL: f32 = 600.0;
    /// Fraction of impact speed retained after a bounce
    pub const RESTITUTION: f32 = 0.9;

    /// Drags shorter than this never become a bouncer
    pub const MIN_BOUNCER_LENGTH: f32 = 10.0;

    /// Default seconds between emissions for the seeded emitter
    pub const EMIT_INTERVAL: f32 = 2.0;
    /// Shortest accepted emission interval. Guards the catch-up loop:
    /// subtracting a subnormal interval from a large f32 accumulator makes
    /// no progress, and sub-millisecond cadences owe absurd ball counts.
    pub const MIN_EMIT_INTERVAL: f32 = 1e-3;
    /// Horizontal jitter applied to freshly emitted balls (units/s)
    pub const EMIT_JITTER: f32 = 12.0;

    /// Collision resolution passes per ball per tick
    pub const MAX_RESOLVE_PASSES: u32 = 4;
}

/// Left-hand perpendicular of a vector (rotate 90° counter-clockwise)
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Closest point to `p` on the segment `a`-`b` (clamped projection)
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perp_is_ccw_rotation() {
        let v = Vec2::new(1.0, 0.0);
        let p = perp(v);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_closest_point_interior() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        let c = closest_point_on_segment(Vec2::new(4.0, 3.0), a, b);
        assert!((c - Vec2::new(4.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_closest_point_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((closest_point_on_segment(Vec2::new(-5.0, 2.0), a, b) - a).length() < 1e-6);
        assert!((closest_point_on_segment(Vec2::new(15.0, 2.0), a, b) - b).length() < 1e-6);
    }

    #[test]
    fn test_closest_point_degenerate_segment() {
        let a = Vec2::new(3.0, 3.0);
        let c = closest_point_on_segment(Vec2::new(7.0, 1.0), a, a);
        assert!((c - a).length() < 1e-6);
    }
}
