//! Simulation tuning
//!
//! All physics constants the host may want to tweak live here; the engine
//! itself never reads ambient globals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Construction-time configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Emitter interval must be finite and no shorter than the minimum
    NonPositiveInterval,
    /// Field dimensions must be finite and positive
    NonFiniteField,
    /// A tuning value is NaN or infinite
    NonFiniteValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveInterval => {
                write!(
                    f,
                    "emitter interval must be finite and at least {MIN_EMIT_INTERVAL}s"
                )
            }
            ConfigError::NonFiniteField => {
                write!(f, "field dimensions must be finite and > 0")
            }
            ConfigError::NonFiniteValue(name) => {
                write!(f, "tuning value `{name}` must be finite")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Physics tuning for a simulation instance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimConfig {
    /// Gravity acceleration along the gravity direction (units/s²)
    pub gravity_accel: f32,
    /// Fraction of impact speed retained after a bounce (0..=1)
    pub restitution: f32,
    /// Radius given to emitted balls
    pub ball_radius: f32,
    /// Seconds between emissions for default emitters
    pub emit_interval: f32,
    /// Horizontal jitter for freshly emitted balls (units/s, 0 disables)
    pub emit_jitter: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity_accel: GRAVITY_ACCEL,
            restitution: RESTITUTION,
            ball_radius: BALL_RADIUS,
            emit_interval: EMIT_INTERVAL,
            emit_jitter: EMIT_JITTER,
        }
    }
}

impl SimConfig {
    /// Check all tuning values before the simulation starts ticking
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity_accel.is_finite() {
            return Err(ConfigError::NonFiniteValue("gravity_accel"));
        }
        if !self.restitution.is_finite() || self.restitution < 0.0 || self.restitution > 1.0 {
            return Err(ConfigError::NonFiniteValue("restitution"));
        }
        if !self.ball_radius.is_finite() || self.ball_radius <= 0.0 {
            return Err(ConfigError::NonFiniteValue("ball_radius"));
        }
        if !self.emit_interval.is_finite() || self.emit_interval < MIN_EMIT_INTERVAL {
            return Err(ConfigError::NonPositiveInterval);
        }
        if !self.emit_jitter.is_finite() || self.emit_jitter < 0.0 {
            return Err(ConfigError::NonFiniteValue("emit_jitter"));
        }
        Ok(())
    }
}
