//! Ball emitters
//!
//! Each emitter accumulates elapsed time and owes one ball per full
//! interval. The accumulator subtracts the interval rather than zeroing, so
//! a long gap yields the same emission count as many short ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::MIN_EMIT_INTERVAL;

/// A fixed point that periodically spawns balls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emitter {
    pub id: u32,
    pub pos: Vec2,
    /// Seconds between emissions
    pub interval: f32,
    accumulator: f32,
}

impl Emitter {
    pub fn new(id: u32, pos: Vec2, interval: f32) -> Result<Self, ConfigError> {
        if !interval.is_finite() || interval < MIN_EMIT_INTERVAL {
            return Err(ConfigError::NonPositiveInterval);
        }
        if !pos.is_finite() {
            return Err(ConfigError::NonFiniteValue("emitter position"));
        }
        Ok(Self {
            id,
            pos,
            interval,
            accumulator: 0.0,
        })
    }

    /// Advance the schedule by `dt` seconds; returns how many balls are due.
    /// Multiple catch-up emissions in one call are intended behavior.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut due = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            due += 1;
        }
        due
    }

    /// Time banked toward the next emission
    #[inline]
    pub fn accumulated(&self) -> f32 {
        self.accumulator
    }
}
