//! Simulation state and entity store
//!
//! `SimState` owns every entity. Consumers get read-only snapshots; nothing
//! outside the store holds a reference to a live ball.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::emitter::Emitter;
use crate::config::{ConfigError, SimConfig};
use crate::consts::MIN_BOUNCER_LENGTH;

/// Field rectangle. Origin at the top-left corner, +y grows downward
/// (screen convention, so a downward gravity slider maps to +y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: f32,
    pub height: f32,
}

impl FieldSize {
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::NonFiniteField);
        }
        Ok(Self { width, height })
    }
}

/// Transport phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RunPhase {
    /// Not yet started
    #[default]
    Idle,
    /// Ticks advance the simulation
    Running,
    /// Entity state preserved, integration and emission frozen
    Paused,
}

/// A ball entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// A user-drawn line segment balls reflect off
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bouncer {
    pub id: u32,
    pub p1: Vec2,
    pub p2: Vec2,
}

impl Bouncer {
    #[inline]
    pub fn length(&self) -> f32 {
        (self.p2 - self.p1).length()
    }
}

/// Read-only view of the world for the renderer
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub time_ticks: u64,
    pub phase: RunPhase,
    pub gravity_dir: Vec2,
    pub field: FieldSize,
    pub balls: &'a [Ball],
    pub bouncers: &'a [Bouncer],
    pub emitters: &'a [Emitter],
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Run seed for reproducible emission jitter
    pub seed: u64,
    pub config: SimConfig,
    pub field: FieldSize,
    /// Unit vector; combined with `config.gravity_accel` by the integrator
    pub gravity_dir: Vec2,
    pub phase: RunPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Insertion order; IDs are unique and monotonic
    pub balls: Vec<Ball>,
    pub bouncers: Vec<Bouncer>,
    pub emitters: Vec<Emitter>,
    /// Pristine emitter set restored by `reset`
    default_emitters: Vec<Emitter>,
    next_id: u32,
}

impl SimState {
    /// Create a state with the default scene: one emitter at top-center.
    pub fn new(field: FieldSize, config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Self {
            seed,
            config,
            field,
            gravity_dir: Vec2::new(0.0, 1.0),
            phase: RunPhase::Idle,
            time_ticks: 0,
            balls: Vec::new(),
            bouncers: Vec::new(),
            emitters: Vec::new(),
            default_emitters: Vec::new(),
            next_id: 1,
        };

        let id = state.next_entity_id();
        let emitter = Emitter::new(id, Vec2::new(field.width / 2.0, 0.0), config.emit_interval)?;
        state.default_emitters.push(emitter.clone());
        state.emitters.push(emitter);

        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// ID the next spawn will receive, without allocating it
    #[inline]
    pub fn peek_next_id(&self) -> u32 {
        self.next_id
    }

    /// Add a ball to the store. Callers (emitters, tests) own placement.
    pub fn spawn_ball(&mut self, pos: Vec2, vel: Vec2, radius: f32) -> u32 {
        let id = self.next_entity_id();
        self.balls.push(Ball {
            id,
            pos,
            vel,
            radius,
        });
        id
    }

    /// Remove a ball by ID. No-op if already absent.
    pub fn remove_ball(&mut self, id: u32) {
        self.balls.retain(|b| b.id != id);
    }

    /// Add a bouncer segment. Drags below the minimum length are ignored
    /// (a click without a drag is normal interaction, not an error).
    pub fn add_bouncer(&mut self, p1: Vec2, p2: Vec2) -> Option<u32> {
        if !p1.is_finite() || !p2.is_finite() {
            log::warn!("ignoring bouncer with non-finite endpoints");
            return None;
        }
        let length = (p2 - p1).length();
        if length < MIN_BOUNCER_LENGTH {
            log::debug!("ignoring bouncer of length {length:.1}");
            return None;
        }
        let id = self.next_entity_id();
        self.bouncers.push(Bouncer { id, p1, p2 });
        Some(id)
    }

    /// Point gravity along `dir`. Zero or non-finite input leaves the
    /// current direction unchanged.
    pub fn set_gravity(&mut self, dir: Vec2) {
        if !dir.is_finite() {
            log::warn!("ignoring non-finite gravity direction");
            return;
        }
        let unit = dir.normalize_or_zero();
        if unit == Vec2::ZERO {
            log::debug!("ignoring zero gravity direction");
            return;
        }
        self.gravity_dir = unit;
    }

    /// Replace the field rectangle (host viewport resize)
    pub fn set_field(&mut self, field: FieldSize) {
        self.field = field;
    }

    /// `Idle | Paused -> Running`
    pub fn start(&mut self) {
        match self.phase {
            RunPhase::Idle | RunPhase::Paused => {
                log::info!("simulation running");
                self.phase = RunPhase::Running;
            }
            RunPhase::Running => {}
        }
    }

    /// `Running -> Paused`; entity state is preserved
    pub fn pause(&mut self) {
        if self.phase == RunPhase::Running {
            log::info!("simulation paused");
            self.phase = RunPhase::Paused;
        }
    }

    /// Clear balls and user bouncers, restore the default emitter set,
    /// return to `Idle`. Entity IDs are never reused.
    pub fn reset(&mut self) {
        log::info!(
            "reset: clearing {} balls, {} bouncers",
            self.balls.len(),
            self.bouncers.len()
        );
        self.balls.clear();
        self.bouncers.clear();
        self.emitters = self.default_emitters.clone();
        self.time_ticks = 0;
        self.phase = RunPhase::Idle;
    }

    /// Read-only view for rendering. Must not be used to mutate state.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            time_ticks: self.time_ticks,
            phase: self.phase,
            gravity_dir: self.gravity_dir,
            field: self.field,
            balls: &self.balls,
            bouncers: &self.bouncers,
            emitters: &self.emitters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> SimState {
        let field = FieldSize::new(400.0, 400.0).unwrap();
        SimState::new(field, SimConfig::default(), 7).unwrap()
    }

    #[test]
    fn test_field_size_rejects_bad_dimensions() {
        assert!(FieldSize::new(0.0, 400.0).is_err());
        assert!(FieldSize::new(400.0, -1.0).is_err());
        assert!(FieldSize::new(f32::NAN, 400.0).is_err());
        assert!(FieldSize::new(f32::INFINITY, 400.0).is_err());
    }

    #[test]
    fn test_short_bouncer_rejected() {
        let mut state = test_state();
        assert!(state.add_bouncer(Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0)).is_none());
        assert!(state.bouncers.is_empty());
    }

    #[test]
    fn test_zero_length_bouncer_rejected_without_panic() {
        let mut state = test_state();
        assert!(state.add_bouncer(Vec2::ZERO, Vec2::ZERO).is_none());
        assert!(state.bouncers.is_empty());
    }

    #[test]
    fn test_bouncer_at_threshold_accepted() {
        let mut state = test_state();
        let id = state.add_bouncer(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert!(id.is_some());
        assert_eq!(state.bouncers.len(), 1);
    }

    #[test]
    fn test_remove_ball_is_idempotent() {
        let mut state = test_state();
        let before = state.balls.len();
        let id = state.spawn_ball(Vec2::new(10.0, 10.0), Vec2::ZERO, 8.0);
        state.remove_ball(id);
        assert_eq!(state.balls.len(), before);
        // Second removal of the same ID is a no-op
        state.remove_ball(id);
        assert_eq!(state.balls.len(), before);
    }

    #[test]
    fn test_entity_ids_unique_and_monotonic() {
        let mut state = test_state();
        let a = state.spawn_ball(Vec2::ZERO, Vec2::ZERO, 8.0);
        let b = state.spawn_ball(Vec2::ZERO, Vec2::ZERO, 8.0);
        state.remove_ball(a);
        let c = state.spawn_ball(Vec2::ZERO, Vec2::ZERO, 8.0);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_set_gravity_normalizes() {
        let mut state = test_state();
        state.set_gravity(Vec2::new(3.0, 4.0));
        assert!((state.gravity_dir.length() - 1.0).abs() < 1e-6);
        assert!((state.gravity_dir - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_set_gravity_ignores_zero_and_nan() {
        let mut state = test_state();
        let before = state.gravity_dir;
        state.set_gravity(Vec2::ZERO);
        assert_eq!(state.gravity_dir, before);
        state.set_gravity(Vec2::new(f32::NAN, 0.0));
        assert_eq!(state.gravity_dir, before);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = test_state();
        let default_emitter_ids: Vec<u32> = state.emitters.iter().map(|e| e.id).collect();

        state.start();
        state.spawn_ball(Vec2::new(50.0, 50.0), Vec2::ZERO, 8.0);
        state.add_bouncer(Vec2::new(0.0, 100.0), Vec2::new(200.0, 100.0));
        state.reset();

        assert!(state.balls.is_empty());
        assert!(state.bouncers.is_empty());
        assert_eq!(state.phase, RunPhase::Idle);
        let ids: Vec<u32> = state.emitters.iter().map(|e| e.id).collect();
        assert_eq!(ids, default_emitter_ids);
    }

    #[test]
    fn test_start_pause_transitions() {
        let mut state = test_state();
        assert_eq!(state.phase, RunPhase::Idle);
        state.pause(); // Paused is only reachable from Running
        assert_eq!(state.phase, RunPhase::Idle);
        state.start();
        assert_eq!(state.phase, RunPhase::Running);
        state.pause();
        assert_eq!(state.phase, RunPhase::Paused);
        state.start();
        assert_eq!(state.phase, RunPhase::Running);
    }

    #[test]
    fn test_snapshot_reflects_store() {
        let mut state = test_state();
        state.spawn_ball(Vec2::new(1.0, 2.0), Vec2::ZERO, 8.0);
        let snap = state.snapshot();
        assert_eq!(snap.balls.len(), 1);
        assert_eq!(snap.emitters.len(), 1);
        assert!(serde_json::to_string(&snap).is_ok());
    }
}
