//! Host-facing engine facade
//!
//! Thin adapter layer between host inputs (drag gestures, gravity control,
//! transport buttons, frame callbacks) and the simulation. All mutation and
//! ticking must come through one `Engine` on one thread; hosts needing more
//! wrap it in their own lock.

use glam::Vec2;

use crate::config::{ConfigError, SimConfig};
use crate::consts::{MAX_SUBSTEPS, MIN_BOUNCER_LENGTH, SIM_DT};
use crate::sim::{CollisionSink, FieldSize, SimState, Snapshot, tick};

pub struct Engine {
    state: SimState,
    accumulator: f32,
}

impl Engine {
    pub fn new(field: FieldSize, config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            state: SimState::new(field, config, seed)?,
            accumulator: 0.0,
        })
    }

    /// Drag-gesture adapter: a released drag becomes a bouncer if it is long
    /// enough. Coordinates are already in field space; pixel conversion is
    /// the host's job.
    pub fn on_drag_release(&mut self, start: Vec2, end: Vec2) -> Option<u32> {
        // Threshold also enforced by the store; checked here so a bare click
        // never reaches it
        if (end - start).length() < MIN_BOUNCER_LENGTH {
            return None;
        }
        self.state.add_bouncer(start, end)
    }

    /// Gravity-control adapter, vector form
    pub fn on_gravity_changed(&mut self, dir: Vec2) {
        self.state.set_gravity(dir);
    }

    /// Gravity-control adapter, slider form: angle in radians, 0 points +x,
    /// π/2 points straight down (+y)
    pub fn on_gravity_angle(&mut self, radians: f32) {
        if !radians.is_finite() {
            log::warn!("ignoring non-finite gravity angle");
            return;
        }
        self.state.set_gravity(Vec2::new(radians.cos(), radians.sin()));
    }

    pub fn on_play(&mut self) {
        self.state.start();
    }

    pub fn on_pause(&mut self) {
        self.state.pause();
    }

    pub fn on_reset(&mut self) {
        self.state.reset();
        self.accumulator = 0.0;
    }

    /// Host viewport resize
    pub fn set_field_size(&mut self, field: FieldSize) {
        self.state.set_field(field);
    }

    /// Advance by wall-clock elapsed seconds, running fixed substeps.
    /// Elapsed time is clamped so a background tab doesn't cause a huge
    /// catch-up burst of substeps.
    pub fn update(&mut self, elapsed: f32, sink: &mut dyn CollisionSink) {
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return;
        }
        self.accumulator += elapsed.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, SIM_DT, sink);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// Drive a single step with an explicit dt (test harnesses, offline use)
    pub fn step(&mut self, dt: f32, sink: &mut dyn CollisionSink) {
        tick(&mut self.state, dt, sink);
    }

    /// Read-only view for rendering; called once per frame
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{NullSink, RunPhase};

    fn engine() -> Engine {
        let field = FieldSize::new(400.0, 400.0).unwrap();
        Engine::new(field, SimConfig::default(), 1).unwrap()
    }

    #[test]
    fn test_short_drag_makes_no_bouncer() {
        let mut engine = engine();
        assert!(engine
            .on_drag_release(Vec2::new(10.0, 10.0), Vec2::new(15.0, 12.0))
            .is_none());
        assert!(engine.snapshot().bouncers.is_empty());
    }

    #[test]
    fn test_drag_release_creates_bouncer() {
        let mut engine = engine();
        let id = engine.on_drag_release(Vec2::new(10.0, 200.0), Vec2::new(300.0, 250.0));
        assert!(id.is_some());
        assert_eq!(engine.snapshot().bouncers.len(), 1);
    }

    #[test]
    fn test_gravity_angle_straight_down() {
        let mut engine = engine();
        engine.on_gravity_angle(std::f32::consts::FRAC_PI_2);
        let dir = engine.state().gravity_dir;
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_transport_controls() {
        let mut engine = engine();
        assert_eq!(engine.state().phase, RunPhase::Idle);
        engine.on_play();
        assert_eq!(engine.state().phase, RunPhase::Running);
        engine.on_pause();
        assert_eq!(engine.state().phase, RunPhase::Paused);
        engine.on_reset();
        assert_eq!(engine.state().phase, RunPhase::Idle);
    }

    #[test]
    fn test_update_runs_fixed_substeps() {
        let mut engine = engine();
        engine.on_play();
        engine.update(SIM_DT * 3.5, &mut NullSink);
        assert_eq!(engine.state().time_ticks, 3);
        // The half step stays banked in the accumulator
        engine.update(SIM_DT * 0.5, &mut NullSink);
        assert_eq!(engine.state().time_ticks, 4);
    }

    #[test]
    fn test_update_caps_substeps() {
        let mut engine = engine();
        engine.on_play();
        engine.update(10.0, &mut NullSink);
        assert!(engine.state().time_ticks <= MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_update_ignores_bad_elapsed() {
        let mut engine = engine();
        engine.on_play();
        engine.update(f32::NAN, &mut NullSink);
        engine.update(-1.0, &mut NullSink);
        assert_eq!(engine.state().time_ticks, 0);
    }
}
