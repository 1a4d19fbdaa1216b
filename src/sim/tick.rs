//! Fixed timestep simulation tick
//!
//! Tick order is load-bearing: emission runs before integration so a newborn
//! ball feels gravity in its first tick, and resolution runs after
//! integration so reflections use post-move positions.

use std::cmp::Ordering;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{self, SurfaceId};
use super::state::{RunPhase, SimState};
use crate::consts::MAX_RESOLVE_PASSES;

/// Dispatched to the sink once per ball-surface contact per tick
#[derive(Debug, Clone, Copy)]
pub struct CollisionEvent {
    pub ball_id: u32,
    /// Point of contact on the surface
    pub point: Vec2,
    /// Unit surface normal, pointing toward the ball
    pub normal: Vec2,
    /// Approach speed along the normal at impact (units/s)
    pub impact_speed: f32,
}

/// Receives collision events during a tick. Called synchronously from the
/// tick path; implementations must not block.
pub trait CollisionSink {
    fn on_collision(&mut self, event: &CollisionEvent);
}

impl<F: FnMut(&CollisionEvent)> CollisionSink for F {
    fn on_collision(&mut self, event: &CollisionEvent) {
        self(event)
    }
}

/// Sink that discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl CollisionSink for NullSink {
    fn on_collision(&mut self, _event: &CollisionEvent) {}
}

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut SimState, dt: f32, sink: &mut dyn CollisionSink) {
    if state.phase != RunPhase::Running {
        return;
    }
    state.time_ticks += 1;

    run_emission(state, dt);
    integrate(state, dt);
    resolve_collisions(state, sink);
    cleanup(state);
}

/// Initial velocity for an emitted ball: zero, plus a small horizontal
/// jitter derived from (seed, ball id) so replays are exact.
fn emission_velocity(seed: u64, ball_id: u32, jitter: f32) -> Vec2 {
    if jitter <= 0.0 {
        return Vec2::ZERO;
    }
    let stream = seed ^ (ball_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut rng = Pcg32::seed_from_u64(stream);
    Vec2::new(rng.random_range(-jitter..=jitter), 0.0)
}

fn run_emission(state: &mut SimState, dt: f32) {
    let mut pending: Vec<Vec2> = Vec::new();
    for emitter in &mut state.emitters {
        for _ in 0..emitter.advance(dt) {
            pending.push(emitter.pos);
        }
    }

    let config = state.config;
    let seed = state.seed;
    for pos in pending {
        let vel = emission_velocity(seed, state.peek_next_id(), config.emit_jitter);
        let id = state.spawn_ball(pos, vel, config.ball_radius);
        log::debug!("emitted ball {id} at ({:.0},{:.0})", pos.x, pos.y);
    }
}

fn integrate(state: &mut SimState, dt: f32) {
    let accel = state.gravity_dir * state.config.gravity_accel;
    for ball in &mut state.balls {
        ball.vel += accel * dt;
        ball.pos += ball.vel * dt;
    }
}

fn resolve_collisions(state: &mut SimState, sink: &mut dyn CollisionSink) {
    let field = state.field;
    let restitution = state.config.restitution;

    let mut contacts = Vec::new();
    let mut hit_surfaces: Vec<SurfaceId> = Vec::new();

    for ball in &mut state.balls {
        // Non-finite balls are cleanup's problem, not geometry's
        if !ball.pos.is_finite() || !ball.vel.is_finite() {
            continue;
        }
        hit_surfaces.clear();

        // Smallest penetration first, then re-test with the corrected state.
        // Bounded passes; degenerate corner geometry just keeps its residual.
        for _pass in 0..MAX_RESOLVE_PASSES {
            contacts.clear();
            collision::collect_contacts(ball.pos, ball.radius, &state.bouncers, field, &mut contacts);

            // Only contacts the ball is moving into can be reflected; a
            // separating contact (e.g. a surface resolved last pass, now at
            // zero penetration) must not shadow a deeper one.
            let best = contacts
                .iter()
                .filter(|c| ball.vel.dot(c.normal) < 0.0)
                .min_by(|a, b| {
                    a.penetration
                        .partial_cmp(&b.penetration)
                        .unwrap_or(Ordering::Equal)
                })
                .copied();

            let Some(best) = best else {
                // Nothing left to reflect; push out of any residual overlap
                // (e.g. a ball born on the top edge, moving inward) and stop.
                for contact in &contacts {
                    ball.pos += contact.normal * contact.penetration;
                }
                break;
            };

            // Push out along the normal to avoid sticking next tick
            ball.pos += best.normal * best.penetration;

            let approach = ball.vel.dot(best.normal);
            ball.vel = collision::reflect_velocity(ball.vel, best.normal) * restitution;

            if !hit_surfaces.contains(&best.surface) {
                hit_surfaces.push(best.surface);
                sink.on_collision(&CollisionEvent {
                    ball_id: ball.id,
                    point: best.point,
                    normal: best.normal,
                    impact_speed: -approach,
                });
            }
        }
    }
}

/// Drop balls that tunneled fully out of the field or went non-finite
fn cleanup(state: &mut SimState) {
    let field = state.field;
    state.balls.retain(|ball| {
        if !ball.pos.is_finite() || !ball.vel.is_finite() {
            log::warn!("discarding non-finite ball {}", ball.id);
            return false;
        }
        let gone = ball.pos.x < -ball.radius
            || ball.pos.x > field.width + ball.radius
            || ball.pos.y < -ball.radius
            || ball.pos.y > field.height + ball.radius;
        if gone {
            log::debug!("ball {} left the field", ball.id);
        }
        !gone
    });
}
