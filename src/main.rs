//! Boing entry point
//!
//! Headless demo: builds a small scene, runs the simulation for ten
//! simulated seconds, logs the tone each bounce would play, then prints a
//! JSON snapshot of the final state.

use glam::Vec2;

use boing::chime::ChimeMap;
use boing::sim::{CollisionEvent, FieldSize};
use boing::{Engine, SimConfig};

fn main() {
    env_logger::init();

    let field = match FieldSize::new(400.0, 400.0) {
        Ok(field) => field,
        Err(e) => {
            log::error!("bad field size: {e}");
            return;
        }
    };
    let mut engine = match Engine::new(field, SimConfig::default(), 0xB01) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("bad configuration: {e}");
            return;
        }
    };

    // A shallow V of bouncers under the emitter
    engine.on_drag_release(Vec2::new(40.0, 260.0), Vec2::new(190.0, 320.0));
    engine.on_drag_release(Vec2::new(210.0, 320.0), Vec2::new(360.0, 260.0));
    engine.on_gravity_angle(std::f32::consts::FRAC_PI_2);
    engine.on_play();

    let chimes = ChimeMap::new(field.width);
    let mut sink = |event: &CollisionEvent| {
        let tone = chimes.tone_for(event);
        log::info!(
            "ball {} bounced at ({:.0},{:.0}) -> {:.0} Hz, gain {:.2}",
            event.ball_id,
            event.point.x,
            event.point.y,
            tone.frequency,
            tone.gain
        );
    };

    // Ten simulated seconds at 60 fps
    for _ in 0..600 {
        engine.update(1.0 / 60.0, &mut sink);
    }

    match serde_json::to_string_pretty(&engine.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("snapshot serialization failed: {e}"),
    }
}
