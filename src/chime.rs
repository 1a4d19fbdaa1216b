//! Collision-to-tone mapping
//!
//! Every bounce becomes a `Tone`: pitch from where the impact happened,
//! loudness from how hard it was. The mapping is pure; the host audio
//! backend (Web Audio oscillator, synth, whatever) does the playing.

use serde::Serialize;

use crate::sim::CollisionEvent;

/// A single tone request for the host audio backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    /// Pitch in Hz
    pub frequency: f32,
    /// Linear gain, 0..=1
    pub gain: f32,
    /// Envelope length in seconds
    pub duration: f32,
}

/// C major pentatonic across two octaves (C4..C6). Pentatonic so that any
/// pile-up of simultaneous bounces still sounds consonant.
const SCALE_HZ: [f32; 11] = [
    261.63, 293.66, 329.63, 392.00, 440.00, 523.25, 587.33, 659.25, 783.99, 880.00, 1046.50,
];

/// Impact speed that maps to full gain (units/s)
const FULL_GAIN_SPEED: f32 = 900.0;

/// Maps collision events onto the scale across the field width
#[derive(Debug, Clone, Copy)]
pub struct ChimeMap {
    field_width: f32,
}

impl ChimeMap {
    pub fn new(field_width: f32) -> Self {
        Self {
            field_width: field_width.max(1.0),
        }
    }

    /// Deterministic: the same event always yields the same tone
    pub fn tone_for(&self, event: &CollisionEvent) -> Tone {
        let t = (event.point.x / self.field_width).clamp(0.0, 1.0);
        let idx = (t * (SCALE_HZ.len() - 1) as f32).round() as usize;
        let gain = (event.impact_speed / FULL_GAIN_SPEED).clamp(0.05, 1.0);
        Tone {
            frequency: SCALE_HZ[idx.min(SCALE_HZ.len() - 1)],
            gain,
            duration: 0.18,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn event(x: f32, speed: f32) -> CollisionEvent {
        CollisionEvent {
            ball_id: 1,
            point: Vec2::new(x, 350.0),
            normal: Vec2::new(0.0, -1.0),
            impact_speed: speed,
        }
    }

    #[test]
    fn test_same_event_same_tone() {
        let chimes = ChimeMap::new(400.0);
        assert_eq!(chimes.tone_for(&event(123.0, 250.0)), chimes.tone_for(&event(123.0, 250.0)));
    }

    #[test]
    fn test_left_edge_is_lowest_note() {
        let chimes = ChimeMap::new(400.0);
        assert_eq!(chimes.tone_for(&event(0.0, 100.0)).frequency, SCALE_HZ[0]);
    }

    #[test]
    fn test_right_edge_is_highest_note() {
        let chimes = ChimeMap::new(400.0);
        assert_eq!(chimes.tone_for(&event(400.0, 100.0)).frequency, SCALE_HZ[SCALE_HZ.len() - 1]);
    }

    #[test]
    fn test_notes_are_on_the_scale() {
        let chimes = ChimeMap::new(400.0);
        for x in 0..=40 {
            let tone = chimes.tone_for(&event(x as f32 * 10.0, 100.0));
            assert!(SCALE_HZ.contains(&tone.frequency));
        }
    }

    #[test]
    fn test_harder_impact_is_louder() {
        let chimes = ChimeMap::new(400.0);
        let soft = chimes.tone_for(&event(200.0, 100.0));
        let hard = chimes.tone_for(&event(200.0, 600.0));
        assert!(hard.gain > soft.gain);
    }

    #[test]
    fn test_gain_is_clamped() {
        let chimes = ChimeMap::new(400.0);
        assert!(chimes.tone_for(&event(200.0, 1e6)).gain <= 1.0);
        assert!(chimes.tone_for(&event(200.0, 0.0)).gain >= 0.05);
    }

    #[test]
    fn test_out_of_field_impact_clamps_to_scale() {
        let chimes = ChimeMap::new(400.0);
        let tone = chimes.tone_for(&event(-50.0, 100.0));
        assert_eq!(tone.frequency, SCALE_HZ[0]);
    }
}
