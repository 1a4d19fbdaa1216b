//! Collision detection and response
//!
//! Balls are circles; everything they hit is a line: user-drawn bouncer
//! segments (closest point via clamped projection) and the four
//! axis-aligned field edges (inward normals).

use glam::Vec2;

use super::state::{Bouncer, FieldSize};
use crate::{closest_point_on_segment, perp};

/// One of the four field-boundary edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Inward-pointing unit normal
    #[inline]
    pub fn inward_normal(self) -> Vec2 {
        match self {
            Edge::Left => Vec2::new(1.0, 0.0),
            Edge::Right => Vec2::new(-1.0, 0.0),
            Edge::Top => Vec2::new(0.0, 1.0),
            Edge::Bottom => Vec2::new(0.0, -1.0),
        }
    }
}

/// Identifies the surface a contact was made with, for per-tick event dedup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    Bouncer(u32),
    Edge(Edge),
}

/// A detected overlap between a ball and a surface
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub surface: SurfaceId,
    /// Point of contact on the surface
    pub point: Vec2,
    /// Unit normal pointing toward the ball center
    pub normal: Vec2,
    /// How far the ball overlaps the surface
    pub penetration: f32,
}

/// Check a ball against one bouncer segment
pub fn ball_bouncer_contact(pos: Vec2, radius: f32, bouncer: &Bouncer) -> Option<Contact> {
    let closest = closest_point_on_segment(pos, bouncer.p1, bouncer.p2);
    let offset = pos - closest;
    let dist = offset.length();
    if dist > radius {
        return None;
    }

    let normal = if dist > 1e-4 {
        offset / dist
    } else {
        // Ball center sits on the segment; fall back to the segment normal
        let dir = (bouncer.p2 - bouncer.p1).normalize_or_zero();
        if dir == Vec2::ZERO {
            // Degenerate segment, skip rather than divide by zero
            return None;
        }
        perp(dir)
    };

    Some(Contact {
        surface: SurfaceId::Bouncer(bouncer.id),
        point: closest,
        normal,
        penetration: radius - dist,
    })
}

/// Gather every surface the ball currently overlaps.
///
/// Edge contacts are skipped once the ball is fully past an edge (penetration
/// beyond the ball diameter); the tick's out-of-bounds cleanup owns that case.
pub fn collect_contacts(
    pos: Vec2,
    radius: f32,
    bouncers: &[Bouncer],
    field: FieldSize,
    out: &mut Vec<Contact>,
) {
    for bouncer in bouncers {
        if let Some(contact) = ball_bouncer_contact(pos, radius, bouncer) {
            out.push(contact);
        }
    }

    let edges = [
        (Edge::Left, radius - pos.x, Vec2::new(0.0, pos.y)),
        (Edge::Right, pos.x + radius - field.width, Vec2::new(field.width, pos.y)),
        (Edge::Top, radius - pos.y, Vec2::new(pos.x, 0.0)),
        (Edge::Bottom, pos.y + radius - field.height, Vec2::new(pos.x, field.height)),
    ];
    for (edge, penetration, point) in edges {
        if penetration >= 0.0 && penetration <= radius * 2.0 {
            out.push(Contact {
                surface: SurfaceId::Edge(edge),
                point,
                normal: edge.inward_normal(),
                penetration,
            });
        }
    }
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
