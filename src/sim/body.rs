//! A single disk body
//!
//! Bodies are point masses with a spatial extent used only for contact
//! detection. Mass is derived from the radius and never changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Stable body identifier, unique for the lifetime of an arena
pub type BodyId = u32;

/// A disk moving inside the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BodyRecord")]
pub struct Body {
    id: BodyId,
    /// Center position (arena units)
    pub pos: Vec2,
    /// Velocity (arena units per tick)
    pub vel: Vec2,
    radius: f32,
    mass: f32,
}

/// Serialized form of a body; mass is re-derived on load
#[derive(Deserialize)]
struct BodyRecord {
    id: BodyId,
    pos: Vec2,
    #[serde(default)]
    vel: Vec2,
    radius: f32,
}

impl TryFrom<BodyRecord> for Body {
    type Error = SimError;

    fn try_from(record: BodyRecord) -> Result<Self> {
        let mut body = Body::new(record.id, record.pos, record.radius)?;
        body.set_velocity(record.vel);
        Ok(body)
    }
}

impl Body {
    /// Create a body at rest. Fails on a radius whose mass is not a finite,
    /// strictly positive `f32`.
    pub fn new(id: BodyId, pos: Vec2, radius: f32) -> Result<Self> {
        let mass = radius * radius;
        if !radius.is_finite() || radius <= 0.0 || !mass.is_finite() || mass <= 0.0 {
            return Err(SimError::InvalidRadius(radius));
        }
        if !pos.is_finite() {
            return Err(SimError::InvalidPosition { x: pos.x, y: pos.y });
        }
        Ok(Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            mass,
        })
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Mass is radius squared
    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Replace both velocity components at once
    #[inline]
    pub fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    /// Advance position by one tick of velocity (no bounds clamping)
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Whether a point lies strictly inside the disk
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance(point) < self.radius
    }

    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    /// Kinetic energy, 1/2 m |v|^2
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }
}
