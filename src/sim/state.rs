//! Arena state
//!
//! The arena exclusively owns its bodies and contact memory. Input and
//! rendering collaborators reach bodies by id between ticks.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId};
use super::memory::ContactMemory;
use crate::config::SimConfig;
use crate::error::{Result, SimError};

/// Square arena of bodies
///
/// Deserialization goes through `ArenaRecord` so loaded snapshots keep ids
/// unique and id allocation ahead of every stored body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ArenaRecord")]
pub struct Arena {
    /// Side length of the square boundary
    size: f32,
    /// Live bodies, in insertion order
    bodies: Vec<Body>,
    /// Per-pair contact cooldown (transient, rebuilt from contact)
    #[serde(skip)]
    pub(crate) memory: ContactMemory,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next body ID
    next_id: BodyId,
}

/// Serialized form of an arena; `next_id` and contact memory are rebuilt
#[derive(Deserialize)]
struct ArenaRecord {
    size: f32,
    #[serde(default)]
    bodies: Vec<Body>,
    #[serde(default)]
    time_ticks: u64,
}

impl TryFrom<ArenaRecord> for Arena {
    type Error = SimError;

    fn try_from(record: ArenaRecord) -> Result<Self> {
        let mut arena = Arena::new(record.size)?;
        let mut seen = HashSet::with_capacity(record.bodies.len());
        for body in &record.bodies {
            if !seen.insert(body.id()) {
                return Err(SimError::DuplicateBody(body.id()));
            }
        }
        arena.next_id = match record.bodies.iter().map(Body::id).max() {
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| SimError::InvalidConfig("body id space exhausted".into()))?,
            None => 0,
        };
        arena.bodies = record.bodies;
        arena.time_ticks = record.time_ticks;
        Ok(arena)
    }
}

impl Arena {
    /// Create an empty arena with the default contact cooldown
    pub fn new(size: f32) -> Result<Self> {
        Self::with_memory(size, ContactMemory::default())
    }

    /// Create an empty arena from a validated configuration
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        Self::with_memory(
            config.arena_size,
            ContactMemory::new(config.contact_cooldown_ticks),
        )
    }

    /// Restore an arena snapshot, using the configured contact cooldown
    pub fn from_snapshot(json: &str, config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let mut arena: Arena = serde_json::from_str(json)?;
        arena.memory = ContactMemory::new(config.contact_cooldown_ticks);
        log::info!(
            "Restored {} bodies at tick {}",
            arena.len(),
            arena.time_ticks
        );
        Ok(arena)
    }

    fn with_memory(size: f32, memory: ContactMemory) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(SimError::InvalidArenaSize(size));
        }
        log::info!(
            "Arena created: size={}, contact cooldown={} ticks",
            size,
            memory.cooldown_ticks()
        );
        Ok(Self {
            size,
            bodies: Vec::new(),
            memory,
            time_ticks: 0,
            next_id: 0,
        })
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Spawn a resting body and return its id
    pub fn add_body(&mut self, pos: Vec2, radius: f32) -> Result<BodyId> {
        let body = Body::new(self.next_id, pos, radius)?;
        let id = body.id();
        self.next_id += 1;
        log::info!(
            "Spawned body {} at ({:.1}, {:.1}) radius {:.1}",
            id,
            pos.x,
            pos.y,
            radius
        );
        self.bodies.push(body);
        Ok(id)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    /// Visit every body, e.g. for drawing
    pub fn for_each_body<F: FnMut(&Body)>(&self, f: F) {
        self.bodies.iter().for_each(f);
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id() == id)
    }

    pub(crate) fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id() == id)
    }

    /// Replace a body's velocity
    pub fn set_velocity(&mut self, id: BodyId, vel: Vec2) -> Result<()> {
        let body = self.body_mut(id).ok_or(SimError::UnknownBody(id))?;
        body.set_velocity(vel);
        Ok(())
    }

    /// Topmost body under a point (last spawned wins)
    pub fn body_at(&self, point: Vec2) -> Option<BodyId> {
        self.bodies
            .iter()
            .rev()
            .find(|b| b.contains_point(point))
            .map(Body::id)
    }

    pub fn contact_memory(&self) -> &ContactMemory {
        &self.memory
    }

    /// Sum of all body momenta
    pub fn total_momentum(&self) -> Vec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    /// Sum of all body kinetic energies
    pub fn total_energy(&self) -> f32 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut arena = Arena::new(1000.0).unwrap();
        let a = arena.add_body(Vec2::new(100.0, 100.0), 10.0).unwrap();
        let b = arena.add_body(Vec2::new(200.0, 100.0), 10.0).unwrap();
        let c = arena.add_body(Vec2::new(300.0, 100.0), 10.0).unwrap();
        assert!(a < b && b < c);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_rejected_body_does_not_consume_id() {
        let mut arena = Arena::new(1000.0).unwrap();
        assert!(arena.add_body(Vec2::new(100.0, 100.0), 0.0).is_err());
        assert!(arena.is_empty());
        assert_eq!(arena.add_body(Vec2::new(100.0, 100.0), 5.0).unwrap(), 0);
    }

    #[test]
    fn test_set_velocity_unknown_body() {
        let mut arena = Arena::new(1000.0).unwrap();
        assert!(matches!(
            arena.set_velocity(42, Vec2::ONE),
            Err(SimError::UnknownBody(42))
        ));
    }

    #[test]
    fn test_body_at_prefers_latest() {
        let mut arena = Arena::new(1000.0).unwrap();
        let _low = arena.add_body(Vec2::new(100.0, 100.0), 30.0).unwrap();
        let high = arena.add_body(Vec2::new(110.0, 100.0), 30.0).unwrap();
        assert_eq!(arena.body_at(Vec2::new(105.0, 100.0)), Some(high));
        assert_eq!(arena.body_at(Vec2::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_for_each_body_visits_all() {
        let mut arena = Arena::new(1000.0).unwrap();
        arena.add_body(Vec2::new(100.0, 100.0), 10.0).unwrap();
        arena.add_body(Vec2::new(200.0, 200.0), 20.0).unwrap();
        let mut total_radius = 0.0;
        arena.for_each_body(|b| total_radius += b.radius());
        assert_eq!(total_radius, 30.0);
    }

    #[test]
    fn test_from_config_uses_size_and_cooldown() {
        let config = SimConfig {
            arena_size: 640.0,
            contact_cooldown_ticks: 4,
            ..Default::default()
        };
        let arena = Arena::from_config(&config).unwrap();
        assert_eq!(arena.size(), 640.0);
        assert_eq!(arena.contact_memory().cooldown_ticks(), 4);
    }

    #[test]
    fn test_rejects_bad_arena_size() {
        for size in [0.0, -10.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(Arena::new(size), Err(SimError::InvalidArenaSize(_))));
        }
        let config = SimConfig {
            arena_size: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Arena::from_config(&config),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_snapshot_continues_id_allocation() {
        let json = r#"{"size":800.0,"bodies":[
            {"id":0,"pos":[100.0,100.0],"radius":10.0},
            {"id":4,"pos":[300.0,100.0],"vel":[1.0,0.0],"radius":5.0}
        ],"time_ticks":12,"next_id":0}"#;
        let mut arena = Arena::from_snapshot(json, &SimConfig::default()).unwrap();
        assert_eq!(arena.size(), 800.0);
        assert_eq!(arena.time_ticks, 12);
        assert_eq!(arena.body(4).unwrap().mass(), 25.0);
        assert_eq!(arena.add_body(Vec2::new(500.0, 500.0), 10.0).unwrap(), 5);
    }

    #[test]
    fn test_snapshot_rejects_duplicate_ids() {
        let json = r#"{"size":800.0,"bodies":[
            {"id":2,"pos":[100.0,100.0],"radius":10.0},
            {"id":2,"pos":[300.0,100.0],"radius":10.0}
        ]}"#;
        assert!(matches!(
            serde_json::from_str::<Arena>(json),
            Err(e) if e.to_string().contains("duplicate body id 2")
        ));
    }

    #[test]
    fn test_snapshot_round_trip_keeps_bodies() {
        let mut arena = Arena::new(1000.0).unwrap();
        arena.add_body(Vec2::new(100.0, 100.0), 10.0).unwrap();
        arena.add_body(Vec2::new(200.0, 200.0), 20.0).unwrap();
        let json = serde_json::to_string(&arena).unwrap();
        let restored = Arena::from_snapshot(&json, &SimConfig::default()).unwrap();
        assert_eq!(restored.bodies(), arena.bodies());
    }
}
