//! Seeded body layouts
//!
//! Used by the headless demo and by tests that need a busy arena. Layouts
//! are deterministic for a given seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::BodyId;
use super::state::Arena;
use crate::error::Result;

/// Placement attempts per body before giving up on a free spot
const MAX_PLACEMENT_ATTEMPTS: u32 = 64;

/// Parameters for a random scatter of bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterParams {
    pub count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Maximum initial speed (arena units per tick)
    pub max_speed: f32,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            count: 12,
            min_radius: 10.0,
            max_radius: 40.0,
            max_speed: 8.0,
        }
    }
}

/// Scatter non-overlapping bodies with random velocities
///
/// Bodies that cannot find a free spot after a bounded number of attempts
/// are skipped, so the arena may end up with fewer than `count` bodies.
pub fn scatter(arena: &mut Arena, params: &ScatterParams, seed: u64) -> Result<Vec<BodyId>> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let size = arena.size();
    let mut spawned = Vec::with_capacity(params.count);

    for _ in 0..params.count {
        let radius = if params.max_radius > params.min_radius {
            rng.random_range(params.min_radius..params.max_radius)
        } else {
            params.min_radius
        };
        if 2.0 * radius >= size {
            continue;
        }

        let spot = (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
            let pos = Vec2::new(
                rng.random_range(radius..size - radius),
                rng.random_range(radius..size - radius),
            );
            let free = arena
                .bodies()
                .iter()
                .all(|b| b.pos.distance(pos) > b.radius() + radius);
            free.then_some(pos)
        });
        let Some(pos) = spot else {
            log::warn!("No free spot for body of radius {:.1}, skipping", radius);
            continue;
        };

        let id = arena.add_body(pos, radius)?;
        let theta = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(0.0..=params.max_speed);
        arena.set_velocity(id, Vec2::from_angle(theta) * speed)?;
        spawned.push(id);
    }

    log::info!("Scattered {} bodies (seed {})", spawned.len(), seed);
    Ok(spawned)
}

/// Two equal bodies approaching each other along a horizontal line
pub fn head_on(arena: &mut Arena, radius: f32, speed: f32) -> Result<(BodyId, BodyId)> {
    let center = arena.size() / 2.0;
    let a = arena.add_body(Vec2::new(center - 4.0 * radius, center), radius)?;
    let b = arena.add_body(Vec2::new(center + 4.0 * radius, center), radius)?;
    arena.set_velocity(a, Vec2::new(speed, 0.0))?;
    arena.set_velocity(b, Vec2::new(-speed, 0.0))?;
    Ok((a, b))
}

/// A row of touching resting bodies struck by one moving body from the left
pub fn cradle(arena: &mut Arena, count: usize, radius: f32, speed: f32) -> Result<Vec<BodyId>> {
    let center = arena.size() / 2.0;
    let row_start = center - count as f32 * radius;
    let mut ids = Vec::with_capacity(count + 1);

    for i in 0..count {
        let x = row_start + radius + 2.0 * radius * i as f32;
        ids.push(arena.add_body(Vec2::new(x, center), radius)?);
    }

    let striker = arena.add_body(Vec2::new(row_start - 3.0 * radius, center), radius)?;
    arena.set_velocity(striker, Vec2::new(speed, 0.0))?;
    ids.push(striker);
    Ok(ids)
}
