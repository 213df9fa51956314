//! Fixed-step simulation tick
//!
//! One tick: reflect wall contacts, resolve body pairs the contact memory
//! allows, then integrate every body. Detection always sees pre-integration
//! positions, so a fast body may overshoot a wall by one tick of velocity.

use serde::Serialize;

use super::collision::{reflect_off_walls, resolve_pair};
use super::contact::{pair_contacts, wall_contacts};
use super::state::Arena;

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Bodies touching at least one wall
    pub wall_contacts: usize,
    /// Body pairs in contact
    pub pair_contacts: usize,
    /// Pairs that received an impulse
    pub resolved_pairs: usize,
}

impl TickReport {
    /// Pairs in contact whose impulse was suppressed by the cooldown
    pub fn settled_pairs(&self) -> usize {
        self.pair_contacts - self.resolved_pairs
    }
}

/// Advance the arena by one tick
pub fn tick(arena: &mut Arena) -> TickReport {
    let size = arena.size();

    let walls = wall_contacts(arena.bodies(), size);
    for contact in &walls {
        if let Some(body) = arena.body_mut(contact.body) {
            body.vel = reflect_off_walls(body.vel, contact.edges);
        }
    }

    let pairs = pair_contacts(arena.bodies());
    let to_resolve = arena.memory.observe(&pairs);
    let mut resolved = 0;
    for key in &to_resolve {
        let (Some(i), Some(j)) = (arena.index_of(key.low()), arena.index_of(key.high())) else {
            continue;
        };
        if let Some((a, b)) = pair_mut(arena.bodies_mut(), i, j) {
            resolve_pair(a, b);
            resolved += 1;
        }
    }

    for body in arena.bodies_mut() {
        body.integrate();
    }
    arena.time_ticks += 1;

    TickReport {
        wall_contacts: walls.len(),
        pair_contacts: pairs.len(),
        resolved_pairs: resolved,
    }
}

/// Two distinct mutable elements of a slice
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> Option<(&mut T, &mut T)> {
    if i == j || i.max(j) >= items.len() {
        return None;
    }
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        Some((&mut head[i], &mut tail[0]))
    } else {
        let (head, tail) = items.split_at_mut(i);
        Some((&mut tail[0], &mut head[j]))
    }
}

impl Arena {
    /// Advance the simulation by one tick
    pub fn advance(&mut self) -> TickReport {
        tick(self)
    }
}
