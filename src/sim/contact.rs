//! Contact detection
//!
//! Pure queries over the body set. Contacts are recomputed from scratch every
//! tick using pre-integration positions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId};

/// One edge of the square arena (screen orientation, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Top,
    Right,
    Bottom,
}

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::Left, Wall::Top, Wall::Right, Wall::Bottom];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Wall::Left => 1,
            Wall::Top => 1 << 1,
            Wall::Right => 1 << 2,
            Wall::Bottom => 1 << 3,
        }
    }
}

/// Set of walls a body currently penetrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct WallEdges(u8);

impl WallEdges {
    pub const NONE: WallEdges = WallEdges(0);

    pub fn insert(&mut self, wall: Wall) {
        self.0 |= wall.bit();
    }

    pub fn contains(&self, wall: Wall) -> bool {
        self.0 & wall.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Wall> + '_ {
        Wall::ALL.into_iter().filter(|w| self.contains(*w))
    }
}

impl FromIterator<Wall> for WallEdges {
    fn from_iter<I: IntoIterator<Item = Wall>>(iter: I) -> Self {
        let mut edges = WallEdges::NONE;
        for wall in iter {
            edges.insert(wall);
        }
        edges
    }
}

/// Canonical unordered pair of distinct body ids (`low < high`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    low: BodyId,
    high: BodyId,
}

impl PairKey {
    /// Returns `None` when both ids are the same body
    pub fn new(a: BodyId, b: BodyId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[inline]
    pub fn low(&self) -> BodyId {
        self.low
    }

    #[inline]
    pub fn high(&self) -> BodyId {
        self.high
    }
}

/// A body touching one or more walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallContact {
    pub body: BodyId,
    pub edges: WallEdges,
}

/// Any contact detected during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    Wall(WallContact),
    Pair(PairKey),
}

/// Walls penetrated by a single body in an arena of side `size`
pub fn wall_edges(body: &Body, size: f32) -> WallEdges {
    let r = body.radius();
    let mut edges = WallEdges::NONE;
    if body.pos.x <= r {
        edges.insert(Wall::Left);
    }
    if body.pos.y <= r {
        edges.insert(Wall::Top);
    }
    if body.pos.x >= size - r {
        edges.insert(Wall::Right);
    }
    if body.pos.y >= size - r {
        edges.insert(Wall::Bottom);
    }
    edges
}

/// Every body touching at least one wall
pub fn wall_contacts(bodies: &[Body], size: f32) -> Vec<WallContact> {
    bodies
        .iter()
        .filter_map(|body| {
            let edges = wall_edges(body, size);
            (!edges.is_empty()).then_some(WallContact {
                body: body.id(),
                edges,
            })
        })
        .collect()
}

/// Whether two bodies overlap or touch
///
/// Bodies sharing the exact same center are not considered in contact: the
/// line of centers is undefined for them.
pub fn touching(a: &Body, b: &Body) -> bool {
    if a.pos == b.pos {
        return false;
    }
    a.pos.distance(b.pos) <= a.radius() + b.radius()
}

/// Every unordered pair of bodies in contact, each pair exactly once
pub fn pair_contacts(bodies: &[Body]) -> BTreeSet<PairKey> {
    let mut pairs = BTreeSet::new();
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if !touching(a, b) {
                continue;
            }
            if let Some(key) = PairKey::new(a.id(), b.id()) {
                pairs.insert(key);
            }
        }
    }
    pairs
}

/// All contacts for this tick: wall contacts first, then body pairs
pub fn detect(bodies: &[Body], size: f32) -> Vec<Contact> {
    let mut contacts: Vec<Contact> = wall_contacts(bodies, size)
        .into_iter()
        .map(Contact::Wall)
        .collect();
    contacts.extend(pair_contacts(bodies).into_iter().map(Contact::Pair));
    contacts
}
