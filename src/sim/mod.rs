//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only (velocities are per tick)
//! - Seeded RNG only
//! - Stable iteration order (insertion order for bodies, canonical order for pairs)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod contact;
pub mod memory;
pub mod scenario;
pub mod state;
pub mod tick;

pub use body::{Body, BodyId};
pub use collision::{elastic_1d, elastic_velocities, reflect_off_walls, resolve_pair};
pub use contact::{
    Contact, PairKey, Wall, WallContact, WallEdges, detect, pair_contacts, touching, wall_contacts,
    wall_edges,
};
pub use memory::ContactMemory;
pub use scenario::{ScatterParams, cradle, head_on, scatter};
pub use state::Arena;
pub use tick::{TickReport, tick};
