//! Crate-wide error type

use thiserror::Error;

use crate::sim::BodyId;

/// Everything that can go wrong outside the pure collision math
#[derive(Debug, Error)]
pub enum SimError {
    /// Body radius must be finite and strictly positive
    #[error("invalid body radius {0}: must be finite and positive")]
    InvalidRadius(f32),

    /// Body center must be finite
    #[error("invalid body position ({x}, {y}): must be finite")]
    InvalidPosition { x: f32, y: f32 },

    /// No body with this id lives in the arena
    #[error("unknown body id {0}")]
    UnknownBody(BodyId),

    /// Arena side length must be finite and strictly positive
    #[error("invalid arena size {0}: must be finite and positive")]
    InvalidArenaSize(f32),

    /// Two bodies in a snapshot share an id
    #[error("duplicate body id {0}")]
    DuplicateBody(BodyId),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
