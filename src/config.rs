//! Simulation tuning
//!
//! Persisted separately from the (transient) arena in LocalStorage on the
//! web, or read from a JSON file natively.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of the square arena
    pub arena_size: f32,
    /// Scheduler tick rate (ticks per second)
    pub tick_hz: f32,
    /// Consecutive contact ticks before a pair is treated as settled
    pub contact_cooldown_ticks: u32,
    /// Slingshot strength
    pub velocity_coeff: f32,
    /// Launch speed cap
    pub max_launch_speed: f32,
    /// Catch-up limit per scheduler update
    pub max_ticks_per_update: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena_size: ARENA_SIZE,
            tick_hz: TICK_HZ,
            contact_cooldown_ticks: CONTACT_COOLDOWN_TICKS,
            velocity_coeff: VELOCITY_COEFF,
            max_launch_speed: MAX_LAUNCH_SPEED,
            max_ticks_per_update: MAX_TICKS_PER_UPDATE,
        }
    }
}

impl SimConfig {
    /// Seconds per tick
    pub fn tick_interval(&self) -> f32 {
        1.0 / self.tick_hz
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!(
                    "{name} must be finite and positive, got {v}"
                )))
            }
        };
        positive("arena_size", self.arena_size)?;
        positive("tick_hz", self.tick_hz)?;
        positive("velocity_coeff", self.velocity_coeff)?;
        positive("max_launch_speed", self.max_launch_speed)?;
        if self.contact_cooldown_ticks == 0 {
            return Err(SimError::InvalidConfig(
                "contact_cooldown_ticks must be at least 1".into(),
            ));
        }
        if self.max_ticks_per_update == 0 {
            return Err(SimError::InvalidConfig(
                "max_ticks_per_update must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load config from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "elastic_arena_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// No browser storage natively: defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
