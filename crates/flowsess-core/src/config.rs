use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SessionError};

/// Expected number of templates per session.
/// A template id is 16 bits wide, so one full id space fits without rehashing.
pub const DEFAULT_CAPACITY: usize = 65_536;

/// Largest accepted capacity hint: one full template id space.
/// Larger hints would pre-allocate entries no exporter can fill.
pub const MAX_CAPACITY: usize = u16::MAX as usize + 1;

/// Sizing hints for a session's two tables.
///
/// Capacities are pre-allocation hints, not limits: the tables grow on demand.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    pub template_capacity: usize,
    pub record_size_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            template_capacity: DEFAULT_CAPACITY,
            record_size_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Parses a TOML document. Missing keys fall back to the defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        tracing::debug!("SessionConfig: loaded {}", path.display());
        Self::from_toml_str(&raw)
    }

    /// Rejects capacity hints above [`MAX_CAPACITY`]. Zero is accepted: the
    /// tables then start empty and grow on demand.
    pub fn validate(&self) -> Result<()> {
        for (name, capacity) in [
            ("template_capacity", self.template_capacity),
            ("record_size_capacity", self.record_size_capacity),
        ] {
            if capacity > MAX_CAPACITY {
                return Err(SessionError::InvalidConfig(format!(
                    "{name} {capacity} exceeds {MAX_CAPACITY}"
                )));
            }
        }
        Ok(())
    }
}
