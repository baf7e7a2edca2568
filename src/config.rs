//! # JSON Configuration
//!
//! Describes which built-in parts a simulation host should create and how
//! they should log.
//!
//! ```json
//! {
//!   "name": "demux-bench",
//!   "log_filter": "rusty_gates=debug",
//!   "parts": [
//!     { "chip": "DMux8Way", "name": "router", "has_display": true },
//!     { "chip": "Not16" }
//!   ]
//! }
//! ```
//!
//! `log_filter` defaults to `info`, `has_display` to `false` and a part's
//! `name` to its chip name.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chips::ChipRegistry;
use crate::error::SimError;
use crate::gate_part::GatePart;
use crate::logging::DEFAULT_LOG_FILTER;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub parts: Vec<PartConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartConfig {
    pub chip: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub has_display: bool,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            name: String::new(),
            log_filter: default_log_filter(),
            parts: Vec::new(),
        }
    }
}

/// A built part together with the name the configuration gave it.
#[derive(Debug)]
pub struct NamedPart {
    pub name: String,
    pub part: GatePart,
}

impl SimulatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json)
            .map_err(|e| SimError::Config(format!("Failed to parse JSON config: {}", e)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Creates one part per entry, in declaration order.
    pub fn build_parts(&self, registry: &ChipRegistry) -> Result<Vec<NamedPart>, SimError> {
        let parts = self
            .parts
            .iter()
            .map(|config| -> Result<NamedPart, SimError> {
                let gate = registry.create_gate(&config.chip)?;
                let name = config.name.clone().unwrap_or_else(|| config.chip.clone());
                Ok(NamedPart {
                    name,
                    part: GatePart::new(Box::new(gate), config.has_display),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(config = %self.name, parts = parts.len(), "built parts from config");
        Ok(parts)
    }
}
