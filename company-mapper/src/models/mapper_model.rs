//! Per-mapper configuration supplied by the host.

use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::collections::HashMap;
use std::path::Path;

/// One configured instance of a mapper: its name, the provider it
/// instantiates and a flat string-to-string configuration map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapperModel {
    pub name: String,
    pub protocol_mapper: String,
    pub config: HashMap<String, String>,
}

impl MapperModel {
    /// Create a model with an empty configuration.
    pub fn new(name: impl Into<String>, protocol_mapper: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            protocol_mapper: protocol_mapper.into(),
            config: HashMap::new(),
        }
    }

    /// Create a model with the given configuration map.
    pub fn with_config(
        name: impl Into<String>,
        protocol_mapper: impl Into<String>,
        config: HashMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            protocol_mapper: protocol_mapper.into(),
            config,
        }
    }

    /// Build a model from an optional settings file overlaid by
    /// `<env_prefix>__SECTION__KEY` environment variables.
    pub fn load(
        name: impl Into<String>,
        protocol_mapper: impl Into<String>,
        path: Option<&Path>,
        env_prefix: &str,
    ) -> Result<Self, AppError> {
        let config = service_core::config::load_settings(path, env_prefix)?;
        Ok(Self::with_config(name, protocol_mapper, config))
    }

    /// Builder-style setter for a single configuration entry.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Look up a configuration value.
    ///
    /// Exact keys win; otherwise an ASCII case-insensitive match is accepted
    /// because environment sources lowercase keys.
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.config.get(key) {
            return Some(value.as_str());
        }
        self.config
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}
