//! Configuration types for the drafts subsystem.
//!
//! `DraftsConfig` is the `config.toml` in the data directory. Every field
//! has a default, so an empty or missing file is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for autosave and draft storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftsConfig {
    /// Quiet period after the last change before a draft is saved.
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    /// Key under which the whole draft collection is stored.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Largest value the key-value store accepts, in bytes.
    #[serde(default = "default_max_value_bytes")]
    pub max_value_bytes: usize,
}

fn default_autosave_delay_ms() -> u64 {
    300
}

fn default_storage_key() -> String {
    "report-drafts".to_string()
}

fn default_max_value_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for DraftsConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: default_autosave_delay_ms(),
            storage_key: default_storage_key(),
            max_value_bytes: default_max_value_bytes(),
        }
    }
}

impl DraftsConfig {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}
