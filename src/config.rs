//! Editor settings: completion toggle, suggestion bound, and the debounce
//! windows. Loaded from an optional TOML file; every field has a default.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Session settings. Constructed by the host and passed into the session,
/// not held in a process-wide singleton.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whether the completion engine runs at all.
    pub completion_enabled: bool,
    /// Upper bound on the suggestion list length.
    pub max_suggestions: usize,
    /// Quiet window between the last keystroke and a completion request.
    pub completion_delay_ms: u64,
    /// Quiet window between the last edit and a store write.
    pub save_quiet_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            completion_enabled: true,
            max_suggestions: 12,
            completion_delay_ms: 300,
            save_quiet_ms: 1000,
        }
    }
}

impl EditorConfig {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        toml::from_str(&s).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    pub fn save_quiet(&self) -> Duration {
        Duration::from_millis(self.save_quiet_ms)
    }
}
