//! Agent loop settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the agent loop's behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum selection→execution cycles per task (safety limit)
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Pause between iterations, in milliseconds
    #[serde(default = "default_step_cooldown_ms")]
    pub step_cooldown_ms: u64,

    /// Attempts at the model call per selection (1 = no retry)
    #[serde(default = "default_selection_attempts")]
    pub selection_attempts: u32,

    /// Backoff before the first selection retry; doubles per attempt
    #[serde(default = "default_selection_backoff_ms")]
    pub selection_backoff_ms: u64,
}

fn default_max_steps() -> u32 {
    30
}
fn default_step_cooldown_ms() -> u64 {
    2000
}
fn default_selection_attempts() -> u32 {
    3
}
fn default_selection_backoff_ms() -> u64 {
    500
}

impl AgentConfig {
    pub fn step_cooldown(&self) -> Duration {
        Duration::from_millis(self.step_cooldown_ms)
    }

    pub fn selection_backoff(&self) -> Duration {
        Duration::from_millis(self.selection_backoff_ms)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            step_cooldown_ms: default_step_cooldown_ms(),
            selection_attempts: default_selection_attempts(),
            selection_backoff_ms: default_selection_backoff_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_budget() {
        let config = AgentConfig::default();
        assert_eq!(config.max_steps, 30);
        assert_eq!(config.step_cooldown(), Duration::from_secs(2));
        assert_eq!(config.selection_attempts, 3);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: AgentConfig = serde_json::from_str(r#"{"max_steps": 4}"#).unwrap();
        assert_eq!(config.max_steps, 4);
        assert_eq!(config.step_cooldown_ms, 2000);
    }
}
