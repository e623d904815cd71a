//! Broadcast hub configuration

use serde::Deserialize;
use std::time::Duration;

use crate::application::{
    HubSettings, DEFAULT_DELAYED_SUFFIX, DEFAULT_REBROADCAST_DELAY, DEFAULT_STOP_COMMAND,
};

use super::error::ValidationError;

const MAX_REBROADCAST_DELAY_MS: u64 = 60_000;

/// Hub behaviour settings
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Pause before the delayed rebroadcast, in milliseconds
    #[serde(default = "default_rebroadcast_delay_ms")]
    pub rebroadcast_delay_ms: u64,

    /// Inbound text that closes the sender's connection
    #[serde(default = "default_stop_command")]
    pub stop_command: String,

    /// Suffix appended to the rebroadcast copy
    #[serde(default = "default_delayed_suffix")]
    pub delayed_suffix: String,
}

impl HubConfig {
    pub fn rebroadcast_delay(&self) -> Duration {
        Duration::from_millis(self.rebroadcast_delay_ms)
    }

    /// Validate hub configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.rebroadcast_delay_ms == 0 || self.rebroadcast_delay_ms > MAX_REBROADCAST_DELAY_MS {
            return Err(ValidationError::InvalidRebroadcastDelay);
        }
        if self.stop_command.is_empty() {
            return Err(ValidationError::MissingRequired("hub.stop_command"));
        }
        Ok(())
    }

    /// Convert into the settings the hub is built with.
    pub fn to_settings(&self) -> HubSettings {
        HubSettings {
            rebroadcast_delay: self.rebroadcast_delay(),
            stop_command: self.stop_command.clone(),
            delayed_suffix: self.delayed_suffix.clone(),
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            rebroadcast_delay_ms: default_rebroadcast_delay_ms(),
            stop_command: default_stop_command(),
            delayed_suffix: default_delayed_suffix(),
        }
    }
}

fn default_rebroadcast_delay_ms() -> u64 {
    DEFAULT_REBROADCAST_DELAY.as_millis() as u64
}

fn default_stop_command() -> String {
    DEFAULT_STOP_COMMAND.to_string()
}

fn default_delayed_suffix() -> String {
    DEFAULT_DELAYED_SUFFIX.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_config_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.rebroadcast_delay_ms, 500);
        assert_eq!(config.stop_command, "stop");
        assert_eq!(config.delayed_suffix, " (delayed)");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_match_hub_settings() {
        assert_eq!(HubConfig::default().to_settings(), HubSettings::default());
    }

    #[test]
    fn test_hub_config_deserialization() {
        let json = r#"{ "rebroadcast_delay_ms": 250, "stop_command": "quit" }"#;

        let config: HubConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rebroadcast_delay(), Duration::from_millis(250));
        assert_eq!(config.stop_command, "quit");
        assert_eq!(config.delayed_suffix, " (delayed)");
    }

    #[test]
    fn test_validation_rejects_zero_delay() {
        let config = HubConfig {
            rebroadcast_delay_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRebroadcastDelay));
    }

    #[test]
    fn test_validation_rejects_huge_delay() {
        let config = HubConfig {
            rebroadcast_delay_ms: 120_000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_stop_command() {
        let config = HubConfig {
            stop_command: String::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("hub.stop_command"))
        );
    }
}
