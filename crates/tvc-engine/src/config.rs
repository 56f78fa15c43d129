//! # Engine Configuration
//!
//! Everything a run needs besides the ledger and the roster. Every field has a
//! default so an empty YAML document is a valid configuration; `validate()`
//! rejects values that would make the output meaningless.
//!
//! ```yaml
//! staleness_threshold_days: 45
//! notification:
//!   program_name: Trainer Network
//!   call_to_action_url: https://training.example.org/content/latest
//!   sign_off: "Thanks,\nThe Content Team"
//! ```

use serde::{Deserialize, Serialize};

use tvc_core::ConfigError;

/// Days of inactivity after which an operator is considered stale.
pub const DEFAULT_STALENESS_THRESHOLD_DAYS: u32 = 45;

/// Link included in every notification.
pub const DEFAULT_CALL_TO_ACTION_URL: &str = "https://training.example.org/content/latest";

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Inactivity beyond this many days marks an operator stale.
    pub staleness_threshold_days: u32,
    /// Static text used by the notification renderer.
    pub notification: NotificationSettings,
}

/// Static parts of every outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationSettings {
    /// Prefix for subject lines.
    pub program_name: String,
    /// Where operators fetch the current content.
    pub call_to_action_url: String,
    /// Closing lines of the body.
    pub sign_off: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            staleness_threshold_days: DEFAULT_STALENESS_THRESHOLD_DAYS,
            notification: NotificationSettings::default(),
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            program_name: "Trainer Network".to_string(),
            call_to_action_url: DEFAULT_CALL_TO_ACTION_URL.to_string(),
            sign_off: "Thanks,\nThe Content Team".to_string(),
        }
    }
}

impl EngineConfig {
    /// Override the staleness threshold for a single run.
    pub fn with_staleness_threshold(mut self, days: u32) -> Self {
        self.staleness_threshold_days = days;
        self
    }

    /// Reject a zero threshold or a blank call-to-action link.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.staleness_threshold_days == 0 {
            return Err(ConfigError::InvalidField {
                field: "staleness_threshold_days",
                reason: "must be a positive number of days".to_string(),
            });
        }
        if self.notification.call_to_action_url.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "notification.call_to_action_url",
                reason: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
