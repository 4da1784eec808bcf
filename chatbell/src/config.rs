use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::notifier::Category;

pub const APP_CONFIG_NAME: &str = "chatbell";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationValues {
    /// Name the notifications are sent under.
    pub app_name: String,
    pub enabled_categories: Vec<Category>,
    /// Display time in milliseconds; the notification server decides when unset.
    pub timeout_ms: Option<u32>,
    /// Directory with cached avatars named `<bare address>.png`.
    pub avatar_directory: Option<PathBuf>,
    /// Command run when a notification is clicked, `xmpp:<address>` is appended.
    pub default_action_command: Option<String>,
    /// How long `chatbell popup` waits for the user to interact.
    pub wait_limit_secs: u64,
}

impl Default for ConfigurationValues {
    fn default() -> Self {
        Self {
            app_name: "chatbell".to_string(),
            enabled_categories: Category::defaults(),
            timeout_ms: None,
            avatar_directory: None,
            default_action_command: Some("xdg-open".to_string()),
            wait_limit_secs: 30,
        }
    }
}

impl ConfigurationValues {
    pub fn is_enabled(&self, category: Category) -> bool {
        self.enabled_categories.contains(&category)
    }

    pub fn load() -> anyhow::Result<Self> {
        Ok(confy::load(APP_CONFIG_NAME, None)?)
    }

    /// Load the configuration, falling back to defaults when it cannot be read.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load configuration, using defaults");
                Self::default()
            }
        }
    }
}
