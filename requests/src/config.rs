//! Configuration for the access-request engine.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Access-request configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Base UI URL that link prefixes are spliced onto.
    pub ui_base_url: String,
    /// Process-wide sender address for direct email operations.
    pub mail_default_sender: String,
}

impl AccessConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            ui_base_url: env::var("UI_BASE_URL")
                .unwrap_or_else(|_| "https://127.0.0.1:5000".to_string()),
            mail_default_sender: env::var("MAIL_DEFAULT_SENDER")
                .unwrap_or_else(|_| "noreply@localhost".to_string()),
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            ui_base_url: "https://127.0.0.1:5000".to_string(),
            mail_default_sender: "noreply@localhost".to_string(),
        }
    }
}
