use thiserror::Error;

use crate::config::secret_manager::SecretError;

/// Errors raised while loading configuration at startup
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Required setting '{setting_name}' is missing")]
    MissingSetting { setting_name: String },

    #[error("Invalid setting '{setting_name}': {reason}")]
    InvalidSetting { setting_name: String, reason: String },

    #[error("Failed to parse setting '{setting_name}': {error}")]
    ParseError { setting_name: String, error: String },

    #[error(transparent)]
    Secret(#[from] SecretError),
}

impl ApplicationError {
    pub fn invalid(setting_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting_name: setting_name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(setting_name: &str, error: impl Into<String>) -> Self {
        Self::ParseError {
            setting_name: setting_name.to_string(),
            error: error.into(),
        }
    }
}
