//! Error types for holocron-core
//!
//! Policy violations (unlocking without points, deleting the last preset,
//! over-capacity apprenticeships) are reported through these types and
//! never through panics.

use crate::apprenticeship::AssignError;
use crate::presets::PresetError;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration value
    #[error("invalid configuration: {field}")]
    InvalidConfig {
        /// Config field name
        field: String,
        /// Detailed message
        message: String,
    },

    /// No progression record exists for the agent
    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    /// The ability catalog has no such ability
    #[error("unknown ability: {0}")]
    UnknownAbility(String),

    /// Apprenticeship assignment rejected
    #[error("apprenticeship error: {0}")]
    Assign(#[from] AssignError),

    /// Preset operation rejected
    #[error("preset error: {0}")]
    Preset(#[from] PresetError),

    /// Record or catalog (de)serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (filesystem, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::InvalidConfig { field, message } => {
                format!("⚙️ Configuration error in '{}': {}", field, message)
            }
            Error::UnknownAgent(agent) => format!("👤 No Force record for '{}'.", agent),
            Error::UnknownAbility(id) => format!("📖 Unknown ability '{}'.", id),
            Error::Assign(e) => format!("🎓 Apprenticeship rejected: {}", e),
            Error::Preset(e) => format!("🗂️ Preset rejected: {}", e),
            Error::Serialization(msg) => format!("💾 Could not read or write record: {}", msg),
            Error::Internal(msg) => format!("❌ Internal error: {}", msg),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::InvalidConfig { field, .. } => Some(format!(
                "💡 Check the '{}' setting in config/default.toml or the HOLOCRON_ environment variables.",
                field
            )),
            Error::UnknownAgent(agent) => Some(format!(
                "💡 Run `holocron create {}` to activate the agent first.",
                agent
            )),
            Error::UnknownAbility(_) => {
                Some("💡 Check the ability id against config/abilities.toml.".to_string())
            }
            Error::Assign(AssignError::CapacityReached { .. }) => Some(
                "💡 Graduate an apprentice or raise `apprenticeship.capacity`.".to_string(),
            ),
            Error::Preset(PresetError::LastPreset) => {
                Some("💡 Save another preset before deleting this one.".to_string())
            }
            Error::Preset(PresetError::AlreadyExists(_)) => {
                Some("💡 Pick a different preset name.".to_string())
            }
            _ => None,
        }
    }
}

/// Format an error for display in the CLI
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = error.user_message();

    if let Some(suggestion) = error.suggestion() {
        output.push_str("\n\n");
        output.push_str(&suggestion);
    }

    output.push('\n');
    output
}
