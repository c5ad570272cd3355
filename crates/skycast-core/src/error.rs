//! Centralized error types for SkyCast.
//!
//! Lookup failures carry their own user-facing text; everything else maps to
//! a fixed, actionable message via `user_message()`.

use skycast_store::StorageError;
use skycast_weather::FetchError;
use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Weather lookup failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a message suitable for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            // Shown verbatim: provider text or the lookup's own fallback
            AppError::Fetch(e) => e.message(),
            AppError::Storage(_) => {
                "Could not save your locations. Changes may be lost on restart.".to_string()
            }
            AppError::Config(e) => e.user_message().to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Io(_) => "A file operation failed. Please try again.".to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}
