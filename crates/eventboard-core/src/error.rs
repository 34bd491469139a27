//! Core error types for eventboard-core.
//!
//! This module defines the error hierarchy using thiserror. Denied actions
//! are not errors of the library itself; see [`crate::event::Denial`].

use std::path::PathBuf;
use thiserror::Error;

use crate::event::Denial;

/// Core error type for eventboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Schedule construction errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Event draft validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Action refused by the gate
    #[error("Action denied: {0}")]
    Denied(#[from] Denial),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while assembling an [`crate::EventSchedule`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A required scheduling field was not supplied
    #[error("Invalid schedule: missing {missing}")]
    InvalidSchedule { missing: &'static str },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not resolve the configuration directory
    #[error("Configuration directory unavailable: {0}")]
    NoDataDir(String),
}

/// Validation errors for user-submitted form data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was left empty
    #[error("'{field}' must not be empty")]
    Empty { field: &'static str },

    /// A text field exceeded its maximum length
    #[error("'{field}' must be at most {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    /// End time not strictly after start time
    #[error("End time must be after start time.")]
    EndBeforeStart,

    /// Too many tags selected
    #[error("You can select at most {max} tags.")]
    TooManyTags { max: usize },

    /// Too many tags on a community
    #[error("You can select a maximum of {max} tags.")]
    TooManyCommunityTags { max: usize },

    /// Too many favourite interests on a profile
    #[error("You can select up to {max} favourite interests only.")]
    TooManyFavourites { max: usize },

    /// Capacity set to zero
    #[error("Maximum participants must be a positive number")]
    ZeroCapacity,

    /// Missing schedule field
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
