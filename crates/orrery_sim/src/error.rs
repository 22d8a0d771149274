//! Error types for orrery_sim

use orrery_scene::SceneError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or building a simulation
///
/// Nothing here is raised from inside a frame; per-frame faults are logged
/// and recovered where they happen.
#[derive(Error, Debug)]
pub enum SimError {
    /// Failed to read a file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Failed to write TOML
    #[error("failed to serialize config: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// Well-formed but unusable configuration
    #[error("invalid config: {0}")]
    Config(String),

    /// A body was configured more than once
    #[error("body '{0}' is defined more than once")]
    DuplicateBody(String),

    /// A body names a parent that is not defined before it
    #[error("body '{body}' names unknown parent '{parent}'")]
    UnknownParent { body: String, parent: String },

    /// Hierarchy edit failed while building the scene
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Result type for orrery_sim operations
pub type Result<T> = std::result::Result<T, SimError>;
