//! Presenter error types

use thiserror::Error;
use void_scene::SceneError;

/// Presenter errors
#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Scene rejected: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for presenter operations
pub type Result<T> = std::result::Result<T, PresenterError>;
