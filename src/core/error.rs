use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid game state: {0}")]
    InvalidGameState(#[source] serde_json::Error),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Invalid actions: {0}")]
    InvalidActions(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
