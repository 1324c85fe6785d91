//! Error types for Duel Forge

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("Card not found: {0}")]
    CardNotFound(u32),

    #[error("Wonder not found: {0}")]
    WonderNotFound(u32),

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DuelError>;
