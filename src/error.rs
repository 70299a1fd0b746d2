//! Error types shared across the store, the game core and the chat layer.

use crate::database::models::GameStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("integrity violation: {0}")]
    Integrity(String),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("game cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: GameStatus, to: GameStatus },

    #[error("a game is only finished through evaluation")]
    EvaluationRequired,

    #[error("game {0} not found")]
    GameNotFound(i32),

    #[error("a game cannot last {0} days")]
    InvalidPlayingDays(i32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Raised by the chat-platform collaborator when quests cannot reach a player.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("member {discord_id} is not part of the guild")]
    UnknownMember { discord_id: i64 },

    #[error("could not message {discord_id}: {reason}")]
    Send { discord_id: i64, reason: String },

    #[error("could not post to the game channel: {reason}")]
    Announce { reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("setting {key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum CatalogFileError {
    #[error("catalog file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
