//! Contains all the data structures that map to database tables or query results.

use serde::{Deserialize, Serialize};
use sqlx::Type;
use sqlx::types::chrono::{DateTime, Utc};

// --- Players ---
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Player {
    pub player_id: i32,
    pub discord_id: i64,
    pub name: String,
    pub hours: i64,
}

// --- Task Catalog ---
#[derive(Debug, Clone, Copy, Type, PartialEq, Eq, Serialize, Deserialize)]
#[sqlx(type_name = "task_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Task,
    Main,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Task {
    pub task_id: i32,
    pub name: String,
    pub description: String,
    pub rating: i32,
    pub active: bool,
    pub once: bool,
    pub task_type: TaskType,
}

/// A catalog row as it arrives from an import; matched against existing tasks by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub rating: i32,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub once: bool,
    #[serde(rename = "type", default = "default_task_type")]
    pub task_type: TaskType,
}

fn default_true() -> bool {
    true
}

fn default_task_type() -> TaskType {
    TaskType::Task
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

// --- League ---
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct LeagueEntry {
    pub league_id: i32,
    pub player_id: i32,
    pub rank: i32,
    pub points: i64,
    pub survived: i64,
}

/// One row of a freshly generated league table, before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeagueEntry {
    pub player_id: i32,
    pub rank: i32,
    pub points: i64,
    pub survived: i64,
}

/// League row joined with the player's display name, for rendering.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct LeagueStanding {
    pub rank: i32,
    pub name: String,
    pub discord_id: i64,
    pub points: i64,
    pub survived: i64,
}

/// A persisted per-game rank flattened onto its owning player.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct RankRecord {
    pub player_id: i32,
    pub points: i32,
    pub survived: i32,
}

// --- Games ---
#[derive(Debug, Clone, Copy, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "game_status", rename_all = "lowercase")]
pub enum GameStatus {
    Created,
    Running,
    Paused,
    Stopped,
    Finished,
    Failure,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Game {
    pub game_id: i32,
    pub name: String,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
    pub playing_days: i32,
    pub message_id: Option<i64>,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct GamePlayer {
    pub association_id: i32,
    pub game_id: i32,
    pub player_id: i32,
}

/// A game participant with their association anchor and quest progress.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Participant {
    pub association_id: i32,
    pub player_id: i32,
    pub discord_id: i64,
    pub name: String,
    pub hours: i64,
    pub completed: i64,
}

// --- Quests & Ranks ---
#[derive(Debug, Clone, Copy, Type, PartialEq, Eq)]
#[sqlx(type_name = "quest_status", rename_all = "lowercase")]
pub enum QuestStatus {
    Running,
    Completed,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Quest {
    pub quest_id: i32,
    pub association_id: i32,
    pub task_id: i32,
    pub position: i32,
    pub status: QuestStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Final standing of one participant, written when a game is evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRank {
    pub association_id: i32,
    pub placement: i32,
    pub points: i32,
    pub survived: i32,
}
