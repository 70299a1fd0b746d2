//! Storage ports consumed by the ranking and quest core.
//!
//! Each concern gets its own narrow trait so tests can fake only what a
//! component reads. `GameStore` bundles all of them for the bot itself.

use super::models::{
    Game, GamePlayer, GameStatus, LeagueEntry, LeagueStanding, NewLeagueEntry, NewRank, NewTask,
    Participant, Player, Quest, RankRecord, Task, TaskType, UpsertOutcome,
};
use crate::error::StoreError;
use async_trait::async_trait;

#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Creates the player on first sighting. `hours` only overwrites the stored
    /// value when it is non-zero.
    async fn upsert_player(
        &self,
        discord_id: i64,
        name: &str,
        hours: i64,
    ) -> Result<Player, StoreError>;

    async fn get_player(&self, player_id: i32) -> Result<Option<Player>, StoreError>;

    /// Highest `hours` across all players, 0 when there are none.
    async fn max_player_hours(&self) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait TaskCatalogStore: Send + Sync {
    /// Active tasks of `task_type` with `rating <= ceiling`, hardest first.
    async fn tasks_up_to_rating(
        &self,
        ceiling: f64,
        task_type: TaskType,
    ) -> Result<Vec<Task>, StoreError>;

    /// Random active tasks with `rating_min <= rating < rating_max`.
    async fn random_tasks(
        &self,
        limit: i64,
        rating_min: i32,
        rating_max: i32,
    ) -> Result<Vec<Task>, StoreError>;

    async fn upsert_task(&self, task: &NewTask) -> Result<UpsertOutcome, StoreError>;

    async fn all_tasks(&self) -> Result<Vec<Task>, StoreError>;
}

#[async_trait]
pub trait LeagueStore: Send + Sync {
    async fn league_participant_count(&self) -> Result<i64, StoreError>;

    async fn league_entry_for(&self, player_id: i32) -> Result<Option<LeagueEntry>, StoreError>;

    /// The current table ordered by rank, joined with player names.
    async fn league_standings(&self) -> Result<Vec<LeagueStanding>, StoreError>;

    /// Drops every league row and inserts `entries`, atomically.
    async fn replace_league_table(&self, entries: &[NewLeagueEntry]) -> Result<(), StoreError>;

    /// Every rank of a FINISHED game, resolved to its player.
    async fn rank_records(&self) -> Result<Vec<RankRecord>, StoreError>;
}

#[async_trait]
pub trait GameRecordStore: Send + Sync {
    /// Creates the game and links every player to it in one transaction.
    async fn create_game(&self, name: &str, player_ids: &[i32]) -> Result<Game, StoreError>;

    async fn get_game(&self, game_id: i32) -> Result<Option<Game>, StoreError>;

    async fn games_with_status(&self, statuses: &[GameStatus]) -> Result<Vec<Game>, StoreError>;

    async fn set_game_status(&self, game_id: i32, status: GameStatus) -> Result<(), StoreError>;

    async fn set_game_message(&self, game_id: i32, message_id: i64) -> Result<(), StoreError>;

    async fn association(
        &self,
        game_id: i32,
        player_id: i32,
    ) -> Result<Option<GamePlayer>, StoreError>;

    async fn game_participants(&self, game_id: i32) -> Result<Vec<Participant>, StoreError>;

    /// Stores one quest per task, positions numbered from 1 in slice order.
    async fn insert_quests(&self, association_id: i32, task_ids: &[i32])
    -> Result<(), StoreError>;

    /// Marks the running quest at `position` as completed. `None` when there
    /// is no such running quest.
    async fn complete_quest(
        &self,
        association_id: i32,
        position: i32,
    ) -> Result<Option<Quest>, StoreError>;

    /// Persists the final standings and the game's length and marks the game
    /// FINISHED, all in one transaction.
    async fn finish_game(
        &self,
        game_id: i32,
        playing_days: i32,
        ranks: &[NewRank],
    ) -> Result<(), StoreError>;
}

/// Everything the bot needs from persistence.
pub trait GameStore: PlayerStore + TaskCatalogStore + LeagueStore + GameRecordStore {}

impl<T> GameStore for T where T: PlayerStore + TaskCatalogStore + LeagueStore + GameRecordStore {}
