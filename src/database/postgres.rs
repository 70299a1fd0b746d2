//! PostgreSQL implementation of the storage ports.

use super::init::DbPool;
use super::models::{
    Game, GamePlayer, GameStatus, LeagueEntry, LeagueStanding, NewLeagueEntry, NewRank, NewTask,
    Participant, Player, Quest, RankRecord, Task, TaskType, UpsertOutcome,
};
use super::store::{GameRecordStore, LeagueStore, PlayerStore, TaskCatalogStore};
use crate::error::StoreError;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, instrument};

const MAX_CONNECTIONS: u32 = 5;

const TASK_COLUMNS: &str = "task_id, name, description, rating, active, once, task_type";
const GAME_COLUMNS: &str = "game_id, name, status, created_at, playing_days, message_id";

#[derive(Clone)]
pub struct PgGameStore {
    pool: DbPool,
}

impl PgGameStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Opens the pool and brings the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl PlayerStore for PgGameStore {
    #[instrument(level = "debug", skip(self))]
    async fn upsert_player(
        &self,
        discord_id: i64,
        name: &str,
        hours: i64,
    ) -> Result<Player, StoreError> {
        let player = sqlx::query_as::<_, Player>(
            r#"INSERT INTO players (discord_id, name, hours) VALUES ($1, $2, $3)
            ON CONFLICT (discord_id) DO UPDATE SET
                name = EXCLUDED.name,
                hours = CASE WHEN EXCLUDED.hours <> 0 THEN EXCLUDED.hours ELSE players.hours END
            RETURNING player_id, discord_id, name, hours"#,
        )
        .bind(discord_id)
        .bind(name)
        .bind(hours)
        .fetch_one(&self.pool)
        .await?;
        Ok(player)
    }

    async fn get_player(&self, player_id: i32) -> Result<Option<Player>, StoreError> {
        let player = sqlx::query_as::<_, Player>(
            "SELECT player_id, discord_id, name, hours FROM players WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(player)
    }

    async fn max_player_hours(&self) -> Result<i64, StoreError> {
        let max = sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(hours), 0) FROM players")
            .fetch_one(&self.pool)
            .await?;
        Ok(max)
    }
}

#[async_trait]
impl TaskCatalogStore for PgGameStore {
    #[instrument(level = "debug", skip(self))]
    async fn tasks_up_to_rating(
        &self,
        ceiling: f64,
        task_type: TaskType,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
            WHERE active AND task_type = $1 AND rating <= $2
            ORDER BY rating DESC, task_id"
        ))
        .bind(task_type)
        .bind(ceiling)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    #[instrument(level = "debug", skip(self))]
    async fn random_tasks(
        &self,
        limit: i64,
        rating_min: i32,
        rating_max: i32,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
            WHERE active AND rating >= $1 AND rating < $2
            ORDER BY random() LIMIT $3"
        ))
        .bind(rating_min)
        .bind(rating_max)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn upsert_task(&self, task: &NewTask) -> Result<UpsertOutcome, StoreError> {
        // xmax is 0 only for a freshly inserted tuple.
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"INSERT INTO tasks (name, description, rating, active, once, task_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO UPDATE SET
                description = EXCLUDED.description,
                rating = EXCLUDED.rating,
                active = EXCLUDED.active,
                once = EXCLUDED.once,
                task_type = EXCLUDED.task_type
            RETURNING (xmax = 0)"#,
        )
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.rating)
        .bind(task.active)
        .bind(task.once)
        .bind(task.task_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(if inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        })
    }

    async fn all_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let tasks =
            sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY task_id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(tasks)
    }
}

#[async_trait]
impl LeagueStore for PgGameStore {
    async fn league_participant_count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM league")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn league_entry_for(&self, player_id: i32) -> Result<Option<LeagueEntry>, StoreError> {
        let entry = sqlx::query_as::<_, LeagueEntry>(
            "SELECT league_id, player_id, rank, points, survived FROM league WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn league_standings(&self) -> Result<Vec<LeagueStanding>, StoreError> {
        let standings = sqlx::query_as::<_, LeagueStanding>(
            r#"SELECT l.rank, p.name, p.discord_id, l.points, l.survived
            FROM league l JOIN players p ON p.player_id = l.player_id
            ORDER BY l.rank"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(standings)
    }

    #[instrument(level = "debug", skip(self, entries), fields(rows = entries.len()))]
    async fn replace_league_table(&self, entries: &[NewLeagueEntry]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM league").execute(&mut *tx).await?;
        for entry in entries {
            sqlx::query(
                "INSERT INTO league (player_id, rank, points, survived) VALUES ($1, $2, $3, $4)",
            )
            .bind(entry.player_id)
            .bind(entry.rank)
            .bind(entry.points)
            .bind(entry.survived)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        debug!(target = "store.league", rows = entries.len(), "league table replaced");
        Ok(())
    }

    async fn rank_records(&self) -> Result<Vec<RankRecord>, StoreError> {
        let records = sqlx::query_as::<_, RankRecord>(
            r#"SELECT gp.player_id, r.points, r.survived
            FROM ranks r
            JOIN game_players gp ON gp.association_id = r.association_id
            JOIN games g ON g.game_id = gp.game_id
            WHERE g.status = 'finished'"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

#[async_trait]
impl GameRecordStore for PgGameStore {
    #[instrument(level = "debug", skip(self))]
    async fn create_game(&self, name: &str, player_ids: &[i32]) -> Result<Game, StoreError> {
        let mut tx = self.pool.begin().await?;
        let game = sqlx::query_as::<_, Game>(&format!(
            "INSERT INTO games (name) VALUES ($1) RETURNING {GAME_COLUMNS}"
        ))
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;
        for player_id in player_ids {
            sqlx::query("INSERT INTO game_players (game_id, player_id) VALUES ($1, $2)")
                .bind(game.game_id)
                .bind(player_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(game)
    }

    async fn get_game(&self, game_id: i32) -> Result<Option<Game>, StoreError> {
        let game = sqlx::query_as::<_, Game>(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE game_id = $1"
        ))
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(game)
    }

    async fn games_with_status(&self, statuses: &[GameStatus]) -> Result<Vec<Game>, StoreError> {
        let games = sqlx::query_as::<_, Game>(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE status = ANY($1) ORDER BY game_id"
        ))
        .bind(statuses.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(games)
    }

    #[instrument(level = "debug", skip(self))]
    async fn set_game_status(&self, game_id: i32, status: GameStatus) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE games SET status = $2 WHERE game_id = $1")
            .bind(game_id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "game",
                id: game_id.into(),
            });
        }
        Ok(())
    }

    async fn set_game_message(&self, game_id: i32, message_id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE games SET message_id = $2 WHERE game_id = $1")
            .bind(game_id)
            .bind(message_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn association(
        &self,
        game_id: i32,
        player_id: i32,
    ) -> Result<Option<GamePlayer>, StoreError> {
        let association = sqlx::query_as::<_, GamePlayer>(
            "SELECT association_id, game_id, player_id FROM game_players WHERE game_id = $1 AND player_id = $2",
        )
        .bind(game_id)
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(association)
    }

    async fn game_participants(&self, game_id: i32) -> Result<Vec<Participant>, StoreError> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"SELECT gp.association_id, p.player_id, p.discord_id, p.name, p.hours,
                COUNT(q.quest_id) FILTER (WHERE q.status = 'completed') AS completed
            FROM game_players gp
            JOIN players p ON p.player_id = gp.player_id
            LEFT JOIN quests q ON q.association_id = gp.association_id
            WHERE gp.game_id = $1
            GROUP BY gp.association_id, p.player_id
            ORDER BY p.hours DESC, p.player_id"#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(participants)
    }

    #[instrument(level = "debug", skip(self))]
    async fn insert_quests(
        &self,
        association_id: i32,
        task_ids: &[i32],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for (position, task_id) in (1_i32..).zip(task_ids) {
            sqlx::query(
                "INSERT INTO quests (association_id, task_id, position) VALUES ($1, $2, $3)",
            )
            .bind(association_id)
            .bind(task_id)
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn complete_quest(
        &self,
        association_id: i32,
        position: i32,
    ) -> Result<Option<Quest>, StoreError> {
        let quest = sqlx::query_as::<_, Quest>(
            r#"UPDATE quests SET status = 'completed', end_time = NOW()
            WHERE association_id = $1 AND position = $2 AND status = 'running'
            RETURNING quest_id, association_id, task_id, position, status, start_time, end_time"#,
        )
        .bind(association_id)
        .bind(position)
        .fetch_optional(&self.pool)
        .await?;
        Ok(quest)
    }

    #[instrument(level = "debug", skip(self, ranks), fields(rows = ranks.len()))]
    async fn finish_game(
        &self,
        game_id: i32,
        playing_days: i32,
        ranks: &[NewRank],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE games SET playing_days = $2, status = 'finished' WHERE game_id = $1",
        )
        .bind(game_id)
        .bind(playing_days)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "game",
                id: game_id.into(),
            });
        }
        for rank in ranks {
            sqlx::query(
                r#"INSERT INTO ranks (association_id, placement, points, survived)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (association_id) DO UPDATE SET
                    placement = EXCLUDED.placement,
                    points = EXCLUDED.points,
                    survived = EXCLUDED.survived,
                    recorded_at = NOW()"#,
            )
            .bind(rank.association_id)
            .bind(rank.placement)
            .bind(rank.points)
            .bind(rank.survived)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
