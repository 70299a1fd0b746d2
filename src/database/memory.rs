//! In-process implementation of the storage ports.
//!
//! Mirrors the semantics of the Postgres store closely enough to drive the
//! ranking and quest core in tests without a database.

use super::models::{
    Game, GamePlayer, GameStatus, LeagueEntry, LeagueStanding, NewLeagueEntry, NewRank, NewTask,
    Participant, Player, Quest, QuestStatus, RankRecord, Task, TaskType, UpsertOutcome,
};
use super::store::{GameRecordStore, LeagueStore, PlayerStore, TaskCatalogStore};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    next_id: i32,
    players: Vec<Player>,
    tasks: Vec<Task>,
    league: Vec<LeagueEntry>,
    games: Vec<Game>,
    associations: Vec<GamePlayer>,
    quests: Vec<Quest>,
    ranks: Vec<NewRank>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn game_mut(&mut self, game_id: i32) -> Result<&mut Game, StoreError> {
        self.games
            .iter_mut()
            .find(|g| g.game_id == game_id)
            .ok_or(StoreError::NotFound {
                entity: "game",
                id: game_id.into(),
            })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlayerStore for MemoryStore {
    async fn upsert_player(
        &self,
        discord_id: i64,
        name: &str,
        hours: i64,
    ) -> Result<Player, StoreError> {
        let mut t = self.tables.write().await;
        if let Some(existing) = t.players.iter_mut().find(|p| p.discord_id == discord_id) {
            existing.name = name.to_string();
            if hours != 0 {
                existing.hours = hours;
            }
            return Ok(existing.clone());
        }
        let player = Player {
            player_id: t.next_id(),
            discord_id,
            name: name.to_string(),
            hours,
        };
        t.players.push(player.clone());
        Ok(player)
    }

    async fn get_player(&self, player_id: i32) -> Result<Option<Player>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.players.iter().find(|p| p.player_id == player_id).cloned())
    }

    async fn max_player_hours(&self) -> Result<i64, StoreError> {
        let t = self.tables.read().await;
        Ok(t.players.iter().map(|p| p.hours).max().unwrap_or(0))
    }
}

#[async_trait]
impl TaskCatalogStore for MemoryStore {
    async fn tasks_up_to_rating(
        &self,
        ceiling: f64,
        task_type: TaskType,
    ) -> Result<Vec<Task>, StoreError> {
        let t = self.tables.read().await;
        let mut tasks: Vec<Task> = t
            .tasks
            .iter()
            .filter(|task| {
                task.active && task.task_type == task_type && f64::from(task.rating) <= ceiling
            })
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.task_id.cmp(&b.task_id)));
        Ok(tasks)
    }

    async fn random_tasks(
        &self,
        limit: i64,
        rating_min: i32,
        rating_max: i32,
    ) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = {
            let t = self.tables.read().await;
            t.tasks
                .iter()
                .filter(|task| task.active && task.rating >= rating_min && task.rating < rating_max)
                .cloned()
                .collect()
        };
        tasks.shuffle(&mut rand::thread_rng());
        tasks.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(tasks)
    }

    async fn upsert_task(&self, task: &NewTask) -> Result<UpsertOutcome, StoreError> {
        let mut t = self.tables.write().await;
        if let Some(existing) = t.tasks.iter_mut().find(|e| e.name == task.name) {
            existing.description = task.description.clone();
            existing.rating = task.rating;
            existing.active = task.active;
            existing.once = task.once;
            existing.task_type = task.task_type;
            return Ok(UpsertOutcome::Updated);
        }
        let task_id = t.next_id();
        t.tasks.push(Task {
            task_id,
            name: task.name.clone(),
            description: task.description.clone(),
            rating: task.rating,
            active: task.active,
            once: task.once,
            task_type: task.task_type,
        });
        Ok(UpsertOutcome::Created)
    }

    async fn all_tasks(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tables.read().await.tasks.clone())
    }
}

#[async_trait]
impl LeagueStore for MemoryStore {
    async fn league_participant_count(&self) -> Result<i64, StoreError> {
        Ok(self.tables.read().await.league.len() as i64)
    }

    async fn league_entry_for(&self, player_id: i32) -> Result<Option<LeagueEntry>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.league.iter().find(|e| e.player_id == player_id).cloned())
    }

    async fn league_standings(&self) -> Result<Vec<LeagueStanding>, StoreError> {
        let t = self.tables.read().await;
        let mut standings: Vec<LeagueStanding> = t
            .league
            .iter()
            .filter_map(|entry| {
                let player = t.players.iter().find(|p| p.player_id == entry.player_id)?;
                Some(LeagueStanding {
                    rank: entry.rank,
                    name: player.name.clone(),
                    discord_id: player.discord_id,
                    points: entry.points,
                    survived: entry.survived,
                })
            })
            .collect();
        standings.sort_by_key(|s| s.rank);
        Ok(standings)
    }

    async fn replace_league_table(&self, entries: &[NewLeagueEntry]) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        if let Some(dup) = entries.iter().find(|e| !seen.insert(e.player_id)) {
            return Err(StoreError::Integrity(format!(
                "duplicate league entry for player {}",
                dup.player_id
            )));
        }
        let mut t = self.tables.write().await;
        t.league.clear();
        for entry in entries {
            let league_id = t.next_id();
            t.league.push(LeagueEntry {
                league_id,
                player_id: entry.player_id,
                rank: entry.rank,
                points: entry.points,
                survived: entry.survived,
            });
        }
        Ok(())
    }

    async fn rank_records(&self) -> Result<Vec<RankRecord>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.ranks
            .iter()
            .filter_map(|rank| {
                let association = t
                    .associations
                    .iter()
                    .find(|a| a.association_id == rank.association_id)?;
                let finished = t.games.iter().any(|g| {
                    g.game_id == association.game_id && g.status == GameStatus::Finished
                });
                if !finished {
                    return None;
                }
                Some(RankRecord {
                    player_id: association.player_id,
                    points: rank.points,
                    survived: rank.survived,
                })
            })
            .collect())
    }
}

#[async_trait]
impl GameRecordStore for MemoryStore {
    async fn create_game(&self, name: &str, player_ids: &[i32]) -> Result<Game, StoreError> {
        let mut t = self.tables.write().await;
        let game = Game {
            game_id: t.next_id(),
            name: name.to_string(),
            status: GameStatus::Created,
            created_at: Utc::now(),
            playing_days: 0,
            message_id: None,
        };
        for &player_id in player_ids {
            let association_id = t.next_id();
            t.associations.push(GamePlayer {
                association_id,
                game_id: game.game_id,
                player_id,
            });
        }
        t.games.push(game.clone());
        Ok(game)
    }

    async fn get_game(&self, game_id: i32) -> Result<Option<Game>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.games.iter().find(|g| g.game_id == game_id).cloned())
    }

    async fn games_with_status(&self, statuses: &[GameStatus]) -> Result<Vec<Game>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.games
            .iter()
            .filter(|g| statuses.contains(&g.status))
            .cloned()
            .collect())
    }

    async fn set_game_status(&self, game_id: i32, status: GameStatus) -> Result<(), StoreError> {
        self.tables.write().await.game_mut(game_id)?.status = status;
        Ok(())
    }

    async fn set_game_message(&self, game_id: i32, message_id: i64) -> Result<(), StoreError> {
        self.tables.write().await.game_mut(game_id)?.message_id = Some(message_id);
        Ok(())
    }

    async fn association(
        &self,
        game_id: i32,
        player_id: i32,
    ) -> Result<Option<GamePlayer>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.associations
            .iter()
            .find(|a| a.game_id == game_id && a.player_id == player_id)
            .cloned())
    }

    async fn game_participants(&self, game_id: i32) -> Result<Vec<Participant>, StoreError> {
        let t = self.tables.read().await;
        let mut participants: Vec<Participant> = t
            .associations
            .iter()
            .filter(|a| a.game_id == game_id)
            .filter_map(|a| {
                let player = t.players.iter().find(|p| p.player_id == a.player_id)?;
                let completed = t
                    .quests
                    .iter()
                    .filter(|q| {
                        q.association_id == a.association_id && q.status == QuestStatus::Completed
                    })
                    .count() as i64;
                Some(Participant {
                    association_id: a.association_id,
                    player_id: player.player_id,
                    discord_id: player.discord_id,
                    name: player.name.clone(),
                    hours: player.hours,
                    completed,
                })
            })
            .collect();
        participants.sort_by(|a, b| b.hours.cmp(&a.hours).then(a.player_id.cmp(&b.player_id)));
        Ok(participants)
    }

    async fn insert_quests(
        &self,
        association_id: i32,
        task_ids: &[i32],
    ) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        if t.quests.iter().any(|q| q.association_id == association_id) {
            return Err(StoreError::Integrity(format!(
                "quests already assigned for association {association_id}"
            )));
        }
        for (position, &task_id) in (1_i32..).zip(task_ids) {
            let quest_id = t.next_id();
            t.quests.push(Quest {
                quest_id,
                association_id,
                task_id,
                position,
                status: QuestStatus::Running,
                start_time: Utc::now(),
                end_time: None,
            });
        }
        Ok(())
    }

    async fn complete_quest(
        &self,
        association_id: i32,
        position: i32,
    ) -> Result<Option<Quest>, StoreError> {
        let mut t = self.tables.write().await;
        let Some(quest) = t.quests.iter_mut().find(|q| {
            q.association_id == association_id
                && q.position == position
                && q.status == QuestStatus::Running
        }) else {
            return Ok(None);
        };
        quest.status = QuestStatus::Completed;
        quest.end_time = Some(Utc::now());
        Ok(Some(quest.clone()))
    }

    async fn finish_game(
        &self,
        game_id: i32,
        playing_days: i32,
        ranks: &[NewRank],
    ) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        let game = t.game_mut(game_id)?;
        game.playing_days = playing_days;
        game.status = GameStatus::Finished;
        for rank in ranks {
            t.ranks.retain(|r| r.association_id != rank.association_id);
            t.ranks.push(rank.clone());
        }
        Ok(())
    }
}
