use async_trait::async_trait;
use std::collections::HashMap;
use taskhunt_bot::database::MemoryStore;
use taskhunt_bot::database::models::{
    Game, GamePlayer, GameStatus, LeagueEntry, LeagueStanding, NewLeagueEntry, NewRank, NewTask,
    Participant, Player, Quest, RankRecord, Task, TaskType, UpsertOutcome,
};
use taskhunt_bot::database::store::{GameRecordStore, LeagueStore, PlayerStore, TaskCatalogStore};
use taskhunt_bot::error::{GameError, StoreError};
use taskhunt_bot::league::{GameStats, RankWeights, compute_stats, evaluate_game, player_rank};

/// `MemoryStore` with switchable outages on selected operations.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_league_count: bool,
    fail_max_hours: bool,
    fail_finish: bool,
}

fn outage() -> StoreError {
    StoreError::Integrity("connection dropped".into())
}

#[async_trait]
impl PlayerStore for FlakyStore {
    async fn upsert_player(&self, discord_id: i64, name: &str, hours: i64) -> Result<Player, StoreError> {
        self.inner.upsert_player(discord_id, name, hours).await
    }

    async fn get_player(&self, player_id: i32) -> Result<Option<Player>, StoreError> {
        self.inner.get_player(player_id).await
    }

    async fn max_player_hours(&self) -> Result<i64, StoreError> {
        if self.fail_max_hours {
            return Err(outage());
        }
        self.inner.max_player_hours().await
    }
}

#[async_trait]
impl TaskCatalogStore for FlakyStore {
    async fn tasks_up_to_rating(&self, ceiling: f64, task_type: TaskType) -> Result<Vec<Task>, StoreError> {
        self.inner.tasks_up_to_rating(ceiling, task_type).await
    }

    async fn random_tasks(&self, limit: i64, rating_min: i32, rating_max: i32) -> Result<Vec<Task>, StoreError> {
        self.inner.random_tasks(limit, rating_min, rating_max).await
    }

    async fn upsert_task(&self, task: &NewTask) -> Result<UpsertOutcome, StoreError> {
        self.inner.upsert_task(task).await
    }

    async fn all_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.inner.all_tasks().await
    }
}

#[async_trait]
impl LeagueStore for FlakyStore {
    async fn league_participant_count(&self) -> Result<i64, StoreError> {
        if self.fail_league_count {
            return Err(outage());
        }
        self.inner.league_participant_count().await
    }

    async fn league_entry_for(&self, player_id: i32) -> Result<Option<LeagueEntry>, StoreError> {
        self.inner.league_entry_for(player_id).await
    }

    async fn league_standings(&self) -> Result<Vec<LeagueStanding>, StoreError> {
        self.inner.league_standings().await
    }

    async fn replace_league_table(&self, entries: &[NewLeagueEntry]) -> Result<(), StoreError> {
        self.inner.replace_league_table(entries).await
    }

    async fn rank_records(&self) -> Result<Vec<RankRecord>, StoreError> {
        self.inner.rank_records().await
    }
}

#[async_trait]
impl GameRecordStore for FlakyStore {
    async fn create_game(&self, name: &str, player_ids: &[i32]) -> Result<Game, StoreError> {
        self.inner.create_game(name, player_ids).await
    }

    async fn get_game(&self, game_id: i32) -> Result<Option<Game>, StoreError> {
        self.inner.get_game(game_id).await
    }

    async fn games_with_status(&self, statuses: &[GameStatus]) -> Result<Vec<Game>, StoreError> {
        self.inner.games_with_status(statuses).await
    }

    async fn set_game_status(&self, game_id: i32, status: GameStatus) -> Result<(), StoreError> {
        self.inner.set_game_status(game_id, status).await
    }

    async fn set_game_message(&self, game_id: i32, message_id: i64) -> Result<(), StoreError> {
        self.inner.set_game_message(game_id, message_id).await
    }

    async fn association(&self, game_id: i32, player_id: i32) -> Result<Option<GamePlayer>, StoreError> {
        self.inner.association(game_id, player_id).await
    }

    async fn game_participants(&self, game_id: i32) -> Result<Vec<Participant>, StoreError> {
        self.inner.game_participants(game_id).await
    }

    async fn insert_quests(&self, association_id: i32, task_ids: &[i32]) -> Result<(), StoreError> {
        self.inner.insert_quests(association_id, task_ids).await
    }

    async fn complete_quest(&self, association_id: i32, position: i32) -> Result<Option<Quest>, StoreError> {
        self.inner.complete_quest(association_id, position).await
    }

    async fn finish_game(&self, game_id: i32, playing_days: i32, ranks: &[NewRank]) -> Result<(), StoreError> {
        if self.fail_finish {
            return Err(outage());
        }
        self.inner.finish_game(game_id, playing_days, ranks).await
    }
}

/// Two players in a running game, plus a one-row league so stats are non-zero.
async fn seed(store: &FlakyStore) -> (Game, Player) {
    let ana = store.upsert_player(1, "Ana", 100).await.unwrap();
    let bo = store.upsert_player(2, "Bo", 50).await.unwrap();
    store
        .replace_league_table(&[NewLeagueEntry { player_id: ana.player_id, rank: 1, points: 6, survived: 5 }])
        .await
        .unwrap();
    let game = store.create_game("hunt", &[ana.player_id, bo.player_id]).await.unwrap();
    store.set_game_status(game.game_id, GameStatus::Running).await.unwrap();
    (game, ana)
}

#[tokio::test]
async fn failed_finish_keeps_ranks_out_of_the_league() {
    let store = FlakyStore { fail_finish: true, ..FlakyStore::default() };
    let (game, ana) = seed(&store).await;

    let err = evaluate_game(&store, game.game_id, 5, &HashMap::new()).await.unwrap_err();
    assert!(matches!(err, GameError::Store(StoreError::Integrity(_))));

    let game = store.get_game(game.game_id).await.unwrap().unwrap();
    assert_eq!(game.status, GameStatus::Running);
    assert_eq!(game.playing_days, 0);
    assert!(store.rank_records().await.unwrap().is_empty());
    // The league still holds only the row that existed before.
    let entry = store.league_entry_for(ana.player_id).await.unwrap().unwrap();
    assert_eq!((entry.points, entry.survived), (6, 5));
    assert_eq!(store.league_participant_count().await.unwrap(), 1);
}

#[tokio::test]
async fn successful_finish_is_counted_once() {
    let store = FlakyStore::default();
    let (game, _) = seed(&store).await;

    let evaluation = evaluate_game(&store, game.game_id, 5, &HashMap::new()).await.unwrap();
    assert_eq!(evaluation.league_rows, 2);
    let stored = store.get_game(game.game_id).await.unwrap().unwrap();
    assert_eq!((stored.status, stored.playing_days), (GameStatus::Finished, 5));
    assert_eq!(store.rank_records().await.unwrap().len(), 2);
}

#[tokio::test]
async fn negative_playing_days_are_rejected() {
    let store = FlakyStore::default();
    let (game, _) = seed(&store).await;

    let err = evaluate_game(&store, game.game_id, -2, &HashMap::new()).await.unwrap_err();
    assert!(matches!(err, GameError::InvalidPlayingDays(-2)));
    let stored = store.get_game(game.game_id).await.unwrap().unwrap();
    assert_eq!((stored.status, stored.playing_days), (GameStatus::Running, 0));
}

#[tokio::test]
async fn stats_fall_back_to_zero_when_the_league_count_fails() {
    let store = FlakyStore { fail_league_count: true, ..FlakyStore::default() };
    let (_, ana) = seed(&store).await;

    let stats = compute_stats(&store).await;
    assert_eq!(stats, GameStats::default());
    let rank = player_rank(&store, &ana, &stats, RankWeights::default()).await.unwrap();
    assert_eq!(rank, 0.0);
}

#[tokio::test]
async fn stats_fall_back_to_zero_when_max_hours_fails() {
    let store = FlakyStore { fail_max_hours: true, ..FlakyStore::default() };
    seed(&store).await;
    assert_eq!(compute_stats(&store).await, GameStats::default());

    let healthy = FlakyStore::default();
    seed(&healthy).await;
    assert_eq!(
        compute_stats(&healthy).await,
        GameStats { count_league_participants: 1, max_hours: 100 }
    );
}
