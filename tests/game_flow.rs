use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use taskhunt_bot::config::GameConfig;
use taskhunt_bot::database::MemoryStore;
use taskhunt_bot::database::models::{Game, GameStatus, NewTask, Player, TaskType};
use taskhunt_bot::database::store::{GameRecordStore, LeagueStore, PlayerStore, TaskCatalogStore};
use taskhunt_bot::error::{DeliveryError, GameError};
use taskhunt_bot::game::{
    QuestMessenger, SetupFailure, SetupOutcome, initialize_game, start_game, transition_game,
};
use taskhunt_bot::league::evaluate_game;

#[derive(Default)]
struct FakeMessenger {
    unknown: HashSet<i64>,
    unreachable: HashSet<i64>,
    sent: Mutex<Vec<(i64, String)>>,
    announced: Mutex<Vec<String>>,
}

impl FakeMessenger {
    fn recipients(&self) -> Vec<i64> {
        self.sent.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }
}

#[async_trait]
impl QuestMessenger for FakeMessenger {
    async fn resolve_member(&self, player: &Player) -> Result<(), DeliveryError> {
        if self.unknown.contains(&player.discord_id) {
            return Err(DeliveryError::UnknownMember { discord_id: player.discord_id });
        }
        Ok(())
    }

    async fn deliver(&self, player: &Player, content: &str) -> Result<(), DeliveryError> {
        if self.unreachable.contains(&player.discord_id) {
            return Err(DeliveryError::Send {
                discord_id: player.discord_id,
                reason: "Cannot send messages to this user".into(),
            });
        }
        self.sent.lock().unwrap().push((player.discord_id, content.to_string()));
        Ok(())
    }

    async fn announce(&self, content: &str) -> Result<i64, DeliveryError> {
        // The roster must only go out once every quest was delivered.
        assert_eq!(self.sent.lock().unwrap().len(), 3, "announced before all quests were sent");
        let mut announced = self.announced.lock().unwrap();
        announced.push(content.to_string());
        Ok(1_000 + announced.len() as i64)
    }
}

async fn seed_catalog(store: &MemoryStore) {
    for i in 0..25 {
        let task = NewTask {
            name: format!("task-{i}"),
            description: format!("Do thing {i}"),
            rating: i * 4,
            active: true,
            once: i % 2 == 0,
            task_type: TaskType::Task,
        };
        store.upsert_task(&task).await.unwrap();
    }
}

/// Three players with 10, 100 and 50 hours, linked to a fresh game.
async fn seed_game(store: &MemoryStore) -> (Game, Vec<Player>) {
    let mut players = Vec::new();
    for (discord_id, name, hours) in [(10, "Cy", 10), (20, "Ana", 100), (30, "Bo", 50)] {
        players.push(store.upsert_player(discord_id, name, hours).await.unwrap());
    }
    let ids: Vec<i32> = players.iter().map(|p| p.player_id).collect();
    let game = store.create_game("Fast and hungry, task hunt", &ids).await.unwrap();
    (game, players)
}

async fn status_of(store: &MemoryStore, game_id: i32) -> GameStatus {
    store.get_game(game_id).await.unwrap().unwrap().status
}

#[tokio::test]
async fn quests_are_delivered_by_descending_hours() {
    let store = MemoryStore::new();
    seed_catalog(&store).await;
    let (game, players) = seed_game(&store).await;
    let messenger = FakeMessenger::default();
    let mut rng = StdRng::seed_from_u64(42);

    let outcome = initialize_game(&store, &messenger, &GameConfig::default(), &game, players, &mut rng).await;
    let assignments = match outcome {
        SetupOutcome::Ready(assignments) => assignments,
        other => panic!("setup failed: {other:?}"),
    };

    assert_eq!(messenger.recipients(), vec![20, 30, 10]);
    let mut once_seen = HashSet::new();
    for assignment in &assignments {
        assert!(!assignment.tasks.is_empty());
        assert!(assignment.tasks.len() <= 5);
        for task in assignment.tasks.iter().filter(|t| t.once) {
            assert!(once_seen.insert(task.task_id), "single-use task {} repeated", task.task_id);
        }
        let association = store
            .association(game.game_id, assignment.player.player_id)
            .await
            .unwrap()
            .unwrap();
        let first = store.complete_quest(association.association_id, 1).await.unwrap().unwrap();
        assert_eq!(first.task_id, assignment.tasks[0].task_id);
    }

    let (_, message) = &messenger.sent.lock().unwrap()[0];
    assert!(message.starts_with("Hello Ana, you are now in the game"));
    assert!(message.contains("1️⃣"));
}

#[tokio::test]
async fn quest_count_is_capped_by_config() {
    let store = MemoryStore::new();
    seed_catalog(&store).await;
    let (game, players) = seed_game(&store).await;
    let messenger = FakeMessenger::default();
    let config = GameConfig { num_quests: 2, ..GameConfig::default() };

    let outcome = initialize_game(&store, &messenger, &config, &game, players, &mut StdRng::seed_from_u64(1)).await;
    let SetupOutcome::Ready(assignments) = outcome else {
        panic!("setup failed");
    };
    assert!(assignments.iter().all(|a| a.tasks.len() <= 2));
}

#[tokio::test]
async fn unknown_member_fails_the_game() {
    let store = MemoryStore::new();
    seed_catalog(&store).await;
    let (game, players) = seed_game(&store).await;
    let messenger = FakeMessenger { unknown: HashSet::from([30]), ..FakeMessenger::default() };

    let outcome = initialize_game(&store, &messenger, &GameConfig::default(), &game, players, &mut StdRng::seed_from_u64(2)).await;
    assert!(!outcome.is_success());
    match outcome {
        SetupOutcome::Failed { player, reason } => {
            assert_eq!(player.map(|p| p.discord_id), Some(30));
            assert!(matches!(reason, SetupFailure::Delivery(DeliveryError::UnknownMember { discord_id: 30 })));
        }
        SetupOutcome::Ready(_) => unreachable!(),
    }
    // Ana had the most hours and was served before Bo.
    assert_eq!(messenger.recipients(), vec![20]);
    assert_eq!(status_of(&store, game.game_id).await, GameStatus::Failure);
}

#[tokio::test]
async fn failed_direct_message_stops_later_players() {
    let store = MemoryStore::new();
    seed_catalog(&store).await;
    let (game, players) = seed_game(&store).await;
    let messenger = FakeMessenger { unreachable: HashSet::from([30]), ..FakeMessenger::default() };

    let outcome = initialize_game(&store, &messenger, &GameConfig::default(), &game, players, &mut StdRng::seed_from_u64(4)).await;
    match outcome {
        SetupOutcome::Failed { player, reason } => {
            assert_eq!(player.map(|p| p.discord_id), Some(30));
            assert!(matches!(reason, SetupFailure::Delivery(DeliveryError::Send { discord_id: 30, .. })));
        }
        SetupOutcome::Ready(_) => panic!("setup should fail when a direct message bounces"),
    }
    // Cy has the fewest hours and is never reached.
    assert_eq!(messenger.recipients(), vec![20]);
    assert_eq!(status_of(&store, game.game_id).await, GameStatus::Failure);
}

#[tokio::test]
async fn started_game_is_announced_after_delivery() {
    let store = MemoryStore::new();
    seed_catalog(&store).await;
    let (game, players) = seed_game(&store).await;
    let messenger = FakeMessenger::default();

    let outcome = start_game(&store, &messenger, &GameConfig::default(), &game, players, &mut StdRng::seed_from_u64(5)).await;
    assert!(outcome.is_success());

    let announced = messenger.announced.lock().unwrap().clone();
    assert_eq!(announced.len(), 1);
    assert!(announced[0].contains("<@20> with 100 playing hours."));
    let stored = store.get_game(game.game_id).await.unwrap().unwrap();
    assert_eq!(stored.status, GameStatus::Running);
    assert_eq!(stored.message_id, Some(1_001));
}

#[tokio::test]
async fn failed_start_announces_nothing() {
    let store = MemoryStore::new();
    seed_catalog(&store).await;
    let (game, players) = seed_game(&store).await;
    let messenger = FakeMessenger { unknown: HashSet::from([10]), ..FakeMessenger::default() };

    let outcome = start_game(&store, &messenger, &GameConfig::default(), &game, players, &mut StdRng::seed_from_u64(6)).await;
    assert!(!outcome.is_success());
    assert!(messenger.announced.lock().unwrap().is_empty());
    let stored = store.get_game(game.game_id).await.unwrap().unwrap();
    assert_eq!(stored.status, GameStatus::Failure);
    assert_eq!(stored.message_id, None);
}

#[tokio::test]
async fn empty_catalog_fails_the_game() {
    let store = MemoryStore::new();
    let (game, players) = seed_game(&store).await;
    let messenger = FakeMessenger::default();

    let outcome = initialize_game(&store, &messenger, &GameConfig::default(), &game, players, &mut StdRng::seed_from_u64(3)).await;
    assert!(matches!(
        outcome,
        SetupOutcome::Failed { reason: SetupFailure::NoCandidates { .. }, .. }
    ));
    assert!(messenger.recipients().is_empty());
    assert_eq!(status_of(&store, game.game_id).await, GameStatus::Failure);
}

#[tokio::test]
async fn lifecycle_follows_allowed_transitions() {
    let store = MemoryStore::new();
    let (game, _) = seed_game(&store).await;

    for next in [GameStatus::Running, GameStatus::Paused, GameStatus::Running, GameStatus::Stopped] {
        let updated = transition_game(&store, game.game_id, next).await.unwrap();
        assert_eq!(updated.status, next);
    }
    let err = transition_game(&store, game.game_id, GameStatus::Running).await.unwrap_err();
    assert!(matches!(
        err,
        GameError::InvalidTransition { from: GameStatus::Stopped, to: GameStatus::Running }
    ));
    assert_eq!(status_of(&store, game.game_id).await, GameStatus::Stopped);

    let err = transition_game(&store, game.game_id, GameStatus::Finished).await.unwrap_err();
    assert!(matches!(err, GameError::EvaluationRequired));
    assert!(matches!(
        transition_game(&store, 9_999, GameStatus::Paused).await.unwrap_err(),
        GameError::GameNotFound(9_999)
    ));
}

#[tokio::test]
async fn evaluation_scores_players_and_refreshes_the_league() {
    let store = MemoryStore::new();
    seed_catalog(&store).await;
    let (game, players) = seed_game(&store).await;
    let messenger = FakeMessenger::default();
    let outcome = initialize_game(&store, &messenger, &GameConfig::default(), &game, players.clone(), &mut StdRng::seed_from_u64(9)).await;
    assert!(outcome.is_success());

    // A created game cannot be scored yet.
    assert!(matches!(
        evaluate_game(&store, game.game_id, 7, &HashMap::new()).await.unwrap_err(),
        GameError::InvalidTransition { from: GameStatus::Created, .. }
    ));
    transition_game(&store, game.game_id, GameStatus::Running).await.unwrap();

    let by_name: HashMap<&str, &Player> = players.iter().map(|p| (p.name.as_str(), p)).collect();
    for (name, positions) in [("Cy", vec![1, 2]), ("Bo", vec![1])] {
        let association = store
            .association(game.game_id, by_name[name].player_id)
            .await
            .unwrap()
            .unwrap();
        for position in positions {
            assert!(store.complete_quest(association.association_id, position).await.unwrap().is_some());
        }
    }

    // Ana dropped out after three days.
    let overrides = HashMap::from([(20_i64, 3)]);
    let evaluation = evaluate_game(&store, game.game_id, 7, &overrides).await.unwrap();
    let summary: Vec<(&str, i32, i32, i32)> = evaluation
        .standings
        .iter()
        .map(|(p, r)| (p.name.as_str(), r.placement, r.points, r.survived))
        .collect();
    assert_eq!(summary, vec![("Cy", 1, 6, 7), ("Bo", 2, 5, 7), ("Ana", 3, 4, 3)]);
    assert_eq!(evaluation.game.playing_days, 7);
    assert_eq!(status_of(&store, game.game_id).await, GameStatus::Finished);

    let names: Vec<String> = store.league_standings().await.unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["Cy", "Bo", "Ana"]);

    assert!(matches!(
        evaluate_game(&store, game.game_id, 7, &HashMap::new()).await.unwrap_err(),
        GameError::InvalidTransition { from: GameStatus::Finished, .. }
    ));
}
