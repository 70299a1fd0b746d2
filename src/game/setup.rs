//! Handing out quests when a game starts.

use super::catalog::tasks_by_rating_ceiling;
use super::lifecycle::{mark_failed, transition_game};
use super::messenger::QuestMessenger;
use super::selector::ExclusionSet;
use crate::config::GameConfig;
use crate::constants::QUEST_MARKERS;
use crate::database::models::{Game, GameStatus, Player, Task, TaskType};
use crate::database::store::GameStore;
use crate::error::{DeliveryError, GameError, StoreError};
use crate::league::{GameStats, compute_stats, player_rank, rating_ceiling};
use rand::Rng;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// What one player received.
#[derive(Debug, Clone)]
pub struct PlayerAssignment {
    pub player: Player,
    pub rank: f64,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Error)]
pub enum SetupFailure {
    #[error("no players were given")]
    NoPlayers,

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("no tasks available up to rating {ceiling:.1}")]
    NoCandidates { ceiling: f64 },

    #[error("player {player_id} is not linked to game {game_id}")]
    MissingAssociation { game_id: i32, player_id: i32 },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("quests were delivered but the game could not start: {0}")]
    Start(GameError),
}

#[derive(Debug)]
pub enum SetupOutcome {
    Ready(Vec<PlayerAssignment>),
    Failed {
        /// The player being processed when setup stopped, if any.
        player: Option<Player>,
        reason: SetupFailure,
    },
}

impl SetupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Assigns and delivers quests to every player of `game`.
///
/// Players are served in descending order of playing hours so the most
/// experienced ones draw first from the single-use tasks. On any failure the
/// game is moved to FAILURE and nothing further is sent.
#[instrument(level = "info", skip_all, fields(game_id = game.game_id, players = players.len()))]
pub async fn initialize_game<S, M, R>(
    store: &S,
    messenger: &M,
    config: &GameConfig,
    game: &Game,
    mut players: Vec<Player>,
    rng: &mut R,
) -> SetupOutcome
where
    S: GameStore + ?Sized,
    M: QuestMessenger + ?Sized,
    R: Rng + Send + ?Sized,
{
    if players.is_empty() {
        return fail(store, game, None, SetupFailure::NoPlayers).await;
    }

    let stats = compute_stats(store).await;
    players.sort_by(|a, b| b.hours.cmp(&a.hours).then(a.player_id.cmp(&b.player_id)));

    let exclusions = ExclusionSet::new();
    let mut assignments = Vec::with_capacity(players.len());
    for player in players {
        match assign_player(store, messenger, config, game, &player, &stats, &exclusions, rng).await {
            Ok((rank, tasks)) => assignments.push(PlayerAssignment { player, rank, tasks }),
            Err(reason) => return fail(store, game, Some(player), reason).await,
        }
    }

    info!(target = "game.setup", game_id = game.game_id, assigned = assignments.len(), "quests delivered");
    SetupOutcome::Ready(assignments)
}

/// Runs [`initialize_game`] and, once every player has their quests, moves
/// the game to RUNNING and posts the roster to the game channel. A failed
/// setup announces nothing.
pub async fn start_game<S, M, R>(
    store: &S,
    messenger: &M,
    config: &GameConfig,
    game: &Game,
    players: Vec<Player>,
    rng: &mut R,
) -> SetupOutcome
where
    S: GameStore + ?Sized,
    M: QuestMessenger + ?Sized,
    R: Rng + Send + ?Sized,
{
    let roster = players.clone();
    let assignments = match initialize_game(store, messenger, config, game, players, rng).await {
        SetupOutcome::Ready(assignments) => assignments,
        failed => return failed,
    };
    if let Err(e) = transition_game(store, game.game_id, GameStatus::Running).await {
        return fail(store, game, None, SetupFailure::Start(e)).await;
    }

    match messenger.announce(&format_game_summary(game, &roster)).await {
        Ok(message_id) => {
            if let Err(e) = store.set_game_message(game.game_id, message_id).await {
                warn!(target = "game.setup", game_id = game.game_id, error = %e, "could not store summary message id");
            }
        }
        Err(e) => warn!(target = "game.setup", game_id = game.game_id, error = %e, "could not post game summary"),
    }
    SetupOutcome::Ready(assignments)
}

#[allow(clippy::too_many_arguments)]
async fn assign_player<S, M, R>(
    store: &S,
    messenger: &M,
    config: &GameConfig,
    game: &Game,
    player: &Player,
    stats: &GameStats,
    exclusions: &ExclusionSet,
    rng: &mut R,
) -> Result<(f64, Vec<Task>), SetupFailure>
where
    S: GameStore + ?Sized,
    M: QuestMessenger + ?Sized,
    R: Rng + Send + ?Sized,
{
    messenger.resolve_member(player).await?;

    let rank = player_rank(store, player, stats, config.weights).await?;
    let ceiling = rating_ceiling(rank);
    let candidates = tasks_by_rating_ceiling(store, ceiling, TaskType::Task).await;
    if candidates.is_empty() {
        return Err(SetupFailure::NoCandidates { ceiling });
    }

    let mut tasks = exclusions.select(&candidates, rng).await;
    tasks.truncate(config.num_quests);
    if tasks.is_empty() {
        return Err(SetupFailure::NoCandidates { ceiling });
    }

    let association = store
        .association(game.game_id, player.player_id)
        .await?
        .ok_or(SetupFailure::MissingAssociation {
            game_id: game.game_id,
            player_id: player.player_id,
        })?;
    let task_ids: Vec<i32> = tasks.iter().map(|t| t.task_id).collect();
    store.insert_quests(association.association_id, &task_ids).await?;

    let message = format_quest_message(&player.name, &game.name, &tasks);
    messenger.deliver(player, &message).await?;

    info!(
        target = "game.setup",
        player_id = player.player_id,
        rank,
        quests = tasks.len(),
        "player assigned"
    );
    Ok((rank, tasks))
}

async fn fail<S>(store: &S, game: &Game, player: Option<Player>, reason: SetupFailure) -> SetupOutcome
where
    S: GameStore + ?Sized,
{
    error!(
        target = "game.setup",
        game_id = game.game_id,
        player_id = player.as_ref().map(|p| p.player_id),
        error = %reason,
        "game setup failed"
    );
    mark_failed(store, game).await;
    SetupOutcome::Failed { player, reason }
}

/// The private message listing a player's quests.
pub fn format_quest_message(player_name: &str, game_name: &str, tasks: &[Task]) -> String {
    let mut msg = format!(
        "Hello {player_name}, you are now in the game \"{game_name}\". You have to complete the following quests:"
    );
    for (marker, task) in QUEST_MARKERS.iter().zip(tasks) {
        msg.push_str(&format!("\n{marker} {}: {}", task.name, task.description));
    }
    msg
}

/// The channel announcement listing who plays.
pub fn format_game_summary(game: &Game, players: &[Player]) -> String {
    let mut msg = format!(
        "The players for game (ID: {}) \"{}\" are:",
        game.game_id, game.name
    );
    for player in players {
        msg.push_str(&format!(
            "\n<@{}> with {} playing hours.",
            player.discord_id, player.hours
        ));
    }
    msg.push_str("\nEach player now receives a private message with the tasks.");
    msg
}
