//! Game status transitions.

use crate::database::models::{Game, GameStatus};
use crate::database::store::GameRecordStore;
use crate::error::GameError;
use tracing::{error, info, instrument};

impl GameStatus {
    pub const ALL: [GameStatus; 6] = [
        GameStatus::Created,
        GameStatus::Running,
        GameStatus::Paused,
        GameStatus::Stopped,
        GameStatus::Finished,
        GameStatus::Failure,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
            Self::Stopped => "STOPPED",
            Self::Finished => "FINISHED",
            Self::Failure => "FAILURE",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Created => "🆕",
            Self::Running => "▶️",
            Self::Paused => "⏸️",
            Self::Stopped => "⏹️",
            Self::Finished => "🏁",
            Self::Failure => "❌",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label))
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Failure)
    }

    pub fn can_transition_to(self, next: GameStatus) -> bool {
        use GameStatus::*;
        match (self, next) {
            (from, _) if from.is_terminal() => false,
            (_, Failure) => true,
            (Created, Running | Paused | Stopped) => true,
            (Running, Paused | Stopped | Finished) => true,
            (Paused, Running | Stopped) => true,
            (Stopped, Finished) => true,
            _ => false,
        }
    }

    /// Targets an operator may pick directly. FINISHED is excluded because it
    /// is only reached through evaluation.
    pub fn manual_targets(self) -> Vec<GameStatus> {
        Self::ALL
            .into_iter()
            .filter(|&next| next != GameStatus::Finished && self.can_transition_to(next))
            .collect()
    }
}

/// Moves a game to `to` after validating the transition.
#[instrument(level = "debug", skip(store))]
pub async fn transition_game<S>(store: &S, game_id: i32, to: GameStatus) -> Result<Game, GameError>
where
    S: GameRecordStore + ?Sized,
{
    if to == GameStatus::Finished {
        return Err(GameError::EvaluationRequired);
    }
    let game = store
        .get_game(game_id)
        .await?
        .ok_or(GameError::GameNotFound(game_id))?;
    if !game.status.can_transition_to(to) {
        return Err(GameError::InvalidTransition {
            from: game.status,
            to,
        });
    }
    store.set_game_status(game_id, to).await?;
    info!(
        target = "game.lifecycle",
        game_id,
        from = game.status.label(),
        to = to.label(),
        "status changed"
    );
    Ok(Game { status: to, ..game })
}

/// Best-effort move to FAILURE; a store error here is only logged.
pub(crate) async fn mark_failed<S>(store: &S, game: &Game)
where
    S: GameRecordStore + ?Sized,
{
    if !game.status.can_transition_to(GameStatus::Failure) {
        return;
    }
    if let Err(e) = store.set_game_status(game.game_id, GameStatus::Failure).await {
        error!(target = "game.lifecycle", game_id = game.game_id, error = %e, "could not mark game as failed");
    } else {
        info!(target = "game.lifecycle", game_id = game.game_id, "game marked as failed");
    }
}
