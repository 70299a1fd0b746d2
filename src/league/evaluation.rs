//! Finishing a game: placements, points, and the league refresh that follows.

use super::table::regenerate_league_table;
use crate::constants::POINTS_FOR_FIRST;
use crate::database::models::{Game, GameStatus, NewRank, Participant};
use crate::database::store::GameStore;
use crate::error::GameError;
use std::collections::HashMap;
use tracing::{info, instrument};

/// What a participant achieved in one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerOutcome {
    pub association_id: i32,
    pub completed: i64,
    pub survived: i32,
}

/// Points awarded for a placement; one less per placement step, never negative.
pub fn points_for(placement: i32) -> i32 {
    (POINTS_FOR_FIRST - (placement - 1)).max(0)
}

/// Orders outcomes by completed quests, then survived days. Identical results
/// share a placement and the next distinct result takes the next placement.
pub fn placements(outcomes: &[PlayerOutcome]) -> Vec<NewRank> {
    let mut ordered: Vec<&PlayerOutcome> = outcomes.iter().collect();
    ordered.sort_by(|a, b| {
        (b.completed, b.survived)
            .cmp(&(a.completed, a.survived))
            .then(a.association_id.cmp(&b.association_id))
    });

    let mut ranks = Vec::with_capacity(ordered.len());
    let mut placement = 0;
    let mut previous = None;
    for outcome in ordered {
        let key = (outcome.completed, outcome.survived);
        if previous != Some(key) {
            placement += 1;
            previous = Some(key);
        }
        ranks.push(NewRank {
            association_id: outcome.association_id,
            placement,
            points: points_for(placement),
            survived: outcome.survived,
        });
    }
    ranks
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub game: Game,
    pub standings: Vec<(Participant, NewRank)>,
    pub league_rows: usize,
}

/// Scores a running or stopped game, finishes it and regenerates the league.
///
/// Every participant survived `playing_days` unless `survived_overrides`
/// (keyed by Discord id) says otherwise.
#[instrument(level = "debug", skip(store, survived_overrides))]
pub async fn evaluate_game<S>(
    store: &S,
    game_id: i32,
    playing_days: i32,
    survived_overrides: &HashMap<i64, i32>,
) -> Result<Evaluation, GameError>
where
    S: GameStore + ?Sized,
{
    if playing_days < 0 {
        return Err(GameError::InvalidPlayingDays(playing_days));
    }
    let game = store
        .get_game(game_id)
        .await?
        .ok_or(GameError::GameNotFound(game_id))?;
    if !game.status.can_transition_to(GameStatus::Finished) {
        return Err(GameError::InvalidTransition {
            from: game.status,
            to: GameStatus::Finished,
        });
    }

    let participants = store.game_participants(game_id).await?;
    let outcomes: Vec<PlayerOutcome> = participants
        .iter()
        .map(|p| PlayerOutcome {
            association_id: p.association_id,
            completed: p.completed,
            survived: survived_overrides
                .get(&p.discord_id)
                .copied()
                .unwrap_or(playing_days)
                .max(0),
        })
        .collect();
    let ranks = placements(&outcomes);

    store.finish_game(game_id, playing_days, &ranks).await?;
    info!(target = "game.evaluate", game_id, players = ranks.len(), "game finished");

    let league_rows = regenerate_league_table(store).await?;

    let standings = ranks
        .into_iter()
        .filter_map(|rank| {
            participants
                .iter()
                .find(|p| p.association_id == rank.association_id)
                .map(|p| (p.clone(), rank))
        })
        .collect();

    Ok(Evaluation {
        game: Game {
            status: GameStatus::Finished,
            playing_days,
            ..game
        },
        standings,
        league_rows,
    })
}
