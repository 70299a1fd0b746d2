//! Player rank: a bounded score mixing playing hours and league standing.
//!
//! `rank = w_hours * hours / max_hours + w_league * (1 - (p - 1) / (n - 1))`
//! where `p` is the player's league rank and `n` the league size. The result
//! lies in `[0, w_hours + w_league]` and is scaled by 100 into a task-rating
//! ceiling.

use super::stats::GameStats;
use crate::database::models::Player;
use crate::database::store::LeagueStore;
use crate::error::StoreError;
use tracing::{error, instrument};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankWeights {
    pub hours: f64,
    pub league_position: f64,
}

impl RankWeights {
    pub fn max_rank(&self) -> f64 {
        self.hours + self.league_position
    }

    fn is_valid(&self) -> bool {
        self.hours.is_finite()
            && self.league_position.is_finite()
            && self.hours >= 0.0
            && self.league_position >= 0.0
    }
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            hours: 0.6,
            league_position: 0.4,
        }
    }
}

/// Computes the rank from raw inputs. `league_rank` is the 1-based position
/// of the player's league entry, `None` when the player has none.
pub fn rank(hours: i64, league_rank: Option<i32>, stats: &GameStats, weights: RankWeights) -> f64 {
    if !stats.rank_calculation_possible() {
        return 0.0;
    }
    if !weights.is_valid() || hours < 0 {
        error!(
            target = "league.rank",
            hours,
            hours_type = "i64",
            weight_hours = weights.hours,
            weight_league = weights.league_position,
            weights_type = "f64",
            max_hours = stats.max_hours,
            participants = stats.count_league_participants,
            "rank inputs out of domain; falling back to zero"
        );
        return 0.0;
    }

    let hours_ratio = (hours as f64 / stats.max_hours as f64).clamp(0.0, 1.0);
    let hours_term = weights.hours * hours_ratio;

    let league_term = match league_rank {
        Some(position) if position >= 1 => {
            let share = if stats.count_league_participants <= 1 {
                1.0
            } else {
                1.0 - f64::from(position - 1) / (stats.count_league_participants - 1) as f64
            };
            weights.league_position * share.clamp(0.0, 1.0)
        }
        _ => 0.0,
    };

    hours_term + league_term
}

/// Looks up the player's league entry and ranks them.
#[instrument(level = "debug", skip(store, player), fields(player_id = player.player_id))]
pub async fn player_rank<S>(
    store: &S,
    player: &Player,
    stats: &GameStats,
    weights: RankWeights,
) -> Result<f64, StoreError>
where
    S: LeagueStore + ?Sized,
{
    if !stats.rank_calculation_possible() {
        return Ok(0.0);
    }
    let entry = store.league_entry_for(player.player_id).await?;
    Ok(rank(player.hours, entry.map(|e| e.rank), stats, weights))
}

/// Task rating ceiling for a rank.
pub fn rating_ceiling(rank: f64) -> f64 {
    rank * 100.0
}
