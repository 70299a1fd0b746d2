//! Normalization constants for the rank formula.

use crate::database::store::{LeagueStore, PlayerStore};
use tracing::{debug, error, instrument};

/// Snapshot of the two global aggregates a ranking pass needs. Only valid for
/// the pass it was computed for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub count_league_participants: i64,
    pub max_hours: i64,
}

impl GameStats {
    /// Ranking needs at least one league entry and one player with hours.
    pub fn rank_calculation_possible(&self) -> bool {
        self.count_league_participants > 0 && self.max_hours > 0
    }
}

/// Reads the league size and the highest `hours` value.
///
/// Never fails: a store error is logged and the pass continues with zeroed
/// stats, which makes every rank collapse to `0.0`.
#[instrument(level = "debug", skip(store))]
pub async fn compute_stats<S>(store: &S) -> GameStats
where
    S: LeagueStore + PlayerStore + ?Sized,
{
    let count = match store.league_participant_count().await {
        Ok(count) => count,
        Err(e) => {
            error!(target = "league.stats", error = %e, "league count failed; using zero stats");
            return GameStats::default();
        }
    };
    let max_hours = match store.max_player_hours().await {
        Ok(max) => max,
        Err(e) => {
            error!(target = "league.stats", error = %e, "max hours failed; using zero stats");
            return GameStats::default();
        }
    };
    let stats = GameStats {
        count_league_participants: count.max(0),
        max_hours: max_hours.max(0),
    };
    debug!(
        target = "league.stats",
        participants = stats.count_league_participants,
        max_hours = stats.max_hours
    );
    stats
}
