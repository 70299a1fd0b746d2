//! League table generation from the persisted per-game ranks.

use crate::database::models::{NewLeagueEntry, RankRecord};
use crate::database::store::LeagueStore;
use crate::error::StoreError;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Sums points and survived days per player and orders the result by
/// `(points, survived)` descending. Each row's `rank` is its 1-based position.
pub fn build_league_table(records: &[RankRecord]) -> Vec<NewLeagueEntry> {
    let mut totals: HashMap<i32, (i64, i64)> = HashMap::new();
    for record in records {
        let entry = totals.entry(record.player_id).or_default();
        entry.0 += i64::from(record.points);
        entry.1 += i64::from(record.survived);
    }

    let mut sorted: Vec<(i32, (i64, i64))> = totals.into_iter().collect();
    // Player id keeps equal totals in a stable order between regenerations.
    sorted.sort_by(|(a_id, a), (b_id, b)| b.cmp(a).then(a_id.cmp(b_id)));

    sorted
        .into_iter()
        .zip(1..)
        .map(|((player_id, (points, survived)), rank)| NewLeagueEntry {
            player_id,
            rank,
            points,
            survived,
        })
        .collect()
}

/// Rebuilds the whole league table. Returns the number of rows written.
#[instrument(level = "debug", skip(store))]
pub async fn regenerate_league_table<S>(store: &S) -> Result<usize, StoreError>
where
    S: LeagueStore + ?Sized,
{
    let records = store.rank_records().await?;
    let table = build_league_table(&records);
    store.replace_league_table(&table).await?;
    for row in &table {
        debug!(
            target = "league.table",
            rank = row.rank,
            player_id = row.player_id,
            points = row.points,
            survived = row.survived
        );
    }
    info!(target = "league.table", rows = table.len(), "league table generated");
    Ok(table.len())
}
