use taskhunt_bot::database::MemoryStore;
use taskhunt_bot::database::models::NewLeagueEntry;
use taskhunt_bot::database::store::{LeagueStore, PlayerStore};
use taskhunt_bot::league::{GameStats, RankWeights, compute_stats, player_rank, rank, rating_ceiling};

#[test]
fn empty_stats_always_rank_zero() {
    let weights = RankWeights::default();
    for stats in [
        GameStats { count_league_participants: 0, max_hours: 500 },
        GameStats { count_league_participants: 8, max_hours: 0 },
        GameStats::default(),
    ] {
        assert_eq!(rank(120, Some(1), &stats, weights), 0.0);
        assert_eq!(rank(0, None, &stats, weights), 0.0);
    }
}

#[test]
fn rank_stays_within_weight_sum() {
    let weights = RankWeights { hours: 0.7, league_position: 0.5 };
    let stats = GameStats { count_league_participants: 6, max_hours: 200 };
    for hours in [0, 1, 99, 200, 450] {
        for position in [None, Some(1), Some(3), Some(6), Some(9)] {
            let r = rank(hours, position, &stats, weights);
            assert!(r >= 0.0, "rank {r} below zero for hours={hours} position={position:?}");
            assert!(r <= weights.max_rank() + 1e-12, "rank {r} above max");
        }
    }
}

#[test]
fn league_leader_with_most_hours_gets_maximum() {
    let weights = RankWeights::default();
    let stats = GameStats { count_league_participants: 5, max_hours: 80 };
    let r = rank(80, Some(1), &stats, weights);
    assert!((r - weights.max_rank()).abs() < 1e-12);
}

#[tokio::test]
async fn second_place_player_from_store() {
    let store = MemoryStore::new();
    let ana = store.upsert_player(1, "Ana", 100).await.unwrap();
    let bo = store.upsert_player(2, "Bo", 50).await.unwrap();
    let cy = store.upsert_player(3, "Cy", 10).await.unwrap();
    let di = store.upsert_player(4, "Di", 5).await.unwrap();
    let table: Vec<NewLeagueEntry> = [cy.player_id, bo.player_id, ana.player_id, di.player_id]
        .into_iter()
        .zip(1..)
        .map(|(player_id, rank)| NewLeagueEntry { player_id, rank, points: 0, survived: 0 })
        .collect();
    store.replace_league_table(&table).await.unwrap();

    let stats = compute_stats(&store).await;
    assert_eq!(stats, GameStats { count_league_participants: 4, max_hours: 100 });

    let r = player_rank(&store, &bo, &stats, RankWeights::default()).await.unwrap();
    // 0.6 * 50/100 + 0.4 * (1 - 1/3)
    assert!((r - 0.566_666_7).abs() < 1e-6);
    assert!((rating_ceiling(r) - 56.67).abs() < 0.01);
}

#[tokio::test]
async fn player_without_league_entry_ranks_on_hours_only() {
    let store = MemoryStore::new();
    let ana = store.upsert_player(1, "Ana", 100).await.unwrap();
    let bo = store.upsert_player(2, "Bo", 25).await.unwrap();
    store
        .replace_league_table(&[NewLeagueEntry { player_id: ana.player_id, rank: 1, points: 6, survived: 7 }])
        .await
        .unwrap();

    let stats = compute_stats(&store).await;
    let r = player_rank(&store, &bo, &stats, RankWeights::default()).await.unwrap();
    assert!((r - 0.15).abs() < 1e-9);
}

#[tokio::test]
async fn zero_hours_keep_the_stored_value() {
    let store = MemoryStore::new();
    let first = store.upsert_player(7, "Ana", 40).await.unwrap();
    let again = store.upsert_player(7, "Ana B.", 0).await.unwrap();
    assert_eq!(again.player_id, first.player_id);
    assert_eq!(again.hours, 40);

    let stored = store.get_player(first.player_id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Ana B.");
    assert_eq!(store.max_player_hours().await.unwrap(), 40);
}
