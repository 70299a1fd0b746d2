use taskhunt_bot::database::MemoryStore;
use taskhunt_bot::database::models::{NewLeagueEntry, NewRank, RankRecord};
use taskhunt_bot::database::store::{GameRecordStore, LeagueStore, PlayerStore};
use taskhunt_bot::error::StoreError;
use taskhunt_bot::league::{build_league_table, regenerate_league_table};

#[test]
fn totals_are_summed_across_games() {
    let records = [
        RankRecord { player_id: 1, points: 6, survived: 7 },
        RankRecord { player_id: 2, points: 5, survived: 7 },
        RankRecord { player_id: 1, points: 4, survived: 2 },
    ];
    let table = build_league_table(&records);
    assert_eq!(table.len(), 2);
    assert_eq!(
        table[0],
        NewLeagueEntry { player_id: 1, rank: 1, points: 10, survived: 9 }
    );
    assert_eq!(table[1].rank, 2);
}

#[test]
fn equal_totals_fall_back_to_player_id() {
    let records = [
        RankRecord { player_id: 9, points: 3, survived: 3 },
        RankRecord { player_id: 4, points: 3, survived: 3 },
    ];
    let table = build_league_table(&records);
    assert_eq!(table[0].player_id, 4);
    assert_eq!(table[1].player_id, 9);
}

#[tokio::test]
async fn survived_days_break_ties_on_points() {
    let store = MemoryStore::new();
    let a = store.upsert_player(1, "A", 10).await.unwrap();
    let b = store.upsert_player(2, "B", 10).await.unwrap();
    let c = store.upsert_player(3, "C", 10).await.unwrap();
    let game = store
        .create_game("league", &[a.player_id, b.player_id, c.player_id])
        .await
        .unwrap();

    let mut ranks = Vec::new();
    for (player, points, survived) in [(&a, 10, 3), (&b, 15, 1), (&c, 15, 5)] {
        let association = store.association(game.game_id, player.player_id).await.unwrap().unwrap();
        ranks.push(NewRank { association_id: association.association_id, placement: 1, points, survived });
    }
    store.finish_game(game.game_id, 5, &ranks).await.unwrap();

    assert_eq!(regenerate_league_table(&store).await.unwrap(), 3);
    let names: Vec<String> = store
        .league_standings()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["C", "B", "A"]);

    // Regenerating again replaces instead of appending.
    assert_eq!(regenerate_league_table(&store).await.unwrap(), 3);
    assert_eq!(store.league_participant_count().await.unwrap(), 3);
    let c_entry = store.league_entry_for(c.player_id).await.unwrap().unwrap();
    assert_eq!((c_entry.rank, c_entry.points, c_entry.survived), (1, 15, 5));
}

#[tokio::test]
async fn duplicate_rows_leave_the_table_untouched() {
    let store = MemoryStore::new();
    let existing = NewLeagueEntry { player_id: 1, rank: 1, points: 6, survived: 2 };
    store.replace_league_table(&[existing]).await.unwrap();

    let duplicated = [
        NewLeagueEntry { player_id: 2, rank: 1, points: 9, survived: 1 },
        NewLeagueEntry { player_id: 2, rank: 2, points: 1, survived: 1 },
    ];
    let err = store.replace_league_table(&duplicated).await.unwrap_err();
    assert!(matches!(err, StoreError::Integrity(_)));
    assert!(store.league_entry_for(1).await.unwrap().is_some());
    assert_eq!(store.league_participant_count().await.unwrap(), 1);
}
