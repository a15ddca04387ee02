mod common;

use common::{member, singles, draft, TestLedger};
use pretty_assertions::assert_eq;
use pullup_ledger::config::Sport;
use pullup_ledger::domain::Team;
use pullup_ledger::services::{LeaderboardRanker, MatchRecorder, SortKey};

fn seeded_ledger() -> (TestLedger, LeaderboardRanker) {
    let ledger = TestLedger::new();
    let recorder = MatchRecorder::new(ledger.pool.clone(), &ledger.config).unwrap();

    recorder.record_match(&singles(Sport::Tennis, "ana", "ben", 6, 3)).unwrap();
    recorder.record_match(&singles(Sport::Tennis, "cat", "dan", 6, 4)).unwrap();
    recorder.record_match(&singles(Sport::Tennis, "ana", "guest_77", 6, 1)).unwrap();
    recorder.record_match(&singles(Sport::Tennis, "ben", "dan", 6, 6)).unwrap();
    recorder.record_match(&singles(Sport::Pickleball, "zed", "ana", 11, 2)).unwrap();

    let ranker = LeaderboardRanker::new(ledger.pool.clone(), ledger.config.leaderboard.clone());
    (ledger, ranker)
}

fn ids(ranker: &LeaderboardRanker, sort_key: SortKey, min_matches: Option<u32>) -> Vec<String> {
    ranker
        .rank(Sport::Tennis, min_matches, sort_key, None)
        .unwrap()
        .into_iter()
        .map(|row| row.player_id.to_string())
        .collect()
}

#[test]
fn ranks_by_rating_and_hides_guests() {
    let (_ledger, ranker) = seeded_ledger();

    let ranked = ids(&ranker, SortKey::Rating, None);
    assert_eq!(ranked[0], "ana");
    assert!(!ranked.iter().any(|id| id.starts_with("guest_")));
    assert!(!ranked.iter().any(|id| id == "zed"));
    assert_eq!(ranked.len(), 4);
}

#[test]
fn min_matches_filters_light_players() {
    let (_ledger, ranker) = seeded_ledger();

    let ranked = ids(&ranker, SortKey::Wins, Some(2));
    assert_eq!(ranked, vec!["ana", "ben", "dan"]);
}

#[test]
fn zero_min_matches_is_raised_to_one() {
    let (_ledger, ranker) = seeded_ledger();

    assert_eq!(ranker.effective_min_matches(Some(0)), 1);
    assert_eq!(ranker.effective_min_matches(None), 1);
    assert_eq!(ids(&ranker, SortKey::Rating, Some(0)), ids(&ranker, SortKey::Rating, None));
}

#[test]
fn ties_fall_back_to_matches_played_then_id() {
    let (_ledger, ranker) = seeded_ledger();

    // ana 2 wins; cat 1 win; ben, dan 0 wins with 2 matches each
    let ranked = ids(&ranker, SortKey::Wins, None);
    assert_eq!(ranked, vec!["ana", "cat", "ben", "dan"]);
}

#[test]
fn repeated_calls_return_identical_orderings() {
    let (_ledger, ranker) = seeded_ledger();

    for key in SortKey::ALL {
        assert_eq!(ids(&ranker, key, None), ids(&ranker, key, None));
    }
}

#[test]
fn limit_is_capped_by_settings() {
    let ledger = TestLedger::new();
    let recorder = MatchRecorder::new(ledger.pool.clone(), &ledger.config).unwrap();
    for i in 0..30 {
        let roster = vec![member(&format!("a{i:02}"), Team::One), member(&format!("b{i:02}"), Team::Two)];
        recorder.record_match(&draft(Sport::Soccer, 1, 0, roster)).unwrap();
    }

    let ranker = LeaderboardRanker::new(ledger.pool.clone(), ledger.config.leaderboard.clone());
    assert_eq!(ranker.rank(Sport::Soccer, None, SortKey::Rating, None).unwrap().len(), 50);
    assert_eq!(ranker.rank(Sport::Soccer, None, SortKey::Rating, Some(500)).unwrap().len(), 50);
    assert_eq!(ranker.rank(Sport::Soccer, None, SortKey::Rating, Some(5)).unwrap().len(), 5);
    assert!(ranker.rank(Sport::Climbing, None, SortKey::Rating, None).unwrap().is_empty());
}
