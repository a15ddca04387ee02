mod common;

use std::sync::Arc;
use std::thread;

use common::{draft, guest, member, singles, TestLedger};
use pretty_assertions::assert_eq;
use pullup_ledger::config::{AppConfig, Sport};
use pullup_ledger::database;
use pullup_ledger::domain::{Participant, PlayerId, RosterEntry, Team};
use pullup_ledger::errors::LedgerError;
use pullup_ledger::services::MatchRecorder;

fn recorder(ledger: &TestLedger) -> MatchRecorder {
    MatchRecorder::new(ledger.pool.clone(), &ledger.config).unwrap()
}

#[test]
fn singles_win_moves_both_ratings_by_sixteen() {
    let ledger = TestLedger::new();
    let recorder = recorder(&ledger);

    let match_id = recorder.record_match(&singles(Sport::Pickleball, "p1", "p2", 11, 5)).unwrap();

    let stats = recorder.stats();
    let p1 = stats.get(&PlayerId::new("p1"), Sport::Pickleball).unwrap();
    let p2 = stats.get(&PlayerId::new("p2"), Sport::Pickleball).unwrap();

    assert_eq!((p1.rating, p1.highest_rating, p1.wins, p1.losses), (1216, 1216, 1, 0));
    assert_eq!((p2.rating, p2.highest_rating, p2.wins, p2.losses), (1184, 1200, 0, 1));
    assert_eq!((p1.points_scored, p1.points_conceded), (11, 5));
    assert_eq!((p2.points_scored, p2.points_conceded), (5, 11));

    let stored = recorder.find(match_id).unwrap();
    assert_eq!(stored.team1_score, 11);
    assert_eq!(stored.roster.len(), 2);
}

#[test]
fn equal_draw_leaves_ratings_alone() {
    let ledger = TestLedger::new();
    let recorder = recorder(&ledger);

    recorder.record_match(&singles(Sport::Soccer, "p1", "p2", 2, 2)).unwrap();

    for id in ["p1", "p2"] {
        let row = recorder.stats().get(&PlayerId::new(id), Sport::Soccer).unwrap();
        assert_eq!(row.rating, 1200);
        assert_eq!((row.matches_played, row.draws), (1, 1));
    }
}

#[test]
fn guest_only_side_plays_at_seed_and_gets_no_row() {
    let ledger = TestLedger::new();
    let recorder = recorder(&ledger);

    let roster = vec![member("p1", Team::One), guest("Walk-on", Team::Two)];
    let match_id = recorder.record_match(&draft(Sport::Spikeball, 21, 17, roster)).unwrap();

    let p1 = recorder.stats().get(&PlayerId::new("p1"), Sport::Spikeball).unwrap();
    assert_eq!(p1.rating, 1216);
    assert_eq!(ledger.count("player_stats"), 1);

    let stored = recorder.find(match_id).unwrap();
    assert_eq!(stored.roster[1], RosterEntry::new(Participant::guest("Walk-on", None), Team::Two));
}

#[test]
fn doubles_members_share_their_team_delta() {
    let ledger = TestLedger::new();
    let recorder = recorder(&ledger);

    let roster = vec![
        member("p1", Team::One),
        member("p2", Team::One),
        member("p3", Team::Two),
        guest("Sam", Team::Two),
    ];
    recorder.record_match(&draft(Sport::Volleyball, 25, 20, roster)).unwrap();

    let rating = |id: &str| recorder.stats().get(&PlayerId::new(id), Sport::Volleyball).unwrap().rating;
    assert_eq!(rating("p1"), 1216);
    assert_eq!(rating("p2"), 1216);
    assert_eq!(rating("p3"), 1184);
}

#[test]
fn sports_are_rated_independently() {
    let ledger = TestLedger::new();
    let recorder = recorder(&ledger);

    recorder.record_match(&singles(Sport::Tennis, "p1", "p2", 6, 2)).unwrap();
    recorder.record_match(&singles(Sport::Badminton, "p2", "p1", 21, 10)).unwrap();

    let stats = recorder.stats().for_player(&PlayerId::new("p1")).unwrap();
    let ratings: Vec<_> = stats.iter().map(|r| (r.sport, r.rating)).collect();
    assert_eq!(ratings, vec![(Sport::Badminton, 1184), (Sport::Tennis, 1216)]);
}

#[test]
fn rating_never_drops_below_floor() {
    let ledger = TestLedger::new();
    let mut config = AppConfig::new();
    config.rating.seed_rating = 110;
    let recorder = MatchRecorder::new(ledger.pool.clone(), &config).unwrap();

    recorder.record_match(&singles(Sport::Basketball, "p1", "p2", 30, 12)).unwrap();

    let loser = recorder.stats().get(&PlayerId::new("p2"), Sport::Basketball).unwrap();
    assert_eq!(loser.rating, 100);
}

#[test]
fn rejected_draft_writes_nothing() {
    let ledger = TestLedger::new();
    let recorder = recorder(&ledger);

    let duplicate = draft(
        Sport::Frisbee,
        7,
        3,
        vec![member("p1", Team::One), member("p1", Team::Two)],
    );
    let err = recorder.record_match(&duplicate).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let negative = singles(Sport::Frisbee, "p1", "p2", -1, 3);
    assert!(matches!(recorder.record_match(&negative), Err(LedgerError::Validation(_))));

    let empty = draft(Sport::Frisbee, 0, 0, vec![]);
    assert!(matches!(recorder.record_match(&empty), Err(LedgerError::Validation(_))));

    assert_eq!(ledger.count("matches"), 0);
    assert_eq!(ledger.count("match_participants"), 0);
    assert_eq!(ledger.count("player_stats"), 0);
}

#[test]
fn failure_mid_transaction_rolls_everything_back() {
    let ledger = TestLedger::new();
    let recorder = recorder(&ledger);
    recorder.record_match(&singles(Sport::Pickleball, "p1", "p2", 11, 9)).unwrap();

    let before_p1 = recorder.stats().get(&PlayerId::new("p1"), Sport::Pickleball).unwrap();
    let before_p2 = recorder.stats().get(&PlayerId::new("p2"), Sport::Pickleball).unwrap();

    {
        let conn = database::get_connection(&ledger.pool).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER fail_p2 BEFORE UPDATE ON player_stats WHEN NEW.player_id = 'p2' \
             BEGIN SELECT RAISE(ABORT, 'store went away'); END",
        )
        .unwrap();
    }

    let err = recorder.record_match(&singles(Sport::Pickleball, "p1", "p2", 11, 3)).unwrap_err();
    assert!(matches!(err, LedgerError::Storage(_)));
    assert!(err.is_retryable());

    assert_eq!(ledger.count("matches"), 1);
    assert_eq!(ledger.count("match_participants"), 2);
    assert_eq!(recorder.stats().get(&PlayerId::new("p1"), Sport::Pickleball).unwrap(), before_p1);
    assert_eq!(recorder.stats().get(&PlayerId::new("p2"), Sport::Pickleball).unwrap(), before_p2);
}

#[test]
fn concurrent_matches_on_a_shared_player_do_not_lose_updates() {
    const WRITERS: usize = 8;

    let ledger = TestLedger::new();
    let recorder = Arc::new(recorder(&ledger));

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let recorder = Arc::clone(&recorder);
            thread::spawn(move || {
                let opponent = format!("opponent{i}");
                recorder.record_match(&singles(Sport::Spikeball, "hot", &opponent, 21, 15))
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let hot = recorder.stats().get(&PlayerId::new("hot"), Sport::Spikeball).unwrap();
    assert_eq!(hot.matches_played, WRITERS as u32);
    assert_eq!(hot.wins, WRITERS as u32);
    assert_eq!(hot.version, WRITERS as i64);
    assert_eq!(ledger.count("matches"), WRITERS as i64);

    let conn = database::get_connection(&ledger.pool).unwrap();
    let total: i64 = conn
        .query_row("SELECT SUM(rating) FROM player_stats WHERE sport = 'spikeball'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(total, 1200 * (WRITERS as i64 + 1));
}

#[test]
fn concurrent_matches_between_the_same_pair_stay_consistent() {
    const WRITERS: usize = 16;

    let ledger = TestLedger::new();
    let recorder = Arc::new(recorder(&ledger));

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let recorder = Arc::clone(&recorder);
            thread::spawn(move || {
                let (winner, loser) = if i % 2 == 0 { ("a", "b") } else { ("b", "a") };
                recorder.record_match(&singles(Sport::Pickleball, winner, loser, 11, 7))
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let a = recorder.stats().get(&PlayerId::new("a"), Sport::Pickleball).unwrap();
    let b = recorder.stats().get(&PlayerId::new("b"), Sport::Pickleball).unwrap();
    for row in [&a, &b] {
        assert_eq!(row.matches_played, WRITERS as u32);
        assert_eq!(row.wins + row.losses, WRITERS as u32);
        assert_eq!(row.version, WRITERS as i64);
    }
    assert_eq!(a.wins, b.losses);
    assert_eq!(a.rating + b.rating, 2400);
    assert_eq!(ledger.count("matches"), WRITERS as i64);
}

#[test]
fn game_history_keeps_guests_and_notes() {
    let ledger = TestLedger::new();
    let recorder = recorder(&ledger);

    let mut first = draft(
        Sport::Football,
        14,
        7,
        vec![
            member("p1", Team::One),
            RosterEntry::new(Participant::guest("Ana", Some("ana@ufl.edu".to_string())), Team::Two),
        ],
    );
    first.game_id = Some("game-42".to_string());
    first.note = Some("rain game".to_string());
    let mut second = singles(Sport::Football, "p1", "p3", 3, 0);
    second.game_id = Some("game-42".to_string());
    second.played_at = first.played_at + chrono::Duration::minutes(30);

    let first_id = recorder.record_match(&first).unwrap();
    let second_id = recorder.record_match(&second).unwrap();
    recorder.record_match(&singles(Sport::Football, "p4", "p5", 1, 0)).unwrap();

    let history = recorder.list_by_game("game-42").unwrap();
    let ids: Vec<_> = history.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![second_id, first_id]);
    assert_eq!(history[1].note.as_deref(), Some("rain game"));
    assert_eq!(
        history[1].roster[1].participant,
        Participant::guest("Ana", Some("ana@ufl.edu".to_string()))
    );

    assert_eq!(recorder.list_by_sport(Sport::Football, 2).unwrap().len(), 2);
    assert!(matches!(
        recorder.find(pullup_ledger::domain::MatchId(999)),
        Err(LedgerError::NotFound(_))
    ));
}
