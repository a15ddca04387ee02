#![allow(dead_code)]

use chrono::Utc;
use pullup_ledger::config::{AppConfig, Sport};
use pullup_ledger::database::{self, DbPool};
use pullup_ledger::domain::{MatchDraft, Participant, PlayerId, RosterEntry, Team};
use tempfile::TempDir;

/// A file-backed ledger living in a temp directory removed on drop.
pub struct TestLedger {
    pub config: AppConfig,
    pub pool: DbPool,
    _dir: TempDir,
}

impl TestLedger {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        let config = AppConfig::new().with_database_path(path.to_string_lossy());
        let pool = database::create_pool(&config.store).unwrap();
        let conn = database::get_connection(&pool).unwrap();
        database::setup::ensure_schema(&conn).unwrap();
        drop(conn);

        Self { config, pool, _dir: dir }
    }

    pub fn count(&self, table: &str) -> i64 {
        let conn = database::get_connection(&self.pool).unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }
}

pub fn member(id: &str, team: Team) -> RosterEntry {
    RosterEntry::new(Participant::member(id), team)
}

pub fn guest(name: &str, team: Team) -> RosterEntry {
    RosterEntry::new(Participant::guest(name, None), team)
}

pub fn draft(sport: Sport, team1_score: i32, team2_score: i32, roster: Vec<RosterEntry>) -> MatchDraft {
    MatchDraft {
        sport,
        game_id: None,
        team1_score,
        team2_score,
        roster,
        recorded_by: PlayerId::new("recorder"),
        played_at: Utc::now(),
        note: None,
    }
}

/// One member per side, team one listed first.
pub fn singles(sport: Sport, p1: &str, p2: &str, team1_score: i32, team2_score: i32) -> MatchDraft {
    draft(
        sport,
        team1_score,
        team2_score,
        vec![member(p1, Team::One), member(p2, Team::Two)],
    )
}
