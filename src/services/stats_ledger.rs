use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::config::Sport;
use crate::database::{player_stats, DbPool};
use crate::domain::{MatchResult, PlayerId, PlayerStatsRow};
use crate::errors::{LedgerError, LedgerResult};
use crate::rating::RatingCalculator;

/// What one match does to one player's row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultUpdate {
    pub result: MatchResult,
    pub rating_delta: i32,
    pub points_scored: i64,
    pub points_conceded: i64,
}

/// One row per (player, sport). Reads are open to anyone; writes only happen
/// inside the match recorder's transaction.
#[derive(Clone)]
pub struct StatsLedger {
    pool: DbPool,
    calculator: RatingCalculator,
}

impl StatsLedger {
    pub fn new(pool: DbPool, calculator: RatingCalculator) -> Self {
        Self { pool, calculator }
    }

    pub fn get_or_create(&self, player_id: &PlayerId, sport: Sport) -> LedgerResult<PlayerStatsRow> {
        let conn = self.pool.get()?;
        self.get_or_create_in(&conn, player_id, sport, Utc::now())
    }

    pub fn get(&self, player_id: &PlayerId, sport: Sport) -> LedgerResult<PlayerStatsRow> {
        let conn = self.pool.get()?;
        player_stats::find(&conn, player_id, sport)?
            .ok_or_else(|| LedgerError::not_found(format!("no {sport} stats for player '{player_id}'")))
    }

    /// Every sport the player has a row for, ordered by sport tag.
    pub fn for_player(&self, player_id: &PlayerId) -> LedgerResult<Vec<PlayerStatsRow>> {
        let conn = self.pool.get()?;
        let rows = player_stats::list_for_player(&conn, player_id)?;
        if rows.is_empty() {
            return Err(LedgerError::not_found(format!("no stats for player '{player_id}'")));
        }
        Ok(rows)
    }

    pub(crate) fn get_or_create_in(
        &self,
        conn: &Connection,
        player_id: &PlayerId,
        sport: Sport,
        now: DateTime<Utc>,
    ) -> LedgerResult<PlayerStatsRow> {
        if player_stats::insert_if_absent(conn, player_id, sport, self.calculator.seed_rating(), now)? {
            log::debug!("Created {sport} stats row for {player_id}");
        }
        player_stats::find(conn, player_id, sport)?
            .ok_or_else(|| LedgerError::Storage(format!("stats row for '{player_id}' vanished after insert")))
    }

    /// Compare-and-swap on the row's version; a miss means someone else wrote
    /// the row since `current` was read.
    pub(crate) fn apply_result_in(
        &self,
        conn: &Connection,
        current: &PlayerStatsRow,
        update: ResultUpdate,
        now: DateTime<Utc>,
    ) -> LedgerResult<PlayerStatsRow> {
        let next = self.next_row(current, update, now);
        if !player_stats::update_with_version(conn, &next, current.version)? {
            return Err(LedgerError::conflict(format!(
                "{} stats for '{}' changed concurrently",
                current.sport, current.player_id
            )));
        }
        Ok(next)
    }

    fn next_row(&self, current: &PlayerStatsRow, update: ResultUpdate, now: DateTime<Utc>) -> PlayerStatsRow {
        let mut next = current.clone();
        next.matches_played += 1;
        match update.result {
            MatchResult::Win => next.wins += 1,
            MatchResult::Loss => next.losses += 1,
            MatchResult::Draw => next.draws += 1,
        }
        next.rating = self.calculator.apply(current.rating, update.rating_delta);
        next.highest_rating = current.highest_rating.max(next.rating);
        next.points_scored += update.points_scored;
        next.points_conceded += update.points_conceded;
        next.version = current.version + 1;
        next.updated_at = now;
        next
    }
}
