use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{LeaderboardSettings, Sport};
use crate::database::{player_stats, DbPool};
use crate::domain::PlayerStatsRow;
use crate::errors::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortKey {
    #[default]
    Rating,
    Wins,
    WinRate,
    MatchesPlayed,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Rating, SortKey::Wins, SortKey::WinRate, SortKey::MatchesPlayed];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Rating => "elo",
            SortKey::Wins => "wins",
            SortKey::WinRate => "winrate",
            SortKey::MatchesPlayed => "matches",
        }
    }

    /// Primary key only, descending.
    fn compare(&self, a: &PlayerStatsRow, b: &PlayerStatsRow) -> Ordering {
        match self {
            SortKey::Rating => b.rating.cmp(&a.rating),
            SortKey::Wins => b.wins.cmp(&a.wins),
            SortKey::WinRate => compare_win_rate(b, a),
            SortKey::MatchesPlayed => b.matches_played.cmp(&a.matches_played),
        }
    }
}

impl FromStr for SortKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elo" | "rating" => Ok(SortKey::Rating),
            "wins" => Ok(SortKey::Wins),
            "winrate" | "win_rate" => Ok(SortKey::WinRate),
            "matches" | "matches_played" => Ok(SortKey::MatchesPlayed),
            other => Err(LedgerError::validation(format!(
                "unknown sort key '{other}', expected one of elo, wins, winrate, matches"
            ))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// wins/played compared without floats. No matches played counts as 0%.
fn compare_win_rate(a: &PlayerStatsRow, b: &PlayerStatsRow) -> Ordering {
    match (a.matches_played, b.matches_played) {
        (0, 0) => Ordering::Equal,
        (0, _) => 0.cmp(&b.wins),
        (_, 0) => a.wins.cmp(&0),
        (a_played, b_played) => {
            let lhs = u64::from(a.wins) * u64::from(b_played);
            let rhs = u64::from(b.wins) * u64::from(a_played);
            lhs.cmp(&rhs)
        }
    }
}

/// Full ordering: primary key descending, then matches played descending,
/// then player id ascending.
pub fn leaderboard_order(sort_key: SortKey, a: &PlayerStatsRow, b: &PlayerStatsRow) -> Ordering {
    sort_key
        .compare(a, b)
        .then_with(|| b.matches_played.cmp(&a.matches_played))
        .then_with(|| a.player_id.cmp(&b.player_id))
}

/// Orders rows in place after dropping guests and anyone under `min_matches`.
pub fn rank_rows(mut rows: Vec<PlayerStatsRow>, min_matches: u32, sort_key: SortKey, limit: usize) -> Vec<PlayerStatsRow> {
    rows.retain(|row| row.matches_played >= min_matches && !row.player_id.is_guest_namespace());
    rows.sort_by(|a, b| leaderboard_order(sort_key, a, b));
    rows.truncate(limit);
    rows
}

#[derive(Clone)]
pub struct LeaderboardRanker {
    pool: DbPool,
    settings: LeaderboardSettings,
}

impl LeaderboardRanker {
    pub fn new(pool: DbPool, settings: LeaderboardSettings) -> Self {
        Self { pool, settings }
    }

    /// The minimum match count `rank` filters on for a requested value.
    pub fn effective_min_matches(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.settings.default_min_matches).max(1)
    }

    /// `min_matches` below 1 is raised to 1; `limit` is capped at the
    /// configured maximum.
    pub fn rank(
        &self,
        sport: Sport,
        min_matches: Option<u32>,
        sort_key: SortKey,
        limit: Option<usize>,
    ) -> LedgerResult<Vec<PlayerStatsRow>> {
        let min_matches = self.effective_min_matches(min_matches);
        let limit = limit
            .unwrap_or(self.settings.max_entries)
            .min(self.settings.max_entries);

        let conn = self.pool.get()?;
        let rows = player_stats::list_by_sport(&conn, sport, min_matches)?;
        let ranked = rank_rows(rows, min_matches, sort_key, limit);

        debug!("{sport} leaderboard by {sort_key}: {} rows (min {min_matches} matches)", ranked.len());
        Ok(ranked)
    }
}
