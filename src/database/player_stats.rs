use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::get_count;
use crate::config::Sport;
use crate::domain::{PlayerId, PlayerStatsRow};

const STATS_COLUMNS: &str = "player_id, sport, matches_played, wins, losses, draws, rating, highest_rating, points_scored, points_conceded, version, updated_at";

/// Creates a zeroed row at the seed rating unless one already exists. Two
/// callers racing here both end up reading the same single row.
pub fn insert_if_absent(
    conn: &Connection,
    player_id: &PlayerId,
    sport: Sport,
    seed_rating: i32,
    now: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let sql = "INSERT INTO player_stats (player_id, sport, rating, highest_rating, updated_at) VALUES (?1, ?2, ?3, ?3, ?4) ON CONFLICT (player_id, sport) DO NOTHING";

    let inserted = conn.execute(sql, params![player_id, sport, seed_rating, now])?;
    Ok(inserted == 1)
}

pub fn find(conn: &Connection, player_id: &PlayerId, sport: Sport) -> rusqlite::Result<Option<PlayerStatsRow>> {
    let sql = format!("SELECT {STATS_COLUMNS} FROM player_stats WHERE player_id = ?1 AND sport = ?2");

    conn.query_row(&sql, params![player_id, sport], parse_stats_row)
        .optional()
}

pub fn list_for_player(conn: &Connection, player_id: &PlayerId) -> rusqlite::Result<Vec<PlayerStatsRow>> {
    let sql = format!("SELECT {STATS_COLUMNS} FROM player_stats WHERE player_id = ?1 ORDER BY sport");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_stats_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Unordered; the leaderboard applies its own ordering.
pub fn list_by_sport(conn: &Connection, sport: Sport, min_matches: u32) -> rusqlite::Result<Vec<PlayerStatsRow>> {
    let sql = format!("SELECT {STATS_COLUMNS} FROM player_stats WHERE sport = ?1 AND matches_played >= ?2");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![sport, min_matches], parse_stats_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Writes `row` only if the stored version is still `expected_version`.
/// Returns false when another writer got there first.
pub fn update_with_version(
    conn: &Connection,
    row: &PlayerStatsRow,
    expected_version: i64,
) -> rusqlite::Result<bool> {
    let sql = "UPDATE player_stats SET matches_played = ?1, wins = ?2, losses = ?3, draws = ?4, rating = ?5, highest_rating = ?6, points_scored = ?7, points_conceded = ?8, version = ?9, updated_at = ?10 WHERE player_id = ?11 AND sport = ?12 AND version = ?13";

    let updated = conn.execute(
        sql,
        params![
            row.matches_played,
            row.wins,
            row.losses,
            row.draws,
            row.rating,
            row.highest_rating,
            row.points_scored,
            row.points_conceded,
            row.version,
            row.updated_at,
            row.player_id,
            row.sport,
            expected_version
        ],
    )?;

    Ok(updated == 1)
}

fn parse_stats_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerStatsRow> {
    Ok(PlayerStatsRow {
        player_id: row.get(0)?,
        sport: row.get(1)?,
        matches_played: get_count(row, 2)?,
        wins: get_count(row, 3)?,
        losses: get_count(row, 4)?,
        draws: get_count(row, 5)?,
        rating: row.get(6)?,
        highest_rating: row.get(7)?,
        points_scored: row.get(8)?,
        points_conceded: row.get(9)?,
        version: row.get(10)?,
        updated_at: row.get(11)?,
    })
}
