use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::Sport;
use crate::domain::{Match, MatchDraft, MatchId, Participant, RosterEntry};

const MATCH_COLUMNS: &str =
    "id, sport, game_id, team1_score, team2_score, recorded_by, played_at, notes, created_at";

/// Appends a match and its roster. Callers run this inside the transaction
/// that also updates the stats ledger.
pub fn insert_match(conn: &Connection, draft: &MatchDraft, created_at: DateTime<Utc>) -> rusqlite::Result<MatchId> {
    let sql = "INSERT INTO matches (sport, game_id, team1_score, team2_score, recorded_by, played_at, notes, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING id";

    let id: i64 = conn.query_row(
        sql,
        params![
            draft.sport,
            draft.game_id,
            draft.team1_score,
            draft.team2_score,
            draft.recorded_by,
            draft.played_at,
            draft.note,
            created_at
        ],
        |row| row.get(0),
    )?;

    let match_id = MatchId(id);
    insert_roster(conn, match_id, &draft.roster)?;
    Ok(match_id)
}

fn insert_roster(conn: &Connection, match_id: MatchId, roster: &[RosterEntry]) -> rusqlite::Result<()> {
    let sql = "INSERT INTO match_participants (match_id, position, team, player_id, guest_name, guest_email) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
    let mut stmt = conn.prepare_cached(sql)?;

    for (position, entry) in roster.iter().enumerate() {
        let (player_id, guest_name, guest_email) = match &entry.participant {
            Participant::Member { player_id } => (Some(player_id.as_str()), None, None),
            Participant::Guest(guest) => (None, Some(guest.name.trim()), guest.email.as_deref().map(str::trim)),
        };
        stmt.execute(params![match_id.0, position as i64, entry.team, player_id, guest_name, guest_email])?;
    }

    Ok(())
}

pub fn find_by_id(conn: &Connection, match_id: MatchId) -> rusqlite::Result<Option<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");

    let found = conn
        .query_row(&sql, params![match_id.0], parse_match_row)
        .optional()?;

    found.map(|m| with_roster(conn, m)).transpose()
}

/// Most recent first; ties on `played_at` fall back to insertion order.
pub fn list_by_sport(conn: &Connection, sport: Sport, limit: usize) -> rusqlite::Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE sport = ?1 ORDER BY played_at DESC, id DESC LIMIT ?2"
    );
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    query_matches(conn, &sql, params![sport, limit])
}

/// Most recent first; ties on `played_at` fall back to insertion order.
pub fn list_by_game(conn: &Connection, game_id: &str) -> rusqlite::Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE game_id = ?1 ORDER BY played_at DESC, id DESC"
    );
    query_matches(conn, &sql, params![game_id])
}

pub fn count_all(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM matches", [], |row| row.get(0))
}

fn query_matches(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> rusqlite::Result<Vec<Match>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(|m| with_roster(conn, m)).collect()
}

fn with_roster(conn: &Connection, mut found: Match) -> rusqlite::Result<Match> {
    found.roster = load_roster(conn, found.id)?;
    Ok(found)
}

fn load_roster(conn: &Connection, match_id: MatchId) -> rusqlite::Result<Vec<RosterEntry>> {
    let sql = "SELECT team, player_id, guest_name, guest_email FROM match_participants WHERE match_id = ?1 ORDER BY position";

    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt
        .query_map(params![match_id.0], parse_participant_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: MatchId(row.get(0)?),
        sport: row.get(1)?,
        game_id: row.get(2)?,
        team1_score: row.get(3)?,
        team2_score: row.get(4)?,
        roster: Vec::new(),
        recorded_by: row.get(5)?,
        played_at: row.get(6)?,
        note: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn parse_participant_row(row: &rusqlite::Row) -> rusqlite::Result<RosterEntry> {
    let team = row.get(0)?;
    let player_id: Option<String> = row.get(1)?;
    let participant = match player_id {
        Some(id) => Participant::member(id),
        None => Participant::guest(row.get::<_, String>(2)?, row.get(3)?),
    };
    Ok(RosterEntry::new(participant, team))
}
