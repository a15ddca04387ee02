use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::get_count;
use crate::domain::{PlayerId, Referral, ReferralTicketRow};

pub fn find_code_for_user(conn: &Connection, user_id: &PlayerId) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT code FROM referral_codes WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
    .optional()
}

/// Fails with a uniqueness violation when the code is already taken.
pub fn insert_code(conn: &Connection, code: &str, user_id: &PlayerId, now: DateTime<Utc>) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO referral_codes (code, user_id, created_at) VALUES (?1, ?2, ?3)",
        params![code, user_id, now],
    )
    .map(|_| ())
}

pub fn find_referrer(conn: &Connection, code: &str) -> rusqlite::Result<Option<PlayerId>> {
    conn.query_row(
        "SELECT user_id FROM referral_codes WHERE code = ?1",
        params![code],
        |row| row.get(0),
    )
    .optional()
}

pub fn find_referral(conn: &Connection, referee_id: &PlayerId) -> rusqlite::Result<Option<Referral>> {
    let sql = "SELECT referee_id, referrer_id, code, verified_signup, qualified_at, created_at FROM referrals WHERE referee_id = ?1";

    conn.query_row(sql, params![referee_id], parse_referral_row)
        .optional()
}

/// One redemption per referee, ever. Returns false if this referee already has one.
pub fn insert_referral(
    conn: &Connection,
    referee_id: &PlayerId,
    referrer_id: &PlayerId,
    code: &str,
    verified_signup: bool,
    now: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let sql = "INSERT INTO referrals (referee_id, referrer_id, code, verified_signup, created_at) VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT (referee_id) DO NOTHING";

    let inserted = conn.execute(sql, params![referee_id, referrer_id, code, verified_signup, now])?;
    Ok(inserted == 1)
}

/// Stamps a verified, not yet qualified referral. Returns false when there is
/// nothing to stamp.
pub fn mark_qualified(conn: &Connection, referee_id: &PlayerId, now: DateTime<Utc>) -> rusqlite::Result<bool> {
    let sql = "UPDATE referrals SET qualified_at = ?2 WHERE referee_id = ?1 AND qualified_at IS NULL AND verified_signup = 1";

    let updated = conn.execute(sql, params![referee_id, now])?;
    Ok(updated == 1)
}

pub fn find_tickets(conn: &Connection, user_id: &PlayerId) -> rusqlite::Result<Option<ReferralTicketRow>> {
    let sql = "SELECT tickets, total_referrals, pending_referrals FROM raffle_tickets WHERE user_id = ?1";

    conn.query_row(sql, params![user_id], parse_tickets_row)
        .optional()
}

pub fn record_pending(conn: &Connection, referrer_id: &PlayerId, now: DateTime<Utc>) -> rusqlite::Result<()> {
    let sql = "INSERT INTO raffle_tickets (user_id, total_referrals, pending_referrals, updated_at) VALUES (?1, 1, 1, ?2) \
               ON CONFLICT (user_id) DO UPDATE SET total_referrals = total_referrals + 1, pending_referrals = pending_referrals + 1, version = version + 1, updated_at = excluded.updated_at";

    conn.execute(sql, params![referrer_id, now]).map(|_| ())
}

/// Moves one unit from pending to tickets. Returns false if nothing is pending.
pub fn credit_pending(conn: &Connection, referrer_id: &PlayerId, now: DateTime<Utc>) -> rusqlite::Result<bool> {
    let sql = "UPDATE raffle_tickets SET pending_referrals = pending_referrals - 1, tickets = tickets + 1, version = version + 1, updated_at = ?2 WHERE user_id = ?1 AND pending_referrals > 0";

    let updated = conn.execute(sql, params![referrer_id, now])?;
    Ok(updated == 1)
}

fn parse_referral_row(row: &rusqlite::Row) -> rusqlite::Result<Referral> {
    Ok(Referral {
        referee_id: row.get(0)?,
        referrer_id: row.get(1)?,
        code: row.get(2)?,
        verified_signup: row.get(3)?,
        qualified_at: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn parse_tickets_row(row: &rusqlite::Row) -> rusqlite::Result<ReferralTicketRow> {
    Ok(ReferralTicketRow {
        tickets: get_count(row, 0)?,
        total_referrals: get_count(row, 1)?,
        pending_referrals: get_count(row, 2)?,
    })
}
