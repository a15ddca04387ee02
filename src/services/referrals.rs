use chrono::Utc;
use log::{info, warn};
use rand::Rng;

use crate::config::ReferralSettings;
use crate::database::{self, referrals, DbPool};
use crate::domain::{PlayerId, QualifyingProof, ReferralTicketRow};
use crate::errors::{LedgerError, LedgerResult};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_CODE_ATTEMPTS: usize = 8;

/// Invitation codes, redemptions and the raffle tickets they earn.
#[derive(Clone)]
pub struct ReferralLedger {
    pool: DbPool,
    settings: ReferralSettings,
}

/// Codes are stored upper case; lookups accept any case.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

impl ReferralLedger {
    pub fn new(pool: DbPool, settings: ReferralSettings) -> Self {
        Self { pool, settings }
    }

    /// Returns the user's code, minting one on first use.
    pub fn get_or_create_code(&self, user_id: &PlayerId) -> LedgerResult<String> {
        if user_id.as_str().trim().is_empty() {
            return Err(LedgerError::validation("user id must not be empty"));
        }

        let conn = self.pool.get()?;
        if let Some(code) = referrals::find_code_for_user(&conn, user_id)? {
            return Ok(code);
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.generate_code();
            match referrals::insert_code(&conn, &code, user_id, Utc::now()) {
                Ok(()) => {
                    info!("  → Issued referral code {code} to {user_id}");
                    return Ok(code);
                }
                Err(err) => match LedgerError::from(err) {
                    LedgerError::Conflict(_) => {
                        // Either the code collided or the user raced us to one.
                        if let Some(existing) = referrals::find_code_for_user(&conn, user_id)? {
                            return Ok(existing);
                        }
                        warn!("Referral code collision on attempt {attempt}, retrying");
                    }
                    other => return Err(other),
                },
            }
        }

        Err(LedgerError::conflict(format!(
            "could not allocate a unique referral code after {MAX_CODE_ATTEMPTS} attempts"
        )))
    }

    pub fn resolve_code(&self, code: &str) -> LedgerResult<PlayerId> {
        let code = normalize_code(code);
        let conn = self.pool.get()?;
        referrals::find_referrer(&conn, &code)?
            .ok_or_else(|| LedgerError::not_found(format!("unknown referral code '{code}'")))
    }

    pub fn invite_url(&self, code: &str) -> String {
        let base = self.settings.app_url.trim_end_matches('/');
        format!("{base}/join/{}", urlencoding::encode(&normalize_code(code)))
    }

    /// Redeems `code` for `referee_id`. Returns false, changing nothing, when
    /// the code is unknown, the referee is the referrer or a guest account, or
    /// the referee already redeemed a code.
    pub fn register_referral(
        &self,
        referee_id: &PlayerId,
        code: &str,
        proof: QualifyingProof,
    ) -> LedgerResult<bool> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(LedgerError::validation("referral code must not be empty"));
        }
        if referee_id.as_str().trim().is_empty() {
            return Err(LedgerError::validation("referee id must not be empty"));
        }
        if referee_id.is_guest_namespace() {
            warn!("Guest account {referee_id} cannot redeem referral codes");
            return Ok(false);
        }

        let mut conn = self.pool.get()?;
        let tx = database::begin_write(&mut conn)?;

        let Some(referrer_id) = referrals::find_referrer(&tx, &code)? else {
            warn!("Referral code {code} not found");
            return Ok(false);
        };
        if &referrer_id == referee_id {
            warn!("{referee_id} tried to redeem their own referral code");
            return Ok(false);
        }

        let now = Utc::now();
        if !referrals::insert_referral(&tx, referee_id, &referrer_id, &code, proof.verified_signup, now)? {
            warn!("{referee_id} already redeemed a referral code");
            return Ok(false);
        }
        referrals::record_pending(&tx, &referrer_id, now)?;
        tx.commit()?;

        info!(
            "  → {referee_id} redeemed {code} from {referrer_id} (verified: {})",
            proof.verified_signup
        );
        Ok(true)
    }

    /// Moves the referee's referral from the referrer's pending count to an
    /// earned ticket. Happens at most once per referee and only for verified
    /// signups; returns false otherwise.
    pub fn qualify_referral(&self, referee_id: &PlayerId) -> LedgerResult<bool> {
        let mut conn = self.pool.get()?;
        let tx = database::begin_write(&mut conn)?;

        let Some(referral) = referrals::find_referral(&tx, referee_id)? else {
            return Ok(false);
        };
        let now = Utc::now();
        if !referrals::mark_qualified(&tx, referee_id, now)? {
            return Ok(false);
        }
        if !referrals::credit_pending(&tx, &referral.referrer_id, now)? {
            return Err(LedgerError::conflict(format!(
                "{} has no pending referral to credit",
                referral.referrer_id
            )));
        }
        tx.commit()?;

        info!("  → Credited a ticket to {} for {referee_id}", referral.referrer_id);
        Ok(true)
    }

    pub fn tickets(&self, user_id: &PlayerId) -> LedgerResult<ReferralTicketRow> {
        let conn = self.pool.get()?;
        Ok(referrals::find_tickets(&conn, user_id)?.unwrap_or_default())
    }

    fn generate_code(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.settings.code_length)
            .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
            .collect()
    }
}
