use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;

use super::models::{GuestParticipant, MatchDraft, Participant, Team};
use crate::errors::{LedgerError, LedgerResult};

pub const MAX_NOTE_CHARS: usize = 200;

/// Rejects drafts that would break roster or score invariants. Runs before
/// anything touches the store, so a rejected draft has no effect at all.
pub struct DraftValidator {
    email_regex: Regex,
}

impl DraftValidator {
    pub fn new() -> Result<Self> {
        let email_regex = Self::compile_email_regex()?;
        Ok(Self { email_regex })
    }

    fn compile_email_regex() -> Result<Regex> {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").context("Failed to compile e-mail regex")
    }

    pub fn validate(&self, draft: &MatchDraft) -> LedgerResult<()> {
        check_identifier("recordedBy", draft.recorded_by.as_str())?;
        check_scores(draft.team1_score, draft.team2_score)?;
        check_note(draft.note.as_deref())?;
        check_roster_not_empty(draft)?;
        check_both_teams_present(draft)?;
        self.check_participants(draft)?;
        check_no_duplicates(draft)
    }

    fn check_participants(&self, draft: &MatchDraft) -> LedgerResult<()> {
        for entry in &draft.roster {
            match &entry.participant {
                Participant::Member { player_id } => check_identifier("player id", player_id.as_str())?,
                Participant::Guest(guest) => self.check_guest(guest)?,
            }
        }
        Ok(())
    }

    fn check_guest(&self, guest: &GuestParticipant) -> LedgerResult<()> {
        if guest.name.trim().is_empty() {
            return Err(LedgerError::validation("guest name must not be empty"));
        }
        match &guest.email {
            Some(email) if !self.email_regex.is_match(email.trim()) => Err(LedgerError::validation(
                format!("guest e-mail '{email}' is not a valid address"),
            )),
            _ => Ok(()),
        }
    }
}

fn check_identifier(field: &str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn check_scores(team1_score: i32, team2_score: i32) -> LedgerResult<()> {
    if team1_score < 0 || team2_score < 0 {
        return Err(LedgerError::validation(format!(
            "scores must be non-negative, got {team1_score}-{team2_score}"
        )));
    }
    Ok(())
}

fn check_note(note: Option<&str>) -> LedgerResult<()> {
    let length = note.map(|n| n.chars().count()).unwrap_or(0);
    if length > MAX_NOTE_CHARS {
        return Err(LedgerError::validation(format!(
            "note is {length} characters, at most {MAX_NOTE_CHARS} allowed"
        )));
    }
    Ok(())
}

fn check_roster_not_empty(draft: &MatchDraft) -> LedgerResult<()> {
    if draft.roster.is_empty() {
        return Err(LedgerError::validation("roster must not be empty"));
    }
    Ok(())
}

fn check_both_teams_present(draft: &MatchDraft) -> LedgerResult<()> {
    for team in [Team::One, Team::Two] {
        if draft.team(team).next().is_none() {
            return Err(LedgerError::validation(format!(
                "team {} has no participants",
                team.number()
            )));
        }
    }
    Ok(())
}

fn check_no_duplicates(draft: &MatchDraft) -> LedgerResult<()> {
    let mut seen = HashSet::new();
    for entry in &draft.roster {
        let key = entry.participant.identity_key();
        if !seen.insert(key) {
            return Err(LedgerError::validation(format!(
                "participant {} appears more than once",
                describe(&entry.participant)
            )));
        }
    }
    Ok(())
}

fn describe(participant: &Participant) -> String {
    match participant {
        Participant::Member { player_id } => format!("'{player_id}'"),
        Participant::Guest(guest) => format!("guest '{}'", guest.name.trim()),
    }
}
