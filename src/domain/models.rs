use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Sport;

/// Prefix the identity provider reserves for ephemeral guest accounts.
pub const GUEST_NAMESPACE_PREFIX: &str = "guest_";

/// Opaque, stable player identifier handed out by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for session-scoped guest accounts. They can play and hold stats
    /// rows, but never rank on leaderboards or redeem referral codes.
    pub fn is_guest_namespace(&self) -> bool {
        self.0.starts_with(GUEST_NAMESPACE_PREFIX)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub i64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Team {
    One,
    Two,
}

impl TryFrom<i64> for Team {
    type Error = String;

    fn try_from(number: i64) -> Result<Self, Self::Error> {
        Team::from_number(number).ok_or_else(|| format!("team must be 1 or 2, got {number}"))
    }
}

impl From<Team> for i64 {
    fn from(team: Team) -> Self {
        team.number()
    }
}

impl Team {
    pub fn number(&self) -> i64 {
        match self {
            Team::One => 1,
            Team::Two => 2,
        }
    }

    pub fn from_number(number: i64) -> Option<Self> {
        match number {
            1 => Some(Team::One),
            2 => Some(Team::Two),
            _ => None,
        }
    }

    pub fn opponent(&self) -> Self {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }
}

/// Someone who played without a resolvable account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestParticipant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl GuestParticipant {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            name: name.into(),
            email,
        }
    }

    /// Two guests are the same participant when their e-mails match, or their
    /// names match and neither carries an e-mail.
    pub fn identity_key(&self) -> String {
        match &self.email {
            Some(email) => format!("email:{}", email.trim().to_lowercase()),
            None => format!("name:{}", self.name.trim().to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Participant {
    Member { player_id: PlayerId },
    Guest(GuestParticipant),
}

impl Participant {
    pub fn member(id: impl Into<String>) -> Self {
        Participant::Member {
            player_id: PlayerId::new(id),
        }
    }

    pub fn guest(name: impl Into<String>, email: Option<String>) -> Self {
        Participant::Guest(GuestParticipant::new(name, email))
    }

    pub fn player_id(&self) -> Option<&PlayerId> {
        match self {
            Participant::Member { player_id } => Some(player_id),
            Participant::Guest(_) => None,
        }
    }

    pub(crate) fn identity_key(&self) -> String {
        match self {
            Participant::Member { player_id } => format!("member:{player_id}"),
            Participant::Guest(guest) => format!("guest:{}", guest.identity_key()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub participant: Participant,
    pub team: Team,
}

impl RosterEntry {
    pub fn new(participant: Participant, team: Team) -> Self {
        Self { participant, team }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Team1Wins,
    Team2Wins,
    Draw,
}

impl Outcome {
    pub fn from_scores(team1_score: i32, team2_score: i32) -> Self {
        match team1_score.cmp(&team2_score) {
            std::cmp::Ordering::Greater => Outcome::Team1Wins,
            std::cmp::Ordering::Less => Outcome::Team2Wins,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// Score from team one's side: 1 for a win, 0.5 for a draw, 0 for a loss.
    pub fn team1_actual(&self) -> f64 {
        match self {
            Outcome::Team1Wins => 1.0,
            Outcome::Team2Wins => 0.0,
            Outcome::Draw => 0.5,
        }
    }

    pub fn result_for(&self, team: Team) -> MatchResult {
        match (self, team) {
            (Outcome::Draw, _) => MatchResult::Draw,
            (Outcome::Team1Wins, Team::One) | (Outcome::Team2Wins, Team::Two) => MatchResult::Win,
            _ => MatchResult::Loss,
        }
    }
}

/// One participant's view of an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

/// A match as submitted, before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDraft {
    pub sport: Sport,
    pub game_id: Option<String>,
    pub team1_score: i32,
    pub team2_score: i32,
    pub roster: Vec<RosterEntry>,
    pub recorded_by: PlayerId,
    pub played_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl MatchDraft {
    pub fn outcome(&self) -> Outcome {
        Outcome::from_scores(self.team1_score, self.team2_score)
    }

    pub fn score_for(&self, team: Team) -> i32 {
        match team {
            Team::One => self.team1_score,
            Team::Two => self.team2_score,
        }
    }

    pub fn team(&self, team: Team) -> impl Iterator<Item = &Participant> {
        self.roster
            .iter()
            .filter(move |entry| entry.team == team)
            .map(|entry| &entry.participant)
    }
}

/// A committed match. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub sport: Sport,
    pub game_id: Option<String>,
    pub team1_score: i32,
    pub team2_score: i32,
    pub roster: Vec<RosterEntry>,
    pub recorded_by: PlayerId,
    pub played_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn outcome(&self) -> Outcome {
        Outcome::from_scores(self.team1_score, self.team2_score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatsRow {
    pub player_id: PlayerId,
    pub sport: Sport,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub rating: i32,
    pub highest_rating: i32,
    pub points_scored: i64,
    pub points_conceded: i64,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

impl PlayerStatsRow {
    pub fn seeded(player_id: PlayerId, sport: Sport, seed_rating: i32) -> Self {
        Self {
            player_id,
            sport,
            matches_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            rating: seed_rating,
            highest_rating: seed_rating,
            points_scored: 0,
            points_conceded: 0,
            version: 0,
            updated_at: Utc::now(),
        }
    }

    /// Percentage of matches won, 0 when nothing has been played.
    pub fn win_rate(&self) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(self.matches_played) * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReferralTicketRow {
    pub tickets: u32,
    pub total_referrals: u32,
    pub pending_referrals: u32,
}

/// A redeemed referral code. At most one per referee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    pub referee_id: PlayerId,
    pub referrer_id: PlayerId,
    pub code: String,
    pub verified_signup: bool,
    pub qualified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Evidence supplied with a redemption. A ticket is only ever credited for a
/// referee whose signup was verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QualifyingProof {
    pub verified_signup: bool,
}
