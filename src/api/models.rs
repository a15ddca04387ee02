use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Sport;
use crate::domain::{
    Match, MatchDraft, MatchId, Outcome, Participant, PlayerId, PlayerStatsRow, ReferralTicketRow,
    RosterEntry, Team,
};
use crate::errors::{LedgerError, LedgerResult};

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntryRequest {
    pub team: i64,
    pub player_id: Option<String>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
}

impl RosterEntryRequest {
    fn into_entry(self) -> LedgerResult<RosterEntry> {
        let team = Team::from_number(self.team)
            .ok_or_else(|| LedgerError::validation(format!("team must be 1 or 2, got {}", self.team)))?;

        let participant = match (self.player_id, self.guest_name) {
            (Some(player_id), None) => Participant::member(player_id),
            (None, Some(name)) => Participant::guest(name, self.guest_email.filter(|e| !e.trim().is_empty())),
            (Some(_), Some(_)) => {
                return Err(LedgerError::validation(
                    "roster entry must be either a player or a guest, not both",
                ));
            }
            (None, None) => {
                return Err(LedgerError::validation("roster entry needs a playerId or a guestName"));
            }
        };

        Ok(RosterEntry::new(participant, team))
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecordMatchRequest {
    pub sport: String,
    pub game_id: Option<String>,
    pub team1_score: i32,
    pub team2_score: i32,
    pub roster: Vec<RosterEntryRequest>,
    pub recorded_by: String,
    pub played_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl RecordMatchRequest {
    pub fn into_draft(self) -> LedgerResult<MatchDraft> {
        let sport: Sport = self.sport.parse()?;
        let roster = self
            .roster
            .into_iter()
            .map(RosterEntryRequest::into_entry)
            .collect::<LedgerResult<Vec<_>>>()?;

        Ok(MatchDraft {
            sport,
            game_id: self.game_id.filter(|g| !g.trim().is_empty()),
            team1_score: self.team1_score,
            team2_score: self.team2_score,
            roster,
            recorded_by: PlayerId::new(self.recorded_by),
            played_at: self.played_at.unwrap_or_else(Utc::now),
            note: self.note.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecordMatchResponse {
    pub match_id: MatchId,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct MatchListParams {
    pub sport: Option<String>,
    pub game_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntryResponse {
    pub team: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
}

impl From<&RosterEntry> for RosterEntryResponse {
    fn from(entry: &RosterEntry) -> Self {
        let team = entry.team.number();
        match &entry.participant {
            Participant::Member { player_id } => Self {
                team,
                player_id: Some(player_id.to_string()),
                guest_name: None,
                guest_email: None,
            },
            Participant::Guest(guest) => Self {
                team,
                player_id: None,
                guest_name: Some(guest.name.clone()),
                guest_email: guest.email.clone(),
            },
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub id: MatchId,
    pub sport: Sport,
    pub game_id: Option<String>,
    pub team1_score: i32,
    pub team2_score: i32,
    pub outcome: Outcome,
    pub roster: Vec<RosterEntryResponse>,
    pub recorded_by: PlayerId,
    pub played_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Match> for MatchResponse {
    fn from(m: Match) -> Self {
        Self {
            outcome: m.outcome(),
            roster: m.roster.iter().map(RosterEntryResponse::from).collect(),
            id: m.id,
            sport: m.sport,
            game_id: m.game_id,
            team1_score: m.team1_score,
            team2_score: m.team2_score,
            recorded_by: m.recorded_by,
            played_at: m.played_at,
            note: m.note,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsResponse {
    pub player_id: PlayerId,
    pub sport: Sport,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: f64,
    pub rating: i32,
    pub highest_rating: i32,
    pub points_scored: i64,
    pub points_conceded: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<PlayerStatsRow> for PlayerStatsResponse {
    fn from(row: PlayerStatsRow) -> Self {
        Self {
            win_rate: (row.win_rate() * 10.0).round() / 10.0,
            player_id: row.player_id,
            sport: row.sport,
            matches_played: row.matches_played,
            wins: row.wins,
            losses: row.losses,
            draws: row.draws,
            rating: row.rating,
            highest_rating: row.highest_rating,
            points_scored: row.points_scored,
            points_conceded: row.points_conceded,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardParams {
    pub sort_by: Option<String>,
    pub min_matches: Option<u32>,
    pub limit: Option<usize>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub stats: PlayerStatsResponse,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub sport: Sport,
    pub sort_by: String,
    pub min_matches: u32,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReferralCodeResponse {
    pub code: String,
    pub url: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCodeResponse {
    pub code: String,
    pub referrer_id: PlayerId,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReferralRequest {
    pub referee_id: String,
    pub code: String,
    #[serde(default)]
    pub verified_signup: bool,
}

#[derive(Serialize, Debug)]
pub struct RegisterReferralResponse {
    pub registered: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QualifyReferralRequest {
    pub referee_id: String,
}

#[derive(Serialize, Debug)]
pub struct QualifyReferralResponse {
    pub qualified: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TicketsResponse {
    pub user_id: PlayerId,
    pub tickets: u32,
    pub total_referrals: u32,
    pub pending_referrals: u32,
}

impl TicketsResponse {
    pub fn new(user_id: PlayerId, row: ReferralTicketRow) -> Self {
        Self {
            user_id,
            tickets: row.tickets,
            total_referrals: row.total_referrals,
            pending_referrals: row.pending_referrals,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(roster: serde_json::Value) -> RecordMatchRequest {
        serde_json::from_value(serde_json::json!({
            "sport": "Pickleball",
            "team1Score": 11,
            "team2Score": 9,
            "roster": roster,
            "recordedBy": "user_a",
        }))
        .unwrap()
    }

    #[test]
    fn converts_members_and_guests() {
        let draft = request(serde_json::json!([
            { "team": 1, "playerId": "user_a" },
            { "team": 2, "guestName": "Jo", "guestEmail": "" },
        ]))
        .into_draft()
        .unwrap();

        assert_eq!(draft.sport, Sport::Pickleball);
        assert_eq!(draft.roster[0], RosterEntry::new(Participant::member("user_a"), Team::One));
        assert_eq!(draft.roster[1], RosterEntry::new(Participant::guest("Jo", None), Team::Two));
    }

    #[test]
    fn rejects_unknown_team_number() {
        let err = request(serde_json::json!([{ "team": 3, "playerId": "user_a" }]))
            .into_draft()
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn rejects_entry_without_identity() {
        let err = request(serde_json::json!([{ "team": 1 }])).into_draft().unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
}
