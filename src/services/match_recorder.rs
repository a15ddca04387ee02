use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rusqlite::Connection;

use super::stats_ledger::{ResultUpdate, StatsLedger};
use crate::config::{AppConfig, Sport};
use crate::database::{self, matches, DbPool};
use crate::domain::{DraftValidator, Match, MatchDraft, MatchId, Participant, PlayerStatsRow, Team};
use crate::errors::{LedgerError, LedgerResult};
use crate::rating::{RatingCalculator, RatingChange, SideRatings};

/// Commits a match together with every stats change it implies, or nothing.
pub struct MatchRecorder {
    pool: DbPool,
    validator: DraftValidator,
    calculator: RatingCalculator,
    ledger: StatsLedger,
}

struct TeamRows {
    team: Team,
    rows: Vec<PlayerStatsRow>,
    guests: usize,
}

impl TeamRows {
    fn side(&self) -> SideRatings {
        SideRatings::new(self.rows.iter().map(|row| row.rating).collect(), self.guests)
    }
}

impl MatchRecorder {
    pub fn new(pool: DbPool, config: &AppConfig) -> Result<Self> {
        let calculator = RatingCalculator::new(config.rating.clone());
        Ok(Self {
            ledger: StatsLedger::new(pool.clone(), calculator.clone()),
            validator: DraftValidator::new()?,
            calculator,
            pool,
        })
    }

    pub fn record_match(&self, draft: &MatchDraft) -> LedgerResult<MatchId> {
        self.validator.validate(draft)?;

        let mut conn = self.pool.get()?;
        let tx = database::begin_write(&mut conn)?;
        let (match_id, change) = self.write_match(&tx, draft)?;
        tx.commit()?;

        info!(
            "  → Recorded {} match {} ({}-{}, {} players), team deltas {:+}/{:+}",
            draft.sport,
            match_id,
            draft.team1_score,
            draft.team2_score,
            draft.roster.len(),
            change.team1_delta,
            change.team2_delta
        );
        Ok(match_id)
    }

    /// Everything after validation. Any error here leaves the transaction
    /// uncommitted and it rolls back on drop.
    fn write_match(&self, conn: &Connection, draft: &MatchDraft) -> LedgerResult<(MatchId, RatingChange)> {
        let now = Utc::now();
        let match_id = matches::insert_match(conn, draft, now)?;

        let team1 = self.load_team(conn, draft, Team::One, now)?;
        let team2 = self.load_team(conn, draft, Team::Two, now)?;

        let outcome = draft.outcome();
        let change = self.calculator.rate(draft.sport, &team1.side(), &team2.side(), outcome);

        for side in [&team1, &team2] {
            let update = ResultUpdate {
                result: outcome.result_for(side.team),
                rating_delta: change.delta_for(side.team),
                points_scored: i64::from(draft.score_for(side.team)),
                points_conceded: i64::from(draft.score_for(side.team.opponent())),
            };
            for row in &side.rows {
                let next = self.ledger.apply_result_in(conn, row, update, now)?;
                debug!("{} {}: {} -> {}", draft.sport, next.player_id, row.rating, next.rating);
            }
        }

        Ok((match_id, change))
    }

    fn load_team(
        &self,
        conn: &Connection,
        draft: &MatchDraft,
        team: Team,
        now: DateTime<Utc>,
    ) -> LedgerResult<TeamRows> {
        let mut rows = Vec::new();
        let mut guests = 0;
        for participant in draft.team(team) {
            match participant {
                Participant::Member { player_id } => {
                    rows.push(self.ledger.get_or_create_in(conn, player_id, draft.sport, now)?);
                }
                Participant::Guest(_) => guests += 1,
            }
        }
        Ok(TeamRows { team, rows, guests })
    }

    pub fn find(&self, match_id: MatchId) -> LedgerResult<Match> {
        let conn = self.pool.get()?;
        matches::find_by_id(&conn, match_id)?
            .ok_or_else(|| LedgerError::not_found(format!("match {match_id} not found")))
    }

    pub fn list_by_sport(&self, sport: Sport, limit: usize) -> LedgerResult<Vec<Match>> {
        let conn = self.pool.get()?;
        Ok(matches::list_by_sport(&conn, sport, limit)?)
    }

    pub fn list_by_game(&self, game_id: &str) -> LedgerResult<Vec<Match>> {
        let game_id = game_id.trim();
        if game_id.is_empty() {
            warn!("Ignoring empty game id lookup");
            return Ok(Vec::new());
        }
        let conn = self.pool.get()?;
        Ok(matches::list_by_game(&conn, game_id)?)
    }

    pub fn stats(&self) -> &StatsLedger {
        &self.ledger
    }
}
