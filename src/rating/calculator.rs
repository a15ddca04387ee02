use log::debug;

use super::elo;
use super::types::{RatingChange, SideRatings};
use crate::config::{RatingSettings, Sport};
use crate::domain::Outcome;

/// Applies the Elo exchange to whole teams. A team plays at the mean of its
/// members' ratings (guests count at the seed rating) and every member of a
/// team receives that team's delta.
#[derive(Debug, Clone)]
pub struct RatingCalculator {
    settings: RatingSettings,
}

impl RatingCalculator {
    pub fn new(settings: RatingSettings) -> Self {
        Self { settings }
    }

    pub fn seed_rating(&self) -> i32 {
        self.settings.seed_rating
    }

    pub fn team_rating(&self, side: &SideRatings) -> i32 {
        let guest_total = i64::from(self.settings.seed_rating) * side.guests as i64;
        let member_total: i64 = side.members.iter().map(|&r| i64::from(r)).sum();
        let headcount = side.members.len() as i64 + side.guests as i64;
        if headcount == 0 {
            return self.settings.seed_rating;
        }
        ((member_total + guest_total) as f64 / headcount as f64).round() as i32
    }

    pub fn rate(
        &self,
        sport: Sport,
        team1: &SideRatings,
        team2: &SideRatings,
        outcome: Outcome,
    ) -> RatingChange {
        let team1_rating = self.team_rating(team1);
        let team2_rating = self.team_rating(team2);
        let k_factor = self.settings.k_factor_for(sport);
        let team1_delta = elo::rating_delta(team1_rating, team2_rating, outcome, k_factor);

        debug!(
            "{sport}: team ratings {team1_rating} vs {team2_rating}, k={k_factor}, {outcome:?} -> {team1_delta:+}"
        );

        RatingChange {
            team1_rating,
            team2_rating,
            team1_delta,
            team2_delta: -team1_delta,
        }
    }

    /// New individual rating after a delta, never below the configured floor.
    pub fn apply(&self, current: i32, delta: i32) -> i32 {
        (current + delta).max(self.settings.rating_floor)
    }
}
