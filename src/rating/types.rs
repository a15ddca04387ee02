use crate::domain::Team;

pub type RatingValue = i32;

/// Pre-match ratings of one side: one entry per member, plus a guest headcount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideRatings {
    pub members: Vec<RatingValue>,
    pub guests: usize,
}

impl SideRatings {
    pub fn new(members: Vec<RatingValue>, guests: usize) -> Self {
        Self { members, guests }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingChange {
    pub team1_rating: RatingValue,
    pub team2_rating: RatingValue,
    pub team1_delta: RatingValue,
    pub team2_delta: RatingValue,
}

impl RatingChange {
    pub fn delta_for(&self, team: Team) -> RatingValue {
        match team {
            Team::One => self.team1_delta,
            Team::Two => self.team2_delta,
        }
    }
}
