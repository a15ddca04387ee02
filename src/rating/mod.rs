pub mod calculator;
pub mod elo;
pub mod types;

pub use calculator::RatingCalculator;
pub use elo::{compute_new_ratings, expected_score};
pub use types::{RatingChange, RatingValue, SideRatings};
