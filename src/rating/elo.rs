use crate::domain::Outcome;

/// Rating difference at which the stronger side is expected to score 10:1.
const LOGISTIC_SCALE: f64 = 400.0;

/// Expected score of side A against side B under the logistic model.
pub fn expected_score(rating_a: i32, rating_b: i32) -> f64 {
    let exponent = f64::from(rating_b - rating_a) / LOGISTIC_SCALE;
    1.0 / (1.0 + 10f64.powf(exponent))
}

/// Points side A gains (negative: loses) for `outcome`. Side B's change is the
/// exact negation, so every exchange is zero-sum.
pub fn rating_delta(rating_a: i32, rating_b: i32, outcome: Outcome, k_factor: i32) -> i32 {
    let expected_a = expected_score(rating_a, rating_b);
    let swing = f64::from(k_factor) * (outcome.team1_actual() - expected_a);
    swing.round() as i32
}

/// Post-match ratings for two sides. Side A is team one. No floor is applied
/// here; see [`super::RatingCalculator`].
pub fn compute_new_ratings(
    rating_a: i32,
    rating_b: i32,
    outcome: Outcome,
    k_factor: i32,
) -> (i32, i32) {
    let delta_a = rating_delta(rating_a, rating_b, outcome, k_factor);
    (rating_a + delta_a, rating_b - delta_a)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn equal_ratings_expect_even_score() {
        assert!((expected_score(1200, 1200) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn equal_ratings_win_moves_sixteen_points() {
        assert_eq!(compute_new_ratings(1200, 1200, Outcome::Team1Wins, 32), (1216, 1184));
        assert_eq!(compute_new_ratings(1200, 1200, Outcome::Team2Wins, 32), (1184, 1216));
    }

    #[test]
    fn equal_ratings_draw_moves_nothing() {
        assert_eq!(compute_new_ratings(1350, 1350, Outcome::Draw, 32), (1350, 1350));
    }

    #[test]
    fn underdog_gains_more_than_favourite() {
        let underdog_gain = rating_delta(1000, 1400, Outcome::Team1Wins, 32);
        let favourite_gain = rating_delta(1400, 1000, Outcome::Team1Wins, 32);
        assert!(underdog_gain > 16);
        assert!(favourite_gain < 16);
        assert_eq!(underdog_gain + favourite_gain, 32);
    }

    #[test]
    fn draw_pulls_ratings_together() {
        let (a, b) = compute_new_ratings(1500, 1100, Outcome::Draw, 32);
        assert!(a < 1500);
        assert!(b > 1100);
    }

    fn any_outcome() -> impl Strategy<Value = Outcome> {
        prop_oneof![
            Just(Outcome::Team1Wins),
            Just(Outcome::Team2Wins),
            Just(Outcome::Draw)
        ]
    }

    proptest! {
        #[test]
        fn exchange_is_zero_sum(
            a in 100i32..3000,
            b in 100i32..3000,
            outcome in any_outcome(),
            k in 1i32..64,
        ) {
            let (new_a, new_b) = compute_new_ratings(a, b, outcome, k);
            prop_assert_eq!(new_a - a, -(new_b - b));
        }

        #[test]
        fn equal_ratings_are_symmetric(r in 100i32..3000, k in 1i32..64) {
            let (win_a, lose_b) = compute_new_ratings(r, r, Outcome::Team1Wins, k);
            let (lose_a, win_b) = compute_new_ratings(r, r, Outcome::Team2Wins, k);
            prop_assert_eq!(win_a - r, -(lose_b - r));
            prop_assert_eq!(win_a - r, win_b - r);
            prop_assert_eq!(lose_a - r, lose_b - r);
            prop_assert_eq!(compute_new_ratings(r, r, Outcome::Draw, k), (r, r));
        }

        #[test]
        fn delta_never_exceeds_k(a in 100i32..3000, b in 100i32..3000, outcome in any_outcome(), k in 1i32..64) {
            prop_assert!(rating_delta(a, b, outcome, k).abs() <= k);
        }
    }
}
