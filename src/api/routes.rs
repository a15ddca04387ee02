use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    leaderboard::get_leaderboard,
    matches::{get_match, list_matches, record_match},
    players::{create_referral_code, get_player_sport_stats, get_player_stats, get_tickets},
    referrals::{qualify_referral, register_referral, resolve_code},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/matches", post(record_match).get(list_matches))
        .route("/api/matches/:id", get(get_match))
        .route("/api/leaderboard/:sport", get(get_leaderboard))
        .route("/api/players/:id/stats", get(get_player_stats))
        .route("/api/players/:id/stats/:sport", get(get_player_sport_stats))
        .route("/api/players/:id/referral-code", post(create_referral_code))
        .route("/api/players/:id/tickets", get(get_tickets))
        .route("/api/referrals", post(register_referral))
        .route("/api/referrals/qualify", post(qualify_referral))
        .route("/api/referrals/:code", get(resolve_code))
        .with_state(state)
}
