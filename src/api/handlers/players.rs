use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;

use super::{blocking, AppState};
use crate::api::models::{PlayerStatsResponse, ReferralCodeResponse, TicketsResponse};
use crate::config::Sport;
use crate::domain::PlayerId;
use crate::errors::LedgerResult;

pub async fn get_player_stats(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> LedgerResult<Json<Vec<PlayerStatsResponse>>> {
    let player_id = PlayerId::new(player_id);
    let rows = blocking(&state, move |s| s.recorder.stats().for_player(&player_id)).await?;
    Ok(Json(rows.into_iter().map(PlayerStatsResponse::from).collect()))
}

pub async fn get_player_sport_stats(
    State(state): State<Arc<AppState>>,
    Path((player_id, sport)): Path<(String, String)>,
) -> LedgerResult<Json<PlayerStatsResponse>> {
    let sport: Sport = sport.parse()?;
    let player_id = PlayerId::new(player_id);
    let row = blocking(&state, move |s| s.recorder.stats().get(&player_id, sport)).await?;
    Ok(Json(row.into()))
}

pub async fn create_referral_code(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> LedgerResult<Json<ReferralCodeResponse>> {
    let player_id = PlayerId::new(player_id);
    let code = blocking(&state, move |s| s.referrals.get_or_create_code(&player_id)).await?;
    let url = state.referrals.invite_url(&code);
    Ok(Json(ReferralCodeResponse { code, url }))
}

pub async fn get_tickets(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> LedgerResult<Json<TicketsResponse>> {
    let player_id = PlayerId::new(player_id);
    let lookup_id = player_id.clone();
    let row = blocking(&state, move |s| s.referrals.tickets(&lookup_id)).await?;
    Ok(Json(TicketsResponse::new(player_id, row)))
}
