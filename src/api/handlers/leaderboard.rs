use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
};
use std::sync::Arc;

use super::{blocking, AppState};
use crate::api::models::{LeaderboardEntry, LeaderboardParams, LeaderboardResponse};
use crate::config::Sport;
use crate::errors::LedgerResult;
use crate::services::SortKey;

pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Path(sport): Path<String>,
    query: Result<Query<LeaderboardParams>, QueryRejection>,
) -> LedgerResult<Json<LeaderboardResponse>> {
    let Query(params) = query?;
    let sport: Sport = sport.parse()?;
    let sort_key = match params.sort_by.as_deref() {
        Some(raw) => raw.parse()?,
        None => SortKey::default(),
    };
    let min_matches = params.min_matches;
    let limit = params.limit;

    let rows = blocking(&state, move |s| s.leaderboard.rank(sport, min_matches, sort_key, limit)).await?;

    let entries = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| LeaderboardEntry {
            rank: i + 1,
            stats: row.into(),
        })
        .collect();

    Ok(Json(LeaderboardResponse {
        sport,
        sort_by: sort_key.to_string(),
        min_matches: state.leaderboard.effective_min_matches(params.min_matches),
        entries,
    }))
}
