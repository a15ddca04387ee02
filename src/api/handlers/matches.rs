use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::{blocking, AppState};
use crate::api::models::{MatchListParams, MatchResponse, RecordMatchRequest, RecordMatchResponse};
use crate::config::Sport;
use crate::domain::MatchId;
use crate::errors::{LedgerError, LedgerResult};

const DEFAULT_HISTORY_LIMIT: usize = 20;
const MAX_HISTORY_LIMIT: usize = 200;

pub async fn record_match(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecordMatchRequest>, JsonRejection>,
) -> LedgerResult<(StatusCode, Json<RecordMatchResponse>)> {
    let Json(request) = payload?;
    let draft = request.into_draft()?;
    let match_id = blocking(&state, move |s| s.recorder.record_match(&draft)).await?;
    Ok((StatusCode::CREATED, Json(RecordMatchResponse { match_id })))
}

pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MatchListParams>, QueryRejection>,
) -> LedgerResult<Json<Vec<MatchResponse>>> {
    let Query(params) = query?;
    let matches = match (params.game_id, params.sport) {
        (Some(game_id), _) => blocking(&state, move |s| s.recorder.list_by_game(&game_id)).await?,
        (None, Some(sport)) => {
            let sport: Sport = sport.parse()?;
            let limit = params
                .limit
                .unwrap_or(DEFAULT_HISTORY_LIMIT)
                .clamp(1, MAX_HISTORY_LIMIT);
            blocking(&state, move |s| s.recorder.list_by_sport(sport, limit)).await?
        }
        (None, None) => return Err(LedgerError::validation("pass either sport or gameId")),
    };

    Ok(Json(matches.into_iter().map(MatchResponse::from).collect()))
}

pub async fn get_match(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> LedgerResult<Json<MatchResponse>> {
    let Path(match_id) = path?;
    let found = blocking(&state, move |s| s.recorder.find(MatchId(match_id))).await?;
    Ok(Json(found.into()))
}
