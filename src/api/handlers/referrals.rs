use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use std::sync::Arc;

use super::{blocking, AppState};
use crate::api::models::{
    QualifyReferralRequest, QualifyReferralResponse, RegisterReferralRequest, RegisterReferralResponse,
    ResolvedCodeResponse,
};
use crate::domain::{PlayerId, QualifyingProof};
use crate::errors::LedgerResult;
use crate::services::referrals::normalize_code;

pub async fn resolve_code(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> LedgerResult<Json<ResolvedCodeResponse>> {
    let code = normalize_code(&code);
    let lookup = code.clone();
    let referrer_id = blocking(&state, move |s| s.referrals.resolve_code(&lookup)).await?;
    Ok(Json(ResolvedCodeResponse { code, referrer_id }))
}

pub async fn register_referral(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterReferralRequest>, JsonRejection>,
) -> LedgerResult<Json<RegisterReferralResponse>> {
    let Json(request) = payload?;
    let referee_id = PlayerId::new(request.referee_id);
    let proof = QualifyingProof {
        verified_signup: request.verified_signup,
    };
    let code = request.code;
    let registered = blocking(&state, move |s| {
        s.referrals.register_referral(&referee_id, &code, proof)
    })
    .await?;
    Ok(Json(RegisterReferralResponse { registered }))
}

pub async fn qualify_referral(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QualifyReferralRequest>, JsonRejection>,
) -> LedgerResult<Json<QualifyReferralResponse>> {
    let Json(request) = payload?;
    let referee_id = PlayerId::new(request.referee_id);
    let qualified = blocking(&state, move |s| s.referrals.qualify_referral(&referee_id)).await?;
    Ok(Json(QualifyReferralResponse { qualified }))
}
