use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::models::ErrorBody;
use crate::errors::LedgerError;

pub fn status_for(error: &LedgerError) -> StatusCode {
    match error {
        LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::Conflict(_) => StatusCode::CONFLICT,
        LedgerError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        match &self {
            LedgerError::Storage(message) => log::error!("Storage failure: {message}"),
            LedgerError::Conflict(message) => log::warn!("Conflict: {message}"),
            LedgerError::Validation(message) => log::warn!("Rejected request: {message}"),
            LedgerError::NotFound(_) => {}
        }

        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// Extractor rejections are malformed input.
impl From<JsonRejection> for LedgerError {
    fn from(rejection: JsonRejection) -> Self {
        LedgerError::validation(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for LedgerError {
    fn from(rejection: PathRejection) -> Self {
        LedgerError::validation(format!("invalid path: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for LedgerError {
    fn from(rejection: QueryRejection) -> Self {
        LedgerError::validation(format!("invalid query: {}", rejection.body_text()))
    }
}
