use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::error::DomainError;

/// Failures of a REST call, rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("Request body must be a JSON object")]
    NotAnObject,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => domain_status(e),
            ApiError::InvalidJson(_) | ApiError::NotAnObject => StatusCode::BAD_REQUEST,
        }
    }
}

/// Map domain errors to HTTP status codes.
pub fn domain_status(e: &DomainError) -> StatusCode {
    match e {
        DomainError::InvalidId { .. }
        | DomainError::NoData
        | DomainError::MissingFields
        | DomainError::InvalidRank { .. }
        | DomainError::InvalidSuit { .. } => StatusCode::BAD_REQUEST,
        DomainError::CardNotFound | DomainError::NoDataFound => StatusCode::NOT_FOUND,
        DomainError::DuplicateKey { .. } => StatusCode::CONFLICT,
        DomainError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = %message, status = status.as_u16(), "request failed");
        } else {
            tracing::warn!(error = %message, status = status.as_u16(), "request failed");
        }

        // Empty search keeps its historical capitalized key.
        let body = match self {
            ApiError::Domain(DomainError::NoDataFound) => json!({ "Message": message }),
            _ => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        let cases = [
            (DomainError::invalid_id("x"), StatusCode::BAD_REQUEST),
            (DomainError::no_data(), StatusCode::BAD_REQUEST),
            (DomainError::invalid_suit("Stars"), StatusCode::BAD_REQUEST),
            (DomainError::card_not_found(), StatusCode::NOT_FOUND),
            (DomainError::no_data_found(), StatusCode::NOT_FOUND),
            (DomainError::duplicate_on_create(), StatusCode::CONFLICT),
            (DomainError::store("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
        assert_eq!(ApiError::NotAnObject.status(), StatusCode::BAD_REQUEST);
    }
}
