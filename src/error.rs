use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure modes surfaced by the employee handlers.
///
/// Every variant maps to a status plus a `{"message": ...}` JSON body, with
/// one exception: `MalformedId` answers in plain text, matching the shape
/// clients of this API already depend on.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Credentials Invalid")]
    CredentialsInvalid,
    #[error("{0}")]
    Conflict(String),
    #[error("No employee with id: {0}")]
    MalformedId(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return ApiError::Conflict(db.message().to_string());
            }
        }
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MalformedId(id) => (
                StatusCode::NOT_FOUND,
                format!("No employee with id: {id}"),
            )
                .into_response(),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": message })),
            )
                .into_response(),
            ApiError::Validation(_)
            | ApiError::CredentialsInvalid
            | ApiError::Conflict(_)
            | ApiError::Internal(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": self.to_string() })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;

    #[test]
    fn malformed_id_renders_plain_text_404() {
        let res = ApiError::MalformedId("abc".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let ct = res.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap();
        assert!(ct.starts_with("text/plain"));
    }

    #[test]
    fn not_found_renders_json_404() {
        let res = ApiError::NotFound("No employee with id: x".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let ct = res.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap();
        assert!(ct.starts_with("application/json"));
    }

    #[test]
    fn validation_and_conflict_render_400() {
        let res = ApiError::Validation("Password is required".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = ApiError::Conflict("duplicate key".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn credentials_invalid_uses_generic_message() {
        assert_eq!(ApiError::CredentialsInvalid.to_string(), "Credentials Invalid");
    }
}
