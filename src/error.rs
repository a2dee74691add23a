use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// The complete failure taxonomy surfaced by the service. Every failure maps
/// directly to an HTTP status plus a short JSON message; nothing is retried
/// or recovered locally.
///
/// The 401/403 split is deliberate: a missing credential is `Unauthenticated`
/// (401), while a credential that is present but bad — a garbled or expired
/// token, a wrong password, or an authorization denial — is the intentionally
/// coarse `InvalidCredential` (403). `NotFound` stays distinct from denial so
/// a missing target is reported as 404 for every caller, administrators
/// included.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No token was presented on a protected route.
    #[error("authentication required")]
    Unauthenticated,

    /// A credential was presented but did not hold up.
    #[error("{0}")]
    InvalidCredential(String),

    /// The target resource id does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A required field was missing or empty.
    #[error("{0}")]
    Validation(String),

    /// A store-level uniqueness constraint was violated.
    #[error("{0}")]
    Conflict(String),

    /// An unexpected downstream fault; details are logged, not surfaced.
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredential(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
