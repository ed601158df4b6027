use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Rejections raised by the form before anything leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please fill in all fields before submitting")]
    IncompleteFields,
    #[error("please enter a valid email address")]
    InvalidEmail,
    #[error("please select a rating between 1 and 5")]
    InvalidRating,
}

/// Failure talking to the backend data store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database: {0}")]
    Database(String),
    #[error("upstream: {0}")]
    Upstream(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<libsql::Error> for StoreError {
    fn from(e: libsql::Error) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Upstream(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("remote write failed: {0}")]
    RemoteWrite(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Submit(SubmitError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Submit(SubmitError::RemoteWrite(_)) => StatusCode::BAD_GATEWAY,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let resp = AppError::from(SubmitError::from(ValidationError::InvalidEmail)).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = AppError::from(SubmitError::from(StoreError::Upstream("timeout".into())))
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let resp = AppError::NotFound("no feedback yet".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_messages() {
        let e = SubmitError::from(ValidationError::IncompleteFields);
        assert_eq!(e.to_string(), "please fill in all fields before submitting");
        let e = SubmitError::from(StoreError::Database("locked".into()));
        assert_eq!(e.to_string(), "remote write failed: database: locked");
    }
}
