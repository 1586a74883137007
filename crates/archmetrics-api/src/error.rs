use archmetrics_core::MetricsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Analysis error: {0}")]
    Analysis(#[from] MetricsError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Analysis(err) => match err {
                MetricsError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                MetricsError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                MetricsError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_errors_map_to_http_status() {
        let cases = [
            (
                MetricsError::InvalidInput("empty".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                MetricsError::Timeout {
                    operation: "static".into(),
                    limit_ms: 10,
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                MetricsError::Cancelled("evolution".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                MetricsError::InternalGenerationFailure("rng".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn internal_errors_are_500() {
        let response = ApiError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
