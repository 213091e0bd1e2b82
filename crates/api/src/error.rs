use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use footy_models::FootyError;
use tracing::error;

use crate::routes::ApiResponse;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FootyError> for ApiError {
    fn from(err: FootyError) -> Self {
        match err {
            FootyError::UnknownTeam { .. } => Self::NotFound(err.to_string()),
            FootyError::InvalidSpeed { .. } | FootyError::InvalidRecord(_) | FootyError::InvalidOdds(_) => {
                Self::BadRequest(err.to_string())
            }
            FootyError::InvalidTransition { .. } => Self::Conflict(err.to_string()),
            other => Self::Internal(other.into()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(m) | Self::NotFound(m) | Self::Conflict(m) => m,
            Self::Internal(e) => {
                error!("❌ Request failed: {:#}", e);
                "Internal server error".to_string()
            }
        };
        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
