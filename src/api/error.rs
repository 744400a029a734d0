//! Mapping of service errors onto HTTP responses.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
}

impl Error {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::PlanRequired { .. } | Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::UserNotFound { .. }
            | Self::ProductNotFound { .. }
            | Self::ArticleNotFound { .. }
            | Self::OrderNotFound { .. }
            | Self::ConversationNotFound { .. } => StatusCode::NOT_FOUND,
            Self::EmailTaken { .. }
            | Self::InsufficientStock { .. }
            | Self::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            Self::Config { .. }
            | Self::Database(_)
            | Self::PasswordHash(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("Request failed: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::UserNotFound { id: "x".into() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::InsufficientStock {
                available: 1,
                requested: 2
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::PlanRequired {
                feature: "buyer chats".into()
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(Error::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::Database(sea_orm::DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
