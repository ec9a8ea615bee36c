use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::EmailTaken => client_error(StatusCode::CONFLICT, &self, None),
            AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::ExpiredToken
            | AppError::RevokedToken => client_error(StatusCode::UNAUTHORIZED, &self, None),
            AppError::NotFound => client_error(
                StatusCode::NOT_FOUND,
                &self,
                Some("The resource you were looking for was not found on this server.".into()),
            ),
            AppError::InvalidInput(ref msg) => {
                client_error(StatusCode::BAD_REQUEST, &self, Some(msg.clone()))
            }
            AppError::Internal(_) => {
                // Detail stays in the logs.
                tracing::error!(error = ?self, "Request failed");
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, None)
            }
        }
    }
}

fn client_error(status: StatusCode, err: &AppError, message: Option<String>) -> Response {
    tracing::debug!(error = %err, status = status.as_u16(), "Request rejected");
    error_resp(status, err.code(), message)
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "message": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}
