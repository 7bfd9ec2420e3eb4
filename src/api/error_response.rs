use crate::utils::error::{ErrorCategory, FacadeError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const GENERAL_ERROR_CODE: &str = "GENERAL_ERROR";
pub const GENERAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// 對外的錯誤主體：`{"error": code, "message": message}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub error: &'a str,
    pub message: &'a str,
}

/// 錯誤 → (HTTP 狀態, 代碼, 訊息)。分類表內的錯誤一律 400，
/// 其他錯誤只回傳通用訊息，不洩漏內部細節
pub fn map_failure(error: &FacadeError) -> (StatusCode, &'static str, String) {
    match error.code() {
        Some(code) => (StatusCode::BAD_REQUEST, code, error.to_string()),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            GENERAL_ERROR_CODE,
            GENERAL_ERROR_MESSAGE.to_string(),
        ),
    }
}

impl IntoResponse for FacadeError {
    fn into_response(self) -> Response {
        let (status, code, message) = map_failure(&self);

        match self.category() {
            ErrorCategory::Internal => tracing::error!("Unclassified failure: {}", self),
            ErrorCategory::Upstream => tracing::warn!("Handling {} because {}", code, message),
            ErrorCategory::Validation | ErrorCategory::NotFound => {
                tracing::info!("Handling {} because {}", code, message)
            }
        }

        (
            status,
            Json(ErrorResponse {
                error: code,
                message: &message,
            }),
        )
            .into_response()
    }
}
