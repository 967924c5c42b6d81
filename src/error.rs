/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - 認証失敗を {"status","httpCode","message"} の形に統一して返す
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("token not present")]
    TokenMissing,

    #[error("token not valid")]
    TokenInvalid,
}

/// Wire shape for request rejections. Clients match on `message`, so the
/// texts above are part of the API contract.
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub status: &'static str,
    #[serde(rename = "httpCode")]
    pub http_code: u16,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::TokenMissing | AppError::TokenInvalid => StatusCode::UNAUTHORIZED,
        };

        let body = FailureBody {
            status: "FAILED",
            http_code: status.as_u16(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
