/*
 * Responsibility
 * - GET /ping (疎通用)
 * - middleware を通した認証済み identity の確認用
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::api::v1::extractors::Identity;

pub async fn ping(Identity(identity): Identity) -> impl IntoResponse {
    tracing::info!(principal = %identity.principal, "request ends with no error");
    (StatusCode::OK, Json(json!({"result": "ping"})))
}
