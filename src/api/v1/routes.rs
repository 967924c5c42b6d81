/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証 (bearer/anonymous) を掛ける範囲は app.rs 側で route group に適用する
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::ping::ping;

pub fn routes() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}
