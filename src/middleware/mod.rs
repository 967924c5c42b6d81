/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth (bearer / anonymous), cors, request_log
 */
pub mod auth;
pub mod cors;
pub mod request_log;
