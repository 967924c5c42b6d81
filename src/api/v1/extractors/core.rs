use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::RequestIdentity;

/// Handler で RequestIdentity を受け取るための extractor
/// middleware が RequestIdentity を request.extensions() に insert 済みである前提
/// 見つからない場合は 401（認証がかかってない・ミドルウェア未設定）
pub struct Identity(pub RequestIdentity);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .map(Identity)
            .ok_or(AppError::TokenMissing)
    }
}
