//! Identity-injection middleware: bearer-token verification or a fixed
//! anonymous identity.
//!
//! Responsibility:
//! - Extract the raw token from `Authorization`, hand it to the injected
//!   verifier, and put a typed `RequestIdentity` into request extensions.
//! - Reject with the JSON failure body (401) without calling the next
//!   handler; the logging middleware sits outside and still records the
//!   rejection.
//!
//! The rest of the pipeline does not care which of the two strategies ran.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::RequestIdentity;
use crate::error::AppError;
use crate::services::oidc::ParseToken;

/// `"Bearer "` — the scheme prefix length governs token slicing below.
const SCHEME_PREFIX: &str = "Bearer ";

/// Bearer-token strategy. Owns the verifier handle (shared, read-only) and
/// the client id whose `resource_access` entry becomes the role set.
#[derive(Clone)]
pub struct BearerAuth {
    verifier: Arc<dyn ParseToken>,
    client_id: Arc<str>,
}

impl BearerAuth {
    pub fn new(verifier: Arc<dyn ParseToken>, client_id: &str) -> Self {
        Self {
            verifier,
            client_id: Arc::from(client_id),
        }
    }

    /// Wrap a route group so every request must carry a valid token.
    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(middleware::from_fn_with_state(self, bearer_middleware))
    }
}

async fn bearer_middleware(
    State(auth): State<BearerAuth>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();

    if header_value.is_empty() {
        tracing::error!("token not present");
        return Err(AppError::TokenMissing);
    }
    if header_value.len() < SCHEME_PREFIX.len() {
        tracing::error!("token not present");
        return Err(AppError::TokenMissing);
    }

    // Slice off the scheme by length alone; the prefix content is
    // deliberately not compared against "Bearer " (see DESIGN.md).
    let raw_token = header_value.get(SCHEME_PREFIX.len()..).unwrap_or_default();

    let claims = auth.verifier.parse(raw_token).map_err(|err| {
        tracing::error!(error = %err, "token not valid");
        AppError::TokenInvalid
    })?;

    let identity = RequestIdentity::new(
        claims.principal(),
        claims.client_roles(&auth.client_id).to_vec(),
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Anonymous strategy: every request gets the fixed identity. Drop-in
/// substitute for `BearerAuth::apply` when authentication is disabled.
pub fn apply_anonymous<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn(anonymous_middleware))
}

async fn anonymous_middleware(mut req: Request<Body>, next: Next) -> Response {
    req.extensions_mut().insert(RequestIdentity::anonymous());
    next.run(req).await
}
