/*
 * Responsibility
 * - Config読み込み → 依存生成 (token verifier) → Router 組み立て
 * - Middleware の適用 (CORS → request_log → bearer|anonymous)
 * - Server lifecycle (bind → start → shutdown signal → stop)
 */
use std::panic;

use anyhow::{Context, Result};
use axum::{Router, middleware::from_fn};

use crate::api;
use crate::config::Config;
use crate::middleware::{auth, auth::BearerAuth, cors, request_log};
use crate::server::Server;
use crate::services::oidc::TokenVerifier;
use crate::state::AppState;

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    crate::logging::init(&config);
    init_panic_hook();

    // The verifier is built once here and injected into the middleware;
    // an unreachable provider aborts startup.
    let bearer = match &config.oidc {
        Some(oidc) => Some(BearerAuth::new(
            TokenVerifier::discover(oidc)
                .await
                .context("unable to configure the token provider")?,
            &oidc.client_id,
        )),
        None => None,
    };

    let app = build_router(bearer, &config);

    let server = Server::bind(config.addr, app)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    let addr = server.local_addr().context("listener has no local addr")?;
    tracing::info!(%addr, env = ?config.app_env, "starting HTTP server");
    let handle = server.start();

    shutdown_signal().await;
    handle.stop(config.shutdown_grace).await;

    Ok(())
}

/// Compose the full pipeline: CORS (outermost) → request log → identity
/// injection (bearer when configured, anonymous otherwise) → handlers.
fn build_router(bearer: Option<BearerAuth>, config: &Config) -> Router {
    let v1 = api::v1::routes();
    let v1 = match bearer {
        Some(bearer) => bearer.apply(v1),
        None => auth::apply_anonymous(v1),
    };

    let router = Router::new()
        .nest("/api/v1", v1)
        .with_state(AppState::new())
        // Logging wraps authentication so rejections are recorded too.
        .layer(from_fn(request_log::request_log));

    cors::apply(router, config)
}

fn init_panic_hook() {
    // Keep the default hook (prints to stderr with location).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics via tracing so they don't get lost when stderr is
        // hidden by the process launcher. Observation only: the hook must
        // not stop the unwind, because the request-log layer still has to
        // record the request as a 500 and re-raise.
        tracing::error!(?info, "panic");
        default_hook(info);
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }
}
