//! Tracing initialization.
//!
//! Filter precedence:
//! 1. `RUST_LOG` (developer override)
//! 2. `Config.log_filter` (per-module directives from configuration)
//! 3. "info,tower_http=info"
//!
//! Ex:
//! RUST_LOG=info,quickstart_api::middleware=debug cargo run

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config
            .log_filter
            .as_deref()
            .map(EnvFilter::new)
            .unwrap_or_else(|| EnvFilter::new("info,tower_http=info"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
