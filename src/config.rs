/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可、OIDC 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Identity-provider settings. Present only when authentication is enabled;
/// deployments with `AUTH_ENABLED=false` run the anonymous identity strategy
/// and never talk to a provider.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Issuer base URL. The discovery document is fetched from
    /// `<issuer>/.well-known/openid-configuration`.
    pub issuer_url: Url,
    /// Expected client id; doubles as the token audience and as the
    /// `resource_access` key the role set is read from.
    pub client_id: String,
    /// Bound on every HTTP round-trip to the provider.
    pub provider_timeout: Duration,
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub cors_allowed_origins: Vec<String>,

    /// Default tracing filter (EnvFilter directives, e.g.
    /// "info,quickstart_api::middleware=debug"). `RUST_LOG` wins when set.
    pub log_filter: Option<String>,

    /// How long `stop` waits for in-flight requests before aborting them.
    pub shutdown_grace: Duration,

    pub oidc: Option<OidcConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins =
            parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let log_filter = std::env::var("LOG_FILTER").ok().filter(|s| !s.is_empty());

        let shutdown_grace = Duration::from_secs(
            std::env::var("SHUTDOWN_GRACE_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        );

        let auth_enabled = std::env::var("AUTH_ENABLED")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(true);

        let oidc = if auth_enabled {
            let issuer_raw = std::env::var("OIDC_ISSUER_URL")
                .map_err(|_| ConfigError::Missing("OIDC_ISSUER_URL"))?;
            let issuer_url =
                Url::parse(&issuer_raw).map_err(|_| ConfigError::Invalid("OIDC_ISSUER_URL"))?;

            let client_id = std::env::var("OIDC_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("OIDC_CLIENT_ID"))?;
            if client_id.trim().is_empty() {
                return Err(ConfigError::Invalid("OIDC_CLIENT_ID"));
            }

            let provider_timeout = Duration::from_secs(
                std::env::var("PROVIDER_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(30),
            );

            Some(OidcConfig {
                issuer_url,
                client_id,
                provider_timeout,
            })
        } else {
            None
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            log_filter,
            shutdown_grace,
            oidc,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
