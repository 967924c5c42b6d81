//! Token verification against the provider's published keys.
//!
//! The verifier is built once at startup and shared read-only across all
//! request tasks; construction failure (provider unreachable, issuer
//! mismatch) is fatal to startup, never per-request.

use std::str::FromStr;
use std::sync::Arc;

use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::config::OidcConfig;

use super::claims::Claims;
use super::discovery;

#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    /// Discovery or JWKS download failed. Raised at construction time only.
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(#[from] reqwest::Error),

    /// The discovery document announces a different issuer than configured.
    #[error("issuer mismatch: provider announces '{actual}', configured '{expected}'")]
    IssuerMismatch { expected: String, actual: String },

    /// No published key matches the token header.
    #[error("no verification key for kid {kid:?}")]
    UnknownKey { kid: Option<String> },

    /// Signature, exp, iss or aud check failed. Nothing in the token is
    /// trusted when this is returned.
    #[error("token rejected: {0}")]
    TokenInvalid(#[from] jsonwebtoken::errors::Error),
}

/// Seam between the middleware and the concrete verifier, so tests can
/// substitute a fake provider.
pub trait ParseToken: Send + Sync {
    fn parse(&self, raw_token: &str) -> Result<Claims, VerifierError>;
}

/// Verifies raw bearer tokens against the provider's JWKS.
pub struct TokenVerifier {
    jwks: JwkSet,
    issuer: String,
    audience: String,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl TokenVerifier {
    /// Fetch the discovery document and JWKS, then build a verifier bound
    /// to the announced issuer and the configured client id.
    pub async fn discover(config: &OidcConfig) -> Result<Arc<Self>, VerifierError> {
        let http = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()?;

        let issuer = config.issuer_url.as_str().trim_end_matches('/');
        let metadata = discovery::fetch_metadata(&http, issuer).await?;
        let jwks = discovery::fetch_jwks(&http, &metadata.jwks_uri).await?;

        tracing::info!(
            issuer = %metadata.issuer,
            keys = jwks.keys.len(),
            "token verifier ready"
        );

        Ok(Arc::new(Self::from_parts(
            jwks,
            metadata.issuer,
            config.client_id.clone(),
        )))
    }

    /// Build from already-fetched key material. Used by `discover` and by
    /// tests that supply a local JWKS.
    pub fn from_parts(jwks: JwkSet, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            jwks,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    fn find_key<'a>(&'a self, kid: Option<&str>) -> Option<&'a Jwk> {
        match kid {
            Some(kid) => self.jwks.find(kid),
            // Tokens without a kid are only verifiable against a single
            // published key.
            None => match self.jwks.keys.as_slice() {
                [only] => Some(only),
                _ => None,
            },
        }
    }
}

/// Prefer the algorithm declared on the key itself over the (attacker
/// controlled) token header.
fn key_algorithm(jwk: &Jwk, header_alg: Algorithm) -> Algorithm {
    jwk.common
        .key_algorithm
        .and_then(|ka| Algorithm::from_str(&ka.to_string()).ok())
        .unwrap_or(header_alg)
}

impl ParseToken for TokenVerifier {
    fn parse(&self, raw_token: &str) -> Result<Claims, VerifierError> {
        let header = jsonwebtoken::decode_header(raw_token)?;

        let jwk = self
            .find_key(header.kid.as_deref())
            .ok_or(VerifierError::UnknownKey {
                kid: header.kid.clone(),
            })?;

        let decoding_key = DecodingKey::from_jwk(jwk)?;

        let mut validation = Validation::new(key_algorithm(jwk, header.alg));
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);

        let data = jsonwebtoken::decode::<Claims>(raw_token, &decoding_key, &validation)?;
        Ok(data.claims)
    }
}
