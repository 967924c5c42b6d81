//! OIDC discovery: fetch the provider metadata and its JWKS.
//!
//! Both fetches happen once, while the verifier is being constructed.
//! There is no background refresh; rotating provider keys requires a
//! process restart (rebuild of the verifier).

use jsonwebtoken::jwk::JwkSet;
use serde::Deserialize;

use super::verifier::VerifierError;

/// The subset of the discovery document we need.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMetadata {
    pub issuer: String,
    pub jwks_uri: String,
}

/// `<issuer>/.well-known/openid-configuration`
pub fn well_known_url(issuer_url: &str) -> String {
    format!(
        "{}/.well-known/openid-configuration",
        issuer_url.trim_end_matches('/')
    )
}

pub async fn fetch_metadata(
    http: &reqwest::Client,
    issuer_url: &str,
) -> Result<ProviderMetadata, VerifierError> {
    let metadata: ProviderMetadata = http
        .get(well_known_url(issuer_url))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    // The provider must announce itself as the issuer we were configured
    // with, otherwise every token it signs would fail `iss` validation.
    if metadata.issuer.trim_end_matches('/') != issuer_url.trim_end_matches('/') {
        return Err(VerifierError::IssuerMismatch {
            expected: issuer_url.to_string(),
            actual: metadata.issuer,
        });
    }

    Ok(metadata)
}

pub async fn fetch_jwks(
    http: &reqwest::Client,
    jwks_uri: &str,
) -> Result<JwkSet, VerifierError> {
    let jwks: JwkSet = http
        .get(jwks_uri)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(jwks)
}
