//! Claims decoded from a verified access token (Keycloak-shaped).
//!
//! NOTE:
//! - `aud` in a JWT can be either a string or an array; we normalize to a
//!   Vec here. Audience *validation* is done by `jsonwebtoken` via
//!   `Validation::set_audience`, not by this type.
//! - Every field is optional/defaulted: the verifier already rejected
//!   tokens with bad signature/exp/iss/aud, so decoding is best-effort.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// A `roles` wrapper as Keycloak nests it under `realm_access` and each
/// `resource_access` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleSet {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Immutable view of a verified token. Constructed fresh per successful
/// verification, dropped at the end of the request.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(default, deserialize_with = "string_or_seq")]
    pub aud: Vec<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub nbf: Option<i64>,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default, rename = "typ")]
    pub token_type: Option<String>,
    /// Authorized party: the client the token was issued to.
    #[serde(default)]
    pub azp: Option<String>,
    #[serde(default)]
    pub acr: Option<String>,

    #[serde(default)]
    pub realm_access: RoleSet,
    /// client-name -> role set
    #[serde(default)]
    pub resource_access: HashMap<String, RoleSet>,

    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Claims {
    /// Display principal for logging and request identity.
    pub fn principal(&self) -> &str {
        self.preferred_username.as_deref().unwrap_or_default()
    }

    /// Role set granted to one client, empty when the token carries none.
    pub fn client_roles(&self, client: &str) -> &[String] {
        self.resource_access
            .get(client)
            .map(|set| set.roles.as_slice())
            .unwrap_or(&[])
    }
}

fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}
