//! Test doubles for the verifier seam, shared by middleware and router
//! tests.

use std::sync::{Arc, Mutex};

use super::{Claims, ParseToken, VerifierError};

/// Substitute provider: returns fixed claims (or a rejection) and records
/// the raw token it was handed.
pub struct FakeParser {
    claims: Option<Claims>,
    pub seen: Mutex<Option<String>>,
}

impl FakeParser {
    pub fn accepting(claims: Claims) -> Arc<Self> {
        Arc::new(Self {
            claims: Some(claims),
            seen: Mutex::new(None),
        })
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            claims: None,
            seen: Mutex::new(None),
        })
    }
}

impl ParseToken for FakeParser {
    fn parse(&self, raw_token: &str) -> Result<Claims, VerifierError> {
        *self.seen.lock().unwrap() = Some(raw_token.to_string());
        self.claims
            .clone()
            .ok_or(VerifierError::UnknownKey { kid: None })
    }
}

/// Claims for a token issued to "alice" with one client role.
pub fn alice_claims() -> Claims {
    serde_json::from_value(serde_json::json!({
        "preferred_username": "alice",
        "resource_access": { "quickstart-cli": { "roles": ["reader"] } }
    }))
    .unwrap()
}
