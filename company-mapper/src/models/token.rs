//! Token under construction, as handed to mappers by the issuance pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token variants a mapper can contribute claims to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    AccessToken,
    IdToken,
    UserInfo,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::AccessToken => "access_token",
            TokenKind::IdToken => "id_token",
            TokenKind::UserInfo => "userinfo",
        }
    }
}

/// Mutable claim set of a token being issued.
///
/// Standard claims, signing and expiry belong to the issuer; mappers only
/// ever add entries to `other_claims`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdToken {
    #[serde(flatten)]
    pub other_claims: Map<String, Value>,
}

impl IdToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a top-level claim.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.other_claims.get(name)
    }

    pub fn other_claims_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.other_claims
    }
}
