//! Resolution of per-mapper settings into typed values.
//!
//! Nothing here validates: a missing key resolves to an empty string (or
//! `false`/`None`) and the stage that consumes it reports the failure.

use secrecy::{Secret, SecretString};

use crate::models::{MapperModel, TokenKind};

pub const CONFIG_KEY_JDBC_DRIVER: &str = "jdbc.driver";
pub const CONFIG_KEY_JDBC_URL: &str = "jdbc.url";
pub const CONFIG_KEY_DB_USERNAME: &str = "db.username";
pub const CONFIG_KEY_DB_PASSWORD: &str = "db.password";

pub const TOKEN_CLAIM_NAME: &str = "claim.name";
pub const JSON_TYPE: &str = "jsonType.label";
pub const INCLUDE_IN_ACCESS_TOKEN: &str = "access.token.claim";
pub const INCLUDE_IN_ID_TOKEN: &str = "id.token.claim";
pub const INCLUDE_IN_USERINFO: &str = "userinfo.token.claim";

pub const DEFAULT_JDBC_DRIVER: &str = "org.mariadb.jdbc.Driver";

/// Connection settings for the companies store.
#[derive(Debug, Clone)]
pub struct DataSourceConfig {
    pub driver: String,
    pub url: String,
    pub username: String,
    pub password: SecretString,
}

impl DataSourceConfig {
    /// Read the four data source keys from the mapper configuration.
    pub fn resolve(model: &MapperModel) -> Self {
        let read = |key: &str| model.get(key).unwrap_or_default().to_string();

        Self {
            driver: read(CONFIG_KEY_JDBC_DRIVER),
            url: read(CONFIG_KEY_JDBC_URL),
            username: read(CONFIG_KEY_DB_USERNAME),
            password: Secret::new(read(CONFIG_KEY_DB_PASSWORD)),
        }
    }
}

/// Host-standard claim placement settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSettings {
    pub claim_name: Option<String>,
    pub json_type: Option<String>,
    pub include_in_access_token: bool,
    pub include_in_id_token: bool,
    pub include_in_userinfo: bool,
}

impl ClaimSettings {
    pub fn resolve(model: &MapperModel) -> Self {
        let non_empty = |key: &str| {
            model
                .get(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let flag = |key: &str| model.get(key) == Some("true");

        Self {
            claim_name: non_empty(TOKEN_CLAIM_NAME),
            json_type: non_empty(JSON_TYPE),
            include_in_access_token: flag(INCLUDE_IN_ACCESS_TOKEN),
            include_in_id_token: flag(INCLUDE_IN_ID_TOKEN),
            include_in_userinfo: flag(INCLUDE_IN_USERINFO),
        }
    }

    /// Whether the claim belongs in the given token variant.
    pub fn includes(&self, kind: TokenKind) -> bool {
        match kind {
            TokenKind::AccessToken => self.include_in_access_token,
            TokenKind::IdToken => self.include_in_id_token,
            TokenKind::UserInfo => self.include_in_userinfo,
        }
    }
}
