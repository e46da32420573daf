use std::sync::Arc;

use crate::claims::{self, ClaimSink};
use crate::config::{
    DataSourceConfig, CONFIG_KEY_DB_PASSWORD, CONFIG_KEY_DB_USERNAME, CONFIG_KEY_JDBC_DRIVER,
    CONFIG_KEY_JDBC_URL, DEFAULT_JDBC_DRIVER, INCLUDE_IN_ACCESS_TOKEN, INCLUDE_IN_ID_TOKEN,
    INCLUDE_IN_USERINFO, JSON_TYPE, TOKEN_CLAIM_NAME,
};
use crate::models::{ConfigProperty, MapperDescriptor, MapperModel, PropertyType, TokenKind};
use crate::services::{ClaimBuilder, CompanyRepository, MapperError, SqlCompanyRepository};

pub const PROVIDER_ID: &str = "custom-protocol-mapper";

const JSON_TYPE_OPTIONS: &[&str] = &["String", "long", "int", "boolean", "JSON"];

/// Token mapper that adds the user's companies as a claim.
///
/// Holds no per-request state; one instance serves concurrent issuances.
#[derive(Clone)]
pub struct CompanyMapper {
    repository: Arc<dyn CompanyRepository>,
}

impl CompanyMapper {
    /// Mapper backed by the relational store named in each model.
    pub fn new() -> Self {
        Self::with_repository(Arc::new(SqlCompanyRepository::new()))
    }

    pub fn with_repository(repository: Arc<dyn CompanyRepository>) -> Self {
        Self { repository }
    }

    /// Provider metadata and configuration schema.
    pub fn descriptor() -> MapperDescriptor {
        MapperDescriptor {
            id: PROVIDER_ID,
            display_category: "Token Mapper",
            display_type: "Custom Token Mapper",
            help_text: "Custom Protocol Mapper : Add database user companies",
            properties: vec![
                ConfigProperty {
                    name: TOKEN_CLAIM_NAME,
                    label: "Token Claim Name",
                    help_text: "Name of the claim to insert into the token. Dots nest the claim, use '\\.' for a literal dot.",
                    property_type: PropertyType::String,
                    default_value: Some("companies"),
                    options: &[],
                },
                ConfigProperty {
                    name: JSON_TYPE,
                    label: "Claim JSON Type",
                    help_text: "JSON type used to populate the claim.",
                    property_type: PropertyType::List,
                    default_value: Some("JSON"),
                    options: JSON_TYPE_OPTIONS,
                },
                ConfigProperty {
                    name: INCLUDE_IN_ACCESS_TOKEN,
                    label: "Add to access token",
                    help_text: "Should the claim be added to the access token?",
                    property_type: PropertyType::Boolean,
                    default_value: Some("true"),
                    options: &[],
                },
                ConfigProperty {
                    name: INCLUDE_IN_ID_TOKEN,
                    label: "Add to ID token",
                    help_text: "Should the claim be added to the ID token?",
                    property_type: PropertyType::Boolean,
                    default_value: Some("true"),
                    options: &[],
                },
                ConfigProperty {
                    name: INCLUDE_IN_USERINFO,
                    label: "Add to userinfo",
                    help_text: "Should the claim be added to the userinfo?",
                    property_type: PropertyType::Boolean,
                    default_value: Some("true"),
                    options: &[],
                },
                ConfigProperty {
                    name: CONFIG_KEY_JDBC_DRIVER,
                    label: "JDBC Driver",
                    help_text: "The JDBC driver class name",
                    property_type: PropertyType::String,
                    default_value: Some(DEFAULT_JDBC_DRIVER),
                    options: &[],
                },
                ConfigProperty {
                    name: CONFIG_KEY_JDBC_URL,
                    label: "JDBC URL",
                    help_text: "The URL of your database",
                    property_type: PropertyType::String,
                    default_value: Some(""),
                    options: &[],
                },
                ConfigProperty {
                    name: CONFIG_KEY_DB_USERNAME,
                    label: "Database Username",
                    help_text: "The username for database access",
                    property_type: PropertyType::String,
                    default_value: Some(""),
                    options: &[],
                },
                ConfigProperty {
                    name: CONFIG_KEY_DB_PASSWORD,
                    label: "Database Password",
                    help_text: "The password for database access",
                    property_type: PropertyType::Password,
                    default_value: Some(""),
                    options: &[],
                },
            ],
        }
    }

    /// Resolve the user's companies and insert them into `token`.
    ///
    /// Any failure aborts the mapping and is returned to the caller; the
    /// token is left untouched in that case.
    pub async fn set_claim<T>(
        &self,
        token: &mut T,
        model: &MapperModel,
        username: &str,
    ) -> Result<(), MapperError>
    where
        T: ClaimSink + ?Sized,
    {
        let config = DataSourceConfig::resolve(model);

        let affiliations = self
            .repository
            .fetch_affiliations(username, &config)
            .await?;

        tracing::debug!(
            mapper = %model.name,
            username = %username,
            count = affiliations.len(),
            "Fetched companies"
        );

        ClaimBuilder::build_and_insert(&affiliations, token, model, username)
    }

    /// Entry point for a token of a given kind. Skips the lookup entirely when
    /// the model does not include the claim in `kind`.
    pub async fn transform<T>(
        &self,
        token: &mut T,
        model: &MapperModel,
        username: &str,
        kind: TokenKind,
    ) -> Result<(), MapperError>
    where
        T: ClaimSink + ?Sized,
    {
        if !claims::includes(model, kind) {
            tracing::debug!(
                mapper = %model.name,
                token_kind = kind.as_str(),
                "Claim not included in token kind, skipping"
            );
            return Ok(());
        }

        self.set_claim(token, model, username).await
    }
}

impl Default for CompanyMapper {
    fn default() -> Self {
        Self::new()
    }
}
