use serde_json::Value;

use crate::claims::ClaimSink;
use crate::models::{Affiliation, MapperModel};
use crate::services::MapperError;

/// Affiliations encoded as a JSON array of `{"name", "label"}` objects.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimPayload(Value);

impl ClaimPayload {
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Compact JSON text of the payload.
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }
}

/// Serializes affiliations and hands them to the token's claim primitive.
pub struct ClaimBuilder;

impl ClaimBuilder {
    pub fn build(affiliations: &[Affiliation]) -> Result<ClaimPayload, MapperError> {
        let value = serde_json::to_value(affiliations)?;
        Ok(ClaimPayload(value))
    }

    /// Serialize `affiliations` and insert them into `token` as configured by
    /// `model`. The value is inserted as a JSON array, not as JSON text.
    pub fn build_and_insert<T>(
        affiliations: &[Affiliation],
        token: &mut T,
        model: &MapperModel,
        username: &str,
    ) -> Result<(), MapperError>
    where
        T: ClaimSink + ?Sized,
    {
        let payload = Self::build(affiliations).map_err(|e| {
            tracing::error!(
                mapper = %model.name,
                username = %username,
                count = affiliations.len(),
                error = %e,
                "Failed to serialize companies"
            );
            e
        })?;

        tracing::debug!(mapper = %model.name, companies = %payload.to_json_string(), "Companies claim built");

        token
            .map_claim(model, payload.into_value())
            .map_err(|e| {
                tracing::error!(
                    mapper = %model.name,
                    username = %username,
                    error = %e,
                    "Failed to map companies claim"
                );
                MapperError::from(e)
            })
    }
}
