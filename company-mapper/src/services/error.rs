use service_core::error::AppError;
use thiserror::Error;

use crate::claims::ClaimMappingError;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Database driver not available: {0}")]
    DriverUnavailable(String),

    #[error("Database error while fetching companies for username={username}: {source}")]
    DataSource {
        username: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to serialize companies claim: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to map companies claim: {0}")]
    ClaimMapping(#[from] ClaimMappingError),
}

impl MapperError {
    pub fn data_source(username: &str, source: sqlx::Error) -> Self {
        MapperError::DataSource {
            username: username.to_string(),
            source,
        }
    }
}

impl From<MapperError> for AppError {
    fn from(err: MapperError) -> Self {
        match err {
            MapperError::DriverUnavailable(driver) => AppError::ConfigError(anyhow::anyhow!(
                "Database driver not available: {}",
                driver
            )),
            e @ MapperError::DataSource { .. } => AppError::DatabaseError(anyhow::Error::new(e)),
            MapperError::Serialization(e) => AppError::SerializationError(e),
            e @ MapperError::ClaimMapping(_) => AppError::InternalError(anyhow::Error::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_unavailable_is_a_config_error() {
        let err: AppError = MapperError::DriverUnavailable("com.example.Missing".to_string()).into();

        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("com.example.Missing"));
    }

    #[test]
    fn data_source_error_keeps_username_and_is_transient() {
        let mapper_err = MapperError::data_source("alice", sqlx::Error::PoolTimedOut);
        assert!(mapper_err.to_string().contains("username=alice"));

        let err: AppError = mapper_err.into();
        assert!(matches!(err, AppError::DatabaseError(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn claim_mapping_error_is_internal() {
        let err: AppError =
            MapperError::ClaimMapping(ClaimMappingError::UnsupportedType("uuid".to_string())).into();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
