use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::config::DataSourceConfig;
use crate::db::{DbConnection, Driver};
use crate::models::Affiliation;
use crate::services::MapperError;

/// Source of company affiliations for a login username.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Return every affiliation of `username`, in the store's result order.
    ///
    /// No matches is `Ok(vec![])`, not an error.
    async fn fetch_affiliations(
        &self,
        username: &str,
        config: &DataSourceConfig,
    ) -> Result<Vec<Affiliation>, MapperError>;
}

/// Relational repository. Opens one connection per lookup and closes it
/// before returning.
#[derive(Debug, Clone, Default)]
pub struct SqlCompanyRepository;

impl SqlCompanyRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompanyRepository for SqlCompanyRepository {
    async fn fetch_affiliations(
        &self,
        username: &str,
        config: &DataSourceConfig,
    ) -> Result<Vec<Affiliation>, MapperError> {
        let driver: Driver = config.driver.parse().map_err(|_| {
            tracing::error!(
                username = %username,
                driver = %config.driver,
                "Database driver not found"
            );
            MapperError::DriverUnavailable(config.driver.clone())
        })?;

        let mut conn = DbConnection::open(driver, config).await.map_err(|e| {
            tracing::error!(
                username = %username,
                driver = %driver,
                error = %e,
                "Database connection failed while fetching companies"
            );
            MapperError::data_source(username, e)
        })?;

        let result = conn.fetch_affiliation_rows(username).await;

        if let Err(e) = conn.close().await {
            tracing::warn!(driver = %driver, error = %e, "Failed to close database connection cleanly");
        }

        let rows = result.map_err(|e| {
            tracing::error!(
                username = %username,
                driver = %driver,
                error = %e,
                "Database error while fetching companies"
            );
            MapperError::data_source(username, e)
        })?;

        Ok(rows.into_iter().map(Affiliation::from).collect())
    }
}

/// In-memory repository for tests and local wiring.
pub struct MockCompanyRepository {
    affiliations: Mutex<HashMap<String, Vec<Affiliation>>>,
    failure: Option<String>,
    call_count: AtomicUsize,
}

impl MockCompanyRepository {
    pub fn new() -> Self {
        Self {
            affiliations: Mutex::new(HashMap::new()),
            failure: None,
            call_count: AtomicUsize::new(0),
        }
    }

    /// A repository whose every lookup fails with a data source error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    pub fn with_affiliations(self, username: &str, affiliations: Vec<Affiliation>) -> Self {
        if let Ok(mut map) = self.affiliations.lock() {
            map.insert(username.to_string(), affiliations);
        }
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockCompanyRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompanyRepository for MockCompanyRepository {
    async fn fetch_affiliations(
        &self,
        username: &str,
        _config: &DataSourceConfig,
    ) -> Result<Vec<Affiliation>, MapperError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(MapperError::data_source(
                username,
                sqlx::Error::Protocol(message.clone()),
            ));
        }

        let map = self
            .affiliations
            .lock()
            .map_err(|_| {
                MapperError::data_source(
                    username,
                    sqlx::Error::Protocol("mock repository lock poisoned".into()),
                )
            })?;
        Ok(map.get(username).cloned().unwrap_or_default())
    }
}
