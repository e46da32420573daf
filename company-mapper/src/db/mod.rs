//! Driver registry and per-call connections to the companies store.
//!
//! Connections are opened for a single lookup and never pooled. A
//! `DbConnection` that is dropped without `close` still releases its socket.

use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::fmt;
use std::str::FromStr;

use crate::config::DataSourceConfig;
use crate::models::AffiliationRow;

const COMPANIES_QUERY_NUMBERED: &str = r#"
    SELECT c.name, c.label
    FROM companies c
    JOIN users u ON u.id = c.label
    WHERE u.username = $1
    "#;

const COMPANIES_QUERY_POSITIONAL: &str = r#"
    SELECT c.name, c.label
    FROM companies c
    JOIN users u ON u.id = c.label
    WHERE u.username = ?
    "#;

/// Database backends the mapper can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Postgres,
    MySql,
    Sqlite,
}

impl Driver {
    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Postgres => "postgres",
            Driver::MySql => "mysql",
            Driver::Sqlite => "sqlite",
        }
    }

    /// Affiliation lookup with this backend's bind placeholder.
    pub fn companies_query(&self) -> &'static str {
        match self {
            Driver::Postgres => COMPANIES_QUERY_NUMBERED,
            Driver::MySql | Driver::Sqlite => COMPANIES_QUERY_POSITIONAL,
        }
    }

    /// Turn a JDBC-style URL into one sqlx understands.
    pub fn normalize_url(&self, url: &str) -> String {
        let url = url.trim();
        let url = url.strip_prefix("jdbc:").unwrap_or(url);
        match self {
            Driver::MySql => match url.strip_prefix("mariadb:") {
                Some(rest) => format!("mysql:{rest}"),
                None => url.to_string(),
            },
            Driver::Postgres | Driver::Sqlite => url.to_string(),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = String;

    /// Accepts JDBC driver class names and short backend names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "org.postgresql.Driver" => return Ok(Driver::Postgres),
            "org.mariadb.jdbc.Driver" | "com.mysql.cj.jdbc.Driver" | "com.mysql.jdbc.Driver" => {
                return Ok(Driver::MySql)
            }
            "org.sqlite.JDBC" => return Ok(Driver::Sqlite),
            _ => {}
        }

        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Driver::Postgres),
            "mysql" | "mariadb" => Ok(Driver::MySql),
            "sqlite" => Ok(Driver::Sqlite),
            _ => Err(format!("Unknown database driver: {}", s)),
        }
    }
}

/// Postgres options from the configured URL. Non-empty username/password
/// override whatever the URL carries.
pub fn pg_options(config: &DataSourceConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let url = Driver::Postgres.normalize_url(&config.url);
    let mut options = PgConnectOptions::from_str(&url)?;
    if !config.username.is_empty() {
        options = options.username(&config.username);
    }
    let password = config.password.expose_secret();
    if !password.is_empty() {
        options = options.password(password);
    }
    Ok(options)
}

/// MySQL/MariaDB options, with the same credential override as `pg_options`.
pub fn mysql_options(config: &DataSourceConfig) -> Result<MySqlConnectOptions, sqlx::Error> {
    let url = Driver::MySql.normalize_url(&config.url);
    let mut options = MySqlConnectOptions::from_str(&url)?;
    if !config.username.is_empty() {
        options = options.username(&config.username);
    }
    let password = config.password.expose_secret();
    if !password.is_empty() {
        options = options.password(password);
    }
    Ok(options)
}

/// A single open connection to one of the supported backends.
pub enum DbConnection {
    Postgres(PgConnection),
    MySql(MySqlConnection),
    Sqlite(SqliteConnection),
}

impl DbConnection {
    /// Open one connection using the configured URL and credentials.
    pub async fn open(driver: Driver, config: &DataSourceConfig) -> Result<Self, sqlx::Error> {
        match driver {
            Driver::Postgres => {
                let options = pg_options(config)?;
                Ok(DbConnection::Postgres(PgConnection::connect_with(&options).await?))
            }
            Driver::MySql => {
                let options = mysql_options(config)?;
                Ok(DbConnection::MySql(MySqlConnection::connect_with(&options).await?))
            }
            Driver::Sqlite => {
                let url = driver.normalize_url(&config.url);
                let options = SqliteConnectOptions::from_str(&url)?;
                Ok(DbConnection::Sqlite(SqliteConnection::connect_with(&options).await?))
            }
        }
    }

    pub fn driver(&self) -> Driver {
        match self {
            DbConnection::Postgres(_) => Driver::Postgres,
            DbConnection::MySql(_) => Driver::MySql,
            DbConnection::Sqlite(_) => Driver::Sqlite,
        }
    }

    /// Run the affiliation lookup with `username` as the only bound parameter.
    pub async fn fetch_affiliation_rows(
        &mut self,
        username: &str,
    ) -> Result<Vec<AffiliationRow>, sqlx::Error> {
        let sql = self.driver().companies_query();
        match self {
            DbConnection::Postgres(conn) => {
                sqlx::query_as::<_, AffiliationRow>(sql)
                    .bind(username)
                    .fetch_all(conn)
                    .await
            }
            DbConnection::MySql(conn) => {
                sqlx::query_as::<_, AffiliationRow>(sql)
                    .bind(username)
                    .fetch_all(conn)
                    .await
            }
            DbConnection::Sqlite(conn) => {
                sqlx::query_as::<_, AffiliationRow>(sql)
                    .bind(username)
                    .fetch_all(conn)
                    .await
            }
        }
    }

    /// Gracefully terminate the connection.
    pub async fn close(self) -> Result<(), sqlx::Error> {
        match self {
            DbConnection::Postgres(conn) => conn.close().await,
            DbConnection::MySql(conn) => conn.close().await,
            DbConnection::Sqlite(conn) => conn.close().await,
        }
    }
}
