//! Test helper module for company-mapper integration tests.
//!
//! Provides file-backed SQLite stores carrying the `users` / `companies`
//! schema the mapper queries.

#![allow(dead_code)]

use company_mapper::config::{CONFIG_KEY_JDBC_DRIVER, CONFIG_KEY_JDBC_URL};
use company_mapper::services::PROVIDER_ID;
use company_mapper::{CompanyMapper, MapperModel};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use serde_json::Value;
use sqlx::Connection;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// A throwaway SQLite database on disk.
pub struct TestStore {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestStore {
    /// Create an empty database file with no tables.
    pub async fn empty() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("companies.db");

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let conn = SqliteConnection::connect_with(&options)
            .await
            .expect("Failed to create SQLite database");
        conn.close().await.expect("Failed to close setup connection");

        Self { _dir: dir, path }
    }

    /// Create a database with the `users` and `companies` tables.
    pub async fn new() -> Self {
        let store = Self::empty().await;
        let mut conn = store.connect().await;

        sqlx::query("CREATE TABLE users (id TEXT NOT NULL, username TEXT NOT NULL)")
            .execute(&mut conn)
            .await
            .expect("Failed to create users table");
        sqlx::query("CREATE TABLE companies (name TEXT, label TEXT)")
            .execute(&mut conn)
            .await
            .expect("Failed to create companies table");

        conn.close().await.expect("Failed to close setup connection");
        store
    }

    /// The fixture used across tests:
    /// - alice owns identity rows `lbl-1` and `lbl-2` (Acme Corp, Globex)
    /// - carol owns `lbl-3` (Initech)
    /// - bob exists but has no companies
    pub async fn seeded() -> Self {
        let store = Self::new().await;
        store.add_user("lbl-1", "alice").await;
        store.add_user("lbl-2", "alice").await;
        store.add_user("lbl-3", "carol").await;
        store.add_user("bob-1", "bob").await;
        store.add_company(Some("Acme Corp"), "lbl-1").await;
        store.add_company(Some("Globex"), "lbl-2").await;
        store.add_company(Some("Initech"), "lbl-3").await;
        store
    }

    pub async fn connect(&self) -> SqliteConnection {
        let options = SqliteConnectOptions::new().filename(&self.path);
        SqliteConnection::connect_with(&options)
            .await
            .expect("Failed to connect to test database")
    }

    pub async fn add_user(&self, id: &str, username: &str) {
        let mut conn = self.connect().await;
        sqlx::query("INSERT INTO users (id, username) VALUES (?, ?)")
            .bind(id)
            .bind(username)
            .execute(&mut conn)
            .await
            .expect("Failed to insert user");
        conn.close().await.expect("Failed to close connection");
    }

    pub async fn add_company(&self, name: Option<&str>, label: &str) {
        let mut conn = self.connect().await;
        sqlx::query("INSERT INTO companies (name, label) VALUES (?, ?)")
            .bind(name)
            .bind(label)
            .execute(&mut conn)
            .await
            .expect("Failed to insert company");
        conn.close().await.expect("Failed to close connection");
    }

    /// JDBC-style URL as an admin would paste it into the mapper config.
    pub fn jdbc_url(&self) -> String {
        format!("jdbc:sqlite:{}", self.path.display())
    }

    /// Mapper model with default settings pointed at this store.
    pub fn mapper_model(&self) -> MapperModel {
        MapperModel::with_config(
            "companies",
            PROVIDER_ID,
            CompanyMapper::descriptor().default_config(),
        )
        .set(CONFIG_KEY_JDBC_DRIVER, "org.sqlite.JDBC")
        .set(CONFIG_KEY_JDBC_URL, self.jdbc_url())
    }
}

/// JSON log lines captured from a thread-local subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Install a JSON subscriber for the current thread. Events are captured
    /// until the returned guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(self.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Fields of every ERROR event logged so far.
    pub fn error_fields(&self) -> Vec<Value> {
        let bytes = self.0.lock().expect("Log buffer poisoned").clone();
        String::from_utf8(bytes)
            .expect("Logs should be UTF-8")
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).expect("Log line should be JSON"))
            .filter(|event| event["level"] == "ERROR")
            .map(|event| event["fields"].clone())
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "Log buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
