#![deny(warnings)]

//! Persistence layer: device key/value storage and scenario repositories.
//!
//! Two ports live here:
//! - [`KeyValueStore`]: synchronous, device-local blob storage keyed by name
//!   (file-backed or in-memory).
//! - [`ScenarioRepository`]: asynchronous CRUD over named scenarios, backed by
//!   the remote REST API ([`HttpScenarioRepository`]), an on-device SQLite
//!   database ([`SqliteScenarioRepository`]) or memory
//!   ([`MemoryScenarioRepository`]).
//!
//! Scenario `params` and `results_snapshot` are opaque JSON here; their schema
//! belongs to the engines.

pub mod http;
pub mod kv;
pub mod memory;
pub mod sqlite;

pub use http::{HttpConfig, HttpScenarioRepository};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};
pub use memory::MemoryScenarioRepository;
pub use sqlite::{init_db, SqliteScenarioRepository};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Returns the default SQLite URL used for on-device scenario saves.
pub fn default_sqlite_url() -> &'static str {
    "sqlite://./saves/planner.db"
}

/// Create the parent directory of a file-backed SQLite URL. In-memory URLs
/// are left alone.
pub fn ensure_sqlite_dir(url: &str) -> std::io::Result<()> {
    if url.contains(":memory:") {
        return Ok(());
    }
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"));
    if let Some(path) = path {
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}

/// A scenario as stored by a repository.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DbScenario {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub params: serde_json::Value,
    #[serde(default)]
    pub results_snapshot: serde_json::Value,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body sent when creating or updating a scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPayload {
    pub name: String,
    pub description: Option<String>,
    pub params: serde_json::Value,
    pub results: serde_json::Value,
}

/// Errors surfaced by scenario repositories.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RepoError {
    /// Server answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },
    /// Connection, DNS, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// Response or stored row could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("scenario not found: {0}")]
    NotFound(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => RepoError::NotFound("row".to_string()),
            other => RepoError::Database(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for RepoError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        RepoError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(e: serde_json::Error) -> Self {
        RepoError::Decode(e.to_string())
    }
}

/// Asynchronous CRUD over named scenarios. Implementations must be safe to
/// share across tasks.
pub trait ScenarioRepository: Send + Sync {
    /// All scenarios visible to the current user.
    fn list(&self) -> impl Future<Output = Result<Vec<DbScenario>, RepoError>> + Send;

    fn create(
        &self,
        payload: &ScenarioPayload,
    ) -> impl Future<Output = Result<DbScenario, RepoError>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = Result<DbScenario, RepoError>> + Send;

    fn update(
        &self,
        id: &str,
        payload: &ScenarioPayload,
    ) -> impl Future<Output = Result<DbScenario, RepoError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), RepoError>> + Send;
}

impl<T: ScenarioRepository> ScenarioRepository for Arc<T> {
    fn list(&self) -> impl Future<Output = Result<Vec<DbScenario>, RepoError>> + Send {
        (**self).list()
    }

    fn create(
        &self,
        payload: &ScenarioPayload,
    ) -> impl Future<Output = Result<DbScenario, RepoError>> + Send {
        (**self).create(payload)
    }

    fn get(&self, id: &str) -> impl Future<Output = Result<DbScenario, RepoError>> + Send {
        (**self).get(id)
    }

    fn update(
        &self,
        id: &str,
        payload: &ScenarioPayload,
    ) -> impl Future<Output = Result<DbScenario, RepoError>> + Send {
        (**self).update(id, payload)
    }

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), RepoError>> + Send {
        (**self).delete(id)
    }
}
