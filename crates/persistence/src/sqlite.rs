//! On-device scenario storage in SQLite.

use crate::{DbScenario, RepoError, ScenarioPayload, ScenarioRepository};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::info;

/// Open (creating if needed) the database at `url` and apply migrations.
pub async fn init_db(url: &str) -> Result<SqlitePool, RepoError> {
    crate::ensure_sqlite_dir(url).map_err(|e| RepoError::Database(e.to_string()))?;
    let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    // In-memory databases are per-connection; keep a single one alive.
    let pool = if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await?
    };
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!(url, "scenario database ready");
    Ok(pool)
}

/// Scenario repository over a local SQLite database. Rows are scoped to one
/// owner identity.
#[derive(Clone, Debug)]
pub struct SqliteScenarioRepository {
    pool: SqlitePool,
    owner: String,
}

impl SqliteScenarioRepository {
    pub fn new(pool: SqlitePool, owner: impl Into<String>) -> Self {
        Self {
            pool,
            owner: owner.into(),
        }
    }

    pub async fn connect(url: &str, owner: impl Into<String>) -> Result<Self, RepoError> {
        Ok(Self::new(init_db(url).await?, owner))
    }

    pub async fn in_memory(owner: impl Into<String>) -> Result<Self, RepoError> {
        Self::connect("sqlite::memory:", owner).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

const COLUMNS: &str =
    "id, user_id, name, description, params, results_snapshot, is_default, created_at, updated_at";

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepoError::Decode(format!("timestamp {raw:?}: {e}")))
}

fn from_row(row: &SqliteRow) -> Result<DbScenario, RepoError> {
    let params: String = row.try_get("params")?;
    let results: String = row.try_get("results_snapshot")?;
    let created: String = row.try_get("created_at")?;
    let updated: String = row.try_get("updated_at")?;
    Ok(DbScenario {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        params: serde_json::from_str(&params)?,
        results_snapshot: serde_json::from_str(&results)?,
        is_default: row.try_get("is_default")?,
        created_at: parse_ts(&created)?,
        updated_at: parse_ts(&updated)?,
    })
}

impl ScenarioRepository for SqliteScenarioRepository {
    async fn list(&self) -> Result<Vec<DbScenario>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM scenarios WHERE user_id = ? ORDER BY updated_at DESC"
        ))
        .bind(&self.owner)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(from_row).collect()
    }

    async fn create(&self, payload: &ScenarioPayload) -> Result<DbScenario, RepoError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO scenarios \
             (id, user_id, name, description, params, results_snapshot, is_default, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(&id)
        .bind(&self.owner)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(serde_json::to_string(&payload.params)?)
        .bind(serde_json::to_string(&payload.results)?)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        self.get(&id).await
    }

    async fn get(&self, id: &str) -> Result<DbScenario, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM scenarios WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(&self.owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        from_row(&row)
    }

    async fn update(&self, id: &str, payload: &ScenarioPayload) -> Result<DbScenario, RepoError> {
        let done = sqlx::query(
            "UPDATE scenarios SET name = ?, description = ?, params = ?, results_snapshot = ?, updated_at = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(serde_json::to_string(&payload.params)?)
        .bind(serde_json::to_string(&payload.results)?)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(&self.owner)
        .execute(&self.pool)
        .await?;
        if done.rows_affected() == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        self.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let done = sqlx::query("DELETE FROM scenarios WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(&self.owner)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
