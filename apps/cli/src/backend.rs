//! Remote scenario backend chosen from configuration.

use crate::config::CliConfig;
use persistence::{
    DbScenario, HttpScenarioRepository, RepoError, ScenarioPayload, ScenarioRepository,
    SqliteScenarioRepository,
};
use tracing::info;

/// HTTP when an API URL is configured, the on-device database otherwise.
pub enum Backend {
    Http(HttpScenarioRepository),
    Sqlite(SqliteScenarioRepository),
}

impl Backend {
    pub async fn connect(cfg: &CliConfig) -> Result<Self, RepoError> {
        match cfg.http_config() {
            Some(http) => {
                info!(url = %http.base_url, "using remote scenario api");
                Ok(Backend::Http(HttpScenarioRepository::new(http)?))
            }
            None => {
                info!(url = %cfg.db_url, "using on-device scenario database");
                Ok(Backend::Sqlite(
                    SqliteScenarioRepository::connect(&cfg.db_url, cfg.owner.clone()).await?,
                ))
            }
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Backend::Http(_) => "remote api",
            Backend::Sqlite(_) => "device database",
        }
    }
}

impl ScenarioRepository for Backend {
    async fn list(&self) -> Result<Vec<DbScenario>, RepoError> {
        match self {
            Backend::Http(r) => r.list().await,
            Backend::Sqlite(r) => r.list().await,
        }
    }

    async fn create(&self, payload: &ScenarioPayload) -> Result<DbScenario, RepoError> {
        match self {
            Backend::Http(r) => r.create(payload).await,
            Backend::Sqlite(r) => r.create(payload).await,
        }
    }

    async fn get(&self, id: &str) -> Result<DbScenario, RepoError> {
        match self {
            Backend::Http(r) => r.get(id).await,
            Backend::Sqlite(r) => r.get(id).await,
        }
    }

    async fn update(&self, id: &str, payload: &ScenarioPayload) -> Result<DbScenario, RepoError> {
        match self {
            Backend::Http(r) => r.update(id, payload).await,
            Backend::Sqlite(r) => r.update(id, payload).await,
        }
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        match self {
            Backend::Http(r) => r.delete(id).await,
            Backend::Sqlite(r) => r.delete(id).await,
        }
    }
}
