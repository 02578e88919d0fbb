//! In-memory scenario repository with failure injection for tests.

use crate::{DbScenario, RepoError, ScenarioPayload, ScenarioRepository};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct MemoryScenarioRepository {
    owner: String,
    rows: Mutex<Vec<DbScenario>>,
    failures: Mutex<VecDeque<RepoError>>,
}

impl MemoryScenarioRepository {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ..Default::default()
        }
    }

    /// Make the next call fail with `err`. Queued failures are consumed in order.
    pub fn fail_next(&self, err: RepoError) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(err);
    }

    /// Current rows, newest last.
    pub fn rows(&self) -> Vec<DbScenario> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn injected(&self) -> Result<(), RepoError> {
        match self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ScenarioRepository for MemoryScenarioRepository {
    async fn list(&self) -> Result<Vec<DbScenario>, RepoError> {
        self.injected()?;
        Ok(self.rows())
    }

    async fn create(&self, payload: &ScenarioPayload) -> Result<DbScenario, RepoError> {
        self.injected()?;
        let now = Utc::now();
        let row = DbScenario {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: self.owner.clone(),
            name: payload.name.clone(),
            description: payload.description.clone(),
            params: payload.params.clone(),
            results_snapshot: payload.results.clone(),
            is_default: false,
            created_at: now,
            updated_at: now,
        };
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: &str) -> Result<DbScenario, RepoError> {
        self.injected()?;
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, payload: &ScenarioPayload) -> Result<DbScenario, RepoError> {
        self.injected()?;
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        row.name = payload.name.clone();
        row.description = payload.description.clone();
        row.params = payload.params.clone();
        row.results_snapshot = payload.results.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        self.injected()?;
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
