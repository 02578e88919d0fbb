//! Device-persisted slice of the store and the port that reads/writes it.

use chrono::{DateTime, Utc};
use persistence::{KeyValueStore, StorageError};
use planner_core::{RoiParameters, SimulatorParameters};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Storage key of the whole-object snapshot.
pub const STORE_KEY: &str = "simulation-store";

/// A named parameter snapshot kept on the device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalScenario {
    pub id: Uuid,
    pub name: String,
    pub params: SimulatorParameters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which saved scenario the current configuration came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum ScenarioRef {
    Local(Uuid),
    Remote(String),
}

/// What survives a restart. Missing fields fall back to defaults so older
/// snapshots still load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub params: SimulatorParameters,
    pub roi_params: RoiParameters,
    pub saved_scenarios: Vec<LocalScenario>,
    pub current_scenario: Option<ScenarioRef>,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("corrupt store snapshot: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Load/save of the persisted slice. The store only talks to this trait.
pub trait PersistencePort: Send + Sync {
    fn load(&self) -> Result<Option<PersistedState>, PersistError>;
    fn save(&self, state: &PersistedState) -> Result<(), PersistError>;
}

/// Stores [`PersistedState`] as one JSON document under a fixed key.
#[derive(Clone, Debug)]
pub struct KeyedJsonPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KeyedJsonPersistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> PersistencePort for KeyedJsonPersistence<S> {
    fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistError> {
        let raw = serde_json::to_string(state)?;
        self.store.set(&self.key, &raw)?;
        Ok(())
    }
}
