#![deny(warnings)]

//! Scenario store for the simulation-center planner.
//!
//! [`ScenarioStore`] owns the current parameters and their derived results,
//! tracks unsaved changes, keeps a device-local list of named scenarios and
//! mirrors a remote scenario repository. Storage is injected through
//! [`PersistencePort`] and [`persistence::ScenarioRepository`].

pub mod model;
pub mod persist;
pub mod store;

pub use model::{Action, Model};
pub use persist::{
    KeyedJsonPersistence, LocalScenario, PersistError, PersistedState, PersistencePort,
    ScenarioRef, STORE_KEY,
};
pub use store::{ScenarioStore, StoreConfig, StoreError, StoreSnapshot};
