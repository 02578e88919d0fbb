//! The scenario store: one shared handle over the planner state.
//!
//! All state sits behind a single `RwLock` that is never held across an
//! `.await`. Every committed change is persisted (when it touches the
//! persisted slice) and published on a `watch` channel while the lock is
//! still held, so observers and storage see changes in commit order.
//!
//! Remote calls take a ticket from a generation counter per request kind:
//! list, load, save (create or update) and delete. Only the holder of the
//! newest ticket of a kind may apply state that depends on ordering; older
//! responses of the same kind are logged and dropped. Requests of different
//! kinds never invalidate each other. A stale save still refreshes the cached
//! remote list because the server holds that row. `is_saving` and
//! `is_loading` stay set while any request of their group is in flight.
//!
//! Persistence is a synchronous key/value write done under the lock. At the
//! sizes this store holds (a few kilobytes of JSON) that is cheaper than the
//! bookkeeping needed to order writes outside it.

use crate::model::{Action, Model};
use crate::persist::{LocalScenario, PersistedState, PersistencePort, ScenarioRef};
use chrono::{DateTime, Utc};
use persistence::{DbScenario, ScenarioPayload, ScenarioRepository};
use planner_core::{
    validate_parameters, ParamsPatch, RoiParamsPatch, SimulatorParameters, ValidationError,
};
use planner_econ::{find_preset, BudgetResults, RoiResults};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// How long a remote error stays visible.
    pub error_ttl: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            error_ttl: Duration::from_secs(5),
        }
    }
}

/// Errors returned by synchronous store actions. Remote actions never
/// return errors; they record them in the error slot instead.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("scenario name must not be empty")]
    EmptyName,
}

/// Everything an observer can see, published after every change.
#[derive(Clone, Debug, Serialize)]
pub struct StoreSnapshot {
    pub model: Model,
    pub is_dirty: bool,
    pub current_scenario: Option<ScenarioRef>,
    pub last_saved: Option<DateTime<Utc>>,
    pub is_saving: bool,
    pub is_loading: bool,
    pub save_error: Option<String>,
    pub saved_scenarios: Vec<LocalScenario>,
    pub db_scenarios: Vec<DbScenario>,
}

#[derive(Serialize)]
struct ResultsSnapshot<'a> {
    budget: &'a BudgetResults,
    roi: &'a RoiResults,
}

#[derive(Debug)]
struct ErrorSlot {
    seq: u64,
    message: String,
    raised_at: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RequestKind {
    List,
    Load,
    /// Create or update; both decide the current remote scenario.
    Save,
    Delete,
}

impl RequestKind {
    const COUNT: usize = 4;

    fn index(self) -> usize {
        self as usize
    }

    /// Saves and deletes raise `is_saving`, lists and loads `is_loading`.
    fn is_write(self) -> bool {
        matches!(self, RequestKind::Save | RequestKind::Delete)
    }
}

#[derive(Clone, Copy, Debug)]
struct Ticket {
    kind: RequestKind,
    generation: u64,
    /// Parameter revision when the request started.
    revision: u64,
}

/// Marker for local actions that found nothing to change.
struct Unchanged;

#[derive(Debug)]
struct StoreState {
    model: Model,
    /// Bumped on every parameter change; lets a save tell whether the user
    /// edited while it was in flight.
    revision: u64,
    is_dirty: bool,
    current_scenario: Option<ScenarioRef>,
    last_saved: Option<DateTime<Utc>>,
    saved_scenarios: Vec<LocalScenario>,
    db_scenarios: Vec<DbScenario>,
    writes_in_flight: u32,
    reads_in_flight: u32,
    error: Option<ErrorSlot>,
    error_seq: u64,
    generations: [u64; RequestKind::COUNT],
}

impl StoreState {
    fn new(model: Model, saved: Vec<LocalScenario>, current: Option<ScenarioRef>) -> Self {
        Self {
            model,
            revision: 0,
            is_dirty: false,
            current_scenario: current,
            last_saved: None,
            saved_scenarios: saved,
            db_scenarios: Vec::new(),
            writes_in_flight: 0,
            reads_in_flight: 0,
            error: None,
            error_seq: 0,
            generations: [0; RequestKind::COUNT],
        }
    }

    fn set_model(&mut self, next: Model) {
        self.model = next;
        self.revision += 1;
    }

    fn mark_saved(&mut self, at: DateTime<Utc>) {
        self.is_dirty = false;
        self.last_saved = Some(at);
    }

    fn upsert_db(&mut self, row: DbScenario) {
        match self.db_scenarios.iter_mut().find(|r| r.id == row.id) {
            Some(slot) => *slot = row,
            None => self.db_scenarios.insert(0, row),
        }
    }

    fn in_flight(&mut self, kind: RequestKind) -> &mut u32 {
        if kind.is_write() {
            &mut self.writes_in_flight
        } else {
            &mut self.reads_in_flight
        }
    }

    fn begin(&mut self, kind: RequestKind) -> Ticket {
        let slot = &mut self.generations[kind.index()];
        *slot += 1;
        let generation = *slot;
        *self.in_flight(kind) += 1;
        Ticket {
            kind,
            generation,
            revision: self.revision,
        }
    }

    /// Retire `ticket` and report whether it is still the newest of its kind.
    /// Must be called exactly once per ticket.
    fn finish(&mut self, ticket: &Ticket) -> bool {
        let count = self.in_flight(ticket.kind);
        *count = count.saturating_sub(1);
        ticket.generation == self.generations[ticket.kind.index()]
    }

    fn active_error(&self, ttl: Duration) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|e| e.raised_at.elapsed() < ttl)
            .map(|e| e.message.as_str())
    }

    fn persisted(&self) -> PersistedState {
        PersistedState {
            params: self.model.params().clone(),
            roi_params: self.model.roi_params().clone(),
            saved_scenarios: self.saved_scenarios.clone(),
            current_scenario: self.current_scenario.clone(),
        }
    }

    fn snapshot(&self, ttl: Duration) -> StoreSnapshot {
        StoreSnapshot {
            model: self.model.clone(),
            is_dirty: self.is_dirty,
            current_scenario: self.current_scenario.clone(),
            last_saved: self.last_saved,
            is_saving: self.writes_in_flight > 0,
            is_loading: self.reads_in_flight > 0,
            save_error: self.active_error(ttl).map(str::to_string),
            saved_scenarios: self.saved_scenarios.clone(),
            db_scenarios: self.db_scenarios.clone(),
        }
    }
}

struct Inner<R, P> {
    repo: R,
    persistence: P,
    config: StoreConfig,
    state: RwLock<StoreState>,
    changes: watch::Sender<StoreSnapshot>,
}

/// Cloneable handle to the planner state.
pub struct ScenarioStore<R, P> {
    inner: Arc<Inner<R, P>>,
}

impl<R, P> Clone for ScenarioStore<R, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn rehydrate<P: PersistencePort>(port: &P) -> StoreState {
    let saved = match port.load() {
        Ok(Some(saved)) => saved,
        Ok(None) => return StoreState::new(Model::default(), Vec::new(), None),
        Err(e) => {
            warn!(error = %e, "discarding unreadable store snapshot");
            return StoreState::new(Model::default(), Vec::new(), None);
        }
    };
    let restored = Model::default().reduce(Action::Replace {
        params: saved.params,
        roi_params: saved.roi_params,
    });
    match restored {
        Ok(model) => {
            debug!(
                scenarios = saved.saved_scenarios.len(),
                "store rehydrated"
            );
            StoreState::new(model, saved.saved_scenarios, saved.current_scenario)
        }
        Err(e) => {
            warn!(error = %e, "persisted parameters are invalid; using defaults");
            StoreState::new(Model::default(), saved.saved_scenarios, None)
        }
    }
}

fn build_payload(
    model: &Model,
    name: String,
    description: Option<String>,
) -> Result<ScenarioPayload, serde_json::Error> {
    Ok(ScenarioPayload {
        name,
        description,
        params: serde_json::to_value(model.params())?,
        results: serde_json::to_value(ResultsSnapshot {
            budget: model.results(),
            roi: model.roi_results(),
        })?,
    })
}

impl<R, P> ScenarioStore<R, P>
where
    R: ScenarioRepository + 'static,
    P: PersistencePort + 'static,
{
    pub fn new(repo: R, persistence: P) -> Self {
        Self::with_config(repo, persistence, StoreConfig::default())
    }

    /// Build a store, restoring whatever `persistence` holds.
    pub fn with_config(repo: R, persistence: P, config: StoreConfig) -> Self {
        let state = rehydrate(&persistence);
        let (changes, _) = watch::channel(state.snapshot(config.error_ttl));
        Self {
            inner: Arc::new(Inner {
                repo,
                persistence,
                config,
                state: RwLock::new(state),
                changes,
            }),
        }
    }

    pub fn repository(&self) -> &R {
        &self.inner.repo
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(&self, st: &StoreState, persist: bool) {
        if persist {
            if let Err(e) = self.inner.persistence.save(&st.persisted()) {
                warn!(error = %e, "failed to persist store state");
            }
        }
        self.inner
            .changes
            .send_replace(st.snapshot(self.inner.config.error_ttl));
    }

    /// Run `f` under the write lock; persist and publish only if it succeeds.
    fn mutate<T, E>(&self, f: impl FnOnce(&mut StoreState) -> Result<T, E>) -> Result<T, E> {
        let mut st = self.write();
        let out = f(&mut st)?;
        self.commit(&st, true);
        Ok(out)
    }

    /// Like `mutate` for flag-only changes that are not persisted.
    fn touch<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        let mut st = self.write();
        let out = f(&mut st);
        self.commit(&st, false);
        out
    }

    fn dispatch(&self, action: Action) -> Result<(), StoreError> {
        self.mutate(|st| {
            let next = st.model.reduce(action)?;
            st.set_model(next);
            st.is_dirty = true;
            Ok(())
        })
    }

    // ---- parameters ----

    /// Merge `patch` into the facility parameters and recompute. Invalid
    /// results are rejected and leave the store unchanged.
    pub fn set_params(&self, patch: ParamsPatch) -> Result<(), StoreError> {
        self.dispatch(Action::PatchParams(patch))
    }

    pub fn set_roi_params(&self, patch: RoiParamsPatch) -> Result<(), StoreError> {
        self.dispatch(Action::PatchRoi(patch))
    }

    pub fn reset_to_defaults(&self) {
        if let Err(e) = self.dispatch(Action::ResetParams) {
            warn!(error = %e, "reset to default parameters rejected");
        }
    }

    pub fn reset_roi_params(&self) {
        if let Err(e) = self.dispatch(Action::ResetRoi) {
            warn!(error = %e, "reset to default ROI assumptions rejected");
        }
    }

    /// Merge a built-in preset over the current parameters. Unknown ids are
    /// ignored and return `false`.
    pub fn apply_predefined_scenario(&self, id: &str) -> bool {
        let Some(preset) = find_preset(id) else {
            debug!(id, "unknown preset ignored");
            return false;
        };
        match self.dispatch(Action::PatchParams(preset.overrides.clone())) {
            Ok(()) => {
                info!(id, "preset applied");
                true
            }
            Err(e) => {
                warn!(id, error = %e, "preset rejected");
                false
            }
        }
    }

    // ---- local scenarios ----

    /// Snapshot the current parameters under `name`. Counts as a save.
    pub fn save_current_as_scenario(&self, name: &str) -> Result<LocalScenario, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        self.mutate(|st| {
            let now = Utc::now();
            let scenario = LocalScenario {
                id: Uuid::new_v4(),
                name: name.to_string(),
                params: st.model.params().clone(),
                created_at: now,
                updated_at: now,
            };
            st.saved_scenarios.push(scenario.clone());
            st.current_scenario = Some(ScenarioRef::Local(scenario.id));
            st.mark_saved(now);
            Ok(scenario)
        })
    }

    /// Restore a local scenario's parameters and recompute. Missing ids are
    /// a no-op.
    pub fn load_scenario(&self, id: Uuid) -> bool {
        self.mutate(|st| {
            let params = st
                .saved_scenarios
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.params.clone())
                .ok_or(Unchanged)?;
            let next = st
                .model
                .reduce(Action::ReplaceParams(params))
                .map_err(|e| {
                    warn!(%id, error = %e, "local scenario has invalid parameters");
                    Unchanged
                })?;
            st.set_model(next);
            st.current_scenario = Some(ScenarioRef::Local(id));
            st.mark_saved(Utc::now());
            Ok::<_, Unchanged>(())
        })
        .is_ok()
    }

    pub fn delete_scenario(&self, id: Uuid) -> bool {
        self.mutate(|st| {
            let before = st.saved_scenarios.len();
            st.saved_scenarios.retain(|s| s.id != id);
            if st.saved_scenarios.len() == before {
                return Err(Unchanged);
            }
            if st.current_scenario == Some(ScenarioRef::Local(id)) {
                st.current_scenario = None;
            }
            Ok(())
        })
        .is_ok()
    }

    pub fn update_scenario_name(&self, id: Uuid, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.mutate(|st| {
            let scenario = st
                .saved_scenarios
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(Unchanged)?;
            scenario.name = name.to_string();
            scenario.updated_at = Utc::now();
            Ok::<_, Unchanged>(())
        })
        .is_ok()
    }

    // ---- remote scenarios ----

    fn begin<T>(&self, kind: RequestKind, f: impl FnOnce(&StoreState) -> T) -> (Ticket, T) {
        self.touch(|st| {
            let ticket = st.begin(kind);
            (ticket, f(st))
        })
    }

    /// Apply a successful response. `f` learns whether the ticket is still
    /// the newest of its kind.
    fn complete<T>(&self, ticket: &Ticket, f: impl FnOnce(&mut StoreState, bool) -> T) -> T {
        let mut st = self.write();
        let latest = st.finish(ticket);
        if !latest {
            debug!(
                kind = ?ticket.kind,
                generation = ticket.generation,
                "stale response"
            );
        }
        let out = f(&mut st, latest);
        self.commit(&st, true);
        out
    }

    fn fail(&self, ticket: Option<&Ticket>, message: String) {
        warn!(%message, "remote scenario request failed");
        let seq = self.touch(|st| {
            if let Some(ticket) = ticket {
                st.finish(ticket);
            }
            st.error_seq += 1;
            st.error = Some(ErrorSlot {
                seq: st.error_seq,
                message,
                raised_at: Instant::now(),
            });
            st.error_seq
        });
        self.schedule_expiry(seq);
    }

    fn schedule_expiry(&self, seq: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let store = self.clone();
        let ttl = self.inner.config.error_ttl;
        handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            store.touch(|st| {
                if st.error.as_ref().is_some_and(|e| e.seq == seq) {
                    st.error = None;
                }
            });
        });
    }

    /// Refresh the cached list of remote scenarios.
    pub async fn fetch_db_scenarios(&self) -> bool {
        let (ticket, ()) = self.begin(RequestKind::List, |_| ());
        match self.inner.repo.list().await {
            Ok(rows) => {
                let count = rows.len();
                let applied = self.complete(&ticket, |st, latest| {
                    if latest {
                        st.db_scenarios = rows;
                    }
                    latest
                });
                if applied {
                    info!(count, "remote scenarios fetched");
                }
                applied
            }
            Err(e) => {
                self.fail(Some(&ticket), e.to_string());
                false
            }
        }
    }

    /// Create a remote scenario from the current configuration. Returns the
    /// stored row, or `None` on failure with the error recorded.
    pub async fn save_to_database(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Option<DbScenario> {
        let name = name.trim();
        if name.is_empty() {
            self.fail(None, StoreError::EmptyName.to_string());
            return None;
        }
        let (ticket, model) = self.begin(RequestKind::Save, |st| st.model.clone());
        let payload = match build_payload(&model, name.to_string(), description.map(str::to_string))
        {
            Ok(payload) => payload,
            Err(e) => {
                self.fail(Some(&ticket), e.to_string());
                return None;
            }
        };
        match self.inner.repo.create(&payload).await {
            Ok(row) => {
                info!(id = %row.id, "scenario saved to database");
                self.apply_saved(&ticket, row.clone());
                Some(row)
            }
            Err(e) => {
                self.fail(Some(&ticket), e.to_string());
                None
            }
        }
    }

    /// Overwrite remote scenario `id` with the current configuration, keeping
    /// its name and description.
    pub async fn update_in_database(&self, id: &str) -> Option<DbScenario> {
        let (ticket, (model, cached)) = self.begin(RequestKind::Save, |st| {
            let cached = st
                .db_scenarios
                .iter()
                .find(|r| r.id == id)
                .map(|r| (r.name.clone(), r.description.clone()));
            (st.model.clone(), cached)
        });
        let (name, description) = match cached {
            Some(found) => found,
            None => match self.inner.repo.get(id).await {
                Ok(row) => (row.name, row.description),
                Err(e) => {
                    self.fail(Some(&ticket), e.to_string());
                    return None;
                }
            },
        };
        let payload = match build_payload(&model, name, description) {
            Ok(payload) => payload,
            Err(e) => {
                self.fail(Some(&ticket), e.to_string());
                return None;
            }
        };
        match self.inner.repo.update(id, &payload).await {
            Ok(row) => {
                info!(id = %row.id, "scenario updated in database");
                self.apply_saved(&ticket, row.clone());
                Some(row)
            }
            Err(e) => {
                self.fail(Some(&ticket), e.to_string());
                None
            }
        }
    }

    fn apply_saved(&self, ticket: &Ticket, row: DbScenario) {
        self.complete(ticket, |st, latest| {
            let id = row.id.clone();
            st.upsert_db(row);
            if latest {
                st.current_scenario = Some(ScenarioRef::Remote(id));
                st.last_saved = Some(Utc::now());
                // Edits made while the request was in flight are not saved.
                if st.revision == ticket.revision {
                    st.is_dirty = false;
                }
            }
        });
    }

    /// Replace the current parameters with remote scenario `id`. The stored
    /// results snapshot is ignored; results are recomputed.
    pub async fn load_from_database(&self, id: &str) -> bool {
        let (ticket, ()) = self.begin(RequestKind::Load, |_| ());
        let row = match self.inner.repo.get(id).await {
            Ok(row) => row,
            Err(e) => {
                self.fail(Some(&ticket), e.to_string());
                return false;
            }
        };
        let params = match serde_json::from_value::<SimulatorParameters>(row.params.clone()) {
            Ok(params) => params,
            Err(e) => {
                self.fail(Some(&ticket), format!("scenario {id} has unreadable parameters: {e}"));
                return false;
            }
        };
        if let Err(e) = validate_parameters(&params) {
            self.fail(Some(&ticket), format!("scenario {id} has invalid parameters: {e}"));
            return false;
        }
        let applied = self.complete(&ticket, |st, latest| {
            let row_id = row.id.clone();
            st.upsert_db(row);
            if !latest {
                return false;
            }
            match st.model.reduce(Action::ReplaceParams(params)) {
                Ok(next) => {
                    st.set_model(next);
                    st.current_scenario = Some(ScenarioRef::Remote(row_id));
                    st.mark_saved(Utc::now());
                    true
                }
                Err(e) => {
                    warn!(id = %row_id, error = %e, "remote scenario rejected");
                    false
                }
            }
        });
        if applied {
            info!(id, "scenario loaded from database");
        }
        applied
    }

    pub async fn delete_from_database(&self, id: &str) -> bool {
        let (ticket, ()) = self.begin(RequestKind::Delete, |_| ());
        match self.inner.repo.delete(id).await {
            Ok(()) => {
                self.complete(&ticket, |st, _| {
                    st.db_scenarios.retain(|r| r.id != id);
                    if st.current_scenario == Some(ScenarioRef::Remote(id.to_string())) {
                        st.current_scenario = None;
                    }
                });
                info!(id, "scenario deleted from database");
                true
            }
            Err(e) => {
                self.fail(Some(&ticket), e.to_string());
                false
            }
        }
    }

    // ---- observation ----

    /// The current remote error, if one was raised within the error TTL.
    pub fn save_error(&self) -> Option<String> {
        self.read()
            .active_error(self.inner.config.error_ttl)
            .map(str::to_string)
    }

    pub fn clear_error(&self) {
        self.touch(|st| st.error = None);
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.read().snapshot(self.inner.config.error_ttl)
    }

    pub fn model(&self) -> Model {
        self.read().model.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.read().is_dirty
    }

    pub fn current_scenario(&self) -> Option<ScenarioRef> {
        self.read().current_scenario.clone()
    }

    /// Receive a snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.inner.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::KeyedJsonPersistence;
    use persistence::{MemoryKeyValueStore, MemoryScenarioRepository, RepoError};
    use planner_core::{OpexModel, RoiParameters};
    use rust_decimal::Decimal;

    type TestStore = ScenarioStore<MemoryScenarioRepository, KeyedJsonPersistence<MemoryKeyValueStore>>;

    fn store() -> TestStore {
        ScenarioStore::new(
            MemoryScenarioRepository::new("tester"),
            KeyedJsonPersistence::new(MemoryKeyValueStore::new()),
        )
    }

    fn rooms(n: u32) -> ParamsPatch {
        ParamsPatch {
            sim_rooms: Some(n),
            ..Default::default()
        }
    }

    #[test]
    fn fresh_store_is_clean_defaults() {
        let s = store().snapshot();
        assert!(!s.is_dirty);
        assert_eq!(s.model, Model::default());
        assert_eq!(s.current_scenario, None);
        assert!(s.last_saved.is_none());
    }

    #[test]
    fn set_params_marks_dirty_and_recomputes() {
        let store = store();
        store.set_params(rooms(5)).unwrap();
        let s = store.snapshot();
        assert!(s.is_dirty);
        assert_eq!(s.model.params().sim_rooms, 5);
        assert_eq!(
            s.model.results(),
            &planner_econ::calculate_budget(s.model.params())
        );
    }

    #[test]
    fn empty_patch_still_marks_dirty() {
        let store = store();
        store.set_params(ParamsPatch::default()).unwrap();
        assert!(store.is_dirty());
    }

    #[test]
    fn invalid_patch_leaves_state_unchanged() {
        let store = store();
        let before = store.snapshot();
        let err = store.set_params(rooms(0)).unwrap_err();
        assert_eq!(err, StoreError::Invalid(ValidationError::NoSimulationRooms));
        let after = store.snapshot();
        assert_eq!(after.model, before.model);
        assert!(!after.is_dirty);
    }

    #[test]
    fn resets_mark_dirty() {
        let store = store();
        store
            .set_params(ParamsPatch {
                opex_model: Some(OpexModel::SessionsBased),
                ..Default::default()
            })
            .unwrap();
        store.save_current_as_scenario("x").unwrap();
        assert!(!store.is_dirty());
        store.reset_to_defaults();
        assert!(store.is_dirty());
        assert_eq!(store.model().params(), &SimulatorParameters::default());
        store.save_current_as_scenario("y").unwrap();
        store.reset_roi_params();
        assert!(store.is_dirty());
        assert_eq!(store.model().roi_params(), &RoiParameters::default());
    }

    #[test]
    fn local_delete_and_rename_do_not_touch_dirty() {
        let store = store();
        let saved = store.save_current_as_scenario("Base").unwrap();
        store.set_params(rooms(4)).unwrap();
        assert!(store.update_scenario_name(saved.id, "Renamed"));
        assert!(store.is_dirty());
        assert!(store.delete_scenario(saved.id));
        assert!(store.is_dirty());
        assert_eq!(store.current_scenario(), None);
        assert!(!store.delete_scenario(saved.id));
        assert!(!store.update_scenario_name(saved.id, "again"));
    }

    #[test]
    fn blank_names_are_rejected() {
        let store = store();
        assert_eq!(
            store.save_current_as_scenario("   ").unwrap_err(),
            StoreError::EmptyName
        );
        let saved = store.save_current_as_scenario("ok").unwrap();
        assert!(!store.update_scenario_name(saved.id, ""));
    }

    #[test]
    fn missing_local_scenario_is_a_no_op() {
        let store = store();
        store.set_params(rooms(4)).unwrap();
        let before = store.snapshot();
        assert!(!store.load_scenario(Uuid::new_v4()));
        let after = store.snapshot();
        assert_eq!(after.model, before.model);
        assert!(after.is_dirty);
    }

    #[test]
    fn mutations_are_broadcast() {
        let store = store();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());
        store.set_params(rooms(7)).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().model.params().sim_rooms, 7);
    }

    #[test]
    fn rehydration_restores_both_parameter_sets() {
        let port = KeyedJsonPersistence::new(MemoryKeyValueStore::new());
        let mut saved = PersistedState::default();
        saved.params.sim_rooms = 6;
        saved.roi_params.total_nurses = 750;
        port.save(&saved).unwrap();

        let st = rehydrate(&port);
        assert_eq!(st.model.params().sim_rooms, 6);
        assert_eq!(st.model.roi_params().total_nurses, 750);
        assert_eq!(
            st.model.results(),
            &planner_econ::calculate_budget(st.model.params())
        );
        assert!(!st.is_dirty);

        saved.roi_params.discount_rate_pct = Decimal::new(150, 0);
        port.save(&saved).unwrap();
        let st = rehydrate(&port);
        assert_eq!(st.model, Model::default());
    }

    #[tokio::test]
    async fn error_can_be_cleared() {
        let store = store();
        store.repository().fail_next(RepoError::Transport("offline".into()));
        assert!(!store.fetch_db_scenarios().await);
        assert!(store.save_error().unwrap().contains("offline"));
        store.clear_error();
        assert_eq!(store.save_error(), None);
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_expire_after_ttl() {
        let store = store();
        store.repository().fail_next(RepoError::Http {
            status: 503,
            message: "maintenance".into(),
        });
        assert!(store.save_to_database("Plan", None).await.is_none());
        assert!(store.save_error().is_some());
        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(store.save_error().is_some());
        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.save_error(), None);
        assert_eq!(store.snapshot().save_error, None);
    }

    #[tokio::test]
    async fn blank_remote_name_records_error() {
        let store = store();
        assert!(store.save_to_database("  ", None).await.is_none());
        assert!(store.save_error().is_some());
        assert!(store.repository().rows().is_empty());
        assert!(!store.snapshot().is_saving);
    }

    #[tokio::test]
    async fn edits_during_save_stay_dirty() {
        let store = store();
        store.set_params(rooms(4)).unwrap();
        let (ticket, model) = store.begin(RequestKind::Save, |st| st.model.clone());
        store.set_params(rooms(6)).unwrap();
        let payload = build_payload(&model, "mid-flight".into(), None).unwrap();
        let row = store.repository().create(&payload).await.unwrap();
        store.apply_saved(&ticket, row.clone());
        let s = store.snapshot();
        assert_eq!(s.current_scenario, Some(ScenarioRef::Remote(row.id)));
        assert!(s.last_saved.is_some());
        assert!(s.is_dirty);
        assert!(!s.is_saving);
    }
}
