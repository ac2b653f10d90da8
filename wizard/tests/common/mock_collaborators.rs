//! Mock geocoder and filter store.

use async_trait::async_trait;
use filterbot_core::UserIdentity;
use geocoder::{GeocodeError, Geocoder, LocationCandidate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storage::{FilterStore, SearchFilter, StorageError};
use tokio::sync::Notify;

type LookupResult = Result<Vec<LocationCandidate>, GeocodeError>;

/// Geocoder with canned answers per query. Unknown queries return an empty list.
#[derive(Default)]
pub struct MockGeocoder {
    responses: HashMap<String, LookupResult>,
    gates: HashMap<String, Arc<Notify>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(mut self, query: &str, candidates: Vec<LocationCandidate>) -> Self {
        self.responses.insert(query.to_string(), Ok(candidates));
        self
    }

    pub fn with_error(mut self, query: &str, error: GeocodeError) -> Self {
        self.responses.insert(query.to_string(), Err(error));
        self
    }

    /// Every lookup sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Lookups of `query` block until the returned `Notify` is notified.
    pub fn with_gate(mut self, query: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gates.insert(query.to_string(), gate.clone());
        (self, gate)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn lookup(&self, query: &str) -> LookupResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(gate) = self.gates.get(query) {
            gate.notified().await;
        }
        self.responses
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// In-memory filter store with switchable failures.
#[derive(Default)]
pub struct MockFilterStore {
    pub users: Mutex<Vec<UserIdentity>>,
    pub filters: Mutex<Vec<(UserIdentity, SearchFilter)>>,
    pub fail_upserts: AtomicBool,
    pub fail_inserts: AtomicBool,
}

impl MockFilterStore {
    pub fn saved(&self) -> Vec<(UserIdentity, SearchFilter)> {
        self.filters.lock().unwrap().clone()
    }

    pub fn users(&self) -> Vec<UserIdentity> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl FilterStore for MockFilterStore {
    async fn upsert_user(&self, user: &UserIdentity) -> Result<i64, StorageError> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(StorageError::Database("database is locked".to_string()));
        }
        let mut users = self.users.lock().unwrap();
        if !users.iter().any(|u| u.external_user_id == user.external_user_id) {
            users.push(user.clone());
        }
        Ok(user.external_user_id)
    }

    async fn insert_filter(
        &self,
        user: &UserIdentity,
        filter: &SearchFilter,
    ) -> Result<i64, StorageError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StorageError::Database("disk I/O error".to_string()));
        }
        let mut filters = self.filters.lock().unwrap();
        filters.push((user.clone(), filter.clone()));
        Ok(filters.len() as i64)
    }
}
