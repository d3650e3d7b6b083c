//! Mock ServerStore for unit testing
//!
//! Keeps records in memory, bumps a resource version on every write and enforces
//! the same optimistic concurrency rule as the API server.

use crate::error::StoreError;
use crate::store_trait::ServerStore;
use crds::{PowerState, Server, ServerStatus};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory ServerStore
#[derive(Clone, Default)]
pub struct MockServerStore {
    servers: Arc<Mutex<BTreeMap<String, Server>>>,
    next_version: Arc<Mutex<u64>>,
    writes: Arc<Mutex<usize>>,
    conflicts: Arc<Mutex<Vec<String>>>,
}

impl MockServerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record (for test setup). Assigns a fresh resource version.
    pub fn insert(&self, mut server: Server) {
        server.metadata.resource_version = Some(self.bump_version());
        self.servers
            .lock()
            .unwrap()
            .insert(server.name().to_string(), server);
    }

    /// Current copy of a record.
    pub fn server(&self, name: &str) -> Option<Server> {
        self.servers.lock().unwrap().get(name).cloned()
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    /// Make the next write to `name` fail with a conflict.
    pub fn conflict_next_write(&self, name: impl Into<String>) {
        self.conflicts.lock().unwrap().push(name.into());
    }

    fn bump_version(&self) -> String {
        let mut next = self.next_version.lock().unwrap();
        *next += 1;
        next.to_string()
    }

    fn write<F>(&self, name: &str, resource_version: Option<&str>, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Server),
    {
        {
            let mut conflicts = self.conflicts.lock().unwrap();
            if let Some(pos) = conflicts.iter().position(|n| n == name) {
                conflicts.remove(pos);
                return Err(StoreError::Conflict(name.to_string()));
            }
        }

        let version = self.bump_version();
        let mut servers = self.servers.lock().unwrap();
        let server = servers
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        if let Some(expected) = resource_version {
            if server.metadata.resource_version.as_deref() != Some(expected) {
                return Err(StoreError::Conflict(name.to_string()));
            }
        }

        apply(server);
        server.metadata.resource_version = Some(version);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ServerStore for MockServerStore {
    async fn get(&self, name: &str) -> Result<Option<Server>, StoreError> {
        Ok(self.server(name))
    }

    async fn list(&self) -> Result<Vec<Server>, StoreError> {
        Ok(self.servers.lock().unwrap().values().cloned().collect())
    }

    async fn update_power_state(
        &self,
        name: &str,
        resource_version: Option<&str>,
        state: PowerState,
    ) -> Result<(), StoreError> {
        self.write(name, resource_version, |server| {
            server.spec.power_state = Some(state);
        })
    }

    async fn update_status(
        &self,
        name: &str,
        resource_version: Option<&str>,
        status: &ServerStatus,
    ) -> Result<(), StoreError> {
        self.write(name, resource_version, |server| {
            server.status = Some(status.clone());
        })
    }
}
