//! Blob-backed local task store.
//!
//! # Responsibility
//! - Keep the whole collection in memory in insertion order.
//! - Mirror the collection to the `tasksState` blob after every mutation.
//!
//! # Invariants
//! - A missing or unparsable blob restores as an empty collection.
//! - A failed blob write never rolls back in-memory state; it is recorded as
//!   a storage fault for the caller to surface.
//! - Ids are UUID v4, so they cannot collide within the collection.

use super::{ensure_valid, StoreError, StoreResult, TaskStore};
use crate::clock::SharedClock;
use crate::kv::{KeyValueStore, KvError, SharedKv};
use crate::model::task::{NewTask, Task, TaskId};
use log::{error, info, warn};
use std::sync::{Arc, Mutex};

/// Blob key holding the serialized collection.
pub const TASKS_STATE_KEY: &str = "tasksState";

pub struct LocalTaskStore {
    kv: SharedKv,
    clock: SharedClock,
    tasks: Vec<Task>,
    storage_fault: Option<StoreError>,
}

impl LocalTaskStore {
    /// Restores the collection from the blob.
    ///
    /// Never fails: read errors degrade to an empty collection and are kept
    /// as a pending storage fault.
    pub fn open(kv: SharedKv, clock: SharedClock) -> Self {
        let mut storage_fault = None;
        let tasks = match kv.get(TASKS_STATE_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Task>>(&blob) {
                Ok(tasks) => tasks,
                Err(err) => {
                    warn!(
                        "event=local_restore module=store status=degraded reason=unparsable_blob error={err}"
                    );
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                error!(
                    "event=local_restore module=store status=error error_code=blob_read_failed error={err}"
                );
                storage_fault = Some(StoreError::Storage(err));
                Vec::new()
            }
        };
        info!(
            "event=local_restore module=store status=ok task_count={}",
            tasks.len()
        );

        Self {
            kv,
            clock,
            tasks,
            storage_fault,
        }
    }

    fn position(&self, id: &TaskId) -> StoreResult<usize> {
        self.tasks
            .iter()
            .position(|task| &task.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn persist(&mut self) {
        let written = serde_json::to_string(&self.tasks)
            .map_err(|err| KvError::Unavailable(format!("serialize failed: {err}")))
            .and_then(|blob| self.kv.set(TASKS_STATE_KEY, &blob));

        if let Err(err) = written {
            error!(
                "event=local_persist module=store status=error error_code=blob_write_failed task_count={} error={err}",
                self.tasks.len()
            );
            self.storage_fault = Some(StoreError::Storage(err));
        }
    }
}

impl TaskStore for LocalTaskStore {
    type Window = ();

    fn kind(&self) -> &'static str {
        "local"
    }

    fn list(&self, _window: &()) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn create(&mut self, new_task: &NewTask) -> StoreResult<Task> {
        ensure_valid(new_task)?;

        let mut id = TaskId::new_local();
        while self.tasks.iter().any(|task| task.id == id) {
            id = TaskId::new_local();
        }
        let task = Task::from_new(id, new_task);
        self.tasks.push(task.clone());
        self.persist();
        Ok(task)
    }

    fn toggle_done(&mut self, id: &TaskId) -> StoreResult<()> {
        let index = self.position(id)?;
        let now = self.clock.now();
        self.tasks[index].toggle_done(now);
        self.persist();
        Ok(())
    }

    fn delete(&mut self, id: &TaskId) -> StoreResult<()> {
        let index = self.position(id)?;
        self.tasks.remove(index);
        self.persist();
        Ok(())
    }

    fn take_storage_fault(&mut self) -> Option<StoreError> {
        self.storage_fault.take()
    }
}

/// Process-wide handle so every list screen in local mode shares one
/// in-memory collection and one blob writer.
#[derive(Clone)]
pub struct SharedLocalStore {
    inner: Arc<Mutex<LocalTaskStore>>,
}

impl SharedLocalStore {
    pub fn new(store: LocalTaskStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut LocalTaskStore) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut store = self
            .inner
            .lock()
            .map_err(|_| StoreError::Storage(KvError::LockPoisoned))?;
        f(&mut store)
    }
}

impl TaskStore for SharedLocalStore {
    type Window = ();

    fn kind(&self) -> &'static str {
        "local"
    }

    fn list(&self, window: &()) -> StoreResult<Vec<Task>> {
        self.with_store(|store| store.list(window))
    }

    fn create(&mut self, new_task: &NewTask) -> StoreResult<Task> {
        self.with_store(|store| store.create(new_task))
    }

    fn toggle_done(&mut self, id: &TaskId) -> StoreResult<()> {
        self.with_store(|store| store.toggle_done(id))
    }

    fn delete(&mut self, id: &TaskId) -> StoreResult<()> {
        self.with_store(|store| store.delete(id))
    }

    fn take_storage_fault(&mut self) -> Option<StoreError> {
        self.with_store(|store| Ok(store.take_storage_fault()))
            .unwrap_or_else(Some)
    }
}
