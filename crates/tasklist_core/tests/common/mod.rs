#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tasklist_core::{
    Clock, KeyValueStore, KvError, KvResult, MemoryKeyValueStore, NewTask, RemoteError,
    SharedClock, StoreError, StoreResult, Task, TaskApi, TaskId, TaskStore, WindowBound,
};

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn shared_clock(clock: &Arc<ManualClock>) -> SharedClock {
    clock.clone()
}

/// Memory blob whose writes can be switched off.
#[derive(Default)]
pub struct FlakyKv {
    inner: MemoryKeyValueStore,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FlakyKv {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyKv {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("read disabled".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.inner.remove(key)
    }
}

/// In-process stand-in for the task service.
///
/// Applies the same `date <= bound` rule for pending and done tasks that the
/// real service applies to `estimateAt`.
#[derive(Clone, Default)]
pub struct FakeTaskApi {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    tasks: Vec<Task>,
    next_id: i64,
    offline: bool,
    bounds: Vec<WindowBound>,
    calls: usize,
}

impl FakeTaskApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, task: Task) {
        let mut state = self.state.lock().unwrap();
        if let TaskId::Server(id) = task.id {
            state.next_id = state.next_id.max(id);
        }
        state.tasks.push(task);
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    pub fn bounds(&self) -> Vec<WindowBound> {
        self.state.lock().unwrap().bounds.clone()
    }

    pub fn server_tasks(&self) -> Vec<Task> {
        self.state.lock().unwrap().tasks.clone()
    }

    /// Simulates another device deleting a task.
    pub fn remove_behind_client(&self, id: &TaskId) {
        self.state.lock().unwrap().tasks.retain(|task| &task.id != id);
    }

    fn enter(&self) -> StoreResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if state.offline {
            return Err(StoreError::Remote(RemoteError::Timeout));
        }
        Ok(state)
    }
}

impl TaskApi for FakeTaskApi {
    fn fetch_tasks(&self, bound: WindowBound) -> StoreResult<Vec<Task>> {
        let mut state = self.enter()?;
        state.bounds.push(bound);
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.estimated_at <= bound.instant())
            .cloned()
            .collect())
    }

    fn post_task(&self, new_task: &NewTask) -> StoreResult<Task> {
        let mut state = self.enter()?;
        state.next_id += 1;
        let task = Task::from_new(TaskId::Server(state.next_id), new_task);
        state.tasks.push(task.clone());
        Ok(task)
    }

    fn put_toggle(&self, id: &TaskId) -> StoreResult<()> {
        let mut state = self.enter()?;
        let task = state
            .tasks
            .iter_mut()
            .find(|task| &task.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        task.toggle_done(at(2024, 3, 1));
        Ok(())
    }

    fn delete_task(&self, id: &TaskId) -> StoreResult<()> {
        let mut state = self.enter()?;
        let before = state.tasks.len();
        state.tasks.retain(|task| &task.id != id);
        if state.tasks.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

/// Wraps a store and counts every call made through it.
pub struct CountingStore<S> {
    inner: S,
    calls: Arc<AtomicUsize>,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl<S: TaskStore> TaskStore for CountingStore<S> {
    type Window = S::Window;

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    fn list(&self, window: &Self::Window) -> StoreResult<Vec<Task>> {
        self.tick();
        self.inner.list(window)
    }

    fn create(&mut self, new_task: &NewTask) -> StoreResult<Task> {
        self.tick();
        self.inner.create(new_task)
    }

    fn toggle_done(&mut self, id: &TaskId) -> StoreResult<()> {
        self.tick();
        self.inner.toggle_done(id)
    }

    fn delete(&mut self, id: &TaskId) -> StoreResult<()> {
        self.tick();
        self.inner.delete(id)
    }

    fn take_storage_fault(&mut self) -> Option<StoreError> {
        self.inner.take_storage_fault()
    }
}
