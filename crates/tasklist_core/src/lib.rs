//! Core domain logic for the task list app.
//! This crate is the single source of truth for task list invariants; UI
//! layers only render snapshots and forward intents.

pub mod clock;
pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod policy;
pub mod service;
pub mod session;
pub mod store;

pub use clock::{system_clock, Clock, SharedClock, SystemClock};
pub use config::{ConfigError, RemoteConfig, StoreMode};
pub use kv::{KeyValueStore, KvError, KvResult, MemoryKeyValueStore, SharedKv, SqliteKeyValueStore};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::horizon::Horizon;
pub use model::task::{NewTask, Task, TaskId, TaskValidationError};
pub use policy::filter::visible_tasks;
pub use policy::window::{window_bound, WindowBound};
pub use service::preference::PreferenceSync;
pub use service::screen::{open_screen, ScreenDeps};
pub use service::task_view::{TaskScreen, TaskViewController, ViewSnapshot, ViewState};
pub use session::{Session, SharedSession, StartRoute, StaticSession, StoredSession, UserProfile};
pub use store::{
    HttpTaskApi, LocalTaskStore, RemoteError, RemoteTaskStore, SharedLocalStore, StoreError,
    StoreResult, TaskApi, TaskStore,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
