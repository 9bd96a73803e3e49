//! Task store capability and its local/remote implementations.
//!
//! # Responsibility
//! - Define the create/list/toggle/delete contract the view controller
//!   drives.
//! - Keep the local (blob-backed) and remote (REST-backed) list contracts
//!   distinct through the associated `Window` type.
//!
//! # Invariants
//! - Mutations on a missing id fail with `NotFound`, never a silent no-op.
//! - Blank descriptions are rejected before any side effect.
//! - Stores own the authoritative collection; callers only derive views.

use crate::kv::KvError;
use crate::model::task::{NewTask, Task, TaskId, TaskValidationError};
use crate::policy::window::{window_bound, WindowBound};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod http;
pub mod local;
pub mod remote;

pub use http::{HttpTaskApi, TaskApi};
pub use local::{LocalTaskStore, SharedLocalStore, TASKS_STATE_KEY};
pub use remote::RemoteTaskStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure talking to the remote task service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Request exceeded the configured timeout.
    Timeout,
    /// Connection or protocol failure before a response arrived.
    Transport(String),
    /// Server answered with a non-success status.
    Status { status: u16, message: String },
    /// Response body did not match the expected shape.
    Decode(String),
    /// HTTP client could not be built from configuration.
    Config(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "request to task service timed out"),
            Self::Transport(message) => write!(f, "task service unreachable: {message}"),
            Self::Status { status, message } => {
                write!(f, "task service returned {status}: {message}")
            }
            Self::Decode(message) => write!(f, "unexpected task service response: {message}"),
            Self::Config(message) => write!(f, "task service client misconfigured: {message}"),
        }
    }
}

impl Error for RemoteError {}

/// Store-level error taxonomy.
#[derive(Debug)]
pub enum StoreError {
    Validation(TaskValidationError),
    NotFound(TaskId),
    Remote(RemoteError),
    Storage(KvError),
}

impl StoreError {
    /// Stable machine-readable code for logs and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Remote(RemoteError::Timeout) => "remote_timeout",
            Self::Remote(_) => "remote",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Remote(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "task storage failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Remote(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RemoteError> for StoreError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// Builds the list window a store kind expects.
pub trait ListWindow: Sized {
    fn resolve(days_ahead: u32, now: DateTime<Utc>) -> Self;
}

/// The local store has no date window.
impl ListWindow for () {
    fn resolve(_days_ahead: u32, _now: DateTime<Utc>) -> Self {}
}

impl ListWindow for WindowBound {
    fn resolve(days_ahead: u32, now: DateTime<Utc>) -> Self {
        window_bound(days_ahead, now)
    }
}

/// Backend holding the authoritative task collection.
pub trait TaskStore {
    /// Scope argument accepted by `list`.
    type Window: ListWindow;

    /// Short backend label for logs.
    fn kind(&self) -> &'static str;

    fn list(&self, window: &Self::Window) -> StoreResult<Vec<Task>>;
    fn create(&mut self, new_task: &NewTask) -> StoreResult<Task>;
    fn toggle_done(&mut self, id: &TaskId) -> StoreResult<()>;
    fn delete(&mut self, id: &TaskId) -> StoreResult<()>;

    /// Returns and clears a persistence failure that did not fail the
    /// operation itself (in-memory state stayed authoritative).
    fn take_storage_fault(&mut self) -> Option<StoreError> {
        None
    }
}

/// Re-checks creation input at the store boundary.
pub(crate) fn ensure_valid(new_task: &NewTask) -> StoreResult<()> {
    if new_task.description().trim().is_empty() {
        return Err(TaskValidationError::EmptyDescription.into());
    }
    Ok(())
}
