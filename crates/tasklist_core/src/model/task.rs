//! Task domain model.
//!
//! # Responsibility
//! - Define the task record shared by local and remote stores.
//! - Own the done/pending toggle rule and creation-time validation.
//!
//! # Invariants
//! - `id` is stable for the task lifetime.
//! - `description` is never blank once a task exists.
//! - `estimated_at` is set at creation and never mutated.
//! - `done_at == None` means pending; `Some(ts)` means completed at `ts`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable task identifier.
///
/// Remote tasks carry the integer id assigned by the server. Tasks created
/// by the local store get a UUID v4 assigned client-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Server(i64),
    Local(Uuid),
}

impl TaskId {
    /// Generates a fresh client-side id.
    pub fn new_local() -> Self {
        Self::Local(Uuid::new_v4())
    }

    /// Parses the display form produced by `Display`.
    ///
    /// Integers map to `Server`, UUID strings map to `Local`.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if let Ok(id) = trimmed.parse::<i64>() {
            return Some(Self::Server(id));
        }
        Uuid::parse_str(trimmed).ok().map(Self::Local)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Server(id) => write!(f, "{id}"),
            Self::Local(id) => write!(f, "{id}"),
        }
    }
}

/// Validation failures for task creation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Description is empty after trimming whitespace.
    EmptyDescription,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "task description must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do entry.
///
/// Serialized with the field names used by the task blob and the REST API
/// (`desc`, `estimateAt`, `doneAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "estimateAt")]
    pub estimated_at: DateTime<Utc>,
    #[serde(rename = "doneAt", default)]
    pub done_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Builds a pending task from validated input.
    pub fn from_new(id: TaskId, new_task: &NewTask) -> Self {
        Self {
            id,
            description: new_task.description.clone(),
            estimated_at: new_task.estimated_at,
            done_at: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done_at.is_some()
    }

    /// Flips completion state: pending becomes done at `now`, done becomes pending.
    pub fn toggle_done(&mut self, now: DateTime<Utc>) {
        self.done_at = match self.done_at {
            Some(_) => None,
            None => Some(now),
        };
    }

    /// Date shown next to the task in a list row.
    pub fn display_date(&self) -> DateTime<Utc> {
        self.done_at.unwrap_or(self.estimated_at)
    }
}

/// Validated input for task creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    #[serde(rename = "desc")]
    description: String,
    #[serde(rename = "estimateAt")]
    estimated_at: DateTime<Utc>,
}

impl NewTask {
    /// Validates and normalizes creation input.
    ///
    /// # Errors
    /// - `EmptyDescription` when `description` is blank after trimming.
    pub fn new(
        description: &str,
        estimated_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(TaskValidationError::EmptyDescription);
        }
        Ok(Self {
            description: trimmed.to_string(),
            estimated_at,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn estimated_at(&self) -> DateTime<Utc> {
        self.estimated_at
    }
}
