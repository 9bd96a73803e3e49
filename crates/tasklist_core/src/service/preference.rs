//! Persisted `showDoneTasks` preference.
//!
//! # Invariants
//! - Absent, unreadable or corrupt values read as `true` (show everything).
//! - Values are stored as JSON booleans.

use crate::kv::{KeyValueStore, KvError, KvResult, SharedKv};
use log::warn;

/// Blob key holding the preference.
pub const SHOW_DONE_TASKS_KEY: &str = "showDoneTasks";

const DEFAULT_SHOW_DONE_TASKS: bool = true;

pub struct PreferenceSync {
    kv: SharedKv,
}

impl PreferenceSync {
    pub fn new(kv: SharedKv) -> Self {
        Self { kv }
    }

    pub fn load_show_done(&self) -> bool {
        match self.kv.get(SHOW_DONE_TASKS_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|_| {
                warn!("event=preference_load module=service status=degraded reason=unparsable_value");
                DEFAULT_SHOW_DONE_TASKS
            }),
            Ok(None) => DEFAULT_SHOW_DONE_TASKS,
            Err(err) => {
                warn!(
                    "event=preference_load module=service status=error error_code=blob_read_failed error={err}"
                );
                DEFAULT_SHOW_DONE_TASKS
            }
        }
    }

    pub fn save_show_done(&self, show_done: bool) -> KvResult<()> {
        let raw = serde_json::to_string(&show_done)
            .map_err(|err| KvError::Unavailable(format!("serialize failed: {err}")))?;
        self.kv.set(SHOW_DONE_TASKS_KEY, &raw)
    }
}
