//! Runtime store selection for list screens.
//!
//! # Invariants
//! - Local mode screens share one in-memory collection per `ScreenDeps`.
//! - Remote mode screens get their own HTTP client with the injected session.

use crate::clock::SharedClock;
use crate::config::StoreMode;
use crate::kv::SharedKv;
use crate::service::preference::PreferenceSync;
use crate::service::task_view::{TaskScreen, TaskViewController};
use crate::session::SharedSession;
use crate::store::{HttpTaskApi, LocalTaskStore, RemoteTaskStore, SharedLocalStore, StoreResult};
use log::info;
use once_cell::sync::OnceCell;

/// Collaborators injected into every screen.
pub struct ScreenDeps {
    kv: SharedKv,
    clock: SharedClock,
    session: SharedSession,
    local_store: OnceCell<SharedLocalStore>,
}

impl ScreenDeps {
    pub fn new(kv: SharedKv, clock: SharedClock, session: SharedSession) -> Self {
        Self {
            kv,
            clock,
            session,
            local_store: OnceCell::new(),
        }
    }

    pub fn kv(&self) -> &SharedKv {
        &self.kv
    }

    fn local_store(&self) -> SharedLocalStore {
        self.local_store
            .get_or_init(|| {
                SharedLocalStore::new(LocalTaskStore::open(self.kv.clone(), self.clock.clone()))
            })
            .clone()
    }
}

/// Builds an unmounted list screen backed by the store `mode` selects.
///
/// # Errors
/// - `Remote(Config)` when the HTTP client cannot be built.
pub fn open_screen(
    mode: &StoreMode,
    days_ahead: u32,
    deps: &ScreenDeps,
) -> StoreResult<Box<dyn TaskScreen>> {
    let preferences = PreferenceSync::new(deps.kv.clone());
    info!(
        "event=screen_open module=service status=ok mode={} days_ahead={days_ahead}",
        mode.label()
    );

    match mode {
        StoreMode::Local => Ok(Box::new(TaskViewController::new(
            deps.local_store(),
            preferences,
            deps.clock.clone(),
            days_ahead,
        ))),
        StoreMode::Remote(config) => {
            let api = HttpTaskApi::new(config, deps.session.clone())?;
            Ok(Box::new(TaskViewController::new(
                RemoteTaskStore::new(api),
                preferences,
                deps.clock.clone(),
                days_ahead,
            )))
        }
    }
}
