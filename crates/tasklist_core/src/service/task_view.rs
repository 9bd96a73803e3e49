//! Task view controller.
//!
//! # Responsibility
//! - Own the view state of one list screen: the last known-good collection,
//!   the visible projection, the filter flag and the add-form flag.
//! - Turn presentation intents into store calls followed by a reload.
//!
//! # Invariants
//! - The visible projection is recomputed from (collection, flag) on every
//!   change, never patched in place.
//! - A failed operation leaves collection and projection at their last
//!   known-good values; the controller stays usable.
//! - Blank descriptions never reach the store.
//! - A storage warning stays until a clean write to the same blob.
//! - `Error` gives way to `Ready` on the next successful operation, filter
//!   toggles included, once the collection has loaded.
//! - `NotFound` on toggle/delete is treated as already applied elsewhere and
//!   resolved by a reload.
//! - Intents take `&mut self`, so one instance handles them strictly in
//!   sequence.

use crate::clock::SharedClock;
use crate::model::task::{NewTask, Task, TaskId};
use crate::policy::filter::visible_tasks;
use crate::service::preference::PreferenceSync;
use crate::store::{ListWindow, StoreError, StoreResult, TaskStore};
use chrono::{DateTime, Utc};
use log::{error, info, warn};

/// Lifecycle of a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Initial state until the first list completes.
    Loading,
    /// Visible projection reflects the last successful list.
    Ready,
    /// Last operation failed; the message is user-facing.
    Error(String),
}

/// Read-only state handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub days_ahead: u32,
    pub state: ViewState,
    pub visible: Vec<Task>,
    pub show_done_tasks: bool,
    pub add_form_visible: bool,
    /// Set when the device blob could not be read or written.
    pub storage_warning: Option<String>,
}

/// Presentation surface of one list screen.
pub trait TaskScreen: Send {
    /// Loads the list for the first time.
    fn mount(&mut self) -> StoreResult<()>;
    /// Re-lists without mutating anything.
    fn refresh(&mut self) -> StoreResult<()>;
    fn snapshot(&self) -> ViewSnapshot;
    fn open_add_form(&mut self);
    fn close_add_form(&mut self);
    fn add_task(&mut self, description: &str, estimated_at: DateTime<Utc>) -> StoreResult<()>;
    fn toggle_task(&mut self, id: &TaskId) -> StoreResult<()>;
    fn delete_task(&mut self, id: &TaskId) -> StoreResult<()>;
    /// Flips `showDoneTasks` and returns the new value.
    fn toggle_filter(&mut self) -> bool;
}

/// Which blob a pending warning is about; only a clean write to the same
/// blob clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WarningSource {
    Tasks,
    Preference,
}

#[derive(Debug, Clone)]
struct StorageWarning {
    source: WarningSource,
    message: String,
}

impl StorageWarning {
    fn is_from(&self, source: WarningSource) -> bool {
        self.source == source
    }
}

pub struct TaskViewController<S: TaskStore> {
    store: S,
    preferences: PreferenceSync,
    clock: SharedClock,
    days_ahead: u32,
    tasks: Vec<Task>,
    visible: Vec<Task>,
    show_done_tasks: bool,
    state: ViewState,
    add_form_visible: bool,
    storage_warning: Option<StorageWarning>,
    loaded: bool,
}

impl<S: TaskStore> TaskViewController<S> {
    pub fn new(store: S, preferences: PreferenceSync, clock: SharedClock, days_ahead: u32) -> Self {
        let show_done_tasks = preferences.load_show_done();
        Self {
            store,
            preferences,
            clock,
            days_ahead,
            tasks: Vec::new(),
            visible: Vec::new(),
            show_done_tasks,
            state: ViewState::Loading,
            add_form_visible: false,
            storage_warning: None,
            loaded: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn reload(&mut self) -> StoreResult<()> {
        let window = S::Window::resolve(self.days_ahead, self.clock.now());
        let tasks = self.store.list(&window)?;
        self.tasks = tasks;
        self.loaded = true;
        self.reproject();
        Ok(())
    }

    fn reproject(&mut self) {
        self.visible = visible_tasks(&self.tasks, self.show_done_tasks);
    }

    /// `wrote` is set when the store accepted a mutation; a clean write
    /// clears an earlier warning.
    fn absorb_storage_fault(&mut self, wrote: bool) {
        match self.store.take_storage_fault() {
            Some(fault) => {
                warn!(
                    "event=storage_fault module=service status=degraded store={} error_code={} error={fault}",
                    self.store.kind(),
                    fault.code()
                );
                self.storage_warning = Some(StorageWarning {
                    source: WarningSource::Tasks,
                    message: fault.to_string(),
                });
            }
            None if wrote && self.has_warning_from(WarningSource::Tasks) => {
                info!(
                    "event=storage_fault module=service status=recovered store={}",
                    self.store.kind()
                );
                self.storage_warning = None;
            }
            None => {}
        }
    }

    fn has_warning_from(&self, source: WarningSource) -> bool {
        self.storage_warning
            .as_ref()
            .is_some_and(|warning| warning.is_from(source))
    }

    fn settle(
        &mut self,
        operation: &'static str,
        wrote: bool,
        result: StoreResult<()>,
    ) -> StoreResult<()> {
        self.absorb_storage_fault(wrote);
        match result {
            Ok(()) => {
                self.state = ViewState::Ready;
                info!(
                    "event=view_{operation} module=service status=ok store={} visible={} total={}",
                    self.store.kind(),
                    self.visible.len(),
                    self.tasks.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=view_{operation} module=service status=error store={} error_code={} error={err}",
                    self.store.kind(),
                    err.code()
                );
                self.state = ViewState::Error(err.to_string());
                Err(err)
            }
        }
    }

    /// Reloads after a toggle/delete, absorbing a benign `NotFound`.
    fn reload_after(&mut self, operation: &'static str, result: StoreResult<()>) -> StoreResult<()> {
        match result {
            Ok(()) => self.reload(),
            Err(StoreError::NotFound(id)) => {
                info!(
                    "event=view_{operation} module=service status=stale store={} task_id={id}",
                    self.store.kind()
                );
                self.reload()
            }
            Err(err) => Err(err),
        }
    }
}

impl<S: TaskStore + Send> TaskScreen for TaskViewController<S> {
    fn mount(&mut self) -> StoreResult<()> {
        self.state = ViewState::Loading;
        self.show_done_tasks = self.preferences.load_show_done();
        let result = self.reload();
        self.settle("mount", false, result)
    }

    fn refresh(&mut self) -> StoreResult<()> {
        let result = self.reload();
        self.settle("refresh", false, result)
    }

    fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            days_ahead: self.days_ahead,
            state: self.state.clone(),
            visible: self.visible.clone(),
            show_done_tasks: self.show_done_tasks,
            add_form_visible: self.add_form_visible,
            storage_warning: self
                .storage_warning
                .as_ref()
                .map(|warning| warning.message.clone()),
        }
    }

    fn open_add_form(&mut self) {
        self.add_form_visible = true;
    }

    fn close_add_form(&mut self) {
        self.add_form_visible = false;
    }

    fn add_task(&mut self, description: &str, estimated_at: DateTime<Utc>) -> StoreResult<()> {
        let new_task = NewTask::new(description, estimated_at).map_err(|err| {
            info!("event=view_add_task module=service status=rejected reason={err}");
            StoreError::from(err)
        })?;

        let created = self.store.create(&new_task);
        let wrote = created.is_ok();
        let result = match created {
            Ok(_) => {
                self.add_form_visible = false;
                self.reload()
            }
            Err(err) => Err(err),
        };
        self.settle("add_task", wrote, result)
    }

    fn toggle_task(&mut self, id: &TaskId) -> StoreResult<()> {
        let toggled = self.store.toggle_done(id);
        let wrote = toggled.is_ok();
        let result = self.reload_after("toggle_task", toggled);
        self.settle("toggle_task", wrote, result)
    }

    fn delete_task(&mut self, id: &TaskId) -> StoreResult<()> {
        let deleted = self.store.delete(id);
        let wrote = deleted.is_ok();
        let result = self.reload_after("delete_task", deleted);
        self.settle("delete_task", wrote, result)
    }

    fn toggle_filter(&mut self) -> bool {
        self.show_done_tasks = !self.show_done_tasks;
        match self.preferences.save_show_done(self.show_done_tasks) {
            Ok(()) => {
                if self.has_warning_from(WarningSource::Preference) {
                    self.storage_warning = None;
                }
            }
            Err(err) => {
                warn!(
                    "event=view_toggle_filter module=service status=degraded error_code=preference_write_failed error={err}"
                );
                if !self.has_warning_from(WarningSource::Tasks) {
                    self.storage_warning = Some(StorageWarning {
                        source: WarningSource::Preference,
                        message: format!("view preference not saved: {err}"),
                    });
                }
            }
        }
        self.reproject();
        // The projection is valid again once the collection has loaded.
        if self.loaded && matches!(self.state, ViewState::Error(_)) {
            self.state = ViewState::Ready;
        }
        self.show_done_tasks
    }
}
