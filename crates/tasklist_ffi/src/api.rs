//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list screens as opaque handles driven by sync intents.
//! - Resolve store mode, blob database and server url from the environment.
//! - Keep error semantics simple: every call returns an envelope.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each screen sits behind its own mutex, so intents on one handle run one
//!   at a time while other screens stay responsive.
//! - Task ids cross the boundary in their display form.

use chrono::{DateTime, TimeZone, Utc};
use log::{error, warn};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tasklist_core::session::{logout, resolve_start_route, save_user};
use tasklist_core::{
    core_version as core_version_inner, default_log_level, init_logging as init_logging_inner,
    open_screen, ping as ping_inner, system_clock, Horizon, MemoryKeyValueStore, ScreenDeps,
    SharedKv, SqliteKeyValueStore, StartRoute, StoreError, StoreMode, StoredSession, Task,
    TaskId, TaskScreen, UserProfile, ViewState,
};

const DB_FILE_NAME: &str = "tasklist.sqlite3";
const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

static RUNTIME: OnceCell<FfiRuntime> = OnceCell::new();

struct FfiRuntime {
    mode: StoreMode,
    deps: ScreenDeps,
    screens: Mutex<HashMap<u64, Arc<ScreenEntry>>>,
    next_handle: AtomicU64,
}

struct ScreenEntry {
    horizon: Horizon,
    screen: Mutex<Box<dyn TaskScreen>>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// An empty `level` selects the build default (`debug` or `info`).
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(resolve_log_level(&level), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub description: String,
    pub estimate_epoch_ms: i64,
    pub done_epoch_ms: Option<i64>,
    /// Done time for completed tasks, estimate otherwise.
    pub display_epoch_ms: i64,
}

/// Result of opening a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenOpenResponse {
    pub ok: bool,
    pub handle: Option<u64>,
    pub message: String,
}

/// Full render state of one list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSnapshotResponse {
    pub ok: bool,
    pub message: String,
    pub title: String,
    /// `loading|ready|error`.
    pub state: String,
    pub error_message: Option<String>,
    pub items: Vec<TaskItem>,
    pub show_done_tasks: bool,
    pub add_form_visible: bool,
    pub storage_warning: Option<String>,
}

/// Outcome of one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenActionResponse {
    pub ok: bool,
    /// `validation|not_found|remote|remote_timeout|storage|bad_input|no_screen`.
    pub error_code: Option<String>,
    pub message: String,
}

impl ScreenActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_code: Some(code.to_string()),
            message: message.into(),
        }
    }

    fn from_store(result: Result<(), StoreError>, success: &str) -> Self {
        match result {
            Ok(()) => Self::success(success),
            Err(err) => Self::failure(err.code(), err.to_string()),
        }
    }
}

/// Start route decided from the persisted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRouteResponse {
    /// `auth|home`.
    pub route: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Opens and mounts a list screen for `horizon` (`today|tomorrow|week|month`).
///
/// A mount failure still returns a handle; the snapshot carries the error
/// state and `screen_refresh` retries.
///
/// # FFI contract
/// - Sync call; in remote mode it blocks for up to the request timeout.
/// - Never throws; failures come back as `ok=false` with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_open(horizon: String) -> ScreenOpenResponse {
    let Some(horizon) = Horizon::parse(&horizon) else {
        return ScreenOpenResponse {
            ok: false,
            handle: None,
            message: format!("unknown horizon `{horizon}`"),
        };
    };
    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(message) => {
            return ScreenOpenResponse {
                ok: false,
                handle: None,
                message,
            }
        }
    };

    let mut screen = match open_screen(&runtime.mode, horizon.days_ahead(), &runtime.deps) {
        Ok(screen) => screen,
        Err(err) => {
            return ScreenOpenResponse {
                ok: false,
                handle: None,
                message: format!("screen_open failed: {err}"),
            }
        }
    };
    let message = match screen.mount() {
        Ok(()) => "Screen ready.".to_string(),
        Err(err) => format!("screen_open loaded with error: {err}"),
    };

    let handle = runtime.next_handle.fetch_add(1, Ordering::Relaxed) + 1;
    let entry = Arc::new(ScreenEntry {
        horizon,
        screen: Mutex::new(screen),
    });
    match runtime.screens.lock() {
        Ok(mut screens) => {
            screens.insert(handle, entry);
            ScreenOpenResponse {
                ok: true,
                handle: Some(handle),
                message,
            }
        }
        Err(_) => ScreenOpenResponse {
            ok: false,
            handle: None,
            message: "screen registry unavailable".to_string(),
        },
    }
}

/// Releases a screen handle. Unknown handles are ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_close(handle: u64) -> bool {
    let Ok(runtime) = runtime() else {
        return false;
    };
    match runtime.screens.lock() {
        Ok(mut screens) => screens.remove(&handle).is_some(),
        Err(_) => false,
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn screen_snapshot(handle: u64) -> ScreenSnapshotResponse {
    let entry = match find_screen(handle) {
        Ok(entry) => entry,
        Err(message) => return empty_snapshot(message),
    };
    let Ok(screen) = entry.screen.lock() else {
        return empty_snapshot("screen lock poisoned".to_string());
    };

    let snapshot = screen.snapshot();
    let (state, error_message) = match snapshot.state {
        ViewState::Loading => ("loading", None),
        ViewState::Ready => ("ready", None),
        ViewState::Error(message) => ("error", Some(message)),
    };
    ScreenSnapshotResponse {
        ok: true,
        message: String::new(),
        title: entry.horizon.title().to_string(),
        state: state.to_string(),
        error_message,
        items: snapshot.visible.iter().map(to_task_item).collect(),
        show_done_tasks: snapshot.show_done_tasks,
        add_form_visible: snapshot.add_form_visible,
        storage_warning: snapshot.storage_warning,
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn screen_refresh(handle: u64) -> ScreenActionResponse {
    with_screen(handle, |screen| {
        ScreenActionResponse::from_store(screen.refresh(), "Screen refreshed.")
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn screen_open_add_form(handle: u64) -> ScreenActionResponse {
    with_screen(handle, |screen| {
        screen.open_add_form();
        ScreenActionResponse::success("Add form opened.")
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn screen_close_add_form(handle: u64) -> ScreenActionResponse {
    with_screen(handle, |screen| {
        screen.close_add_form();
        ScreenActionResponse::success("Add form closed.")
    })
}

/// Adds a task estimated for `estimate_epoch_ms` (Unix epoch milliseconds).
#[flutter_rust_bridge::frb(sync)]
pub fn screen_add_task(
    handle: u64,
    description: String,
    estimate_epoch_ms: i64,
) -> ScreenActionResponse {
    let Some(estimated_at) = from_epoch_ms(estimate_epoch_ms) else {
        return ScreenActionResponse::failure(
            "bad_input",
            format!("invalid estimate timestamp {estimate_epoch_ms}"),
        );
    };
    with_screen(handle, |screen| {
        ScreenActionResponse::from_store(
            screen.add_task(description.as_str(), estimated_at),
            "Task created.",
        )
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn screen_toggle_task(handle: u64, task_id: String) -> ScreenActionResponse {
    let Some(id) = TaskId::parse(&task_id) else {
        return ScreenActionResponse::failure("bad_input", format!("invalid task id `{task_id}`"));
    };
    with_screen(handle, |screen| {
        ScreenActionResponse::from_store(screen.toggle_task(&id), "Task toggled.")
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn screen_delete_task(handle: u64, task_id: String) -> ScreenActionResponse {
    let Some(id) = TaskId::parse(&task_id) else {
        return ScreenActionResponse::failure("bad_input", format!("invalid task id `{task_id}`"));
    };
    with_screen(handle, |screen| {
        ScreenActionResponse::from_store(screen.delete_task(&id), "Task deleted.")
    })
}

/// Flips the show-done-tasks filter; the message carries the new value.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_toggle_filter(handle: u64) -> ScreenActionResponse {
    with_screen(handle, |screen| {
        let show_done = screen.toggle_filter();
        ScreenActionResponse::success(if show_done {
            "show_done_tasks=true"
        } else {
            "show_done_tasks=false"
        })
    })
}

/// Decides whether the app opens on the sign-in screen or the task lists.
#[flutter_rust_bridge::frb(sync)]
pub fn session_start_route() -> SessionRouteResponse {
    let route = match runtime() {
        Ok(runtime) => resolve_start_route(runtime.deps.kv()),
        Err(message) => {
            warn!("event=session_route module=ffi status=degraded reason={message}");
            StartRoute::Auth
        }
    };
    match route {
        StartRoute::Auth => SessionRouteResponse {
            route: "auth".to_string(),
            name: None,
            email: None,
        },
        StartRoute::Home(user) => SessionRouteResponse {
            route: "home".to_string(),
            name: Some(user.name),
            email: Some(user.email),
        },
    }
}

/// Stores the user returned by a successful sign-in.
#[flutter_rust_bridge::frb(sync)]
pub fn session_save_user(name: String, email: String, token: String) -> ScreenActionResponse {
    if token.trim().is_empty() {
        return ScreenActionResponse::failure("bad_input", "token cannot be empty");
    }
    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(message) => return ScreenActionResponse::failure("storage", message),
    };
    let user = UserProfile { name, email, token };
    match save_user(runtime.deps.kv(), &user) {
        Ok(()) => ScreenActionResponse::success("Session saved."),
        Err(err) => ScreenActionResponse::failure("storage", err.to_string()),
    }
}

/// Clears the stored session; remote requests stop carrying a token.
#[flutter_rust_bridge::frb(sync)]
pub fn session_logout() -> ScreenActionResponse {
    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(message) => return ScreenActionResponse::failure("storage", message),
    };
    match logout(runtime.deps.kv()) {
        Ok(()) => ScreenActionResponse::success("Signed out."),
        Err(err) => ScreenActionResponse::failure("storage", err.to_string()),
    }
}

fn resolve_log_level(level: &str) -> &str {
    if level.trim().is_empty() {
        default_log_level()
    } else {
        level
    }
}

fn runtime() -> Result<&'static FfiRuntime, String> {
    RUNTIME.get_or_try_init(|| {
        let mode = resolve_store_mode()?;
        let kv = open_blob_store(resolve_db_path());
        let session = Arc::new(StoredSession::new(kv.clone()));
        Ok(FfiRuntime {
            mode,
            deps: ScreenDeps::new(kv, system_clock(), session),
            screens: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(0),
        })
    })
}

fn resolve_store_mode() -> Result<StoreMode, String> {
    let mode = env_value("TASKLIST_MODE").unwrap_or_else(|| "local".to_string());
    let server_url =
        env_value("TASKLIST_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    StoreMode::parse(&mode, Some(server_url.as_str())).map_err(|err| err.to_string())
}

fn resolve_db_path() -> PathBuf {
    env_value("TASKLIST_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Falls back to a process-local blob so the app keeps working when the
/// database cannot be opened.
fn open_blob_store(path: PathBuf) -> SharedKv {
    match SqliteKeyValueStore::open(&path) {
        Ok(kv) => Arc::new(kv),
        Err(err) => {
            error!(
                "event=blob_open module=ffi status=degraded error_code=blob_open_failed error={err}"
            );
            Arc::new(MemoryKeyValueStore::new())
        }
    }
}

fn find_screen(handle: u64) -> Result<Arc<ScreenEntry>, String> {
    let runtime = runtime()?;
    let screens = runtime
        .screens
        .lock()
        .map_err(|_| "screen registry unavailable".to_string())?;
    screens
        .get(&handle)
        .cloned()
        .ok_or_else(|| format!("no screen for handle {handle}"))
}

fn with_screen(
    handle: u64,
    f: impl FnOnce(&mut dyn TaskScreen) -> ScreenActionResponse,
) -> ScreenActionResponse {
    let entry = match find_screen(handle) {
        Ok(entry) => entry,
        Err(message) => return ScreenActionResponse::failure("no_screen", message),
    };
    let mut screen = match entry.screen.lock() {
        Ok(screen) => screen,
        Err(_) => return ScreenActionResponse::failure("no_screen", "screen lock poisoned"),
    };
    f(&mut **screen)
}

fn empty_snapshot(message: String) -> ScreenSnapshotResponse {
    ScreenSnapshotResponse {
        ok: false,
        message,
        title: String::new(),
        state: "error".to_string(),
        error_message: None,
        items: Vec::new(),
        show_done_tasks: true,
        add_form_visible: false,
        storage_warning: None,
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        description: task.description.clone(),
        estimate_epoch_ms: task.estimated_at.timestamp_millis(),
        done_epoch_ms: task.done_at.map(|done_at| done_at.timestamp_millis()),
        display_epoch_ms: task.display_date().timestamp_millis(),
    }
}

fn from_epoch_ms(value: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(value).single()
}
