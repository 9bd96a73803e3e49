//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tasklist_core` linkage.
//! - Drive one local-mode screen per horizon against an in-memory blob.

use chrono::{Duration, Utc};
use std::process::ExitCode;
use std::sync::Arc;
use tasklist_core::{
    open_screen, system_clock, Horizon, ScreenDeps, SharedKv, SqliteKeyValueStore, StaticSession,
    StoreMode, ViewState,
};

fn main() -> ExitCode {
    println!("tasklist_core ping={}", tasklist_core::ping());
    println!("tasklist_core version={}", tasklist_core::core_version());

    match run_local_probe() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("tasklist_core probe failed: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run_local_probe() -> Result<(), String> {
    let kv: SharedKv =
        Arc::new(SqliteKeyValueStore::open_in_memory().map_err(|err| err.to_string())?);
    let deps = ScreenDeps::new(kv, system_clock(), Arc::new(StaticSession::new(None)));

    let mut today = open_screen(&StoreMode::Local, Horizon::Today.days_ahead(), &deps)
        .map_err(|err| err.to_string())?;
    today.mount().map_err(|err| err.to_string())?;
    today
        .add_task("smoke probe task", Utc::now() + Duration::days(2))
        .map_err(|err| err.to_string())?;

    for horizon in Horizon::ALL {
        let mut screen = open_screen(&StoreMode::Local, horizon.days_ahead(), &deps)
            .map_err(|err| err.to_string())?;
        screen.mount().map_err(|err| err.to_string())?;
        let snapshot = screen.snapshot();
        if snapshot.state != ViewState::Ready {
            return Err(format!("{} screen not ready: {:?}", horizon.key(), snapshot.state));
        }
        println!(
            "tasklist_core screen={} visible={}",
            horizon.key(),
            snapshot.visible.len()
        );
    }
    Ok(())
}
