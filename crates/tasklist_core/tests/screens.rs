mod common;

use common::{at, shared_clock, ManualClock};
use std::sync::Arc;
use std::time::Duration;
use tasklist_core::{
    open_screen, Horizon, MemoryKeyValueStore, RemoteConfig, ScreenDeps, SharedKv,
    SharedSession, StaticSession, StoreError, StoreMode, ViewState,
};

fn deps(clock: &Arc<ManualClock>) -> ScreenDeps {
    let kv: SharedKv = Arc::new(MemoryKeyValueStore::new());
    let session: SharedSession = Arc::new(StaticSession::new(Some("token".to_string())));
    ScreenDeps::new(kv, shared_clock(clock), session)
}

#[test]
fn local_screens_share_one_collection() {
    let clock = ManualClock::starting_at(at(2024, 1, 10));
    let deps = deps(&clock);
    let mut today = open_screen(&StoreMode::Local, Horizon::Today.days_ahead(), &deps).unwrap();
    let mut week = open_screen(&StoreMode::Local, Horizon::Week.days_ahead(), &deps).unwrap();
    today.mount().unwrap();
    week.mount().unwrap();

    today.add_task("Buy milk", at(2024, 1, 10)).unwrap();
    week.refresh().unwrap();

    assert_eq!(week.snapshot().visible, today.snapshot().visible);
    assert_eq!(week.snapshot().days_ahead, 7);

    let id = week.snapshot().visible[0].id.clone();
    week.delete_task(&id).unwrap();
    today.refresh().unwrap();
    assert!(today.snapshot().visible.is_empty());
}

#[test]
fn unreachable_remote_service_puts_screen_in_error_state() {
    let clock = ManualClock::starting_at(at(2024, 1, 10));
    let deps = deps(&clock);
    let config = RemoteConfig::new("http://127.0.0.1:1")
        .unwrap()
        .with_timeout(Duration::from_secs(2))
        .unwrap();
    let mut screen = open_screen(&StoreMode::Remote(config), 0, &deps).unwrap();

    let err = screen.mount().unwrap_err();
    assert!(matches!(err, StoreError::Remote(_)));
    assert!(matches!(screen.snapshot().state, ViewState::Error(_)));

    let err = screen.add_task("  ", at(2024, 1, 10)).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}
