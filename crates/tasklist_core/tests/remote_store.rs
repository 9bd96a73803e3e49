mod common;

use common::{at, FakeTaskApi};
use tasklist_core::{
    window_bound, NewTask, RemoteError, RemoteTaskStore, StoreError, Task, TaskId, TaskStore,
};

fn seeded(id: i64, description: &str, day: u32) -> Task {
    Task {
        id: TaskId::Server(id),
        description: description.to_string(),
        estimated_at: at(2024, 3, day),
        done_at: None,
    }
}

#[test]
fn list_pushes_window_bound_and_passes_server_order_through() {
    let api = FakeTaskApi::new();
    api.seed(seeded(3, "later", 20));
    api.seed(seeded(1, "soon", 5));
    api.seed(seeded(2, "today", 1));
    let store = RemoteTaskStore::new(api.clone());

    let bound = window_bound(7, at(2024, 3, 1));
    let tasks = store.list(&bound).unwrap();

    let ids: Vec<TaskId> = tasks.into_iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![TaskId::Server(1), TaskId::Server(2)]);
    assert_eq!(api.bounds(), vec![bound]);
    assert_eq!(bound.as_query_value(), "2024-03-08T00:00:00Z");
}

#[test]
fn mutations_do_not_patch_any_client_copy() {
    let api = FakeTaskApi::new();
    let mut store = RemoteTaskStore::new(api.clone());
    let bound = window_bound(30, at(2024, 3, 1));

    let created = store
        .create(&NewTask::new("Pay rent", at(2024, 3, 5)).unwrap())
        .unwrap();
    assert_eq!(created.id, TaskId::Server(1));
    assert_eq!(api.server_tasks().len(), 1);

    store.toggle_done(&created.id).unwrap();
    assert!(store.list(&bound).unwrap()[0].is_done());

    store.delete(&created.id).unwrap();
    assert!(store.list(&bound).unwrap().is_empty());
}

#[test]
fn delete_twice_reports_not_found() {
    let api = FakeTaskApi::new();
    api.seed(seeded(9, "once", 1));
    let mut store = RemoteTaskStore::new(api);

    store.delete(&TaskId::Server(9)).unwrap();
    assert!(matches!(
        store.delete(&TaskId::Server(9)),
        Err(StoreError::NotFound(TaskId::Server(9)))
    ));
    assert!(matches!(
        store.toggle_done(&TaskId::Server(9)),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn offline_service_surfaces_remote_error() {
    let api = FakeTaskApi::new();
    api.set_offline(true);
    let mut store = RemoteTaskStore::new(api.clone());

    let err = store
        .create(&NewTask::new("Call mom", at(2024, 3, 1)).unwrap())
        .unwrap_err();
    assert!(matches!(err, StoreError::Remote(RemoteError::Timeout)));
    assert_eq!(err.code(), "remote_timeout");

    let err = store.list(&window_bound(0, at(2024, 3, 1))).unwrap_err();
    assert!(matches!(err, StoreError::Remote(_)));
    assert_eq!(api.calls(), 2);
}
