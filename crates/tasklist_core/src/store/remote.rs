//! Remote task store.
//!
//! The server is the source of truth. Mutations are plain round-trips and
//! never patch a client-side copy; callers re-list to observe the result.

use super::http::TaskApi;
use super::{ensure_valid, StoreResult, TaskStore};
use crate::model::task::{NewTask, Task, TaskId};
use crate::policy::window::WindowBound;
use log::{info, warn};

pub struct RemoteTaskStore<A: TaskApi> {
    api: A,
}

impl<A: TaskApi> RemoteTaskStore<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

impl<A: TaskApi> TaskStore for RemoteTaskStore<A> {
    type Window = WindowBound;

    fn kind(&self) -> &'static str {
        "remote"
    }

    fn list(&self, window: &WindowBound) -> StoreResult<Vec<Task>> {
        let tasks = self.api.fetch_tasks(*window).map_err(|err| {
            warn!(
                "event=remote_list module=store status=error error_code={} bound={}",
                err.code(),
                window.as_query_value()
            );
            err
        })?;
        info!(
            "event=remote_list module=store status=ok task_count={} bound={}",
            tasks.len(),
            window.as_query_value()
        );
        Ok(tasks)
    }

    fn create(&mut self, new_task: &NewTask) -> StoreResult<Task> {
        ensure_valid(new_task)?;
        let task = self.api.post_task(new_task)?;
        info!("event=remote_create module=store status=ok task_id={}", task.id);
        Ok(task)
    }

    fn toggle_done(&mut self, id: &TaskId) -> StoreResult<()> {
        self.api.put_toggle(id)?;
        info!("event=remote_toggle module=store status=ok task_id={id}");
        Ok(())
    }

    fn delete(&mut self, id: &TaskId) -> StoreResult<()> {
        self.api.delete_task(id)?;
        info!("event=remote_delete module=store status=ok task_id={id}");
        Ok(())
    }
}
