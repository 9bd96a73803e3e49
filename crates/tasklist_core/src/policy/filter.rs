use crate::model::task::Task;

/// Returns the tasks a list shows for the given `show_done` flag.
///
/// Keeps input order. Pending tasks are always kept; done tasks only when
/// `show_done` is set.
pub fn visible_tasks(tasks: &[Task], show_done: bool) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| show_done || !task.is_done())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::visible_tasks;
    use crate::model::task::{Task, TaskId};
    use chrono::{TimeZone, Utc};

    fn task(id: i64, done: bool) -> Task {
        let at = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        Task {
            id: TaskId::Server(id),
            description: format!("task {id}"),
            estimated_at: at,
            done_at: done.then_some(at),
        }
    }

    #[test]
    fn hides_done_tasks_and_keeps_order() {
        let tasks = vec![task(1, false), task(2, true), task(3, false)];

        let ids: Vec<TaskId> = visible_tasks(&tasks, false)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![TaskId::Server(1), TaskId::Server(3)]);
        assert_eq!(visible_tasks(&tasks, true), tasks);
    }

    #[test]
    fn applying_twice_matches_applying_once() {
        let tasks = vec![task(1, true), task(2, false), task(3, true)];
        for show_done in [true, false] {
            let once = visible_tasks(&tasks, show_done);
            assert_eq!(visible_tasks(&once, show_done), once);
        }
    }

    #[test]
    fn single_done_task_visibility_follows_flag() {
        let tasks = vec![task(1, true)];
        assert!(visible_tasks(&tasks, false).is_empty());
        assert_eq!(visible_tasks(&tasks, true).len(), 1);
        assert!(visible_tasks(&[], true).is_empty());
    }
}
