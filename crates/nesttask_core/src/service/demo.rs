//! Starter forest offered to first-time users.

use crate::model::task::Task;
use crate::model::time::Deadline;
use chrono::{Duration, NaiveDateTime};

/// Builds the demo forest with deadlines relative to `now`.
///
/// Ids are short hierarchical strings (`1`, `1-2`, `1-2-1`) and unique across
/// the forest.
pub fn demo_tasks(now: NaiveDateTime) -> Vec<Task> {
    let in_days = |days: i64| Deadline::from_datetime(now + Duration::days(days));

    vec![
        Task::with_id("1", "Plan weekend trip")
            .with_deadline(in_days(2))
            .with_children(vec![
                Task::with_id("1-1", "Book hotel"),
                Task::with_id("1-2", "Pack luggage").with_children(vec![
                    Task::with_id("1-2-1", "Pack clothes"),
                    Task::with_id("1-2-2", "Pack toiletries"),
                ]),
            ]),
        Task::with_id("2", "Complete React project")
            .with_deadline(in_days(5))
            .with_children(vec![
                Task::with_id("2-1", "Set up components"),
                Task::with_id("2-2", "Add styling"),
                Task::with_id("2-3", "Write tests"),
            ]),
        Task::with_id("3", "Learn TypeScript"),
    ]
}
