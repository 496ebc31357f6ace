//! Recursive find/rebuild operations over the task forest.
//!
//! Edits rebuild only the path from the root to the matched node; untouched
//! sibling subtrees are cloned as-is.

use crate::model::task::{Completion, Task, TaskId, TaskPatch};
use crate::model::time::CompletedAt;
use chrono::NaiveDateTime;

/// Completion ledger write requested by `toggle_completion`.
///
/// Kept outside the engine so tree edits stay free of storage concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEffect {
    /// Store `completed_at` for `id`.
    Record {
        id: TaskId,
        completed_at: CompletedAt,
    },
    /// Drop any stored timestamp for `id`.
    Erase { id: TaskId },
}

impl LedgerEffect {
    pub fn id(&self) -> &TaskId {
        match self {
            Self::Record { id, .. } | Self::Erase { id } => id,
        }
    }
}

// ── Find operations ─────────────────────────────────────────────────

/// Finds the first task with `id` in depth-first pre-order.
pub fn find_task<'a>(tasks: &'a [Task], id: &TaskId) -> Option<&'a Task> {
    for task in tasks {
        if &task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task(&task.children, id) {
            return Some(found);
        }
    }
    None
}

// ── Edit operations ─────────────────────────────────────────────────

/// Returns a forest where the first task matching `id` has `patch` merged in.
pub fn find_and_update(tasks: &[Task], id: &TaskId, patch: &TaskPatch) -> Vec<Task> {
    rebuild_first(tasks, id, &mut |task| task.apply_patch(patch)).unwrap_or_else(|| tasks.to_vec())
}

/// Appends `child` to the children of the first task matching `parent_id`.
///
/// When the parent is absent the child is dropped and the forest is returned
/// unchanged.
pub fn find_and_insert_child(tasks: &[Task], parent_id: &TaskId, child: Task) -> Vec<Task> {
    let mut pending = Some(child);
    rebuild_first(tasks, parent_id, &mut |parent| {
        if let Some(child) = pending.take() {
            parent.children.push(child);
        }
    })
    .unwrap_or_else(|| tasks.to_vec())
}

/// Appends `task` as the last top-level task.
pub fn insert_root(tasks: &[Task], task: Task) -> Vec<Task> {
    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.extend_from_slice(tasks);
    next.push(task);
    next
}

/// Removes the first task matching `id` together with its whole subtree.
pub fn find_and_delete(tasks: &[Task], id: &TaskId) -> Vec<Task> {
    delete_first(tasks, id).unwrap_or_else(|| tasks.to_vec())
}

/// Flips completion of the first task matching `id`.
///
/// `now` is only invoked when the task moves to completed. The returned
/// effect must be applied to the completion ledger by the caller; it is
/// `None` when no task matches.
pub fn toggle_completion(
    tasks: &[Task],
    id: &TaskId,
    now: impl FnOnce() -> NaiveDateTime,
) -> (Vec<Task>, Option<LedgerEffect>) {
    let mut now = Some(now);
    let mut effect = None;
    let rebuilt = rebuild_first(tasks, id, &mut |task| {
        task.completion = match task.completion {
            Completion::Completed(_) => {
                effect = Some(LedgerEffect::Erase {
                    id: task.id.clone(),
                });
                Completion::Incomplete
            }
            Completion::Incomplete => {
                let stamp = now.take().map(|now| CompletedAt::from_datetime(now()));
                match stamp {
                    Some(completed_at) => {
                        effect = Some(LedgerEffect::Record {
                            id: task.id.clone(),
                            completed_at,
                        });
                        Completion::Completed(completed_at)
                    }
                    None => Completion::Incomplete,
                }
            }
        };
    });

    match rebuilt {
        Some(tasks) => (tasks, effect),
        None => (tasks.to_vec(), None),
    }
}

// ── Collection operations ───────────────────────────────────────────

/// Collects ids of every task in the forest, pre-order.
pub fn collect_ids(tasks: &[Task]) -> Vec<TaskId> {
    fn collect(tasks: &[Task], ids: &mut Vec<TaskId>) {
        for task in tasks {
            ids.push(task.id.clone());
            collect(&task.children, ids);
        }
    }

    let mut ids = Vec::new();
    collect(tasks, &mut ids);
    ids
}

/// Counts every task in the forest, including nested ones.
pub fn count_tasks(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .map(|task| 1 + count_tasks(&task.children))
        .sum()
}

// ── Path rebuilding ─────────────────────────────────────────────────

/// Rebuilds the path to the first pre-order match and lets `edit` mutate the
/// fresh copy of the matched node. Returns `None` when nothing matched.
fn rebuild_first(
    tasks: &[Task],
    id: &TaskId,
    edit: &mut dyn FnMut(&mut Task),
) -> Option<Vec<Task>> {
    for (index, task) in tasks.iter().enumerate() {
        if &task.id == id {
            let mut next = tasks.to_vec();
            edit(&mut next[index]);
            return Some(next);
        }
        if let Some(children) = rebuild_first(&task.children, id, edit) {
            let mut next = tasks.to_vec();
            next[index].children = children;
            return Some(next);
        }
    }
    None
}

fn delete_first(tasks: &[Task], id: &TaskId) -> Option<Vec<Task>> {
    for (index, task) in tasks.iter().enumerate() {
        if &task.id == id {
            let mut next = tasks.to_vec();
            next.remove(index);
            return Some(next);
        }
        if let Some(children) = delete_first(&task.children, id) {
            let mut next = tasks.to_vec();
            next[index].children = children;
            return Some(next);
        }
    }
    None
}
