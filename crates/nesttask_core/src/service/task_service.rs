//! Task list use-case service.
//!
//! # Responsibility
//! - Expose the user-facing actions (add, add subtask, update, delete,
//!   toggle, export) over an in-memory reconciled forest.
//! - Persist the forest after every applied edit and route completion
//!   changes to the ledger.
//!
//! # Invariants
//! - Blank titles are rejected here and never reach the engine.
//! - Unknown ids are silent no-ops: nothing is written, no error is raised.
//! - Deleting a task also erases ledger entries of its whole subtree.
//! - Storage failures never roll back the in-memory forest.

use crate::engine::{
    collect_ids, count_tasks, find_and_delete, find_and_insert_child, find_and_update, find_task,
    insert_root, toggle_completion,
};
use crate::export::{build_report, write_report, ExportError};
use crate::model::task::{
    normalize_title, Completion, Task, TaskId, TaskPatch, TaskValidationError,
};
use crate::model::time::{Clock, Deadline};
use crate::repo::completion_ledger::{CompletionLedger, LedgerSnapshot};
use crate::repo::kv_repo::KvRepository;
use crate::repo::tree_store::TaskTreeStore;
use crate::service::demo::demo_tasks;
use crate::service::reconcile::reconcile;
use chrono::NaiveDateTime;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Errors from task service operations.
#[derive(Debug)]
pub enum TaskServiceError {
    /// User input failed validation (blank title, malformed deadline).
    InvalidInput(TaskValidationError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

/// Task list service facade.
pub struct TaskService<T: KvRepository, L: KvRepository, C: Clock> {
    tree_store: TaskTreeStore<T>,
    ledger: CompletionLedger<L>,
    clock: C,
    tasks: Vec<Task>,
}

impl<T: KvRepository, L: KvRepository, C: Clock> TaskService<T, L, C> {
    /// Loads the persisted forest and overlays the completion ledger.
    pub fn open(tree_store: TaskTreeStore<T>, ledger: CompletionLedger<L>, clock: C) -> Self {
        let tasks = reconcile(&tree_store.load(), &ledger.get_all());
        info!(
            "event=session_open module=service status=ok tasks={}",
            count_tasks(&tasks)
        );
        Self {
            tree_store,
            ledger,
            clock,
            tasks,
        }
    }

    /// Current reconciled forest.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Current time as seen by the injected clock.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        find_task(&self.tasks, id)
    }

    /// Re-reads both stores, discarding in-memory state.
    pub fn reload(&mut self) {
        self.tasks = reconcile(&self.tree_store.load(), &self.ledger.get_all());
    }

    /// Appends a new top-level task and returns its id.
    pub fn add_task(&mut self, title: &str) -> Result<TaskId, TaskServiceError> {
        let task = Task::new(normalize_title(title)?);
        let id = task.id.clone();
        let next = insert_root(&self.tasks, task);
        self.commit(next);
        info!("event=task_add module=service status=ok task_id={id} depth=0");
        Ok(id)
    }

    /// Appends a new child under `parent_id`.
    ///
    /// Returns `Ok(None)` when the parent does not exist; nothing is written.
    pub fn add_subtask(
        &mut self,
        parent_id: &TaskId,
        title: &str,
    ) -> Result<Option<TaskId>, TaskServiceError> {
        let title = normalize_title(title)?;
        if find_task(&self.tasks, parent_id).is_none() {
            debug!("event=task_add module=service status=noop parent_id={parent_id}");
            return Ok(None);
        }

        let task = Task::new(title);
        let id = task.id.clone();
        let next = find_and_insert_child(&self.tasks, parent_id, task);
        self.commit(next);
        info!("event=task_add module=service status=ok task_id={id} parent_id={parent_id}");
        Ok(Some(id))
    }

    /// Merges `patch` into task `id`. Returns whether a task was updated.
    pub fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> Result<bool, TaskServiceError> {
        let mut patch = patch;
        if let Some(title) = patch.title.take() {
            patch.title = Some(normalize_title(&title)?);
        }
        Ok(self.apply_patch(id, &patch))
    }

    /// Sets or clears the deadline of task `id`.
    pub fn set_deadline(&mut self, id: &TaskId, deadline: Option<Deadline>) -> bool {
        self.apply_patch(id, &TaskPatch::deadline(deadline))
    }

    /// Deletes task `id` with its subtree and their ledger entries.
    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        let Some(target) = find_task(&self.tasks, id) else {
            debug!("event=task_delete module=service status=noop task_id={id}");
            return false;
        };

        let removed_ids = collect_ids(std::slice::from_ref(target));
        let next = find_and_delete(&self.tasks, id);
        self.ledger.remove_many(&removed_ids);
        self.commit(next);
        info!(
            "event=task_delete module=service status=ok task_id={id} removed={}",
            removed_ids.len()
        );
        true
    }

    /// Flips completion of task `id` and records it in the ledger.
    ///
    /// Returns the new completion state, or `None` when the id is unknown.
    pub fn toggle_complete(&mut self, id: &TaskId) -> Option<Completion> {
        let clock = &self.clock;
        let (next, effect) = toggle_completion(&self.tasks, id, || clock.now());
        let Some(effect) = effect else {
            debug!("event=task_toggle module=service status=noop task_id={id}");
            return None;
        };

        self.ledger.apply(&effect);
        self.commit(next);
        let completion = self.find(id).map(|task| task.completion);
        info!(
            "event=task_toggle module=service status=ok task_id={id} done={}",
            completion.is_some_and(|completion| completion.is_done())
        );
        completion
    }

    /// Renders the completed-task report. Read-only.
    pub fn export_session(&self) -> String {
        build_report(&self.tasks)
    }

    /// Writes the completed-task report into `dir` and returns the file path.
    pub fn write_export(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        write_report(dir, self.clock.now(), &self.export_session())
    }

    /// Replaces an empty forest with the demo forest. Returns whether it did.
    pub fn seed_demo(&mut self) -> bool {
        if !self.tasks.is_empty() {
            debug!("event=demo_seed module=service status=noop reason=not_empty");
            return false;
        }
        let next = reconcile(&demo_tasks(self.clock.now()), &self.ledger.get_all());
        self.commit(next);
        info!(
            "event=demo_seed module=service status=ok tasks={}",
            count_tasks(&self.tasks)
        );
        true
    }

    /// Clears every completion, as happens when the session ends.
    pub fn end_session(&mut self) {
        self.ledger.clear();
        self.tasks = reconcile(&self.tasks, &LedgerSnapshot::new());
        info!("event=session_end module=service status=ok");
    }

    fn apply_patch(&mut self, id: &TaskId, patch: &TaskPatch) -> bool {
        if find_task(&self.tasks, id).is_none() {
            debug!("event=task_update module=service status=noop task_id={id}");
            return false;
        }
        let next = find_and_update(&self.tasks, id, patch);
        self.commit(next);
        info!(
            "event=task_update module=service status=ok task_id={id} title={} deadline={}",
            patch.title.is_some(),
            patch.deadline.is_some()
        );
        true
    }

    fn commit(&mut self, next: Vec<Task>) {
        self.tree_store.save(&next);
        self.tasks = next;
    }
}
