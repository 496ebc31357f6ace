//! Durable task tree store.
//!
//! # Responsibility
//! - Persist the whole task forest under one key as JSON.
//! - Absorb storage and decoding failures at the boundary.
//!
//! # Invariants
//! - Only structural fields (`id`, `title`, `deadline`, `children`) are
//!   written; completion lives in `CompletionLedger`.
//! - `load` never fails: absent or malformed data yields an empty forest.
//! - `save` never fails: write errors are logged and dropped.

use crate::model::task::Task;
use crate::repo::kv_repo::KvRepository;
use log::{debug, warn};

/// Storage key holding the serialized forest.
pub const TASK_TREE_KEY: &str = "todo-tasks";

/// Task tree store over any key/value repository.
pub struct TaskTreeStore<R: KvRepository> {
    repo: R,
}

impl<R: KvRepository> TaskTreeStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the persisted forest, or an empty one on any failure.
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.repo.get(TASK_TREE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=tree_load module=store status=ok reason=absent");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=tree_load module=store status=degraded error_code=read_failed error={err}"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                debug!(
                    "event=tree_load module=store status=ok roots={}",
                    tasks.len()
                );
                tasks
            }
            Err(err) => {
                warn!(
                    "event=tree_load module=store status=degraded error_code=malformed_data error={err}"
                );
                Vec::new()
            }
        }
    }

    /// Writes the forest, best effort.
    pub fn save(&self, tasks: &[Task]) {
        let encoded = match serde_json::to_string(tasks) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(
                    "event=tree_save module=store status=error error_code=encode_failed error={err}"
                );
                return;
            }
        };

        if let Err(err) = self.repo.put(TASK_TREE_KEY, &encoded) {
            warn!("event=tree_save module=store status=error error_code=write_failed error={err}");
        }
    }
}
