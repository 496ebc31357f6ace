//! Merge of durable tree structure with session completion state.
//!
//! # Invariants
//! - After reconciliation every task's completion equals the ledger entry for
//!   its id, or `Incomplete` when the ledger has none.
//! - Tree structure (ids, titles, deadlines, order) is untouched.

use crate::model::task::{Completion, Task};
use crate::repo::completion_ledger::LedgerSnapshot;

/// Overlays `ledger` onto every task of `tasks`, depth-first.
pub fn reconcile(tasks: &[Task], ledger: &LedgerSnapshot) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| Task {
            id: task.id.clone(),
            title: task.title.clone(),
            deadline: task.deadline,
            completion: Completion::from_option(ledger.get(&task.id).copied()),
            children: reconcile(&task.children, ledger),
        })
        .collect()
}
