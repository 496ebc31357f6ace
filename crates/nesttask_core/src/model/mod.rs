//! Domain model for the nested task list.
//!
//! # Responsibility
//! - Define the canonical task tree node and its field value types.
//! - Keep completion state explicit instead of a nullable timestamp.
//!
//! # Invariants
//! - Every task is identified by a `TaskId` unique across the whole forest.
//! - Completion is either `Incomplete` or `Completed(CompletedAt)`, never both.
//!
//! # See also
//! - `crate::engine` for tree mutations over this model.

pub mod task;
pub mod time;
