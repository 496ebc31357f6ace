//! Pure tree mutation engine.
//!
//! # Responsibility
//! - Locate tasks by id anywhere in the forest.
//! - Produce new forests for update, insert, delete and toggle edits.
//!
//! # Invariants
//! - Inputs are never mutated; every edit returns a fresh `Vec<Task>`.
//! - All lookups resolve the first depth-first pre-order match.
//! - An absent id yields a forest equal by value to the input.

pub mod tree_ops;

pub use tree_ops::{
    collect_ids, count_tasks, find_and_delete, find_and_insert_child, find_and_update, find_task,
    insert_root, toggle_completion, LedgerEffect,
};
