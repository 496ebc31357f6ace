//! Persistence layer: key/value repository plus the two stores built on it.
//!
//! # Responsibility
//! - Define the storage contract shared by both stores.
//! - Keep tree structure (durable) and completion (session) in separate
//!   stores that never write each other's key.
//!
//! # Invariants
//! - Store-level reads and writes fail soft; only repository construction
//!   reports errors to callers.

pub mod completion_ledger;
pub mod kv_repo;
pub mod tree_store;
