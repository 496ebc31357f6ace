//! Core domain logic for nesttask.
//! This crate is the single source of truth for task tree invariants.

pub mod config;
pub mod db;
pub mod engine;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{default_data_dir, AppPaths, ConfigError};
pub use engine::LedgerEffect;
pub use export::{build_report, export_file_name, ExportError, EMPTY_REPORT};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{normalize_title, Completion, Task, TaskId, TaskPatch, TaskValidationError};
pub use model::time::{Clock, CompletedAt, Deadline, FixedClock, SystemClock};
pub use repo::completion_ledger::{CompletionLedger, LedgerSnapshot, COMPLETION_KEY};
pub use repo::kv_repo::{KvRepoError, KvRepoResult, KvRepository, SqliteKvRepository};
pub use repo::tree_store::{TaskTreeStore, TASK_TREE_KEY};
pub use service::reconcile::reconcile;
pub use service::task_service::{TaskService, TaskServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
