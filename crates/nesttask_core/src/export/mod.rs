//! Plain-text export of completed tasks.
//!
//! # Responsibility
//! - Render the completed subset of a reconciled forest as an indented report.
//! - Write the report to a timestamped `.txt` file.
//!
//! # Invariants
//! - Export is read-only: it never writes back to either store.

pub mod report;

pub use report::{build_report, export_file_name, write_report, ExportError, EMPTY_REPORT};
