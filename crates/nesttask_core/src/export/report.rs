//! Completed-task report formatting and file output.

use crate::model::task::Task;
use chrono::NaiveDateTime;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Report body when nothing in the forest is completed.
pub const EMPTY_REPORT: &str = "No completed tasks in this session.";

const INDENT: &str = "  ";
const FILE_NAME_PREFIX: &str = "todo-session-";
const FILE_NAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Errors from writing an export file.
#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Renders one line per completed task, depth-first pre-order.
///
/// Incomplete tasks are skipped but their descendants are still visited.
/// Lines are joined with `\n` and carry no trailing newline.
pub fn build_report(tasks: &[Task]) -> String {
    fn visit(tasks: &[Task], depth: usize, lines: &mut Vec<String>) {
        for task in tasks {
            if let Some(completed_at) = task.completion.completed_at() {
                let label = if depth == 0 { "Task" } else { "Subtask" };
                lines.push(format!(
                    "{}{label}: {} — Completed: {completed_at}",
                    INDENT.repeat(depth),
                    task.title
                ));
            }
            visit(&task.children, depth + 1, lines);
        }
    }

    let mut lines = Vec::new();
    visit(tasks, 0, &mut lines);
    if lines.is_empty() {
        return EMPTY_REPORT.to_string();
    }
    lines.join("\n")
}

/// File name for an export taken at `now`: `todo-session-YYYY-MM-DD_HH-MM-SS.txt`.
pub fn export_file_name(now: NaiveDateTime) -> String {
    format!(
        "{FILE_NAME_PREFIX}{}.txt",
        now.format(FILE_NAME_TIMESTAMP_FORMAT)
    )
}

/// Writes `report` into `dir` under the export file name for `now`.
///
/// # Errors
/// - `ExportError::Io` when the directory cannot be created or written.
pub fn write_report(dir: &Path, now: NaiveDateTime, report: &str) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(now));
    let io_error = |source: std::io::Error| ExportError::Io {
        path: path.clone(),
        source,
    };

    let result = std::fs::create_dir_all(dir)
        .map_err(io_error)
        .and_then(|()| std::fs::write(&path, report).map_err(io_error));
    match result {
        Ok(()) => {
            info!(
                "event=export_write module=export status=ok bytes={}",
                report.len()
            );
            Ok(path)
        }
        Err(err) => {
            error!("event=export_write module=export status=error error={err}");
            Err(err)
        }
    }
}
