//! Task domain model.
//!
//! # Responsibility
//! - Define the nested `Task` node shared by engine, storage and export.
//! - Provide field patch and title normalization helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is trimmed and non-empty once accepted by the service layer.
//! - `children` keeps insertion order and is never resorted.
//! - Completion is session state: it is not part of the serialized shape.

use crate::model::time::{CompletedAt, Deadline};
use chrono::NaiveDateTime;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque task identifier.
///
/// Generated ids are UUID v4 strings; imported or demo data may use any
/// non-empty string (`"1-2-1"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a fresh globally unique identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Completion state of one task.
///
/// Presence of a timestamp is the only signal of "done"; there is no separate
/// flag that could disagree with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    #[default]
    Incomplete,
    Completed(CompletedAt),
}

impl Completion {
    pub fn from_option(value: Option<CompletedAt>) -> Self {
        match value {
            Some(completed_at) => Self::Completed(completed_at),
            None => Self::Incomplete,
        }
    }

    pub fn completed_at(&self) -> Option<CompletedAt> {
        match self {
            Self::Completed(completed_at) => Some(*completed_at),
            Self::Incomplete => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// One node of the task forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Unreadable stored deadlines decode as `None`; the node is kept.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_deadline_lenient"
    )]
    pub deadline: Option<Deadline>,
    /// Overlaid from the completion ledger; never persisted with the tree.
    #[serde(skip)]
    pub completion: Completion,
    #[serde(default)]
    pub children: Vec<Task>,
}

impl Task {
    /// Creates a leaf task with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(TaskId::generate(), title)
    }

    /// Creates a leaf task with a caller-provided id.
    ///
    /// Used by demo/import paths where identity already exists. The caller is
    /// responsible for forest-wide uniqueness.
    pub fn with_id(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            deadline: None,
            completion: Completion::Incomplete,
            children: Vec::new(),
        }
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }

    pub fn with_children(mut self, children: Vec<Task>) -> Self {
        self.children = children;
        self
    }

    pub fn is_done(&self) -> bool {
        self.completion.is_done()
    }

    /// Incomplete with a deadline strictly before `now`.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        match self.deadline {
            Some(deadline) => !self.is_done() && deadline.as_datetime() < now,
            None => false,
        }
    }

    /// Shallow-merges `patch` into this task. Unset patch fields are kept.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
    }
}

fn deserialize_deadline_lenient<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Deadline>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    match raw {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => match Deadline::parse(&text) {
            Ok(deadline) => Ok(Some(deadline)),
            Err(err) => {
                warn!("event=deadline_decode module=model status=degraded error={err}");
                Ok(None)
            }
        },
        Some(_) => {
            warn!("event=deadline_decode module=model status=degraded error_code=not_a_string");
            Ok(None)
        }
    }
}

/// Field-level edit for one task.
///
/// `deadline: Some(None)` clears the deadline, `deadline: None` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub deadline: Option<Option<Deadline>>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            deadline: None,
        }
    }

    pub fn deadline(deadline: Option<Deadline>) -> Self {
        Self {
            title: None,
            deadline: Some(deadline),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.deadline.is_none()
    }
}

/// Input validation failures for task fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is blank after trim.
    BlankTitle,
    /// Deadline text is not `YYYY-MM-DDTHH:MM`.
    InvalidDeadline(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::InvalidDeadline(value) => {
                write!(f, "invalid deadline `{value}`; expected YYYY-MM-DDTHH:MM")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Trims a user-supplied title and rejects blank input.
pub fn normalize_title(value: &str) -> Result<String, TaskValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::BlankTitle);
    }
    Ok(trimmed.to_string())
}
