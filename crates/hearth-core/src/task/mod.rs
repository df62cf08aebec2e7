//! Task and task-list models.
//!
//! Tasks live inside a [`TaskList`] owned by the hosted document store; the
//! engine receives lists by value, computes replacement task arrays, and
//! hands them back to the store. Nothing here persists anything itself.

pub mod auto_complete;
pub mod due;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use due::DueStatus;

/// Task priority. Carried through the engine untouched; classification
/// never consults it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    /// Parse a priority label, defaulting to medium for unknown input.
    pub fn from_label(s: &str) -> Self {
        match s {
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// A single task item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Opaque identifier, unique within the parent list.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Completion flag. Completed tasks are excluded from all temporal
    /// classification.
    #[serde(default)]
    pub completed: bool,
    /// Optional due timestamp. Only the local calendar day matters for
    /// classification; the stored time of day is preserved.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Set exactly when `completed` transitions false to true, cleared on
    /// the reverse transition.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new incomplete task.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Task {
            id: format!("task-{}", uuid::Uuid::new_v4()),
            title: title.into(),
            completed: false,
            due_date: None,
            completed_at: None,
            priority: Priority::Medium,
            created_at: now,
        }
    }

    /// Set the due date (builder style).
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Set the priority (builder style).
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Mark the task completed at `now`.
    ///
    /// Idempotent: re-completing an already-completed task leaves
    /// `completed_at` untouched. Returns whether the task changed.
    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.completed_at = Some(now);
        true
    }

    /// Reopen a completed task, clearing `completed_at`.
    pub fn reopen(&mut self) -> bool {
        if !self.completed {
            return false;
        }
        self.completed = false;
        self.completed_at = None;
        true
    }

    /// Temporal state of this task against `today` (`None` when completed).
    pub fn due_status(&self, today: NaiveDate) -> Option<DueStatus> {
        DueStatus::classify(self.due_date, self.completed, today)
    }
}

/// A named, ordered collection of tasks.
///
/// Task order is insertion/display order and carries no meaning for the
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskList {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Bumped whenever the engine replaces the `tasks` collection.
    pub updated_at: DateTime<Utc>,
}

impl TaskList {
    /// Create an empty list.
    pub fn new(title: impl Into<String>) -> Self {
        TaskList {
            id: format!("list-{}", uuid::Uuid::new_v4()),
            title: title.into(),
            tasks: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Number of incomplete tasks.
    pub fn open_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }
}
