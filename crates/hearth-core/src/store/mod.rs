//! Pluggable task-list stores.
//!
//! The engine never talks to persistence directly; it goes through
//! [`ListStore`], which exposes exactly the two operations the sweep and
//! report paths need: fetch every list owned by the current principal, and
//! replace one list's task collection.

pub mod memory;
pub mod rest;

pub use memory::MemoryListStore;
pub use rest::RestListStore;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::task::{Priority, Task, TaskList};

/// Store collaborator consumed by the engine.
///
/// Implementations are free to be remote or in-memory; the engine only
/// requires that errors render as display strings for its per-scope error
/// reporting.
pub trait ListStore {
    type Error: std::fmt::Display;

    /// All task lists owned by the current principal, most recently
    /// updated first where the backend supports ordering.
    fn fetch_task_lists(&self) -> Result<Vec<TaskList>, Self::Error>;

    /// Replace one list's `tasks` collection and bump its `updated_at`.
    fn update_task_list(
        &self,
        id: &str,
        tasks: &[Task],
        updated_at: DateTime<Utc>,
    ) -> Result<(), Self::Error>;
}

/// Wire shape for a task inside an update payload.
///
/// The store rejects explicit `undefined`-style values, so `due_date` is
/// omitted entirely when absent, while `completed_at` is sent as an
/// explicit `null` for incomplete tasks.
#[derive(Debug, Clone, Serialize)]
pub struct TaskPayload {
    pub id: String,
    pub title: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub completed_at: Option<String>,
    pub priority: Priority,
    pub created_at: String,
}

impl From<&Task> for TaskPayload {
    fn from(task: &Task) -> Self {
        TaskPayload {
            id: task.id.clone(),
            title: task.title.clone(),
            completed: task.completed,
            due_date: task.due_date.map(|d| d.to_rfc3339()),
            completed_at: task.completed_at.map(|d| d.to_rfc3339()),
            priority: task.priority,
            created_at: task.created_at.to_rfc3339(),
        }
    }
}

/// Convert a task slice into its wire representation.
pub fn tasks_payload(tasks: &[Task]) -> Vec<TaskPayload> {
    tasks.iter().map(TaskPayload::from).collect()
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "hearth";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
