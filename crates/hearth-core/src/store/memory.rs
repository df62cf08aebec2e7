//! In-memory list store for tests and local file-backed runs.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::ListStore;
use crate::task::{Task, TaskList};

/// A [`ListStore`] over a plain vector of lists.
///
/// Used by unit tests and by the CLI's `--file` path, which loads lists
/// from a JSON file into this store and writes the result back afterwards.
pub struct MemoryListStore {
    lists: Mutex<Vec<TaskList>>,
}

impl MemoryListStore {
    pub fn new(lists: Vec<TaskList>) -> Self {
        Self {
            lists: Mutex::new(lists),
        }
    }

    /// Snapshot of the current store contents.
    pub fn lists(&self) -> Vec<TaskList> {
        self.lists
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ListStore for MemoryListStore {
    type Error = String;

    fn fetch_task_lists(&self) -> Result<Vec<TaskList>, Self::Error> {
        self.lists
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| "list store mutex poisoned".to_string())
    }

    fn update_task_list(
        &self,
        id: &str,
        tasks: &[Task],
        updated_at: DateTime<Utc>,
    ) -> Result<(), Self::Error> {
        let mut guard = self
            .lists
            .lock()
            .map_err(|_| "list store mutex poisoned".to_string())?;
        let list = guard
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| format!("unknown task list: {id}"))?;
        list.tasks = tasks.to_vec();
        list.updated_at = updated_at;
        Ok(())
    }
}
