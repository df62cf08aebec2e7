pub mod auth;
pub mod config;
pub mod task;

use std::path::Path;

use hearth_core::{Config, MemoryListStore, RestListStore, TaskList};

/// Load task lists from a local JSON snapshot into an in-memory store.
pub fn open_file_store(path: &Path) -> Result<MemoryListStore, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let lists: Vec<TaskList> = serde_json::from_str(&content)
        .map_err(|e| format!("cannot parse {}: {e}", path.display()))?;
    Ok(MemoryListStore::new(lists))
}

/// Write an in-memory store's contents back to its JSON snapshot.
pub fn save_file_store(
    path: &Path,
    store: &MemoryListStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string_pretty(&store.lists())?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Build a REST store client from the user configuration.
pub fn open_rest_store() -> Result<RestListStore, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if config.store.user_id.is_empty() {
        return Err(
            "store.user_id is not configured; run `hearth config set store.user_id <id>`".into(),
        );
    }
    Ok(RestListStore::new(
        &config.store.base_url,
        &config.store.user_id,
    )?)
}
