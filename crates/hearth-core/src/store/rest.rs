//! REST client for the hosted document database.
//!
//! Task lists live under `users/{uid}/task-lists` on the store's HTTP API.
//! The bearer token comes from the OS keyring; interactive sign-in happens
//! outside this crate (`hearth auth login` just persists the token).
//!
//! Incoming documents may carry timestamps in any of the shapes described
//! in [`crate::task::due::RawTimestamp`]; a due date that fails to
//! normalize loads as absent rather than failing the whole fetch.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::json;
use url::Url;

use super::{keyring_store, tasks_payload, ListStore};
use crate::error::StoreError;
use crate::task::due::RawTimestamp;
use crate::task::{Priority, Task, TaskList};

const TOKEN_KEY: &str = "store_token";

/// [`ListStore`] backed by the hosted document database.
pub struct RestListStore {
    base: Url,
    user_id: String,
    token: String,
    client: Client,
    runtime: tokio::runtime::Runtime,
}

impl RestListStore {
    /// Build a client using the token stored in the OS keyring.
    pub fn new(base_url: &str, user_id: &str) -> Result<Self, StoreError> {
        let token = keyring_store::get(TOKEN_KEY)
            .map_err(|e| StoreError::Keyring(e.to_string()))?
            .ok_or(StoreError::NotAuthenticated)?;
        Self::with_token(base_url, user_id, &token)
    }

    /// Build a client with an explicit token (tests, one-off scripts).
    pub fn with_token(base_url: &str, user_id: &str, token: &str) -> Result<Self, StoreError> {
        let mut base = Url::parse(base_url)?;
        // Url::join treats a path without a trailing slash as a file.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StoreError::Runtime)?;
        Ok(Self {
            base,
            user_id: user_id.to_string(),
            token: token.to_string(),
            client: Client::new(),
            runtime,
        })
    }

    /// Keyring key under which the store token is persisted.
    pub fn token_key() -> &'static str {
        TOKEN_KEY
    }

    fn lists_url(&self) -> Result<Url, StoreError> {
        let path = format!("users/{}/task-lists", urlencoding::encode(&self.user_id));
        let mut url = self.base.join(&path)?;
        url.query_pairs_mut().append_pair("order_by", "updated_at");
        Ok(url)
    }

    fn list_url(&self, id: &str) -> Result<Url, StoreError> {
        let path = format!(
            "users/{}/task-lists/{}",
            urlencoding::encode(&self.user_id),
            urlencoding::encode(id)
        );
        Ok(self.base.join(&path)?)
    }

    fn error_for(&self, resp: reqwest::Response) -> StoreError {
        let status = resp.status().as_u16();
        let message = self.runtime.block_on(resp.text()).unwrap_or_default();
        StoreError::Api { status, message }
    }
}

impl ListStore for RestListStore {
    type Error = StoreError;

    fn fetch_task_lists(&self) -> Result<Vec<TaskList>, StoreError> {
        let url = self.lists_url()?;
        tracing::debug!(%url, "fetching task lists");
        let resp = self
            .runtime
            .block_on(self.client.get(url).bearer_auth(&self.token).send())?;
        if !resp.status().is_success() {
            return Err(self.error_for(resp));
        }
        let body: serde_json::Value = self.runtime.block_on(resp.json())?;
        let docs = body["documents"]
            .as_array()
            .ok_or(StoreError::MissingField("documents"))?;
        docs.iter().map(parse_list).collect()
    }

    fn update_task_list(
        &self,
        id: &str,
        tasks: &[Task],
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let url = self.list_url(id)?;
        let body = json!({
            "tasks": tasks_payload(tasks),
            "updated_at": updated_at.to_rfc3339(),
        });
        tracing::debug!(list_id = id, tasks = tasks.len(), "updating task list");
        let resp = self.runtime.block_on(
            self.client
                .patch(url)
                .bearer_auth(&self.token)
                .json(&body)
                .send(),
        )?;
        if !resp.status().is_success() {
            return Err(self.error_for(resp));
        }
        Ok(())
    }
}

fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    RawTimestamp::from_json(value).and_then(|t| t.normalize())
}

fn parse_task(doc: &serde_json::Value) -> Result<Task, StoreError> {
    let id = doc["id"].as_str().ok_or(StoreError::MissingField("id"))?;
    let title = doc["title"]
        .as_str()
        .ok_or(StoreError::MissingField("title"))?;
    Ok(Task {
        id: id.to_string(),
        title: title.to_string(),
        completed: doc["completed"].as_bool().unwrap_or(false),
        due_date: parse_timestamp(&doc["due_date"]),
        completed_at: parse_timestamp(&doc["completed_at"]),
        priority: doc["priority"]
            .as_str()
            .map(Priority::from_label)
            .unwrap_or_default(),
        created_at: parse_timestamp(&doc["created_at"]).unwrap_or(DateTime::UNIX_EPOCH),
    })
}

fn parse_list(doc: &serde_json::Value) -> Result<TaskList, StoreError> {
    let id = doc["id"].as_str().ok_or(StoreError::MissingField("id"))?;
    let title = doc["title"]
        .as_str()
        .ok_or(StoreError::MissingField("title"))?;
    let updated_at =
        parse_timestamp(&doc["updated_at"]).ok_or(StoreError::MissingField("updated_at"))?;
    let tasks = doc["tasks"]
        .as_array()
        .map(|arr| arr.iter().map(parse_task).collect::<Result<Vec<_>, _>>())
        .transpose()?
        .unwrap_or_default();
    Ok(TaskList {
        id: id.to_string(),
        title: title.to_string(),
        tasks,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn store_for(server: &mockito::ServerGuard) -> RestListStore {
        RestListStore::with_token(&server.url(), "u1", "test-token").unwrap()
    }

    #[test]
    fn fetch_parses_every_timestamp_shape() {
        let mut server = mockito::Server::new();
        let body = serde_json::json!({
            "documents": [{
                "id": "list-1",
                "title": "Household",
                "updated_at": "2026-08-01T10:00:00Z",
                "tasks": [
                    {"id": "t1", "title": "iso", "completed": false,
                     "due_date": "2026-08-07T09:00:00Z"},
                    {"id": "t2", "title": "epoch", "completed": false,
                     "due_date": 1_770_000_000_000i64},
                    {"id": "t3", "title": "wrapper", "completed": true,
                     "due_date": {"seconds": 1_770_000_000, "nanos": 0},
                     "completed_at": "2026-08-01T10:00:00Z"},
                    {"id": "t4", "title": "garbage", "completed": false,
                     "due_date": "not a date", "priority": "high"}
                ]
            }]
        });
        let mock = server
            .mock("GET", "/users/u1/task-lists")
            .match_query(Matcher::UrlEncoded("order_by".into(), "updated_at".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create();

        let store = store_for(&server);
        let lists = store.fetch_task_lists().unwrap();
        mock.assert();

        assert_eq!(lists.len(), 1);
        let tasks = &lists[0].tasks;
        assert_eq!(tasks.len(), 4);
        assert!(tasks[0].due_date.is_some());
        assert!(tasks[1].due_date.is_some());
        assert!(tasks[2].due_date.is_some());
        assert!(tasks[2].completed && tasks[2].completed_at.is_some());
        // Unparseable due dates load as absent, not as a fetch failure.
        assert!(tasks[3].due_date.is_none());
        assert_eq!(tasks[3].priority, Priority::High);
    }

    #[test]
    fn fetch_surfaces_api_errors() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/users/u1/task-lists")
            .match_query(Matcher::UrlEncoded("order_by".into(), "updated_at".into()))
            .with_status(503)
            .with_body("store unavailable")
            .create();

        let store = store_for(&server);
        match store.fetch_task_lists() {
            Err(StoreError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert!(message.contains("unavailable"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn fetch_rejects_document_without_id() {
        let mut server = mockito::Server::new();
        let body = serde_json::json!({
            "documents": [{"title": "No id", "updated_at": "2026-08-01T10:00:00Z"}]
        });
        let _mock = server
            .mock("GET", "/users/u1/task-lists")
            .match_query(Matcher::UrlEncoded("order_by".into(), "updated_at".into()))
            .with_status(200)
            .with_body(body.to_string())
            .create();

        let store = store_for(&server);
        assert!(matches!(
            store.fetch_task_lists(),
            Err(StoreError::MissingField("id"))
        ));
    }

    #[test]
    fn update_patches_whole_task_array_once() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("PATCH", "/users/u1/task-lists/list-1")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJsonString(r#"{"tasks": [{"id": "t1"}]}"#.to_string()),
                Matcher::Regex("updated_at".to_string()),
            ]))
            .with_status(200)
            .expect(1)
            .create();

        let store = store_for(&server);
        let mut task = Task::new("sweep");
        task.id = "t1".to_string();
        store
            .update_task_list("list-1", &[task], Utc::now())
            .unwrap();
        mock.assert();
    }

    #[test]
    fn update_surfaces_api_errors() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("PATCH", "/users/u1/task-lists/list-1")
            .with_status(403)
            .with_body("forbidden")
            .create();

        let store = store_for(&server);
        let err = store
            .update_task_list("list-1", &[], Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 403, .. }));
    }
}
