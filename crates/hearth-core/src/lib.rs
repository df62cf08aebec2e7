//! # Hearth Core Library
//!
//! Core business logic for Hearth, a personal/family productivity hub.
//! The interesting part is the due-date engine: temporal classification of
//! tasks (overdue / due today / due soon / upcoming) and the idempotent
//! auto-completion sweep that marks tasks due today as done across every
//! task list the principal owns.
//!
//! ## Architecture
//!
//! - **Task model**: `Task` / `TaskList` plus the completion transitions
//!   that keep `completed_at` consistent
//! - **Due engine**: timestamp normalization over the store's accepted
//!   wire shapes, pure calendar-day predicates, and the batch sweep
//! - **Store**: the `ListStore` collaborator trait with a REST-backed
//!   client for the hosted document database and an in-memory store
//! - **Storage**: TOML-based configuration under `~/.config/hearth/`
//!
//! ## Key Components
//!
//! - [`AutoCompleteEngine`]: due-today sweep and read-only reports
//! - [`DueStatus`]: ordered temporal classification cascade
//! - [`ListStore`]: persistence collaborator consumed by the engine
//! - [`Config`]: application configuration management

pub mod error;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{ConfigError, CoreError, StoreError};
pub use storage::Config;
pub use store::{ListStore, MemoryListStore, RestListStore};
pub use task::auto_complete::{AutoCompleteEngine, AutoCompleteSummary, DueBreakdown, DueTodayReport};
pub use task::due::{DueStatus, RawTimestamp};
pub use task::{Priority, Task, TaskList};
