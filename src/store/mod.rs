//! Persistence seams. The engine never talks to a backend directly; owners
//! hand it a [`TaskStore`] (and optionally a [`LayoutStore`]) and the engine
//! calls through the trait. [`memory::InMemoryStore`] implements both for
//! tests and offline use.

pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::layout::GridRect;
use crate::model::task::Task;

pub use memory::InMemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("store request failed: {0}")]
    Remote(String),
}

/// Fields for a new task. Everything but the text is optional; the store
/// assigns id, timestamps, and a display order at the end of its siblings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// One reorder mutation: where the task goes and under whom. A `None`
/// parent moves the task to the root level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderTaskInput {
    pub task_id: String,
    pub new_display_order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_parent_task_id: Option<String>,
}

/// Task persistence. Mutations return the authoritative task so callers can
/// reconcile optimistic state.
pub trait TaskStore {
    fn create_task(&mut self, input: CreateTaskInput) -> Result<Task, StoreError>;
    fn toggle_task_completion(&mut self, task_id: &str) -> Result<Task, StoreError>;
    fn delete_task(&mut self, task_id: &str) -> Result<(), StoreError>;
    fn reorder_task(&mut self, input: ReorderTaskInput) -> Result<Task, StoreError>;
    /// The full forest, optionally scoped to one widget's tasks.
    fn fetch_task_hierarchy(&mut self, widget_id: Option<&str>) -> Result<Vec<Task>, StoreError>;
}

/// Grid placement persistence, one widget rect at a time.
pub trait LayoutStore {
    fn update_layout(&mut self, widget_id: &str, rect: GridRect) -> Result<(), StoreError>;
}
