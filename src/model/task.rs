use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task as the persistence service ships it: a node in a rooted forest.
///
/// `sub_tasks` is the authoritative parent/child link; `parent_task_id` is a
/// redundant back-reference that must agree with it wherever both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
    pub display_order: i32,
    /// Direct children, ordered by `display_order`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_tasks: Vec<Task>,
}

impl Task {
    /// Create a root task with default fields and current timestamps.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Task {
        let now = Utc::now();
        Task {
            id: id.into(),
            text: text.into(),
            completed: false,
            category: "general".to_string(),
            widget_id: None,
            created_at: now,
            updated_at: now,
            priority: 0,
            due_date: None,
            description: None,
            parent_task_id: None,
            display_order: 0,
            sub_tasks: Vec::new(),
        }
    }

    /// Number of nodes in this task's subtree, itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .sub_tasks
            .iter()
            .map(Task::subtree_len)
            .sum::<usize>()
    }
}

/// Check that every child's `parent_task_id` back-reference agrees with the
/// tree it actually hangs in. The flattener and resolver trust `sub_tasks`;
/// this is the cheap sanity check for data arriving off the wire.
pub fn parent_links_consistent(roots: &[Task]) -> bool {
    fn check(tasks: &[Task], parent: Option<&str>) -> bool {
        tasks.iter().all(|t| {
            let link_ok = match (&t.parent_task_id, parent) {
                (Some(link), Some(pid)) => link == pid,
                (None, None) => true,
                // A missing back-reference is tolerated; a wrong one is not.
                (None, Some(_)) => true,
                (Some(_), None) => false,
            };
            link_ok && check(&t.sub_tasks, Some(&t.id))
        })
    }
    check(roots, None)
}
