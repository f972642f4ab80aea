use serde::{Deserialize, Serialize};

/// A reminder task as held in memory and persisted in the store.
///
/// `id` is stable for the task's lifetime and doubles as the notification
/// key, so deleting a task can deterministically cancel its reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(rename = "dueDate")]
    pub due_at: String,
}
