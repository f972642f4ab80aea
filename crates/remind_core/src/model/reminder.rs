use serde::{Deserialize, Serialize};

/// A one-shot notification request. Ephemeral: it lives in the notification
/// spool, never in the task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRequest {
    pub task_id: String,
    pub fire_at: String,
    pub message: String,
}
