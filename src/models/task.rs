use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// Body accepted by task creation and update.
///
/// Neither field is required; an absent value is stored as `NULL`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TaskInput {
    /// Parses a raw request body. The content type is not consulted, and an
    /// empty or whitespace-only body yields an input with both fields unset.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Json deserialize error: {}", e)))
    }
}

/// A row of the `tasks` table, as returned by the read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Owner of the task; references `users.id`.
    #[sqlx(rename = "userId")]
    pub user_id: i64,
}

/// Shape returned by create and update: `{taskId, title, description, userId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub task_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub user_id: i64,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            task_id: task.id,
            title: task.title,
            description: task.description,
            user_id: task.user_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
