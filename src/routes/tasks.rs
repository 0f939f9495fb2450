use crate::{
    auth::AuthenticatedUser,
    error::{AppError, TASK_NOT_FOUND},
    models::{MessageResponse, Task, TaskInput, TaskResponse},
};
use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;

/// Creates a task owned by the caller.
///
/// ## Responses:
/// - `201 Created`: `{taskId, title, description, userId}`.
/// - `400 Bad Request`: body present but not a JSON object.
/// - `401 Unauthorized`: missing or invalid token.
/// - `500 Internal Server Error`: storage failure.
pub async fn create_task(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let TaskInput { title, description } = TaskInput::from_body(&body)?;

    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (title, description, userId) VALUES (?, ?, ?)
         RETURNING id, title, description, userId",
    )
    .bind(title)
    .bind(description)
    .bind(user.id())
    .fetch_one(&**pool)
    .await?;

    log::info!("user {} created task {}", user.id(), task.id);
    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}

/// Lists the caller's own tasks.
pub async fn list_tasks(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT id, title, description, userId FROM tasks WHERE userId = ? ORDER BY id",
    )
    .bind(user.id())
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Lists every task regardless of owner. Mounted behind `RequireRole(Admin)`.
pub async fn list_all_tasks(pool: web::Data<SqlitePool>) -> Result<impl Responder, AppError> {
    let tasks =
        sqlx::query_as::<_, Task>("SELECT id, title, description, userId FROM tasks ORDER BY id")
            .fetch_all(&**pool)
            .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Fetches one task.
///
/// The lookup filters on id and owner together, so a task belonging to someone
/// else is reported exactly like a missing one: `404 Task not found`.
pub async fn get_task(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "SELECT id, title, description, userId FROM tasks WHERE id = ? AND userId = ?",
    )
    .bind(task_id.into_inner())
    .bind(user.id())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Replaces title and description of an owned task.
///
/// The response is the row as persisted by this statement, in the
/// `{taskId, title, description, userId}` shape.
pub async fn update_task(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let TaskInput { title, description } = TaskInput::from_body(&body)?;

    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks SET title = ?, description = ? WHERE id = ? AND userId = ?
         RETURNING id, title, description, userId",
    )
    .bind(title)
    .bind(description)
    .bind(task_id.into_inner())
    .bind(user.id())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;

    log::info!("user {} updated task {}", user.id(), task.id);
    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND userId = ?")
        .bind(task_id)
        .bind(user.id())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(TASK_NOT_FOUND.into()));
    }

    log::info!("user {} deleted task {}", user.id(), task_id);
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Task deleted successfully".into(),
    }))
}
