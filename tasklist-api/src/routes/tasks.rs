/// Task list endpoints
///
/// Every handler is owner-scoped: the [`CurrentUser`] extractor resolves the
/// caller once and each store call filters by that ID, so a task is never
/// visible or mutable from another user's requests.
///
/// # Endpoints
///
/// ```text
/// GET    /list              -> [Task]
/// POST   /list/add          {"task": "...", "status"?: bool} -> Task
/// DELETE /list/delete/:id   -> [Task] (remaining)
/// PUT    /list/edit/:id     {"task": "..."} -> Task
/// PUT    /list/done/:id     -> Task
/// ```
///
/// A task is serialized as `{"id": 1, "task": "buy milk", "status": false}`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::CurrentUser,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use tasklist_shared::{
    models::task::{CreateTask, Task, UpdateTask},
    store::TaskStore,
};
use tracing::{debug, info};

/// Lists the caller's tasks in insertion order
///
/// Returns `[]` when the caller has no tasks.
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.store.list_tasks(owner).await?;
    Ok(Json(tasks))
}

/// Adds a task; `status` defaults to false
pub async fn add_task(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    body: Result<Json<CreateTask>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(data) = body?;

    let task = state.store.add_task(owner, data).await?;

    info!(user_id = %owner, task_id = task.id, "Task created");
    Ok(Json(task))
}

/// Deletes a task and returns the caller's remaining tasks
///
/// An ID the caller does not own removes nothing; the response is still 200
/// with the unchanged list.
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Path(id) = id?;

    let removed = state.store.delete_task(owner, id).await?;
    if removed {
        info!(user_id = %owner, task_id = id, "Task deleted");
    } else {
        debug!(user_id = %owner, task_id = id, "Delete matched no owned task");
    }

    let remaining = state.store.list_tasks(owner).await?;
    Ok(Json(remaining))
}

/// Replaces a task's text
///
/// # Errors
///
/// 404 if the caller owns no task with this ID.
pub async fn edit_task(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTask>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;
    let Json(data) = body?;

    state
        .store
        .edit_task(owner, id, data)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))
}

/// Flips a task's completion flag
///
/// The flip is a single statement, so concurrent toggles never lose an update.
///
/// # Errors
///
/// 404 if the caller owns no task with this ID.
pub async fn toggle_task(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;

    state
        .store
        .toggle_task(owner, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))
}
