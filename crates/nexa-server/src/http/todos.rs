use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use nexa_core::domain::{NewTodo, Todo, TodoId, TodoPatch};
use serde_json::{Value, json};

use super::AppState;
use super::error::{ApiResult, parse_json_body};

pub(crate) async fn list_todos(State(state): State<AppState>) -> ApiResult<Json<Vec<Todo>>> {
    Ok(Json(state.app.todos.list().await?))
}

pub(crate) async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let input: NewTodo = parse_json_body(&body)?;
    let todo = state.app.todos.create(input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub(crate) async fn get_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Todo>> {
    let id = TodoId::parse(&raw_id)?;
    Ok(Json(state.app.todos.get(id).await?))
}

pub(crate) async fn patch_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Todo>> {
    let id = TodoId::parse(&raw_id)?;
    let patch: TodoPatch = parse_json_body(&body)?;
    Ok(Json(state.app.todos.patch(id, patch).await?))
}

pub(crate) async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = TodoId::parse(&raw_id)?;
    state.app.todos.delete(id).await?;
    Ok(Json(json!({ "ok": true })))
}
