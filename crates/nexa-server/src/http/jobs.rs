//! Day board and job completion endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use nexa_core::app::{CompletionView, FinalizeOutcome, JobView, MaterialsView};
use nexa_core::domain::{BuildKind, ChecklistUpdate, DesignChange, JobId, NexaError};
use serde::Deserialize;

use super::AppState;
use super::error::{ApiResult, parse_json_body};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PhotosBody {
    #[serde(default)]
    count: Option<u32>,
}

/// Either `{designChange: bool}` or `{kind: "built" | "redlines" | "bluelines"}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DesignChangeBody {
    #[serde(default)]
    design_change: Option<bool>,
    #[serde(default)]
    kind: Option<String>,
}

impl DesignChangeBody {
    fn into_change(self) -> Result<DesignChange, NexaError> {
        match (self.design_change, self.kind) {
            (Some(changed), None) => Ok(DesignChange::from(changed)),
            (None, Some(kind)) => Ok(kind.parse::<BuildKind>()?.design_change()),
            (Some(_), Some(_)) => Err(NexaError::Validation(
                "send either designChange or kind, not both".to_string(),
            )),
            (None, None) => Err(NexaError::Validation(
                "designChange or kind is required".to_string(),
            )),
        }
    }
}

/// `hazardNotes` missing, null or blank clears the notes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TailboardBody {
    #[serde(default)]
    hazard_notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FinalizeBody {
    #[serde(default)]
    stage_next: bool,
}

pub(crate) async fn list_jobs(State(state): State<AppState>) -> Json<Vec<JobView>> {
    Json(state.app.workflow.jobs().await)
}

pub(crate) async fn get_job(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<JobView>> {
    let id = JobId::parse(&raw_id)?;
    Ok(Json(state.app.workflow.job(id).await?))
}

pub(crate) async fn send_pin(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<JobView>> {
    let id = JobId::parse(&raw_id)?;
    Ok(Json(state.app.workflow.send_pin(id).await?))
}

pub(crate) async fn open_tailboard(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<JobView>> {
    let id = JobId::parse(&raw_id)?;
    Ok(Json(state.app.workflow.open_tailboard(id).await?))
}

pub(crate) async fn update_tailboard(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<JobView>> {
    let id = JobId::parse(&raw_id)?;
    let body: TailboardBody = parse_json_body(&body)?;
    Ok(Json(
        state
            .app
            .workflow
            .set_hazard_notes(id, body.hazard_notes.as_deref())
            .await?,
    ))
}

pub(crate) async fn materials(State(state): State<AppState>) -> Json<MaterialsView> {
    Json(state.app.workflow.materials().await)
}

pub(crate) async fn stage_materials(State(state): State<AppState>) -> Json<MaterialsView> {
    Json(state.app.workflow.stage_materials().await)
}

pub(crate) async fn get_completion(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<CompletionView>> {
    let id = JobId::parse(&raw_id)?;
    Ok(Json(state.app.workflow.completion(id).await?))
}

pub(crate) async fn open_completion(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<CompletionView>> {
    let id = JobId::parse(&raw_id)?;
    Ok(Json(state.app.workflow.open(id).await?))
}

pub(crate) async fn update_checklist(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<CompletionView>> {
    let id = JobId::parse(&raw_id)?;
    let update: ChecklistUpdate = parse_json_body(&body)?;
    Ok(Json(state.app.workflow.update_checklist(id, update).await?))
}

pub(crate) async fn upload_photos(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<CompletionView>> {
    let id = JobId::parse(&raw_id)?;
    let body: PhotosBody = parse_json_body(&body)?;
    let count = body
        .count
        .ok_or_else(|| NexaError::Validation("count is required".to_string()))?;
    Ok(Json(state.app.workflow.upload_photos(id, count).await?))
}

pub(crate) async fn declare_design_change(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<CompletionView>> {
    let id = JobId::parse(&raw_id)?;
    let change = parse_json_body::<DesignChangeBody>(&body)?.into_change()?;
    Ok(Json(
        state.app.workflow.declare_design_change(id, change).await?,
    ))
}

pub(crate) async fn analyze(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<(StatusCode, Json<CompletionView>)> {
    let id = JobId::parse(&raw_id)?;
    let view = state.app.workflow.analyze(id).await?;
    Ok((StatusCode::ACCEPTED, Json(view)))
}

pub(crate) async fn finalize(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<FinalizeOutcome>> {
    let id = JobId::parse(&raw_id)?;
    let body: FinalizeBody = parse_json_body(&body)?;
    Ok(Json(state.app.workflow.finalize(id, body.stage_next).await?))
}
