use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use nexa_core::domain::{Design, DesignRequest};

use super::AppState;
use super::error::{ApiResult, parse_json_body};

/// A missing or blank description is not an error; the generator fills in a
/// placeholder.
pub(crate) async fn generate_design(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Design>> {
    let request: DesignRequest = parse_json_body(&body)?;
    let description = request.description.unwrap_or_default();
    let design = state.app.design.generate(&description).await?;
    tracing::debug!(materials = design.materials.len(), "design generated");
    Ok(Json(design))
}
