use axum::Json;
use axum::extract::State;
use nexa_core::impls::ActivityEntry;

use super::AppState;

/// Newest first.
pub(crate) async fn recent_activity(State(state): State<AppState>) -> Json<Vec<ActivityEntry>> {
    Json(state.app.activity.recent())
}
