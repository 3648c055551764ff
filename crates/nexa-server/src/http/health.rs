use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use nexa_core::app::HealthReport;
use nexa_core::app::status;

use super::AppState;

pub(crate) async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = status::check(&state.app.todos).await;
    let code = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (code, Json(report))
}
