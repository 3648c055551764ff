//! HTTP surface (axum router + handlers).

mod activity;
mod design;
pub mod error;
mod health;
mod jobs;
pub mod request_tracing;
mod todos;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use nexa_core::app::App;

pub use self::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct AppState {
    pub app: App,
}

pub fn build_router(app: App) -> Router {
    let state = AppState { app };
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/todos", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/api/todos/:id",
            get(todos::get_todo)
                .patch(todos::patch_todo)
                .delete(todos::delete_todo),
        )
        .route("/api/design", post(design::generate_design))
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/materials", get(jobs::materials))
        .route("/api/jobs/materials/stage", post(jobs::stage_materials))
        .route("/api/jobs/:id", get(jobs::get_job))
        .route("/api/jobs/:id/pin", post(jobs::send_pin))
        .route(
            "/api/jobs/:id/tailboard",
            post(jobs::open_tailboard).put(jobs::update_tailboard),
        )
        .route(
            "/api/jobs/:id/completion",
            get(jobs::get_completion).post(jobs::open_completion),
        )
        .route(
            "/api/jobs/:id/checklist",
            axum::routing::patch(jobs::update_checklist),
        )
        .route("/api/jobs/:id/photos", put(jobs::upload_photos))
        .route("/api/jobs/:id/design-change", put(jobs::declare_design_change))
        .route("/api/jobs/:id/analyze", post(jobs::analyze))
        .route("/api/jobs/:id/finalize", post(jobs::finalize))
        .route("/api/activity", get(activity::recent_activity))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_tracing::request_tracing_middleware,
        ))
        .with_state(state)
}
