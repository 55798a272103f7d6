pub mod extract;
pub mod views;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post, put};

use crate::state::AppState;

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/views", post(views::create))
        .route("/views/{id}", get(views::get).delete(views::delete))
        .route("/views/{id}/reload", post(views::reload))
        .route(
            "/views/{id}/filters",
            patch(views::set_filter).delete(views::clear_filters),
        )
        .route("/views/{id}/filters/remove", post(views::remove_filter))
        .route("/views/{id}/sort", put(views::set_sort))
        .route("/views/{id}/page", put(views::go_to_page))
        .route("/views/{id}/jobs/{job_id}", get(views::job_detail))
        .with_state(state)
}
