use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::engine::chips::{ActiveFilter, FilterChip};
use crate::engine::filter::{FilterPatch, FilterState};
use crate::engine::pagination::PageControls;
use crate::engine::sort::SortKey;
use crate::engine::{JobListEngine, VisiblePage};
use crate::error::AppError;
use crate::models::job::Job;
use crate::routes::extract::JsonBody;
use crate::state::AppState;

/// Everything a client needs to draw a view: cards, page controls and
/// filter chips.
#[derive(Debug, Serialize)]
pub struct ViewSnapshot {
    pub id: Uuid,
    pub page: VisiblePage,
    pub controls: Option<PageControls>,
    pub filters: FilterState,
    pub sort: SortKey,
    pub active_filters: Vec<ActiveFilter>,
    /// Jobs held by the view before filtering.
    pub loaded_count: usize,
    /// Set when the job source failed and the view was loaded empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ViewSnapshot {
    fn capture(id: Uuid, engine: &JobListEngine, notice: Option<String>) -> Self {
        Self {
            id,
            page: engine.visible_page(),
            controls: engine.page_controls(),
            filters: engine.filters().clone(),
            sort: engine.sort(),
            active_filters: engine.active_filters(),
            loaded_count: engine.loaded_count(),
            notice,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub sort: SortKey,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: i64,
}

pub async fn create(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ViewSnapshot>), AppError> {
    let engine = Arc::new(Mutex::new(JobListEngine::new(state.clock.clone())));
    let notice = state.refresh(&engine).await;
    let id = state.views.insert(engine.clone()).await;
    tracing::info!("Opened view {id} ({} open)", state.views.len().await);

    let engine = engine.lock().await;
    Ok((
        StatusCode::CREATED,
        Json(ViewSnapshot::capture(id, &engine, notice)),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let engine = state.views.get(id).await?;
    let engine = engine.lock().await;
    Ok(Json(ViewSnapshot::capture(id, &engine, None)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.views.remove(id).await?;
    tracing::info!("Closed view {id}");
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn reload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let engine = state.views.get(id).await?;
    let notice = state.refresh(&engine).await;
    let engine = engine.lock().await;
    Ok(Json(ViewSnapshot::capture(id, &engine, notice)))
}

pub async fn set_filter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(patch): JsonBody<FilterPatch>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let engine = state.views.get(id).await?;
    let mut engine = engine.lock().await;
    engine.set_filter(patch);
    Ok(Json(ViewSnapshot::capture(id, &engine, None)))
}

pub async fn clear_filters(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let engine = state.views.get(id).await?;
    let mut engine = engine.lock().await;
    engine.clear_filters();
    Ok(Json(ViewSnapshot::capture(id, &engine, None)))
}

pub async fn remove_filter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(chip): JsonBody<FilterChip>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let engine = state.views.get(id).await?;
    let mut engine = engine.lock().await;
    engine.remove_filter(&chip);
    Ok(Json(ViewSnapshot::capture(id, &engine, None)))
}

pub async fn set_sort(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(input): JsonBody<SortRequest>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let engine = state.views.get(id).await?;
    let mut engine = engine.lock().await;
    engine.set_sort(input.sort);
    Ok(Json(ViewSnapshot::capture(id, &engine, None)))
}

pub async fn go_to_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(input): JsonBody<PageRequest>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let engine = state.views.get(id).await?;
    let mut engine = engine.lock().await;
    // negative pages map to 0, which is out of range like any other
    engine.go_to_page(usize::try_from(input.page).unwrap_or(0));
    Ok(Json(ViewSnapshot::capture(id, &engine, None)))
}

pub async fn job_detail(
    State(state): State<AppState>,
    Path((id, job_id)): Path<(Uuid, i64)>,
) -> Result<Json<Job>, AppError> {
    let engine = state.views.get(id).await?;
    let engine = engine.lock().await;
    engine
        .find(job_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}
