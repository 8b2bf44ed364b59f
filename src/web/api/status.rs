use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::acquisition::SessionPhase;
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub upstream: SessionPhase,
    pub cached_element_sets: usize,
    pub catalog_size: usize,
    pub tracked_feeds: Vec<u32>,
}

#[utoipa::path(
    get,
    path = "/api/status",
    tag = "status",
    responses(
        (status = 200, description = "Upstream session and cache state", body = StatusResponse)
    )
)]
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(snapshot(&state))
}

#[utoipa::path(
    delete,
    path = "/api/tle/cache",
    tag = "status",
    responses(
        (status = 200, description = "Cache emptied; next requests go upstream", body = StatusResponse)
    )
)]
pub async fn clear_cache(State(state): State<AppState>) -> Json<StatusResponse> {
    state.acquisition.clear_cache();
    log::info!("Element-set cache cleared");
    Json(snapshot(&state))
}

fn snapshot(state: &AppState) -> StatusResponse {
    StatusResponse {
        upstream: state.acquisition.session().phase(),
        cached_element_sets: state.acquisition.cache().len(),
        catalog_size: state.catalog.len(),
        tracked_feeds: state.conjunctions.tracked().to_vec(),
    }
}
