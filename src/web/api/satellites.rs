use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::elements::{resolve_catalog, resolve_ids, ResolvedElementSet, ResolvedEntry};
use crate::propagate::{
    propagate_catalog, sample_trajectory, OrbitalState, TrajectorySample,
    DEFAULT_DURATION_MINUTES, DEFAULT_STEPS,
};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

const MAX_TRAJECTORY_STEPS: usize = 10_000;
/// One week.
const MAX_TRAJECTORY_MINUTES: f64 = 10_080.0;

#[utoipa::path(
    get,
    path = "/api/satellites",
    tag = "satellites",
    responses(
        (status = 200, description = "Catalog with the element set in use for each object", body = Vec<ResolvedEntry>)
    )
)]
pub async fn list_satellites(State(state): State<AppState>) -> Json<Vec<ResolvedEntry>> {
    Json(resolve_catalog(&state.acquisition, &state.catalog, Utc::now()).await)
}

/// Raw body so a malformed `norad_ids` is reported as our own 400.
#[utoipa::path(
    post,
    path = "/api/tle/batch",
    tag = "satellites",
    request_body(content = BatchRequest, description = "Identifiers to resolve"),
    responses(
        (status = 200, description = "Element sets keyed by NORAD id", body = BTreeMap<String, ResolvedElementSet>),
        (status = 400, description = "norad_ids is not a list of identifiers", body = ErrorResponse)
    )
)]
pub async fn batch_elements(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<BTreeMap<u32, ResolvedElementSet>>> {
    let ids = norad_ids(&body)?;
    Ok(Json(
        resolve_ids(&state.acquisition, &state.catalog, &ids, Utc::now()).await,
    ))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchRequest {
    pub norad_ids: Vec<u32>,
}

fn norad_ids(body: &Value) -> ApiResult<Vec<u32>> {
    let Some(items) = body.get("norad_ids").and_then(Value::as_array) else {
        return Err(ApiError::InvalidRequest("norad_ids must be an array".into()));
    };
    items
        .iter()
        .map(|item| {
            let id = match item {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse::<u64>().ok(),
                _ => None,
            };
            id.and_then(|id| u32::try_from(id).ok()).ok_or_else(|| {
                ApiError::InvalidRequest(format!("invalid NORAD id: {}", item))
            })
        })
        .collect()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PositionsResponse {
    pub timestamp: DateTime<Utc>,
    pub positions: Vec<OrbitalState>,
}

#[utoipa::path(
    get,
    path = "/api/positions",
    tag = "satellites",
    responses(
        (status = 200, description = "Current state of every object that propagates", body = PositionsResponse)
    )
)]
pub async fn positions(State(state): State<AppState>) -> Json<PositionsResponse> {
    let now = Utc::now();
    let entries: Vec<_> = resolve_catalog(&state.acquisition, &state.catalog, now)
        .await
        .into_iter()
        .map(|resolved| resolved.entry)
        .collect();

    Json(PositionsResponse {
        timestamp: now,
        positions: propagate_catalog(&entries, now),
    })
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrajectoryQuery {
    /// Minutes to cover from now.
    pub duration_minutes: Option<f64>,
    pub steps: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/trajectory/{id}",
    tag = "satellites",
    params(
        ("id" = u32, Path, description = "NORAD catalog number"),
        TrajectoryQuery
    ),
    responses(
        (status = 200, description = "Sampled path", body = TrajectorySample),
        (status = 400, description = "Duration or step count out of range", body = ErrorResponse),
        (status = 404, description = "Object not in catalog", body = ErrorResponse)
    )
)]
pub async fn trajectory(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(query): Query<TrajectoryQuery>,
) -> ApiResult<Json<TrajectorySample>> {
    let entry = state
        .catalog
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("NORAD {} is not tracked", id)))?;

    let duration = query.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
    let steps = query.steps.unwrap_or(DEFAULT_STEPS);
    if !(duration.is_finite() && duration > 0.0 && duration <= MAX_TRAJECTORY_MINUTES) {
        return Err(ApiError::InvalidRequest(format!(
            "duration_minutes must be positive and at most {}",
            MAX_TRAJECTORY_MINUTES
        )));
    }
    if steps == 0 || steps > MAX_TRAJECTORY_STEPS {
        return Err(ApiError::InvalidRequest(format!(
            "steps must be between 1 and {}",
            MAX_TRAJECTORY_STEPS
        )));
    }

    let now = Utc::now();
    let resolved = resolve_ids(&state.acquisition, &state.catalog, &[id], now).await;
    let entry = match resolved.get(&id) {
        Some(set) => entry.with_elements(set.elements.clone()),
        None => entry.clone(),
    };

    Ok(Json(sample_trajectory(&entry, now, duration, steps)))
}
