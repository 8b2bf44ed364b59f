use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::conjunction::{
    analyze, run_query, to_csv, Analysis, AnalysisRequest, ConjunctionEvent, ConjunctionFilter,
    RiskLevel, SortKey,
};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

/// Filter, sort and limit as flat query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConjunctionQuery {
    pub risk_level: Option<RiskLevel>,
    /// Matches either participant.
    pub norad_id: Option<u32>,
    pub min_probability: Option<f64>,
    /// Kilometres.
    pub max_range: Option<f64>,
    /// Only events with TCA at most this many hours from now.
    pub hours: Option<f64>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    pub limit: Option<usize>,
}

impl ConjunctionQuery {
    fn filter(&self) -> ConjunctionFilter {
        ConjunctionFilter {
            risk_level: self.risk_level,
            norad_id: self.norad_id,
            min_probability: self.min_probability,
            max_range: self.max_range,
            hours: self.hours,
            start: self.start,
            end: self.end,
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConjunctionListResponse {
    pub events: Vec<ConjunctionEvent>,
    /// Matching events before `limit` was applied.
    pub total: usize,
    /// `feeds` or `synthetic`.
    #[schema(value_type = String)]
    pub source: &'static str,
}

#[utoipa::path(
    get,
    path = "/api/conjunctions",
    tag = "conjunctions",
    params(ConjunctionQuery),
    responses(
        (status = 200, description = "Filtered and sorted conjunction events", body = ConjunctionListResponse),
        (status = 400, description = "Malformed query parameters")
    )
)]
pub async fn list_conjunctions(
    State(state): State<AppState>,
    Query(query): Query<ConjunctionQuery>,
) -> Json<ConjunctionListResponse> {
    let now = Utc::now();
    let resolved = state.conjunctions.events(now).await;
    let (events, total) = run_query(
        &resolved.value,
        &query.filter(),
        query.sort.unwrap_or_default(),
        query.limit,
        now,
    );

    Json(ConjunctionListResponse {
        events,
        total,
        source: resolved.source,
    })
}

#[utoipa::path(
    post,
    path = "/api/conjunctions/analyze",
    tag = "conjunctions",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Events with optional grouping and statistics", body = Analysis),
        (status = 400, description = "Malformed request body")
    )
)]
pub async fn analyze_conjunctions(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Json<Analysis> {
    let now = Utc::now();
    let resolved = state.conjunctions.events(now).await;
    Json(analyze(&resolved.value, &request, now))
}

#[utoipa::path(
    get,
    path = "/api/conjunctions/export",
    tag = "conjunctions",
    params(ConjunctionQuery),
    responses(
        (status = 200, description = "Matching events as CSV", body = String, content_type = "text/csv"),
        (status = 500, description = "CSV encoding failed", body = ErrorResponse)
    )
)]
pub async fn export_conjunctions(
    State(state): State<AppState>,
    Query(query): Query<ConjunctionQuery>,
) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let resolved = state.conjunctions.events(now).await;
    let (events, _) = run_query(
        &resolved.value,
        &query.filter(),
        query.sort.unwrap_or_default(),
        query.limit,
        now,
    );

    let body = to_csv(&events).map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"conjunctions.csv\"",
            ),
        ],
        body,
    ))
}
