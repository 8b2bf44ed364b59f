use utoipa::OpenApi;

use super::api::conjunctions::ConjunctionListResponse;
use super::api::error::ErrorResponse;
use super::api::satellites::{BatchRequest, PositionsResponse};
use super::api::status::StatusResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::status::status,
        super::api::status::clear_cache,
        super::api::satellites::list_satellites,
        super::api::satellites::batch_elements,
        super::api::satellites::positions,
        super::api::satellites::trajectory,
        super::api::conjunctions::list_conjunctions,
        super::api::conjunctions::analyze_conjunctions,
        super::api::conjunctions::export_conjunctions,
    ),
    components(
        schemas(
            BatchRequest,
            PositionsResponse,
            ConjunctionListResponse,
            ErrorResponse,
            StatusResponse,
            crate::acquisition::SessionPhase,
            crate::elements::ResolvedEntry,
            crate::elements::ResolvedElementSet,
            crate::catalog::CatalogEntry,
            crate::catalog::ElementSet,
            crate::catalog::Status,
            crate::propagate::OrbitalState,
            crate::propagate::TrajectoryPoint,
            crate::propagate::TrajectorySample,
            crate::conjunction::ConjunctionEvent,
            crate::conjunction::RiskLevel,
            crate::conjunction::ConjunctionFilter,
            crate::conjunction::SortKey,
            crate::conjunction::GroupBy,
            crate::conjunction::AnalysisRequest,
            crate::conjunction::Analysis,
            crate::conjunction::ConjunctionStats,
            crate::conjunction::RiskCounts,
        )
    ),
    info(
        title = "Orbit Watch API",
        description = "Tracked-object element sets, positions and conjunction screening",
        version = "0.1.0"
    ),
    tags(
        (name = "status", description = "Service state"),
        (name = "satellites", description = "Catalog, element sets and propagation"),
        (name = "conjunctions", description = "Conjunction events and analysis")
    )
)]
pub struct ApiDoc;
