use axum::{routing::delete, routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::api::conjunctions as conjunction_handlers;
use super::api::satellites as satellite_handlers;
use super::api::status as status_handlers;
use super::api_doc::ApiDoc;
use super::state::{AppState, StartupError};
use crate::config::Config;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/status", get(status_handlers::status))
        .route("/api/tle/cache", delete(status_handlers::clear_cache))
        // Element sets and positions
        .route("/api/satellites", get(satellite_handlers::list_satellites))
        .route("/api/tle/batch", post(satellite_handlers::batch_elements))
        .route("/api/positions", get(satellite_handlers::positions))
        .route("/api/trajectory/{id}", get(satellite_handlers::trajectory))
        // Conjunctions
        .route(
            "/api/conjunctions",
            get(conjunction_handlers::list_conjunctions),
        )
        .route(
            "/api/conjunctions/analyze",
            post(conjunction_handlers::analyze_conjunctions),
        )
        .route(
            "/api/conjunctions/export",
            get(conjunction_handlers::export_conjunctions),
        )
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> Result<(), StartupError> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    log::info!("Starting server on {}", config.web.bind);

    let listener = tokio::net::TcpListener::bind(&config.web.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
