//! # API REST
//!
//! REST API implementation for the PAMA imaging CDS service.
//!
//! Handles:
//! - HTTP endpoints with axum (health, CDS Hooks discovery, service invocation)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for common types and `pama-core` for the decision logic.

#![warn(rust_2018_idioms)]

use api_shared::{DiscoveryResponse, HealthRes, HealthService, ServiceDefinition};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use fhir::CdsRequest;
use pama_core::PamaImagingService;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server.
///
/// The service holds the loaded rules behind `Arc`s, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    service: PamaImagingService,
}

impl AppState {
    pub fn new(service: PamaImagingService) -> Self {
        Self { service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, discovery, pama_imaging),
    components(schemas(
        HealthRes,
        DiscoveryResponse,
        ServiceDefinition,
        fhir::CdsRequest,
        fhir::RequestContext,
        fhir::DraftOrders,
        fhir::BundleEntry,
        fhir::ClinicalResource,
        fhir::CodeableConcept,
        fhir::Coding,
        fhir::Extension,
        fhir::CdsResponse,
        fhir::ResponseExtension,
        fhir::SystemAction,
        fhir::Card,
        fhir::Source,
        fhir::Suggestion,
        fhir::Action,
        fhir::Link,
        fhir::Indicator,
        fhir::ActionType,
        fhir::LinkType,
    ))
)]
pub struct ApiDoc;

/// Build the application router: API routes, Swagger UI and permissive CORS.
pub fn router(service: PamaImagingService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cds-services", get(discovery))
        .route("/cds-services/pama-imaging", post(pama_imaging))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(service))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint, used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/cds-services",
    responses(
        (status = 200, description = "CDS Hooks discovery document", body = DiscoveryResponse)
    )
)]
#[axum::debug_handler]
async fn discovery(State(_state): State<AppState>) -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse::default())
}

#[utoipa::path(
    post,
    path = "/cds-services/pama-imaging",
    request_body = fhir::CdsRequest,
    responses(
        (status = 200, description = "Cards and system actions for the selected orders", body = fhir::CdsResponse),
        (status = 400, description = "Malformed hook request")
    )
)]
/// Invoke the `pama-imaging` service for an `order-select` hook.
///
/// # Errors
/// Returns `400 Bad Request` if the body is not valid JSON or does not match the request
/// schema. The message names the failing JSON path.
#[axum::debug_handler]
async fn pama_imaging(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<fhir::CdsResponse>, (StatusCode, String)> {
    let request = match CdsRequest::from_json(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Rejected hook request: {}", e);
            return Err((StatusCode::BAD_REQUEST, e.to_string()));
        }
    };

    Ok(Json(state.service.evaluate(&request)))
}
