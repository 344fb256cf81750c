//! HTTP surface: region dataset retrieval and location resolution.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ResolveError;
use crate::geocode::Geocoder;
use crate::resolve::{ResolveRequest, ResolveService};

/// Application state shared across handlers
pub struct AppState<G> {
    service: ResolveService<G>,
    /// GeoJSON body for `/api/regions`, encoded once at startup
    regions: Bytes,
}

impl<G> AppState<G>
where
    G: Geocoder + 'static,
{
    pub fn new(service: ResolveService<G>) -> Result<Self, serde_json::Error> {
        let regions = serde_json::to_vec(&service.classifier().feature_collection())?;
        Ok(Self {
            service,
            regions: Bytes::from(regions),
        })
    }
}

/// Build the router for the engine's endpoints
pub fn router<G>(state: Arc<AppState<G>>) -> Router
where
    G: Geocoder + 'static,
{
    Router::new()
        .route("/api/health", get(health_handler::<G>))
        .route("/api/regions", get(regions_handler::<G>))
        .route("/api/geocode", post(resolve_handler::<G>))
        .fallback(not_found_handler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    regions: usize,
}

/// Health check endpoint
async fn health_handler<G>(State(state): State<Arc<AppState<G>>>) -> Json<HealthResponse>
where
    G: Geocoder + 'static,
{
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        regions: state.service.classifier().index().len(),
    })
}

/// The region dataset as a GeoJSON feature collection
async fn regions_handler<G>(State(state): State<Arc<AppState<G>>>) -> Response
where
    G: Geocoder + 'static,
{
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.regions.clone(),
    )
        .into_response()
}

/// Resolve a location and applicant profile to a region and funding rate.
///
/// The body is parsed by hand so malformed or missing JSON is reported with
/// the same error envelope as every other validation failure.
async fn resolve_handler<G>(State(state): State<Arc<AppState<G>>>, body: Bytes) -> Response
where
    G: Geocoder + 'static,
{
    let request: ResolveRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            let message = if body.iter().all(u8::is_ascii_whitespace) {
                "Location parameter is required".to_string()
            } else {
                format!("Request body must be a JSON object: {}", e)
            };
            return ResolveError::Validation(message).into_response();
        }
    };

    match state.service.resolve(&request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            debug!("Resolve failed: {}", err);
            err.into_response()
        }
    }
}

async fn not_found_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
        .into_response()
}
