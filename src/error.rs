//! Error taxonomy for the engine and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::geocode::GeocodeError;

/// Recoverable per-request failures.
///
/// Out-of-region points are not errors; they resolve to a result without a
/// region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Bad or missing input, carries the user-facing message
    #[error("{0}")]
    Validation(String),
    /// Geocoder returned no match for the address
    #[error("Could not geocode the provided location. Try a more specific address, check the spelling, or enter coordinates as \"latitude, longitude\"")]
    NotFound,
    /// Geocoder timed out or failed in transport
    #[error("Geocoding service is unavailable, please try again later")]
    Unavailable(String),
}

impl ResolveError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::Validation(_) => StatusCode::BAD_REQUEST,
            ResolveError::NotFound => StatusCode::NOT_FOUND,
            ResolveError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<GeocodeError> for ResolveError {
    fn from(value: GeocodeError) -> Self {
        match value {
            GeocodeError::NotFound => ResolveError::NotFound,
            GeocodeError::Unavailable(reason) => ResolveError::Unavailable(reason),
        }
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
