//! Address geocoding behind a capability trait.
//!
//! The engine only depends on [`Geocoder`]; the production adapter talks to
//! a Nominatim-compatible search endpoint and tests substitute fixtures.

mod nominatim;

use std::future::Future;

use crate::models::Coordinate;

pub use nominatim::{simplify_address, NominatimAddress, NominatimGeocoder, NominatimPlace};

/// Best match for an address
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub coordinate: Coordinate,
    pub display_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    /// Provider answered with zero matches
    #[error("no geocoding match")]
    NotFound,
    /// Timeout, transport failure, bad status or unreadable response
    #[error("geocoder unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a free-text address to exactly one best match.
///
/// Implementations issue at most one upstream request per call and must not
/// retry.
pub trait Geocoder: Send + Sync {
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<GeocodeResult, GeocodeError>> + Send;
}
