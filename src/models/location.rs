//! Coordinates and classified location input.

use geo::Coord;
use serde::{Deserialize, Serialize};

/// Geographic point with validated ranges.
///
/// Latitude is within [-90, 90] and longitude within [-180, 180]; a value
/// outside those ranges can never be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);

        if lat_ok && lon_ok {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Planar coordinate in (x = longitude, y = latitude) order
    pub fn to_coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

/// How the raw location input was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Coordinates,
    Address,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Coordinates => write!(f, "coordinates"),
            InputKind::Address => write!(f, "address"),
        }
    }
}

/// Raw input plus its resolved kind. One per request.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Input parsed directly as a (latitude, longitude) pair
    Coordinates(Coordinate),
    /// Free-text address, passed to the geocoder as-is (trimmed)
    Address(String),
}

impl LocationQuery {
    pub fn kind(&self) -> InputKind {
        match self {
            LocationQuery::Coordinates(_) => InputKind::Coordinates,
            LocationQuery::Address(_) => InputKind::Address,
        }
    }
}
