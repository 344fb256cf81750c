//! Classifies raw location input as a coordinate pair or an address.

use crate::error::ResolveError;
use crate::models::{Coordinate, LocationQuery};

/// Parse user input.
///
/// Exactly two numeric tokens separated by commas and/or whitespace, with the
/// first a valid latitude and the second a valid longitude, are taken as
/// coordinates. Anything else is an address. Empty input is rejected.
pub fn parse_location(input: &str) -> Result<LocationQuery, ResolveError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ResolveError::Validation(
            "Location cannot be empty".to_string(),
        ));
    }

    match parse_coordinates(trimmed) {
        Some(coordinate) => Ok(LocationQuery::Coordinates(coordinate)),
        None => Ok(LocationQuery::Address(trimmed.to_string())),
    }
}

/// "lat,lon", "lat lon" or "lat, lon"
fn parse_coordinates(input: &str) -> Option<Coordinate> {
    let tokens: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() != 2 {
        return None;
    }

    let lat: f64 = tokens[0].parse().ok()?;
    let lon: f64 = tokens[1].parse().ok()?;

    Coordinate::new(lat, lon)
}
