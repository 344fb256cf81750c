//! Nominatim search adapter.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::{GeocodeError, GeocodeResult, Geocoder};
use crate::config::GeocoderSettings;
use crate::models::Coordinate;

/// One search hit as returned with `format=json&addressdetails=1`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub importance: Option<f64>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

/// Structured address details
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Geocoder backed by a Nominatim-compatible `/search` endpoint
pub struct NominatimGeocoder {
    client: Client,
    endpoint: Url,
    country_codes: Vec<String>,
    max_results: u32,
    omit_from_display: Vec<String>,
}

impl NominatimGeocoder {
    pub fn new(settings: &GeocoderSettings) -> Result<Self> {
        let endpoint = Url::parse(&settings.url)
            .with_context(|| format!("Invalid geocoder URL '{}'", settings.url))?;

        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            country_codes: settings.country_codes.clone(),
            max_results: settings.max_results.max(1),
            omit_from_display: settings.omit_from_display.clone(),
        })
    }

    fn search_url(&self, address: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", address)
                .append_pair("format", "json")
                .append_pair("limit", &self.max_results.to_string())
                .append_pair("addressdetails", "1");
            if !self.country_codes.is_empty() {
                pairs.append_pair("countrycodes", &self.country_codes.join(","));
            }
        }
        url
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        let url = self.search_url(address);
        debug!("Geocoding '{}'", address);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Geocoder request timed out for '{}'", address);
                GeocodeError::Unavailable("geocoder request timed out".to_string())
            } else {
                warn!("Geocoder request failed: {}", e);
                GeocodeError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Geocoder returned status {}", status);
            return Err(GeocodeError::Unavailable(format!(
                "geocoder returned HTTP {}",
                status.as_u16()
            )));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            warn!("Failed to parse geocoder response: {}", e);
            GeocodeError::Unavailable(format!("malformed geocoder response: {}", e))
        })?;

        debug!("Geocoder returned {} result(s)", places.len());

        let best = best_match(places).ok_or(GeocodeError::NotFound)?;
        to_result(&best, address, &self.omit_from_display)
    }
}

/// Highest importance wins; provider order breaks ties and covers missing
/// importance values
fn best_match(places: Vec<NominatimPlace>) -> Option<NominatimPlace> {
    let mut best: Option<NominatimPlace> = None;

    for place in places {
        let better = match &best {
            None => true,
            Some(current) => {
                place.importance.unwrap_or(f64::NEG_INFINITY)
                    > current.importance.unwrap_or(f64::NEG_INFINITY)
            }
        };
        if better {
            best = Some(place);
        }
    }

    best
}

fn to_result(
    place: &NominatimPlace,
    query: &str,
    omit: &[String],
) -> Result<GeocodeResult, GeocodeError> {
    let lat = place.lat.trim().parse::<f64>().ok();
    let lon = place.lon.trim().parse::<f64>().ok();

    let coordinate = match (lat, lon) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
        _ => None,
    }
    .ok_or_else(|| {
        warn!("Geocoder returned invalid coordinates {}, {}", place.lat, place.lon);
        GeocodeError::Unavailable("geocoder returned an invalid coordinate".to_string())
    })?;

    Ok(GeocodeResult {
        coordinate,
        display_address: simplify_address(place, query, omit),
    })
}

/// Short human-readable address for a hit.
///
/// Prefers "<number> <road>, <city>" from structured details. Otherwise takes
/// up to two leading parts of the display name, skipping state, country and
/// any part listed in `omit`.
pub fn simplify_address(place: &NominatimPlace, query: &str, omit: &[String]) -> String {
    let details = place.address.clone().unwrap_or_default();
    let mut parts = Vec::new();

    match (&details.house_number, &details.road) {
        (Some(number), Some(road)) => parts.push(format!("{} {}", number, road)),
        (None, Some(road)) => parts.push(road.clone()),
        _ => {}
    }

    let city = details
        .city
        .as_ref()
        .or(details.town.as_ref())
        .or(details.village.as_ref())
        .or(details.municipality.as_ref());
    if let Some(city) = city {
        parts.push(city.clone());
    }

    if !parts.is_empty() {
        return parts.join(", ");
    }

    let display_name = match &place.display_name {
        Some(name) if !name.trim().is_empty() => name.as_str(),
        _ => return query.to_string(),
    };

    let pieces: Vec<&str> = display_name.split(", ").collect();
    if pieces.len() <= 2 {
        return display_name.to_string();
    }

    let skip: Vec<String> = [&details.state, &details.country]
        .into_iter()
        .flatten()
        .map(|s| s.to_lowercase())
        .collect();

    let kept: Vec<&str> = pieces
        .iter()
        .take(4)
        .filter(|p| {
            let lower = p.trim().to_lowercase();
            !skip.contains(&lower) && !omit.iter().any(|o| o.eq_ignore_ascii_case(&lower))
        })
        .take(2)
        .copied()
        .collect();

    if kept.is_empty() {
        display_name.to_string()
    } else {
        kept.join(", ")
    }
}
