//! Request orchestration: parse, geocode, classify, evaluate.
//!
//! Each stage either produces the input for the next or short-circuits with
//! a [`ResolveError`]. No partial results are returned.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::eligibility::{evaluate, EligibilityResult, FundingTable};
use crate::error::ResolveError;
use crate::geocode::Geocoder;
use crate::location::parse_location;
use crate::models::{ApplicantProfile, InputKind, LocationQuery, RegionLabel};
use crate::regions::{Region, RegionClassifier};

/// Raw request fields as supplied by the caller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub applicant_type: Option<String>,
    #[serde(default)]
    pub municipality_population: Option<String>,
}

/// Region reference as returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSummary {
    pub region: RegionLabel,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Region> for RegionSummary {
    fn from(region: &Region) -> Self {
        Self {
            region: region.label,
            name: region.display_name.clone(),
            description: region.description.clone(),
        }
    }
}

/// Successful resolution. `region` is `None` outside every region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub success: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub region: Option<RegionSummary>,
    pub message: String,
    pub input_type: InputKind,
    pub display_address: Option<String>,
    pub funding_info: EligibilityResult,
}

/// Composes the parser, geocoder, classifier and funding table
pub struct ResolveService<G> {
    classifier: Arc<RegionClassifier>,
    geocoder: Arc<G>,
    funding: Arc<FundingTable>,
}

impl<G> ResolveService<G>
where
    G: Geocoder + 'static,
{
    pub fn new(
        classifier: Arc<RegionClassifier>,
        geocoder: Arc<G>,
        funding: Arc<FundingTable>,
    ) -> Self {
        Self {
            classifier,
            geocoder,
            funding,
        }
    }

    pub fn classifier(&self) -> &RegionClassifier {
        &self.classifier
    }

    /// Validate raw fields, then resolve
    pub async fn resolve(
        &self,
        request: &ResolveRequest,
    ) -> Result<ClassificationResult, ResolveError> {
        let location = request.location.as_deref().ok_or_else(|| {
            ResolveError::Validation("Location parameter is required".to_string())
        })?;

        let query = parse_location(location)?;

        let profile = ApplicantProfile::from_raw(
            request.applicant_type.as_deref(),
            request.municipality_population.as_deref(),
        )?;

        self.resolve_query(query, &profile).await
    }

    /// Resolve an already-parsed location for a validated profile
    pub async fn resolve_query(
        &self,
        query: LocationQuery,
        profile: &ApplicantProfile,
    ) -> Result<ClassificationResult, ResolveError> {
        let input_type = query.kind();

        let (coordinate, display_address) = match query {
            LocationQuery::Coordinates(coordinate) => (coordinate, None),
            LocationQuery::Address(address) => {
                let result = self.geocoder.geocode(&address).await?;
                debug!(
                    "Geocoded '{}' to ({}, {})",
                    address,
                    result.coordinate.latitude(),
                    result.coordinate.longitude()
                );
                (result.coordinate, Some(result.display_address))
            }
        };

        let region = self.classifier.classify(&coordinate);
        let funding_info = evaluate(&self.funding, region.as_ref().map(|r| r.label), profile);

        let message = match &region {
            Some(r) => format!("This location is in {}.", r.display_name),
            None => "This location is outside the mapped regions or in an unmapped area."
                .to_string(),
        };

        info!(
            "Resolved {} input to {} ({}% funding)",
            input_type,
            region.as_ref().map(|r| r.label.as_str()).unwrap_or("outside"),
            funding_info.funding_percentage
        );

        Ok(ClassificationResult {
            success: true,
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
            region: region.as_deref().map(RegionSummary::from),
            message,
            input_type,
            display_address,
            funding_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{GeocodeError, GeocodeResult};
    use crate::models::Coordinate;
    use crate::regions::parse_regions;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DATASET: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"region": "north", "name": "Upper"},
         "geometry": {"type": "Polygon", "coordinates": [[[0,10],[10,10],[10,20],[0,20],[0,10]]]}},
        {"type": "Feature", "properties": {"region": "south", "name": "Lower"},
         "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]]}}
    ]}"#;

    /// Answers every address with a fixed outcome and counts calls
    struct FixedGeocoder {
        outcome: Result<GeocodeResult, GeocodeError>,
        calls: AtomicUsize,
    }

    impl FixedGeocoder {
        fn new(outcome: Result<GeocodeResult, GeocodeError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, _address: &str) -> Result<GeocodeResult, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn service(geocoder: Arc<FixedGeocoder>) -> ResolveService<FixedGeocoder> {
        let classifier = RegionClassifier::from_regions(parse_regions(DATASET).unwrap());
        ResolveService::new(
            Arc::new(classifier),
            geocoder,
            Arc::new(FundingTable::default()),
        )
    }

    fn request(location: &str, applicant: &str, tier: Option<&str>) -> ResolveRequest {
        ResolveRequest {
            location: Some(location.to_string()),
            applicant_type: Some(applicant.to_string()),
            municipality_population: tier.map(String::from),
        }
    }

    fn lower_hit() -> Result<GeocodeResult, GeocodeError> {
        Ok(GeocodeResult {
            coordinate: Coordinate::new(5.0, 5.0).unwrap(),
            display_address: "1 Main St, Lowertown".to_string(),
        })
    }

    #[tokio::test]
    async fn test_coordinates_skip_geocoder() {
        let geocoder = Arc::new(FixedGeocoder::new(lower_hit()));
        let svc = service(geocoder.clone());

        let result = svc
            .resolve(&request("15, 5", "business", None))
            .await
            .unwrap();

        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.input_type, InputKind::Coordinates);
        assert_eq!(result.region.unwrap().region, RegionLabel::North);
        assert_eq!(result.funding_info.funding_percentage, 75);
        assert!(result.display_address.is_none());
        assert_eq!(result.message, "This location is in Upper.");
    }

    #[tokio::test]
    async fn test_address_uses_geocoder() {
        let geocoder = Arc::new(FixedGeocoder::new(lower_hit()));
        let svc = service(geocoder.clone());

        let result = svc
            .resolve(&request("1 Main St", "municipality", Some("above-170k")))
            .await
            .unwrap();

        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.input_type, InputKind::Address);
        assert_eq!(result.display_address.as_deref(), Some("1 Main St, Lowertown"));
        assert_eq!(result.region.unwrap().region, RegionLabel::South);
        assert_eq!(result.funding_info.funding_percentage, 50);
    }

    #[tokio::test]
    async fn test_outside_is_not_an_error() {
        let svc = service(Arc::new(FixedGeocoder::new(lower_hit())));

        let result = svc
            .resolve(&request("-45, 100", "indigenous", None))
            .await
            .unwrap();

        assert!(result.region.is_none());
        assert_eq!(result.funding_info.funding_percentage, 0);
        assert!(result.message.contains("outside"));
    }

    #[tokio::test]
    async fn test_validation_precedes_geocoding() {
        let geocoder = Arc::new(FixedGeocoder::new(lower_hit()));
        let svc = service(geocoder.clone());

        let err = svc
            .resolve(&request("  ", "business", None))
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::Validation("Location cannot be empty".into()));

        let err = svc
            .resolve(&request("municipality", "municipality", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Validation(_)));

        let err = svc
            .resolve(&ResolveRequest::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::Validation("Location parameter is required".into())
        );

        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_geocoder_failures_propagate() {
        let not_found = service(Arc::new(FixedGeocoder::new(Err(GeocodeError::NotFound))));
        let err = not_found
            .resolve(&request("Atlantis", "business", None))
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::NotFound);

        let unavailable = service(Arc::new(FixedGeocoder::new(Err(
            GeocodeError::Unavailable("timeout".into()),
        ))));
        let err = unavailable
            .resolve(&request("Atlantis", "business", None))
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::Unavailable("timeout".into()));
    }

    #[tokio::test]
    async fn test_identical_inputs_identical_output() {
        let svc = service(Arc::new(FixedGeocoder::new(lower_hit())));
        let req = request("1 Main St", "indigenous", None);

        let first = serde_json::to_vec(&svc.resolve(&req).await.unwrap()).unwrap();
        let second = serde_json::to_vec(&svc.resolve(&req).await.unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
