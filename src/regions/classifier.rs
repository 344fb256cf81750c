//! Region classification service.

use std::sync::Arc;
use tracing::debug;

use super::geojson::FeatureCollection;
use super::{Region, RegionIndex};
use crate::models::Coordinate;

/// Point-in-region lookup over the immutable dataset
pub struct RegionClassifier {
    index: RegionIndex,
}

impl RegionClassifier {
    pub fn new(index: RegionIndex) -> Self {
        Self { index }
    }

    pub fn from_regions(regions: Vec<Region>) -> Self {
        Self::new(RegionIndex::build(regions))
    }

    /// Region containing the coordinate, or `None` when it falls outside
    /// every region
    pub fn classify(&self, coordinate: &Coordinate) -> Option<Arc<Region>> {
        let region = self.index.lookup(coordinate);

        debug!(
            "Classified ({}, {}) as {}",
            coordinate.latitude(),
            coordinate.longitude(),
            region
                .as_ref()
                .map(|r| r.label.as_str())
                .unwrap_or("outside")
        );

        region
    }

    /// The full dataset as a GeoJSON feature collection
    pub fn feature_collection(&self) -> FeatureCollection {
        FeatureCollection::from_regions(self.index.regions().iter().map(|r| r.as_ref()))
    }

    /// Get the spatial index (for stats/debugging)
    pub fn index(&self) -> &RegionIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::parse_regions;

    const DATASET: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"region": "north", "name": "Upper"},
         "geometry": {"type": "Polygon", "coordinates": [[[0,10],[10,10],[10,20],[0,20],[0,10]]]}},
        {"type": "Feature", "properties": {"region": "south", "name": "Lower", "description": "below"},
         "geometry": {"type": "MultiPolygon", "coordinates": [
            [[[0,0],[10,0],[10,10],[0,10],[0,0]]],
            [[[20,0],[25,0],[25,5],[20,5],[20,0]]]
         ]}}
    ]}"#;

    fn classifier() -> RegionClassifier {
        RegionClassifier::from_regions(parse_regions(DATASET).unwrap())
    }

    #[test]
    fn test_classify_each_region() {
        let classifier = classifier();

        let north = classifier.classify(&Coordinate::new(15.0, 5.0).unwrap()).unwrap();
        assert_eq!(north.display_name, "Upper");

        let south = classifier.classify(&Coordinate::new(5.0, 5.0).unwrap()).unwrap();
        assert_eq!(south.display_name, "Lower");

        // Second polygon of the south region
        let fragment = classifier.classify(&Coordinate::new(2.0, 22.0).unwrap()).unwrap();
        assert_eq!(fragment.display_name, "Lower");
    }

    #[test]
    fn test_classify_outside() {
        let classifier = classifier();
        assert!(classifier.classify(&Coordinate::new(-5.0, 5.0).unwrap()).is_none());
        assert!(classifier.classify(&Coordinate::new(2.0, 15.0).unwrap()).is_none());
        assert!(classifier.classify(&Coordinate::new(50.0, -100.0).unwrap()).is_none());
    }

    #[test]
    fn test_feature_collection_is_stable() {
        let classifier = classifier();
        let first = serde_json::to_string(&classifier.feature_collection()).unwrap();
        let second = serde_json::to_string(&classifier.feature_collection()).unwrap();
        assert_eq!(first, second);

        let value: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["properties"]["region"], "north");
        assert_eq!(value["features"][0]["geometry"]["type"], "Polygon");
        assert_eq!(value["features"][1]["geometry"]["type"], "MultiPolygon");
        assert_eq!(value["features"][1]["properties"]["description"], "below");
    }
}
