//! Region dataset: loading, spatial index and point classification.
//!
//! The dataset is loaded once at startup and shared read-only across
//! requests.

mod classifier;
pub mod geojson;
pub mod geometry;
mod index;
mod loader;

use geo::MultiPolygon;

use crate::models::RegionLabel;

pub use classifier::RegionClassifier;
pub use index::RegionIndex;
pub use loader::{load_regions, parse_regions, DatasetLoadError};

/// A labeled macro-region with one or more polygons
#[derive(Debug, Clone)]
pub struct Region {
    pub id: String,
    pub label: RegionLabel,
    pub display_name: String,
    pub description: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

impl Region {
    /// Get the bounding box of this region
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        use geo::BoundingRect;
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }
}
