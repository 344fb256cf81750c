//! Region dataset loading and validation.

use std::fs;
use std::path::{Path, PathBuf};

use geo::{MultiPolygon, Polygon};
use tracing::{debug, info};

use super::geojson::{FeatureCollection, Position};
use super::geometry::{build_ring, RingError};
use super::Region;
use crate::models::RegionLabel;

/// Fatal problems with the polygon dataset. The server must not start.
#[derive(Debug, thiserror::Error)]
pub enum DatasetLoadError {
    #[error("failed to read region dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed region dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a FeatureCollection, found '{0}'")]
    NotFeatureCollection(String),
    #[error("region dataset contains no features")]
    Empty,
    #[error("feature {index}: unknown region label '{label}'")]
    InvalidLabel { index: usize, label: String },
    #[error("feature {index} ({name}) has no geometry")]
    MissingGeometry { index: usize, name: String },
    #[error("feature {index} ({name}), polygon {polygon}, ring {ring}: {source}")]
    InvalidRing {
        index: usize,
        name: String,
        polygon: usize,
        ring: usize,
        #[source]
        source: RingError,
    },
}

/// Read and validate the dataset file
pub fn load_regions<P: AsRef<Path>>(path: P) -> Result<Vec<Region>, DatasetLoadError> {
    let path = path.as_ref();
    info!("Loading region dataset from {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| DatasetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let regions = parse_regions(&content)?;
    info!("Loaded {} regions", regions.len());
    Ok(regions)
}

/// Validate a GeoJSON feature collection and build regions, in file order
pub fn parse_regions(json: &str) -> Result<Vec<Region>, DatasetLoadError> {
    let collection: FeatureCollection = serde_json::from_str(json)?;

    if collection.collection_type != "FeatureCollection" {
        return Err(DatasetLoadError::NotFeatureCollection(
            collection.collection_type,
        ));
    }

    if collection.features.is_empty() {
        return Err(DatasetLoadError::Empty);
    }

    let mut regions = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.into_iter().enumerate() {
        let label: RegionLabel =
            feature
                .properties
                .region
                .parse()
                .map_err(|_| DatasetLoadError::InvalidLabel {
                    index,
                    label: feature.properties.region.clone(),
                })?;

        let name = feature.properties.name;

        let geometry = match &feature.geometry {
            Some(g) if !g.polygons().is_empty() => g,
            _ => return Err(DatasetLoadError::MissingGeometry { index, name }),
        };

        let mut polygons = Vec::new();
        for (p, rings) in geometry.polygons().into_iter().enumerate() {
            polygons.push(build_polygon(rings).map_err(|(ring, source)| {
                DatasetLoadError::InvalidRing {
                    index,
                    name: name.clone(),
                    polygon: p,
                    ring,
                    source,
                }
            })?);
        }

        let id = match feature.id {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => format!("{}-{}", label, index),
        };

        debug!(
            "Region {} ({}): {} polygon(s)",
            id,
            label,
            polygons.len()
        );

        regions.push(Region {
            id,
            label,
            display_name: name,
            description: feature.properties.description,
            geometry: MultiPolygon::new(polygons),
        });
    }

    Ok(regions)
}

/// Exterior ring first, then holes. A polygon without rings is degenerate.
fn build_polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>, (usize, RingError)> {
    let mut built = Vec::with_capacity(rings.len());
    for (i, ring) in rings.iter().enumerate() {
        built.push(build_ring(ring).map_err(|e| (i, e))?);
    }

    if built.is_empty() {
        return Err((0, RingError::TooFewPoints(0)));
    }

    let exterior = built.remove(0);
    Ok(Polygon::new(exterior, built))
}
