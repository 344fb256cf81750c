//! GeoJSON feature collection types for the region dataset.
//!
//! The same types are used to read the dataset at startup and to serve it
//! back from the regions endpoint.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

use super::Region;

/// A single GeoJSON position. Only the first two values (lon, lat) are used.
pub type Position = Vec<f64>;

/// Top-level feature collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub properties: FeatureProperties,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// "north" | "south"
    pub region: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Areal geometries. Other GeoJSON geometry types are rejected at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
}

impl Geometry {
    /// Polygons as ring lists, exterior ring first
    pub fn polygons(&self) -> Vec<&Vec<Vec<Position>>> {
        match self {
            Geometry::Polygon { coordinates } => vec![coordinates],
            Geometry::MultiPolygon { coordinates } => coordinates.iter().collect(),
        }
    }

    fn from_multi_polygon(geometry: &MultiPolygon<f64>) -> Self {
        let mut polygons: Vec<Vec<Vec<Position>>> =
            geometry.0.iter().map(polygon_positions).collect();

        if polygons.len() == 1 {
            Geometry::Polygon {
                coordinates: polygons.remove(0),
            }
        } else {
            Geometry::MultiPolygon {
                coordinates: polygons,
            }
        }
    }
}

fn ring_positions(ring: &LineString<f64>) -> Vec<Position> {
    ring.0.iter().map(|c: &Coord<f64>| vec![c.x, c.y]).collect()
}

fn polygon_positions(polygon: &Polygon<f64>) -> Vec<Vec<Position>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors().iter())
        .map(ring_positions)
        .collect()
}

impl From<&Region> for Feature {
    fn from(region: &Region) -> Self {
        Self {
            feature_type: "Feature".to_string(),
            id: Some(serde_json::Value::String(region.id.clone())),
            properties: FeatureProperties {
                region: region.label.to_string(),
                name: region.display_name.clone(),
                description: region.description.clone(),
            },
            geometry: Some(Geometry::from_multi_polygon(&region.geometry)),
        }
    }
}

impl FeatureCollection {
    pub fn from_regions<'a>(regions: impl IntoIterator<Item = &'a Region>) -> Self {
        Self {
            collection_type: "FeatureCollection".to_string(),
            features: regions.into_iter().map(Feature::from).collect(),
        }
    }
}
