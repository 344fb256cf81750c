//! Spatial index for region lookups.

use rstar::{RTree, RTreeObject, AABB};
use std::sync::Arc;
use tracing::info;

use super::geometry::multi_polygon_contains;
use super::Region;
use crate::models::Coordinate;

/// Wrapper for R-tree indexing of regions
#[derive(Clone)]
pub struct IndexedRegion {
    pub region: Arc<Region>,
    /// Position in the dataset; ties between overlapping regions go to the lowest
    order: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedRegion {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedRegion {
    fn new(region: Arc<Region>, order: usize) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = region.bbox()?;
        Some(Self {
            region,
            order,
            envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
        })
    }
}

/// R-tree of region bounding boxes plus the regions in dataset order
pub struct RegionIndex {
    tree: RTree<IndexedRegion>,
    ordered: Vec<Arc<Region>>,
}

impl RegionIndex {
    pub fn build(regions: Vec<Region>) -> Self {
        info!("Building spatial index for {} regions...", regions.len());

        let ordered: Vec<Arc<Region>> = regions.into_iter().map(Arc::new).collect();

        let indexed: Vec<IndexedRegion> = ordered
            .iter()
            .enumerate()
            .filter_map(|(order, region)| IndexedRegion::new(Arc::clone(region), order))
            .collect();

        let tree = RTree::bulk_load(indexed);
        info!("Spatial index built with {} entries", tree.size());

        Self { tree, ordered }
    }

    /// First region in dataset order whose polygons contain the point.
    ///
    /// Bounding boxes prune candidates; the crossing-number test decides.
    pub fn lookup(&self, coordinate: &Coordinate) -> Option<Arc<Region>> {
        let point = coordinate.to_coord();
        let query_envelope = AABB::from_point([point.x, point.y]);

        self.tree
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|ir| multi_polygon_contains(&ir.region.geometry, point))
            .min_by_key(|ir| ir.order)
            .map(|ir| Arc::clone(&ir.region))
    }

    /// Regions in dataset order
    pub fn regions(&self) -> &[Arc<Region>] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
