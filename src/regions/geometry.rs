//! Ring construction and crossing-number point-in-polygon tests.
//!
//! Points lying exactly on a ring edge or vertex may be reported either
//! inside or outside. That is inherent to ray casting and is not corrected
//! here; exact-boundary classification is not guaranteed.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use hashbrown::HashSet;

use super::geojson::Position;

/// Why a ring in the dataset was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    #[error("position {0} is not a valid (longitude, latitude) pair")]
    InvalidPosition(usize),
    #[error("ring is not closed (first point differs from last)")]
    NotClosed,
    #[error("ring has {0} points, at least 4 are required")]
    TooFewPoints(usize),
    #[error("ring has fewer than 3 distinct vertices")]
    Degenerate,
}

/// Build a closed ring from GeoJSON positions.
///
/// The ring must be explicitly closed, have at least 4 points and at least 3
/// distinct vertices. Longitude and latitude must be within range.
pub fn build_ring(positions: &[Position]) -> Result<LineString<f64>, RingError> {
    let mut coords = Vec::with_capacity(positions.len());

    for (i, position) in positions.iter().enumerate() {
        let (lon, lat) = match position.as_slice() {
            [lon, lat, ..] => (*lon, *lat),
            _ => return Err(RingError::InvalidPosition(i)),
        };

        let valid = lon.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lon)
            && (-90.0..=90.0).contains(&lat);
        if !valid {
            return Err(RingError::InvalidPosition(i));
        }

        coords.push(Coord { x: lon, y: lat });
    }

    if coords.len() < 4 {
        return Err(RingError::TooFewPoints(coords.len()));
    }

    if coords.first() != coords.last() {
        return Err(RingError::NotClosed);
    }

    let distinct: HashSet<(u64, u64)> = coords[..coords.len() - 1]
        .iter()
        .map(|c| (c.x.to_bits(), c.y.to_bits()))
        .collect();
    if distinct.len() < 3 {
        return Err(RingError::Degenerate);
    }

    Ok(LineString::new(coords))
}

/// Crossing-number test over an ordered vertex sequence.
///
/// Closure is implied: the edge from the last vertex back to the first is
/// always tested, so an explicit closing duplicate is harmless.
pub fn ring_contains(ring: &[Coord<f64>], point: Coord<f64>) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let a = ring[i];
        let b = ring[j];

        // Edge straddles the horizontal line through the point
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}

/// Inside the exterior ring and outside every hole
pub fn polygon_contains(polygon: &Polygon<f64>, point: Coord<f64>) -> bool {
    ring_contains(&polygon.exterior().0, point)
        && !polygon
            .interiors()
            .iter()
            .any(|hole| ring_contains(&hole.0, point))
}

/// Inside any one of the polygons
pub fn multi_polygon_contains(geometry: &MultiPolygon<f64>, point: Coord<f64>) -> bool {
    geometry.0.iter().any(|polygon| polygon_contains(polygon, point))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Vec<Coord<f64>> {
        vec![
            Coord { x: min, y: min },
            Coord { x: max, y: min },
            Coord { x: max, y: max },
            Coord { x: min, y: max },
            Coord { x: min, y: min },
        ]
    }

    fn positions(coords: &[(f64, f64)]) -> Vec<Position> {
        coords.iter().map(|(x, y)| vec![*x, *y]).collect()
    }

    #[test]
    fn test_square_inside_outside() {
        let ring = square(0.0, 10.0);
        assert!(ring_contains(&ring, Coord { x: 5.0, y: 5.0 }));
        assert!(ring_contains(&ring, Coord { x: 0.1, y: 9.9 }));
        assert!(!ring_contains(&ring, Coord { x: -1.0, y: 5.0 }));
        assert!(!ring_contains(&ring, Coord { x: 5.0, y: 10.5 }));
        assert!(!ring_contains(&ring, Coord { x: 20.0, y: 20.0 }));
    }

    #[test]
    fn test_implied_closure() {
        // Same square without the closing duplicate
        let mut ring = square(0.0, 10.0);
        ring.pop();
        assert!(ring_contains(&ring, Coord { x: 5.0, y: 5.0 }));
        assert!(!ring_contains(&ring, Coord { x: 15.0, y: 5.0 }));
    }

    #[test]
    fn test_concave_ring() {
        // U shape opening upwards; the notch is outside
        let ring = vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 9.0, y: 0.0 },
            Coord { x: 9.0, y: 9.0 },
            Coord { x: 6.0, y: 9.0 },
            Coord { x: 6.0, y: 3.0 },
            Coord { x: 3.0, y: 3.0 },
            Coord { x: 3.0, y: 9.0 },
            Coord { x: 0.0, y: 9.0 },
        ];
        assert!(ring_contains(&ring, Coord { x: 1.5, y: 6.0 }));
        assert!(ring_contains(&ring, Coord { x: 7.5, y: 6.0 }));
        assert!(ring_contains(&ring, Coord { x: 4.5, y: 1.5 }));
        assert!(!ring_contains(&ring, Coord { x: 4.5, y: 6.0 }));
    }

    #[test]
    fn test_degenerate_ring_never_contains() {
        let ring = vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }];
        assert!(!ring_contains(&ring, Coord { x: 0.5, y: 0.5 }));
    }

    #[test]
    fn test_polygon_hole() {
        let polygon = Polygon::new(
            LineString::new(square(0.0, 10.0)),
            vec![LineString::new(square(4.0, 6.0))],
        );
        assert!(polygon_contains(&polygon, Coord { x: 2.0, y: 2.0 }));
        assert!(!polygon_contains(&polygon, Coord { x: 5.0, y: 5.0 }));
    }

    #[test]
    fn test_multi_polygon_any_fragment() {
        let geometry = MultiPolygon::new(vec![
            Polygon::new(LineString::new(square(0.0, 1.0)), vec![]),
            Polygon::new(LineString::new(square(5.0, 6.0)), vec![]),
        ]);
        assert!(multi_polygon_contains(&geometry, Coord { x: 0.5, y: 0.5 }));
        assert!(multi_polygon_contains(&geometry, Coord { x: 5.5, y: 5.5 }));
        assert!(!multi_polygon_contains(&geometry, Coord { x: 3.0, y: 3.0 }));
    }

    #[test]
    fn test_build_ring_ok() {
        let ring = build_ring(&positions(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]))
            .unwrap();
        assert_eq!(ring.0.len(), 4);
    }

    #[test]
    fn test_build_ring_open() {
        let err = build_ring(&positions(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]))
            .unwrap_err();
        assert_eq!(err, RingError::NotClosed);
    }

    #[test]
    fn test_build_ring_too_few_points() {
        let err = build_ring(&positions(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)])).unwrap_err();
        assert_eq!(err, RingError::TooFewPoints(3));
    }

    #[test]
    fn test_build_ring_degenerate() {
        let err = build_ring(&positions(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (0.0, 0.0)]))
            .unwrap_err();
        assert_eq!(err, RingError::Degenerate);
    }

    #[test]
    fn test_build_ring_bad_position() {
        let mut coords = positions(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        coords[1] = vec![1.0];
        assert_eq!(build_ring(&coords).unwrap_err(), RingError::InvalidPosition(1));

        let coords = positions(&[(0.0, 0.0), (200.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert_eq!(build_ring(&coords).unwrap_err(), RingError::InvalidPosition(1));
    }
}
