use regionfund::models::{Coordinate, RegionLabel};
use regionfund::regions::geometry::multi_polygon_contains;
use regionfund::regions::{load_regions, RegionClassifier};

const DATASET: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/regions.geojson");

#[test]
fn shipped_dataset_loads() {
    let regions = load_regions(DATASET).unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].label, RegionLabel::North);
    assert_eq!(regions[1].label, RegionLabel::South);
    assert!(regions.iter().all(|r| r.geometry.0.len() == 1));
}

#[test]
fn shipped_regions_do_not_overlap() {
    let regions = load_regions(DATASET).unwrap();

    // Sample a grid covering the province, offset so no sample sits on a
    // shared boundary
    let mut lat = 41.05;
    while lat < 57.5 {
        let mut lon = -95.95;
        while lon < -73.5 {
            let point = Coordinate::new(lat, lon).unwrap().to_coord();
            let hits = regions
                .iter()
                .filter(|r| multi_polygon_contains(&r.geometry, point))
                .count();
            assert!(hits <= 1, "({}, {}) is in {} regions", lat, lon, hits);
            lon += 0.5;
        }
        lat += 0.5;
    }
}

#[test]
fn known_places_classify() {
    let classifier = RegionClassifier::from_regions(load_regions(DATASET).unwrap());

    let cases = [
        (43.6532, -79.3832, Some(RegionLabel::South)), // Toronto
        (45.4215, -75.6972, Some(RegionLabel::South)), // Ottawa
        (43.2557, -79.8711, Some(RegionLabel::South)), // Hamilton
        (42.3149, -83.0364, Some(RegionLabel::South)), // Windsor
        (42.9014, -78.9187, Some(RegionLabel::South)), // Fort Erie
        (45.0213, -74.7303, Some(RegionLabel::South)), // Cornwall
        (45.6076, -74.6050, Some(RegionLabel::South)), // Hawkesbury
        (45.8260, -77.1100, Some(RegionLabel::South)), // Pembroke
        (45.3269, -79.2168, Some(RegionLabel::South)), // Huntsville
        (48.3809, -89.2477, Some(RegionLabel::North)), // Thunder Bay
        (46.4917, -80.9930, Some(RegionLabel::North)), // Sudbury
        (46.3091, -79.4608, Some(RegionLabel::North)), // North Bay
        (45.3476, -80.0353, Some(RegionLabel::North)), // Parry Sound
        (46.5219, -84.3461, Some(RegionLabel::North)), // Sault Ste. Marie, ON
        (49.7670, -94.4894, Some(RegionLabel::North)), // Kenora
        (51.2794, -80.6463, Some(RegionLabel::North)), // Moosonee
        (48.4758, -81.3305, Some(RegionLabel::North)), // Timmins
        (47.5100, -79.6800, Some(RegionLabel::North)), // New Liskeard
        (45.5019, -73.5674, None),                     // Montreal
        (45.4765, -75.7013, None),                     // Gatineau
        (48.0975, -77.7828, None),                     // Val-d'Or
        (48.2366, -79.0230, None),                     // Rouyn-Noranda
        (46.7200, -79.1000, None),                     // Temiscaming
        (42.3314, -83.0458, None),                     // Detroit
        (42.8864, -78.8784, None),                     // Buffalo
        (46.4953, -84.3453, None),                     // Sault Ste. Marie, MI
        (46.7867, -92.1005, None),                     // Duluth
        (49.8951, -97.1384, None),                     // Winnipeg
        (40.7128, -74.0060, None),                     // New York
        (-33.8688, 151.2093, None),                    // Sydney
    ];

    for (lat, lon, expected) in cases {
        let got = classifier
            .classify(&Coordinate::new(lat, lon).unwrap())
            .map(|r| r.label);
        assert_eq!(got, expected, "({}, {})", lat, lon);
    }
}
