//! Feature files on disk.

use std::fs::File;
use std::io::BufWriter;

use geofeature::container::{read_features, FeatureReader, FeatureWriter};
use geofeature::feature::{CompiledFeature, FeatureBuilder, GeometryKind};
use geofeature::geometry::{mercator, PointD, RectD};
use tempfile::TempDir;

fn city(lat: f64, lon: f64, name: &str) -> CompiledFeature {
    let mut builder = FeatureBuilder::new();
    builder
        .add_point(mercator::from_lat_lon(lat, lon))
        .add_name(name);
    CompiledFeature::encode(builder)
}

fn square(x: f64, y: f64, size: f64) -> CompiledFeature {
    let mut builder = FeatureBuilder::new();
    for (dx, dy) in [(0.0, 0.0), (size, 0.0), (size, size), (0.0, size), (0.0, 0.0)] {
        builder.add_point(PointD::new(x + dx, y + dy));
    }
    CompiledFeature::encode(builder)
}

#[test]
fn test_write_and_read_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cities.features");

    let features = vec![
        city(51.5074, -0.1278, "London"),
        city(48.8566, 2.3522, "Paris"),
        square(10.0, 10.0, 2.0),
    ];

    let file = BufWriter::new(File::create(&path).unwrap());
    let mut writer = FeatureWriter::new(file);
    for feature in &features {
        writer.write(feature).unwrap();
    }
    writer.finish().unwrap();

    let loaded = read_features(&path).unwrap();
    assert_eq!(loaded, features);
    assert_eq!(loaded[1].name(), Some("Paris"));
    assert_eq!(loaded[2].feature_type(), GeometryKind::Area);
}

#[test]
fn test_rect_query_over_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("europe.features");

    let features = vec![
        city(51.5074, -0.1278, "London"),
        city(40.4168, -3.7038, "Madrid"),
        city(59.3293, 18.0686, "Stockholm"),
    ];
    let mut writer = FeatureWriter::new(Vec::new());
    for feature in &features {
        writer.write(feature).unwrap();
    }
    std::fs::write(&path, writer.finish().unwrap()).unwrap();

    let south_west = mercator::from_lat_lon(35.0, -10.0);
    let north_east = mercator::from_lat_lon(55.0, 5.0);
    let query = RectD::new(south_west.x, south_west.y, north_east.x, north_east.y);

    let data = std::fs::read(&path).unwrap();
    let names: Vec<String> = FeatureReader::new(data.into())
        .in_rect(query)
        .map(|item| item.unwrap().name().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["London", "Madrid"]);
}

#[test]
fn test_corrupt_record_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.features");

    let mut writer = FeatureWriter::new(Vec::new());
    writer.write(&square(0.0, 0.0, 1.0)).unwrap();
    let mut data = writer.finish().unwrap();
    // Corrupt the header of the only record
    data[1] = 0xFF;
    std::fs::write(&path, data).unwrap();

    let err = read_features(&path).unwrap_err();
    assert!(err.to_string().contains("record 0"));
}
