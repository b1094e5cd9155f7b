//! Registry, cache, region, and interpolation tests over synthetic files.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::tempdir;

use grib2_reader::{parse_file, Layer, ParamId};
use layer_store::{interpolate_layers, LayerStore, StoreConfig};
use wx_common::LatLonBox;

use test_utils::*;

fn store_in(dir: &Path) -> LayerStore {
    let config = StoreConfig {
        cache_directory: dir.join("cache"),
        ..StoreConfig::default()
    };
    LayerStore::new(config).unwrap()
}

fn parse_one(dir: &Path, name: &str, message: Vec<u8>) -> Vec<Layer> {
    let path = write_grib_file(dir, name, &[message]);
    parse_file(path).unwrap()
}

fn t(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2013, 3, 23, hour, 0, 0).unwrap()
}

#[test]
fn test_duplicate_layers_discarded() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    let m = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 250.0, &[0; 6], None);
    let layers_a = parse_one(dir.path(), "a.grib2", m.clone());
    let layers_b = parse_one(dir.path(), "b.grib2", m);

    assert_eq!(store.add_layers(layers_a), 1);
    // Identical identity from a different file: resident layer wins.
    assert_eq!(store.add_layers(layers_b), 0);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_lazy_decode_and_disk_cache() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    let payload = [0x00, 0x0a, 0x14, 0x1e, 0x28, 0x32];
    let m = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 250.0, &payload, None);
    store.add_layers(parse_one(dir.path(), "a.grib2", m));

    let handle = store.find_all().pop().unwrap();
    assert!(!handle.is_resident());

    let data = handle.check_load().unwrap();
    assert!(handle.is_resident());
    assert_eq!(*data, vec![250.0, 260.0, 270.0, 280.0, 290.0, 300.0]);

    // A cache file appeared.
    let cache_files: Vec<_> = std::fs::read_dir(dir.path().join("cache"))
        .unwrap()
        .flatten()
        .collect();
    assert_eq!(cache_files.len(), 1);
    assert!(cache_files[0]
        .file_name()
        .to_string_lossy()
        .ends_with(".bin"));

    // After eviction the next load comes back identical, now via the
    // cache entry keyed by the payload digest.
    handle.expire_now();
    assert!(!handle.is_resident());
    let payload_digest = layer_store::DiskCache::digest(&handle.layer().read_payload().unwrap());
    assert!(cache_files[0]
        .file_name()
        .to_string_lossy()
        .starts_with(&payload_digest));
    let data = handle.check_load().unwrap();
    assert_eq!(data[5], 300.0);
}

#[test]
fn test_idle_expiry_sweep() {
    let dir = tempdir().unwrap();
    let config = StoreConfig {
        cache_directory: dir.path().join("cache"),
        layer_idle_expiry_seconds: 1,
        ..StoreConfig::default()
    };
    let store = LayerStore::new(config).unwrap();
    let m = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 250.0, &[0; 6], None);
    store.add_layers(parse_one(dir.path(), "a.grib2", m));

    let handle = store.find_all().pop().unwrap();
    handle.check_load().unwrap();
    assert!(handle.is_resident());

    // Not yet expired.
    assert_eq!(store.sweep_idle(), 0);
    std::thread::sleep(std::time::Duration::from_millis(1100));
    assert_eq!(store.sweep_idle(), 1);
    assert!(!handle.is_resident());
}

#[test]
fn test_find_layers_by_surface() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    for (name, pa) in [("l500.grib2", 50_000), ("l700.grib2", 70_000)] {
        let m = simple_field_message(0, 0, 0, 3, surface_isobaric(pa), 250.0, &[0; 6], None);
        store.add_layers(parse_one(dir.path(), name, m));
    }
    let param = ParamId::new(0, 0, 0);

    assert_eq!(store.find_layers(param, t(9)).len(), 2);
    assert_eq!(store.find_layers(param, t(12)).len(), 0);
    let at_500 = store.find_layers_surface(param, t(9), 100, 50_000.0);
    assert_eq!(at_500.len(), 1);
    assert_eq!(at_500[0].layer().surface1().value, 50_000.0);
    // A small epsilon still matches.
    assert_eq!(
        store
            .find_layers_surface(param, t(9), 100, 50_000.001)
            .len(),
        1
    );
}

#[test]
fn test_remove_missing_layers() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    let m = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 250.0, &[0; 6], None);
    let path = write_grib_file(dir.path(), "gone.grib2", &[m]);
    store.add_layers(parse_file(&path).unwrap());

    assert_eq!(store.remove_missing_layers(), 0);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(store.remove_missing_layers(), 1);
    assert!(store.is_empty());
}

#[test]
fn test_remove_obsolete_layers() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());

    // Same parameter, surface, and valid time from two model runs: the
    // 00Z run forecasts +9h, the 06Z run +3h.
    let old_run = build_message(
        0,
        &[
            section1(7, 0, 2013, 3, 23, 0, 0, 0),
            section3_latlon(3, 2, 40_000_000, -10_000_000, 1_000_000, 1_000_000, SCAN_STANDARD),
            section4_template0(0, 0, 2, 1, 9, surface_isobaric(50_000), SURFACE_MISSING),
            section5_simple(6, 250.0, 0, 0, 8),
            section6_none(),
            section7(&[0; 6]),
        ],
    );
    let new_run = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 250.0, &[0; 6], None);
    store.add_layers(parse_one(dir.path(), "old.grib2", old_run));
    store.add_layers(parse_one(dir.path(), "new.grib2", new_run));
    assert_eq!(store.len(), 2);

    assert_eq!(store.remove_obsolete_layers(), 1);
    let survivor = store.find_all().pop().unwrap();
    assert_eq!(survivor.layer().reftime(), t(6));
}

#[test]
fn test_region_extraction() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    let payload = [0, 10, 20, 30, 40, 50];
    let m = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 0.0, &payload, None);
    store.add_layers(parse_one(dir.path(), "a.grib2", m));
    let handle = store.find_all().pop().unwrap();

    // The grid spans lat 39..40, lon -10..-8.
    let result = handle
        .get_results(&LatLonBox::new(38.9, 40.1, -10.1, -7.9))
        .unwrap();
    assert_eq!(result.width(), 3);
    assert_eq!(result.height(), 2);
    // North row first.
    assert_eq!(result.get(0, 0), 0.0);
    assert_eq!(result.get(2, 0), 20.0);
    assert_eq!(result.get(0, 1), 30.0);
    assert_eq!(result.get(2, 1), 50.0);
    // Nearest-cell lookup.
    assert_eq!(result.value_at(40.0, -10.0), 0.0);
    assert_eq!(result.value_at(39.0, -8.0), 50.0);
}

#[test]
fn test_region_wraps_antimeridian() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());

    // Fully-wrapping grid: 36 columns of 10 degrees, 3 rows.
    // Cell value = column index, so the seam is easy to check.
    let payload: Vec<u8> = (0..3).flat_map(|_| 0..36u8).collect();
    let message = build_message(
        0,
        &[
            section1(7, 0, 2013, 3, 23, 6, 0, 0),
            section3_latlon(36, 3, 10_000_000, 0, 10_000_000, 10_000_000, SCAN_STANDARD),
            section4_template0(0, 0, 2, 1, 3, surface_isobaric(50_000), SURFACE_MISSING),
            section5_simple(108, 0.0, 0, 0, 8),
            section6_none(),
            section7(&payload),
        ],
    );
    store.add_layers(parse_one(dir.path(), "global.grib2", message));
    let handle = store.find_all().pop().unwrap();
    assert!(handle.layer().grid().unwrap().is_full_longitude());

    // 170E to 170W: 20 degrees, 2 columns, from both sides of the seam.
    let result = handle
        .get_results(&LatLonBox::new(-5.0, 5.0, 170.0, -170.0))
        .unwrap();
    assert_eq!(result.width(), 2);
    assert_eq!(result.get(0, 0), 17.0);
    assert_eq!(result.get(1, 0), 18.0);
}

#[test]
fn test_interpolate_midpoint_in_time() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());

    // Constant 10 at +3h, constant 20 at +6h.
    let lo = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 10.0, &[0; 6], None);
    let hi = simple_field_message(0, 0, 0, 6, surface_isobaric(50_000), 20.0, &[0; 6], None);
    store.add_layers(parse_one(dir.path(), "lo.grib2", lo));
    store.add_layers(parse_one(dir.path(), "hi.grib2", hi));

    let bbox = LatLonBox::new(39.0, 40.0, -10.0, -8.0);
    let candidates = store.find_all();
    let midpoint = Utc.with_ymd_and_hms(2013, 3, 23, 10, 30, 0).unwrap();
    let interp = interpolate_layers(&bbox, &candidates, midpoint, Some(50_000.0))
        .unwrap()
        .expect("interpolation result");

    assert_eq!(interp.min_efftime(), t(9));
    assert_eq!(interp.max_efftime(), t(12));
    let idx = interp.index_of(midpoint, 50_000.0);
    for y in 0..interp.height() {
        for x in 0..interp.width() {
            assert!((interp.sample(x, y, idx) - 15.0).abs() < 1e-4);
        }
    }

    // Collapsing to a raster carries the request time through.
    let raster = interp.get_results(midpoint, 50_000.0);
    assert_eq!(raster.efftime(), midpoint);
    assert!((raster.get(0, 0) - 15.0).abs() < 1e-4);

    // Requests outside the covered span sample as NaN.
    let outside = interp.index_of(t(18), 50_000.0);
    assert!(interp.sample(0, 0, outside).is_nan());
    let before = interp.index_of(t(6), 50_000.0);
    assert!(interp.sample(0, 0, before).is_nan());
}

#[test]
fn test_interpolate_exact_single_layer() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    let payload = [0x00, 0x0a, 0x14, 0x1e, 0x28, 0x32];
    let m = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 250.0, &payload, None);
    store.add_layers(parse_one(dir.path(), "a.grib2", m));

    let bbox = LatLonBox::new(38.9, 40.1, -10.1, -7.9);
    let candidates = store.find_all();
    let interp = interpolate_layers(&bbox, &candidates, t(9), Some(50_000.0))
        .unwrap()
        .expect("interpolation result");

    // A single exact layer reproduces its own values.
    let idx = interp.index_of(t(9), 50_000.0);
    assert_eq!(interp.sample(0, 0, idx), 250.0);
    assert_eq!(interp.sample(2, 1, idx), 300.0);
}

#[test]
fn test_interpolate_rejects_mixed_parameters() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    let m1 = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 10.0, &[0; 6], None);
    let m2 = simple_field_message(0, 2, 2, 3, surface_isobaric(50_000), 20.0, &[0; 6], None);
    store.add_layers(parse_one(dir.path(), "a.grib2", m1));
    store.add_layers(parse_one(dir.path(), "b.grib2", m2));

    let bbox = LatLonBox::new(39.0, 40.0, -10.0, -8.0);
    let result = interpolate_layers(&bbox, &store.find_all(), t(9), None).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_interpolate_nan_corner_propagates() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    // +3h layer has a bitmap hole at cell 1; +6h is complete.
    let lo = simple_field_message(
        0,
        0,
        0,
        3,
        surface_isobaric(50_000),
        10.0,
        &[0, 0, 0, 0, 0],
        Some(&[0b1011_1100]),
    );
    let hi = simple_field_message(0, 0, 0, 6, surface_isobaric(50_000), 20.0, &[0; 6], None);
    store.add_layers(parse_one(dir.path(), "lo.grib2", lo));
    store.add_layers(parse_one(dir.path(), "hi.grib2", hi));

    let bbox = LatLonBox::new(39.0, 40.0, -10.0, -8.0);
    let midpoint = Utc.with_ymd_and_hms(2013, 3, 23, 10, 30, 0).unwrap();
    let interp = interpolate_layers(&bbox, &store.find_all(), midpoint, Some(50_000.0))
        .unwrap()
        .expect("interpolation result");
    let idx = interp.index_of(midpoint, 50_000.0);
    assert!(interp.sample(1, 0, idx).is_nan());
    assert!((interp.sample(0, 0, idx) - 15.0).abs() < 1e-4);
}

#[test]
fn test_cache_expiry_via_store() {
    let dir = tempdir().unwrap();
    let config = StoreConfig {
        cache_directory: dir.path().join("cache"),
        cache_max_bytes: 1,
        ..StoreConfig::default()
    };
    let store = LayerStore::new(config).unwrap();
    let m = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 250.0, &[0; 6], None);
    store.add_layers(parse_one(dir.path(), "a.grib2", m));
    store.find_all().pop().unwrap().check_load().unwrap();

    // The single cache file exceeds the byte budget and is swept.
    assert_eq!(store.expire_cache(), 1);
}
