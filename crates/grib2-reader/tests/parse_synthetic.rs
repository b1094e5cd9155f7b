//! Parser and decoder tests over synthetic GRIB2 files.

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use grib2_reader::{parse_file, PackingParams};
use test_utils::*;

#[test]
fn test_parse_single_message_and_decode() {
    let dir = tempdir().unwrap();
    let payload = [0x00, 0x0a, 0x14, 0x1e, 0x28, 0x32];
    let message = simple_field_message(
        0,
        0,
        0,
        3,
        surface_isobaric(50_000),
        250.0,
        &payload,
        None,
    );
    let path = write_grib_file(dir.path(), "single.grib2", &[message]);

    let layers = parse_file(&path).unwrap();
    assert_eq!(layers.len(), 1);
    let layer = &layers[0];

    assert_eq!(layer.param().packed(), 0);
    assert_eq!(layer.parameter().unwrap().abbrev(), Some("TMP"));
    assert_eq!(layer.center(), 7);
    assert_eq!(
        layer.reftime(),
        Utc.with_ymd_and_hms(2013, 3, 23, 6, 0, 0).unwrap()
    );
    assert_eq!(
        layer.efftime(),
        Utc.with_ymd_and_hms(2013, 3, 23, 9, 0, 0).unwrap()
    );
    assert_eq!(layer.surface1().stype, 100);
    assert_eq!(layer.surface1().value, 50_000.0);
    assert!(layer.surface2().is_missing());

    let grid = layer.grid().unwrap();
    assert_eq!(grid.ni(), 3);
    assert_eq!(grid.nj(), 2);
    assert_eq!(grid.center(0, 0), (40.0, -10.0));
    assert_eq!(grid.center(2, 1), (39.0, -8.0));

    let data = layer.decode().unwrap();
    assert_eq!(data, vec![250.0, 260.0, 270.0, 280.0, 290.0, 300.0]);
}

#[test]
fn test_parse_message_with_bitmap() {
    let dir = tempdir().unwrap();
    // 6 cells, every other one valid; only 3 values encoded.
    let payload = [0x00, 0x0a, 0x14];
    let message = simple_field_message(
        0,
        0,
        0,
        3,
        surface_isobaric(50_000),
        250.0,
        &payload,
        Some(&[0b1010_1010]),
    );
    let path = write_grib_file(dir.path(), "bitmap.grib2", &[message]);

    let layers = parse_file(&path).unwrap();
    assert_eq!(layers.len(), 1);
    let data = layers[0].decode().unwrap();
    assert_eq!(data.len(), 6);
    assert_eq!(data[0], 250.0);
    assert!(data[1].is_nan());
    assert_eq!(data[2], 260.0);
    assert!(data[3].is_nan());
    assert_eq!(data[4], 270.0);
    assert!(data[5].is_nan());
}

#[test]
fn test_multiple_messages_per_file() {
    let dir = tempdir().unwrap();
    let m1 = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 250.0, &[0; 6], None);
    let m2 = simple_field_message(0, 2, 2, 3, surface_isobaric(50_000), 10.0, &[0; 6], None);
    let path = write_grib_file(dir.path(), "two.grib2", &[m1, m2]);

    let layers = parse_file(&path).unwrap();
    assert_eq!(layers.len(), 2);
    // The identical grid is shared, not re-allocated.
    assert!(std::sync::Arc::ptr_eq(
        layers[0].grid().unwrap(),
        layers[1].grid().unwrap()
    ));
}

#[test]
fn test_garbage_between_messages_is_skipped() {
    let dir = tempdir().unwrap();
    let m1 = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 250.0, &[0; 6], None);
    let m2 = simple_field_message(0, 2, 2, 3, surface_isobaric(50_000), 10.0, &[0; 6], None);
    let path = dir.path().join("garbage.grib2");
    let mut bytes = b"leading junk".to_vec();
    bytes.extend_from_slice(&m1);
    bytes.extend_from_slice(b"some stray bytes between messages");
    bytes.extend_from_slice(&m2);
    std::fs::write(&path, bytes).unwrap();

    let layers = parse_file(&path).unwrap();
    assert_eq!(layers.len(), 2);
}

#[test]
fn test_truncated_file_returns_partial_results() {
    let dir = tempdir().unwrap();
    let m1 = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 250.0, &[0; 6], None);
    let m2 = simple_field_message(0, 2, 2, 3, surface_isobaric(50_000), 10.0, &[0; 6], None);
    let path = dir.path().join("truncated.grib2");
    let mut bytes = m1.clone();
    bytes.extend_from_slice(&m2[..m2.len() / 2]);
    std::fs::write(&path, bytes).unwrap();

    let layers = parse_file(&path).unwrap();
    assert_eq!(layers.len(), 1);
}

#[test]
fn test_unsupported_grid_template_keeps_metadata() {
    let dir = tempdir().unwrap();
    // Mercator grid template (10) is not implemented.
    let mut sec3 = section3_latlon(3, 2, 40_000_000, -10_000_000, 1_000_000, 1_000_000, 0);
    sec3[12..14].copy_from_slice(&10u16.to_be_bytes());
    let payload = [0u8; 6];
    let message = build_message(
        0,
        &[
            section1(7, 0, 2013, 3, 23, 6, 0, 0),
            sec3,
            section4_template0(0, 0, 2, 1, 3, surface_isobaric(50_000), SURFACE_MISSING),
            section5_simple(6, 250.0, 0, 0, 8),
            section6_none(),
            section7(&payload),
        ],
    );
    let path = write_grib_file(dir.path(), "badgrid.grib2", &[message]);

    let layers = parse_file(&path).unwrap();
    assert_eq!(layers.len(), 1);
    assert!(layers[0].grid().is_none());
    assert!(layers[0].decode().is_err());
}

#[test]
fn test_unsupported_product_template_skips_field() {
    let dir = tempdir().unwrap();
    // Ensemble product template (1) is not implemented; the field is
    // dropped but the file still parses.
    let mut sec4 =
        section4_template0(0, 0, 2, 1, 3, surface_isobaric(50_000), SURFACE_MISSING);
    sec4[7..9].copy_from_slice(&1u16.to_be_bytes());
    let message = build_message(
        0,
        &[
            section1(7, 0, 2013, 3, 23, 6, 0, 0),
            section3_latlon(3, 2, 40_000_000, -10_000_000, 1_000_000, 1_000_000, 0),
            sec4,
            section5_simple(6, 250.0, 0, 0, 8),
            section6_none(),
            section7(&[0u8; 6]),
        ],
    );
    let path = write_grib_file(dir.path(), "badproduct.grib2", &[message]);
    let layers = parse_file(&path).unwrap();
    assert!(layers.is_empty());
}

#[test]
fn test_complex_packing_message() {
    let dir = tempdir().unwrap();
    // One group: ref=100 (8 bits), width 4, length 4, missing mgmt 1.
    let spec = ComplexSpec {
        ndata: 4,
        reference: 0.0,
        e: 0,
        d: 0,
        bits: 8,
        missing_mgmt: 1,
        primary_missing: u32::MAX,
        secondary_missing: u32::MAX,
        ngroups: 1,
        ref_group_width: 4,
        nbits_group_width: 0,
        ref_group_length: 4,
        incr_group_length: 1,
        last_group_length: 4,
        nbits_group_length: 0,
    };
    // 2x2 grid; payload: group ref byte then nibbles 0x0 0xF 0x5 0x3.
    let message = build_message(
        0,
        &[
            section1(7, 0, 2013, 3, 23, 6, 0, 0),
            section3_latlon(2, 2, 40_000_000, -10_000_000, 1_000_000, 1_000_000, 0),
            section4_template0(0, 0, 2, 1, 3, surface_isobaric(50_000), SURFACE_MISSING),
            section5_complex(&spec),
            section6_none(),
            section7(&[100, 0x0f, 0x53]),
        ],
    );
    let path = write_grib_file(dir.path(), "complex.grib2", &[message]);

    let layers = parse_file(&path).unwrap();
    assert_eq!(layers.len(), 1);
    assert!(matches!(layers[0].packing(), PackingParams::Complex(_)));
    let data = layers[0].decode().unwrap();
    assert_eq!(data[0], 100.0);
    assert!(data[1].is_nan());
    assert_eq!(data[2], 105.0);
    assert_eq!(data[3], 103.0);
}

#[test]
fn test_spatial_differencing_message() {
    let dir = tempdir().unwrap();
    let spec = ComplexSpec {
        ndata: 4,
        reference: 0.0,
        e: 0,
        d: 0,
        bits: 8,
        missing_mgmt: 0,
        primary_missing: 0,
        secondary_missing: 0,
        ngroups: 1,
        ref_group_width: 4,
        nbits_group_width: 0,
        ref_group_length: 4,
        incr_group_length: 1,
        last_group_length: 4,
        nbits_group_length: 0,
    };
    // Order 1, init 20, min -1, deltas encoded as 1, 2, 2, 0.
    let message = build_message(
        0,
        &[
            section1(7, 0, 2013, 3, 23, 6, 0, 0),
            section3_latlon(2, 2, 40_000_000, -10_000_000, 1_000_000, 1_000_000, 0),
            section4_template0(0, 0, 2, 1, 3, surface_isobaric(50_000), SURFACE_MISSING),
            section5_spatdiff(&spec, 1, 1),
            section6_none(),
            section7(&[20, 0x81, 0, 0x12, 0x20]),
        ],
    );
    let path = write_grib_file(dir.path(), "spatdiff.grib2", &[message]);

    let layers = parse_file(&path).unwrap();
    assert_eq!(layers.len(), 1);
    assert!(matches!(
        layers[0].packing(),
        PackingParams::ComplexSpatialDiff(_)
    ));
    let data = layers[0].decode().unwrap();
    assert_eq!(data, vec![20.0, 21.0, 22.0, 21.0]);
}

#[test]
fn test_statistical_product_template() {
    let dir = tempdir().unwrap();
    // Accumulated precipitation over the 6 hours ending at 12Z.
    let message = build_message(
        0,
        &[
            section1(7, 0, 2013, 3, 23, 6, 0, 0),
            section3_latlon(3, 2, 40_000_000, -10_000_000, 1_000_000, 1_000_000, SCAN_STANDARD),
            section4_template8(
                1,
                8,
                1,
                6,
                surface_typed(1),
                (2013, 3, 23, 12, 0, 0),
                1, // accumulation
                6,
            ),
            section5_simple(6, 0.0, 0, 0, 8),
            section6_none(),
            section7(&[0; 6]),
        ],
    );
    let path = write_grib_file(dir.path(), "apcp.grib2", &[message]);

    let layers = parse_file(&path).unwrap();
    assert_eq!(layers.len(), 1);
    let layer = &layers[0];
    assert_eq!(layer.parameter().unwrap().abbrev(), Some("APCP"));
    assert_eq!(
        layer.efftime(),
        Utc.with_ymd_and_hms(2013, 3, 23, 12, 0, 0).unwrap()
    );
    assert_eq!(
        layer.interval_end(),
        Some(Utc.with_ymd_and_hms(2013, 3, 23, 12, 0, 0).unwrap())
    );
    // The statistical spec list is retained uninterpreted.
    assert_eq!(layer.stat_ranges().len(), 1);
    assert_eq!(layer.stat_ranges()[0].process, 1);
    assert_eq!(layer.stat_ranges()[0].length, 6);
}

#[test]
fn test_parse_directory() {
    let dir = tempdir().unwrap();
    let m1 = simple_field_message(0, 0, 0, 3, surface_isobaric(50_000), 250.0, &[0; 6], None);
    let m2 = simple_field_message(0, 2, 2, 6, surface_isobaric(50_000), 10.0, &[0; 6], None);
    write_grib_file(dir.path(), "a.grib2", &[m1]);
    write_grib_file(dir.path(), "b.grib2", &[m2]);
    std::fs::write(dir.path().join("notes.txt"), "not a grib file").unwrap();

    let layers = grib2_reader::parse_directory(dir.path()).unwrap();
    assert_eq!(layers.len(), 2);
    // Deterministic key order.
    assert!(layers[0].key() < layers[1].key());
}
