//! End-to-end profile builder test over a synthetic model run.

use chrono::{Duration, TimeZone, Utc};
use tempfile::tempdir;

use grib2_reader::parse_file;
use layer_store::{LayerStore, StoreConfig};
use route_profile::{ProfileBuilder, ProfileConfig, Waypoint, WxFlags, ISOBARIC_LEVELS_HPA};
use test_utils::*;

/// A single-field message on a grid covering the test route
/// (lats 31..50, lons -20..9, one degree).
fn field_message(
    category: u8,
    number: u8,
    surface: (u8, i32, u32),
    reference: f32,
) -> Vec<u8> {
    let (ni, nj) = (30u32, 20u32);
    let payload = vec![0u8; (ni * nj) as usize];
    build_message(
        0,
        &[
            section1(7, 0, 2013, 3, 23, 6, 0, 0),
            section3_latlon(
                ni,
                nj,
                50_000_000,
                -20_000_000,
                1_000_000,
                1_000_000,
                SCAN_STANDARD,
            ),
            section4_template0(category, number, 2, 1, 3, surface, SURFACE_MISSING),
            section5_simple(ni * nj, reference, 0, 0, 8),
            section6_none(),
            section7(&payload),
        ],
    )
}

#[test]
fn test_route_profile() {
    let dir = tempdir().unwrap();
    let store = LayerStore::new(StoreConfig {
        cache_directory: dir.path().join("cache"),
        ..StoreConfig::default()
    })
    .unwrap();

    // A full isobaric stack of T / RH / U / V at one valid time, plus the
    // surface fields the scalar samples come from.
    let mut messages = Vec::new();
    for &level in &ISOBARIC_LEVELS_HPA {
        let surface = surface_isobaric(level as u32 * 100);
        messages.push(field_message(0, 0, surface, 250.0)); // TMP
        messages.push(field_message(1, 1, surface, 50.0)); // RH
        messages.push(field_message(2, 2, surface, 10.0)); // UGRD
        messages.push(field_message(2, 3, surface, -5.0)); // VGRD
    }
    messages.push(field_message(3, 5, surface_typed(4), 3500.0)); // 0C isotherm HGT
    messages.push(field_message(3, 5, surface_typed(7), 11_000.0)); // tropopause HGT
    messages.push(field_message(3, 18, surface_typed(1), 800.0)); // HPBL
    messages.push(field_message(6, 1, surface_typed(211), 0.0)); // boundary cloud
    messages.push(field_message(6, 3, surface_typed(214), 40.0)); // low cloud cover
    messages.push(field_message(3, 0, surface_typed(212), 90_000.0)); // low cloud base
    messages.push(field_message(3, 0, surface_typed(213), 80_000.0)); // low cloud top
    messages.push(field_message(1, 8, surface_typed(1), 1.5)); // APCP
    messages.push(field_message(1, 33, surface_typed(1), 1.0)); // CRAIN
    messages.push(field_message(1, 36, surface_typed(1), 0.0)); // CSNOW
    messages.push(field_message(7, 6, surface_typed(1), 120.0)); // CAPE

    let path = write_grib_file(dir.path(), "run.grib2", &messages);
    let layers = parse_file(&path).unwrap();
    assert_eq!(layers.len(), messages.len());
    assert_eq!(store.add_layers(layers), messages.len());

    // Six waypoints along the 40th parallel from 10W to 0E, one hour total.
    let route: Vec<Waypoint> = (0..6)
        .map(|i| Waypoint {
            lat: 40.0,
            lon: -10.0 + 2.0 * i as f64,
            alt_ft: 10_000.0,
            time_offset: Duration::minutes(12 * i as i64),
        })
        .collect();
    let route_start = Utc.with_ymd_and_hms(2013, 3, 23, 9, 0, 0).unwrap();

    // Sampling interval longer than each ~92 nm leg: one point per waypoint.
    let config = ProfileConfig {
        sampling_nautical_miles: 100.0,
        ..ProfileConfig::default()
    };
    let profile = ProfileBuilder::with_config(&store, config)
        .build(&route, route_start)
        .unwrap();

    assert_eq!(profile.len(), 6);
    assert!((profile.dist_nm() - 460.0).abs() < 10.0);

    for point in &profile {
        // Every isobaric level carries finite sounding values.
        for surface in &point.surfaces {
            assert!((surface.temperature - 250.0).abs() < 0.5);
            assert!((surface.relative_humidity - 50.0).abs() < 0.5);
            assert!((surface.u_wind - 10.0).abs() < 0.5);
            assert!((surface.v_wind + 5.0).abs() < 0.5);
            // Constant wind means zero shear.
            assert!(surface.h_wind_shear.abs() < 1e-6);
            assert!(surface.v_wind_shear.abs() < 1e-6);
        }

        assert!((point.zero_deg_isotherm_m - 3500.0).abs() < 1.0);
        assert!((point.tropopause_m - 11_000.0).abs() < 1.0);
        assert!((point.boundary_layer_height_m - 800.0).abs() < 1.0);

        // Low cloud: 40% cover between 900 and 800 hPa.
        assert!((point.cloud_low.cover - 40.0).abs() < 0.5);
        assert!(point.cloud_low.base_m < point.cloud_low.top_m);
        assert!(point.cloud_low.base_m > 500.0 && point.cloud_low.top_m < 3000.0);
        // No mid or high cloud layers in the registry.
        assert!(point.cloud_mid.cover.is_nan());
        assert!(point.cloud_high.cover.is_nan());

        assert!((point.precip - 1.5).abs() < 0.1);
        assert!((point.cape - 120.0).abs() < 1.0);

        // Categorical rain yes, snow no; mid-morning in March is daylight.
        assert!(point.flags.contains(WxFlags::RAIN));
        assert!(!point.flags.contains(WxFlags::SNOW));
        assert!(point.flags.is_day());
    }

    // The whole profile came from the 06Z run at one valid time.
    let t6 = Utc.with_ymd_and_hms(2013, 3, 23, 6, 0, 0).unwrap();
    let t9 = Utc.with_ymd_and_hms(2013, 3, 23, 9, 0, 0).unwrap();
    assert_eq!(profile.min_reftime(), Some(t6));
    assert_eq!(profile.max_reftime(), Some(t6));
    assert_eq!(profile.min_efftime(), Some(t9));
    assert!(profile.max_efftime().unwrap() >= t9);
}

#[test]
fn test_empty_route_is_an_error() {
    let dir = tempdir().unwrap();
    let store = LayerStore::new(StoreConfig {
        cache_directory: dir.path().join("cache"),
        ..StoreConfig::default()
    })
    .unwrap();
    let start = Utc.with_ymd_and_hms(2013, 3, 23, 9, 0, 0).unwrap();
    assert!(ProfileBuilder::new(&store).build(&[], start).is_err());
}
