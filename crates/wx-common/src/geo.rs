//! Great-circle navigation and solar geometry on a spherical earth.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Mean earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Great-circle distance between two points in nautical miles (haversine).
pub fn great_circle_distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = (lat2 - lat1).to_radians();
    let dlam = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlam / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin() * EARTH_RADIUS_NM
}

/// Initial great-circle course from point 1 to point 2, degrees true.
pub fn initial_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dlam = (lon2 - lon1).to_radians();
    let y = dlam.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlam.cos();
    let mut brg = y.atan2(x).to_degrees();
    if brg < 0.0 {
        brg += 360.0;
    }
    brg
}

/// Point at fraction `f` (0..=1) along the great circle from 1 to 2.
///
/// Returns `(lat, lon)` in degrees. Antipodal endpoints have no unique
/// great circle; the caller is expected to densify legs far shorter than
/// half the circumference.
pub fn intermediate_point(lat1: f64, lon1: f64, lat2: f64, lon2: f64, f: f64) -> (f64, f64) {
    let (phi1, lam1) = (lat1.to_radians(), lon1.to_radians());
    let (phi2, lam2) = (lat2.to_radians(), lon2.to_radians());
    let delta = great_circle_distance_nm(lat1, lon1, lat2, lon2) / EARTH_RADIUS_NM;
    if delta < 1e-12 {
        return (lat1, lon1);
    }
    let a = ((1.0 - f) * delta).sin() / delta.sin();
    let b = (f * delta).sin() / delta.sin();
    let x = a * phi1.cos() * lam1.cos() + b * phi2.cos() * lam2.cos();
    let y = a * phi1.cos() * lam1.sin() + b * phi2.cos() * lam2.sin();
    let z = a * phi1.sin() + b * phi2.sin();
    let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
    let lon = y.atan2(x).to_degrees();
    (lat, lon)
}

/// Solar elevation angle above the horizon in degrees.
///
/// Low-precision NOAA ephemeris, adequate for day/dusk/night
/// classification (errors well under one degree).
pub fn solar_elevation_deg(lat: f64, lon: f64, time: DateTime<Utc>) -> f64 {
    let day_of_year = time.ordinal() as f64;
    let hours = time.hour() as f64
        + time.minute() as f64 / 60.0
        + time.second() as f64 / 3600.0;

    // Fractional year in radians.
    let gamma = 2.0 * std::f64::consts::PI / 365.0 * (day_of_year - 1.0 + (hours - 12.0) / 24.0);

    // Equation of time (minutes) and solar declination (radians).
    let eqtime = 229.18
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin());
    let decl = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin();

    let time_offset = eqtime + 4.0 * lon;
    let tst = hours * 60.0 + time_offset;
    let hour_angle = (tst / 4.0 - 180.0).to_radians();

    let phi = lat.to_radians();
    let cos_zenith = phi.sin() * decl.sin() + phi.cos() * decl.cos() * hour_angle.cos();
    90.0 - cos_zenith.clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_distance_equator_degree() {
        // One degree of longitude at the equator is 60 nm.
        let d = great_circle_distance_nm(0.0, 0.0, 0.0, 1.0);
        assert!((d - 60.0).abs() < 0.2, "got {d}");
    }

    #[test]
    fn test_distance_zero() {
        assert!(great_circle_distance_nm(47.0, 8.0, 47.0, 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_due_east() {
        let b = initial_bearing_deg(0.0, 0.0, 0.0, 10.0);
        assert!((b - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_intermediate_midpoint() {
        let (lat, lon) = intermediate_point(40.0, -10.0, 40.0, 0.0, 0.5);
        assert!((lon + 5.0).abs() < 1e-6);
        // Great circle midpoint lies slightly poleward of the parallel.
        assert!(lat >= 40.0 && lat < 40.3);
    }

    #[test]
    fn test_solar_elevation_noon_equator() {
        // Near the March equinox, local noon at (0, 0) puts the sun close
        // to the zenith.
        let t = Utc.with_ymd_and_hms(2013, 3, 20, 12, 0, 0).unwrap();
        let e = solar_elevation_deg(0.0, 0.0, t);
        assert!(e > 85.0, "got {e}");
        // Midnight puts it far below the horizon.
        let t = Utc.with_ymd_and_hms(2013, 3, 20, 0, 0, 0).unwrap();
        let e = solar_elevation_deg(0.0, 0.0, t);
        assert!(e < -85.0, "got {e}");
    }
}
