//! Equirectangular latitude/longitude grid geometry (grid template 3.0).

use std::cmp::Ordering;

use wx_common::bbox::normalize_lon;

/// An immutable lat/lon grid.
///
/// `(u, v)` are column/row cell coordinates; `index(u, v)` maps them onto the
/// natural linear order of the decoded data array via
/// `offset + u * scale_u + v * scale_v`. The origin cell `(0, 0)` is the
/// first grid point of the message, and `dlat`/`dlon` carry the scan
/// direction in their sign.
#[derive(Debug, Clone)]
pub struct GridLatLon {
    origin_lat: f64,
    origin_lon: f64,
    dlat: f64,
    dlon: f64,
    ni: u32,
    nj: u32,
    scale_u: i64,
    scale_v: i64,
    offset: i64,
    full_longitude: bool,
}

impl GridLatLon {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        origin_lat: f64,
        origin_lon: f64,
        dlat: f64,
        dlon: f64,
        ni: u32,
        nj: u32,
        scale_u: i64,
        scale_v: i64,
        offset: i64,
    ) -> Self {
        // A grid wraps fully when its columns cover the whole parallel.
        let span = (dlon * ni as f64).abs().rem_euclid(360.0);
        let full_longitude = span < 1e-6 || (360.0 - span) < 1e-6;
        Self {
            origin_lat,
            origin_lon: normalize_lon(origin_lon),
            dlat,
            dlon,
            ni,
            nj,
            scale_u,
            scale_v,
            offset,
            full_longitude,
        }
    }

    /// Number of columns (points along a parallel).
    pub fn ni(&self) -> u32 {
        self.ni
    }

    /// Number of rows (points along a meridian).
    pub fn nj(&self) -> u32 {
        self.nj
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.ni as usize * self.nj as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the grid covers all 360 degrees of longitude.
    pub fn is_full_longitude(&self) -> bool {
        self.full_longitude
    }

    /// Linear index of cell `(u, v)`.
    ///
    /// The map is a bijection onto `[0, ni * nj)` for in-range cells.
    pub fn index(&self, u: u32, v: u32) -> usize {
        debug_assert!(u < self.ni && v < self.nj);
        (self.offset + u as i64 * self.scale_u + v as i64 * self.scale_v) as usize
    }

    /// Center of cell `(u, v)` as `(lat, lon)` degrees.
    ///
    /// On fully-wrapping grids the longitude is reduced to `(-180, 180]` so
    /// bounding-box tests are consistent across the seam.
    pub fn center(&self, u: u32, v: u32) -> (f64, f64) {
        let lat = self.origin_lat + v as f64 * self.dlat;
        let lon = self.origin_lon + u as f64 * self.dlon;
        if self.full_longitude {
            (lat, normalize_lon(lon))
        } else {
            (lat, lon)
        }
    }

    /// Interpolate fractional cell coordinates to `(lat, lon)`.
    pub fn transform_axes(&self, u: f64, v: f64) -> (f64, f64) {
        (
            self.origin_lat + v * self.dlat,
            self.origin_lon + u * self.dlon,
        )
    }

    /// Cell step as `(dlat, dlon)`, signed.
    pub fn step(&self) -> (f64, f64) {
        (self.dlat, self.dlon)
    }

    /// Grid origin (first grid point) as `(lat, lon)`.
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_lat, self.origin_lon)
    }

    /// Fractional column of a longitude, unwrapped relative to the origin.
    ///
    /// For fully-wrapping grids the result is reduced into `[0, ni)`;
    /// otherwise it may fall outside the grid and the caller clips.
    pub fn u_of_lon(&self, lon: f64) -> f64 {
        let mut du = (normalize_lon(lon) - self.origin_lon) / self.dlon;
        if self.full_longitude {
            let n = self.ni as f64;
            du = du.rem_euclid(n);
        }
        du
    }

    /// Fractional row of a latitude.
    pub fn v_of_lat(&self, lat: f64) -> f64 {
        (lat - self.origin_lat) / self.dlat
    }

    fn order_key(&self) -> (u32, u32, i64, i64, i64, u64, u64, u64, u64) {
        (
            self.ni,
            self.nj,
            self.scale_u,
            self.scale_v,
            self.offset,
            self.origin_lat.to_bits(),
            self.origin_lon.to_bits(),
            self.dlat.to_bits(),
            self.dlon.to_bits(),
        )
    }
}

// Bit-for-bit equality on the floats: a prerequisite for sharing layers
// across messages.
impl PartialEq for GridLatLon {
    fn eq(&self, other: &Self) -> bool {
        self.order_key() == other.order_key()
    }
}

impl Eq for GridLatLon {}

// Total order over every construction parameter, bit-for-bit on the floats.
// Two layers share a grid exactly when their grids compare equal.
impl Ord for GridLatLon {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

impl PartialOrd for GridLatLon {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> GridLatLon {
        // 3 columns x 2 rows starting at (40N, 10W), 1 degree steps,
        // scanning east and south, i-major.
        GridLatLon::new(40.0, -10.0, -1.0, 1.0, 3, 2, 1, 3, 0)
    }

    #[test]
    fn test_index_bijection() {
        let g = small_grid();
        let mut seen = vec![false; g.len()];
        for v in 0..g.nj() {
            for u in 0..g.ni() {
                let i = g.index(u, v);
                assert!(i < g.len());
                assert!(!seen[i], "index {i} hit twice");
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_centers() {
        let g = small_grid();
        assert_eq!(g.center(0, 0), (40.0, -10.0));
        assert_eq!(g.center(2, 0), (40.0, -8.0));
        assert_eq!(g.center(0, 1), (39.0, -10.0));
    }

    #[test]
    fn test_transform_axes_fractional() {
        let g = small_grid();
        let (lat, lon) = g.transform_axes(0.5, 0.5);
        assert!((lat - 39.5).abs() < 1e-9);
        assert!((lon + 9.5).abs() < 1e-9);
    }

    #[test]
    fn test_full_longitude_detection() {
        let global = GridLatLon::new(90.0, 0.0, -0.5, 0.5, 720, 361, 1, 720, 0);
        assert!(global.is_full_longitude());
        let regional = small_grid();
        assert!(!regional.is_full_longitude());
    }

    #[test]
    fn test_full_longitude_center_canonical() {
        let global = GridLatLon::new(90.0, 0.0, -1.0, 1.0, 360, 181, 1, 360, 0);
        let (_, lon) = global.center(270, 0);
        assert_eq!(lon, -90.0);
    }

    #[test]
    fn test_u_of_lon_wraps() {
        let global = GridLatLon::new(90.0, 0.0, -1.0, 1.0, 360, 181, 1, 360, 0);
        assert!((global.u_of_lon(-90.0) - 270.0).abs() < 1e-9);
        assert!((global.u_of_lon(10.0) - 10.0).abs() < 1e-9);
        let regional = small_grid();
        assert!((regional.u_of_lon(-9.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_equality_is_exact() {
        let a = small_grid();
        let b = small_grid();
        assert_eq!(a, b);
        let c = GridLatLon::new(40.0, -10.0, -1.0, 1.0, 3, 2, 1, 3, 1);
        assert_ne!(a, c);
        let d = GridLatLon::new(40.0, -10.0 + 1e-12, -1.0, 1.0, 3, 2, 1, 3, 0);
        assert_ne!(a, d);
    }
}
