//! Geographic bounding box with antimeridian support.

use serde::{Deserialize, Serialize};

/// Reduce a longitude in degrees to the canonical `(-180, 180]` range.
pub fn normalize_lon(lon: f64) -> f64 {
    let mut l = lon % 360.0;
    if l <= -180.0 {
        l += 360.0;
    } else if l > 180.0 {
        l -= 360.0;
    }
    l
}

/// A geographic rectangle in degrees.
///
/// `west` and `east` are canonical longitudes; `east < west` means the box
/// spans the antimeridian (e.g. west = 170, east = -170 covers 20 degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl LatLonBox {
    /// Create a new box from corner coordinates. Longitudes are normalized.
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west: normalize_lon(west),
            east: normalize_lon(east),
        }
    }

    /// Square box of the given side length centered on a point.
    pub fn around(lat: f64, lon: f64, side_deg: f64) -> Self {
        let half = side_deg * 0.5;
        Self::new(lat - half, lat + half, lon - half, lon + half)
    }

    /// True when the box crosses the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.east < self.west
    }

    /// Longitudinal extent in degrees, wrap-aware.
    pub fn width(&self) -> f64 {
        if self.crosses_antimeridian() {
            self.east - self.west + 360.0
        } else {
            self.east - self.west
        }
    }

    /// Latitudinal extent in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Check whether a point lies inside the box, wrap-aware in longitude.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if lat < self.south || lat > self.north {
            return false;
        }
        let lon = normalize_lon(lon);
        if self.crosses_antimeridian() {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        }
    }
}
