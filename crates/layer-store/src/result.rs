//! Rasterized region results: plain scalars ([`LayerResult`]) and
//! time/level interpolation coefficients ([`LayerInterpolateResult`]).

use std::sync::Arc;

use chrono::{DateTime, Utc};

use wx_common::bbox::normalize_lon;
use wx_common::LatLonBox;

use crate::handle::LayerHandle;

/// A rasterized rectangular region of one layer.
///
/// Rows run north to south, columns west to east. NaN marks missing or
/// out-of-bitmap cells. Immutable after construction.
#[derive(Debug, Clone)]
pub struct LayerResult {
    layer: Arc<LayerHandle>,
    bbox: LatLonBox,
    width: usize,
    height: usize,
    efftime: DateTime<Utc>,
    min_reftime: DateTime<Utc>,
    max_reftime: DateTime<Utc>,
    surface1_value: f64,
    data: Vec<f32>,
}

impl LayerResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        layer: Arc<LayerHandle>,
        bbox: LatLonBox,
        width: usize,
        height: usize,
        efftime: DateTime<Utc>,
        min_reftime: DateTime<Utc>,
        max_reftime: DateTime<Utc>,
        surface1_value: f64,
        data: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            layer,
            bbox,
            width,
            height,
            efftime,
            min_reftime,
            max_reftime,
            surface1_value,
            data,
        }
    }

    pub fn layer(&self) -> &Arc<LayerHandle> {
        &self.layer
    }

    pub fn bbox(&self) -> &LatLonBox {
        &self.bbox
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn efftime(&self) -> DateTime<Utc> {
        self.efftime
    }

    pub fn min_reftime(&self) -> DateTime<Utc> {
        self.min_reftime
    }

    pub fn max_reftime(&self) -> DateTime<Utc> {
        self.max_reftime
    }

    pub fn surface1_value(&self) -> f64 {
        self.surface1_value
    }

    /// Value of raster cell `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        if x >= self.width || y >= self.height {
            return f32::NAN;
        }
        self.data[y * self.width + x]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Size of one raster cell as `(dlat, dlon)`, both positive.
    pub fn pixel_size(&self) -> (f64, f64) {
        (
            self.bbox.height() / self.height.max(1) as f64,
            self.bbox.width() / self.width.max(1) as f64,
        )
    }

    /// Geographic center of raster cell `(x, y)`.
    pub fn center_of(&self, x: usize, y: usize) -> (f64, f64) {
        let (ph, pw) = self.pixel_size();
        let lat = self.bbox.north - (y as f64 + 0.5) * ph;
        let lon = normalize_lon(self.bbox.west + (x as f64 + 0.5) * pw);
        (lat, lon)
    }

    /// Nearest-cell sample at a geographic point; NaN outside the raster.
    pub fn value_at(&self, lat: f64, lon: f64) -> f32 {
        let (ph, pw) = self.pixel_size();
        if ph <= 0.0 || pw <= 0.0 {
            return f32::NAN;
        }
        let y = (self.bbox.north - lat) / ph;
        let mut dlon = normalize_lon(lon) - self.bbox.west;
        if dlon < 0.0 {
            dlon += 360.0;
        }
        let x = dlon / pw;
        if y < 0.0 || x < 0.0 {
            return f32::NAN;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return f32::NAN;
        }
        self.get(x, y)
    }
}

/// Normalized interpolation indices: time and surface-value fractions.
#[derive(Debug, Clone, Copy)]
pub struct InterpIndex {
    pub idx_time: f32,
    pub idx_surface: f32,
}

/// Per-cell corner coefficients for bilinear blending across
/// (effective time, surface value).
///
/// Slot order: `[lo-time/lo-surface, hi-time/lo-surface,
/// lo-time/hi-surface, hi-time/hi-surface]`.
#[derive(Debug, Clone, Copy)]
pub struct LinInterp {
    p: [f32; 4],
}

impl LinInterp {
    pub const NAN: LinInterp = LinInterp {
        p: [f32::NAN; 4],
    };

    pub fn new(p0: f32, p1: f32, p2: f32, p3: f32) -> Self {
        Self { p: [p0, p1, p2, p3] }
    }

    pub fn get(&self, slot: usize) -> f32 {
        self.p[slot]
    }

    /// Evaluate at normalized indices. Corners with zero weight do not
    /// contribute, so absent (NaN) corners poison only samples that
    /// actually touch them.
    pub fn evaluate(&self, idx: InterpIndex) -> f32 {
        let t = idx.idx_time;
        let s = idx.idx_surface;
        if t.is_nan() || s.is_nan() {
            return f32::NAN;
        }
        let weights = [
            (1.0 - t) * (1.0 - s),
            t * (1.0 - s),
            (1.0 - t) * s,
            t * s,
        ];
        let mut acc = 0.0f32;
        for (w, p) in weights.iter().zip(self.p.iter()) {
            if *w == 0.0 {
                continue;
            }
            if p.is_nan() {
                return f32::NAN;
            }
            acc += w * p;
        }
        acc
    }

    pub fn is_nan(&self) -> bool {
        self.p.iter().all(|v| v.is_nan())
    }
}

/// A rasterized region whose cells hold blending coefficients over up to
/// four neighboring layers in (effective time, surface value).
#[derive(Debug, Clone)]
pub struct LayerInterpolateResult {
    layer: Arc<LayerHandle>,
    bbox: LatLonBox,
    width: usize,
    height: usize,
    min_efftime: DateTime<Utc>,
    max_efftime: DateTime<Utc>,
    min_reftime: DateTime<Utc>,
    max_reftime: DateTime<Utc>,
    min_surface1: f64,
    max_surface1: f64,
    data: Vec<LinInterp>,
}

impl LayerInterpolateResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        layer: Arc<LayerHandle>,
        bbox: LatLonBox,
        width: usize,
        height: usize,
        min_efftime: DateTime<Utc>,
        max_efftime: DateTime<Utc>,
        min_reftime: DateTime<Utc>,
        max_reftime: DateTime<Utc>,
        min_surface1: f64,
        max_surface1: f64,
        data: Vec<LinInterp>,
    ) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            layer,
            bbox,
            width,
            height,
            min_efftime,
            max_efftime,
            min_reftime,
            max_reftime,
            min_surface1,
            max_surface1,
            data,
        }
    }

    pub fn layer(&self) -> &Arc<LayerHandle> {
        &self.layer
    }

    pub fn bbox(&self) -> &LatLonBox {
        &self.bbox
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn min_efftime(&self) -> DateTime<Utc> {
        self.min_efftime
    }

    pub fn max_efftime(&self) -> DateTime<Utc> {
        self.max_efftime
    }

    pub fn min_reftime(&self) -> DateTime<Utc> {
        self.min_reftime
    }

    pub fn max_reftime(&self) -> DateTime<Utc> {
        self.max_reftime
    }

    pub fn min_surface1(&self) -> f64 {
        self.min_surface1
    }

    pub fn max_surface1(&self) -> f64 {
        self.max_surface1
    }

    pub fn get(&self, x: usize, y: usize) -> LinInterp {
        if x >= self.width || y >= self.height {
            return LinInterp::NAN;
        }
        self.data[y * self.width + x]
    }

    /// Normalized time index for a requested effective time: NaN outside
    /// the covered span, 0 when the span is a single time.
    pub fn index_of_efftime(&self, efftime: DateTime<Utc>) -> f32 {
        span_index(
            (efftime - self.min_efftime).num_seconds() as f64,
            (self.max_efftime - self.min_efftime).num_seconds() as f64,
        )
    }

    /// Normalized surface index for a requested surface value: NaN outside
    /// the covered span, 0 when the span is a single value.
    pub fn index_of_surface1(&self, value: f64) -> f32 {
        if self.min_surface1.is_nan() || self.max_surface1.is_nan() {
            // No surface dimension in this result.
            return 0.0;
        }
        span_index(value - self.min_surface1, self.max_surface1 - self.min_surface1)
    }

    pub fn index_of(&self, efftime: DateTime<Utc>, surface1_value: f64) -> InterpIndex {
        InterpIndex {
            idx_time: self.index_of_efftime(efftime),
            idx_surface: self.index_of_surface1(surface1_value),
        }
    }

    /// Sample one raster cell at the given indices.
    pub fn sample(&self, x: usize, y: usize, idx: InterpIndex) -> f32 {
        self.get(x, y).evaluate(idx)
    }

    /// Nearest-cell sample at a geographic point.
    pub fn value_at(&self, lat: f64, lon: f64, idx: InterpIndex) -> f32 {
        let (ph, pw) = (
            self.bbox.height() / self.height.max(1) as f64,
            self.bbox.width() / self.width.max(1) as f64,
        );
        if ph <= 0.0 || pw <= 0.0 {
            return f32::NAN;
        }
        let y = (self.bbox.north - lat) / ph;
        let mut dlon = normalize_lon(lon) - self.bbox.west;
        if dlon < 0.0 {
            dlon += 360.0;
        }
        let x = dlon / pw;
        if y < 0.0 || x < 0.0 {
            return f32::NAN;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return f32::NAN;
        }
        self.sample(x, y, idx)
    }

    /// Collapse to a scalar raster at one `(effective time, surface value)`.
    pub fn get_results(&self, efftime: DateTime<Utc>, surface1_value: f64) -> LayerResult {
        let idx = self.index_of(efftime, surface1_value);
        let data = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| self.sample(x, y, idx))
            .collect();
        LayerResult::new(
            Arc::clone(&self.layer),
            self.bbox,
            self.width,
            self.height,
            efftime,
            self.min_reftime,
            self.max_reftime,
            surface1_value,
            data,
        )
    }
}

/// Normalized position of `offset` within a span of `extent`; 0 when the
/// span is degenerate (a single corner), NaN outside `[0, extent]`.
fn span_index(offset: f64, extent: f64) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    if !(0.0..=extent).contains(&offset) {
        return f32::NAN;
    }
    (offset / extent).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lin_interp_corners() {
        let li = LinInterp::new(10.0, 20.0, 30.0, 40.0);
        let at = |t, s| {
            li.evaluate(InterpIndex {
                idx_time: t,
                idx_surface: s,
            })
        };
        assert_eq!(at(0.0, 0.0), 10.0);
        assert_eq!(at(1.0, 0.0), 20.0);
        assert_eq!(at(0.0, 1.0), 30.0);
        assert_eq!(at(1.0, 1.0), 40.0);
        assert_eq!(at(0.5, 0.5), 25.0);
    }

    #[test]
    fn test_lin_interp_zero_weight_nan_skipped() {
        // Only the lo-time corners exist.
        let li = LinInterp::new(10.0, f32::NAN, f32::NAN, f32::NAN);
        let at = |t, s| {
            li.evaluate(InterpIndex {
                idx_time: t,
                idx_surface: s,
            })
        };
        assert_eq!(at(0.0, 0.0), 10.0);
        assert!(at(0.5, 0.0).is_nan());
    }

    #[test]
    fn test_lin_interp_contributing_nan_poisons() {
        let li = LinInterp::new(10.0, f32::NAN, 30.0, 40.0);
        assert!(li
            .evaluate(InterpIndex {
                idx_time: 0.5,
                idx_surface: 0.5
            })
            .is_nan());
    }

    #[test]
    fn test_span_index() {
        assert_eq!(span_index(0.0, 1000.0), 0.0);
        assert_eq!(span_index(500.0, 1000.0), 0.5);
        assert_eq!(span_index(1000.0, 1000.0), 1.0);
        // Requests beyond the span are out of bounds.
        assert!(span_index(1500.0, 1000.0).is_nan());
        assert!(span_index(-1.0, 1000.0).is_nan());
        // A degenerate span (single corner) always indexes that corner.
        assert_eq!(span_index(0.0, 0.0), 0.0);
        assert_eq!(span_index(5.0, 0.0), 0.0);
    }
}
