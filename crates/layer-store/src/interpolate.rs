//! Combine up to four neighboring layers across (effective time, surface
//! value) into one raster of blending coefficients.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use wx_common::LatLonBox;

use crate::handle::LayerHandle;
use crate::result::{LayerInterpolateResult, LayerResult, LinInterp};
use crate::StoreResult;

/// Build a [`LayerInterpolateResult`] over `bbox` from candidate layers.
///
/// The candidates must share one parameter and one grid and fall on at most
/// two distinct effective times and two distinct first-surface values (the
/// corners of the interpolation box); anything else yields `None`. Passing
/// `None` for `surface1_value` interpolates in time only.
///
/// Candidates are decoded on demand; the per-cell coefficient order matches
/// [`LinInterp`].
pub fn interpolate_layers(
    bbox: &LatLonBox,
    candidates: &[Arc<LayerHandle>],
    efftime: DateTime<Utc>,
    surface1_value: Option<f64>,
) -> StoreResult<Option<LayerInterpolateResult>> {
    let Some(first) = candidates.first() else {
        return Ok(None);
    };

    let param = first.layer().param();
    let Some(grid) = first.layer().grid() else {
        warn!("interpolation candidate has no grid");
        return Ok(None);
    };
    for handle in candidates {
        let layer = handle.layer();
        if layer.param() != param {
            warn!(
                a = %param,
                b = %layer.param(),
                "interpolation candidates mix parameters"
            );
            return Ok(None);
        }
        match layer.grid() {
            Some(g) if g == grid => {}
            _ => {
                warn!("interpolation candidates mix grids");
                return Ok(None);
            }
        }
    }

    // Corner coordinates of the (time x surface) box: the candidate values
    // bracketing the request. Typically the caller already passes exactly
    // the 1-4 bracketing layers.
    let mut times: Vec<DateTime<Utc>> = candidates.iter().map(|h| h.layer().efftime()).collect();
    times.sort();
    times.dedup();
    let t_lo = times
        .iter()
        .rev()
        .find(|&&t| t <= efftime)
        .copied()
        .unwrap_or(times[0]);
    let t_hi = times
        .iter()
        .find(|&&t| t >= efftime)
        .copied()
        .unwrap_or(*times.last().unwrap_or(&times[0]));

    let surfaces: Option<(f64, f64)> = match surface1_value {
        None => None,
        Some(requested) => {
            let mut values: Vec<f64> = candidates
                .iter()
                .map(|h| h.layer().surface1().value)
                .collect();
            values.sort_by(f64::total_cmp);
            values.dedup_by(|a, b| surface_close(*a, *b));
            let lo = values
                .iter()
                .rev()
                .find(|&&v| v <= requested || surface_close(v, requested))
                .copied()
                .unwrap_or(values[0]);
            let hi = values
                .iter()
                .find(|&&v| v >= requested || surface_close(v, requested))
                .copied()
                .unwrap_or(*values.last().unwrap_or(&values[0]));
            Some((lo, hi))
        }
    };

    // Pick the newest model run for each corner and rasterize it.
    let corner = |t: DateTime<Utc>, s: Option<f64>| -> Option<&Arc<LayerHandle>> {
        candidates
            .iter()
            .filter(|h| h.layer().efftime() == t)
            .filter(|h| match s {
                Some(value) => surface_close(h.layer().surface1().value, value),
                None => true,
            })
            .max_by_key(|h| h.layer().reftime())
    };

    let (s_lo, s_hi) = match surfaces {
        Some((lo, hi)) => (Some(lo), Some(hi)),
        None => (None, None),
    };
    let corner_handles = [
        corner(t_lo, s_lo),
        corner(t_hi, s_lo),
        corner(t_lo, s_hi),
        corner(t_hi, s_hi),
    ];

    let mut results: [Option<LayerResult>; 4] = [None, None, None, None];
    for (slot, handle) in corner_handles.iter().enumerate() {
        if let Some(handle) = handle {
            results[slot] = Some(handle.get_results(bbox)?);
        }
    }
    let Some(reference) = results.iter().flatten().next() else {
        return Ok(None);
    };
    let (width, height) = (reference.width(), reference.height());

    let mut min_reftime: Option<DateTime<Utc>> = None;
    let mut max_reftime: Option<DateTime<Utc>> = None;
    for handle in corner_handles.iter().flatten() {
        let rt = handle.layer().reftime();
        min_reftime = Some(min_reftime.map_or(rt, |m| m.min(rt)));
        max_reftime = Some(max_reftime.map_or(rt, |m| m.max(rt)));
    }
    let min_reftime = min_reftime.unwrap_or(t_lo);
    let max_reftime = max_reftime.unwrap_or(min_reftime);

    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let at = |slot: usize| {
                results[slot]
                    .as_ref()
                    .map(|r| r.get(x, y))
                    .unwrap_or(f32::NAN)
            };
            data.push(LinInterp::new(at(0), at(1), at(2), at(3)));
        }
    }

    let representative = corner_handles
        .iter()
        .flatten()
        .next()
        .map(|&h| Arc::clone(h))
        .unwrap_or_else(|| Arc::clone(first));

    Ok(Some(LayerInterpolateResult::new(
        representative,
        *bbox,
        width,
        height,
        t_lo,
        t_hi,
        min_reftime,
        max_reftime,
        s_lo.unwrap_or(f64::NAN),
        s_hi.unwrap_or(f64::NAN),
        data,
    )))
}

fn surface_close(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    (a - b).abs() <= 1e-9 + 1e-6 * b.abs()
}

/// Convenience: interpolate and immediately collapse to a scalar raster at
/// the requested point.
pub fn interpolate_to_raster(
    bbox: &LatLonBox,
    candidates: &[Arc<LayerHandle>],
    efftime: DateTime<Utc>,
    surface1_value: Option<f64>,
) -> StoreResult<Option<LayerResult>> {
    Ok(interpolate_layers(bbox, candidates, efftime, surface1_value)?
        .map(|interp| interp.get_results(efftime, surface1_value.unwrap_or(f64::NAN))))
}
