//! Clip a decoded grid to a geographic rectangle.

use std::sync::Arc;

use wx_common::LatLonBox;

use crate::handle::LayerHandle;
use crate::result::LayerResult;
use crate::{StoreError, StoreResult};

/// Extract the cells covering `bbox` from a decoded layer.
///
/// The output raster runs north to south, west to east, regardless of the
/// source grid's scan order. Cells outside the grid come out NaN; on a
/// fully-wrapping grid the column walk crosses the antimeridian, pulling
/// from two disjoint source ranges.
pub(crate) fn extract(
    handle: &Arc<LayerHandle>,
    data: &[f32],
    bbox: &LatLonBox,
) -> StoreResult<LayerResult> {
    let layer = handle.layer();
    let grid = layer
        .grid()
        .ok_or_else(|| StoreError::Config("layer has no grid".to_string()))?;
    let (dlat, dlon) = grid.step();

    let width = (bbox.width() / dlon.abs()).ceil().max(1.0) as usize;
    let height = (bbox.height() / dlat.abs()).ceil().max(1.0) as usize;

    // Starting cell indices: the first cell whose extent intersects the
    // west/north edge. Columns advance eastward, rows southward; the source
    // grid may store either axis in either direction.
    let u_west = grid.u_of_lon(bbox.west);
    let v_north = grid.v_of_lat(bbox.north);
    let u0 = if dlon > 0.0 {
        (u_west + 0.5).floor()
    } else {
        (u_west - 0.5).ceil()
    } as i64;
    let v0 = if dlat < 0.0 {
        (v_north + 0.5).floor()
    } else {
        (v_north - 0.5).ceil()
    } as i64;

    let usz = grid.ni() as i64;
    let vsz = grid.nj() as i64;

    let mut out = Vec::with_capacity(width * height);
    for y in 0..height as i64 {
        // dlat < 0 stores rows north to south; otherwise they run south to
        // north and the row index decreases while latitude drops.
        let v = if dlat < 0.0 { v0 + y } else { v0 - y };
        for x in 0..width as i64 {
            let mut u = if dlon > 0.0 { u0 + x } else { u0 - x };
            if grid.is_full_longitude() {
                u = u.rem_euclid(usz);
            }
            if u < 0 || u >= usz || v < 0 || v >= vsz {
                out.push(f32::NAN);
                continue;
            }
            out.push(data[grid.index(u as u32, v as u32)]);
        }
    }

    Ok(LayerResult::new(
        Arc::clone(handle),
        *bbox,
        width,
        height,
        layer.efftime(),
        layer.reftime(),
        layer.reftime(),
        layer.surface1().value,
        out,
    ))
}
