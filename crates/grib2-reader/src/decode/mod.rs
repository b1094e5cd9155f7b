//! Packed-payload decoders for the supported data representation templates.
//!
//! Every decoder produces one `f32` per grid cell in the grid's natural
//! linear order. In-group missing sentinels are detected in the integer
//! domain; the template-level sentinels match raw integers for
//! integer-typed fields and their bit-reinterpreted IEEE values for
//! float-typed fields. NaN enters only at the final rescale, for sentinel
//! cells and for cells the bitmap marks invalid.

mod complex;
mod jpeg2000;
mod simple;

use crate::layer::{Layer, PackingParams};
use crate::{Grib2Error, Grib2Result};

/// Decode a layer's payload into `grid.len()` floats.
pub(crate) fn decode_layer(layer: &Layer) -> Grib2Result<Vec<f32>> {
    let grid = layer.grid().ok_or_else(|| Grib2Error::MalformedSection {
        section: 3,
        reason: "layer has no usable grid".to_string(),
    })?;
    let npoints = grid.len();
    let payload = layer.read_payload()?;
    let bitmap = match layer.read_bitmap()? {
        Some(bytes) => Some(expand_bitmap(&bytes, npoints)?),
        None => None,
    };
    let bitmap = bitmap.as_deref();

    match layer.packing() {
        PackingParams::Simple(p) => simple::decode(p, &payload, bitmap, npoints),
        PackingParams::Complex(p) => complex::decode(p, None, &payload, bitmap, npoints),
        PackingParams::ComplexSpatialDiff(p) => {
            complex::decode(&p.complex, Some(p), &payload, bitmap, npoints)
        }
        PackingParams::Jpeg2000(p) => jpeg2000::decode(p, &payload, bitmap, npoints),
    }
}

/// Expand bitmap bytes (MSB-first, one bit per cell) to a bool per cell.
pub fn expand_bitmap(bytes: &[u8], npoints: usize) -> Grib2Result<Vec<bool>> {
    if bytes.len() * 8 < npoints {
        return Err(Grib2Error::MalformedSection {
            section: 6,
            reason: format!(
                "bitmap holds {} bits for {} grid points",
                bytes.len() * 8,
                npoints
            ),
        });
    }
    let mut out = Vec::with_capacity(npoints);
    for i in 0..npoints {
        out.push(bytes[i >> 3] & (0x80 >> (i & 7)) != 0);
    }
    Ok(out)
}

/// Scatter a compact stream of decoded values onto the full grid, filling
/// bitmap-false cells with NaN.
pub(crate) fn scatter(
    compact: Vec<f32>,
    bitmap: Option<&[bool]>,
    npoints: usize,
) -> Grib2Result<Vec<f32>> {
    let Some(bitmap) = bitmap else {
        if compact.len() != npoints {
            return Err(Grib2Error::MalformedSection {
                section: 7,
                reason: format!("decoded {} values for {} grid points", compact.len(), npoints),
            });
        }
        return Ok(compact);
    };
    let present = bitmap.iter().filter(|&&b| b).count();
    if compact.len() != present {
        return Err(Grib2Error::MalformedSection {
            section: 7,
            reason: format!(
                "decoded {} values for {} bitmap-present points",
                compact.len(),
                present
            ),
        });
    }
    let mut out = Vec::with_capacity(npoints);
    let mut it = compact.into_iter();
    for &valid in bitmap {
        if valid {
            // Count verified above.
            out.push(it.next().unwrap_or(f32::NAN));
        } else {
            out.push(f32::NAN);
        }
    }
    Ok(out)
}

/// Number of values actually encoded in the payload: all grid points, or
/// only those the bitmap marks present.
pub(crate) fn encoded_count(bitmap: Option<&[bool]>, npoints: usize) -> usize {
    match bitmap {
        Some(b) => b.iter().filter(|&&x| x).count(),
        None => npoints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_bitmap() {
        let bits = expand_bitmap(&[0b1010_1010], 6).unwrap();
        assert_eq!(bits, vec![true, false, true, false, true, false]);
        assert!(expand_bitmap(&[0xff], 9).is_err());
    }

    #[test]
    fn test_scatter_with_bitmap() {
        let bitmap = vec![true, false, true, false];
        let out = scatter(vec![1.0, 2.0], Some(&bitmap), 4).unwrap();
        assert_eq!(out[0], 1.0);
        assert!(out[1].is_nan());
        assert_eq!(out[2], 2.0);
        assert!(out[3].is_nan());
    }

    #[test]
    fn test_scatter_count_mismatch() {
        let bitmap = vec![true, true];
        assert!(scatter(vec![1.0], Some(&bitmap), 2).is_err());
        assert!(scatter(vec![1.0], None, 2).is_err());
    }
}
