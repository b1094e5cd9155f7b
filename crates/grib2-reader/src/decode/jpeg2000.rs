//! JPEG2000 grid-point packing (template 5.40).
//!
//! The section 7 payload is a complete JPEG2000 code stream holding one
//! integer component. Entropy decoding goes through the external codec;
//! without the `jpeg2000` feature this degrades to an unsupported-template
//! error rather than a link failure.

use crate::layer::Jpeg2000Packing;
use crate::Grib2Result;

#[cfg(feature = "jpeg2000")]
pub(crate) fn decode(
    params: &Jpeg2000Packing,
    payload: &[u8],
    bitmap: Option<&[bool]>,
    npoints: usize,
) -> Grib2Result<Vec<f32>> {
    use super::{encoded_count, scatter};
    use crate::Grib2Error;

    let image = jpeg2k::Image::from_bytes(payload)
        .map_err(|e| Grib2Error::CodecError(e.to_string()))?;
    let components = image.components();
    if components.len() != 1 {
        return Err(Grib2Error::CodecError(format!(
            "expected 1 component, got {}",
            components.len()
        )));
    }
    let samples = components[0].data();
    let count = encoded_count(bitmap, npoints);
    if samples.len() != count {
        return Err(Grib2Error::CodecError(format!(
            "code stream holds {} samples, {} expected",
            samples.len(),
            count
        )));
    }

    let offset = params.simple.data_offset();
    let scale = params.simple.data_scale();
    let compact = samples
        .iter()
        .map(|&raw| (offset + scale * raw as f64) as f32)
        .collect();
    scatter(compact, bitmap, npoints)
}

#[cfg(not(feature = "jpeg2000"))]
pub(crate) fn decode(
    _params: &Jpeg2000Packing,
    _payload: &[u8],
    _bitmap: Option<&[bool]>,
    _npoints: usize,
) -> Grib2Result<Vec<f32>> {
    Err(crate::Grib2Error::UnsupportedTemplate {
        kind: "packing",
        template: 40,
    })
}
