//! Simple packing (data representation template 5.0).

use crate::bitstream::BitReader;
use crate::layer::SimplePacking;
use crate::Grib2Result;

use super::{encoded_count, scatter};

pub(crate) fn decode(
    params: &SimplePacking,
    payload: &[u8],
    bitmap: Option<&[bool]>,
    npoints: usize,
) -> Grib2Result<Vec<f32>> {
    let count = encoded_count(bitmap, npoints);
    let offset = params.data_offset();
    let scale = params.data_scale();

    let mut compact = Vec::with_capacity(count);
    if params.bits == 0 {
        // All points collapse onto the reference value.
        compact.resize(count, offset as f32);
    } else {
        let mut reader = BitReader::new(payload);
        for _ in 0..count {
            let raw = reader.read(params.bits)?;
            compact.push((offset + scale * raw as f64) as f32);
        }
    }
    scatter(compact, bitmap, npoints)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(bits: u32, reference: f32) -> SimplePacking {
        SimplePacking {
            reference_value: reference,
            binary_scale: 0,
            decimal_scale: 0,
            bits,
            field_value_type: 0,
        }
    }

    #[test]
    fn test_decode_bytes() {
        // W=8, R=250: raw bytes scale to 250 + raw.
        let payload = [0x00, 0x0a, 0x14, 0x1e, 0x28, 0x32];
        let out = decode(&params(8, 250.0), &payload, None, 6).unwrap();
        assert_eq!(out, vec![250.0, 260.0, 270.0, 280.0, 290.0, 300.0]);
    }

    #[test]
    fn test_decode_sub_byte_width() {
        // Four 4-bit values: 1, 2, 3, 4.
        let payload = [0x12, 0x34];
        let out = decode(&params(4, 0.0), &payload, None, 4).unwrap();
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_decode_with_bitmap() {
        // Only bitmap-present cells are encoded.
        let payload = [0x00, 0x0a, 0x14];
        let bitmap = [true, false, true, false, true, false];
        let out = decode(&params(8, 250.0), &payload, Some(&bitmap), 6).unwrap();
        assert_eq!(out[0], 250.0);
        assert!(out[1].is_nan());
        assert_eq!(out[2], 260.0);
        assert!(out[3].is_nan());
        assert_eq!(out[4], 270.0);
        assert!(out[5].is_nan());
    }

    #[test]
    fn test_zero_width_constant_field() {
        let out = decode(&params(0, 273.15), &[], None, 4).unwrap();
        assert!(out.iter().all(|&v| (v - 273.15).abs() < 1e-4));
    }

    #[test]
    fn test_truncated_payload_is_error() {
        let payload = [0x00, 0x0a];
        assert!(decode(&params(8, 0.0), &payload, None, 6).is_err());
    }

    #[test]
    fn test_binary_decimal_scaling() {
        let p = SimplePacking {
            reference_value: 100.0,
            binary_scale: 1,
            decimal_scale: 1,
            bits: 8,
            field_value_type: 0,
        };
        // value = (100 + 2^1 * raw) * 10^-1
        let out = decode(&p, &[50], None, 1).unwrap();
        assert!((out[0] - 20.0).abs() < 1e-5);
    }
}
