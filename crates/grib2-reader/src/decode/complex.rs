//! Complex packing (template 5.2) and complex packing with spatial
//! differencing (template 5.3).
//!
//! The payload carries three byte-aligned group descriptor arrays (reference,
//! width, length) followed by the per-point stream. Template 5.3 prefixes an
//! extra descriptor block: the first original value(s) and the minimum that
//! was subtracted from every difference.

use tracing::trace;

use crate::bitstream::BitReader;
use crate::layer::{ComplexPacking, SpatialDiffPacking};
use crate::{Grib2Error, Grib2Result};

use super::{encoded_count, scatter};

/// A decoded point before rescaling: integer domain, missing kept symbolic.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Value(i64),
    Missing,
}

pub(crate) fn decode(
    params: &ComplexPacking,
    spatial: Option<&SpatialDiffPacking>,
    payload: &[u8],
    bitmap: Option<&[bool]>,
    npoints: usize,
) -> Grib2Result<Vec<f32>> {
    let count = encoded_count(bitmap, npoints);
    let mut reader = BitReader::new(payload);

    // Template 7.3 prologue: spatial-differencing descriptors.
    let mut initials: Vec<i64> = Vec::new();
    let mut min_delta: i64 = 0;
    if let Some(sd) = spatial {
        let width = sd.extra_descriptor_octets as u32 * 8;
        for _ in 0..sd.order {
            initials.push(reader.read(width)? as i64);
        }
        min_delta = reader.read_signed(width)?;
        trace!(?initials, min_delta, "spatial differencing descriptors");
    }

    let ngroups = params.ngroups as usize;

    // Group references, then widths, then lengths; each array byte-aligned.
    let mut group_refs = Vec::with_capacity(ngroups);
    for _ in 0..ngroups {
        group_refs.push(reader.read(params.simple.bits)?);
    }
    reader.align_to_byte();

    let mut group_widths = Vec::with_capacity(ngroups);
    for _ in 0..ngroups {
        let w = reader.read(params.nbits_group_width)?;
        group_widths.push(params.ref_group_width + w as u32);
    }
    reader.align_to_byte();

    let mut group_lengths = Vec::with_capacity(ngroups);
    for _ in 0..ngroups {
        let l = reader.read(params.nbits_group_length)?;
        group_lengths.push(params.ref_group_length + l as u32 * params.incr_group_length);
    }
    if let Some(last) = group_lengths.last_mut() {
        *last = params.last_group_length;
    }
    reader.align_to_byte();

    let total: u64 = group_lengths.iter().map(|&l| l as u64).sum();
    if total != count as u64 {
        return Err(Grib2Error::MalformedSection {
            section: 7,
            reason: format!("groups cover {total} points, {count} encoded"),
        });
    }

    // Per-point stream. In-group sentinels are all-ones bit patterns at the
    // group width. The template's top-level sentinels are raw integers for
    // integer-typed fields; for float-typed fields their bits are an IEEE
    // value matched after rescaling.
    let integer_field = !params.simple.is_float_field();
    let primary = params.primary_missing as i64;
    let secondary = params.secondary_missing as i64;
    let mut cells = Vec::with_capacity(count);
    for g in 0..ngroups {
        let width = group_widths[g];
        let group_ref = group_refs[g] as i64;
        for _ in 0..group_lengths[g] {
            let cell = if width == 0 {
                // Constant group; an all-ones reference marks the whole
                // group missing under missing-value management.
                if params.has_primary_missing()
                    && params.simple.bits > 0
                    && group_refs[g] == (1u64 << params.simple.bits) - 1
                {
                    Cell::Missing
                } else {
                    Cell::Value(group_ref)
                }
            } else {
                let raw = reader.read(width)?;
                if params.has_primary_missing() && raw == (1u64 << width) - 1 {
                    Cell::Missing
                } else if params.has_secondary_missing()
                    && width > 1
                    && raw == (1u64 << width) - 2
                {
                    Cell::Missing
                } else {
                    let aggregate = group_ref + raw as i64;
                    if integer_field
                        && (params.has_primary_missing() && aggregate == primary
                            || params.has_secondary_missing() && aggregate == secondary)
                    {
                        Cell::Missing
                    } else {
                        Cell::Value(aggregate)
                    }
                }
            };
            cells.push(cell);
        }
    }

    if let Some(sd) = spatial {
        undifference(&mut cells, &initials, min_delta, sd.order);
    }

    let offset = params.simple.data_offset();
    let scale = params.simple.data_scale();
    let primary_float = f32::from_bits(params.primary_missing);
    let secondary_float = f32::from_bits(params.secondary_missing);
    let compact = cells
        .into_iter()
        .map(|cell| match cell {
            Cell::Value(v) => {
                let value = (offset + scale * v as f64) as f32;
                if !integer_field
                    && (params.has_primary_missing() && value == primary_float
                        || params.has_secondary_missing() && value == secondary_float)
                {
                    f32::NAN
                } else {
                    value
                }
            }
            Cell::Missing => f32::NAN,
        })
        .collect();
    scatter(compact, bitmap, npoints)
}

/// Invert first- or second-order spatial differencing in place.
///
/// The stream holds placeholders at the positions of the initial value(s);
/// missing cells pass through untouched and do not advance the recurrence.
fn undifference(cells: &mut [Cell], initials: &[i64], min_delta: i64, order: u8) {
    let mut seen = 0usize;
    let mut last1: i64 = 0;
    let mut last2: i64 = 0;
    for cell in cells.iter_mut() {
        let Cell::Value(delta) = *cell else {
            continue;
        };
        let value = if seen < initials.len() {
            initials[seen]
        } else if order == 1 {
            last1 + delta + min_delta
        } else {
            2 * last1 - last2 + delta + min_delta
        };
        *cell = Cell::Value(value);
        last2 = last1;
        last1 = value;
        seen += 1;
    }
}
