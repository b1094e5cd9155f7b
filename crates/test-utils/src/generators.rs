//! Byte-level GRIB2 message generators.
//!
//! Each `section*` function returns one complete section (length prefix and
//! section number included); [`build_message`] wraps a section list with the
//! indicator and `7777` end sections. Values follow the wire conventions:
//! big-endian, sign-magnitude for signed fields.

use std::fs;
use std::path::{Path, PathBuf};

/// Encode a signed value into 4-byte GRIB2 sign-magnitude form.
pub fn sign_magnitude32(v: i64) -> u32 {
    if v < 0 {
        (v.unsigned_abs() as u32) | 0x8000_0000
    } else {
        v as u32
    }
}

/// Encode a signed value into 2-byte GRIB2 sign-magnitude form.
pub fn sign_magnitude16(v: i32) -> u16 {
    if v < 0 {
        (v.unsigned_abs() as u16) | 0x8000
    } else {
        v as u16
    }
}

fn with_header(section: u8, body: &[u8]) -> Vec<u8> {
    let len = (body.len() + 5) as u32;
    let mut out = Vec::with_capacity(body.len() + 5);
    out.extend_from_slice(&len.to_be_bytes());
    out.push(section);
    out.extend_from_slice(body);
    out
}

/// Section 1: identification.
#[allow(clippy::too_many_arguments)]
pub fn section1(
    center: u16,
    subcenter: u16,
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&center.to_be_bytes());
    body.extend_from_slice(&subcenter.to_be_bytes());
    body.push(2); // master table version
    body.push(1); // local table version
    body.push(1); // significance: start of forecast
    body.extend_from_slice(&year.to_be_bytes());
    body.extend_from_slice(&[month, day, hour, minute, second]);
    body.push(0); // production status: operational
    body.push(1); // data type: forecast
    with_header(1, &body)
}

/// Section 3: grid definition template 3.0, lat/lon grid.
///
/// Coordinates in microdegrees, signed; `di`/`dj` unsigned microdegree
/// steps; `scan` per flag table 3.4.
#[allow(clippy::too_many_arguments)]
pub fn section3_latlon(
    ni: u32,
    nj: u32,
    lat0_micro: i64,
    lon0_micro: i64,
    di_micro: u32,
    dj_micro: u32,
    scan: u8,
) -> Vec<u8> {
    let mut body = Vec::new();
    body.push(0); // source of grid definition
    body.extend_from_slice(&(ni * nj).to_be_bytes());
    body.push(0); // no optional list
    body.push(0);
    body.extend_from_slice(&0u16.to_be_bytes()); // template 3.0

    // Template body ("gd" bytes).
    let mut gd = Vec::new();
    gd.push(6); // shape of the earth: spherical r=6371229
    gd.push(0);
    gd.extend_from_slice(&0u32.to_be_bytes());
    gd.push(0);
    gd.extend_from_slice(&0u32.to_be_bytes());
    gd.push(0);
    gd.extend_from_slice(&0u32.to_be_bytes());
    gd.extend_from_slice(&ni.to_be_bytes());
    gd.extend_from_slice(&nj.to_be_bytes());
    gd.extend_from_slice(&0u32.to_be_bytes()); // basic angle
    gd.extend_from_slice(&0xffff_ffffu32.to_be_bytes()); // subdivisions
    gd.extend_from_slice(&sign_magnitude32(lat0_micro).to_be_bytes());
    gd.extend_from_slice(&sign_magnitude32(lon0_micro).to_be_bytes());
    gd.push(0x30); // resolution and component flags
    // Last grid point, consistent with the first point and steps.
    let la2 = lat0_micro - (nj as i64 - 1) * dj_micro as i64;
    let lo2 = lon0_micro + (ni as i64 - 1) * di_micro as i64;
    gd.extend_from_slice(&sign_magnitude32(la2).to_be_bytes());
    gd.extend_from_slice(&sign_magnitude32(lo2).to_be_bytes());
    gd.extend_from_slice(&di_micro.to_be_bytes());
    gd.extend_from_slice(&dj_micro.to_be_bytes());
    gd.push(scan);
    body.extend_from_slice(&gd);
    with_header(3, &body)
}

/// Standard +i/-j, i-major scan mode.
pub const SCAN_STANDARD: u8 = 0x00;

/// Section 4: product definition template 4.0.
#[allow(clippy::too_many_arguments)]
pub fn section4_template0(
    category: u8,
    number: u8,
    genprocess: u8,
    time_unit: u8,
    forecast_offset: i64,
    surface1: (u8, i32, u32),
    surface2: (u8, i32, u32),
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0u16.to_be_bytes()); // no coordinate values
    body.extend_from_slice(&0u16.to_be_bytes()); // template 4.0
    body.push(category);
    body.push(number);
    body.push(genprocess);
    body.push(0); // background process
    body.push(96); // generating process id
    body.extend_from_slice(&0u16.to_be_bytes()); // cutoff hours
    body.push(0); // cutoff minutes
    body.push(time_unit);
    body.extend_from_slice(&sign_magnitude32(forecast_offset).to_be_bytes());
    for (stype, scale, value) in [surface1, surface2] {
        body.push(stype);
        body.push(if scale < 0 {
            (scale.unsigned_abs() as u8) | 0x80
        } else {
            scale as u8
        });
        body.extend_from_slice(&value.to_be_bytes());
    }
    with_header(4, &body)
}

/// Section 4: product definition template 4.8 (statistically processed
/// values over a time interval). Carries one statistical time-range spec.
#[allow(clippy::too_many_arguments)]
pub fn section4_template8(
    category: u8,
    number: u8,
    time_unit: u8,
    forecast_offset: i64,
    surface1: (u8, i32, u32),
    interval_end: (u16, u8, u8, u8, u8, u8),
    stat_process: u8,
    interval_length: u32,
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0u16.to_be_bytes()); // no coordinate values
    body.extend_from_slice(&8u16.to_be_bytes()); // template 4.8
    body.push(category);
    body.push(number);
    body.push(2); // generating process: forecast
    body.push(0);
    body.push(96);
    body.extend_from_slice(&0u16.to_be_bytes());
    body.push(0);
    body.push(time_unit);
    body.extend_from_slice(&sign_magnitude32(forecast_offset).to_be_bytes());
    for (stype, scale, value) in [surface1, SURFACE_MISSING] {
        body.push(stype);
        body.push(if scale < 0 {
            (scale.unsigned_abs() as u8) | 0x80
        } else {
            scale as u8
        });
        body.extend_from_slice(&value.to_be_bytes());
    }
    let (year, month, day, hour, minute, second) = interval_end;
    body.extend_from_slice(&year.to_be_bytes());
    body.extend_from_slice(&[month, day, hour, minute, second]);
    body.push(1); // one time-range specification
    body.extend_from_slice(&0u32.to_be_bytes()); // no missing values
    body.push(stat_process);
    body.push(2); // increment type: same start, processing period advances
    body.push(time_unit);
    body.extend_from_slice(&interval_length.to_be_bytes());
    body.push(255); // no increment
    body.extend_from_slice(&0u32.to_be_bytes());
    with_header(4, &body)
}

/// A "missing" fixed surface for [`section4_template0`].
pub const SURFACE_MISSING: (u8, i32, u32) = (255, 0, 0xffff_ffff);

/// An isobaric surface in Pa.
pub fn surface_isobaric(pa: u32) -> (u8, i32, u32) {
    (100, 0, pa)
}

/// A surface of the given type with no meaningful value.
pub fn surface_typed(stype: u8) -> (u8, i32, u32) {
    (stype, 0, 0)
}

/// Section 5: data representation template 5.0 (simple packing).
pub fn section5_simple(ndata: u32, reference: f32, e: i32, d: i32, bits: u8) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&ndata.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes()); // template 5.0
    body.extend_from_slice(&reference.to_be_bytes());
    body.extend_from_slice(&sign_magnitude16(e).to_be_bytes());
    body.extend_from_slice(&sign_magnitude16(d).to_be_bytes());
    body.push(bits);
    body.push(0); // original field type: float
    with_header(5, &body)
}

/// Parameters for [`section5_complex`] and [`section5_spatdiff`].
#[derive(Debug, Clone, Copy)]
pub struct ComplexSpec {
    pub ndata: u32,
    pub reference: f32,
    pub e: i32,
    pub d: i32,
    pub bits: u8,
    pub missing_mgmt: u8,
    pub primary_missing: u32,
    pub secondary_missing: u32,
    pub ngroups: u32,
    pub ref_group_width: u8,
    pub nbits_group_width: u8,
    pub ref_group_length: u32,
    pub incr_group_length: u8,
    pub last_group_length: u32,
    pub nbits_group_length: u8,
}

fn complex_body(spec: &ComplexSpec) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&spec.ndata.to_be_bytes());
    // Template number patched by the callers.
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&spec.reference.to_be_bytes());
    body.extend_from_slice(&sign_magnitude16(spec.e).to_be_bytes());
    body.extend_from_slice(&sign_magnitude16(spec.d).to_be_bytes());
    body.push(spec.bits);
    body.push(0); // original field type: float
    body.push(1); // general group splitting
    body.push(spec.missing_mgmt);
    body.extend_from_slice(&spec.primary_missing.to_be_bytes());
    body.extend_from_slice(&spec.secondary_missing.to_be_bytes());
    body.extend_from_slice(&spec.ngroups.to_be_bytes());
    body.push(spec.ref_group_width);
    body.push(spec.nbits_group_width);
    body.extend_from_slice(&spec.ref_group_length.to_be_bytes());
    body.push(spec.incr_group_length);
    body.extend_from_slice(&spec.last_group_length.to_be_bytes());
    body.push(spec.nbits_group_length);
    body
}

/// Section 5: data representation template 5.2 (complex packing).
pub fn section5_complex(spec: &ComplexSpec) -> Vec<u8> {
    let mut body = complex_body(spec);
    body[4..6].copy_from_slice(&2u16.to_be_bytes());
    with_header(5, &body)
}

/// Section 5: template 5.3 (complex packing with spatial differencing).
pub fn section5_spatdiff(spec: &ComplexSpec, order: u8, extra_octets: u8) -> Vec<u8> {
    let mut body = complex_body(spec);
    body[4..6].copy_from_slice(&3u16.to_be_bytes());
    body.push(order);
    body.push(extra_octets);
    with_header(5, &body)
}

/// Section 6: bitmap present (`indicator` 0) with the given bytes.
pub fn section6_bitmap(bitmap: &[u8]) -> Vec<u8> {
    let mut body = vec![0u8];
    body.extend_from_slice(bitmap);
    with_header(6, &body)
}

/// Section 6: no bitmap.
pub fn section6_none() -> Vec<u8> {
    with_header(6, &[255])
}

/// Section 6: reuse the previous bitmap in this message.
pub fn section6_reuse() -> Vec<u8> {
    with_header(6, &[254])
}

/// Section 7: data section with the given packed payload.
pub fn section7(payload: &[u8]) -> Vec<u8> {
    with_header(7, payload)
}

/// Wrap sections (1..7, in order) into a complete message with indicator
/// and end sections.
pub fn build_message(discipline: u8, sections: &[Vec<u8>]) -> Vec<u8> {
    let inner: usize = sections.iter().map(Vec::len).sum();
    let total = 16 + inner + 4;
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"GRIB");
    out.extend_from_slice(&[0, 0]);
    out.push(discipline);
    out.push(2); // edition
    out.extend_from_slice(&(total as u64).to_be_bytes());
    for section in sections {
        out.extend_from_slice(section);
    }
    out.extend_from_slice(b"7777");
    out
}

/// Write concatenated messages to `<dir>/<name>` and return the path.
pub fn write_grib_file(dir: &Path, name: &str, messages: &[Vec<u8>]) -> PathBuf {
    let path = dir.join(name);
    let mut bytes = Vec::new();
    for message in messages {
        bytes.extend_from_slice(message);
    }
    fs::write(&path, bytes).expect("write synthetic GRIB2 file");
    path
}

/// A ready-made single-field message: 3x2 grid at (40N, 10W), one-degree
/// steps, simple packing `W=8, E=0, D=0`, forecast in hours.
#[allow(clippy::too_many_arguments)]
pub fn simple_field_message(
    discipline: u8,
    category: u8,
    number: u8,
    forecast_hours: i64,
    surface: (u8, i32, u32),
    reference: f32,
    payload: &[u8],
    bitmap: Option<&[u8]>,
) -> Vec<u8> {
    let sec6 = match bitmap {
        Some(bits) => section6_bitmap(bits),
        None => section6_none(),
    };
    build_message(
        discipline,
        &[
            section1(7, 0, 2013, 3, 23, 6, 0, 0),
            section3_latlon(3, 2, 40_000_000, -10_000_000, 1_000_000, 1_000_000, SCAN_STANDARD),
            section4_template0(category, number, 2, 1, forecast_hours, surface, SURFACE_MISSING),
            section5_simple(payload.len() as u32, reference, 0, 0, 8),
            sec6,
            section7(payload),
        ],
    )
}
