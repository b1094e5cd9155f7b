//! Streaming GRIB2 message parser.
//!
//! Walks a file message by message, threading section state (identification,
//! grid, product, packing, bitmap) into one [`Layer`] per data section.
//! Parsing never touches the packed payload; layers reference byte ranges in
//! the source file and decode lazily.
//!
//! Failure policy: a truncated file ends parsing and returns the layers
//! recovered so far; a malformed section skips its message; an unsupported
//! template skips only the affected field; stray bytes between messages are
//! skipped until the next `GRIB` signature.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::bitstream::{sign_magnitude_i16, sign_magnitude_i32};
use crate::catalogue::ParamId;
use crate::grid::GridLatLon;
use crate::layer::{
    ComplexPacking, FileRegion, Jpeg2000Packing, Layer, PackingParams, SimplePacking,
    SpatialDiffPacking, StatTimeRange, SurfaceDescriptor,
};
use crate::Grib2Result;

const SIGNATURE: &[u8; 4] = b"GRIB";
const TERMINATOR: &[u8; 4] = b"7777";

/// Minimum byte length per section id, from the WMO section layouts.
fn section_min_len(section: u8) -> usize {
    match section {
        1 => 21,
        2 => 5,
        3 => 72,
        4 => 34,
        5 => 21,
        6 => 6,
        7 => 5,
        _ => 5,
    }
}

/// Parse one GRIB2 file, returning every layer found.
///
/// Corruption and unsupported content are logged and skipped; only failure
/// to read the file at all is an error.
pub fn parse_file(path: impl AsRef<Path>) -> Grib2Result<Vec<Layer>> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let mut parser = FileParser::new(path, &data);
    parser.run();
    debug!(
        file = %path.display(),
        layers = parser.layers.len(),
        "parsed GRIB2 file"
    );
    Ok(parser.layers)
}

/// Parse every regular file under a directory, in parallel.
pub fn parse_directory(dir: impl AsRef<Path>) -> Grib2Result<Vec<Layer>> {
    let files: Vec<PathBuf> = WalkDir::new(dir.as_ref())
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    let mut layers: Vec<Layer> = files
        .par_iter()
        .flat_map(|path| match parse_file(path) {
            Ok(layers) => layers,
            Err(err) => {
                warn!(file = %path.display(), %err, "skipping unreadable file");
                Vec::new()
            }
        })
        .collect();
    // Deterministic order regardless of scheduling.
    layers.sort_by(|a, b| a.key().cmp(&b.key()));
    Ok(layers)
}

/// Why a message had to be abandoned.
enum MessageFailure {
    /// Skip to the next message (structural damage inside this one).
    Skip(String),
    /// Stop parsing the file entirely.
    Truncated,
}

/// Identification state latched from section 1 for the current message.
struct MessageIdent {
    center: u16,
    subcenter: u16,
    reftime: DateTime<Utc>,
    production_status: u8,
    data_type: u8,
}

/// Product state latched from section 4 for the current field.
struct ProductState {
    param: ParamId,
    genprocess: u8,
    genprocess_type: u8,
    efftime: DateTime<Utc>,
    surface1: SurfaceDescriptor,
    surface2: SurfaceDescriptor,
    interval_end: Option<DateTime<Utc>>,
    stat_ranges: Vec<StatTimeRange>,
}

struct FileParser<'a> {
    path: &'a Path,
    data: &'a [u8],
    layers: Vec<Layer>,
    /// (kind, template) pairs already warned about in this file.
    warned_templates: HashSet<(&'static str, u16)>,
    /// Grid of the previous field, for sharing across messages.
    last_grid: Option<Arc<GridLatLon>>,
}

impl<'a> FileParser<'a> {
    fn new(path: &'a Path, data: &'a [u8]) -> Self {
        Self {
            path,
            data,
            layers: Vec::new(),
            warned_templates: HashSet::new(),
            last_grid: None,
        }
    }

    fn warn_template_once(&mut self, kind: &'static str, template: u16) {
        if self.warned_templates.insert((kind, template)) {
            warn!(
                file = %self.path.display(),
                kind,
                template,
                "unsupported template, skipping field"
            );
        }
    }

    /// Find the next `GRIB` signature at or after `from`.
    fn find_signature(&self, from: usize) -> Option<usize> {
        if from >= self.data.len() {
            return None;
        }
        self.data[from..]
            .windows(4)
            .position(|w| w == SIGNATURE)
            .map(|p| from + p)
    }

    fn run(&mut self) {
        let mut offs = 0usize;
        loop {
            let start = match self.find_signature(offs) {
                Some(pos) => pos,
                None => break,
            };
            if start > offs {
                warn!(
                    file = %self.path.display(),
                    skipped = start - offs,
                    "skipped bytes before GRIB signature"
                );
            }
            match self.parse_message(start) {
                Ok(next) => offs = next,
                Err(MessageFailure::Skip(reason)) => {
                    warn!(file = %self.path.display(), offset = start, reason, "skipping message");
                    // Resync past the signature we matched.
                    offs = start + 4;
                }
                Err(MessageFailure::Truncated) => {
                    warn!(
                        file = %self.path.display(),
                        offset = start,
                        "truncated file, returning partial results"
                    );
                    break;
                }
            }
        }
    }

    /// Parse the message whose section 0 starts at `start`. Returns the
    /// offset just past the message.
    fn parse_message(&mut self, start: usize) -> Result<usize, MessageFailure> {
        let data = self.data;
        if data.len() - start < 16 {
            return Err(MessageFailure::Truncated);
        }
        let discipline = data[start + 6];
        let edition = data[start + 7];
        let total_len = u64::from_be_bytes(data[start + 8..start + 16].try_into().unwrap()) as usize;
        if edition != 2 {
            if total_len >= 16 && start + total_len <= data.len() {
                warn!(file = %self.path.display(), edition, "not GRIB edition 2, skipping message");
                return Ok(start + total_len);
            }
            return Err(MessageFailure::Skip(format!("GRIB edition {edition}")));
        }
        if total_len < 16 + 4 {
            return Err(MessageFailure::Skip(format!(
                "message length {total_len} shorter than sections 0+8"
            )));
        }
        if start + total_len > data.len() {
            return Err(MessageFailure::Truncated);
        }

        let msg_end = start + total_len;
        if &data[msg_end - 4..msg_end] != TERMINATOR {
            return Err(MessageFailure::Skip("message does not end in 7777".into()));
        }

        let mut cursor = start + 16;
        let mut ident: Option<MessageIdent> = None;
        let mut grid: Option<Arc<GridLatLon>> = None;
        let mut product: Option<ProductState> = None;
        let mut packing: Option<PackingParams> = None;
        let mut bitmap: Option<FileRegion> = None;
        let mut prev_bitmap: Option<FileRegion> = None;
        // Section id the state machine expects next; 3 doubles as "3 or the
        // start of a repeated field group".
        let mut expect: u8 = 1;
        let mut seen_section3 = false;

        while cursor < msg_end - 4 {
            if msg_end - 4 - cursor < 5 {
                return Err(MessageFailure::Skip("trailing garbage before 7777".into()));
            }
            let sec_len =
                u32::from_be_bytes(data[cursor..cursor + 4].try_into().unwrap()) as usize;
            let sec_id = data[cursor + 4];
            if sec_len < section_min_len(sec_id) {
                return Err(MessageFailure::Skip(format!(
                    "section {sec_id} length {sec_len} below minimum"
                )));
            }
            if cursor + sec_len > msg_end - 4 {
                return Err(MessageFailure::Skip(format!(
                    "section {sec_id} length {sec_len} overruns message"
                )));
            }
            let section = &data[cursor..cursor + sec_len];

            // Section 2 is optional between 1 and 3. Repeated fields loop
            // back after 7, either to a fresh grid (section 3) or straight
            // to the next product (section 4) on the grid already latched.
            let in_order = match sec_id {
                1 => expect == 1,
                2 => expect == 2,
                3 => expect == 2 || expect == 3,
                4 => expect == 4 || (expect == 3 && seen_section3),
                5 => expect == 5,
                6 => expect == 6,
                7 => expect == 7,
                _ => false,
            };
            if !in_order {
                return Err(MessageFailure::Skip(format!(
                    "section {sec_id} out of order (expected {expect})"
                )));
            }

            match sec_id {
                1 => {
                    ident = Some(self.parse_section1(section)?);
                    expect = 2;
                }
                2 => {
                    // Local use section: skipped.
                    expect = 3;
                }
                3 => {
                    grid = self.parse_section3(section);
                    seen_section3 = true;
                    expect = 4;
                }
                4 => {
                    let ident = ident.as_ref().ok_or_else(|| {
                        MessageFailure::Skip("section 4 before section 1".into())
                    })?;
                    product = self.parse_section4(section, discipline, ident.reftime);
                    expect = 5;
                }
                5 => {
                    packing = self.parse_section5(section);
                    expect = 6;
                }
                6 => {
                    bitmap = self.parse_section6(section, cursor as u64, &prev_bitmap)?;
                    expect = 7;
                }
                7 => {
                    let payload = FileRegion::new(
                        self.path,
                        cursor as u64 + 5,
                        (sec_len - 5) as u64,
                    );
                    self.emit_layer(
                        ident.as_ref(),
                        &grid,
                        &product,
                        &packing,
                        &bitmap,
                        payload,
                    );
                    // A later field may reuse the last explicit bitmap.
                    if let Some(b) = bitmap.take() {
                        prev_bitmap = Some(b);
                    }
                    packing = None;
                    product = None;
                    expect = 3;
                }
                other => {
                    return Err(MessageFailure::Skip(format!("unknown section id {other}")));
                }
            }
            cursor += sec_len;
        }

        if expect != 3 {
            return Err(MessageFailure::Skip(format!(
                "message ended while expecting section {expect}"
            )));
        }
        Ok(msg_end)
    }

    fn parse_section1(&mut self, s: &[u8]) -> Result<MessageIdent, MessageFailure> {
        let center = u16::from_be_bytes([s[5], s[6]]);
        let subcenter = u16::from_be_bytes([s[7], s[8]]);
        let master_table = s[9];
        let local_table = s[10];
        let reftime_significance = s[11];
        let year = u16::from_be_bytes([s[12], s[13]]);
        let (month, day, hour, minute, second) = (s[14], s[15], s[16], s[17], s[18]);
        let reftime = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
            .and_then(|d| d.and_hms_opt(hour as u32, minute as u32, second as u32))
            .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
            .ok_or_else(|| {
                MessageFailure::Skip(format!(
                    "invalid reference time {year}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                ))
            })?;
        let production_status = s[19];
        let data_type = s[20];
        debug!(
            center,
            subcenter,
            master_table,
            local_table,
            reftime_significance,
            %reftime,
            "section 1"
        );
        Ok(MessageIdent {
            center,
            subcenter,
            reftime,
            production_status,
            data_type,
        })
    }

    /// Grid definition. Unsupported templates latch no grid; the fields of
    /// this message still parse and their metadata is recorded.
    fn parse_section3(&mut self, s: &[u8]) -> Option<Arc<GridLatLon>> {
        let template = u16::from_be_bytes([s[12], s[13]]);
        if template != 0 {
            self.warn_template_once("grid", template);
            return None;
        }
        let gd = &s[14..];
        if gd.len() < 58 {
            self.warn_template_once("grid", template);
            return None;
        }
        let ni = u32::from_be_bytes(gd[16..20].try_into().unwrap());
        let nj = u32::from_be_bytes(gd[20..24].try_into().unwrap());
        let basic_angle = u32::from_be_bytes(gd[24..28].try_into().unwrap());
        let subdivisions = u32::from_be_bytes(gd[28..32].try_into().unwrap());
        if basic_angle != 0 || !(subdivisions == 0 || subdivisions == 0xffff_ffff) {
            self.warn_template_once("grid", template);
            return None;
        }
        let la1 = sign_magnitude_i32(u32::from_be_bytes(gd[32..36].try_into().unwrap()));
        let lo1 = sign_magnitude_i32(u32::from_be_bytes(gd[36..40].try_into().unwrap()));
        let di = u32::from_be_bytes(gd[49..53].try_into().unwrap());
        let dj = u32::from_be_bytes(gd[53..57].try_into().unwrap());
        let scan = gd[57];

        if scan & 0x10 != 0 {
            // Alternating-row scan has no linear index map.
            self.warn_template_once("grid-scan", scan as u16);
            return None;
        }
        if ni == 0 || nj == 0 {
            self.warn_template_once("grid", template);
            return None;
        }

        const MICRO: f64 = 1e-6;
        let dlon = if scan & 0x80 == 0 {
            di as f64 * MICRO
        } else {
            -(di as f64) * MICRO
        };
        let dlat = if scan & 0x40 == 0 {
            -(dj as f64) * MICRO
        } else {
            dj as f64 * MICRO
        };
        let (scale_u, scale_v) = if scan & 0x20 == 0 {
            // Adjacent points are consecutive along i.
            (1i64, ni as i64)
        } else {
            (nj as i64, 1i64)
        };

        let grid = GridLatLon::new(
            la1 as f64 * MICRO,
            lo1 as f64 * MICRO,
            dlat,
            dlon,
            ni,
            nj,
            scale_u,
            scale_v,
            0,
        );
        // Share the allocation when consecutive fields use the same grid.
        if let Some(last) = &self.last_grid {
            if **last == grid {
                return Some(Arc::clone(last));
            }
        }
        let grid = Arc::new(grid);
        self.last_grid = Some(Arc::clone(&grid));
        Some(grid)
    }

    /// Product definition templates 4.0 and 4.8.
    fn parse_section4(
        &mut self,
        s: &[u8],
        discipline: u8,
        reftime: DateTime<Utc>,
    ) -> Option<ProductState> {
        let template = u16::from_be_bytes([s[7], s[8]]);
        if template != 0 && template != 8 {
            self.warn_template_once("product", template);
            return None;
        }
        if template == 8 && s.len() < 58 {
            self.warn_template_once("product", template);
            return None;
        }
        let param = ParamId::new(discipline, s[9], s[10]);
        let genprocess = s[11];
        let genprocess_type = s[13];
        let time_unit = s[17];
        let forecast_offset =
            sign_magnitude_i32(u32::from_be_bytes(s[18..22].try_into().unwrap()));
        let efftime =
            match wx_common::time::effective_time(reftime, forecast_offset as i64, time_unit) {
                Some(t) => t,
                None => {
                    self.warn_template_once("time-unit", time_unit as u16);
                    return None;
                }
            };
        let surface1 = parse_surface(s[22], s[23], &s[24..28]);
        let surface2 = parse_surface(s[28], s[29], &s[30..34]);

        let (interval_end, stat_ranges) = if template == 8 {
            let year = u16::from_be_bytes([s[34], s[35]]);
            let end = NaiveDate::from_ymd_opt(year as i32, s[36] as u32, s[37] as u32)
                .and_then(|d| d.and_hms_opt(s[38] as u32, s[39] as u32, s[40] as u32))
                .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
            let n = s[41] as usize;
            let mut ranges = Vec::with_capacity(n);
            let mut pos = 46;
            for _ in 0..n {
                if pos + 12 > s.len() {
                    break;
                }
                ranges.push(StatTimeRange {
                    process: s[pos],
                    increment_type: s[pos + 1],
                    unit: s[pos + 2],
                    length: u32::from_be_bytes(s[pos + 3..pos + 7].try_into().unwrap()),
                    increment_unit: s[pos + 7],
                    increment: u32::from_be_bytes(s[pos + 8..pos + 12].try_into().unwrap()),
                });
                pos += 12;
            }
            (end, ranges)
        } else {
            (None, Vec::new())
        };

        Some(ProductState {
            param,
            genprocess,
            genprocess_type,
            efftime,
            surface1,
            surface2,
            interval_end,
            stat_ranges,
        })
    }

    /// Data representation templates 5.0, 5.2, 5.3, 5.40.
    fn parse_section5(&mut self, s: &[u8]) -> Option<PackingParams> {
        let template = u16::from_be_bytes([s[9], s[10]]);
        let simple_at = |s: &[u8]| SimplePacking {
            reference_value: f32::from_be_bytes(s[11..15].try_into().unwrap()),
            binary_scale: sign_magnitude_i16(u16::from_be_bytes([s[15], s[16]])),
            decimal_scale: sign_magnitude_i16(u16::from_be_bytes([s[17], s[18]])),
            bits: s[19] as u32,
            field_value_type: s[20],
        };
        match template {
            0 => Some(PackingParams::Simple(simple_at(s))),
            2 | 3 => {
                let need = if template == 2 { 47 } else { 49 };
                if s.len() < need {
                    self.warn_template_once("packing", template);
                    return None;
                }
                let complex = ComplexPacking {
                    simple: simple_at(s),
                    group_split_method: s[21],
                    missing_value_mgmt: s[22],
                    primary_missing: u32::from_be_bytes(s[23..27].try_into().unwrap()),
                    secondary_missing: u32::from_be_bytes(s[27..31].try_into().unwrap()),
                    ngroups: u32::from_be_bytes(s[31..35].try_into().unwrap()),
                    ref_group_width: s[35] as u32,
                    nbits_group_width: s[36] as u32,
                    ref_group_length: u32::from_be_bytes(s[37..41].try_into().unwrap()),
                    incr_group_length: s[41] as u32,
                    last_group_length: u32::from_be_bytes(s[42..46].try_into().unwrap()),
                    nbits_group_length: s[46] as u32,
                };
                if template == 2 {
                    Some(PackingParams::Complex(complex))
                } else {
                    let order = s[47];
                    if order != 1 && order != 2 {
                        self.warn_template_once("packing", template);
                        return None;
                    }
                    Some(PackingParams::ComplexSpatialDiff(SpatialDiffPacking {
                        complex,
                        order,
                        extra_descriptor_octets: s[48],
                    }))
                }
            }
            40 => {
                if s.len() < 23 {
                    self.warn_template_once("packing", template);
                    return None;
                }
                Some(PackingParams::Jpeg2000(Jpeg2000Packing {
                    simple: simple_at(s),
                    compression_type: s[21],
                    compression_ratio: s[22],
                }))
            }
            other => {
                self.warn_template_once("packing", other);
                None
            }
        }
    }

    /// Bitmap section. `section_offset` is the file offset of the section
    /// start.
    fn parse_section6(
        &mut self,
        s: &[u8],
        section_offset: u64,
        prev_bitmap: &Option<FileRegion>,
    ) -> Result<Option<FileRegion>, MessageFailure> {
        match s[5] {
            0 => Ok(Some(FileRegion::new(
                self.path,
                section_offset + 6,
                (s.len() - 6) as u64,
            ))),
            254 => {
                if prev_bitmap.is_none() {
                    return Err(MessageFailure::Skip(
                        "bitmap indicator 254 with no previous bitmap".into(),
                    ));
                }
                Ok(prev_bitmap.clone())
            }
            255 => Ok(None),
            other => Err(MessageFailure::Skip(format!(
                "unsupported bitmap indicator {other}"
            ))),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_layer(
        &mut self,
        ident: Option<&MessageIdent>,
        grid: &Option<Arc<GridLatLon>>,
        product: &Option<ProductState>,
        packing: &Option<PackingParams>,
        bitmap: &Option<FileRegion>,
        payload: FileRegion,
    ) {
        let (Some(ident), Some(product), Some(packing)) = (ident, product, packing) else {
            // Field skipped earlier (unsupported product or packing template).
            return;
        };
        let layer = Layer {
            param: product.param,
            reftime: ident.reftime,
            efftime: product.efftime,
            center: ident.center,
            subcenter: ident.subcenter,
            production_status: ident.production_status,
            data_type: ident.data_type,
            genprocess: product.genprocess,
            genprocess_type: product.genprocess_type,
            surface1: product.surface1,
            surface2: product.surface2,
            grid: grid.clone(),
            packing: packing.clone(),
            data: payload,
            bitmap: bitmap.clone(),
            interval_end: product.interval_end,
            stat_ranges: product.stat_ranges.clone(),
        };
        debug!(
            file = %self.path.display(),
            param = %layer.param(),
            efftime = %layer.efftime(),
            surface1 = layer.surface1().stype,
            "layer"
        );
        self.layers.push(layer);
    }
}

/// Decode a fixed-surface descriptor from type, scale factor, scaled value.
fn parse_surface(stype: u8, scale_factor: u8, scaled: &[u8]) -> SurfaceDescriptor {
    if stype == 255 {
        return SurfaceDescriptor::missing();
    }
    let raw = u32::from_be_bytes(scaled.try_into().unwrap());
    if raw == 0xffff_ffff {
        return SurfaceDescriptor {
            stype,
            value: f64::NAN,
        };
    }
    // Scale factor is a one-byte sign-magnitude integer.
    let factor = if scale_factor & 0x80 != 0 {
        -((scale_factor & 0x7f) as i32)
    } else {
        scale_factor as i32
    };
    SurfaceDescriptor {
        stype,
        value: raw as f64 * 10f64.powi(-factor),
    }
}
