//! Layers: one 2-D field per GRIB2 data section.
//!
//! A [`Layer`] carries the immutable identity of a field (parameter, times,
//! surfaces, originator, grid), the packing parameters from section 5, and
//! file-region references to the still-encoded payload. Decoding happens on
//! demand through [`Layer::decode`].

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::catalogue::{ParamId, Parameter};
use crate::decode;
use crate::grid::GridLatLon;
use crate::tables;
use crate::Grib2Result;

/// A byte range inside a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRegion {
    pub path: PathBuf,
    pub offset: u64,
    pub length: u64,
}

impl FileRegion {
    pub fn new(path: impl Into<PathBuf>, offset: u64, length: u64) -> Self {
        Self {
            path: path.into(),
            offset,
            length,
        }
    }

    /// Read the region into memory.
    pub fn read(&self) -> std::io::Result<Vec<u8>> {
        let mut f = File::open(&self.path)?;
        f.seek(SeekFrom::Start(self.offset))?;
        let mut buf = vec![0u8; self.length as usize];
        f.read_exact(&mut buf)?;
        Ok(buf)
    }
}

/// A fixed surface reference: type code plus decoded value.
///
/// `value` is NaN when the surface is missing (type 255) or its scaled value
/// is the all-ones missing marker.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceDescriptor {
    pub stype: u8,
    pub value: f64,
}

impl SurfaceDescriptor {
    pub fn missing() -> Self {
        Self {
            stype: 255,
            value: f64::NAN,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.stype == 255
    }

    pub fn type_str(&self) -> Option<&'static str> {
        tables::surface_type_str(self.stype)
    }

    pub fn unit_str(&self) -> Option<&'static str> {
        tables::surface_unit_str(self.stype)
    }
}

/// Shared rescale parameters of data representation templates 5.0/5.2/5.3.
#[derive(Debug, Clone, Copy)]
pub struct SimplePacking {
    /// Reference value R (IEEE single precision).
    pub reference_value: f32,
    /// Binary scale factor E (sign-magnitude in the wire format).
    pub binary_scale: i16,
    /// Decimal scale factor D (sign-magnitude in the wire format).
    pub decimal_scale: i16,
    /// Bits per packed value / per group reference.
    pub bits: u32,
    /// Type of original field values (0 = float, 1 = integer).
    pub field_value_type: u8,
}

impl SimplePacking {
    /// `2^E * 10^-D`
    pub fn data_scale(&self) -> f64 {
        2f64.powi(self.binary_scale as i32) * 10f64.powi(-(self.decimal_scale as i32))
    }

    /// `R * 10^-D`
    pub fn data_offset(&self) -> f64 {
        self.reference_value as f64 * 10f64.powi(-(self.decimal_scale as i32))
    }

    /// Rescale one raw packed integer to a field value.
    pub fn scale(&self, raw: i64) -> f32 {
        (self.data_offset() + self.data_scale() * raw as f64) as f32
    }

    pub fn is_float_field(&self) -> bool {
        self.field_value_type == 0
    }
}

/// Additional parameters of complex packing (template 5.2).
#[derive(Debug, Clone, Copy)]
pub struct ComplexPacking {
    pub simple: SimplePacking,
    pub group_split_method: u8,
    /// 0 none, 1 primary sentinel, 2 primary + secondary sentinels.
    pub missing_value_mgmt: u8,
    /// Raw wire representation of the sentinels.
    pub primary_missing: u32,
    pub secondary_missing: u32,
    pub ngroups: u32,
    pub ref_group_width: u32,
    pub nbits_group_width: u32,
    pub ref_group_length: u32,
    pub incr_group_length: u32,
    pub last_group_length: u32,
    pub nbits_group_length: u32,
}

impl ComplexPacking {
    pub fn has_primary_missing(&self) -> bool {
        self.missing_value_mgmt == 1 || self.missing_value_mgmt == 2
    }

    pub fn has_secondary_missing(&self) -> bool {
        self.missing_value_mgmt == 2
    }
}

/// Complex packing with spatial differencing (template 5.3).
#[derive(Debug, Clone, Copy)]
pub struct SpatialDiffPacking {
    pub complex: ComplexPacking,
    /// Order of differencing, 1 or 2.
    pub order: u8,
    /// Octets per extra descriptor (initial values and minimum).
    pub extra_descriptor_octets: u8,
}

/// JPEG2000 code-stream packing (template 5.40).
#[derive(Debug, Clone, Copy)]
pub struct Jpeg2000Packing {
    pub simple: SimplePacking,
    pub compression_type: u8,
    pub compression_ratio: u8,
}

/// The packing-specific half of a layer; a closed sum over the supported
/// data representation templates.
#[derive(Debug, Clone)]
pub enum PackingParams {
    Simple(SimplePacking),
    Complex(ComplexPacking),
    ComplexSpatialDiff(SpatialDiffPacking),
    Jpeg2000(Jpeg2000Packing),
}

impl PackingParams {
    /// The common rescale header shared by all variants.
    pub fn simple(&self) -> &SimplePacking {
        match self {
            PackingParams::Simple(p) => p,
            PackingParams::Complex(p) => &p.simple,
            PackingParams::ComplexSpatialDiff(p) => &p.complex.simple,
            PackingParams::Jpeg2000(p) => &p.simple,
        }
    }

    /// Data representation template number this variant came from.
    pub fn template_number(&self) -> u16 {
        match self {
            PackingParams::Simple(_) => 0,
            PackingParams::Complex(_) => 2,
            PackingParams::ComplexSpatialDiff(_) => 3,
            PackingParams::Jpeg2000(_) => 40,
        }
    }
}

/// One statistical time-range specification from product template 4.8.
/// Parsed and retained; not interpreted by the core.
#[derive(Debug, Clone, Copy)]
pub struct StatTimeRange {
    pub process: u8,
    pub increment_type: u8,
    pub unit: u8,
    pub length: u32,
    pub increment_unit: u8,
    pub increment: u32,
}

/// The total-ordering identity of a layer.
///
/// Two layers with equal keys describe the same field; the registry keeps
/// only the first. Float surface values order by raw bits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LayerKey {
    pub param: ParamId,
    pub reftime: DateTime<Utc>,
    pub efftime: DateTime<Utc>,
    pub center: u16,
    pub subcenter: u16,
    pub production_status: u8,
    pub data_type: u8,
    pub genprocess: u8,
    pub genprocess_type: u8,
    pub surface1_type: u8,
    pub surface1_value_bits: u64,
    pub surface2_type: u8,
    pub surface2_value_bits: u64,
    pub grid: Option<Arc<GridLatLon>>,
}

/// One 2-D field, identity plus encoded-payload references.
#[derive(Debug, Clone)]
pub struct Layer {
    pub(crate) param: ParamId,
    pub(crate) reftime: DateTime<Utc>,
    pub(crate) efftime: DateTime<Utc>,
    pub(crate) center: u16,
    pub(crate) subcenter: u16,
    pub(crate) production_status: u8,
    pub(crate) data_type: u8,
    pub(crate) genprocess: u8,
    pub(crate) genprocess_type: u8,
    pub(crate) surface1: SurfaceDescriptor,
    pub(crate) surface2: SurfaceDescriptor,
    pub(crate) grid: Option<Arc<GridLatLon>>,
    pub(crate) packing: PackingParams,
    pub(crate) data: FileRegion,
    pub(crate) bitmap: Option<FileRegion>,
    pub(crate) interval_end: Option<DateTime<Utc>>,
    pub(crate) stat_ranges: Vec<StatTimeRange>,
}

impl Layer {
    pub fn param(&self) -> ParamId {
        self.param
    }

    pub fn parameter(&self) -> Option<&'static Parameter> {
        self.param.parameter()
    }

    pub fn reftime(&self) -> DateTime<Utc> {
        self.reftime
    }

    pub fn efftime(&self) -> DateTime<Utc> {
        self.efftime
    }

    pub fn center(&self) -> u16 {
        self.center
    }

    pub fn subcenter(&self) -> u16 {
        self.subcenter
    }

    pub fn production_status(&self) -> u8 {
        self.production_status
    }

    pub fn data_type(&self) -> u8 {
        self.data_type
    }

    pub fn genprocess(&self) -> u8 {
        self.genprocess
    }

    pub fn genprocess_type(&self) -> u8 {
        self.genprocess_type
    }

    pub fn surface1(&self) -> SurfaceDescriptor {
        self.surface1
    }

    pub fn surface2(&self) -> SurfaceDescriptor {
        self.surface2
    }

    pub fn grid(&self) -> Option<&Arc<GridLatLon>> {
        self.grid.as_ref()
    }

    pub fn packing(&self) -> &PackingParams {
        &self.packing
    }

    pub fn data_region(&self) -> &FileRegion {
        &self.data
    }

    pub fn bitmap_region(&self) -> Option<&FileRegion> {
        self.bitmap.as_ref()
    }

    /// End of the statistical-processing interval (product template 4.8).
    pub fn interval_end(&self) -> Option<DateTime<Utc>> {
        self.interval_end
    }

    /// Statistical time-range specs (product template 4.8), unprocessed.
    pub fn stat_ranges(&self) -> &[StatTimeRange] {
        &self.stat_ranges
    }

    /// Path of the file this layer's payload lives in.
    pub fn source_path(&self) -> &Path {
        &self.data.path
    }

    /// Whether the backing file is still present.
    pub fn source_exists(&self) -> bool {
        self.data.path.exists()
    }

    /// The identity key used for registry ordering and deduplication.
    pub fn key(&self) -> LayerKey {
        LayerKey {
            param: self.param,
            reftime: self.reftime,
            efftime: self.efftime,
            center: self.center,
            subcenter: self.subcenter,
            production_status: self.production_status,
            data_type: self.data_type,
            genprocess: self.genprocess,
            genprocess_type: self.genprocess_type,
            surface1_type: self.surface1.stype,
            surface1_value_bits: self.surface1.value.to_bits(),
            surface2_type: self.surface2.stype,
            surface2_value_bits: self.surface2.value.to_bits(),
            grid: self.grid.clone(),
        }
    }

    /// Read the still-encoded section 7 payload.
    pub fn read_payload(&self) -> std::io::Result<Vec<u8>> {
        self.data.read()
    }

    /// Read the bitmap bytes, if the field carries one.
    pub fn read_bitmap(&self) -> std::io::Result<Option<Vec<u8>>> {
        match &self.bitmap {
            Some(region) => Ok(Some(region.read()?)),
            None => Ok(None),
        }
    }

    /// Decode the payload into one float per grid cell, NaN where the bitmap
    /// marks a cell invalid or the stream carries a missing sentinel.
    pub fn decode(&self) -> Grib2Result<Vec<f32>> {
        decode::decode_layer(self)
    }

    /// Human-readable parameter description, e.g. for dump tools.
    pub fn describe_parameter(&self) -> String {
        match self.parameter() {
            Some(p) => match p.unit() {
                Some(unit) => format!("{} [{}]", p.name(), unit),
                None => p.name().to_string(),
            },
            None => format!(
                "{}/{}/{}",
                self.param.discipline, self.param.category, self.param.number
            ),
        }
    }
}
