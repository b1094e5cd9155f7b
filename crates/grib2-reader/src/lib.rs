//! GRIB2 reader (WMO FM 92 GRIB Edition 2).
//!
//! A pure Rust implementation for parsing GRIB2 files, the standard format
//! for distributing gridded numerical weather prediction output.
//!
//! A GRIB2 file is a concatenation of messages, each built from sections:
//!
//! - Section 0: Indicator (16 bytes) - signature, discipline, message length
//! - Section 1: Identification (21+ bytes) - center, reference time, etc.
//! - Section 2: Local Use (optional) - skipped
//! - Section 3: Grid Definition (72+ bytes) - lat/lon grid geometry
//! - Section 4: Product Definition (34+ bytes) - parameter, level, forecast time
//! - Section 5: Data Representation (21+ bytes) - packing method, scale factors
//! - Section 6: Bitmap (optional) - per-cell validity mask
//! - Section 7: Data - packed grid values
//! - Section 8: End (4 bytes) - "7777" terminator
//!
//! Parsing a file yields one [`Layer`] per data section; decoding is
//! deferred until a layer's payload is actually needed.
//!
//! # Example
//!
//! ```ignore
//! use grib2_reader::parse_file;
//!
//! let layers = parse_file("gfs.grib2")?;
//! for layer in &layers {
//!     println!("{} @ {}", layer.describe_parameter(), layer.efftime());
//! }
//! ```

pub mod bitstream;
pub mod catalogue;
pub mod decode;
pub mod grid;
pub mod layer;
pub mod parser;
pub mod tables;

pub use catalogue::{ParamId, Parameter};
pub use grid::GridLatLon;
pub use layer::{FileRegion, Layer, LayerKey, PackingParams, SurfaceDescriptor};
pub use parser::{parse_directory, parse_file};

use thiserror::Error;

/// Result type for GRIB2 reader operations.
pub type Grib2Result<T> = Result<T, Grib2Error>;

/// Error types for GRIB2 parsing and decoding.
#[derive(Error, Debug)]
pub enum Grib2Error {
    /// A section length points past the end of the file.
    #[error("truncated file: section {section} needs {needed} bytes, {remaining} remain")]
    Truncated {
        section: u8,
        needed: usize,
        remaining: usize,
    },

    /// Missing "GRIB" or "7777" signature.
    #[error("bad signature: {0}")]
    BadSignature(&'static str),

    /// Grid / product / data-representation template we do not implement.
    #[error("unsupported {kind} template {template}")]
    UnsupportedTemplate { kind: &'static str, template: u16 },

    /// Internal lengths or counts of a section do not add up.
    #[error("malformed section {section}: {reason}")]
    MalformedSection { section: u8, reason: String },

    /// The packed bit stream ran out mid-field.
    #[error("bit stream underflow: need {need} bits at offset {offset}, {available} available")]
    DecodeUnderflow {
        offset: usize,
        need: u32,
        available: usize,
    },

    /// The JPEG2000 codec refused the stream (or is not compiled in).
    #[error("JPEG2000 codec error: {0}")]
    CodecError(String),

    /// Underlying file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
