//! Keyed layer registry with lazy decoding, idle expiry, and an on-disk
//! decoded-value cache, plus region extraction and time/level interpolation
//! over registered layers.

pub mod config;
pub mod disk_cache;
pub mod handle;
pub mod interpolate;
pub mod region;
pub mod result;
pub mod store;

pub use config::StoreConfig;
pub use disk_cache::DiskCache;
pub use handle::LayerHandle;
pub use interpolate::interpolate_layers;
pub use result::{InterpIndex, LayerInterpolateResult, LayerResult, LinInterp};
pub use store::LayerStore;

use thiserror::Error;

/// Result type for layer-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the layer store.
///
/// Cache I/O problems are not in this list: a failed cache read or write
/// falls back to an in-memory decode and is only logged.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Decoding the layer payload failed.
    #[error("decode failed: {0}")]
    Decode(#[from] grib2_reader::Grib2Error),

    /// The store could not be set up (cache directory, configuration).
    #[error("store configuration: {0}")]
    Config(String),
}
