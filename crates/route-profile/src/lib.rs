//! Route weather profiles: sample the interpolated GRIB2 fields of a layer
//! store along a great-circle route and assemble a multi-level sounding per
//! sample point.

pub mod builder;
pub mod levels;
pub mod types;

pub use builder::{ProfileBuilder, ProfileConfig, Waypoint};
pub use levels::{isa_altitude_m, ISOBARIC_LEVELS_HPA, NUM_LEVELS};
pub use types::{CloudLayer, SurfaceSample, WeatherProfile, WeatherProfilePoint, WxFlags};

use thiserror::Error;

/// Result type for profile building.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors surfaced by the profile builder.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// The route has no waypoints.
    #[error("route is empty")]
    EmptyRoute,

    /// Invalid builder configuration.
    #[error("profile configuration: {0}")]
    Config(String),

    /// The layer store failed while loading a field.
    #[error("layer store: {0}")]
    Store(#[from] layer_store::StoreError),
}
