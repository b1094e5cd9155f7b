//! Common types shared across the route-weather crates.

pub mod bbox;
pub mod geo;
pub mod time;

pub use bbox::LatLonBox;
pub use geo::{great_circle_distance_nm, initial_bearing_deg, intermediate_point, solar_elevation_deg};
pub use time::{effective_time, time_range_unit_seconds};
