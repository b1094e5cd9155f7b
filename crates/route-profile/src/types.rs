//! Weather profile value types: per-level sounding samples, cloud layers,
//! weather flags, and the profile aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::levels::NUM_LEVELS;

/// Meteorological state at one isobaric level of one profile point.
///
/// Temperature in Kelvin, winds in m/s, relative humidity in percent,
/// shear in 1/s. NaN where no data was available.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SurfaceSample {
    pub u_wind: f32,
    pub v_wind: f32,
    pub temperature: f32,
    pub relative_humidity: f32,
    pub h_wind_shear: f32,
    pub v_wind_shear: f32,
}

impl Default for SurfaceSample {
    fn default() -> Self {
        Self {
            u_wind: f32::NAN,
            v_wind: f32::NAN,
            temperature: f32::NAN,
            relative_humidity: f32::NAN,
            h_wind_shear: f32::NAN,
            v_wind_shear: f32::NAN,
        }
    }
}

// Magnus formula constants (Bolton).
const MAGNUS_B: f32 = 17.67;
const MAGNUS_C: f32 = 243.5;
const KELVIN: f32 = 273.15;

impl SurfaceSample {
    /// Wind speed in m/s.
    pub fn wind_speed(&self) -> f32 {
        (self.u_wind * self.u_wind + self.v_wind * self.v_wind).sqrt()
    }

    /// Meteorological wind direction in degrees (direction the wind blows
    /// from, 0 = north).
    pub fn wind_dir_deg(&self) -> f32 {
        let dir = (-self.u_wind).atan2(-self.v_wind).to_degrees();
        if dir < 0.0 {
            dir + 360.0
        } else {
            dir
        }
    }

    /// Dew point in Kelvin from temperature and relative humidity
    /// (Magnus formula).
    pub fn dew_point(&self) -> f32 {
        if self.temperature.is_nan()
            || self.relative_humidity.is_nan()
            || self.relative_humidity <= 0.0
        {
            return f32::NAN;
        }
        let t = self.temperature - KELVIN;
        let gamma = (self.relative_humidity / 100.0).ln() + MAGNUS_B * t / (MAGNUS_C + t);
        MAGNUS_C * gamma / (MAGNUS_B - gamma) + KELVIN
    }

    /// A simple shear-based turbulence index, larger is rougher.
    pub fn turbulence_index(&self) -> f32 {
        if self.h_wind_shear.is_nan() || self.v_wind_shear.is_nan() {
            return f32::NAN;
        }
        (self.h_wind_shear * self.h_wind_shear + self.v_wind_shear * self.v_wind_shear).sqrt()
    }

    pub fn is_valid(&self) -> bool {
        !self.temperature.is_nan() && !self.u_wind.is_nan() && !self.v_wind.is_nan()
    }
}

/// One cloud layer: fractional cover plus base and top altitude.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CloudLayer {
    /// Cover in percent, NaN unknown.
    pub cover: f32,
    /// Base altitude in meters (ISA), NaN unknown.
    pub base_m: f32,
    /// Top altitude in meters (ISA), NaN unknown.
    pub top_m: f32,
}

impl Default for CloudLayer {
    fn default() -> Self {
        Self {
            cover: f32::NAN,
            base_m: f32::NAN,
            top_m: f32::NAN,
        }
    }
}

impl CloudLayer {
    pub fn is_present(&self) -> bool {
        self.cover > 0.0
    }
}

/// Weather condition flags for one profile point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WxFlags(pub u16);

impl WxFlags {
    pub const DAYTIME_MASK: u16 = 0x03;
    pub const DAY: u16 = 0x00;
    pub const DUSK: u16 = 0x01;
    pub const NIGHT: u16 = 0x02;
    pub const DAWN: u16 = 0x03;
    pub const RAIN: u16 = 0x04;
    pub const FREEZING_RAIN: u16 = 0x08;
    pub const ICE_PELLETS: u16 = 0x10;
    pub const SNOW: u16 = 0x20;

    pub fn set(&mut self, flag: u16) {
        self.0 |= flag;
    }

    pub fn set_daytime(&mut self, phase: u16) {
        self.0 = (self.0 & !Self::DAYTIME_MASK) | (phase & Self::DAYTIME_MASK);
    }

    pub fn daytime(&self) -> u16 {
        self.0 & Self::DAYTIME_MASK
    }

    pub fn contains(&self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    pub fn is_day(&self) -> bool {
        self.daytime() == Self::DAY
    }

    pub fn is_night(&self) -> bool {
        self.daytime() == Self::NIGHT
    }

    pub fn has_precipitation(&self) -> bool {
        self.0 & (Self::RAIN | Self::FREEZING_RAIN | Self::ICE_PELLETS | Self::SNOW) != 0
    }
}

/// The full sounding and derived scalars at one point along a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherProfilePoint {
    pub lat: f64,
    pub lon: f64,
    /// Valid time at this point.
    pub efftime: DateTime<Utc>,
    /// Planned altitude in feet.
    pub alt_ft: f64,
    /// Distance from the previous sample in nautical miles.
    pub dist_nm: f64,
    /// Cumulative route distance in nautical miles.
    pub route_dist_nm: f64,
    /// Index of the route leg this sample belongs to.
    pub route_index: usize,

    /// Per-isobaric-level samples, surface upward.
    pub surfaces: [SurfaceSample; NUM_LEVELS],

    /// Altitude of the 0 degC isotherm, meters, NaN unknown.
    pub zero_deg_isotherm_m: f32,
    /// Tropopause altitude, meters, NaN unknown.
    pub tropopause_m: f32,
    /// Boundary-layer top above ground, meters, NaN unknown.
    pub boundary_layer_height_m: f32,
    /// Boundary-layer cloud cover in percent, NaN unknown.
    pub boundary_cloud_cover: f32,

    pub cloud_low: CloudLayer,
    pub cloud_mid: CloudLayer,
    pub cloud_high: CloudLayer,
    pub cloud_convective: CloudLayer,

    /// Accumulated precipitation, kg/m^2.
    pub precip: f32,
    /// Precipitation rate, kg/m^2/s.
    pub precip_rate: f32,
    /// Convective precipitation, kg/m^2.
    pub conv_precip: f32,
    /// Convective precipitation rate, kg/m^2/s.
    pub conv_precip_rate: f32,

    pub lifted_index: f32,
    pub cape: f32,
    pub cin: f32,

    pub flags: WxFlags,
}

impl WeatherProfilePoint {
    pub fn new(
        lat: f64,
        lon: f64,
        efftime: DateTime<Utc>,
        alt_ft: f64,
        dist_nm: f64,
        route_dist_nm: f64,
        route_index: usize,
    ) -> Self {
        Self {
            lat,
            lon,
            efftime,
            alt_ft,
            dist_nm,
            route_dist_nm,
            route_index,
            surfaces: [SurfaceSample::default(); NUM_LEVELS],
            zero_deg_isotherm_m: f32::NAN,
            tropopause_m: f32::NAN,
            boundary_layer_height_m: f32::NAN,
            boundary_cloud_cover: f32::NAN,
            cloud_low: CloudLayer::default(),
            cloud_mid: CloudLayer::default(),
            cloud_high: CloudLayer::default(),
            cloud_convective: CloudLayer::default(),
            precip: f32::NAN,
            precip_rate: f32::NAN,
            conv_precip: f32::NAN,
            conv_precip_rate: f32::NAN,
            lifted_index: f32::NAN,
            cape: f32::NAN,
            cin: f32::NAN,
            flags: WxFlags::default(),
        }
    }
}

/// A route sounding: profile points plus the span of model times that fed
/// them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherProfile {
    points: Vec<WeatherProfilePoint>,
    min_efftime: Option<DateTime<Utc>>,
    max_efftime: Option<DateTime<Utc>>,
    min_reftime: Option<DateTime<Utc>>,
    max_reftime: Option<DateTime<Utc>>,
}

impl WeatherProfile {
    pub fn push(&mut self, point: WeatherProfilePoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[WeatherProfilePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total route distance in nautical miles.
    pub fn dist_nm(&self) -> f64 {
        self.points.last().map(|p| p.route_dist_nm).unwrap_or(0.0)
    }

    pub fn add_efftime(&mut self, t: DateTime<Utc>) {
        self.min_efftime = Some(self.min_efftime.map_or(t, |m| m.min(t)));
        self.max_efftime = Some(self.max_efftime.map_or(t, |m| m.max(t)));
    }

    pub fn add_reftime(&mut self, t: DateTime<Utc>) {
        self.min_reftime = Some(self.min_reftime.map_or(t, |m| m.min(t)));
        self.max_reftime = Some(self.max_reftime.map_or(t, |m| m.max(t)));
    }

    pub fn min_efftime(&self) -> Option<DateTime<Utc>> {
        self.min_efftime
    }

    pub fn max_efftime(&self) -> Option<DateTime<Utc>> {
        self.max_efftime
    }

    pub fn min_reftime(&self) -> Option<DateTime<Utc>> {
        self.min_reftime
    }

    pub fn max_reftime(&self) -> Option<DateTime<Utc>> {
        self.max_reftime
    }
}

impl std::ops::Index<usize> for WeatherProfile {
    type Output = WeatherProfilePoint;

    fn index(&self, i: usize) -> &WeatherProfilePoint {
        &self.points[i]
    }
}

impl<'a> IntoIterator for &'a WeatherProfile {
    type Item = &'a WeatherProfilePoint;
    type IntoIter = std::slice::Iter<'a, WeatherProfilePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
