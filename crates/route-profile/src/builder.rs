//! Build a multi-level route sounding from the layer store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use grib2_reader::ParamId;
use layer_store::{interpolate_layers, LayerHandle, LayerStore};
use wx_common::geo::{great_circle_distance_nm, intermediate_point, solar_elevation_deg};
use wx_common::LatLonBox;

use crate::levels::{isa_altitude_m, level_altitude_m, ISOBARIC_LEVELS_HPA, NUM_LEVELS};
use crate::types::{CloudLayer, WeatherProfile, WeatherProfilePoint, WxFlags};
use crate::{ProfileError, ProfileResult};

// Parameters sampled along the route.
const TMP: ParamId = ParamId { discipline: 0, category: 0, number: 0 };
const RH: ParamId = ParamId { discipline: 0, category: 1, number: 1 };
const UGRD: ParamId = ParamId { discipline: 0, category: 2, number: 2 };
const VGRD: ParamId = ParamId { discipline: 0, category: 2, number: 3 };
const PRES: ParamId = ParamId { discipline: 0, category: 3, number: 0 };
const HGT: ParamId = ParamId { discipline: 0, category: 3, number: 5 };
const HPBL: ParamId = ParamId { discipline: 0, category: 3, number: 18 };
const TCDC: ParamId = ParamId { discipline: 0, category: 6, number: 1 };
const LCDC: ParamId = ParamId { discipline: 0, category: 6, number: 3 };
const MCDC: ParamId = ParamId { discipline: 0, category: 6, number: 4 };
const HCDC: ParamId = ParamId { discipline: 0, category: 6, number: 5 };
const PRATE: ParamId = ParamId { discipline: 0, category: 1, number: 7 };
const APCP: ParamId = ParamId { discipline: 0, category: 1, number: 8 };
const ACPCP: ParamId = ParamId { discipline: 0, category: 1, number: 10 };
const CPRAT: ParamId = ParamId { discipline: 0, category: 1, number: 37 };
const CRAIN: ParamId = ParamId { discipline: 0, category: 1, number: 33 };
const CFRZR: ParamId = ParamId { discipline: 0, category: 1, number: 34 };
const CICEP: ParamId = ParamId { discipline: 0, category: 1, number: 35 };
const CSNOW: ParamId = ParamId { discipline: 0, category: 1, number: 36 };
const CAPE: ParamId = ParamId { discipline: 0, category: 7, number: 6 };
const CIN: ParamId = ParamId { discipline: 0, category: 7, number: 7 };
const LFTX: ParamId = ParamId { discipline: 0, category: 7, number: 10 };

// Fixed-surface type codes (code table 4.5).
const SFC_GROUND: u8 = 1;
const SFC_ZERO_DEG_ISOTHERM: u8 = 4;
const SFC_TROPOPAUSE: u8 = 7;
const SFC_ISOBARIC: u8 = 100;
const SFC_BOUNDARY_CLOUD_LAYER: u8 = 211;
const SFC_LOW_CLOUD_BOTTOM: u8 = 212;
const SFC_LOW_CLOUD_TOP: u8 = 213;
const SFC_LOW_CLOUD_LAYER: u8 = 214;
const SFC_MID_CLOUD_BOTTOM: u8 = 222;
const SFC_MID_CLOUD_TOP: u8 = 223;
const SFC_MID_CLOUD_LAYER: u8 = 224;
const SFC_HIGH_CLOUD_BOTTOM: u8 = 232;
const SFC_HIGH_CLOUD_TOP: u8 = 233;
const SFC_HIGH_CLOUD_LAYER: u8 = 234;
const SFC_CONV_CLOUD_BOTTOM: u8 = 242;
const SFC_CONV_CLOUD_TOP: u8 = 243;
const SFC_CONV_CLOUD_LAYER: u8 = 244;

/// One route waypoint: position, planned altitude, and time offset from the
/// start of the route.
#[derive(Debug, Clone, Copy)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    pub alt_ft: f64,
    pub time_offset: Duration,
}

/// Configuration for the profile builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Route sampling interval in nautical miles.
    pub sampling_nautical_miles: f64,
    /// Side length of the sampling box around each point, degrees.
    pub sampling_box_deg: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            sampling_nautical_miles: 5.0,
            sampling_box_deg: 0.5,
        }
    }
}

impl ProfileConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(val) = std::env::var("PROFILE_SAMPLING_NAUTICAL_MILES") {
            if let Ok(nm) = val.parse() {
                config.sampling_nautical_miles = nm;
            }
        }
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sampling_nautical_miles.is_nan() || self.sampling_nautical_miles <= 0.0 {
            return Err("sampling_nautical_miles must be > 0".to_string());
        }
        if self.sampling_box_deg.is_nan() || self.sampling_box_deg <= 0.0 {
            return Err("sampling_box_deg must be > 0".to_string());
        }
        Ok(())
    }
}

/// Layers of the store grouped by (parameter, first-surface type), so each
/// sample point only scans the handful of layers that can contribute.
struct FieldIndex {
    fields: HashMap<(ParamId, u8), Vec<Arc<LayerHandle>>>,
}

impl FieldIndex {
    fn build(store: &LayerStore) -> Self {
        let mut fields: HashMap<(ParamId, u8), Vec<Arc<LayerHandle>>> = HashMap::new();
        for handle in store.find_all() {
            let layer = handle.layer();
            if layer.grid().is_none() {
                continue;
            }
            fields
                .entry((layer.param(), layer.surface1().stype))
                .or_default()
                .push(handle);
        }
        Self { fields }
    }

    /// Layers of one field bracketing the requested effective time and
    /// (optionally) first-surface value: the corners the interpolator needs.
    fn candidates(
        &self,
        param: ParamId,
        stype: u8,
        efftime: DateTime<Utc>,
        value: Option<f64>,
    ) -> Vec<Arc<LayerHandle>> {
        let Some(layers) = self.fields.get(&(param, stype)) else {
            return Vec::new();
        };

        let mut times: Vec<DateTime<Utc>> = layers.iter().map(|h| h.layer().efftime()).collect();
        times.sort();
        times.dedup();
        let Some(&first) = times.first() else {
            return Vec::new();
        };
        let t_lo = times.iter().rev().find(|&&t| t <= efftime).copied().unwrap_or(first);
        let t_hi = times
            .iter()
            .find(|&&t| t >= efftime)
            .copied()
            .unwrap_or(*times.last().unwrap_or(&first));

        let in_time = |h: &&Arc<LayerHandle>| {
            let t = h.layer().efftime();
            t == t_lo || t == t_hi
        };

        match value {
            None => layers.iter().filter(in_time).cloned().collect(),
            Some(requested) => {
                let mut values: Vec<f64> = layers
                    .iter()
                    .filter(in_time)
                    .map(|h| h.layer().surface1().value)
                    .filter(|v| !v.is_nan())
                    .collect();
                values.sort_by(f64::total_cmp);
                values.dedup();
                let Some(&lowest) = values.first() else {
                    return Vec::new();
                };
                let v_lo = values
                    .iter()
                    .rev()
                    .find(|&&v| v <= requested)
                    .copied()
                    .unwrap_or(lowest);
                let v_hi = values
                    .iter()
                    .find(|&&v| v >= requested)
                    .copied()
                    .unwrap_or(*values.last().unwrap_or(&lowest));
                layers
                    .iter()
                    .filter(in_time)
                    .filter(|h| {
                        let v = h.layer().surface1().value;
                        v == v_lo || v == v_hi
                    })
                    .cloned()
                    .collect()
            }
        }
    }
}

/// Builds route weather profiles from a layer store.
///
/// A builder is a pure function of its inputs and the registry contents;
/// concurrent builds over disjoint routes are safe.
pub struct ProfileBuilder<'a> {
    store: &'a LayerStore,
    config: ProfileConfig,
}

impl<'a> ProfileBuilder<'a> {
    pub fn new(store: &'a LayerStore) -> Self {
        Self {
            store,
            config: ProfileConfig::default(),
        }
    }

    pub fn with_config(store: &'a LayerStore, config: ProfileConfig) -> Self {
        Self { store, config }
    }

    /// Build the profile for a route departing at `route_start`.
    pub fn build(
        &self,
        route: &[Waypoint],
        route_start: DateTime<Utc>,
    ) -> ProfileResult<WeatherProfile> {
        let no_cancel = AtomicBool::new(false);
        self.build_cancellable(route, route_start, &no_cancel)
    }

    /// Like [`build`](Self::build), but checks `cancel` between sample
    /// points and returns the partial profile when it flips.
    pub fn build_cancellable(
        &self,
        route: &[Waypoint],
        route_start: DateTime<Utc>,
        cancel: &AtomicBool,
    ) -> ProfileResult<WeatherProfile> {
        if route.is_empty() {
            return Err(ProfileError::EmptyRoute);
        }
        self.config
            .validate()
            .map_err(ProfileError::Config)?;

        let index = FieldIndex::build(self.store);
        let mut profile = WeatherProfile::default();

        for sample in densify(route, self.config.sampling_nautical_miles) {
            if cancel.load(Ordering::Relaxed) {
                debug!("profile build cancelled");
                break;
            }
            let point = self.sample_point(&index, &mut profile, &sample, route_start);
            profile.add_efftime(point.efftime);
            profile.push(point);
        }
        Ok(profile)
    }

    fn sample_point(
        &self,
        index: &FieldIndex,
        profile: &mut WeatherProfile,
        sample: &RouteSample,
        route_start: DateTime<Utc>,
    ) -> WeatherProfilePoint {
        let efftime = route_start + sample.time_offset;
        let bbox = LatLonBox::around(sample.lat, sample.lon, self.config.sampling_box_deg);
        let mut point = WeatherProfilePoint::new(
            sample.lat,
            sample.lon,
            efftime,
            sample.alt_ft,
            sample.dist_nm,
            sample.route_dist_nm,
            sample.route_index,
        );

        let mut get = |param: ParamId, stype: u8, value: Option<f64>| -> f32 {
            let candidates = index.candidates(param, stype, efftime, value);
            if candidates.is_empty() {
                return f32::NAN;
            }
            match interpolate_layers(&bbox, &candidates, efftime, value) {
                Ok(Some(interp)) => {
                    profile.add_reftime(interp.min_reftime());
                    profile.add_reftime(interp.max_reftime());
                    let idx = interp.index_of(efftime, value.unwrap_or(f64::NAN));
                    interp.value_at(sample.lat, sample.lon, idx)
                }
                Ok(None) => f32::NAN,
                Err(err) => {
                    warn!(%param, stype, %err, "field sample failed");
                    f32::NAN
                }
            }
        };

        // The sounding itself.
        for (i, &level_hpa) in ISOBARIC_LEVELS_HPA.iter().enumerate() {
            let pressure = Some(level_hpa as f64 * 100.0);
            point.surfaces[i].temperature = get(TMP, SFC_ISOBARIC, pressure);
            point.surfaces[i].relative_humidity = get(RH, SFC_ISOBARIC, pressure);
            point.surfaces[i].u_wind = get(UGRD, SFC_ISOBARIC, pressure);
            point.surfaces[i].v_wind = get(VGRD, SFC_ISOBARIC, pressure);
        }
        compute_shear(&mut point);

        // Derived altitudes.
        point.zero_deg_isotherm_m = get(HGT, SFC_ZERO_DEG_ISOTHERM, None);
        point.tropopause_m = get(HGT, SFC_TROPOPAUSE, None);
        point.boundary_layer_height_m = get(HPBL, SFC_GROUND, None);
        point.boundary_cloud_cover = get(TCDC, SFC_BOUNDARY_CLOUD_LAYER, None);

        // Cloud layers: cover plus pressure bounds mapped onto ISA altitude.
        let cloud = |get: &mut dyn FnMut(ParamId, u8, Option<f64>) -> f32,
                     cover_param: ParamId,
                     layer: u8,
                     bottom: u8,
                     top: u8| {
            CloudLayer {
                cover: get(cover_param, layer, None),
                base_m: pressure_to_altitude(get(PRES, bottom, None)),
                top_m: pressure_to_altitude(get(PRES, top, None)),
            }
        };
        point.cloud_low = cloud(
            &mut get,
            LCDC,
            SFC_LOW_CLOUD_LAYER,
            SFC_LOW_CLOUD_BOTTOM,
            SFC_LOW_CLOUD_TOP,
        );
        point.cloud_mid = cloud(
            &mut get,
            MCDC,
            SFC_MID_CLOUD_LAYER,
            SFC_MID_CLOUD_BOTTOM,
            SFC_MID_CLOUD_TOP,
        );
        point.cloud_high = cloud(
            &mut get,
            HCDC,
            SFC_HIGH_CLOUD_LAYER,
            SFC_HIGH_CLOUD_BOTTOM,
            SFC_HIGH_CLOUD_TOP,
        );
        point.cloud_convective = cloud(
            &mut get,
            TCDC,
            SFC_CONV_CLOUD_LAYER,
            SFC_CONV_CLOUD_BOTTOM,
            SFC_CONV_CLOUD_TOP,
        );

        // Precipitation and stability.
        point.precip = get(APCP, SFC_GROUND, None);
        point.precip_rate = get(PRATE, SFC_GROUND, None);
        point.conv_precip = get(ACPCP, SFC_GROUND, None);
        point.conv_precip_rate = get(CPRAT, SFC_GROUND, None);
        point.lifted_index = get(LFTX, SFC_GROUND, None);
        point.cape = get(CAPE, SFC_GROUND, None);
        point.cin = get(CIN, SFC_GROUND, None);

        // Weather flags: categorical precipitation type plus day phase.
        let mut flags = WxFlags::default();
        if get(CRAIN, SFC_GROUND, None) >= 0.5 {
            flags.set(WxFlags::RAIN);
        }
        if get(CFRZR, SFC_GROUND, None) >= 0.5 {
            flags.set(WxFlags::FREEZING_RAIN);
        }
        if get(CICEP, SFC_GROUND, None) >= 0.5 {
            flags.set(WxFlags::ICE_PELLETS);
        }
        if get(CSNOW, SFC_GROUND, None) >= 0.5 {
            flags.set(WxFlags::SNOW);
        }
        flags.set_daytime(day_phase(sample.lat, sample.lon, efftime));
        point.flags = flags;

        point
    }
}

/// NaN-preserving Pa to ISA altitude conversion.
fn pressure_to_altitude(pressure_pa: f32) -> f32 {
    if pressure_pa.is_nan() || pressure_pa <= 0.0 {
        return f32::NAN;
    }
    isa_altitude_m(pressure_pa as f64) as f32
}

/// Wind shear between adjacent sounding levels, scaled by the ISA
/// geopotential thickness of the gap.
fn compute_shear(point: &mut WeatherProfilePoint) {
    let mut hwsh = [f32::NAN; NUM_LEVELS];
    let mut vwsh = [f32::NAN; NUM_LEVELS];
    for i in 0..NUM_LEVELS {
        let (a, b) = if i + 1 < NUM_LEVELS {
            (i, i + 1)
        } else {
            (i - 1, i)
        };
        let lo = &point.surfaces[a];
        let hi = &point.surfaces[b];
        let dh = (level_altitude_m(b) - level_altitude_m(a)) as f32;
        if dh <= 0.0 {
            continue;
        }
        hwsh[i] = (hi.wind_speed() - lo.wind_speed()).abs() / dh;
        let du = hi.u_wind - lo.u_wind;
        let dv = hi.v_wind - lo.v_wind;
        vwsh[i] = (du * du + dv * dv).sqrt() / dh;
    }
    for i in 0..NUM_LEVELS {
        point.surfaces[i].h_wind_shear = hwsh[i];
        point.surfaces[i].v_wind_shear = vwsh[i];
    }
}

/// Day / dawn / night / dusk from solar elevation (civil twilight at -6
/// degrees; the trend over the next few minutes separates dawn from dusk).
fn day_phase(lat: f64, lon: f64, time: DateTime<Utc>) -> u16 {
    let elev = solar_elevation_deg(lat, lon, time);
    if elev >= 0.0 {
        WxFlags::DAY
    } else if elev >= -6.0 {
        let later = solar_elevation_deg(lat, lon, time + Duration::minutes(10));
        if later > elev {
            WxFlags::DAWN
        } else {
            WxFlags::DUSK
        }
    } else {
        WxFlags::NIGHT
    }
}

struct RouteSample {
    lat: f64,
    lon: f64,
    alt_ft: f64,
    time_offset: Duration,
    dist_nm: f64,
    route_dist_nm: f64,
    route_index: usize,
}

/// Expand route legs into samples no more than `spacing_nm` apart,
/// interpolating position along the great circle and altitude and time
/// linearly.
fn densify(route: &[Waypoint], spacing_nm: f64) -> Vec<RouteSample> {
    let mut samples = Vec::new();
    let first = route[0];
    samples.push(RouteSample {
        lat: first.lat,
        lon: first.lon,
        alt_ft: first.alt_ft,
        time_offset: first.time_offset,
        dist_nm: 0.0,
        route_dist_nm: 0.0,
        route_index: 0,
    });

    let mut route_dist = 0.0f64;
    for (leg, pair) in route.windows(2).enumerate() {
        let (w1, w2) = (pair[0], pair[1]);
        let leg_dist = great_circle_distance_nm(w1.lat, w1.lon, w2.lat, w2.lon);
        let nseg = (leg_dist / spacing_nm).ceil().max(1.0) as usize;
        let dt = w2.time_offset - w1.time_offset;
        for k in 1..=nseg {
            let f = k as f64 / nseg as f64;
            let (lat, lon) = intermediate_point(w1.lat, w1.lon, w2.lat, w2.lon, f);
            let step = leg_dist / nseg as f64;
            route_dist += step;
            samples.push(RouteSample {
                lat,
                lon,
                alt_ft: w1.alt_ft + (w2.alt_ft - w1.alt_ft) * f,
                time_offset: w1.time_offset
                    + Duration::seconds((dt.num_seconds() as f64 * f) as i64),
                dist_nm: step,
                route_dist_nm: route_dist,
                route_index: leg,
            });
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(lat: f64, lon: f64, minutes: i64) -> Waypoint {
        Waypoint {
            lat,
            lon,
            alt_ft: 10_000.0,
            time_offset: Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_densify_spacing() {
        // 40N 10W to 40N 0E is roughly 460 nm.
        let route = [wp(40.0, -10.0, 0), wp(40.0, 0.0, 60)];
        let samples = densify(&route, 5.0);
        // First sample is the departure point.
        assert_eq!(samples[0].lat, 40.0);
        assert_eq!(samples[0].route_dist_nm, 0.0);
        // No gap exceeds the spacing.
        assert!(samples.iter().skip(1).all(|s| s.dist_nm <= 5.0 + 1e-6));
        // The last sample is the destination.
        let last = samples.last().unwrap();
        assert!((last.lon - 0.0).abs() < 1e-6);
        assert_eq!(last.time_offset, Duration::minutes(60));
        let total = samples.last().unwrap().route_dist_nm;
        assert!((455.0..470.0).contains(&total), "got {total}");
    }

    #[test]
    fn test_densify_single_waypoint() {
        let route = [wp(47.0, 8.0, 0)];
        let samples = densify(&route, 5.0);
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_day_phase() {
        use chrono::TimeZone;
        // Noon on the equator is day, midnight is night.
        let noon = Utc.with_ymd_and_hms(2013, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(day_phase(0.0, 0.0, noon), WxFlags::DAY);
        let midnight = Utc.with_ymd_and_hms(2013, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(day_phase(0.0, 0.0, midnight), WxFlags::NIGHT);
    }

    #[test]
    fn test_pressure_to_altitude() {
        assert!(pressure_to_altitude(f32::NAN).is_nan());
        assert!(pressure_to_altitude(-1.0).is_nan());
        assert!((pressure_to_altitude(101_325.0)).abs() < 1.0);
    }
}
