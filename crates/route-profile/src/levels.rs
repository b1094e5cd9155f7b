//! The fixed isobaric levels of a sounding and standard-atmosphere
//! altitude conversion.

/// The 27 isobaric levels of a profile sounding, in hPa, surface upward.
pub const ISOBARIC_LEVELS_HPA: [u16; 27] = [
    1000, 975, 950, 925, 900, 875, 850, 800, 750, 700, 650, 600, 550, 500, 450, 400, 350, 300,
    250, 200, 150, 100, 70, 50, 30, 20, 10,
];

/// Number of sounding levels.
pub const NUM_LEVELS: usize = ISOBARIC_LEVELS_HPA.len();

const P0: f64 = 101_325.0; // Pa
const P_TROPOPAUSE: f64 = 22_632.06; // Pa at 11 km
const P_STRAT1: f64 = 5_474.89; // Pa at 20 km

/// ICAO standard atmosphere geopotential altitude (meters) of a pressure
/// level, valid through the lower stratosphere (to about 32 km).
pub fn isa_altitude_m(pressure_pa: f64) -> f64 {
    if pressure_pa >= P_TROPOPAUSE {
        // Troposphere, lapse rate 6.5 K/km.
        44_330.77 * (1.0 - (pressure_pa / P0).powf(0.190_263))
    } else if pressure_pa >= P_STRAT1 {
        // Isothermal layer, 216.65 K.
        11_000.0 + 6_341.62 * (P_TROPOPAUSE / pressure_pa).ln()
    } else {
        // 20-32 km, lapse rate -1 K/km.
        20_000.0 + 216_650.0 * ((P_STRAT1 / pressure_pa).powf(0.029_271) - 1.0)
    }
}

/// ISA altitude of a sounding level by index.
pub fn level_altitude_m(level: usize) -> f64 {
    isa_altitude_m(ISOBARIC_LEVELS_HPA[level] as f64 * 100.0)
}

/// Meters per foot.
pub const FT_TO_M: f64 = 0.3048;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_count_and_order() {
        assert_eq!(NUM_LEVELS, 27);
        assert!(ISOBARIC_LEVELS_HPA.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(ISOBARIC_LEVELS_HPA[0], 1000);
        assert_eq!(ISOBARIC_LEVELS_HPA[26], 10);
    }

    #[test]
    fn test_isa_reference_points() {
        // Sea level.
        assert!(isa_altitude_m(101_325.0).abs() < 1.0);
        // 500 hPa is near 5574 m.
        let h500 = isa_altitude_m(50_000.0);
        assert!((h500 - 5574.0).abs() < 30.0, "got {h500}");
        // Tropopause boundary is continuous.
        let below = isa_altitude_m(P_TROPOPAUSE + 1.0);
        let above = isa_altitude_m(P_TROPOPAUSE - 1.0);
        assert!((below - above).abs() < 5.0);
        assert!((below - 11_000.0).abs() < 5.0);
        // 20 km boundary is continuous.
        let below = isa_altitude_m(P_STRAT1 + 1.0);
        let above = isa_altitude_m(P_STRAT1 - 1.0);
        assert!((below - above).abs() < 5.0);
        // 10 hPa is near 31 km.
        let h10 = isa_altitude_m(1_000.0);
        assert!((25_000.0..35_000.0).contains(&h10), "got {h10}");
    }

    #[test]
    fn test_monotonic() {
        let alts: Vec<f64> = ISOBARIC_LEVELS_HPA
            .iter()
            .map(|&p| isa_altitude_m(p as f64 * 100.0))
            .collect();
        assert!(alts.windows(2).all(|w| w[0] < w[1]));
    }
}
