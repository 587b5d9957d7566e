//! Atmospheric model for the firing site.
//!
//! All outputs are deterministic pure functions of temperature, pressure and
//! humidity; the integrator consumes the density-based condition-correction
//! factor and the speed of sound, nothing else.

use crate::constants::{M_TO_FT, STANDARD_AIR_DENSITY};
use crate::inputs::Meteo;

/// Specific gas constant for dry air (J/(kg·K))
const R_DRY: f64 = 287.058;
/// Specific gas constant for water vapor (J/(kg·K))
const R_VAPOR: f64 = 461.495;
/// Heat capacity ratio for air
const GAMMA: f64 = 1.4;

/// Water vapor partial pressure (Pa) from a Magnus-type exponential.
///
/// The humidity percentage folds the saturation pressure (hPa) straight into
/// pascals: `H% × e_sat_hPa == (H/100) × e_sat_hPa × 100`.
pub fn vapor_pressure(temperature_c: f64, humidity: f64) -> f64 {
    let t_k = temperature_c + 273.15;
    humidity * 6.1078 * 10.0_f64.powf((7.5 * t_k - 2048.625) / (t_k - 35.85))
}

/// Overall air density (kg/m³) as the sum of the dry-air and vapor partial densities.
pub fn air_density(pressure_pa: f64, vapor_pressure_pa: f64, temperature_c: f64) -> f64 {
    let t_k = temperature_c + 273.15;
    let dry = (pressure_pa - vapor_pressure_pa) / (R_DRY * t_k);
    let vapor = vapor_pressure_pa / (R_VAPOR * t_k);
    dry + vapor
}

/// Speed of sound (m/s) from pressure and the overall air density.
pub fn speed_of_sound(pressure_pa: f64, vapor_pressure_pa: f64, temperature_c: f64) -> f64 {
    let density = air_density(pressure_pa, vapor_pressure_pa, temperature_c);
    (GAMMA * (pressure_pa - vapor_pressure_pa) / density).sqrt()
}

/// Speed of sound at the firing site, truncated to whole m/s.
///
/// The truncated value is what the response reports and what the Mach ratio
/// is derived from, so both stay consistent.
pub fn speed_of_sound_raw(meteo: &Meteo) -> u16 {
    let pressure_pa = f64::from(meteo.pressure) * 100.0;
    let vapor = vapor_pressure(meteo.temperature, meteo.humidity);
    speed_of_sound(pressure_pa, vapor, meteo.temperature) as u16
}

/// Reciprocal speed of sound in the feet frame: multiplying a feet-domain
/// velocity by this yields the Mach number.
pub fn mach_ratio(meteo: &Meteo) -> f64 {
    1.0 / (f64::from(speed_of_sound_raw(meteo)) * M_TO_FT)
}

/// Dimensionless density correction: actual density over the standard 1.20288 kg/m³.
pub fn condition_correction_factor(meteo: &Meteo) -> f64 {
    let pressure_pa = f64::from(meteo.pressure) * 100.0;
    let vapor = vapor_pressure(meteo.temperature, meteo.humidity);
    air_density(pressure_pa, vapor, meteo.temperature) / STANDARD_AIR_DENSITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::Wind;
    use approx::assert_relative_eq;

    fn dry_standard() -> Meteo {
        Meteo {
            temperature: 15.0,
            pressure: 1013,
            humidity: 0.0,
            wind: Wind::calm(),
        }
    }

    #[test]
    fn test_dry_air_density_standard_conditions() {
        let rho = air_density(101325.0, 0.0, 15.0);
        assert_relative_eq!(rho, 1.225, epsilon = 1e-3);
    }

    #[test]
    fn test_humid_air_is_lighter() {
        let vapor = vapor_pressure(25.0, 90.0);
        let humid = air_density(101325.0, vapor, 25.0);
        let dry = air_density(101325.0, 0.0, 25.0);
        assert!(humid < dry);
    }

    #[test]
    fn test_vapor_pressure_saturation_at_15c() {
        // 100% humidity at 15°C is about 1705 Pa
        let e = vapor_pressure(15.0, 100.0);
        assert!((e - 1705.0).abs() < 20.0);
    }

    #[test]
    fn test_speed_of_sound_sea_level() {
        let a0 = speed_of_sound(101325.0, 0.0, 15.0);
        assert!((a0 - 340.0).abs() < 2.0);
    }

    #[test]
    fn test_condition_correction_factor_near_unity() {
        let ccf = condition_correction_factor(&dry_standard());
        assert!(ccf > 0.98 && ccf < 1.05);
    }

    #[test]
    fn test_hot_thin_air_lowers_correction_factor() {
        let mut meteo = dry_standard();
        meteo.temperature = 35.0;
        meteo.pressure = 950;
        let ccf = condition_correction_factor(&meteo);
        assert!(ccf < condition_correction_factor(&dry_standard()));
    }

    #[test]
    fn test_mach_ratio_matches_raw_speed() {
        let meteo = dry_standard();
        let a0 = f64::from(speed_of_sound_raw(&meteo));
        assert_relative_eq!(mach_ratio(&meteo), 1.0 / (a0 * M_TO_FT), epsilon = 1e-12);
    }
}
