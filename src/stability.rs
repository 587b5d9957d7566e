//! Gyroscopic stability, spin drift and aerodynamic-jump sensitivity.

use crate::constants::{to_feet, HPA_TO_MMHG, INCH_CM, INCH_MM, MPS_TO_MPH};
use crate::inputs::{Bullet, Meteo, Options, Rifle, TwistDirection, Wind};

/// Miller gyroscopic stability factor (SG).
///
/// Values above ~1.5 indicate an adequately stabilized bullet. Returns 0.0
/// for degenerate geometry rather than dividing by zero.
pub fn miller_stability(v0: f64, meteo: &Meteo, bullet: &Bullet, rifle: &Rifle) -> f64 {
    if bullet.caliber == 0.0 || bullet.length == 0.0 || rifle.twist == 0.0 {
        return 0.0;
    }

    let twist_calibers = rifle.twist / bullet.caliber;
    let caliber_inch = bullet.caliber / INCH_MM;
    let length_calibers = bullet.length / bullet.caliber;

    let sg0 = (30.0 * bullet.mass)
        / (twist_calibers.powi(2)
            * caliber_inch.powi(3)
            * length_calibers
            * (1.0 + length_calibers.powi(2)));

    let fv = (to_feet(v0) / 2800.0).powf(0.33333);

    let t_fahrenheit = meteo.temperature * 1.8 + 32.0;
    let pressure_inhg = f64::from(meteo.pressure) * HPA_TO_MMHG / INCH_MM;
    let ftp = ((t_fahrenheit + 460.0) / 519.0) * (29.92 / pressure_inhg);

    sg0 * fv * ftp
}

/// Spin drift (cm) after `time` seconds of flight, Litz approximation.
/// Right twist drifts right (positive), left twist mirrors.
pub fn spin_drift(sg: f64, time: f64, twist_direction: TwistDirection) -> f64 {
    let drift = INCH_CM * 1.25 * (sg + 1.2) * time.powf(1.83);
    match twist_direction {
        TwistDirection::Right => drift,
        TwistDirection::Left => -drift,
    }
}

/// Aerodynamic-jump sensitivity: vertical MOA per m/s of crosswind.
///
/// Sign encodes the deflection direction: wind from the left on a
/// right-twist barrel lifts the bullet (negative correction), mirrored for
/// the other three wind-side/twist combinations. Zero when the option is off.
pub fn aero_jump_sensitivity(
    sg: f64,
    bullet: &Bullet,
    rifle: &Rifle,
    meteo: &Meteo,
    options: &Options,
) -> f64 {
    if !options.aero_jump {
        return 0.0;
    }

    let moa_per_mph = 0.01 * sg - 0.0024 * (bullet.length / bullet.caliber) + 0.032;
    let moa_per_mps = moa_per_mph * MPS_TO_MPH;

    // The complex wind case carries per-band directions; its sign comes from
    // the direction-weighted average speed instead, so treat it as left-side.
    let wind_angle = match &meteo.wind {
        Wind::Simple { direction, .. } => *direction,
        Wind::Complex(_) => 0.0,
    };

    let wind_from_left = (0.0..=180.0).contains(&wind_angle);
    match (wind_from_left, rifle.twist_direction) {
        (true, TwistDirection::Right) => -moa_per_mps,
        (false, TwistDirection::Right) => moa_per_mps,
        (true, TwistDirection::Left) => moa_per_mps,
        (false, TwistDirection::Left) => -moa_per_mps,
    }
}
