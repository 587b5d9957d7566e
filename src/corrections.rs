//! Post-processing of raw trajectory samples.
//!
//! The integrator produces absolute drop and windage in the bore frame; this
//! module turns them into zero-relative, terrain-relative corrections with
//! the Coriolis, aerodynamic-jump and near-transonic drag-scale adjustments
//! applied, plus both angular-unit conversions.

use crate::constants::{CM_PER_MOA_100M, DEG_TO_RAD, EARTH_ROTATION, MOA_TO_MRAD, M_TO_FT};
use crate::drag::{drag_scale_factor, DragFunction};
use crate::inputs::{Bullet, Meteo, Options, ShotInputs, Wind};
use crate::solver::TrajectorySample;
use crate::wind;

/// Latitude-dependent gravitational acceleration (Clairaut's formula).
fn clairaut_gravity(latitude: f64) -> f64 {
    9.78034 + 0.05164 * (latitude.sin() * latitude.sin())
}

/// Gravitational acceleration in the feet frame, fixed for a whole pass.
pub fn gravity_feet(latitude: f64) -> f64 {
    clairaut_gravity(latitude) * M_TO_FT
}

/// Vertical Coriolis factor (Eötvös effect): a multiplier close to 1 that
/// scales the zero-relative drop. Unity when the option is off.
pub fn vertical_coriolis(v0: f64, inputs: &ShotInputs, options: &Options) -> f64 {
    if !options.coriolis {
        return 1.0;
    }

    let heading = DEG_TO_RAD * (inputs.target_azimuth + inputs.magnetic_inclination);
    let g = clairaut_gravity(inputs.latitude);

    1.0 - (2.0 * EARTH_ROTATION * v0 * (DEG_TO_RAD * inputs.latitude).cos() * heading.sin()) / g
}

/// Horizontal Coriolis drift (cm) accumulated over `time` seconds to `distance`.
/// Zero for a degenerate sample so the muzzle row never divides by zero.
pub fn horizontal_coriolis(distance: u16, time: f64, latitude: f64) -> f64 {
    if distance == 0 || time <= 0.0 {
        return 0.0;
    }

    let dist = f64::from(distance);
    let avg_velocity = dist / time;
    (EARTH_ROTATION * dist * dist * (DEG_TO_RAD * latitude).sin()) / avg_velocity * 100.0
}

/// Absolute drop re-expressed relative to the throw-angle sight line.
pub fn absolute_drop_to_zeroing(drop_abs: f64, distance_feet: f64, throw_angle: f64) -> f64 {
    let cos_throw = throw_angle.cos();
    ((drop_abs * cos_throw - distance_feet * throw_angle.sin()) / cos_throw).abs()
}

/// Terrain-angle correction of the zero-relative drop (rifleman's rule form).
pub fn relative_drop_with_terrain(drop_zeroed: f64, drop_abs: f64, terrain_angle: f64) -> f64 {
    drop_zeroed - (drop_abs * (1.0 - (std::f64::consts::PI * terrain_angle / 180.0).cos())).abs()
}

/// Centimeters at `distance` expressed in MOA. Zero at the muzzle.
pub fn cm_to_moa(cm: f64, distance: u16) -> f64 {
    if distance == 0 {
        return 0.0;
    }
    cm / ((f64::from(distance) / 100.0) * CM_PER_MOA_100M)
}

pub fn moa_to_mrad(moa: f64) -> f64 {
    moa * MOA_TO_MRAD
}

/// Aerodynamic-jump contribution (cm) for one sample.
///
/// The simple wind case scales by the crosswind the sample actually saw; the
/// complex case always uses the direction-weighted average of the bands up to
/// the requested shot distance, matching the single jump value the shooter
/// dials for the whole shot.
fn aero_jump_cm(
    sample: &TrajectorySample,
    jump_sensitivity: f64,
    meteo: &Meteo,
    inputs: &ShotInputs,
) -> f64 {
    let moa_at_dist = (f64::from(sample.distance) / 100.0) * CM_PER_MOA_100M;

    match &meteo.wind {
        Wind::Simple { .. } => jump_sensitivity * sample.crosswind.abs() * moa_at_dist,
        Wind::Complex(bands) => {
            jump_sensitivity * wind::average_crosswind(bands, inputs.distance) * moa_at_dist
        }
    }
}

/// Turn one raw sample into a finished correction row.
///
/// Ordering matters and mirrors the classic solution sheet: Coriolis and
/// terrain first, then aerodynamic jump, then the angular conversions, and
/// the near-transonic drag-scale factor last, applied to the centimeter
/// value only. Custom-Cd bullets skip the scale factor since their table is
/// already transonic-accurate.
#[allow(clippy::too_many_arguments)]
pub fn finalize_sample(
    sample: &mut TrajectorySample,
    coriolis_vertical: f64,
    jump_sensitivity: f64,
    throw_angle: f64,
    meteo: &Meteo,
    bullet: &Bullet,
    inputs: &ShotInputs,
    options: &Options,
) {
    if options.coriolis {
        sample.coriolis_horizontal =
            horizontal_coriolis(sample.distance, sample.time, inputs.latitude);
    }

    sample.drop_zeroed =
        absolute_drop_to_zeroing(sample.drop_abs, sample.distance_feet, throw_angle)
            * coriolis_vertical;
    sample.drop_terrain =
        relative_drop_with_terrain(sample.drop_zeroed, sample.drop_abs, inputs.terrain_angle);

    if options.aero_jump {
        sample.drop_terrain += aero_jump_cm(sample, jump_sensitivity, meteo, inputs);
    }

    sample.drop_moa = cm_to_moa(sample.drop_terrain, sample.distance);
    sample.drop_mrad = moa_to_mrad(sample.drop_moa);

    sample.windage += sample.coriolis_horizontal;
    sample.windage_moa = cm_to_moa(sample.windage, sample.distance);
    sample.windage_mrad = moa_to_mrad(sample.windage_moa);
    sample.derivation_moa = cm_to_moa(sample.derivation, sample.distance);
    sample.derivation_mrad = moa_to_mrad(sample.derivation_moa);

    if bullet.drag_function != DragFunction::Cdm {
        sample.drop_terrain *= drag_scale_factor(bullet, sample.mach);
    }
}
