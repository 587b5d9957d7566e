//! Wind resolution for the integrator.
//!
//! Wind enters the equations as a feet-domain vector in the bore frame:
//! X along the bore, Y vertical, Z crosswind. A complex description carries
//! up to five distance-bracketed bands; the last band extends to infinity.

use nalgebra::Vector3;

use crate::constants::{to_feet, DEG_TO_RAD};
use crate::inputs::{Meteo, Wind, WindBand};

/// Wind vector (ft/s) from one measurement.
fn band_vector(speed: f64, direction: f64, terrain_incline: f64) -> Vector3<f64> {
    let along = -to_feet(speed) * (direction * DEG_TO_RAD).cos();
    let cross = -to_feet(speed) * (direction * DEG_TO_RAD).sin();

    Vector3::new(
        along,
        cross * (terrain_incline * DEG_TO_RAD).sin(),
        cross * (terrain_incline * DEG_TO_RAD).cos(),
    )
}

/// The band active at `distance`. Bands bracket half-open distance
/// intervals; anything before the first band also reads the first band.
fn band_at(bands: &[WindBand], distance: u16) -> &WindBand {
    let mut active = &bands[0];
    for band in bands {
        if distance >= band.distance {
            active = band;
        }
    }
    active
}

/// Wind components (ft/s) active at `distance`.
pub fn components_at(meteo: &Meteo, distance: u16) -> Vector3<f64> {
    match &meteo.wind {
        Wind::Simple {
            speed,
            direction,
            terrain_incline,
        } => band_vector(*speed, *direction, *terrain_incline),
        Wind::Complex(bands) => {
            let band = band_at(bands, distance);
            band_vector(band.speed, band.direction, band.terrain_incline)
        }
    }
}

/// Direction-weighted average crosswind speed (m/s) over every band up to
/// and including the one bracketing `shot_distance`. Feeds the complex-case
/// aerodynamic-jump correction.
pub fn average_crosswind(bands: &[WindBand], shot_distance: u16) -> f64 {
    let mut last = 0;
    for (i, band) in bands.iter().enumerate() {
        if shot_distance >= band.distance {
            last = i;
        }
    }

    let sum: f64 = bands[..=last]
        .iter()
        .map(|band| band.speed * (band.direction * DEG_TO_RAD).sin())
        .sum();
    sum / (last + 1) as f64
}
