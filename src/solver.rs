//! Trajectory integration and shot solving.
//!
//! The solver walks the bullet out in 1 m steps with a two-stage Heun
//! predictor-corrector in a 3-axis feet frame: X along the bore, Y vertical,
//! Z crosswind. Everything a pass needs lives on the stack of one call, so
//! any number of solves can run concurrently without sharing state.

use nalgebra::Vector3;

use crate::atmosphere;
use crate::constants::{
    from_feet, to_feet, DIST_RANGE, MACH_THRESHOLDS, M_TO_FT, TABLE_ROWS, TABLE_STEP,
};
use crate::corrections;
use crate::drag::{self, DragFunction, DragInfo, DragTable};
use crate::error::SolverError;
use crate::inputs::{Bullet, Meteo, Options, Rifle, Scope, ShotInputs, TwistDirection, Wind, ZeroAtmosphere};
use crate::results::{self, Results};
use crate::roll;
use crate::stability;
use crate::wind;

/// One captured point of the trajectory, raw from the integrator plus the
/// post-processed correction fields filled in afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrajectorySample {
    /// Distance from the muzzle (m)
    pub distance: u16,
    /// Same distance in the feet frame
    pub distance_feet: f64,
    /// Absolute drop below the bore line (cm, negative down)
    pub drop_abs: f64,
    /// Drop relative to the zeroed sight line (cm)
    pub drop_zeroed: f64,
    /// Drop relative to sight line and terrain angle (cm)
    pub drop_terrain: f64,
    /// Wind drift (cm)
    pub windage: f64,
    /// Flight time (s)
    pub time: f64,
    /// Spin drift (cm)
    pub derivation: f64,
    pub drop_moa: f64,
    pub drop_mrad: f64,
    pub windage_moa: f64,
    pub windage_mrad: f64,
    pub derivation_moa: f64,
    pub derivation_mrad: f64,
    /// Horizontal Coriolis drift (cm), zero unless the option is on
    pub coriolis_horizontal: f64,
    pub mach: f64,
    /// Crosswind active at this sample (m/s, signed)
    pub crosswind: f64,
}

/// Terminal state of the bullet at the requested shot distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalData {
    /// Remaining velocity (m/s)
    pub velocity: f64,
    pub mach: f64,
    /// Remaining kinetic energy (J)
    pub kinetic_energy: u32,
}

/// First crossing distances of the fixed Mach thresholds.
///
/// A crossing is detected by bracketing between consecutive step Mach
/// values, so a threshold straddled by one step is still caught. Thresholds
/// never reached stay pinned at the maximum simulated distance.
#[derive(Debug, Clone, Copy)]
pub struct MachThresholds {
    distances: [u16; MACH_THRESHOLDS.len()],
}

impl Default for MachThresholds {
    fn default() -> Self {
        Self {
            distances: [DIST_RANGE; MACH_THRESHOLDS.len()],
        }
    }
}

impl MachThresholds {
    /// Latch the first crossing of each threshold between two consecutive
    /// step Mach values.
    pub fn record(&mut self, previous: f64, current: f64, distance: u16) {
        for (slot, &threshold) in self.distances.iter_mut().zip(MACH_THRESHOLDS.iter()) {
            if *slot == DIST_RANGE && previous > threshold && current <= threshold {
                *slot = distance;
            }
        }
    }

    /// Crossing distances, in the [`MACH_THRESHOLDS`] order (high to low).
    pub fn distances(&self) -> &[u16; MACH_THRESHOLDS.len()] {
        &self.distances
    }
}

/// Elevation captured at the zero distance during the main pass.
#[derive(Debug, Clone, Copy, Default)]
struct ZeroObservation {
    distance_feet: f64,
    drop_cm: f64,
}

/// Everything the integration pass produced, before assembly into a response.
#[derive(Debug, Clone)]
pub struct SolveOutput {
    pub final_sample: TrajectorySample,
    pub table: Option<Vec<TrajectorySample>>,
    pub terminal: TerminalData,
    pub thresholds: MachThresholds,
    pub stability: f64,
    /// Absolute vertical drop at the shot distance, response units
    pub vertical_abs: i32,
    /// Speed of sound at the firing site (m/s, truncated)
    pub speed_of_sound: u16,
}

/// Muzzle velocity adjusted for powder temperature, when the option is on.
fn adjusted_muzzle_velocity(meteo: &Meteo, bullet: &Bullet, thermal_correction: bool) -> f64 {
    if thermal_correction {
        return bullet.muzzle_velocity
            + bullet.muzzle_velocity
                * bullet.thermal_sensitivity
                * 0.00067
                * (meteo.temperature - bullet.v0_temperature);
    }
    bullet.muzzle_velocity
}

fn kinetic_energy(velocity: f64, mass_grains: f64) -> u32 {
    (0.5 * velocity * velocity * 0.0000648 * mass_grains) as u32
}

/// Angle between bore line and sight line, from the captured zero elevation.
/// The mixed cm/feet ratio cancels downstream in the zero-relative drop.
fn throw_angle(zero: &ZeroObservation) -> f64 {
    if zero.distance_feet <= 0.0 {
        return 0.0;
    }
    (zero.drop_cm / zero.distance_feet).atan()
}

/// Reconstruct the as-zeroed throw angle for a rifle zeroed under a
/// different atmosphere.
///
/// Runs an independent drag-only pass out to the zero distance under the
/// stored zeroing temperature and pressure (humidity fixed at 50%), with no
/// wind, thermal correction always on, and the standard curve in place of
/// any custom drag table.
fn zeroing_angle_elsewhere(g_f: f64, rifle: &Rifle, bullet: &Bullet, bc_zero: f64) -> f64 {
    let zero_meteo = Meteo {
        temperature: rifle.zero_temperature,
        pressure: rifle.zero_pressure,
        humidity: 50.0,
        wind: Wind::calm(),
    };

    let ccf = atmosphere::condition_correction_factor(&zero_meteo);
    let pressure_pa = f64::from(rifle.zero_pressure) * 100.0;
    let vapor = atmosphere::vapor_pressure(rifle.zero_temperature, 50.0);
    let a0 = atmosphere::speed_of_sound(pressure_pa, vapor, rifle.zero_temperature);
    let a0_ratio = 1.0 / (a0 * M_TO_FT);

    let v0 = adjusted_muzzle_velocity(&zero_meteo, bullet, true);
    let c3 = drag::c3(ccf, bc_zero);

    let mut v1 = Vector3::new(to_feet(v0), 0.0, 0.0);
    let mut speed = v1.norm();
    let mut mach = speed * a0_ratio;
    let mut h2 = -to_feet(rifle.scope_height * 0.01);
    let mut drop_cm = 0.0;
    let mut distance_feet = 0.0;

    for i in 0..=rifle.zero_distance {
        distance_feet = to_feet(f64::from(i));
        let cd = drag::drag_coefficient(bullet.drag_function, mach);

        let c4 = cd * c3 * speed / v1.x;
        let mut a1 = c4 * v1;
        a1.y -= g_f / v1.x;

        let v2 = v1 + a1 * M_TO_FT;

        let c5 = cd * c3 * v2.norm() / v2.x;
        let mut a2 = c5 * v2;
        a2.y -= g_f / v2.x;

        let v3 = v1 + (a1 + a2) * (0.5 * M_TO_FT);
        speed = v3.norm();
        mach = speed * a0_ratio;

        h2 += (v1.y + v3.y) / (v1.x + v3.x) * M_TO_FT;
        drop_cm = h2 / (0.01 * M_TO_FT);

        v1 = v3;
    }

    throw_angle(&ZeroObservation {
        distance_feet,
        drop_cm,
    })
}

/// Reject requests the integrator cannot run to completion.
fn validate(bullet: &Bullet, rifle: &Rifle) -> Result<(), SolverError> {
    if rifle.zero_distance == 0 || rifle.zero_distance > DIST_RANGE {
        return Err(SolverError::MalformedRequest(format!(
            "zero distance {} outside the simulated range",
            rifle.zero_distance
        )));
    }
    if bullet.muzzle_velocity <= 0.0 {
        return Err(SolverError::DegenerateBulletGeometry {
            field: "muzzle velocity",
            value: bullet.muzzle_velocity,
        });
    }

    match bullet.drag_function {
        DragFunction::G1 | DragFunction::G7 | DragFunction::Sphere => {
            if bullet.ballistic_coefficient <= 0.0 {
                return Err(SolverError::DegenerateBallisticCoefficient(
                    bullet.ballistic_coefficient,
                ));
            }
        }
        DragFunction::Cdm => {
            if !matches!(bullet.drag_table, DragTable::Cd(_)) {
                return Err(SolverError::MissingDragTable(DragFunction::Cdm));
            }
            if bullet.caliber <= 0.0 {
                return Err(SolverError::DegenerateBulletGeometry {
                    field: "caliber",
                    value: bullet.caliber,
                });
            }
            if bullet.mass <= 0.0 {
                return Err(SolverError::DegenerateBulletGeometry {
                    field: "mass",
                    value: bullet.mass,
                });
            }
        }
        DragFunction::MbcG1 | DragFunction::MbcG7 => {
            if !matches!(bullet.drag_table, DragTable::Bc(_)) {
                return Err(SolverError::MissingDragTable(bullet.drag_function));
            }
        }
    }

    Ok(())
}

fn capture_sample(
    distance: u16,
    drop_abs: f64,
    windage: f64,
    time: f64,
    mach: f64,
    crosswind_feet: f64,
    sg: f64,
    twist_direction: TwistDirection,
) -> TrajectorySample {
    TrajectorySample {
        distance,
        distance_feet: to_feet(f64::from(distance)),
        drop_abs,
        windage,
        time,
        derivation: stability::spin_drift(sg, time, twist_direction),
        mach,
        crosswind: from_feet(crosswind_feet),
        ..TrajectorySample::default()
    }
}

/// Solve one shot end to end: integrate, zero, post-process, assemble and
/// apply the cant rotation. This is the whole request in one call.
pub fn solve_shot(
    meteo: &Meteo,
    bullet: &Bullet,
    rifle: &Rifle,
    scope: &Scope,
    inputs: &ShotInputs,
    options: &Options,
) -> Result<Results, SolverError> {
    validate(bullet, rifle)?;

    let shot_distance = inputs.distance.min(DIST_RANGE);

    let v0 = adjusted_muzzle_velocity(meteo, bullet, options.thermal_correction);
    let coriolis_vertical = corrections::vertical_coriolis(v0, inputs, options);
    let ccf = atmosphere::condition_correction_factor(meteo);
    let a0_ratio = atmosphere::mach_ratio(meteo);
    let sg = stability::miller_stability(v0, meteo, bullet, rifle);
    let jump_sensitivity = stability::aero_jump_sensitivity(sg, bullet, rifle, meteo, options);
    let g_f = corrections::gravity_feet(inputs.latitude);

    let mut thresholds = MachThresholds::default();
    let mut drag_info = DragInfo::default();
    let mut zero = ZeroObservation::default();
    let mut final_sample = TrajectorySample::default();
    let mut terminal = TerminalData::default();
    let mut vertical_abs = 0i32;
    let mut table = options
        .range_table
        .then(|| vec![TrajectorySample::default(); TABLE_ROWS]);

    let mut time = 0.0;
    let mut v1 = Vector3::new(to_feet(v0), 0.0, 0.0);
    let mut speed = v1.norm();
    let mut mach = speed * a0_ratio;
    let mut h2 = -to_feet(rifle.scope_height * 0.01);
    let mut w2 = 0.0;
    let mut prev_mach = mach;

    for i in 0..=DIST_RANGE {
        drag::update_drag_info(bullet, i, rifle.zero_distance, mach, ccf, &mut drag_info);
        thresholds.record(prev_mach, mach, i);
        prev_mach = mach;

        let wind_now = wind::components_at(meteo, i);

        let c4 = drag_info.cd * drag_info.c3 * speed / v1.x;
        let mut a1 = c4 * (v1 - wind_now);
        a1.y -= g_f / v1.x;

        let v2 = v1 + a1 * M_TO_FT;

        let c5 = drag_info.cd * drag_info.c3 * v2.norm() / v2.x;
        let mut a2 = c5 * (v2 - wind_now);
        a2.y -= g_f / v2.x;

        let v3 = v1 + (a1 + a2) * (0.5 * M_TO_FT);
        let speed3 = v3.norm();
        mach = speed3 * a0_ratio;

        h2 += (v1.y + v3.y) / (v1.x + v3.x) * M_TO_FT;
        let drop_cm = h2 / (0.01 * M_TO_FT);
        w2 += (v1.z + v3.z) / (v1.x + v3.x) * M_TO_FT;
        let windage_cm = w2 / (0.01 * M_TO_FT);
        time += 2.0 * M_TO_FT / (v2.x + v3.x);

        if i == rifle.zero_distance {
            zero = ZeroObservation {
                distance_feet: to_feet(f64::from(i)),
                drop_cm,
            };
        }

        if i == shot_distance {
            final_sample = capture_sample(
                i,
                drop_cm,
                windage_cm,
                time,
                mach,
                wind_now.z,
                sg,
                rifle.twist_direction,
            );
            let velocity = from_feet(speed);
            terminal = TerminalData {
                velocity,
                mach,
                kinetic_energy: kinetic_energy(velocity, bullet.mass),
            };
            vertical_abs = (-from_feet(drop_cm) * 100.0) as i32;
        }

        if let Some(rows) = table.as_mut() {
            if i % TABLE_STEP == 0 {
                rows[(i / TABLE_STEP) as usize] = capture_sample(
                    i,
                    drop_cm,
                    windage_cm,
                    time,
                    mach,
                    wind_now.z,
                    sg,
                    rifle.twist_direction,
                );
            }
        }

        v1 = v3;
        speed = speed3;
    }

    let angle = match rifle.zero_atmosphere {
        ZeroAtmosphere::Here => throw_angle(&zero),
        ZeroAtmosphere::Elsewhere => {
            zeroing_angle_elsewhere(g_f, rifle, bullet, drag_info.bc_zero)
        }
    };

    corrections::finalize_sample(
        &mut final_sample,
        coriolis_vertical,
        jump_sensitivity,
        angle,
        meteo,
        bullet,
        inputs,
        options,
    );

    if let Some(rows) = table.as_mut() {
        for row in rows.iter_mut() {
            corrections::finalize_sample(
                row,
                coriolis_vertical,
                jump_sensitivity,
                angle,
                meteo,
                bullet,
                inputs,
                options,
            );
        }
    }

    let output = SolveOutput {
        final_sample,
        table,
        terminal,
        thresholds,
        stability: sg,
        vertical_abs,
        speed_of_sound: atmosphere::speed_of_sound_raw(meteo),
    };

    let mut results = results::assemble(&output, rifle, scope, inputs, shot_distance);
    roll::apply(rifle, scope, shot_distance, &mut results);

    Ok(results)
}
