//! Assembly of the final shot solution from the integrator output.

use crate::constants::{MACH_THRESHOLDS, TABLE_ROWS};
use crate::inputs::{AngularUnits, Rifle, Scope, ShotInputs};
use crate::solver::SolveOutput;

/// One dial correction in all three forms the shooter uses.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorrectionTriplet {
    /// Linear correction at the target (cm, rounded)
    pub cm: i32,
    /// Correction in the scope's angular unit
    pub angular: f64,
    /// Whole turret clicks (rounded)
    pub clicks: i32,
}

impl CorrectionTriplet {
    fn new(cm: f64, distance: u16, factor: f64, click: f64) -> Self {
        if distance == 0 {
            return Self {
                cm: cm.round() as i32,
                angular: 0.0,
                clicks: 0,
            };
        }
        let cm_per_unit = (f64::from(distance) / 100.0) * factor;
        let angular = cm / cm_per_unit;
        Self {
            cm: cm.round() as i32,
            angular,
            clicks: (angular / click).round() as i32,
        }
    }
}

/// First crossing distance (m) for each reported Mach threshold. Thresholds
/// the bullet never dropped through read as the maximum simulated distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdDistances {
    pub transonic_2_2: u16,
    pub transonic_2_0: u16,
    pub transonic_1_8: u16,
    pub transonic_1_6: u16,
    pub transonic_1_4: u16,
    pub transonic_1_2: u16,
    /// Mach 1.1
    pub transonic: u16,
    /// Mach 1.0
    pub subsonic: u16,
    /// Mach 0.9
    pub deep_subsonic: u16,
    pub subsonic_0_7: u16,
}

/// Parallel per-stride arrays of the full range table, distance 0 excluded.
#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    pub distances: Vec<u16>,
    pub vertical: Vec<f64>,
    pub horizontal: Vec<f64>,
    pub derivation: Vec<f64>,
    pub time: Vec<f64>,
}

/// Complete solution for one request.
#[derive(Debug, Clone, Default)]
pub struct Results {
    pub vertical: CorrectionTriplet,
    /// Absolute drop below the bore line at the shot distance
    pub vertical_abs: i32,
    pub horizontal: CorrectionTriplet,
    pub derivation: CorrectionTriplet,
    pub flight_time: f64,
    pub mach: f64,
    /// Miller gyroscopic stability factor
    pub stability: f64,
    /// Speed of sound at the firing site (m/s)
    pub speed_of_sound: u16,
    /// Target lead (mil) for the given lateral speed
    pub target_lead: f64,
    /// Remaining kinetic energy (J)
    pub kinetic_energy: u32,
    pub thresholds: ThresholdDistances,
    pub range_table: Option<RangeTable>,
}

fn threshold_distances(crossings: &[u16; MACH_THRESHOLDS.len()]) -> ThresholdDistances {
    ThresholdDistances {
        transonic_2_2: crossings[0],
        transonic_2_0: crossings[1],
        transonic_1_8: crossings[2],
        transonic_1_6: crossings[3],
        transonic_1_4: crossings[4],
        transonic_1_2: crossings[5],
        transonic: crossings[6],
        subsonic: crossings[7],
        deep_subsonic: crossings[8],
        subsonic_0_7: crossings[9],
    }
}

/// Turn the integrator output into the response-side solution.
///
/// The POI offsets enter here: as centimeters folded into the final vertical
/// and horizontal corrections, and as angular offsets added to every range
/// table row.
pub fn assemble(
    output: &SolveOutput,
    rifle: &Rifle,
    scope: &Scope,
    inputs: &ShotInputs,
    shot_distance: u16,
) -> Results {
    let factor = scope.angle_units.cm_per_100m();
    let vert_drift = rifle.vertical_poi_angular(scope);
    let horiz_drift = rifle.horizontal_poi_angular(scope);
    let cm_at_shot = (f64::from(shot_distance) / 100.0) * factor;

    let sample = &output.final_sample;
    let drop_cm = sample.drop_terrain + vert_drift * cm_at_shot;
    let windage_cm = sample.windage + horiz_drift * cm_at_shot;

    let range_table = output.table.as_ref().map(|rows| {
        let mut table = RangeTable {
            distances: Vec::with_capacity(TABLE_ROWS - 1),
            vertical: Vec::with_capacity(TABLE_ROWS - 1),
            horizontal: Vec::with_capacity(TABLE_ROWS - 1),
            derivation: Vec::with_capacity(TABLE_ROWS - 1),
            time: Vec::with_capacity(TABLE_ROWS - 1),
        };
        for row in rows.iter().skip(1) {
            let (vert, horiz, deriv) = match scope.angle_units {
                AngularUnits::Moa => (row.drop_moa, row.windage_moa, row.derivation_moa),
                AngularUnits::Mrad => (row.drop_mrad, row.windage_mrad, row.derivation_mrad),
            };
            table.distances.push(row.distance);
            table.vertical.push(vert + vert_drift);
            table.horizontal.push(horiz + horiz_drift);
            table.derivation.push(deriv + horiz_drift);
            table.time.push(row.time);
        }
        table
    });

    Results {
        vertical: CorrectionTriplet::new(drop_cm, shot_distance, factor, scope.click_vertical),
        vertical_abs: output.vertical_abs,
        horizontal: CorrectionTriplet::new(
            windage_cm,
            shot_distance,
            factor,
            scope.click_horizontal,
        ),
        derivation: CorrectionTriplet::new(
            sample.derivation,
            shot_distance,
            factor,
            scope.click_horizontal,
        ),
        flight_time: sample.time,
        mach: output.terminal.mach,
        stability: output.stability,
        speed_of_sound: output.speed_of_sound,
        target_lead: inputs.target_speed_mils * sample.time,
        kinetic_energy: output.terminal.kinetic_energy,
        thresholds: threshold_distances(output.thresholds.distances()),
        range_table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CM_PER_MRAD_100M, TABLE_STEP};
    use approx::assert_relative_eq;

    #[test]
    fn test_triplet_conversion_mrad() {
        // 40 cm at 400 m is 1 mrad, ten 0.1 mil clicks
        let t = CorrectionTriplet::new(40.0, 400, CM_PER_MRAD_100M, 0.1);
        assert_eq!(t.cm, 40);
        assert_relative_eq!(t.angular, 1.0, epsilon = 1e-12);
        assert_eq!(t.clicks, 10);
    }

    #[test]
    fn test_triplet_rounds_cm_and_clicks() {
        let t = CorrectionTriplet::new(12.6, 100, CM_PER_MRAD_100M, 0.1);
        assert_eq!(t.cm, 13);
        assert_eq!(t.clicks, 13);
    }

    #[test]
    fn test_triplet_guard_at_muzzle() {
        let t = CorrectionTriplet::new(8.0, 0, CM_PER_MRAD_100M, 0.1);
        assert_eq!(t.cm, 8);
        assert_eq!(t.angular, 0.0);
        assert_eq!(t.clicks, 0);
    }

    #[test]
    fn test_threshold_field_order_matches_constant() {
        let crossings = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100];
        let t = threshold_distances(&crossings);
        assert_eq!(t.transonic_2_2, 10);
        assert_eq!(t.transonic_1_2, 60);
        assert_eq!(t.transonic, 70);
        assert_eq!(t.subsonic, 80);
        assert_eq!(t.deep_subsonic, 90);
        assert_eq!(t.subsonic_0_7, 100);
    }

    #[test]
    fn test_range_table_skips_muzzle_row() {
        use crate::solver::{MachThresholds, SolveOutput, TerminalData, TrajectorySample};

        let mut rows = vec![TrajectorySample::default(); TABLE_ROWS];
        for (i, row) in rows.iter_mut().enumerate() {
            row.distance = i as u16 * TABLE_STEP;
            row.time = i as f64 * 0.03;
        }
        let output = SolveOutput {
            final_sample: TrajectorySample::default(),
            table: Some(rows),
            terminal: TerminalData::default(),
            thresholds: MachThresholds::default(),
            stability: 1.8,
            vertical_abs: 0,
            speed_of_sound: 340,
        };
        let results = assemble(
            &output,
            &Rifle::default(),
            &Scope::default(),
            &ShotInputs::default(),
            100,
        );
        let table = results.range_table.unwrap();
        assert_eq!(table.distances.len(), TABLE_ROWS - 1);
        assert_eq!(table.distances[0], TABLE_STEP);
        assert_relative_eq!(table.time[0], 0.03);
    }
}
