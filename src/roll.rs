//! Sight-cant (roll) correction of a finished solution.
//!
//! A canted scope rotates the correction plane around the bore axis. The
//! square cases (±90°) swap the turrets outright and fold in a static scope
//! height correction; any other angle is a plain rotation of the combined
//! vertical and horizontal corrections.

use crate::constants::MOA_TO_MRAD;
use crate::inputs::{AngularUnits, Rifle, Scope};
use crate::results::Results;

const ROLL_DEG_TO_RAD: f64 = 0.017453;

/// Which rotation rule applies to a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CantCase {
    /// No cant, solution untouched
    None,
    /// Scope rotated a quarter turn, shot taken at the zero distance
    SquareAtZero,
    /// Scope rotated a quarter turn, shot taken elsewhere
    SquareDownrange,
    /// Any other cant angle
    General,
}

pub fn classify(rifle: &Rifle, shot_distance: u16) -> CantCase {
    if rifle.cant_angle == 0.0 {
        return CantCase::None;
    }
    if rifle.cant_angle == 90.0 || rifle.cant_angle == -90.0 {
        if shot_distance == rifle.zero_distance {
            return CantCase::SquareAtZero;
        }
        return CantCase::SquareDownrange;
    }
    CantCase::General
}

/// Static correction for the scope sitting above the bore, in both angular
/// units. Only relevant once the scope leaves the vertical plane.
#[derive(Debug, Clone, Copy)]
struct ScopeHeightCorrection {
    moa: f64,
    mrad: f64,
}

impl ScopeHeightCorrection {
    fn of(rifle: &Rifle) -> Self {
        let moa_at_zero = 2.9089 * (f64::from(rifle.zero_distance) / 100.0);
        let moa = rifle.scope_height / moa_at_zero;
        Self {
            moa,
            mrad: moa * MOA_TO_MRAD,
        }
    }

    fn in_units(&self, units: AngularUnits) -> f64 {
        match units {
            AngularUnits::Moa => self.moa,
            AngularUnits::Mrad => self.mrad,
        }
    }
}

/// Rotate a (horizontal, vertical) correction pair by the cant angle.
/// Positive cant is clockwise as seen from behind the rifle.
fn rotate(horizontal: f64, vertical: f64, cant_angle: f64) -> (f64, f64) {
    let roll = -(cant_angle * ROLL_DEG_TO_RAD);
    let vert = -horizontal * roll.sin() + vertical * roll.cos();
    let horiz = horizontal * roll.cos() + vertical * roll.sin();
    (vert, horiz)
}

fn apply_general(rifle: &Rifle, scope: &Scope, results: &mut Results) {
    let (vert_angular, horiz_angular) = rotate(
        results.horizontal.angular + results.derivation.angular,
        results.vertical.angular,
        rifle.cant_angle,
    );
    results.vertical.angular = vert_angular;
    results.horizontal.angular = horiz_angular;
    results.derivation.angular = 0.0;

    let (vert_cm, horiz_cm) = rotate(
        f64::from(results.horizontal.cm + results.derivation.cm),
        f64::from(results.vertical.cm),
        rifle.cant_angle,
    );
    results.vertical.cm = vert_cm as i32;
    results.horizontal.cm = horiz_cm as i32;
    results.derivation.cm = 0;

    results.vertical.clicks = (results.vertical.angular / scope.click_vertical) as i32;
    results.horizontal.clicks = (results.horizontal.angular / scope.click_horizontal) as i32;
    results.derivation.clicks = 0;
}

/// Base turret swap shared by both square cases: the vertical correction
/// (scope height plus vertical POI drift) moves to the horizontal turret,
/// with the sign following the rotation direction, and the horizontal POI
/// drift moves to the vertical turret.
fn square_swap(rifle: &Rifle, scope: &Scope) -> (f64, f64) {
    let height = ScopeHeightCorrection::of(rifle);
    let vert_drift = rifle.vertical_poi_angular(scope);
    let horiz_drift = rifle.horizontal_poi_angular(scope);

    let raw_vertical = height.in_units(scope.angle_units) + vert_drift;
    let raw_horizontal = horiz_drift;

    let vertical = -raw_vertical + horiz_drift;
    let swapped = if rifle.cant_angle == -90.0 {
        -raw_vertical
    } else {
        raw_vertical
    };
    let horizontal = swapped - raw_horizontal;

    (vertical, horizontal)
}

fn square_store(
    scope: &Scope,
    shot_distance: u16,
    vertical: f64,
    horizontal: f64,
    results: &mut Results,
) {
    let factor = scope.angle_units.cm_per_100m();
    let span = f64::from(shot_distance) / 100.0;

    results.vertical.angular = vertical;
    results.horizontal.angular = horizontal;
    results.vertical.cm = (vertical * factor * span) as i32;
    results.horizontal.cm = (horizontal * factor * span) as i32;
    results.vertical.clicks = (vertical / scope.click_vertical) as i32;
    results.horizontal.clicks = (horizontal / scope.click_horizontal) as i32;
}

fn apply_square_at_zero(rifle: &Rifle, scope: &Scope, shot_distance: u16, results: &mut Results) {
    let (vertical, horizontal) = square_swap(rifle, scope);
    square_store(scope, shot_distance, vertical, horizontal, results);
}

fn apply_square_downrange(rifle: &Rifle, scope: &Scope, shot_distance: u16, results: &mut Results) {
    let prior_vertical = results.vertical.angular;
    let prior_horizontal = results.horizontal.angular;

    let (vertical, horizontal) = square_swap(rifle, scope);

    let vertical = vertical + prior_horizontal;
    let horizontal = if rifle.cant_angle == 90.0 {
        horizontal + prior_vertical
    } else {
        horizontal - prior_vertical
    };

    square_store(scope, shot_distance, vertical, horizontal, results);
}

/// Rewrite a solution for the rifle's cant angle. No-op for an upright scope.
pub fn apply(rifle: &Rifle, scope: &Scope, shot_distance: u16, results: &mut Results) {
    match classify(rifle, shot_distance) {
        CantCase::None => {}
        CantCase::SquareAtZero => apply_square_at_zero(rifle, scope, shot_distance, results),
        CantCase::SquareDownrange => apply_square_downrange(rifle, scope, shot_distance, results),
        CantCase::General => apply_general(rifle, scope, results),
    }
}
