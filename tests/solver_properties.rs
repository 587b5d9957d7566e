//! End-to-end properties of the shot solver.

use approx::assert_relative_eq;
use serde_json::json;

use ballistic_solver::{
    solve_request, solve_shot, Bullet, Meteo, Options, Rifle, Scope, ShotInputs, Wind,
    ZeroAtmosphere,
};

fn calm_meteo() -> Meteo {
    Meteo::default()
}

fn crosswind(direction: f64) -> Meteo {
    Meteo {
        wind: Wind::Simple {
            speed: 4.0,
            direction,
            terrain_incline: 0.0,
        },
        ..Meteo::default()
    }
}

fn shot_at(distance: u16) -> ShotInputs {
    ShotInputs {
        distance,
        ..ShotInputs::default()
    }
}

#[test]
fn test_rifle_is_zeroed_at_its_zero_distance() {
    // Calm conditions, every option off, shot at the zero distance: by
    // definition of zeroing the vertical correction is zero.
    let results = solve_shot(
        &calm_meteo(),
        &Bullet::default(),
        &Rifle::default(),
        &Scope::default(),
        &shot_at(100),
        &Options::default(),
    )
    .unwrap();

    assert_eq!(results.vertical.cm, 0);
    assert!(
        results.vertical.angular.abs() < 1e-9,
        "residual zeroing error {}",
        results.vertical.angular
    );
    assert_eq!(results.vertical.clicks, 0);
}

#[test]
fn test_drop_grows_with_distance() {
    let solve = |distance| {
        solve_shot(
            &calm_meteo(),
            &Bullet::default(),
            &Rifle::default(),
            &Scope::default(),
            &shot_at(distance),
            &Options::default(),
        )
        .unwrap()
    };

    let near = solve(300);
    let far = solve(500);

    assert!(near.vertical.cm > 0, "drop at 300 m: {}", near.vertical.cm);
    assert!(far.vertical.cm > near.vertical.cm);
    assert!(far.flight_time > near.flight_time);
    assert!(far.mach < near.mach);
    assert!(far.kinetic_energy < near.kinetic_energy);
}

#[test]
fn test_crosswind_drift_mirrors_with_wind_side() {
    let solve = |direction| {
        solve_shot(
            &crosswind(direction),
            &Bullet::default(),
            &Rifle::default(),
            &Scope::default(),
            &shot_at(500),
            &Options::default(),
        )
        .unwrap()
    };

    let from_left = solve(90.0);
    let from_right = solve(270.0);

    // The two headings are not exact floating-point mirrors of each other,
    // so allow the rounding of the cm value to differ by one
    assert!(from_left.horizontal.cm != 0);
    assert!((from_left.horizontal.cm + from_right.horizontal.cm).abs() <= 1);
    assert_relative_eq!(
        from_left.horizontal.angular,
        -from_right.horizontal.angular,
        epsilon = 1e-3
    );
}

#[test]
fn test_spin_drift_follows_twist_direction() {
    use ballistic_solver::TwistDirection;

    let solve = |twist_direction| {
        solve_shot(
            &calm_meteo(),
            &Bullet::default(),
            &Rifle {
                twist_direction,
                ..Rifle::default()
            },
            &Scope::default(),
            &shot_at(800),
            &Options::default(),
        )
        .unwrap()
    };

    let right = solve(TwistDirection::Right);
    let left = solve(TwistDirection::Left);

    assert!(right.derivation.cm > 0);
    assert_eq!(right.derivation.cm, -left.derivation.cm);
}

#[test]
fn test_range_table_row_matches_scalar_solution() {
    let options = Options {
        range_table: true,
        ..Options::default()
    };
    let results = solve_shot(
        &calm_meteo(),
        &Bullet::default(),
        &Rifle::default(),
        &Scope::default(),
        &shot_at(300),
        &options,
    )
    .unwrap();

    let table = results.range_table.as_ref().unwrap();
    let row = table
        .distances
        .iter()
        .position(|&d| d == 300)
        .expect("300 m row present");

    assert_relative_eq!(table.time[row], results.flight_time, epsilon = 1e-12);
    // The scalar path converts through the cm value, the table path through
    // MOA, so the two agree only to the MOA/MRAD rounding in the constants
    assert_relative_eq!(
        table.vertical[row],
        results.vertical.angular,
        epsilon = 1e-3
    );
}

#[test]
fn test_thermal_correction_changes_the_solution() {
    let bullet = Bullet {
        thermal_sensitivity: 1.5,
        ..Bullet::default()
    };
    let cold = Meteo {
        temperature: -15.0,
        ..Meteo::default()
    };
    let solve = |thermal_correction| {
        solve_shot(
            &cold,
            &bullet,
            &Rifle::default(),
            &Scope::default(),
            &shot_at(600),
            &Options {
                thermal_correction,
                ..Options::default()
            },
        )
        .unwrap()
    };

    let raw = solve(false);
    let corrected = solve(true);

    // A cold charge is slower, so the corrected solution drops more
    assert!(corrected.vertical.cm > raw.vertical.cm);
    assert!(corrected.flight_time > raw.flight_time);
}

#[test]
fn test_zeroed_elsewhere_matches_here_under_identical_atmosphere() {
    let here = solve_shot(
        &calm_meteo(),
        &Bullet::default(),
        &Rifle::default(),
        &Scope::default(),
        &shot_at(300),
        &Options::default(),
    )
    .unwrap();

    let elsewhere_rifle = Rifle {
        zero_atmosphere: ZeroAtmosphere::Elsewhere,
        zero_temperature: 15.0,
        zero_pressure: 1013,
        ..Rifle::default()
    };
    let elsewhere = solve_shot(
        &calm_meteo(),
        &Bullet::default(),
        &elsewhere_rifle,
        &Scope::default(),
        &shot_at(300),
        &Options::default(),
    )
    .unwrap();

    // The reconstruction pass uses the exact (untruncated) speed of sound,
    // so the two agree closely but not bit for bit
    assert!((here.vertical.angular - elsewhere.vertical.angular).abs() < 0.05);
}

#[test]
fn test_cant_rewrites_the_turret_split() {
    let canted = Rifle {
        cant_angle: 90.0,
        ..Rifle::default()
    };
    let upright = solve_shot(
        &calm_meteo(),
        &Bullet::default(),
        &Rifle::default(),
        &Scope::default(),
        &shot_at(400),
        &Options::default(),
    )
    .unwrap();
    let rolled = solve_shot(
        &calm_meteo(),
        &Bullet::default(),
        &canted,
        &Scope::default(),
        &shot_at(400),
        &Options::default(),
    )
    .unwrap();

    // A quarter-turn cant moves the drop correction onto the other turret
    assert!(rolled.horizontal.angular != upright.horizontal.angular);
    assert!(rolled.vertical.angular != upright.vertical.angular);
}

#[test]
fn test_subsonic_distance_ordering() {
    // A slower, draggier bullet goes transonic inside the simulated range
    let bullet = Bullet {
        ballistic_coefficient: 0.2,
        muzzle_velocity: 800.0,
        ..Bullet::default()
    };
    let results = solve_shot(
        &calm_meteo(),
        &bullet,
        &Rifle::default(),
        &Scope::default(),
        &shot_at(1000),
        &Options::default(),
    )
    .unwrap();

    let t = &results.thresholds;
    assert!(t.transonic_1_2 <= t.transonic);
    assert!(t.transonic <= t.subsonic);
    assert!(t.subsonic <= t.deep_subsonic);
    assert!(t.deep_subsonic <= t.subsonic_0_7);
    assert!(t.transonic < 4000, "never went transonic");
}

fn golden_request() -> String {
    json!({
        "Token": "golden",
        "Bullet": {
            "DF": "G7", "BC": 0.447, "V0": 830.0, "lenght": 39.0,
            "weight": 300.0, "diam.": 8.59,
            "CCF_0.9": 1.0, "CCF_1.0": 1.0, "CCF_1.1": 1.0,
            "V0temp": 15.0, "therm": 0.0
        },
        "Rifle": {
            "zero": 100, "scope_height": 8.0, "twist": 254.0,
            "twist.dir": "R", "zero.atm": "not here",
            "zero.temp": 22.0, "zero.press": 995,
            "POI_vert": 0.0, "POI_horiz": 0.0, "roll": 0.0
        },
        "Scope": { "units": "MRAD", "vert.click": 0.1, "horiz.click": 0.1 },
        "Inputs": {
            "dist.": 200, "terrain_angle": 0.0, "target_azimuth": 0.0,
            "latitude": 45.0, "targ.speed": 0.0
        },
        "Options": {
            "koriolis": true, "rangecard": false,
            "therm.corr": false, "aerojump": true
        },
        "Meteo": {
            "temp.": 15.0, "press.": 1013, "humid.": 0.0,
            "wind": "simple",
            "windage": [{ "speed": 0.0, "dir.": 0.0, "incl.": 0.0 }]
        }
    })
    .to_string()
}

#[test]
fn test_golden_scenario_matches_recorded_solution() {
    let first = solve_request(&golden_request());
    let second = solve_request(&golden_request());
    assert_eq!(first, second, "solver must be bit-for-bit reproducible");

    let out: serde_json::Value = serde_json::from_str(&first).unwrap();
    let result = &out["Result"];

    // Recorded once from this scenario; every value here is pinned. The
    // rounded integers all sit far from their rounding boundaries, so only
    // the raw floats need a tolerance (libm differences across platforms).
    assert_relative_eq!(
        result["time"].as_f64().unwrap(),
        0.2528261367281494,
        max_relative = 1e-6
    );
    assert_relative_eq!(
        result["Mach"].as_f64().unwrap(),
        2.2407830868482335,
        max_relative = 1e-6
    );
    assert_relative_eq!(
        result["FGS"].as_f64().unwrap(),
        2.6877444171999705,
        max_relative = 1e-6
    );
    assert_relative_eq!(
        result["vert."][1].as_f64().unwrap(),
        0.37741478281839036,
        max_relative = 1e-6
    );
    assert_relative_eq!(
        result["horiz."][1].as_f64().unwrap(),
        0.013036282911126577,
        max_relative = 1e-6
    );
    assert_relative_eq!(
        result["deriv."][1].as_f64().unwrap(),
        0.04983972562387569,
        max_relative = 1e-6
    );

    assert_eq!(result["vert."][0], 8);
    assert_eq!(result["vert."][2], 4);
    assert_eq!(result["vert.abs"], 1173);
    assert_eq!(result["horiz."][0], 0);
    assert_eq!(result["horiz."][2], 0);
    assert_eq!(result["deriv."][0], 1);
    assert_eq!(result["deriv."][2], 0);
    assert_eq!(result["cinetic"], 5646);
    assert_eq!(result["A0"], 340);
    assert_eq!(result["trg.move"], 0.0);

    // Mach threshold crossing distances over the full simulated range
    assert_eq!(result["transsonic2.2M"], 244);
    assert_eq!(result["transsonic"], 1592);
    assert_eq!(result["supersonic"], 1748);
    assert_eq!(result["subsonic"], 2085);
    assert_eq!(result["subsonic0.7M"], 3583);
}

#[test]
fn test_complex_wind_request_round_trip() {
    let mut request: serde_json::Value = serde_json::from_str(&golden_request()).unwrap();
    request["Meteo"]["wind"] = json!("complex");
    request["Meteo"]["windage"] = json!([
        { "dist.": 0, "speed": 2.0, "dir.": 90.0, "incl.": 0.0 },
        { "dist.": 200, "speed": 3.0, "dir.": 90.0, "incl.": 0.0 },
        { "dist.": 400, "speed": 3.0, "dir.": 80.0, "incl.": 0.0 },
        { "dist.": 600, "speed": 4.0, "dir.": 95.0, "incl.": 0.0 },
        { "dist.": 800, "speed": 5.0, "dir.": 90.0, "incl.": 0.0 }
    ]);
    request["Inputs"]["dist."] = json!(700);

    let response = solve_request(&request.to_string());
    assert_ne!(response, "{}");

    let out: serde_json::Value = serde_json::from_str(&response).unwrap();
    let horiz_cm = out["Result"]["horiz."][0].as_i64().unwrap();
    assert!(horiz_cm != 0, "banded crosswind must drift the bullet");
}
