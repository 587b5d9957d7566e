//! JSON request/response contract.
//!
//! The wire schema is fixed by the fielded clients, including its quirks
//! (the misspelled `lenght` key, dotted key names, and a `supersonic` field
//! that actually carries the Mach 1.0 crossing). Any malformed request is
//! answered with a bare `{}` instead of an error payload.

use serde::Deserialize;
use serde_json::json;

use crate::constants::{CDM_POINTS, MBC_POINTS, SOLVER_VERSION, WIND_BANDS};
use crate::drag::{BcTable, CdTable, DragFunction, DragTable};
use crate::error::SolverError;
use crate::inputs::{
    AngularUnits, Bullet, Meteo, Options, ReticlePattern, Rifle, Scope, ShotInputs,
    TwistDirection, Wind, WindBand, ZeroAtmosphere,
};
use crate::results::Results;
use crate::solver;

#[derive(Debug, Deserialize)]
struct RequestWire {
    #[serde(rename = "Token")]
    token: String,
    #[serde(rename = "Bullet")]
    bullet: BulletWire,
    #[serde(rename = "Rifle")]
    rifle: RifleWire,
    #[serde(rename = "Scope")]
    scope: ScopeWire,
    #[serde(rename = "Inputs")]
    inputs: InputsWire,
    #[serde(rename = "Options")]
    options: OptionsWire,
    #[serde(rename = "Meteo")]
    meteo: MeteoWire,
}

#[derive(Debug, Deserialize)]
struct BulletWire {
    #[serde(rename = "DF")]
    drag_function: String,
    #[serde(rename = "BC")]
    ballistic_coefficient: f64,
    #[serde(rename = "CDM", default)]
    cdm: Option<Vec<f64>>,
    #[serde(rename = "MBC", default)]
    mbc: Option<Vec<f64>>,
    #[serde(rename = "V0")]
    muzzle_velocity: f64,
    // Misspelled on the wire, kept for compatibility
    #[serde(rename = "lenght")]
    length: f64,
    #[serde(rename = "weight")]
    mass: f64,
    #[serde(rename = "diam.")]
    caliber: f64,
    #[serde(rename = "CCF_0.9")]
    dsf_0_9: f64,
    #[serde(rename = "CCF_1.0")]
    dsf_1_0: f64,
    #[serde(rename = "CCF_1.1")]
    dsf_1_1: f64,
    #[serde(rename = "V0temp")]
    v0_temperature: f64,
    #[serde(rename = "therm")]
    thermal_sensitivity: f64,
}

#[derive(Debug, Deserialize)]
struct RifleWire {
    zero: u16,
    scope_height: f64,
    twist: f64,
    #[serde(rename = "twist.dir")]
    twist_direction: String,
    #[serde(rename = "zero.atm")]
    zero_atmosphere: String,
    #[serde(rename = "zero.temp")]
    zero_temperature: f64,
    #[serde(rename = "zero.press")]
    zero_pressure: u16,
    #[serde(rename = "POI_vert")]
    poi_vertical: f64,
    #[serde(rename = "POI_horiz")]
    poi_horizontal: f64,
    roll: f64,
}

#[derive(Debug, Deserialize)]
struct ScopeWire {
    units: String,
    #[serde(rename = "vert.click")]
    click_vertical: f64,
    #[serde(rename = "horiz.click")]
    click_horizontal: f64,
}

#[derive(Debug, Deserialize)]
struct InputsWire {
    #[serde(rename = "dist.")]
    distance: u16,
    terrain_angle: f64,
    target_azimuth: f64,
    latitude: f64,
    #[serde(rename = "targ.speed")]
    target_speed: f64,
}

#[derive(Debug, Deserialize)]
struct OptionsWire {
    koriolis: bool,
    rangecard: bool,
    #[serde(rename = "therm.corr")]
    thermal_correction: bool,
    aerojump: bool,
}

#[derive(Debug, Deserialize)]
struct WindageWire {
    #[serde(rename = "dist.", default)]
    distance: u16,
    speed: f64,
    #[serde(rename = "dir.")]
    direction: f64,
    #[serde(rename = "incl.")]
    incline: f64,
}

#[derive(Debug, Deserialize)]
struct MeteoWire {
    #[serde(rename = "temp.")]
    temperature: f64,
    #[serde(rename = "press.")]
    pressure: u16,
    #[serde(rename = "humid.")]
    humidity: f64,
    wind: String,
    windage: Vec<WindageWire>,
}

fn malformed(msg: impl Into<String>) -> SolverError {
    SolverError::MalformedRequest(msg.into())
}

fn drag_table(wire: &BulletWire, function: DragFunction) -> Result<DragTable, SolverError> {
    match function {
        DragFunction::Cdm => {
            let values = wire
                .cdm
                .as_deref()
                .ok_or_else(|| malformed("CDM table missing"))?;
            let values: &[f64; CDM_POINTS] = values
                .try_into()
                .map_err(|_| malformed(format!("CDM table has {} points", values.len())))?;
            Ok(DragTable::Cd(CdTable::from_cd_values(values)))
        }
        DragFunction::MbcG1 | DragFunction::MbcG7 => {
            let values = wire
                .mbc
                .as_deref()
                .ok_or_else(|| malformed("MBC table missing"))?;
            let values: &[f64; MBC_POINTS] = values
                .try_into()
                .map_err(|_| malformed(format!("MBC table has {} points", values.len())))?;
            Ok(DragTable::Bc(BcTable::from_bc_values(values)))
        }
        _ => Ok(DragTable::None),
    }
}

fn bullet_from_wire(wire: BulletWire) -> Result<Bullet, SolverError> {
    let function = DragFunction::from_str(&wire.drag_function)
        .ok_or_else(|| malformed(format!("unknown drag function {:?}", wire.drag_function)))?;
    let table = drag_table(&wire, function)?;

    Ok(Bullet {
        drag_function: function,
        ballistic_coefficient: wire.ballistic_coefficient,
        dsf_0_9: wire.dsf_0_9,
        dsf_1_0: wire.dsf_1_0,
        dsf_1_1: wire.dsf_1_1,
        muzzle_velocity: wire.muzzle_velocity,
        length: wire.length,
        mass: wire.mass,
        caliber: wire.caliber,
        v0_temperature: wire.v0_temperature,
        thermal_sensitivity: wire.thermal_sensitivity,
        drag_table: table,
    })
}

fn rifle_from_wire(wire: RifleWire) -> Rifle {
    Rifle {
        zero_distance: wire.zero,
        scope_height: wire.scope_height,
        twist: wire.twist,
        twist_direction: if wire.twist_direction == "R" {
            TwistDirection::Right
        } else {
            TwistDirection::Left
        },
        zero_atmosphere: if wire.zero_atmosphere == "here" {
            ZeroAtmosphere::Here
        } else {
            ZeroAtmosphere::Elsewhere
        },
        zero_temperature: wire.zero_temperature,
        zero_pressure: wire.zero_pressure,
        poi_vertical: wire.poi_vertical,
        poi_horizontal: wire.poi_horizontal,
        // The clients send whole degrees; fractional roll is noise, and the
        // square-rifle cases key on exactly +-90
        cant_angle: wire.roll.trunc(),
    }
}

fn meteo_from_wire(wire: MeteoWire) -> Result<Meteo, SolverError> {
    let wind = if wire.wind == "simple" {
        let band = wire
            .windage
            .first()
            .ok_or_else(|| malformed("simple wind needs one windage entry"))?;
        Wind::Simple {
            speed: band.speed,
            direction: band.direction,
            terrain_incline: band.incline,
        }
    } else {
        if wire.windage.len() < WIND_BANDS {
            return Err(malformed(format!(
                "complex wind has {} of {} bands",
                wire.windage.len(),
                WIND_BANDS
            )));
        }
        let mut bands = [WindBand::default(); WIND_BANDS];
        for (slot, entry) in bands.iter_mut().zip(wire.windage.iter()) {
            *slot = WindBand {
                distance: entry.distance,
                speed: entry.speed,
                direction: entry.direction,
                terrain_incline: entry.incline,
            };
        }
        Wind::Complex(bands)
    };

    Ok(Meteo {
        temperature: wire.temperature,
        pressure: wire.pressure,
        humidity: wire.humidity,
        wind,
    })
}

fn render_response(token: &str, results: &Results) -> String {
    let mut body = json!({
        "vert.": [results.vertical.cm, results.vertical.angular, results.vertical.clicks],
        "vert.abs": results.vertical_abs,
        "horiz.": [results.horizontal.cm, results.horizontal.angular, results.horizontal.clicks],
        "deriv.": [results.derivation.cm, results.derivation.angular, results.derivation.clicks],
        "time": results.flight_time,
        "Mach": results.mach,
        "FGS": results.stability,
        "A0": results.speed_of_sound,
        "trg.move": results.target_lead,
        "cinetic": results.kinetic_energy,
        "transsonic": results.thresholds.transonic,
        "supersonic": results.thresholds.subsonic,
        "subsonic": results.thresholds.deep_subsonic,
        "subsonic0.7M": results.thresholds.subsonic_0_7,
        "transsonic2.2M": results.thresholds.transonic_2_2,
        "transsonic2.0M": results.thresholds.transonic_2_0,
        "transsonic1.8M": results.thresholds.transonic_1_8,
        "transsonic1.6M": results.thresholds.transonic_1_6,
        "transsonic1.4M": results.thresholds.transonic_1_4,
        "transsonic1.2M": results.thresholds.transonic_1_2,
    });

    if let Some(table) = &results.range_table {
        body["rangecard"] = json!({
            "dist.": table.distances,
            "vert.": table.vertical,
            "horiz.": table.horizontal,
            "deriv.": table.derivation,
            "time": table.time,
        });
    }

    json!({
        "Version": SOLVER_VERSION,
        "Token": token,
        "Result": body,
    })
    .to_string()
}

fn handle(input: &str) -> Result<String, SolverError> {
    let wire: RequestWire = serde_json::from_str(input)?;

    let bullet = bullet_from_wire(wire.bullet)?;
    let rifle = rifle_from_wire(wire.rifle);
    let meteo = meteo_from_wire(wire.meteo)?;

    let scope = Scope {
        angle_units: if wire.scope.units == "MRAD" {
            AngularUnits::Mrad
        } else {
            AngularUnits::Moa
        },
        click_vertical: wire.scope.click_vertical,
        click_horizontal: wire.scope.click_horizontal,
        reticle: ReticlePattern::MilDot,
    };

    let inputs = ShotInputs {
        distance: wire.inputs.distance,
        terrain_angle: wire.inputs.terrain_angle,
        target_speed_mils: wire.inputs.target_speed,
        target_azimuth: wire.inputs.target_azimuth,
        latitude: wire.inputs.latitude,
        magnetic_inclination: 0.0,
    };

    let options = Options {
        coriolis: wire.options.koriolis,
        range_table: wire.options.rangecard,
        thermal_correction: wire.options.thermal_correction,
        aero_jump: wire.options.aerojump,
    };

    let results = solver::solve_shot(&meteo, &bullet, &rifle, &scope, &inputs, &options)?;
    Ok(render_response(&wire.token, &results))
}

/// Answer one request. Any parse or solve failure yields the empty object
/// so the client never sees a crash or a partial payload.
pub fn solve_request(input: &str) -> String {
    handle(input).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> String {
        json!({
            "Token": "abc123",
            "Bullet": {
                "DF": "G7", "BC": 0.447, "V0": 830.0, "lenght": 39.0,
                "weight": 300.0, "diam.": 8.59,
                "CCF_0.9": 1.0, "CCF_1.0": 1.0, "CCF_1.1": 1.0,
                "V0temp": 15.0, "therm": 0.0
            },
            "Rifle": {
                "zero": 100, "scope_height": 8.0, "twist": 254.0,
                "twist.dir": "R", "zero.atm": "here",
                "zero.temp": 15.0, "zero.press": 1013,
                "POI_vert": 0.0, "POI_horiz": 0.0, "roll": 0.0
            },
            "Scope": { "units": "MRAD", "vert.click": 0.1, "horiz.click": 0.1 },
            "Inputs": {
                "dist.": 300, "terrain_angle": 0.0, "target_azimuth": 0.0,
                "latitude": 45.0, "targ.speed": 0.0
            },
            "Options": {
                "koriolis": false, "rangecard": false,
                "therm.corr": false, "aerojump": false
            },
            "Meteo": {
                "temp.": 15.0, "press.": 1013, "humid.": 50.0,
                "wind": "simple",
                "windage": [{ "speed": 0.0, "dir.": 0.0, "incl.": 0.0 }]
            }
        })
        .to_string()
    }

    #[test]
    fn test_round_trip_echoes_token_and_version() {
        let response = solve_request(&sample_request());
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["Token"], "abc123");
        assert_eq!(parsed["Version"], SOLVER_VERSION);
        assert!(parsed["Result"]["vert."].is_array());
        assert!(parsed["Result"].get("rangecard").is_none());
    }

    #[test]
    fn test_garbage_request_yields_empty_object() {
        assert_eq!(solve_request("not even json"), "{}");
        assert_eq!(solve_request("{\"Token\": \"x\"}"), "{}");
    }

    #[test]
    fn test_unknown_drag_function_yields_empty_object() {
        let request = sample_request().replace("\"G7\"", "\"G9\"");
        assert_eq!(solve_request(&request), "{}");
    }

    #[test]
    fn test_short_cdm_table_is_rejected() {
        let mut parsed: serde_json::Value =
            serde_json::from_str(&sample_request()).unwrap();
        parsed["Bullet"]["DF"] = json!("CDM");
        parsed["Bullet"]["CDM"] = json!([0.2, 0.21, 0.22]);
        assert_eq!(solve_request(&parsed.to_string()), "{}");
    }

    #[test]
    fn test_rangecard_rows_present_when_requested() {
        let mut parsed: serde_json::Value =
            serde_json::from_str(&sample_request()).unwrap();
        parsed["Options"]["rangecard"] = json!(true);
        let response = solve_request(&parsed.to_string());
        let out: serde_json::Value = serde_json::from_str(&response).unwrap();
        let card = &out["Result"]["rangecard"];
        assert_eq!(card["dist."].as_array().unwrap().len(), 160);
        assert_eq!(card["dist."][0], 25);
        assert_eq!(card["time"].as_array().unwrap().len(), 160);
    }

    #[test]
    fn test_fractional_roll_truncates_to_whole_degrees() {
        let mut square: serde_json::Value = serde_json::from_str(&sample_request()).unwrap();
        square["Rifle"]["roll"] = json!(90.0);
        let mut fractional = square.clone();
        fractional["Rifle"]["roll"] = json!(90.4);
        assert_eq!(
            solve_request(&square.to_string()),
            solve_request(&fractional.to_string())
        );
    }

    #[test]
    fn test_complex_wind_needs_five_bands() {
        let mut parsed: serde_json::Value =
            serde_json::from_str(&sample_request()).unwrap();
        parsed["Meteo"]["wind"] = json!("complex");
        parsed["Meteo"]["windage"] = json!([
            { "dist.": 0, "speed": 2.0, "dir.": 90.0, "incl.": 0.0 },
            { "dist.": 200, "speed": 3.0, "dir.": 90.0, "incl.": 0.0 }
        ]);
        assert_eq!(solve_request(&parsed.to_string()), "{}");
    }
}
