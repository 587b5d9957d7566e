//! # Ballistic Solver
//!
//! Deterministic external-ballistics trajectory solver: given a bullet,
//! rifle, scope, shot geometry and atmosphere it integrates the flight path
//! with a Heun predictor-corrector and produces elevation, windage and spin
//! drift corrections in centimeters, angular units and turret clicks, with
//! optional Coriolis, aerodynamic-jump, thermal and sight-cant handling and
//! a full range table.
//!
//! The crate exposes two surfaces: the typed [`solve_shot`] entry point for
//! embedding, and the JSON request/response contract in [`request`] for the
//! daemon boundary.

pub use drag::{BcTable, CdTable, DragFunction, DragTable};
pub use error::SolverError;
pub use inputs::{
    AngularUnits, Bullet, Meteo, Options, Rifle, Scope, ShotInputs, TwistDirection, Wind,
    WindBand, ZeroAtmosphere,
};
pub use request::solve_request;
pub use results::{CorrectionTriplet, RangeTable, Results, ThresholdDistances};
pub use solver::solve_shot;

pub mod atmosphere;
pub mod constants;
pub mod corrections;
pub mod drag;
mod error;
pub mod inputs;
pub mod request;
pub mod results;
pub mod roll;
pub mod solver;
pub mod stability;
pub mod wind;
