/// Physical constants and unit conversions used across the solver.
///
/// The integrator works in an imperial (feet) frame inherited from the
/// classical point-mass formulation, while the request/response boundary is
/// metric. Keep every conversion here so the two domains never mix silently.

/// Conversion factor: meters to feet
pub const M_TO_FT: f64 = 3.28084;

/// Degrees to radians
pub const DEG_TO_RAD: f64 = 0.0174533;

/// Conversion factor: hPa to mmHg
pub const HPA_TO_MMHG: f64 = 0.75;

/// Conversion factor: millimeters to inches
pub const MM_TO_INCH: f64 = 0.03937;

/// Conversion factor: MOA to milliradians
pub const MOA_TO_MRAD: f64 = 0.2909;

/// Conversion factor: grains to pounds
pub const GRAIN_TO_POUND: f64 = 0.00014286;

/// Millimeters per inch
pub const INCH_MM: f64 = 25.4;

/// Centimeters per inch
pub const INCH_CM: f64 = 2.54;

/// Earth angular velocity (rad/s), used by the Coriolis terms
pub const EARTH_ROTATION: f64 = 0.00007292;

/// Subtension of one MOA at 100 m, in centimeters
pub const CM_PER_MOA_100M: f64 = 2.9089;

/// Subtension of one MRAD at 100 m, in centimeters
pub const CM_PER_MRAD_100M: f64 = 10.0;

/// Conversion factor: meters per second to miles per hour
pub const MPS_TO_MPH: f64 = 2.237;

/// Reference air density the condition-correction factor is taken against (kg/m³)
pub const STANDARD_AIR_DENSITY: f64 = 1.20288;

/// Drag-retardation constant relating Cd/BC to deceleration in the feet frame
pub const CD_TO_RETARD: f64 = -0.0002048757;

/// Maximum simulated distance (m); the integrator walks 1 m steps up to here
pub const DIST_RANGE: u16 = 4000;

/// Range-table stride (m)
pub const TABLE_STEP: u16 = 25;

/// Rows in the internal per-stride sample table, distance 0 included
pub const TABLE_ROWS: usize = (DIST_RANGE / TABLE_STEP) as usize + 1;

/// Number of bands in a complex wind description
pub const WIND_BANDS: usize = 5;

/// Points in a custom Cd(Mach) table: Mach 0.5 to 3.5 at 0.1 steps
pub const CDM_POINTS: usize = 31;

/// Points in a multi-BC BC(Mach) table: Mach 0.5 to 3.0 at 0.1 steps
pub const MBC_POINTS: usize = 26;

/// Mach thresholds whose first crossing distance is reported, high to low.
///
/// The first six are the "deep transonic" calibration marks, then
/// transonic (1.1), subsonic (1.0), deep subsonic (0.9) and 0.7 Mach.
pub const MACH_THRESHOLDS: [f64; 10] = [2.2, 2.0, 1.8, 1.6, 1.4, 1.2, 1.1, 1.0, 0.9, 0.7];

/// Version string echoed in every response
pub const SOLVER_VERSION: &str = "2.0.0.6";

/// Convert a metric value to the feet-domain equivalent
#[inline(always)]
pub fn to_feet(value: f64) -> f64 {
    value * M_TO_FT
}

/// Convert a feet-domain value back to metric
#[inline(always)]
pub fn from_feet(value: f64) -> f64 {
    value / M_TO_FT
}
