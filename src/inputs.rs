//! Request-side data model: everything a single solve consumes.
//!
//! All of these are built once per request and read-only during the solve.

use crate::constants::{CM_PER_MOA_100M, CM_PER_MRAD_100M, WIND_BANDS};
use crate::drag::{DragFunction, DragTable};

/// Angular unit the scope turrets are graduated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngularUnits {
    Moa,
    Mrad,
}

impl AngularUnits {
    /// Centimeters subtended per unit at 100 m.
    pub fn cm_per_100m(self) -> f64 {
        match self {
            AngularUnits::Moa => CM_PER_MOA_100M,
            AngularUnits::Mrad => CM_PER_MRAD_100M,
        }
    }
}

/// Barrel rifling direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwistDirection {
    Right,
    Left,
}

/// Whether the rifle was zeroed under the current atmosphere or elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroAtmosphere {
    Here,
    Elsewhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReticlePattern {
    MilDot,
}

/// One distance-bracketed wind measurement of a complex wind description.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindBand {
    /// Distance this band starts at (m); the last band extends to infinity
    pub distance: u16,
    /// Wind speed (m/s)
    pub speed: f64,
    /// Direction the wind blows from, clockwise degrees, 0 = head-on
    pub direction: f64,
    /// Terrain incline of the measurement point (degrees)
    pub terrain_incline: f64,
}

/// Wind at the firing site: one uniform value or up to five bands downrange.
#[derive(Debug, Clone, PartialEq)]
pub enum Wind {
    Simple {
        speed: f64,
        direction: f64,
        terrain_incline: f64,
    },
    Complex([WindBand; WIND_BANDS]),
}

impl Wind {
    /// Still air, the common test fixture.
    pub fn calm() -> Self {
        Wind::Simple {
            speed: 0.0,
            direction: 0.0,
            terrain_incline: 0.0,
        }
    }
}

/// Firing-site atmosphere and wind.
#[derive(Debug, Clone, PartialEq)]
pub struct Meteo {
    /// Temperature (°C)
    pub temperature: f64,
    /// Station pressure (hPa)
    pub pressure: u16,
    /// Relative humidity (%)
    pub humidity: f64,
    pub wind: Wind,
}

impl Default for Meteo {
    fn default() -> Self {
        Self {
            temperature: 15.0,
            pressure: 1013,
            humidity: 50.0,
            wind: Wind::calm(),
        }
    }
}

/// Projectile description.
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub drag_function: DragFunction,
    /// Ballistic coefficient for the classic G-families
    pub ballistic_coefficient: f64,
    /// Near-transonic drag scale factor at Mach 0.9
    pub dsf_0_9: f64,
    /// Near-transonic drag scale factor at Mach 1.0
    pub dsf_1_0: f64,
    /// Near-transonic drag scale factor at Mach 1.1
    pub dsf_1_1: f64,
    /// Muzzle velocity (m/s)
    pub muzzle_velocity: f64,
    /// Bullet length (mm)
    pub length: f64,
    /// Bullet mass (grains)
    pub mass: f64,
    /// Caliber (mm)
    pub caliber: f64,
    /// Temperature the muzzle velocity was measured at (°C)
    pub v0_temperature: f64,
    /// Muzzle-velocity thermal sensitivity
    pub thermal_sensitivity: f64,
    /// Custom Cd or multi-BC table for the table-driven families
    pub drag_table: DragTable,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            drag_function: DragFunction::G7,
            ballistic_coefficient: 0.447,
            dsf_0_9: 1.0,
            dsf_1_0: 1.0,
            dsf_1_1: 1.0,
            muzzle_velocity: 830.0,
            length: 39.0,
            mass: 300.0,
            caliber: 8.59,
            v0_temperature: 15.0,
            thermal_sensitivity: 0.0,
            drag_table: DragTable::None,
        }
    }
}

/// Firing platform: zero, scope mount, rifling and point-of-impact offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Rifle {
    /// Zero distance (m)
    pub zero_distance: u16,
    /// Scope height over bore (cm)
    pub scope_height: f64,
    /// Twist length (mm per turn)
    pub twist: f64,
    pub twist_direction: TwistDirection,
    /// Where the rifle was zeroed, relative to the current atmosphere
    pub zero_atmosphere: ZeroAtmosphere,
    /// Temperature at zeroing (°C), used when zeroed elsewhere
    pub zero_temperature: f64,
    /// Pressure at zeroing (hPa), used when zeroed elsewhere
    pub zero_pressure: u16,
    /// Point-of-impact vertical offset (cm, positive up)
    pub poi_vertical: f64,
    /// Point-of-impact horizontal offset (cm, positive right)
    pub poi_horizontal: f64,
    /// Scope cant about the bore axis (degrees, clockwise positive)
    pub cant_angle: f64,
}

impl Default for Rifle {
    fn default() -> Self {
        Self {
            zero_distance: 100,
            scope_height: 8.0,
            twist: 254.0,
            twist_direction: TwistDirection::Right,
            zero_atmosphere: ZeroAtmosphere::Here,
            zero_temperature: 15.0,
            zero_pressure: 1013,
            poi_vertical: 0.0,
            poi_horizontal: 0.0,
            cant_angle: 0.0,
        }
    }
}

impl Rifle {
    /// Centimeters subtended per angular unit at the zero distance.
    fn cm_per_unit_at_zero(&self, scope: &Scope) -> f64 {
        scope.angle_units.cm_per_100m() * f64::from(self.zero_distance) / 100.0
    }

    /// Vertical POI offset as an angular dial correction. A point of impact
    /// above the aim point means dialing down, hence the sign flip.
    pub fn vertical_poi_angular(&self, scope: &Scope) -> f64 {
        -self.poi_vertical / self.cm_per_unit_at_zero(scope)
    }

    /// Horizontal POI offset as an angular dial correction (positive right).
    pub fn horizontal_poi_angular(&self, scope: &Scope) -> f64 {
        self.poi_horizontal / self.cm_per_unit_at_zero(scope)
    }
}

/// Sighting device.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub angle_units: AngularUnits,
    /// Vertical turret click value, in `angle_units`
    pub click_vertical: f64,
    /// Horizontal turret click value, in `angle_units`
    pub click_horizontal: f64,
    pub reticle: ReticlePattern,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            angle_units: AngularUnits::Mrad,
            click_vertical: 0.1,
            click_horizontal: 0.1,
            reticle: ReticlePattern::MilDot,
        }
    }
}

/// Shot geometry for a single solve.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotInputs {
    /// Distance to the target (m)
    pub distance: u16,
    /// Terrain angle between shooter and target (degrees)
    pub terrain_angle: f64,
    /// Target lateral speed (mil/s)
    pub target_speed_mils: f64,
    /// Shot azimuth (degrees), for the Coriolis terms
    pub target_azimuth: f64,
    /// Shooter latitude (degrees)
    pub latitude: f64,
    /// Local magnetic inclination (degrees)
    pub magnetic_inclination: f64,
}

impl Default for ShotInputs {
    fn default() -> Self {
        Self {
            distance: 100,
            terrain_angle: 0.0,
            target_speed_mils: 0.0,
            target_azimuth: 0.0,
            latitude: 45.0,
            magnetic_inclination: 0.0,
        }
    }
}

/// Feature toggles for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub coriolis: bool,
    pub range_table: bool,
    pub thermal_correction: bool,
    pub aero_jump: bool,
}
