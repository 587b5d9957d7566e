//! Drag model: standard curve fits, custom Cd tables and multi-BC tables.
//!
//! The G1/G7/sphere coefficients are hand-fitted piecewise polynomials whose
//! breakpoints and coefficients must stay exactly as they are; downstream
//! ballistic tables were validated against these fits.

use crate::constants::{CDM_POINTS, CD_TO_RETARD, GRAIN_TO_POUND, MBC_POINTS, MM_TO_INCH};

/// Drag-function family selected for a bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragFunction {
    G1,
    G7,
    /// Spherical projectiles
    Sphere,
    /// Custom Cd(Mach) table
    Cdm,
    /// Multi-BC table resolved against the G1 curve
    MbcG1,
    /// Multi-BC table resolved against the G7 curve
    MbcG7,
}

impl DragFunction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "G1" => Some(DragFunction::G1),
            "G7" => Some(DragFunction::G7),
            "Gs" => Some(DragFunction::Sphere),
            "CDM" => Some(DragFunction::Cdm),
            "MBCG1" => Some(DragFunction::MbcG1),
            "MBCG7" => Some(DragFunction::MbcG7),
            _ => None,
        }
    }
}

impl std::fmt::Display for DragFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One Cd(Mach) point of a custom drag table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CdPoint {
    pub mach: f64,
    pub cd: f64,
}

/// One BC(Mach) point of a multi-BC table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BcPoint {
    pub mach: f64,
    pub bc: f64,
}

/// Custom drag table covering Mach 0.5–3.5 at 0.1 steps.
#[derive(Debug, Clone, PartialEq)]
pub struct CdTable {
    points: [CdPoint; CDM_POINTS],
}

impl CdTable {
    pub fn new(points: [CdPoint; CDM_POINTS]) -> Self {
        Self { points }
    }

    /// Build a table from bare Cd values, Mach axis implied at 0.1 steps from 0.5.
    pub fn from_cd_values(values: &[f64; CDM_POINTS]) -> Self {
        let mut points = [CdPoint { mach: 0.0, cd: 0.0 }; CDM_POINTS];
        for (i, &cd) in values.iter().enumerate() {
            points[i] = CdPoint {
                mach: 0.5 + i as f64 * 0.1,
                cd,
            };
        }
        Self { points }
    }

    /// Drag coefficient at `mach`, linearly interpolated between the two
    /// bracketing points. Mach outside the covered interval is clamped to
    /// the table edge before lookup, so no access can run off either end.
    pub fn cd(&self, mach: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[CDM_POINTS - 1];
        let mach = mach.clamp(first.mach, last.mach);

        let idx = (((mach * 10.0) as isize - 5).max(0) as usize).min(CDM_POINTS - 2);
        let lo = self.points[idx];
        let hi = self.points[idx + 1];

        let span = hi.mach - lo.mach;
        if span.abs() < f64::EPSILON {
            return lo.cd;
        }
        lo.cd + (hi.cd - lo.cd) * (mach - lo.mach) / span
    }
}

/// Multi-BC table covering Mach 0.5–3.0 at 0.1 steps.
///
/// Five entries shorter than [`CdTable`], hence its own clamped index range.
#[derive(Debug, Clone, PartialEq)]
pub struct BcTable {
    points: [BcPoint; MBC_POINTS],
}

impl BcTable {
    pub fn new(points: [BcPoint; MBC_POINTS]) -> Self {
        Self { points }
    }

    pub fn from_bc_values(values: &[f64; MBC_POINTS]) -> Self {
        let mut points = [BcPoint { mach: 0.0, bc: 0.0 }; MBC_POINTS];
        for (i, &bc) in values.iter().enumerate() {
            points[i] = BcPoint {
                mach: 0.5 + i as f64 * 0.1,
                bc,
            };
        }
        Self { points }
    }

    /// Ballistic coefficient at `mach`, clamped to the table's own interval.
    pub fn bc(&self, mach: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[MBC_POINTS - 1];
        let mach = mach.clamp(first.mach, last.mach);

        let idx = (((mach * 10.0) as isize - 5).max(0) as usize).min(MBC_POINTS - 2);
        let lo = self.points[idx];
        let hi = self.points[idx + 1];

        let span = hi.mach - lo.mach;
        if span.abs() < f64::EPSILON {
            return lo.bc;
        }
        lo.bc + (hi.bc - lo.bc) * (mach - lo.mach) / span
    }
}

/// Optional table payload attached to a bullet, tagged by family.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragTable {
    #[default]
    None,
    Cd(CdTable),
    Bc(BcTable),
}

/// Per-step drag state consumed by the integrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragInfo {
    /// Drag coefficient at the current Mach
    pub cd: f64,
    /// Retardation term `CD_TO_RETARD × CCF / BC`
    pub c3: f64,
    /// Effective BC the zeroing pass will reuse
    pub bc_zero: f64,
}

/// Retardation term for a given condition factor and effective BC.
pub fn c3(ccf: f64, bc: f64) -> f64 {
    (CD_TO_RETARD * ccf) / bc
}

/// Standard drag coefficient from the hand-fitted G1/G7/sphere curves.
///
/// The table-driven families resolve to one of these curves first, so this
/// accepts any family; `Cdm` evaluates the G7 reference curve it is scaled
/// against.
pub fn drag_coefficient(function: DragFunction, m: f64) -> f64 {
    let mut cd = 0.0;

    match function {
        DragFunction::G7 | DragFunction::MbcG7 | DragFunction::Cdm => {
            if m <= 0.749 {
                cd = 0.0012 * m + 0.1192;
            } else if m <= 0.949 {
                cd = 114.6667 * m.powi(4) - 369.2162 * m.powi(3) + 446.1956 * m.powi(2)
                    - 239.7609 * m
                    + 48.4391;
            } else if m <= 0.9749 {
                cd = 43.6 * m.powi(2) - 80.174 * m + 37.0217;
            } else if m <= 1.049 {
                cd = 441.6 * m.powi(3) - 1372.64 * m.powi(2) + 1422.248 * m - 490.8277;
            } else if m <= 2.049 {
                cd = 0.1185 * m.powi(5) - 1.1073 * m.powi(4) + 4.0521 * m.powi(3)
                    - 7.1962 * m.powi(2)
                    + 6.05 * m
                    - 1.5097;
            } else if m <= 4.0 {
                cd = -0.0547 * m + 0.4064;
            }
        }
        DragFunction::G1 | DragFunction::MbcG1 => {
            if m <= 0.499 {
                cd = 0.0852 * m.powi(2) - 0.1657 * m + 0.2637;
            } else if m <= 0.999 {
                cd = -89.1534 * m.powi(6) + 370.3571 * m.powi(5) - 630.2645 * m.powi(4)
                    + 564.7044 * m.powi(3)
                    - 281.0384 * m.powi(2)
                    + 73.5809 * m
                    - 7.705;
            } else if m <= 1.499 {
                cd = -3.8058 * m.powi(4) + 21.5685 * m.powi(3) - 46.2897 * m.powi(2)
                    + 44.5479 * m
                    - 15.54;
            } else if m <= 2.499 {
                cd = 0.067212 * m.powi(3) - 0.38359 * m.powi(2) + 0.593708 * m + 0.403095;
            } else if m <= 4.0 {
                cd = 0.0459 * m.powi(2) - 0.3051 * m + 1.0156;
            }
        }
        DragFunction::Sphere => {
            if m <= 0.55 {
                cd = 0.0551 * m + 0.4662;
            } else if m <= 1.15 {
                cd = 0.7301 * m + 0.0819;
            } else if m <= 1.3 {
                cd = 0.522 * m + 0.3184;
            } else if m <= 1.6 {
                cd = 0.0564 * m + 0.92175;
            } else {
                cd = -0.03698 * m + 1.07324;
            }
        }
    }

    cd
}

/// G7-referenced BC equivalent for a custom-table bullet.
///
/// `i7` is the form factor of the table relative to the G7 curve at the
/// current Mach; the BC then follows from sectional density.
fn form_factor_bc(mass_grains: f64, caliber_inch: f64, i7: f64) -> f64 {
    mass_grains * GRAIN_TO_POUND / (caliber_inch * caliber_inch * i7)
}

use crate::inputs::Bullet;

/// Refresh the per-step drag state for the current Mach number.
///
/// For the custom-table family the G7-referenced form-factor BC computed at
/// the zero distance is latched into `bc_zero` for the zeroing pass; the
/// other families keep their BC there directly.
pub fn update_drag_info(
    bullet: &Bullet,
    distance: u16,
    zero_distance: u16,
    mach: f64,
    ccf: f64,
    info: &mut DragInfo,
) {
    match (&bullet.drag_function, &bullet.drag_table) {
        (DragFunction::Cdm, DragTable::Cd(table)) => {
            info.cd = drag_coefficient(DragFunction::G7, mach);
            let i7 = table.cd(mach) / info.cd;

            let caliber_inch = bullet.caliber * MM_TO_INCH;
            let fake_bc = form_factor_bc(bullet.mass, caliber_inch, i7);
            info.c3 = c3(ccf, fake_bc);

            if distance == zero_distance {
                info.bc_zero = fake_bc;
            }
        }
        (DragFunction::MbcG1, DragTable::Bc(table)) => {
            let bc = table.bc(mach);
            info.cd = drag_coefficient(DragFunction::G1, mach);
            info.c3 = c3(ccf, bc);
            info.bc_zero = bc;
        }
        (DragFunction::MbcG7, DragTable::Bc(table)) => {
            let bc = table.bc(mach);
            info.cd = drag_coefficient(DragFunction::G7, mach);
            info.c3 = c3(ccf, bc);
            info.bc_zero = bc;
        }
        _ => {
            info.cd = drag_coefficient(bullet.drag_function, mach);
            info.c3 = c3(ccf, bullet.ballistic_coefficient);
            info.bc_zero = bullet.ballistic_coefficient;
        }
    }
}

/// Near-transonic drag-scale factor, interpolated between the bullet's
/// 0.9/1.0/1.1 Mach factors. Flat at 1.0 well above Mach 1.1 and flat at the
/// 0.9 factor below Mach 0.9.
pub fn drag_scale_factor(bullet: &Bullet, mach: f64) -> f64 {
    let (dsf_beg, dsf_end, mach_beg, mach_end) = if mach > 1.1 {
        (1.0, bullet.dsf_1_1, 4.0, 1.1)
    } else if mach > 1.0 {
        (bullet.dsf_1_1, bullet.dsf_1_0, 1.1, 1.0)
    } else if mach > 0.9 {
        (bullet.dsf_1_0, bullet.dsf_0_9, 1.0, 0.9)
    } else {
        (bullet.dsf_0_9, bullet.dsf_0_9, 0.9, 0.7)
    };

    dsf_beg + (dsf_end - dsf_beg) * (mach - mach_beg) / (mach_end - mach_beg)
}
