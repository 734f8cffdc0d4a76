//! # Beam Shear Design
//!
//! Designs vertical shear links for a rectangular beam to HK COP 2013
//! cl. 6.1.2.5 (Tables 6.2 and 6.3).
//!
//! ## Method
//!
//! - Design shear stress v = V / (b d), limited to vmax = min(0.8√fcu, 7 MPa)
//! - Concrete shear stress
//!   vc = 0.79 (100As/bd)^⅓ (400/d)^¼ (fcu/25)^⅓ / γm, γm = 1.25
//! - Links from Table 6.2:
//!   - v < 0.5vc: nominal (minimum) links
//!   - 0.5vc ≤ v < vc + vr: minimum links, Asv/sv = vr b / (0.87 fyv)
//!   - vc + vr ≤ v ≤ vmax: Asv/sv = b (v − vc) / (0.87 fyv)
//! - Link spacing not more than 0.75d
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::shear::{ShearInput, ShearLinkClass, calculate};
//!
//! let input = ShearInput::default();
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.link_class, ShearLinkClass::Designed);
//! assert!(result.shear_capacity_kn >= input.shear_kn);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::materials::{BarSize, ConcreteGrade, RebarGrade, SHEAR_PARTIAL_FACTOR, STEEL_DESIGN_FACTOR};
use crate::units::{KiloNewtons, Newtons, SqMmPerMm};

/// Absolute ceiling on the design shear stress (MPa)
const SHEAR_STRESS_CEILING_MPA: f64 = 7.0;

/// Concrete strength above which vc and vr stop increasing (MPa)
const SHEAR_FCU_CAP_MPA: f64 = 80.0;

/// Upper limit on 100As/(bd) in the vc expression
const STEEL_RATIO_CAP: f64 = 3.0;

/// Link spacings are rounded down to a multiple of this (mm)
const SPACING_INCREMENT_MM: f64 = 25.0;

/// Closest practical link spacing (mm)
const MIN_PRACTICAL_SPACING_MM: f64 = 75.0;

/// Input parameters for shear link design.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "B1 support",
///   "width_mm": 300.0,
///   "effective_depth_mm": 540.0,
///   "shear_kn": 250.0,
///   "tension_steel_mm2": 1608.0,
///   "concrete": "C35",
///   "link_grade": "Grade500",
///   "link_size": "D10",
///   "link_legs": 2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearInput {
    pub label: String,

    /// Section width b (mm)
    pub width_mm: f64,

    /// Effective depth d (mm)
    pub effective_depth_mm: f64,

    /// Ultimate design shear force V (kN)
    pub shear_kn: f64,

    /// Longitudinal tension steel continuing past the section (mm²)
    pub tension_steel_mm2: f64,

    pub concrete: ConcreteGrade,

    /// Link steel grade (fyv)
    pub link_grade: RebarGrade,

    pub link_size: BarSize,

    /// Number of vertical link legs
    pub link_legs: u32,
}

impl Default for ShearInput {
    fn default() -> Self {
        ShearInput {
            label: "B1".to_string(),
            width_mm: 300.0,
            effective_depth_mm: 540.0,
            shear_kn: 250.0,
            tension_steel_mm2: 1608.0,
            concrete: ConcreteGrade::C35,
            link_grade: RebarGrade::HighYield500,
            link_size: BarSize::D10,
            link_legs: 2,
        }
    }
}

impl ShearInput {
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.width_mm > 0.0) || !self.width_mm.is_finite() {
            return Err(CalcError::invalid_input("width_mm", self.width_mm.to_string(), "Width must be positive"));
        }
        if !(self.effective_depth_mm > 0.0) || !self.effective_depth_mm.is_finite() {
            return Err(CalcError::invalid_input(
                "effective_depth_mm",
                self.effective_depth_mm.to_string(),
                "Effective depth must be positive",
            ));
        }
        if !(self.shear_kn >= 0.0) || !self.shear_kn.is_finite() {
            return Err(CalcError::invalid_input(
                "shear_kn",
                self.shear_kn.to_string(),
                "Design shear must be zero or positive",
            ));
        }
        if !(self.tension_steel_mm2 >= 0.0) || !self.tension_steel_mm2.is_finite() {
            return Err(CalcError::invalid_input(
                "tension_steel_mm2",
                self.tension_steel_mm2.to_string(),
                "Tension steel area must be zero or positive",
            ));
        }
        if !(2..=8).contains(&self.link_legs) {
            return Err(CalcError::invalid_input(
                "link_legs",
                self.link_legs.to_string(),
                "Links need between 2 and 8 legs",
            ));
        }
        Ok(())
    }

    /// Design shear stress v = V / (b d) in MPa
    pub fn shear_stress_mpa(&self) -> f64 {
        let v: Newtons = KiloNewtons(self.shear_kn).into();
        v.value() / (self.width_mm * self.effective_depth_mm)
    }

    /// Total link leg area Asv (mm²)
    pub fn link_area_mm2(&self) -> f64 {
        self.link_size.area().value() * self.link_legs as f64
    }
}

/// Row of Table 6.2 that applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShearLinkClass {
    /// v < 0.5vc; minimum links (may be omitted in members of minor importance)
    Nominal,
    /// 0.5vc ≤ v < vc + vr
    Minimum,
    /// vc + vr ≤ v ≤ vmax; links designed for v − vc
    Designed,
    /// v > vmax; the section must be enlarged
    SectionInadequate,
}

impl ShearLinkClass {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShearLinkClass::Nominal => "Nominal links",
            ShearLinkClass::Minimum => "Minimum links",
            ShearLinkClass::Designed => "Designed links",
            ShearLinkClass::SectionInadequate => "Section inadequate",
        }
    }
}

impl std::fmt::Display for ShearLinkClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Results of shear design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearResult {
    /// Design shear stress v (MPa)
    pub shear_stress_mpa: f64,

    /// Concrete shear stress vc (MPa)
    pub concrete_shear_stress_mpa: f64,

    /// Shear resisted by minimum links vr (MPa)
    pub minimum_link_stress_mpa: f64,

    /// Maximum permitted shear stress vmax (MPa)
    pub max_shear_stress_mpa: f64,

    pub link_class: ShearLinkClass,

    /// Required Asv/sv (mm²/mm)
    pub link_area_per_spacing: SqMmPerMm,

    /// Provided leg area Asv (mm²)
    pub link_area_mm2: f64,

    /// Chosen link spacing sv (mm); None when the section is inadequate
    pub link_spacing_mm: Option<f64>,

    /// Spacing limit 0.75d (mm)
    pub max_link_spacing_mm: f64,

    /// Link description, e.g. "T10 2 legs @ 250"
    pub links: String,

    /// Shear resistance with the provided links (kN)
    pub shear_capacity_kn: f64,

    pub notes: Vec<String>,
}

impl ShearResult {
    pub fn passes(&self) -> bool {
        self.link_class != ShearLinkClass::SectionInadequate
            && self
                .link_spacing_mm
                .is_some_and(|s| s >= MIN_PRACTICAL_SPACING_MM)
    }

    /// v / vmax
    pub fn stress_utilization(&self) -> f64 {
        self.shear_stress_mpa / self.max_shear_stress_mpa
    }
}

/// Concrete design shear stress vc from Table 6.3.
pub fn concrete_shear_stress(width_mm: f64, effective_depth_mm: f64, tension_steel_mm2: f64, fcu: f64) -> f64 {
    let steel_ratio = (100.0 * tension_steel_mm2 / (width_mm * effective_depth_mm)).min(STEEL_RATIO_CAP);
    // beams always carry links, so the depth factor is not taken below 1
    let depth_factor = (400.0 / effective_depth_mm).powf(0.25).max(1.0);
    let strength_factor = (fcu.min(SHEAR_FCU_CAP_MPA) / 25.0).powf(1.0 / 3.0);
    0.79 * steel_ratio.powf(1.0 / 3.0) * depth_factor * strength_factor / SHEAR_PARTIAL_FACTOR
}

/// Shear stress carried by minimum links, vr
pub fn minimum_link_stress(fcu: f64) -> f64 {
    let fcu = fcu.min(SHEAR_FCU_CAP_MPA);
    if fcu <= 40.0 {
        0.4
    } else {
        0.4 * (fcu / 40.0).powf(2.0 / 3.0)
    }
}

/// vmax = min(0.8√fcu, 7 MPa)
pub fn max_shear_stress(fcu: f64) -> f64 {
    (0.8 * fcu.sqrt()).min(SHEAR_STRESS_CEILING_MPA)
}

/// Design shear links for a rectangular section.
pub fn calculate(input: &ShearInput) -> CalcResult<ShearResult> {
    input.validate()?;

    let b = input.width_mm;
    let d = input.effective_depth_mm;
    let fcu = input.concrete.fcu_mpa();
    let fyv = input.link_grade.fy_mpa();

    let v = input.shear_stress_mpa();
    let vc = concrete_shear_stress(b, d, input.tension_steel_mm2, fcu);
    let vr = minimum_link_stress(fcu);
    let vmax = max_shear_stress(fcu);

    let link_class = if v > vmax {
        ShearLinkClass::SectionInadequate
    } else if v < 0.5 * vc {
        ShearLinkClass::Nominal
    } else if v < vc + vr {
        ShearLinkClass::Minimum
    } else {
        ShearLinkClass::Designed
    };

    debug!(label = %input.label, v, vc, vr, vmax, class = %link_class, "shear design parameters");

    let design_stress = match link_class {
        ShearLinkClass::Designed | ShearLinkClass::SectionInadequate => v - vc,
        ShearLinkClass::Nominal | ShearLinkClass::Minimum => vr,
    };
    let asv_sv = b * design_stress / (STEEL_DESIGN_FACTOR * fyv);

    let asv = input.link_area_mm2();
    let max_spacing = 0.75 * d;
    let mut notes = Vec::new();

    let link_spacing_mm = if link_class == ShearLinkClass::SectionInadequate {
        notes.push(format!(
            "v = {:.2} MPa exceeds vmax = {:.2} MPa; increase the section size",
            v, vmax
        ));
        None
    } else {
        let raw = (asv / asv_sv).min(max_spacing);
        let spacing = (raw / SPACING_INCREMENT_MM).floor() * SPACING_INCREMENT_MM;
        if spacing < MIN_PRACTICAL_SPACING_MM {
            notes.push(format!(
                "Required spacing {:.0} mm is impractical; use larger links or more legs",
                raw
            ));
        }
        Some(spacing)
    };

    if link_class == ShearLinkClass::Nominal {
        notes.push("v < 0.5vc: links may be omitted in members of minor importance".to_string());
    }
    if input.tension_steel_mm2 / (b * d) * 100.0 > STEEL_RATIO_CAP {
        notes.push("100As/bd taken as 3 in vc".to_string());
    }

    let links = match link_spacing_mm {
        Some(s) => format!(
            "{}{} {} legs @ {:.0}",
            input.link_grade.prefix(),
            input.link_size,
            input.link_legs,
            s
        ),
        None => "n/a".to_string(),
    };

    let shear_capacity_kn = match link_spacing_mm {
        Some(s) if s > 0.0 => {
            let capacity = (vc + STEEL_DESIGN_FACTOR * fyv * asv / (b * s)).min(vmax) * b * d;
            KiloNewtons::from(Newtons(capacity)).value()
        }
        _ => KiloNewtons::from(Newtons(vc * b * d)).value(),
    };

    Ok(ShearResult {
        shear_stress_mpa: v,
        concrete_shear_stress_mpa: vc,
        minimum_link_stress_mpa: vr,
        max_shear_stress_mpa: vmax,
        link_class,
        link_area_per_spacing: SqMmPerMm(asv_sv),
        link_area_mm2: asv,
        link_spacing_mm,
        max_link_spacing_mm: max_spacing,
        links,
        shear_capacity_kn,
        notes,
    })
}
