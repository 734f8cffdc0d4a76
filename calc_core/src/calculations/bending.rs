//! # Beam Bending Design
//!
//! Designs the longitudinal reinforcement of a rectangular reinforced
//! concrete beam section for an ultimate bending moment, following the
//! simplified stress block method of HK COP 2013 cl. 6.1.2.4.
//!
//! ## Method
//!
//! 1. K = M / (b d² fcu)
//! 2. K' from the moment redistribution ratio βb and the strength band
//! 3. K ≤ K': singly reinforced, z = d(0.5 + √(0.25 − K/0.9)) ≤ 0.95d,
//!    As = M / (0.87 fy z)
//! 4. K > K': compression steel As' = (K − K') fcu b d² / (fsc (d − d')),
//!    As = K' fcu b d² / (0.87 fy z) + As' fsc / 0.87 fy
//!
//! The 0.9 divisor and the 0.45 neutral axis factor change for fcu > 45,
//! see [`StrengthBand`].
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::bending::{BendingInput, calculate};
//! use calc_core::materials::{ConcreteGrade, RebarGrade};
//!
//! let input = BendingInput {
//!     label: "B1 midspan".to_string(),
//!     width_mm: 300.0,
//!     overall_depth_mm: 600.0,
//!     effective_depth_mm: 540.0,
//!     compression_depth_mm: 60.0,
//!     moment_knm: 300.0,
//!     concrete: ConcreteGrade::C35,
//!     rebar: RebarGrade::HighYield500,
//!     redistribution_pct: 0.0,
//!     bar_size: None,
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert!(!result.compression_steel_required);
//! assert!(result.tension_steel_required_mm2 > 1400.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::materials::{
    select_bars, BarArrangement, BarSize, ConcreteGrade, RebarGrade, StrengthBand,
    STEEL_DESIGN_FACTOR, STEEL_ELASTIC_MODULUS_MPA,
};
use crate::units::{KnM, NMm, SqMm};

/// Maximum total steel as a percentage of the gross section (cl. 9.2.1.3)
const MAX_STEEL_PERCENTAGE: f64 = 4.0;

/// Upper bound on the lever arm as a fraction of d
const MAX_LEVER_ARM_RATIO: f64 = 0.95;

/// Relative shortfall of capacity tolerated in `passes()` (rounding only)
const CAPACITY_TOLERANCE: f64 = 1e-6;

/// Input parameters for flexural design of a rectangular section.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "B1 midspan",
///   "width_mm": 300.0,
///   "overall_depth_mm": 600.0,
///   "effective_depth_mm": 540.0,
///   "compression_depth_mm": 60.0,
///   "moment_knm": 300.0,
///   "concrete": "C35",
///   "rebar": "Grade500",
///   "redistribution_pct": 0.0,
///   "bar_size": "D20"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BendingInput {
    /// User label (e.g. "B1 midspan", "GB3 support A")
    pub label: String,

    /// Section width b (mm)
    pub width_mm: f64,

    /// Overall section depth h (mm), used for the min/max steel limits
    pub overall_depth_mm: f64,

    /// Effective depth d to the centroid of tension steel (mm)
    pub effective_depth_mm: f64,

    /// Depth d' to the centroid of compression steel (mm)
    pub compression_depth_mm: f64,

    /// Ultimate design moment M (kNm)
    pub moment_knm: f64,

    pub concrete: ConcreteGrade,

    pub rebar: RebarGrade,

    /// Moment redistribution applied in the analysis (%), 0 to 30
    #[serde(default)]
    pub redistribution_pct: f64,

    /// Preferred main bar size; chosen automatically when absent
    #[serde(default)]
    pub bar_size: Option<BarSize>,
}

impl Default for BendingInput {
    fn default() -> Self {
        BendingInput {
            label: "B1".to_string(),
            width_mm: 300.0,
            overall_depth_mm: 600.0,
            effective_depth_mm: 540.0,
            compression_depth_mm: 60.0,
            moment_knm: 300.0,
            concrete: ConcreteGrade::C35,
            rebar: RebarGrade::HighYield500,
            redistribution_pct: 0.0,
            bar_size: None,
        }
    }
}

impl BendingInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("width_mm", self.width_mm),
            ("overall_depth_mm", self.overall_depth_mm),
            ("effective_depth_mm", self.effective_depth_mm),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Dimension must be positive"));
            }
        }
        if self.effective_depth_mm >= self.overall_depth_mm {
            return Err(CalcError::invalid_input(
                "effective_depth_mm",
                self.effective_depth_mm.to_string(),
                "Effective depth must be less than the overall depth",
            ));
        }
        if !(self.compression_depth_mm > 0.0) || self.compression_depth_mm >= self.effective_depth_mm {
            return Err(CalcError::invalid_input(
                "compression_depth_mm",
                self.compression_depth_mm.to_string(),
                "Compression steel depth must be positive and less than the effective depth",
            ));
        }
        if !(self.moment_knm >= 0.0) || !self.moment_knm.is_finite() {
            return Err(CalcError::invalid_input(
                "moment_knm",
                self.moment_knm.to_string(),
                "Design moment must be zero or positive (design hogging moments as positive on the flipped section)",
            ));
        }
        if !(0.0..=30.0).contains(&self.redistribution_pct) {
            return Err(CalcError::invalid_input(
                "redistribution_pct",
                self.redistribution_pct.to_string(),
                "Moment redistribution is limited to 30%",
            ));
        }
        Ok(())
    }

    /// Moment redistribution ratio βb = 1 − redistribution
    pub fn beta_b(&self) -> f64 {
        1.0 - self.redistribution_pct / 100.0
    }

    /// Gross area b·h (mm²)
    pub fn gross_area(&self) -> SqMm {
        SqMm(self.width_mm * self.overall_depth_mm)
    }

    /// Design moment in N·mm
    pub fn moment(&self) -> NMm {
        KnM(self.moment_knm).into()
    }
}

/// Results of flexural design.
///
/// ## JSON Example
///
/// ```json
/// {
///   "k": 0.098,
///   "k_prime": 0.156,
///   "beta_b": 1.0,
///   "lever_arm_mm": 472.9,
///   "neutral_axis_mm": 149.2,
///   "compression_steel_required": false,
///   "tension_steel_required_mm2": 1458.4,
///   "compression_steel_required_mm2": 0.0,
///   "tension_bars": { "count": 8, "size": "D16", "grade": "Grade500" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BendingResult {
    /// K = M / (b d² fcu)
    pub k: f64,

    /// Limiting K' for the applied redistribution
    pub k_prime: f64,

    /// Moment redistribution ratio used
    pub beta_b: f64,

    /// Lever arm z (mm)
    pub lever_arm_mm: f64,

    /// Neutral axis depth x (mm)
    pub neutral_axis_mm: f64,

    /// Neutral axis depth limit allowed by the redistribution (mm)
    pub neutral_axis_limit_mm: f64,

    /// True when K > K' and compression reinforcement is needed
    pub compression_steel_required: bool,

    /// Design stress in the compression steel (MPa)
    pub compression_steel_stress_mpa: f64,

    /// Required tension steel area As, already raised to the minimum (mm²)
    pub tension_steel_required_mm2: f64,

    /// Required compression steel area As' (mm²)
    pub compression_steel_required_mm2: f64,

    /// Minimum tension steel (mm²)
    pub min_steel_mm2: f64,

    /// Maximum steel in tension or compression (mm²)
    pub max_steel_mm2: f64,

    /// Chosen tension bars
    pub tension_bars: BarArrangement,

    /// Chosen compression bars (doubly reinforced sections only)
    pub compression_bars: Option<BarArrangement>,

    /// Moment of resistance with the provided bars (kNm)
    pub moment_capacity_knm: f64,

    /// Ultimate design moment the section was designed for (kNm)
    #[serde(default)]
    pub design_moment_knm: f64,

    /// Design observations for the engineer
    pub notes: Vec<String>,
}

impl BendingResult {
    /// Tension and compression steel both within the 4% limit and the
    /// provided bars resist the design moment
    pub fn passes(&self) -> bool {
        self.tension_steel_required_mm2 <= self.max_steel_mm2
            && self.compression_steel_required_mm2 <= self.max_steel_mm2
            && self.moment_capacity_knm >= self.design_moment_knm * (1.0 - CAPACITY_TOLERANCE)
    }

    /// Ratio of required to maximum tension steel
    pub fn steel_utilization(&self) -> f64 {
        self.tension_steel_required_mm2 / self.max_steel_mm2
    }

    /// Short description of the design outcome
    pub fn summary(&self) -> String {
        let kind = if self.compression_steel_required { "Doubly reinforced" } else { "Singly reinforced" };
        match self.compression_bars {
            Some(comp) => format!("{}: bottom {}, top {}", kind, self.tension_bars, comp),
            None => format!("{}: {}", kind, self.tension_bars),
        }
    }
}

/// Design a rectangular section for bending.
///
/// Pure function: same input, same result.
///
/// # Returns
///
/// * `Ok(BendingResult)` - Steel areas, bar choice and design parameters
/// * `Err(CalcError)` - Invalid input, or no practical bar arrangement exists
pub fn calculate(input: &BendingInput) -> CalcResult<BendingResult> {
    input.validate()?;

    let b = input.width_mm;
    let d = input.effective_depth_mm;
    let d2 = input.compression_depth_mm;
    let fcu = input.concrete.fcu_mpa();
    let fy = input.rebar.fy_mpa();
    let band = input.concrete.band();
    let beta_b = input.beta_b();
    let m = input.moment().value();

    let bd2fcu = b * d * d * fcu;
    let k = m / bd2fcu;
    let k_prime = band.k_prime(beta_b);
    let x_limit = band.neutral_axis_limit_redistributed(beta_b) * d;

    debug!(label = %input.label, k, k_prime, "bending design parameters");

    let mut notes = Vec::new();
    let doubly = k > k_prime;

    let z = lever_arm(d, if doubly { k_prime } else { k }, band);
    let x = (d - z) / band.neutral_axis_factor();

    let (as_calc, as2_req, fsc) = if doubly {
        let fsc = compression_steel_stress(input, x, band);
        if fsc <= 0.0 {
            return Err(CalcError::calculation_failed(
                "Bending",
                format!(
                    "compression steel at d' = {:.0} mm lies at or below the neutral axis (x = {:.0} mm); \
                     reduce d' or deepen the section",
                    d2, x
                ),
            ));
        }
        if fsc < STEEL_DESIGN_FACTOR * fy {
            notes.push(format!(
                "d'/x = {:.2} exceeds {:.2}; compression steel stress reduced to {:.0} MPa",
                d2 / x,
                band.compression_steel_yield_ratio(),
                fsc
            ));
        }
        let as2 = (k - k_prime) * bd2fcu / (fsc * (d - d2));
        let as_ = k_prime * bd2fcu / (STEEL_DESIGN_FACTOR * fy * z) + as2 * fsc / (STEEL_DESIGN_FACTOR * fy);
        notes.push(format!("K = {:.3} > K' = {:.3}: compression reinforcement required", k, k_prime));
        (as_, as2, fsc)
    } else {
        (m / (STEEL_DESIGN_FACTOR * fy * z), 0.0, STEEL_DESIGN_FACTOR * fy)
    };

    if !doubly && z >= MAX_LEVER_ARM_RATIO * d - 1e-9 {
        notes.push("Lever arm limited to 0.95d".to_string());
    }

    let gross = input.gross_area();
    let as_min = gross.0 * input.rebar.min_tension_percentage() / 100.0;
    let as_max = gross.0 * MAX_STEEL_PERCENTAGE / 100.0;

    let as_req = if as_calc < as_min {
        notes.push(format!("Minimum steel {:.0} mm² governs", as_min));
        as_min
    } else {
        as_calc
    };

    if as_req > as_max {
        notes.push(format!("Tension steel exceeds 4% of bh ({:.0} mm²); enlarge the section", as_max));
    }
    if as2_req > as_max {
        notes.push(format!("Compression steel exceeds 4% of bh ({:.0} mm²); enlarge the section", as_max));
    }

    let tension_bars = select_bars(SqMm(as_req), b, input.rebar, input.bar_size)?;
    let compression_bars = if doubly {
        Some(select_bars(SqMm(as2_req), b, input.rebar, input.bar_size)?)
    } else {
        None
    };

    let moment_capacity_knm = moment_capacity(input, &tension_bars, compression_bars.as_ref(), k_prime, fsc);

    debug!(
        label = %input.label,
        as_req,
        as2_req,
        bars = %tension_bars,
        "bending design complete"
    );

    Ok(BendingResult {
        k,
        k_prime,
        beta_b,
        lever_arm_mm: z,
        neutral_axis_mm: x,
        neutral_axis_limit_mm: x_limit,
        compression_steel_required: doubly,
        compression_steel_stress_mpa: fsc,
        tension_steel_required_mm2: as_req,
        compression_steel_required_mm2: as2_req,
        min_steel_mm2: as_min,
        max_steel_mm2: as_max,
        tension_bars,
        compression_bars,
        moment_capacity_knm,
        design_moment_knm: input.moment_knm,
        notes,
    })
}

/// z = d(0.5 + √(0.25 − K/α)), not more than 0.95d
fn lever_arm(d: f64, k: f64, band: StrengthBand) -> f64 {
    let radicand = (0.25 - k / band.lever_arm_divisor()).max(0.0);
    (d * (0.5 + radicand.sqrt())).min(MAX_LEVER_ARM_RATIO * d)
}

/// Design stress in compression steel at neutral axis depth x.
///
/// Yields (0.87 fy) while d'/x stays below the band limit; beyond that the
/// strain εcu(1 − d'/x) is converted with Es.
fn compression_steel_stress(input: &BendingInput, x: f64, band: StrengthBand) -> f64 {
    let design_yield = STEEL_DESIGN_FACTOR * input.rebar.fy_mpa();
    let ratio = input.compression_depth_mm / x;
    if ratio <= band.compression_steel_yield_ratio() {
        return design_yield;
    }
    let strain = input.concrete.ultimate_strain() * (1.0 - ratio);
    (STEEL_ELASTIC_MODULUS_MPA * strain).clamp(0.0, design_yield)
}

/// Moment of resistance of the provided bars (kNm).
///
/// Singly reinforced: stress block depth s = 0.87 fy As / (0.45 fcu b),
/// M = 0.87 fy As (d − s/2). Doubly reinforced: M = K' fcu b d² + fsc As' (d − d').
fn moment_capacity(
    input: &BendingInput,
    tension: &BarArrangement,
    compression: Option<&BarArrangement>,
    k_prime: f64,
    fsc: f64,
) -> f64 {
    let b = input.width_mm;
    let d = input.effective_depth_mm;
    let fcu = input.concrete.fcu_mpa();
    let design_yield = STEEL_DESIGN_FACTOR * input.rebar.fy_mpa();

    let capacity = match compression {
        Some(comp) => {
            let concrete = k_prime * fcu * b * d * d;
            let steel = (tension.area().0 * design_yield - k_prime * fcu * b * d * d / lever_arm(d, k_prime, input.concrete.band()))
                .max(0.0)
                .min(comp.area().0 * fsc);
            concrete + steel * (d - input.compression_depth_mm)
        }
        None => {
            let force = design_yield * tension.area().0;
            let s = force / (0.45 * fcu * b);
            let z = (d - s / 2.0).min(MAX_LEVER_ARM_RATIO * d);
            force * z.max(0.0)
        }
    };

    KnM::from(NMm(capacity)).value()
}
