//! # Design Calculations
//!
//! Each calculation follows the same pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`bending`] - Flexural reinforcement of rectangular beam sections
//! - [`shear`] - Shear link design of rectangular beam sections

pub mod bending;
pub mod shear;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;

pub use bending::{BendingInput, BendingResult};
pub use shear::{ShearInput, ShearLinkClass, ShearResult};

/// Enum wrapper for all calculation types.
///
/// Lets batch tools and the report writer accept either calculation from a
/// single JSON document: `{ "type": "Bending", ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    Bending(BendingInput),
    Shear(ShearInput),
}

/// Result of running a [`CalculationItem`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutcome {
    Bending(BendingResult),
    Shear(ShearResult),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Bending(b) => &b.label,
            CalculationItem::Shear(s) => &s.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Bending(_) => "Bending",
            CalculationItem::Shear(_) => "Shear",
        }
    }

    /// Run the calculation
    pub fn calculate(&self) -> CalcResult<CalculationOutcome> {
        match self {
            CalculationItem::Bending(input) => bending::calculate(input).map(CalculationOutcome::Bending),
            CalculationItem::Shear(input) => shear::calculate(input).map(CalculationOutcome::Shear),
        }
    }
}

impl CalculationOutcome {
    pub fn passes(&self) -> bool {
        match self {
            CalculationOutcome::Bending(r) => r.passes(),
            CalculationOutcome::Shear(r) => r.passes(),
        }
    }
}
