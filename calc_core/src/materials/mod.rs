//! # Materials Database
//!
//! Concrete and reinforcement properties for design to the Hong Kong
//! *Code of Practice for Structural Use of Concrete 2013*.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::materials::{ConcreteGrade, RebarGrade, BarSize};
//!
//! let concrete = ConcreteGrade::C35;
//! let steel = RebarGrade::HighYield500;
//!
//! assert_eq!(concrete.fcu_mpa(), 35.0);
//! assert_eq!(steel.fy_mpa(), 500.0);
//! assert!(BarSize::D25.area().0 > 490.0);
//! ```

pub mod concrete;
pub mod rebar;

pub use concrete::{ConcreteGrade, StrengthBand};
pub use rebar::{select_bars, BarArrangement, BarSize, RebarGrade};

/// Elastic modulus of reinforcement Es (MPa)
pub const STEEL_ELASTIC_MODULUS_MPA: f64 = 200_000.0;

/// Partial safety factor for reinforcement, γm = 1.15 (hence 0.87 fy)
pub const STEEL_DESIGN_FACTOR: f64 = 0.87;

/// Partial safety factor for concrete shear strength, γm = 1.25
pub const SHEAR_PARTIAL_FACTOR: f64 = 1.25;
