//! # Unit Types
//!
//! Type-safe wrappers for engineering units. These provide compile-time
//! safety against unit confusion while remaining lightweight (just f64 wrappers).
//!
//! ## SI Units
//!
//! The Hong Kong concrete code works in SI throughout:
//! - Length: millimetres (mm), metres (m)
//! - Force: newtons (N), kilonewtons (kN)
//! - Stress: megapascals (MPa = N/mm²)
//! - Moment: kilonewton-metres (kNm), newton-millimetres (Nmm)
//! - Area: square millimetres (mm²)
//!
//! Design inputs are entered in the units engineers quote (kN, kNm, mm);
//! the code formulas are evaluated in N and mm.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{KnM, NMm, Metres, Millimetres};
//!
//! let moment = KnM(250.0);
//! let moment_nmm: NMm = moment.into();
//! assert_eq!(moment_nmm.0, 250.0e6);
//!
//! let span: Millimetres = Metres(6.0).into();
//! assert_eq!(span.0, 6000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimetres(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metres(pub f64);

impl From<Metres> for Millimetres {
    fn from(m: Metres) -> Self {
        Millimetres(m.0 * 1000.0)
    }
}

impl From<Millimetres> for Metres {
    fn from(mm: Millimetres) -> Self {
        Metres(mm.0 / 1000.0)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

impl From<KiloNewtons> for Newtons {
    fn from(kn: KiloNewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

impl From<Newtons> for KiloNewtons {
    fn from(n: Newtons) -> Self {
        KiloNewtons(n.0 / 1000.0)
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MPa(pub f64);

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kilonewton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnM(pub f64);

/// Moment in newton-millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NMm(pub f64);

impl From<KnM> for NMm {
    fn from(knm: KnM) -> Self {
        NMm(knm.0 * 1.0e6)
    }
}

impl From<NMm> for KnM {
    fn from(nmm: NMm) -> Self {
        KnM(nmm.0 / 1.0e6)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

/// Area per unit length in mm²/mm (link area over spacing, Asv/sv)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMmPerMm(pub f64);

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Millimetres);
impl_arithmetic!(Metres);
impl_arithmetic!(Newtons);
impl_arithmetic!(KiloNewtons);
impl_arithmetic!(MPa);
impl_arithmetic!(KnM);
impl_arithmetic!(NMm);
impl_arithmetic!(SqMm);
impl_arithmetic!(SqMmPerMm);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metres_to_millimetres() {
        let mm: Millimetres = Metres(7.5).into();
        assert_eq!(mm.0, 7500.0);
    }

    #[test]
    fn test_kilonewtons_to_newtons() {
        let n: Newtons = KiloNewtons(1.5).into();
        assert_eq!(n.0, 1500.0);
        let back: KiloNewtons = n.into();
        assert_eq!(back.0, 1.5);
    }

    #[test]
    fn test_moment_conversion() {
        let nmm: NMm = KnM(0.25).into();
        assert_eq!(nmm.0, 250_000.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = SqMm(1000.0);
        let b = SqMm(400.0);
        assert_eq!((a + b).0, 1400.0);
        assert_eq!((a - b).0, 600.0);
        assert_eq!((a * 2.0).0, 2000.0);
        assert_eq!((a / 4.0).0, 250.0);
    }

    #[test]
    fn test_serialization() {
        let stress = MPa(0.87);
        let json = serde_json::to_string(&stress).unwrap();
        assert_eq!(json, "0.87");

        let roundtrip: MPa = serde_json::from_str(&json).unwrap();
        assert_eq!(stress, roundtrip);
    }
}
