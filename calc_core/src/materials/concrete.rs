//! Concrete Grades (HK COP 2013 Section 3.1)
//!
//! Characteristic cube strengths for normal-weight structural concrete and
//! the strength bands that switch the rectangular stress block parameters
//! used by the flexural design rules (cl. 6.1.2.4).

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::MPa;

/// Concrete grade designated by characteristic cube strength fcu (MPa)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConcreteGrade {
    C20,
    C25,
    #[default]
    C30,
    C35,
    C40,
    C45,
    C50,
    C60,
    C70,
    C80,
    C90,
    C100,
}

impl ConcreteGrade {
    /// All grades for UI selection
    pub const ALL: [ConcreteGrade; 12] = [
        ConcreteGrade::C20,
        ConcreteGrade::C25,
        ConcreteGrade::C30,
        ConcreteGrade::C35,
        ConcreteGrade::C40,
        ConcreteGrade::C45,
        ConcreteGrade::C50,
        ConcreteGrade::C60,
        ConcreteGrade::C70,
        ConcreteGrade::C80,
        ConcreteGrade::C90,
        ConcreteGrade::C100,
    ];

    /// Characteristic cube strength fcu
    pub fn fcu(&self) -> MPa {
        MPa(self.fcu_mpa())
    }

    /// Characteristic cube strength fcu in MPa
    pub fn fcu_mpa(&self) -> f64 {
        match self {
            ConcreteGrade::C20 => 20.0,
            ConcreteGrade::C25 => 25.0,
            ConcreteGrade::C30 => 30.0,
            ConcreteGrade::C35 => 35.0,
            ConcreteGrade::C40 => 40.0,
            ConcreteGrade::C45 => 45.0,
            ConcreteGrade::C50 => 50.0,
            ConcreteGrade::C60 => 60.0,
            ConcreteGrade::C70 => 70.0,
            ConcreteGrade::C80 => 80.0,
            ConcreteGrade::C90 => 90.0,
            ConcreteGrade::C100 => 100.0,
        }
    }

    /// Short-term static modulus of elasticity (GPa), Table 3.2:
    /// Ec = 3.46 √fcu + 3.21
    pub fn elastic_modulus_gpa(&self) -> f64 {
        3.46 * self.fcu_mpa().sqrt() + 3.21
    }

    /// Ultimate concrete compressive strain εcu (Figure 6.1)
    pub fn ultimate_strain(&self) -> f64 {
        let fcu = self.fcu_mpa();
        if fcu <= 60.0 {
            0.0035
        } else {
            0.0035 - 0.00006 * (fcu - 60.0).sqrt()
        }
    }

    /// Stress block band this grade falls into
    pub fn band(&self) -> StrengthBand {
        StrengthBand::for_fcu(self.fcu_mpa())
    }

    /// Next grade up, saturating at C100
    pub fn next(&self) -> ConcreteGrade {
        let idx = Self::ALL.iter().position(|g| g == self).unwrap_or(0);
        Self::ALL[(idx + 1).min(Self::ALL.len() - 1)]
    }

    /// Next grade down, saturating at C20
    pub fn previous(&self) -> ConcreteGrade {
        let idx = Self::ALL.iter().position(|g| g == self).unwrap_or(0);
        Self::ALL[idx.saturating_sub(1)]
    }

    /// Parse "C30", "c30", "30" or "grade 30"
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let cleaned = s.trim().to_uppercase().replace("GRADE", "").replace(' ', "");
        let digits = cleaned.trim_start_matches('C');
        let fcu: u32 = digits.parse().map_err(|_| CalcError::unknown_grade(s))?;
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.fcu_mpa() as u32 == fcu)
            .ok_or_else(|| CalcError::unknown_grade(s))
    }

    /// Get display name
    pub fn display_name(&self) -> String {
        format!("C{}", self.fcu_mpa() as u32)
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Strength band of the simplified rectangular stress block.
///
/// The code gives three sets of constants, for fcu ≤ 45, 45 < fcu ≤ 70 and
/// 70 < fcu ≤ 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthBand {
    /// fcu ≤ 45 MPa
    Normal,
    /// 45 < fcu ≤ 70 MPa
    High,
    /// 70 < fcu ≤ 100 MPa
    VeryHigh,
}

impl StrengthBand {
    pub fn for_fcu(fcu: f64) -> Self {
        if fcu <= 45.0 {
            StrengthBand::Normal
        } else if fcu <= 70.0 {
            StrengthBand::High
        } else {
            StrengthBand::VeryHigh
        }
    }

    /// Divisor of K in the lever arm expression z = d(0.5 + √(0.25 − K/α))
    pub fn lever_arm_divisor(&self) -> f64 {
        match self {
            StrengthBand::Normal => 0.9,
            StrengthBand::High => 0.8,
            StrengthBand::VeryHigh => 0.72,
        }
    }

    /// Ratio of stress block depth to neutral axis depth, x = (d − z)/β
    pub fn neutral_axis_factor(&self) -> f64 {
        match self {
            StrengthBand::Normal => 0.45,
            StrengthBand::High => 0.40,
            StrengthBand::VeryHigh => 0.36,
        }
    }

    /// Upper bound of K' irrespective of redistribution
    pub fn k_prime_max(&self) -> f64 {
        match self {
            StrengthBand::Normal => 0.156,
            StrengthBand::High => 0.120,
            StrengthBand::VeryHigh => 0.094,
        }
    }

    /// Neutral axis depth limit as a fraction of d with no redistribution
    pub fn neutral_axis_limit(&self) -> f64 {
        match self {
            StrengthBand::Normal => 0.5,
            StrengthBand::High => 0.4,
            StrengthBand::VeryHigh => 0.33,
        }
    }

    /// d'/x above which compression steel does not reach 0.87 fy
    pub fn compression_steel_yield_ratio(&self) -> f64 {
        match self {
            StrengthBand::Normal => 0.38,
            StrengthBand::High => 0.32,
            StrengthBand::VeryHigh => 0.29,
        }
    }

    /// K' for a given redistribution ratio βb:
    /// K' = k1(βb − c) − k2(βb − c)², capped at `k_prime_max`
    pub fn k_prime(&self, beta_b: f64) -> f64 {
        let (k1, k2, c) = match self {
            StrengthBand::Normal => (0.402, 0.18, 0.4),
            StrengthBand::High => (0.357, 0.143, 0.5),
            StrengthBand::VeryHigh => (0.324, 0.126, 0.6),
        };
        let t = (beta_b - c).max(0.0);
        (k1 * t - k2 * t * t).min(self.k_prime_max())
    }

    /// Neutral axis depth limit as a fraction of d, allowing for redistribution
    pub fn neutral_axis_limit_redistributed(&self, beta_b: f64) -> f64 {
        let offset = match self {
            StrengthBand::Normal => 0.4,
            StrengthBand::High => 0.5,
            StrengthBand::VeryHigh => 0.6,
        };
        (beta_b - offset).max(0.0).min(self.neutral_axis_limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_strengths() {
        assert_eq!(ConcreteGrade::C30.fcu_mpa(), 30.0);
        assert_eq!(ConcreteGrade::C100.fcu().0, 100.0);
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(ConcreteGrade::from_str_flexible("C35").unwrap(), ConcreteGrade::C35);
        assert_eq!(ConcreteGrade::from_str_flexible("c40").unwrap(), ConcreteGrade::C40);
        assert_eq!(ConcreteGrade::from_str_flexible("45").unwrap(), ConcreteGrade::C45);
        assert!(ConcreteGrade::from_str_flexible("C33").is_err());
        assert!(ConcreteGrade::from_str_flexible("strong").is_err());
    }

    #[test]
    fn test_bands() {
        assert_eq!(ConcreteGrade::C45.band(), StrengthBand::Normal);
        assert_eq!(ConcreteGrade::C50.band(), StrengthBand::High);
        assert_eq!(ConcreteGrade::C80.band(), StrengthBand::VeryHigh);
    }

    #[test]
    fn test_k_prime_at_ten_percent_redistribution() {
        // βb = 0.9 reproduces the familiar 0.156 for normal strength concrete
        let k = StrengthBand::Normal.k_prime(0.9);
        assert!((k - 0.156).abs() < 1e-3);
        // No redistribution is capped at the same value
        assert!((StrengthBand::Normal.k_prime(1.0) - 0.156).abs() < 1e-9);
    }

    #[test]
    fn test_k_prime_drops_with_redistribution() {
        let band = StrengthBand::Normal;
        assert!(band.k_prime(0.7) < band.k_prime(0.9));
        assert!(band.k_prime(0.7) > 0.0);
    }

    #[test]
    fn test_ultimate_strain() {
        assert_eq!(ConcreteGrade::C40.ultimate_strain(), 0.0035);
        assert!(ConcreteGrade::C100.ultimate_strain() < 0.0035);
    }

    #[test]
    fn test_grade_stepping() {
        assert_eq!(ConcreteGrade::C30.next(), ConcreteGrade::C35);
        assert_eq!(ConcreteGrade::C100.next(), ConcreteGrade::C100);
        assert_eq!(ConcreteGrade::C20.previous(), ConcreteGrade::C20);
    }

    #[test]
    fn test_elastic_modulus() {
        // Table 3.2 lists 22.2 GPa for C30
        assert!((ConcreteGrade::C30.elastic_modulus_gpa() - 22.2).abs() < 0.1);
    }
}
