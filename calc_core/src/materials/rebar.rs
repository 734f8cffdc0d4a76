//! Reinforcing Steel
//!
//! Steel grades (Table 3.1 of the code, CS2 bars) and the standard bar
//! diameters stocked in Hong Kong, with helpers to turn a required steel
//! area into a practical bar arrangement.
//!
//! ## Bar Designation
//!
//! - `T` prefix: high yield deformed bar, fy = 500 MPa
//! - `R` prefix: mild steel round bar, fy = 250 MPa
//!
//! An arrangement like `4T20` means four 20 mm high yield bars.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{MPa, SqMm};

/// Cover plus link allowance on each side of the section when checking
/// how many bars fit across the width (mm)
pub const SIDE_ALLOWANCE_MM: f64 = 50.0;

/// Minimum clear gap between bars irrespective of bar size (mm),
/// maximum aggregate size 20 mm + 5 mm
pub const MIN_CLEAR_GAP_MM: f64 = 25.0;

/// Layers of main bars considered before a design is reported as congested
pub const MAX_LAYERS: u32 = 2;

/// Reinforcement grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RebarGrade {
    /// Hot rolled mild steel, fy = 250 MPa
    #[serde(rename = "Grade250")]
    Mild250,
    /// High yield deformed steel, fy = 500 MPa
    #[default]
    #[serde(rename = "Grade500")]
    HighYield500,
}

impl RebarGrade {
    pub const ALL: [RebarGrade; 2] = [RebarGrade::Mild250, RebarGrade::HighYield500];

    /// Characteristic yield strength fy
    pub fn fy(&self) -> MPa {
        MPa(self.fy_mpa())
    }

    pub fn fy_mpa(&self) -> f64 {
        match self {
            RebarGrade::Mild250 => 250.0,
            RebarGrade::HighYield500 => 500.0,
        }
    }

    /// Minimum tension steel percentage 100As/(bh) for rectangular beams, Table 9.1
    pub fn min_tension_percentage(&self) -> f64 {
        match self {
            RebarGrade::Mild250 => 0.24,
            RebarGrade::HighYield500 => 0.13,
        }
    }

    /// Bar designation prefix
    pub fn prefix(&self) -> char {
        match self {
            RebarGrade::Mild250 => 'R',
            RebarGrade::HighYield500 => 'T',
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().replace([' ', '_', '-'], "").as_str() {
            "250" | "GRADE250" | "R" | "MILD" => Ok(RebarGrade::Mild250),
            "500" | "GRADE500" | "500B" | "500C" | "T" | "HIGHYIELD" => Ok(RebarGrade::HighYield500),
            _ => Err(CalcError::unknown_grade(s)),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RebarGrade::Mild250 => "Grade 250",
            RebarGrade::HighYield500 => "Grade 500",
        }
    }
}

impl std::fmt::Display for RebarGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Standard bar diameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum BarSize {
    D6,
    D8,
    #[default]
    D10,
    D12,
    D16,
    D20,
    D25,
    D32,
    D40,
}

impl BarSize {
    /// All sizes, smallest first
    pub const ALL: [BarSize; 9] = [
        BarSize::D6,
        BarSize::D8,
        BarSize::D10,
        BarSize::D12,
        BarSize::D16,
        BarSize::D20,
        BarSize::D25,
        BarSize::D32,
        BarSize::D40,
    ];

    /// Sizes used as main longitudinal bars in beams
    pub const MAIN_BARS: [BarSize; 6] = [
        BarSize::D12,
        BarSize::D16,
        BarSize::D20,
        BarSize::D25,
        BarSize::D32,
        BarSize::D40,
    ];

    /// Sizes used for shear links
    pub const LINKS: [BarSize; 5] = [
        BarSize::D6,
        BarSize::D8,
        BarSize::D10,
        BarSize::D12,
        BarSize::D16,
    ];

    pub fn diameter_mm(&self) -> f64 {
        match self {
            BarSize::D6 => 6.0,
            BarSize::D8 => 8.0,
            BarSize::D10 => 10.0,
            BarSize::D12 => 12.0,
            BarSize::D16 => 16.0,
            BarSize::D20 => 20.0,
            BarSize::D25 => 25.0,
            BarSize::D32 => 32.0,
            BarSize::D40 => 40.0,
        }
    }

    /// Cross-sectional area of one bar, πφ²/4
    pub fn area(&self) -> SqMm {
        SqMm(std::f64::consts::PI * self.diameter_mm().powi(2) / 4.0)
    }

    pub fn from_diameter(diameter_mm: f64) -> CalcResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| (b.diameter_mm() - diameter_mm).abs() < 0.01)
            .ok_or_else(|| {
                CalcError::invalid_input(
                    "bar_size",
                    diameter_mm.to_string(),
                    "Not a standard bar diameter (6, 8, 10, 12, 16, 20, 25, 32, 40)",
                )
            })
    }

    /// Step to the next size in `sizes`, wrapping around
    pub fn cycle(&self, sizes: &[BarSize]) -> BarSize {
        let idx = sizes.iter().position(|s| s == self).map(|i| i + 1).unwrap_or(0);
        sizes[idx % sizes.len()]
    }

    /// Bars of this size that fit in one layer across `width_mm`
    pub fn bars_per_layer(&self, width_mm: f64) -> u32 {
        let phi = self.diameter_mm();
        let gap = phi.max(MIN_CLEAR_GAP_MM);
        let clear_width = width_mm - 2.0 * SIDE_ALLOWANCE_MM;
        if clear_width < phi {
            return 0;
        }
        // n·φ + (n − 1)·gap ≤ clear width
        (((clear_width + gap) / (phi + gap)).floor() as u32).max(1)
    }
}

impl std::fmt::Display for BarSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.diameter_mm() as u32)
    }
}

/// A group of identical bars, e.g. 4T20
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarArrangement {
    pub count: u32,
    pub size: BarSize,
    pub grade: RebarGrade,
}

impl BarArrangement {
    pub fn new(count: u32, size: BarSize, grade: RebarGrade) -> Self {
        BarArrangement { count, size, grade }
    }

    /// Total provided area
    pub fn area(&self) -> SqMm {
        self.size.area() * self.count as f64
    }

    /// Number of layers needed across `width_mm`
    pub fn layers(&self, width_mm: f64) -> u32 {
        let per_layer = self.size.bars_per_layer(width_mm);
        if per_layer == 0 {
            return u32::MAX;
        }
        self.count.div_ceil(per_layer)
    }

    /// Designation like "4T20"
    pub fn designation(&self) -> String {
        format!("{}{}{}", self.count, self.grade.prefix(), self.size)
    }
}

impl std::fmt::Display for BarArrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.designation())
    }
}

/// Choose bars to provide at least `required` area in a beam `width_mm` wide.
///
/// With a preferred size the count is simply rounded up (never fewer than two
/// bars, one for each corner). Without one, main bar sizes are tried smallest
/// first and the first that fits within [`MAX_LAYERS`] layers is used.
pub fn select_bars(
    required: SqMm,
    width_mm: f64,
    grade: RebarGrade,
    preferred: Option<BarSize>,
) -> CalcResult<BarArrangement> {
    if required.0 < 0.0 || !required.0.is_finite() {
        return Err(CalcError::invalid_input(
            "required_area_mm2",
            required.0.to_string(),
            "Required steel area must be a finite non-negative number",
        ));
    }

    let count_for = |size: BarSize| -> u32 { ((required.0 / size.area().0).ceil() as u32).max(2) };

    if let Some(size) = preferred {
        return Ok(BarArrangement::new(count_for(size), size, grade));
    }

    BarSize::MAIN_BARS
        .iter()
        .map(|&size| BarArrangement::new(count_for(size), size, grade))
        .find(|arr| arr.layers(width_mm) <= MAX_LAYERS)
        .ok_or_else(|| {
            CalcError::calculation_failed(
                "Bar selection",
                format!(
                    "{:.0} mm² cannot be placed in {} layers across a {:.0} mm wide section",
                    required.0, MAX_LAYERS, width_mm
                ),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_areas() {
        assert!((BarSize::D20.area().0 - 314.16).abs() < 0.01);
        assert!((BarSize::D10.area().0 - 78.54).abs() < 0.01);
    }

    #[test]
    fn test_designation() {
        let arr = BarArrangement::new(4, BarSize::D25, RebarGrade::HighYield500);
        assert_eq!(arr.designation(), "4T25");
        let links = BarArrangement::new(2, BarSize::D8, RebarGrade::Mild250);
        assert_eq!(links.to_string(), "2R8");
    }

    #[test]
    fn test_bars_per_layer() {
        // 300 wide: clear width 200; T20 with 25 gap -> (200 + 25) / 45 = 5
        assert_eq!(BarSize::D20.bars_per_layer(300.0), 5);
        // T32 needs a 32 mm gap: (200 + 32) / 64 = 3
        assert_eq!(BarSize::D32.bars_per_layer(300.0), 3);
        assert_eq!(BarSize::D20.bars_per_layer(100.0), 0);
    }

    #[test]
    fn test_select_with_preferred_size() {
        let arr = select_bars(SqMm(1000.0), 300.0, RebarGrade::HighYield500, Some(BarSize::D20)).unwrap();
        assert_eq!(arr.count, 4);
        assert!(arr.area().0 >= 1000.0);
    }

    #[test]
    fn test_select_at_least_two_bars() {
        let arr = select_bars(SqMm(50.0), 300.0, RebarGrade::HighYield500, None).unwrap();
        assert_eq!(arr.count, 2);
        assert_eq!(arr.size, BarSize::D12);
    }

    #[test]
    fn test_select_automatic_fits_layers() {
        let arr = select_bars(SqMm(3000.0), 300.0, RebarGrade::HighYield500, None).unwrap();
        assert!(arr.area().0 >= 3000.0);
        assert!(arr.layers(300.0) <= MAX_LAYERS);
    }

    #[test]
    fn test_select_congested_section_fails() {
        let result = select_bars(SqMm(40_000.0), 200.0, RebarGrade::HighYield500, None);
        assert!(matches!(result, Err(CalcError::CalculationFailed { .. })));
    }

    #[test]
    fn test_from_diameter() {
        assert_eq!(BarSize::from_diameter(16.0).unwrap(), BarSize::D16);
        assert!(BarSize::from_diameter(18.0).is_err());
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(BarSize::D40.cycle(&BarSize::MAIN_BARS), BarSize::D12);
        assert_eq!(BarSize::D8.cycle(&BarSize::LINKS), BarSize::D10);
    }

    #[test]
    fn test_rebar_grade_parsing() {
        assert_eq!(RebarGrade::from_str_flexible("500B").unwrap(), RebarGrade::HighYield500);
        assert_eq!(RebarGrade::from_str_flexible("grade 250").unwrap(), RebarGrade::Mild250);
        assert!(RebarGrade::from_str_flexible("460").is_err());
    }
}
