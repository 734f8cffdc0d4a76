//! # calc_core - Reinforced Concrete Design Engine
//!
//! `calc_core` holds everything behind the RC design tools that does not
//! touch a terminal: beam bending and shear design to the Hong Kong Code of
//! Practice for Structural Use of Concrete 2013, code clause search, PDF
//! reports, and the menu dispatcher that routes a selected tool to its
//! handler. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::calculations::bending::{calculate, BendingInput};
//!
//! let input = BendingInput {
//!     moment_knm: 250.0,
//!     ..BendingInput::default()
//! };
//! let result = calculate(&input).unwrap();
//! println!("{}", result.summary());
//! ```
//!
//! ## Modules
//!
//! - [`menu`] - Menu options, page configuration and the handler dispatcher
//! - [`calculations`] - Bending and shear design
//! - [`clauses`] - Clause index and search over the code text
//! - [`materials`] - Concrete grades, reinforcement grades and bar sizes
//! - [`pdf`] - Typst-rendered calculation reports
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod clauses;
pub mod errors;
pub mod materials;
pub mod menu;
pub mod pdf;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationItem, CalculationOutcome};
pub use clauses::{ClauseIndex, SearchHit};
pub use errors::{CalcError, CalcResult};
pub use menu::{Dispatcher, Handler, LayoutMode, MenuOption, PageConfig};
