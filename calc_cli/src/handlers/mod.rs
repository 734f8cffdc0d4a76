//! Menu handlers for the terminal host.
//!
//! Each handler keeps its own state between cycles, takes the cycle's key
//! press from the [`Surface`] and redraws itself. Input mistakes are shown
//! inside the handler's pane; failures the user cannot fix by editing a
//! field (writing a report, for instance) are returned to the host.

pub mod bending;
pub mod clause_search;
pub mod shear;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use calc_core::menu::Dispatcher;
use calc_core::ClauseIndex;

use crate::app::AppDispatcher;
use crate::config::AppConfig;
use crate::surface::Surface;

pub use bending::BendingHandler;
pub use clause_search::ClauseSearchHandler;
pub use shear::ShearHandler;

/// Bind the three menu options to their handlers
pub fn build_dispatcher(config: &AppConfig, clauses: Result<ClauseIndex, String>) -> AppDispatcher {
    Dispatcher::new(
        BendingHandler::new(config.report.clone()),
        ShearHandler::new(config.report.clone()),
        ClauseSearchHandler::new(clauses, config.clauses.limit),
    )
}

/// Write report bytes to `<dir>/<label>_<kind>.pdf`
pub fn write_report(dir: &Path, label: &str, kind: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create report directory {}", dir.display()))?;
    let path = dir.join(format!("{}_{}.pdf", file_stem(label), kind));
    std::fs::write(&path, bytes).with_context(|| format!("Failed to write report {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "report exported");
    Ok(path)
}

/// Label reduced to characters safe in file names
fn file_stem(label: &str) -> String {
    let stem: String = label
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "calc".to_string()
    } else {
        stem
    }
}

/// Clear the pane so nothing from a previous handler shows through
fn clear(surface: &mut Surface) {
    let area = surface.area;
    surface.render_widget(ratatui::widgets::Clear, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("B1 grid A/3"), "B1_grid_A_3");
        assert_eq!(file_stem("  "), "calc");
        assert_eq!(file_stem("TB-2"), "TB-2");
    }

    #[test]
    fn test_write_report() {
        let dir = std::env::temp_dir().join(format!("rc_design_reports_{}", std::process::id()));
        let path = write_report(&dir, "B1", "bending", b"%PDF-1.7").unwrap();
        assert!(path.ends_with("B1_bending.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
        let _ = std::fs::remove_dir_all(dir);
    }
}
