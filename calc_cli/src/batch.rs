//! Non-interactive subcommands. Results go to stdout as JSON.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use calc_core::calculations::{bending, shear, BendingInput, CalculationItem, ShearInput};
use calc_core::clauses::load_index;
use calc_core::pdf::render_item_pdf;
use calc_core::ClauseIndex;

use crate::config::{AppConfig, ClausesConfig};
use crate::handlers::write_report;

/// Read JSON input from a file, or `-` for stdin; defaults when absent
fn read_input<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read input from stdin")?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read input {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("Invalid input JSON in {}", path.display()))
}

pub fn bending_json(input: &BendingInput) -> Result<String> {
    let result = bending::calculate(input)?;
    info!(label = %input.label, passes = result.passes(), "bending design");
    Ok(serde_json::to_string_pretty(&result)?)
}

pub fn shear_json(input: &ShearInput) -> Result<String> {
    let result = shear::calculate(input)?;
    info!(label = %input.label, passes = result.passes(), "shear design");
    Ok(serde_json::to_string_pretty(&result)?)
}

pub fn run_bending(path: Option<&Path>) -> Result<()> {
    let input: BendingInput = read_input(path)?;
    println!("{}", bending_json(&input)?);
    Ok(())
}

pub fn run_shear(path: Option<&Path>) -> Result<()> {
    let input: ShearInput = read_input(path)?;
    println!("{}", shear_json(&input)?);
    Ok(())
}

/// Load the clause index named on the command line, else the configured one
pub fn clause_index(source: Option<&Path>, config: &ClausesConfig) -> Result<ClauseIndex> {
    let Some(path) = source.or(config.source.as_deref()) else {
        bail!("No clause source: pass --source or set [clauses] source in the config file");
    };
    Ok(load_index(path)?)
}

pub fn search_json(index: &ClauseIndex, query: &str, limit: usize) -> Result<String> {
    let hits = index.search(query, limit);
    info!(query, hits = hits.len(), "clause search");
    Ok(serde_json::to_string_pretty(&hits)?)
}

pub fn run_search(query: &str, source: Option<&Path>, limit: Option<usize>, config: &AppConfig) -> Result<()> {
    let index = clause_index(source, &config.clauses)?;
    println!("{}", search_json(&index, query, limit.unwrap_or(config.clauses.limit))?);
    Ok(())
}

/// Render the calculation in `input` to PDF; returns the written path
pub fn run_report(input: &Path, output: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    let item: CalculationItem = {
        let text =
            std::fs::read_to_string(input).with_context(|| format!("Failed to read input {}", input.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid calculation JSON in {}", input.display()))?
    };

    let bytes = render_item_pdf(&item, &config.report.engineer, &config.report.job_id)?;
    let path = match output {
        Some(path) => {
            std::fs::write(&path, &bytes).with_context(|| format!("Failed to write report {}", path.display()))?;
            path
        }
        None => write_report(
            &config.report.output_dir,
            item.label(),
            &item.calc_type().to_ascii_lowercase(),
            &bytes,
        )?,
    };
    println!("{}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bending_json_fields() {
        let json = bending_json(&BendingInput::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["tension_steel_required_mm2"].as_f64().unwrap() > 0.0);
        assert!(value["tension_bars"]["count"].as_u64().unwrap() >= 2);
    }

    #[test]
    fn test_shear_json_rejects_bad_input() {
        let input = ShearInput {
            effective_depth_mm: -1.0,
            ..ShearInput::default()
        };
        assert!(shear_json(&input).is_err());
    }

    #[test]
    fn test_read_input_defaults_and_partial_files() {
        let input: BendingInput = read_input(None).unwrap();
        assert_eq!(input, BendingInput::default());

        let path = std::env::temp_dir().join(format!("rc_design_shear_input_{}.json", std::process::id()));
        let json = serde_json::to_string(&ShearInput {
            shear_kn: 400.0,
            ..ShearInput::default()
        })
        .unwrap();
        std::fs::write(&path, json).unwrap();
        let input: ShearInput = read_input(Some(&path)).unwrap();
        assert_eq!(input.shear_kn, 400.0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_clause_index_requires_source() {
        let err = clause_index(None, &ClausesConfig::default()).unwrap_err();
        assert!(err.to_string().contains("No clause source"));
    }

    #[test]
    fn test_search_json() {
        let index = ClauseIndex::from_text("6.1.2.5 Shear in beams\nLinks are required.\n", "t");
        let json = search_json(&index, "links", 5).unwrap();
        let hits: Vec<calc_core::SearchHit> = serde_json::from_str(&json).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].number, "6.1.2.5");
    }

    #[test]
    fn test_report_to_explicit_path() {
        let dir = std::env::temp_dir();
        let input = dir.join(format!("rc_design_item_{}.json", std::process::id()));
        let output = dir.join(format!("rc_design_item_{}.pdf", std::process::id()));
        let item = CalculationItem::Bending(BendingInput::default());
        std::fs::write(&input, serde_json::to_string(&item).unwrap()).unwrap();

        let written = run_report(&input, Some(output.clone()), &AppConfig::default()).unwrap();
        assert_eq!(written, output);
        assert!(std::fs::read(&output).unwrap().starts_with(b"%PDF"));

        let _ = std::fs::remove_file(input);
        let _ = std::fs::remove_file(output);
    }
}
