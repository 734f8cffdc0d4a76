//! Loading clause indexes from disk.
//!
//! The code can be supplied as the published PDF, as extracted plain text,
//! or as a JSON index written by `clause-extract`. The kind is chosen from
//! the file extension.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::ClauseIndex;
use crate::errors::{CalcError, CalcResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    Pdf,
    Json,
    Text,
}

impl SourceKind {
    /// Anything other than `.pdf` or `.json` is read as text
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("pdf") => SourceKind::Pdf,
            Some("json") => SourceKind::Json,
            _ => SourceKind::Text,
        }
    }
}

/// Load a clause index from a PDF, JSON or text file.
pub fn load_index(path: &Path) -> CalcResult<ClauseIndex> {
    let kind = SourceKind::from_path(path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let index = match kind {
        SourceKind::Pdf => ClauseIndex::from_text(&extract_pdf_text(path)?, name),
        SourceKind::Json => {
            let json = read_to_string(path)?;
            ClauseIndex::from_json(&json)?
        }
        SourceKind::Text => ClauseIndex::from_text(&read_to_string(path)?, name),
    };

    info!(path = %path.display(), ?kind, clauses = index.len(), "loaded clause index");
    Ok(index)
}

/// Extract the text layer of a PDF.
pub fn extract_pdf_text(path: &Path) -> CalcResult<String> {
    let bytes = fs::read(path).map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
        let message = e.to_string();
        let reason = if message.contains("decrypt") || message.contains("password") || message.contains("encryption") {
            format!("PDF appears to be encrypted; export the text another way and load the .txt file ({message})")
        } else {
            message
        };
        CalcError::extraction_failed(path.display().to_string(), reason)
    })
}

fn read_to_string(path: &Path) -> CalcResult<String> {
    fs::read_to_string(path).map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))
}
