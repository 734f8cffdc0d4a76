//! Clause index builder for the concrete code of practice
//!
//! Extracts the text of a code PDF (or reads an already extracted text
//! file), splits it into numbered clauses and writes a JSON index that the
//! clause search can load without re-parsing the PDF.
//!
//! Usage:
//!   cargo run --bin clause-extract -- <source> [--output <file>] [--text] [--preview <n>]
//!
//! Examples:
//!   cargo run --bin clause-extract -- "codes/CoP_SUC2013e.pdf"
//!   cargo run --bin clause-extract -- "codes/CoP_SUC2013e.pdf" --output data/cop2013.json --preview 20

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use calc_core::clauses::source::extract_pdf_text;
use calc_core::clauses::{load_index, ClauseIndex, SourceKind};
use calc_core::CalcResult;

#[derive(Parser, Debug)]
#[command(name = "clause-extract", about = "Build a searchable clause index from a code of practice PDF or text file")]
struct Args {
    /// PDF or plain text file to index
    source: PathBuf,

    /// Output file for the JSON index (default: <source stem>.json next to the source)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also save the raw extracted text
    #[arg(long)]
    text: bool,

    /// Print the first N clause headings
    #[arg(long, value_name = "N")]
    preview: Option<usize>,
}

fn main() {
    let args = Args::parse();

    if !args.source.exists() {
        eprintln!("Error: source file not found: {}", args.source.display());
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> CalcResult<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.source.with_extension("json"));

    println!("Clause Index Builder");
    println!("====================");
    println!();
    println!("Input:  {}", args.source.display());
    println!("Output: {}", output.display());
    println!();

    let index = if args.text && SourceKind::from_path(&args.source) == SourceKind::Pdf {
        let text = extract_pdf_text(&args.source)?;
        let text_file = args.source.with_extension("txt");
        write_file(&text_file, &text)?;
        println!("Extracted text saved to: {}", text_file.display());
        ClauseIndex::from_text(&text, file_name(&args.source))
    } else {
        load_index(&args.source)?
    };

    println!("Found {} clauses", index.len());

    if let Some(n) = args.preview {
        println!();
        for clause in index.clauses().iter().take(n) {
            println!("  {:<12} {}", clause.number, clause.title);
        }
    }

    write_file(&output, &index.to_json()?)?;
    println!();
    println!("Clause index saved to: {}", output.display());
    println!("Point [clauses] source in the config file at this index to search it.");
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn write_file(path: &Path, contents: &str) -> CalcResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| calc_core::CalcError::file_error("create_dir", parent.display().to_string(), e.to_string()))?;
    }
    fs::write(path, contents)
        .map_err(|e| calc_core::CalcError::file_error("write", path.display().to_string(), e.to_string()))
}
