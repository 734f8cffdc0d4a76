//! # PDF Generation Module
//!
//! Generates calculation reports for beam bending and shear designs using Typst.
//!
//! ## Architecture
//!
//! - Typst templates are embedded as string constants
//! - Data is injected via string replacement before compilation
//! - Fonts come from `typst-assets` and are loaded once per process
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::calculations::bending::{calculate, BendingInput};
//! use calc_core::pdf::render_bending_pdf;
//!
//! let input = BendingInput::default();
//! let result = calculate(&input).unwrap();
//! let pdf_bytes = render_bending_pdf(&input, &result, "A. Engineer", "24-017").unwrap();
//! std::fs::write("bending_report.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::bending::{BendingInput, BendingResult};
use crate::calculations::shear::{ShearInput, ShearResult};
use crate::calculations::{CalculationItem, CalculationOutcome};
use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Bundled fonts, parsed on first use
static FONTS: Lazy<(FontBook, Vec<Font>)> = Lazy::new(|| {
    let fonts: Vec<Font> = typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data.to_vec())))
        .collect();
    debug!(count = fonts.len(), "loaded report fonts");
    (FontBook::from_fonts(&fonts), fonts)
});

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: &'static [Font],
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let (book, fonts) = &*FONTS;
        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book.clone()),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// PDF Templates
// ============================================================================

/// Page setup, title block and project information shared by all reports
const HEADER_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 25mm, bottom: 25mm, left: 20mm, right: 20mm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Reinforced Concrete Design Tools]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Job: {{JOB_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 10pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[{{TITLE}}]
    #v(4pt)
    #text(size: 13pt)[{{LABEL}}]
  ]
]

#v(12pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Project Information*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      row-gutter: 4pt,
      [Engineer:], [{{ENGINEER}}],
      [Job ID:], [{{JOB_ID}}],
      [Date:], [{{DATE}}],
    )
  ],
  [
    *Code Reference*
    #v(4pt)
    Code of Practice for Structural Use of Concrete 2013, {{CLAUSE}}
  ]
)

#v(12pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)
"##;

/// Verdict banner and notes shared by all reports
const FOOTER_TEMPLATE: &str = r##"
#v(16pt)

#let pass_status = "{{OVERALL_PASS}}"
#align(center)[
  #block(
    width: auto,
    fill: if pass_status == "PASS" { rgb("#d4edda") } else { rgb("#f8d7da") },
    inset: 14pt,
    radius: 4pt
  )[
    #text(size: 14pt, weight: "bold")[
      #if pass_status == "PASS" [
        DESIGN ADEQUATE
      ] else [
        DESIGN INADEQUATE
      ]
    ]
    #v(4pt)
    #text(size: 11pt)[{{SUMMARY}}]
  ]
]

#v(12pt)

{{NOTES}}

#v(20pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

#text(size: 8pt, fill: gray)[
  Generated by Reinforced Concrete Design Tools \
  Calculations should be verified by a registered structural engineer.
]
"##;

const BENDING_TEMPLATE: &str = r##"
== Input Parameters

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Parameter*], [*Value*], [*Unit*]),
  [Width $b$], [{{B}}], [mm],
  [Overall depth $h$], [{{H}}], [mm],
  [Effective depth $d$], [{{D}}], [mm],
  [Compression steel depth $d'$], [{{D2}}], [mm],
  [Design moment $M$], [{{M}}], [kNm],
  [Concrete], [{{CONCRETE}}], [],
  [Reinforcement], [{{REBAR}}], [],
  [Moment redistribution], [{{REDIST}}], [%],
)

#v(10pt)

== Design

$ K = M / (b d^2 f_"cu") = {{K}} quad K' = {{K_PRIME}} quad beta_b = {{BETA_B}} $

$ z = d (0.5 + sqrt(0.25 - K / {{ALPHA}})) = {{Z}} "mm" $

$ x = (d - z) / {{BETA}} = {{X}} "mm" quad x_"lim" = {{X_LIM}} "mm" $

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Steel*], [*Area*], [*Unit*]),
  [Tension steel required $A_s$], [{{AS_REQ}}], [mm#super[2]],
  [Compression steel required $A_s'$], [{{AS2_REQ}}], [mm#super[2]],
  [Minimum steel], [{{AS_MIN}}], [mm#super[2]],
  [Maximum steel (4%)], [{{AS_MAX}}], [mm#super[2]],
  [Tension bars provided], [{{TENSION_BARS}}], [{{TENSION_AREA}} mm#super[2]],
  [Compression bars provided], [{{COMPRESSION_BARS}}], [{{COMPRESSION_AREA}} mm#super[2]],
  [Compression steel stress $f_"sc"$], [{{FSC}}], [MPa],
  [Moment capacity], [{{M_CAP}}], [kNm],
)
"##;

const SHEAR_TEMPLATE: &str = r##"
== Input Parameters

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Parameter*], [*Value*], [*Unit*]),
  [Width $b_v$], [{{B}}], [mm],
  [Effective depth $d$], [{{D}}], [mm],
  [Design shear $V$], [{{V}}], [kN],
  [Tension steel $A_s$], [{{AS}}], [mm#super[2]],
  [Concrete], [{{CONCRETE}}], [],
  [Links], [{{LINK_GRADE}}, {{LINK_LEGS}} legs of {{LINK_SIZE}} mm], [],
)

#v(10pt)

== Design

$ v = V / (b_v d) = {{V_STRESS}} "MPa" quad v_"max" = {{V_MAX}} "MPa" $

$ v_c = {{VC}} "MPa" quad v_r = {{VR}} "MPa" $

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Item*], [*Value*], [*Unit*]),
  [Link requirement], [{{CLASS}}], [],
  [$A_"sv" / s_v$ required], [{{ASV_SV}}], [mm#super[2]/mm],
  [Link area provided $A_"sv"$], [{{ASV}}], [mm#super[2]],
  [Spacing provided], [{{SPACING}}], [mm],
  [Maximum spacing $0.75 d$], [{{MAX_SPACING}}], [mm],
  [Links], [{{LINKS}}], [],
  [Shear capacity], [{{V_CAP}}], [kN],
)
"##;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Render a bending design to PDF.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError)` - If compilation or rendering fails
pub fn render_bending_pdf(
    input: &BendingInput,
    result: &BendingResult,
    engineer: &str,
    job_id: &str,
) -> CalcResult<Vec<u8>> {
    compile_pdf(bending_source(input, result, engineer, job_id))
}

/// Render a shear design to PDF.
pub fn render_shear_pdf(input: &ShearInput, result: &ShearResult, engineer: &str, job_id: &str) -> CalcResult<Vec<u8>> {
    compile_pdf(shear_source(input, result, engineer, job_id))
}

/// Run any calculation item and render its report.
///
/// # Example
///
/// ```rust,no_run
/// use calc_core::calculations::{CalculationItem, ShearInput};
/// use calc_core::pdf::render_item_pdf;
///
/// let item = CalculationItem::Shear(ShearInput::default());
/// let pdf = render_item_pdf(&item, "A. Engineer", "24-017").unwrap();
/// ```
pub fn render_item_pdf(item: &CalculationItem, engineer: &str, job_id: &str) -> CalcResult<Vec<u8>> {
    match (item, item.calculate()?) {
        (CalculationItem::Bending(input), CalculationOutcome::Bending(result)) => {
            render_bending_pdf(input, &result, engineer, job_id)
        }
        (CalculationItem::Shear(input), CalculationOutcome::Shear(result)) => {
            render_shear_pdf(input, &result, engineer, job_id)
        }
        _ => Err(CalcError::Internal {
            message: format!("Outcome does not match calculation type {}", item.calc_type()),
        }),
    }
}

/// Typst source for a bending report
fn bending_source(input: &BendingInput, result: &BendingResult, engineer: &str, job_id: &str) -> String {
    let band = input.concrete.band();
    let (compression_bars, compression_area) = match &result.compression_bars {
        Some(bars) => (bars.designation(), format!("{:.0}", bars.area().value())),
        None => ("-".to_string(), "0".to_string()),
    };

    let body = BENDING_TEMPLATE
        .replace("{{B}}", &format!("{:.0}", input.width_mm))
        .replace("{{H}}", &format!("{:.0}", input.overall_depth_mm))
        .replace("{{D}}", &format!("{:.0}", input.effective_depth_mm))
        .replace("{{D2}}", &format!("{:.0}", input.compression_depth_mm))
        .replace("{{M}}", &format!("{:.1}", input.moment_knm))
        .replace("{{CONCRETE}}", &input.concrete.display_name())
        .replace("{{REBAR}}", input.rebar.display_name())
        .replace("{{REDIST}}", &format!("{:.0}", input.redistribution_pct))
        .replace("{{K}}", &format!("{:.4}", result.k))
        .replace("{{K_PRIME}}", &format!("{:.4}", result.k_prime))
        .replace("{{BETA_B}}", &format!("{:.2}", result.beta_b))
        .replace("{{ALPHA}}", &format!("{:.2}", band.lever_arm_divisor()))
        .replace("{{BETA}}", &format!("{:.2}", band.neutral_axis_factor()))
        .replace("{{Z}}", &format!("{:.1}", result.lever_arm_mm))
        .replace("{{X}}", &format!("{:.1}", result.neutral_axis_mm))
        .replace("{{X_LIM}}", &format!("{:.1}", result.neutral_axis_limit_mm))
        .replace("{{AS_REQ}}", &format!("{:.0}", result.tension_steel_required_mm2))
        .replace("{{AS2_REQ}}", &format!("{:.0}", result.compression_steel_required_mm2))
        .replace("{{AS_MIN}}", &format!("{:.0}", result.min_steel_mm2))
        .replace("{{AS_MAX}}", &format!("{:.0}", result.max_steel_mm2))
        .replace("{{TENSION_BARS}}", &result.tension_bars.designation())
        .replace("{{TENSION_AREA}}", &format!("{:.0}", result.tension_bars.area().value()))
        .replace("{{COMPRESSION_BARS}}", &compression_bars)
        .replace("{{COMPRESSION_AREA}}", &compression_area)
        .replace("{{FSC}}", &format!("{:.0}", result.compression_steel_stress_mpa))
        .replace("{{M_CAP}}", &format!("{:.1}", result.moment_capacity_knm));

    assemble(
        "Beam Bending Design",
        &input.label,
        "cl. 6.1.2.4",
        engineer,
        job_id,
        &body,
        result.passes(),
        &result.summary(),
        &result.notes,
    )
}

/// Typst source for a shear report
fn shear_source(input: &ShearInput, result: &ShearResult, engineer: &str, job_id: &str) -> String {
    let spacing = result
        .link_spacing_mm
        .map(|s| format!("{:.0}", s))
        .unwrap_or_else(|| "-".to_string());

    let body = SHEAR_TEMPLATE
        .replace("{{B}}", &format!("{:.0}", input.width_mm))
        .replace("{{D}}", &format!("{:.0}", input.effective_depth_mm))
        .replace("{{V}}", &format!("{:.1}", input.shear_kn))
        .replace("{{AS}}", &format!("{:.0}", input.tension_steel_mm2))
        .replace("{{CONCRETE}}", &input.concrete.display_name())
        .replace("{{LINK_GRADE}}", input.link_grade.display_name())
        .replace("{{LINK_LEGS}}", &input.link_legs.to_string())
        .replace("{{LINK_SIZE}}", &format!("{:.0}", input.link_size.diameter_mm()))
        .replace("{{V_STRESS}}", &format!("{:.2}", result.shear_stress_mpa))
        .replace("{{V_MAX}}", &format!("{:.2}", result.max_shear_stress_mpa))
        .replace("{{VC}}", &format!("{:.2}", result.concrete_shear_stress_mpa))
        .replace("{{VR}}", &format!("{:.2}", result.minimum_link_stress_mpa))
        .replace("{{CLASS}}", result.link_class.display_name())
        .replace("{{ASV_SV}}", &format!("{:.3}", result.link_area_per_spacing.value()))
        .replace("{{ASV}}", &format!("{:.0}", result.link_area_mm2))
        .replace("{{SPACING}}", &spacing)
        .replace("{{MAX_SPACING}}", &format!("{:.0}", result.max_link_spacing_mm))
        .replace("{{LINKS}}", &escape_typst(&result.links))
        .replace("{{V_CAP}}", &format!("{:.1}", result.shear_capacity_kn));

    let summary = format!("{}: {}", result.link_class.display_name(), result.links);
    assemble(
        "Beam Shear Design",
        &input.label,
        "cl. 6.1.2.5",
        engineer,
        job_id,
        &body,
        result.passes(),
        &summary,
        &result.notes,
    )
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    title: &str,
    label: &str,
    clause: &str,
    engineer: &str,
    job_id: &str,
    body: &str,
    passes: bool,
    summary: &str,
    notes: &[String],
) -> String {
    let date = Utc::now().format("%Y-%m-%d").to_string();
    let header = HEADER_TEMPLATE
        .replace("{{TITLE}}", title)
        .replace("{{LABEL}}", &escape_typst(label))
        .replace("{{CLAUSE}}", clause)
        .replace("{{ENGINEER}}", &escape_typst(engineer))
        .replace("{{JOB_ID}}", &escape_typst(job_id))
        .replace("{{DATE}}", &date);

    let notes = if notes.is_empty() {
        String::new()
    } else {
        let items: Vec<String> = notes.iter().map(|n| format!("- {}", escape_typst(n))).collect();
        format!("*Notes*\n\n{}\n", items.join("\n"))
    };

    let footer = FOOTER_TEMPLATE
        .replace("{{OVERALL_PASS}}", if passes { "PASS" } else { "FAIL" })
        .replace("{{SUMMARY}}", &escape_typst(summary))
        .replace("{{NOTES}}", &notes);

    format!("{header}{body}{footer}")
}

/// Compile Typst source to PDF bytes
fn compile_pdf(source: String) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);
    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::report_failed(format!("Typst compilation failed: {}", error_msgs.join("; ")))
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::report_failed(format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })?;

    debug!(bytes = pdf_bytes.len(), "rendered report");
    Ok(pdf_bytes)
}

/// Escape characters with markup meaning in Typst content
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '~' => format!("\\{c}"),
            _ => c.to_string(),
        })
        .collect()
}
