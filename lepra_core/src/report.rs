//! # PDF Report Module
//!
//! Generates the one-page screening report using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected via string replacement before compilation
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Layout
//!
//! A single A4 page: four blocks in fixed vertical order (title and date,
//! patient information, observations, prediction output) followed by the
//! disclaimer pinned to the page foot. Long observation lists are set in two
//! balanced columns with smaller type until the document fits one page.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::Local;
//! use lepra_core::form::{FormSchema, FormValues};
//! use lepra_core::prediction::PredictionResult;
//! use lepra_core::report::{render_report_pdf, report_filename, ReportData};
//!
//! let schema = FormSchema::leprosy_screening();
//! let values = FormValues::new();
//! let result: PredictionResult = serde_json::from_str(r#"{
//!     "Output_Classification": "Paucibacillary",
//!     "Output_Treatment": "PB-MDT",
//!     "Output_ReactionType": "None",
//!     "Output_ReactionTreatment": "None"
//! }"#).unwrap();
//!
//! let report = ReportData::build(&schema, &values, &result, Local::now());
//! let pdf_bytes = render_report_pdf(&report).unwrap();
//! std::fs::write(report_filename(&report.patient.name), pdf_bytes).unwrap();
//! ```

use chrono::{DateTime, Local, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::layout::PagedDocument;
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{ScreenError, ScreenResult};
use crate::form::{FormSchema, FormValues};
use crate::observations::collect_observations;
use crate::prediction::PredictionResult;

/// Placeholder for any identity field left blank
pub const MISSING_FIELD: &str = "N/A";

/// Footnote printed at the bottom of every report
pub const DISCLAIMER: &str = "Note: \"The leprosy prediction tool provides an assessment based on the clinical data you input. It is crucial to use this report as an aid and to base the final treatment decisions on your own clinical judgment, considering the patient's physical examination, condition, and medical history. Additionally, always follow the national guidelines for leprosy treatment.\"";

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Bundled fonts, parsed once per process
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    let mut fonts = Vec::new();
    for font_bytes in typst_assets::fonts() {
        let buffer = Bytes::new(font_bytes.to_vec());
        for font in Font::iter(buffer) {
            fonts.push(font);
        }
    }
    fonts
});

/// A minimal Typst world for compiling documents without external files.
struct ReportWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl ReportWorld {
    fn new(source: String) -> Self {
        let fonts = FONTS.clone();
        let book = FontBook::from_fonts(&fonts);

        ReportWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for ReportWorld {
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
// Report Data
// ============================================================================

/// Patient identity as read from the live form at export time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientIdentity {
    pub name: String,
    pub sex: String,
    pub age: String,
    pub weight: String,
}

impl PatientIdentity {
    /// Read name, sex, age and weight; blanks become [`MISSING_FIELD`]
    pub fn from_values(values: &FormValues) -> Self {
        let read = |name: &str| {
            let value = values.get(name).trim();
            if value.is_empty() {
                MISSING_FIELD.to_string()
            } else {
                value.to_string()
            }
        };

        PatientIdentity {
            name: read("name"),
            sex: read("Gender"),
            age: read("Age"),
            weight: read("Weight"),
        }
    }
}

/// Everything the report template needs
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub generated_at: DateTime<Local>,
    pub patient: PatientIdentity,
    pub observations: Vec<String>,
    pub result: PredictionResult,
}

impl ReportData {
    /// Snapshot the live form and the latest result
    pub fn build(
        schema: &FormSchema,
        values: &FormValues,
        result: &PredictionResult,
        generated_at: DateTime<Local>,
    ) -> Self {
        ReportData {
            generated_at,
            patient: PatientIdentity::from_values(values),
            observations: collect_observations(schema, values, result),
            result: result.clone(),
        }
    }

    /// Download file name for this report
    pub fn filename(&self) -> String {
        report_filename(&self.patient.name)
    }
}

/// `Leprosy_Report_<name>.pdf`, with path separators replaced by `_`
///
/// # Example
/// ```
/// use lepra_core::report::report_filename;
///
/// assert_eq!(report_filename("Asha Devi"), "Leprosy_Report_Asha Devi.pdf");
/// assert_eq!(report_filename("N/A"), "Leprosy_Report_N_A.pdf");
/// ```
pub fn report_filename(patient_name: &str) -> String {
    let safe: String = patient_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            _ => c,
        })
        .collect();
    format!("Leprosy_Report_{}.pdf", safe)
}

// ============================================================================
// PDF Template
// ============================================================================

/// Typst template for the screening report
const REPORT_TEMPLATE: &str = r##"
#let accent = rgb(255, 94, 98)

#set page(
  paper: "a4",
  margin: (top: 12mm, bottom: 34mm, left: 20mm, right: 20mm),
  footer: [
    #set text(size: 9pt, weight: "bold", fill: rgb(50, 50, 50))
    #set par(justify: false)
    {{DISCLAIMER}}
  ],
  footer-descent: 40%,
)

#set text(font: "Libertinus Serif", size: 11pt)

// Title
#align(center)[#text(size: 20pt, fill: accent)[Leprosy Prediction Summary]]
#v(-8pt)
#line(length: 100%, stroke: 0.8pt + accent)
Date: {{DATE}}

#v(4pt)

// Patient information
#block(width: 100%, fill: rgb("#E3F2FD"), inset: 8pt)[
  #set text(size: 12pt)
  *Patient Information*
  #v(2pt)
  #grid(
    columns: (1fr, 1fr),
    row-gutter: 6pt,
    [Name: {{NAME}}], [Sex: {{SEX}}],
    [Age: {{AGE}}], [Weight: {{WEIGHT}}],
  )
]

// Observations
#block(width: 100%, fill: rgb("#E8F5E9"), inset: 8pt)[
  #set text(size: 12pt)
  *Observations*
  #v(2pt)
  #set text(size: {{OBS_SIZE}}pt)
  #set list(spacing: {{OBS_SPACING}}em)
{{OBSERVATIONS}}
]

// Prediction output
#block(width: 100%, fill: rgb("#FFF3E0"), inset: 8pt)[
  #set text(size: 12pt)
  *Prediction Output*
  #v(4pt)
  Leprosy Diagnosis: {{CLASSIFICATION}} \
  Leprosy Treatment: {{TREATMENT}} \
  Max (WHO) Disability Grade: {{MAX_GRADE}} \
  Lepra Reaction Identification: {{REACTION_TYPE}} \
  Lepra Reaction Treatment: {{REACTION_TREATMENT}}
]
"##;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Layout of the observations block. The report must stay on one page, so
/// long observation lists move to two columns and smaller type.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Density {
    columns: u8,
    text_pt: f32,
    spacing_em: f32,
}

/// Tried in order until the document fits on a single page
const DENSITIES: [Density; 4] = [
    Density { columns: 1, text_pt: 12.0, spacing_em: 0.65 },
    Density { columns: 2, text_pt: 10.0, spacing_em: 0.45 },
    Density { columns: 2, text_pt: 8.0, spacing_em: 0.3 },
    Density { columns: 2, text_pt: 7.0, spacing_em: 0.2 },
];

/// First density worth trying for this many observation lines
fn starting_density(lines: usize) -> usize {
    match lines {
        0..=14 => 0,
        15..=30 => 1,
        _ => 2,
    }
}

/// Build the Typst source for a report without compiling it
pub fn report_source(report: &ReportData) -> String {
    report_source_with(report, DENSITIES[starting_density(report.observations.len())])
}

fn report_source_with(report: &ReportData, density: Density) -> String {
    let date = report.generated_at.format("%d/%m/%Y %H:%M:%S").to_string();

    REPORT_TEMPLATE
        .replace("{{DISCLAIMER}}", &escape_typst(DISCLAIMER))
        .replace("{{DATE}}", &escape_typst(&date))
        .replace("{{NAME}}", &escape_typst(&report.patient.name))
        .replace("{{SEX}}", &escape_typst(&report.patient.sex))
        .replace("{{AGE}}", &escape_typst(&report.patient.age))
        .replace("{{WEIGHT}}", &escape_typst(&report.patient.weight))
        .replace("{{OBS_SIZE}}", &density.text_pt.to_string())
        .replace("{{OBS_SPACING}}", &density.spacing_em.to_string())
        .replace(
            "{{OBSERVATIONS}}",
            &build_observation_block(&report.observations, density.columns),
        )
        .replace("{{CLASSIFICATION}}", &escape_typst(&report.result.classification))
        .replace("{{TREATMENT}}", &escape_typst(&report.result.treatment))
        .replace("{{MAX_GRADE}}", report.result.max_disability_grade().label())
        .replace("{{REACTION_TYPE}}", &escape_typst(&report.result.reaction_type))
        .replace(
            "{{REACTION_TREATMENT}}",
            &escape_typst(&report.result.reaction_treatment),
        )
}

fn compile_source(source: String) -> ScreenResult<PagedDocument> {
    let world = ReportWorld::new(source);

    let warned = typst::compile::<PagedDocument>(&world);

    warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        ScreenError::report_failed(format!("Typst compilation failed: {}", error_msgs.join("; ")))
    })
}

/// Compile the report, compacting the observations until it fits one page
fn compile_report(report: &ReportData) -> ScreenResult<PagedDocument> {
    let start = starting_density(report.observations.len());
    let mut document = compile_source(report_source_with(report, DENSITIES[start]))?;

    for density in &DENSITIES[start + 1..] {
        if document.pages.len() <= 1 {
            break;
        }
        tracing::debug!(pages = document.pages.len(), ?density, "report overflows, compacting");
        document = compile_source(report_source_with(report, *density))?;
    }

    if document.pages.len() > 1 {
        tracing::warn!(pages = document.pages.len(), "report does not fit on one page");
    }
    Ok(document)
}

/// Render a screening report to a single-page PDF.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(ScreenError::ReportFailed)` - If compilation or rendering fails
pub fn render_report_pdf(report: &ReportData) -> ScreenResult<Vec<u8>> {
    let document = compile_report(report)?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        ScreenError::report_failed(format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })?;

    tracing::debug!(bytes = pdf_bytes.len(), "report rendered");
    Ok(pdf_bytes)
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '/' => "\\/".to_string(),
            '~' => "\\~".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            // A raw newline would let the next line start a heading or list
            '\n' => " \\ ".to_string(),
            '\r' => String::new(),
            _ => c.to_string(),
        })
        .collect()
}

/// One bullet list item per observation line
fn build_observation_items(observations: &[String]) -> String {
    observations
        .iter()
        .map(|obs| format!("  - {}", escape_typst(obs)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The observation list, split into balanced columns side by side
fn build_observation_block(observations: &[String], columns: u8) -> String {
    if columns <= 1 || observations.len() < 2 {
        return build_observation_items(observations);
    }

    let per_column = observations.len().div_ceil(columns as usize);
    let cells: Vec<String> = observations
        .chunks(per_column)
        .map(|chunk| format!("  [\n{}\n  ]", build_observation_items(chunk)))
        .collect();

    format!(
        "  #grid(\n    columns: {},\n    column-gutter: 6mm,\n{},\n  )",
        columns,
        cells.join(",\n")
    )
}
