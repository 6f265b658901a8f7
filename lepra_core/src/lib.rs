//! # lepra_core - Leprosy Screening Form Engine
//!
//! `lepra_core` holds everything behind the screening front ends: the
//! multi-step form, per-step validation, the client for the external
//! prediction service, the on-screen result summary and the PDF report.
//! It contains no UI code; `lepra_gui` and `lepra_cli` drive it.
//!
//! ## Design Philosophy
//!
//! - **One owner**: [`FormController`] holds all session state explicitly
//! - **Event-shaped API**: every user action returns an outcome describing
//!   what to show, so any event loop can drive it
//! - **Rich Errors**: structured error types, collapsed to one generic
//!   message only at the user boundary
//!
//! ## Quick Start
//!
//! ```rust
//! use lepra_core::controller::{FormController, NavOutcome, Notice};
//!
//! let mut controller = FormController::leprosy_screening();
//!
//! // Required fields are empty, so the first step does not advance
//! assert_eq!(controller.advance(), NavOutcome::Blocked(Notice::IncompleteStep));
//! assert!(controller.is_marked("name"));
//! assert_eq!(controller.current_index(), 0);
//! ```
//!
//! ## Modules
//!
//! - [`form`] - Form schema, sections, fields and values
//! - [`validation`] - Per-section required-field checks
//! - [`navigator`] - Bounded current-section index and progress
//! - [`controller`] - Session owner tying everything together
//! - [`prediction`] - Prediction result and disability grades
//! - [`client`] - HTTP client for `POST /predict`
//! - [`render`] - On-screen result summary
//! - [`observations`] - Observation list for the report
//! - [`report`] - Typst-based PDF report
//! - [`config`] - Persisted application settings
//! - [`file_io`] - Atomic writes and JSON value files
//! - [`errors`] - Structured error types

pub mod client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod file_io;
pub mod form;
pub mod navigator;
pub mod observations;
pub mod prediction;
pub mod render;
pub mod report;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use client::PredictionClient;
pub use config::AppConfig;
pub use controller::{FormController, NavOutcome, Notice, SubmissionOutcome};
pub use errors::{ScreenError, ScreenResult};
pub use form::{FormSchema, FormValues};
pub use prediction::{DisabilityGrade, PredictionResult};
pub use render::RenderedResult;
pub use report::{render_report_pdf, report_filename, ReportData};
