//! # Form Controller
//!
//! Single owner of the form session: schema, values, the current section,
//! validation marks and the latest prediction result. Front ends hold one
//! controller and forward user events to it; it answers with outcomes that
//! say what to show (a moved section, a blocking notice, a fresh result).
//!
//! ## Submission flow
//!
//! ```text
//! begin_submission()  -> validates the active section, builds the payload
//!        |
//!   PredictionClient::predict()  (async, one attempt)
//!        |
//! complete_submission() -> stores the result or reports the failure
//! ```
//!
//! The two halves are separate so an event loop can run the request as a
//! background task. Nothing guards against overlapping submissions; the last
//! completion applied wins.

use std::collections::HashSet;

use chrono::{DateTime, Local};

use crate::client::PredictionClient;
use crate::errors::{ScreenError, ScreenResult, PREDICTION_FAILED_MESSAGE};
use crate::form::{FormPayload, FormSchema, FormValues, SectionSpec};
use crate::navigator::SectionNavigator;
use crate::prediction::PredictionResult;
use crate::render::RenderedResult;
use crate::report::ReportData;
use crate::validation::{validate_section, FieldMark, SectionValidation};

/// Blocking notification shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Next was pressed on an incomplete section
    IncompleteStep,
    /// Submit was pressed on an incomplete section
    IncompleteSubmission,
    /// The prediction round-trip failed for any reason
    PredictionFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::IncompleteStep => "Please fill all fields before proceeding.",
            Notice::IncompleteSubmission => "Please fill all fields before submitting.",
            Notice::PredictionFailed => PREDICTION_FAILED_MESSAGE,
        }
    }
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The active section changed
    Moved,
    /// Already at the boundary; nothing changed
    Unchanged,
    /// Validation failed; the index is unchanged
    Blocked(Notice),
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// A new result was stored and rendered
    Rendered(RenderedResult),
    /// Validation failed before any request was made
    Blocked(Notice),
    /// The request failed; the previous result is untouched
    Failed { notice: Notice, error: ScreenError },
}

/// Explicit owner of all form state
#[derive(Debug, Clone)]
pub struct FormController {
    schema: FormSchema,
    values: FormValues,
    navigator: SectionNavigator,
    invalid: HashSet<String>,
    latest: Option<PredictionResult>,
    render_generation: u64,
}

impl FormController {
    pub fn new(schema: FormSchema) -> ScreenResult<Self> {
        let navigator = SectionNavigator::new(schema.len())?;
        Ok(FormController {
            schema,
            values: FormValues::new(),
            navigator,
            invalid: HashSet::new(),
            latest: None,
            render_generation: 0,
        })
    }

    /// Controller for the standard screening questionnaire
    pub fn leprosy_screening() -> Self {
        FormController::new(FormSchema::leprosy_screening())
            .expect("standard screening form has sections")
    }

    /// Replace all values at once (e.g. from a JSON file)
    pub fn with_values(mut self, values: FormValues) -> Self {
        self.values = values;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name)
    }

    pub fn current_index(&self) -> usize {
        self.navigator.current()
    }

    pub fn section_count(&self) -> usize {
        self.navigator.total()
    }

    pub fn current_section(&self) -> &SectionSpec {
        &self.schema.sections[self.navigator.current()]
    }

    pub fn is_first_section(&self) -> bool {
        self.navigator.is_first()
    }

    pub fn is_last_section(&self) -> bool {
        self.navigator.is_last()
    }

    pub fn progress_percent(&self) -> f32 {
        self.navigator.progress_percent()
    }

    /// Whether a field currently carries the invalid mark
    pub fn is_marked(&self, name: &str) -> bool {
        self.invalid.contains(name)
    }

    pub fn latest_result(&self) -> Option<&PredictionResult> {
        self.latest.as_ref()
    }

    /// Summary of the latest result, if any
    pub fn rendered_result(&self) -> Option<RenderedResult> {
        self.latest.as_ref().map(RenderedResult::from_result)
    }

    /// The export control is revealed once a result has been rendered
    pub fn export_available(&self) -> bool {
        self.latest.is_some()
    }

    /// Bumped on every successful render so views can replay their reveal
    pub fn render_generation(&self) -> u64 {
        self.render_generation
    }

    // ------------------------------------------------------------------
    // Editing and navigation
    // ------------------------------------------------------------------

    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.set(name, value);
    }

    /// Validate the active section and apply marks to every field in it
    pub fn validate_current(&mut self) -> SectionValidation {
        let validation = validate_section(self.current_section(), &self.values);
        for (name, mark) in &validation.marks {
            match mark {
                FieldMark::Invalid => {
                    self.invalid.insert(name.clone());
                }
                FieldMark::Valid => {
                    self.invalid.remove(name);
                }
            }
        }

        if !validation.is_valid() {
            tracing::debug!(
                section = %self.current_section().title,
                fields = ?validation.invalid_fields(),
                "section incomplete"
            );
        }
        validation
    }

    /// Validate, then move to the next section unless already last
    pub fn advance(&mut self) -> NavOutcome {
        if !self.validate_current().is_valid() {
            return NavOutcome::Blocked(Notice::IncompleteStep);
        }

        if self.navigator.step_forward() {
            NavOutcome::Moved
        } else {
            NavOutcome::Unchanged
        }
    }

    /// Move to the previous section unless already first
    pub fn retreat(&mut self) -> NavOutcome {
        if self.navigator.retreat() {
            NavOutcome::Moved
        } else {
            NavOutcome::Unchanged
        }
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Validate the active section only, then collect the whole form.
    ///
    /// Sections already passed are not re-checked.
    pub fn begin_submission(&mut self) -> Result<FormPayload, Notice> {
        if !self.validate_current().is_valid() {
            return Err(Notice::IncompleteSubmission);
        }

        let payload = self.values.payload(&self.schema);
        tracing::info!(fields = payload.len(), "submitting screening form");
        Ok(payload)
    }

    /// Apply the outcome of a prediction request
    pub fn complete_submission(
        &mut self,
        response: ScreenResult<PredictionResult>,
    ) -> SubmissionOutcome {
        match response {
            Ok(result) => {
                if result.server_max_disagrees() {
                    tracing::warn!(
                        server = ?result.server_max_grade,
                        computed = result.max_disability_grade().label(),
                        "server max disability grade differs; using computed grade"
                    );
                }

                let rendered = RenderedResult::from_result(&result);
                tracing::info!(
                    classification = %result.classification,
                    max_grade = result.max_disability_grade().label(),
                    "prediction received"
                );

                self.latest = Some(result);
                self.render_generation += 1;
                SubmissionOutcome::Rendered(rendered)
            }
            Err(error) => {
                tracing::error!(code = error.error_code(), %error, "prediction error");
                SubmissionOutcome::Failed {
                    notice: Notice::PredictionFailed,
                    error,
                }
            }
        }
    }

    /// Validate, send one request and apply its outcome
    pub async fn submit(&mut self, client: &PredictionClient) -> SubmissionOutcome {
        let payload = match self.begin_submission() {
            Ok(payload) => payload,
            Err(notice) => return SubmissionOutcome::Blocked(notice),
        };

        let response = client.predict(&payload).await;
        self.complete_submission(response)
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Report data from the live form and the latest result.
    ///
    /// Identity and observations are read now, not at submission time.
    pub fn build_report(&self, now: DateTime<Local>) -> Option<ReportData> {
        self.latest
            .as_ref()
            .map(|result| ReportData::build(&self.schema, &self.values, result, now))
    }
}

impl Default for FormController {
    fn default() -> Self {
        FormController::leprosy_screening()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::NO_OBSERVATIONS;
    use crate::prediction::DisabilityGrade;

    fn result(classification: &str) -> PredictionResult {
        PredictionResult {
            classification: classification.to_string(),
            treatment: "MB-MDT".to_string(),
            reaction_type: "Type 1".to_string(),
            reaction_treatment: "Prednisolone".to_string(),
            eye_grade: DisabilityGrade::GradeI,
            hand_grade: DisabilityGrade::GradeII,
            foot_grade: DisabilityGrade::Grade0,
            server_max_grade: None,
        }
    }

    /// Fill every required field of the active section
    fn fill_current(controller: &mut FormController) {
        let fields = controller.current_section().fields.clone();
        for field in fields {
            let value = match field.kind {
                crate::form::FieldKind::Text => "Asha",
                crate::form::FieldKind::Number => "40",
                crate::form::FieldKind::Select { ref options } => options[options.len() - 1].as_str(),
                crate::form::FieldKind::Date => "",
            }
            .to_string();
            controller.set_value(field.name.clone(), value);
        }
    }

    #[test]
    fn test_advance_blocked_on_every_incomplete_section() {
        let mut controller = FormController::leprosy_screening();
        let last = controller.section_count() - 1;

        for index in 0..last {
            assert_eq!(controller.current_index(), index);

            let outcome = controller.advance();
            assert_eq!(outcome, NavOutcome::Blocked(Notice::IncompleteStep));
            assert_eq!(controller.current_index(), index);

            let first_field = controller.current_section().fields[0].name.clone();
            assert!(controller.is_marked(&first_field));

            fill_current(&mut controller);
            assert_eq!(controller.advance(), NavOutcome::Moved);
            assert!(!controller.is_marked(&first_field));
        }
    }

    #[test]
    fn test_marks_cleared_for_passing_fields() {
        let mut controller = FormController::leprosy_screening();
        controller.advance();
        assert!(controller.is_marked("name"));
        assert!(controller.is_marked("Age"));

        controller.set_value("name", "Asha");
        controller.advance();
        assert!(!controller.is_marked("name"));
        assert!(controller.is_marked("Age"));
        assert!(!controller.is_marked("exam_date"));
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut controller = FormController::leprosy_screening();
        assert_eq!(controller.retreat(), NavOutcome::Unchanged);
        assert_eq!(controller.current_index(), 0);

        while !controller.is_last_section() {
            fill_current(&mut controller);
            controller.advance();
        }
        fill_current(&mut controller);
        let last = controller.current_index();
        assert_eq!(controller.advance(), NavOutcome::Unchanged);
        assert_eq!(controller.current_index(), last);
        assert_eq!(controller.progress_percent(), 100.0);

        assert_eq!(controller.retreat(), NavOutcome::Moved);
        let expected = last as f32 / controller.section_count() as f32 * 100.0;
        assert_eq!(controller.progress_percent(), expected);
    }

    #[test]
    fn test_submission_checks_active_section_only() {
        let mut controller = FormController::leprosy_screening();
        fill_current(&mut controller);
        controller.advance();

        // Clear a field of the already-passed first section
        controller.set_value("name", "");
        fill_current(&mut controller);

        let payload = controller.begin_submission().unwrap();
        assert_eq!(payload["name"], "");
        assert_eq!(payload.len(), controller.schema().fields().count());
    }

    #[test]
    fn test_incomplete_submission_blocked() {
        let mut controller = FormController::leprosy_screening();
        assert_eq!(controller.begin_submission(), Err(Notice::IncompleteSubmission));
    }

    #[test]
    fn test_failed_submission_keeps_previous_result() {
        let mut controller = FormController::leprosy_screening();
        controller.complete_submission(Ok(result("Multibacillary")));
        let before = controller.rendered_result();

        let outcome = controller.complete_submission(Err(ScreenError::BadStatus { status: 500 }));
        match outcome {
            SubmissionOutcome::Failed { notice, error } => {
                assert_eq!(notice, Notice::PredictionFailed);
                assert_eq!(error, ScreenError::BadStatus { status: 500 });
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(controller.rendered_result(), before);
        assert_eq!(controller.render_generation(), 1);
    }

    #[test]
    fn test_last_completion_wins() {
        let mut controller = FormController::leprosy_screening();
        assert!(!controller.export_available());

        controller.complete_submission(Ok(result("Paucibacillary")));
        controller.complete_submission(Ok(result("Multibacillary")));

        assert!(controller.export_available());
        assert_eq!(controller.render_generation(), 2);
        assert_eq!(
            controller.latest_result().map(|r| r.classification.as_str()),
            Some("Multibacillary")
        );
    }

    #[test]
    fn test_report_reads_live_values() {
        let mut controller = FormController::leprosy_screening();
        assert!(controller.build_report(Local::now()).is_none());

        controller.set_value("name", "Before");
        controller.complete_submission(Ok(result("Multibacillary")));
        controller.set_value("name", "After");

        let report = controller.build_report(Local::now()).unwrap();
        assert_eq!(report.patient.name, "After");
        assert_eq!(report.observations[0], NO_OBSERVATIONS);
        assert_eq!(report.observations.len(), 4);
    }
}
