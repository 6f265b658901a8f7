//! On-screen summary of a prediction result.
//!
//! Front ends replace their result area with a [`RenderedResult`] wholesale;
//! nothing from a previous result survives a new render.

use serde::Serialize;

use crate::prediction::PredictionResult;

pub const RESULT_HEADING: &str = "Prediction Results";

/// One "label: value" line of the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultLine {
    pub label: &'static str,
    pub value: String,
}

/// Fixed template of the result container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedResult {
    pub heading: &'static str,
    pub lines: Vec<ResultLine>,
}

impl RenderedResult {
    pub fn from_result(result: &PredictionResult) -> Self {
        let lines = vec![
            ResultLine {
                label: "Leprosy Diagnosis",
                value: result.classification.clone(),
            },
            ResultLine {
                label: "Leprosy Treatment",
                value: result.treatment.clone(),
            },
            ResultLine {
                label: "Max (WHO) Disability Grade",
                value: result.max_disability_grade().label().to_string(),
            },
            ResultLine {
                label: "Lepra Reaction Identification",
                value: result.reaction_type.clone(),
            },
            ResultLine {
                label: "Lepra Reaction Treatment",
                value: result.reaction_treatment.clone(),
            },
        ];

        RenderedResult {
            heading: RESULT_HEADING,
            lines,
        }
    }

    /// Plain-text rendering for terminals and logs
    pub fn to_text(&self) -> String {
        let mut out = String::from(self.heading);
        out.push('\n');
        for line in &self.lines {
            out.push_str(&format!("{}: {}\n", line.label, line.value));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::DisabilityGrade;

    fn result() -> PredictionResult {
        PredictionResult {
            classification: "Multibacillary".to_string(),
            treatment: "MB-MDT".to_string(),
            reaction_type: "Type 2 (ENL)".to_string(),
            reaction_treatment: "Thalidomide".to_string(),
            eye_grade: DisabilityGrade::GradeI,
            hand_grade: DisabilityGrade::Grade0,
            foot_grade: DisabilityGrade::Grade0,
            server_max_grade: None,
        }
    }

    #[test]
    fn test_five_lines_in_template_order() {
        let rendered = RenderedResult::from_result(&result());
        let labels: Vec<&str> = rendered.lines.iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            vec![
                "Leprosy Diagnosis",
                "Leprosy Treatment",
                "Max (WHO) Disability Grade",
                "Lepra Reaction Identification",
                "Lepra Reaction Treatment",
            ]
        );
        assert_eq!(rendered.lines[2].value, "I");
    }

    #[test]
    fn test_text_rendering() {
        let text = RenderedResult::from_result(&result()).to_text();
        assert!(text.starts_with("Prediction Results\n"));
        assert!(text.contains("Leprosy Diagnosis: Multibacillary\n"));
        assert!(text.contains("Lepra Reaction Treatment: Thalidomide\n"));
    }
}
