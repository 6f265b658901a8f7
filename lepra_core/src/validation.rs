//! Per-section field validation.
//!
//! Validation never stops at the first failure: every field in the section
//! receives a [`FieldMark`], so stale marks on fields that have since been
//! filled in are cleared on the same pass.

use serde::{Deserialize, Serialize};

use crate::form::{FieldKind, FieldSpec, FormValues, SectionSpec};

/// Visual state of a single field after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldMark {
    /// Field passed (any previous mark is cleared)
    Valid,
    /// Field is required and empty (shown with a red border)
    Invalid,
}

/// Outcome of validating one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionValidation {
    /// One mark per field, in section order
    pub marks: Vec<(String, FieldMark)>,
}

impl SectionValidation {
    /// Logical AND over all fields
    pub fn is_valid(&self) -> bool {
        self.marks.iter().all(|(_, mark)| *mark == FieldMark::Valid)
    }

    /// Names of the fields that failed
    pub fn invalid_fields(&self) -> Vec<String> {
        self.marks
            .iter()
            .filter(|(_, mark)| *mark == FieldMark::Invalid)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Check a single field against its current value
pub fn check_field(field: &FieldSpec, value: &str) -> FieldMark {
    let missing = match &field.kind {
        FieldKind::Text | FieldKind::Number => value.trim().is_empty(),
        // Only the empty default option counts as unset
        FieldKind::Select { .. } => value.is_empty(),
        FieldKind::Date => false,
    };

    if missing {
        FieldMark::Invalid
    } else {
        FieldMark::Valid
    }
}

/// Validate every field of a section
pub fn validate_section(section: &SectionSpec, values: &FormValues) -> SectionValidation {
    let marks = section
        .fields
        .iter()
        .map(|field| (field.name.clone(), check_field(field, values.get(&field.name))))
        .collect();

    SectionValidation { marks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> SectionSpec {
        SectionSpec::new(
            "Test",
            vec![
                FieldSpec::new("name", "Name", FieldKind::Text),
                FieldSpec::new("Age", "Age", FieldKind::Number),
                FieldSpec::yes_no("weak_grip", "Weak grip"),
                FieldSpec::new("exam_date", "Date", FieldKind::Date),
            ],
        )
    }

    #[test]
    fn test_whitespace_text_is_empty() {
        let field = FieldSpec::new("name", "Name", FieldKind::Text);
        assert_eq!(check_field(&field, "   "), FieldMark::Invalid);
        assert_eq!(check_field(&field, " Asha "), FieldMark::Valid);
    }

    #[test]
    fn test_select_default_option_fails() {
        let field = FieldSpec::yes_no("weak_grip", "Weak grip");
        assert_eq!(check_field(&field, ""), FieldMark::Invalid);
        assert_eq!(check_field(&field, "No"), FieldMark::Valid);
    }

    #[test]
    fn test_date_fields_are_ignored() {
        let field = FieldSpec::new("exam_date", "Date", FieldKind::Date);
        assert_eq!(check_field(&field, ""), FieldMark::Valid);
    }

    #[test]
    fn test_section_marks_every_field() {
        let mut values = FormValues::new();
        values.set("name", "Asha");
        values.set("Age", " ");

        let result = validate_section(&section(), &values);
        assert!(!result.is_valid());
        assert_eq!(result.marks.len(), 4);
        assert_eq!(result.invalid_fields(), vec!["Age".to_string(), "weak_grip".to_string()]);
    }

    #[test]
    fn test_complete_section_passes() {
        let mut values = FormValues::new();
        values.set("name", "Asha");
        values.set("Age", "34");
        values.set("weak_grip", "Yes");

        let result = validate_section(&section(), &values);
        assert!(result.is_valid());
        assert!(result.invalid_fields().is_empty());
    }
}
