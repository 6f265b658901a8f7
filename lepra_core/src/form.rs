//! # Form Schema and Values
//!
//! The screening form is an ordered list of sections, each holding a fixed
//! list of fields. Values are kept apart from the schema in [`FormValues`],
//! a flat map from field name to the raw string the user entered.
//!
//! ## Structure
//!
//! ```text
//! FormSchema
//! └── sections: Vec<SectionSpec>
//!     ├── title
//!     └── fields: Vec<FieldSpec> (name, label, kind)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lepra_core::form::{FormSchema, FormValues};
//!
//! let schema = FormSchema::leprosy_screening();
//! let mut values = FormValues::new();
//! values.set("name", "Asha");
//!
//! let payload = values.payload(&schema);
//! assert_eq!(payload["name"], "Asha");
//! assert_eq!(payload["Age"], "");
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::errors::{ScreenError, ScreenResult};

/// Flat string-keyed request body sent to the prediction endpoint
pub type FormPayload = BTreeMap<String, String>;

/// Options offered by every yes/no dropdown (after the empty default)
pub const YES_NO: [&str; 2] = ["Yes", "No"];

/// Kind of control backing a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text input
    Text,
    /// Numeric input (kept as the string the user typed)
    Number,
    /// Dropdown with an implicit empty default option
    Select { options: Vec<String> },
    /// Date input; never required
    Date,
}

impl FieldKind {
    /// A yes/no dropdown
    pub fn yes_no() -> Self {
        FieldKind::Select {
            options: YES_NO.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// One named control on the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Wire key sent to `/predict`
    pub name: String,
    /// Human-readable label (also used for report observations)
    pub label: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.into(),
            label: label.into(),
            kind,
        }
    }

    /// A yes/no dropdown with a separate label
    pub fn yes_no(name: impl Into<String>, label: impl Into<String>) -> Self {
        FieldSpec::new(name, label, FieldKind::yes_no())
    }

    /// A yes/no dropdown whose wire name is already the question text
    pub fn yes_no_question(question: &str) -> Self {
        FieldSpec::new(question, question.trim(), FieldKind::yes_no())
    }
}

/// One step of the multi-step form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

impl SectionSpec {
    pub fn new(title: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        SectionSpec {
            title: title.into(),
            fields,
        }
    }
}

/// Ordered, non-empty list of form sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    pub sections: Vec<SectionSpec>,
}

impl FormSchema {
    /// Build a schema, rejecting an empty section list
    pub fn new(sections: Vec<SectionSpec>) -> ScreenResult<Self> {
        if sections.is_empty() {
            return Err(ScreenError::invalid_input(
                "sections",
                "[]",
                "A form needs at least one section",
            ));
        }
        Ok(FormSchema { sections })
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, index: usize) -> Option<&SectionSpec> {
        self.sections.get(index)
    }

    /// All fields across every section, in form order
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    /// Look up a field by wire name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.name == name)
    }

    /// The standard leprosy screening questionnaire.
    ///
    /// Wire names follow the feature order the prediction backend expects.
    pub fn leprosy_screening() -> Self {
        let patient = SectionSpec::new(
            "Patient Details",
            vec![
                FieldSpec::new("name", "Patient name", FieldKind::Text),
                FieldSpec::new(
                    "Gender",
                    "Sex",
                    FieldKind::Select {
                        options: vec!["Male".into(), "Female".into(), "Other".into()],
                    },
                ),
                FieldSpec::new("Age", "Age (years)", FieldKind::Number),
                FieldSpec::new("Weight", "Weight (kg)", FieldKind::Number),
                FieldSpec::new("exam_date", "Date of examination", FieldKind::Date),
            ],
        );

        let face = SectionSpec::new(
            "Face and Eyes",
            vec![
                FieldSpec::yes_no("loss_eyebrow", "Loss of eyebrows"),
                FieldSpec::yes_no("nasal", "Nasal deformity or depressed nasal bridge"),
                FieldSpec::yes_no("ear_lobes", "Thickened or nodular ear lobes"),
                FieldSpec::yes_no("blink_lt6", "Reduced blinking for less than 6 months"),
                FieldSpec::yes_no("blink_gt6", "Reduced blinking for more than 6 months"),
                FieldSpec::yes_no("eye_close_lt6", "Unable to close eyes for less than 6 months"),
                FieldSpec::yes_no("eye_close_gt6", "Unable to close eyes for more than 6 months"),
            ],
        );

        let skin = SectionSpec::new(
            "Skin Findings",
            [
                "Any changes in the skin color( Hypo pigmentation) with partial or complete loss of sensation",
                "Any changes in the skin color(Erythematous) with partial or complete loss of sensation",
                "Any changes in the skin color( Hypo pigmentation) with  sensation",
                "Any changes in the skin color(Erythematous) with  sensation",
                "Thickend skin on the patches",
                "Shiny or oily skin",
                "Nodules on skin",
                "Painful Skin Lesions",
                "Painful Nodules",
                "Itching Skin lesion/Nodules",
            ]
            .iter()
            .map(|q| FieldSpec::yes_no_question(q))
            .collect(),
        );

        let hands = SectionSpec::new(
            "Hands",
            vec![
                FieldSpec::yes_no("palm_sensation", "Loss of sensation in palm"),
                FieldSpec::yes_no("weak_grip", "Weak grip"),
                FieldSpec::yes_no("temp_sense_hand", "Loss of temperature sensation in hand"),
                FieldSpec::yes_no("ulnar_lt6", "Ulnar nerve weakness for less than 6 months"),
                FieldSpec::yes_no("ulnar_gt6", "Ulnar nerve weakness for more than 6 months"),
                FieldSpec::yes_no("median_lt6", "Median nerve weakness for less than 6 months"),
                FieldSpec::yes_no("median_gt6", "Median nerve weakness for more than 6 months"),
                FieldSpec::yes_no("radial_sensory", "Loss of sensation over radial cutaneous nerve"),
                FieldSpec::yes_no("wrist_up_lt6", "Unable to raise wrist for less than 6 months"),
                FieldSpec::yes_no("wrist_up_gt6", "Unable to raise wrist for more than 6 months"),
                FieldSpec::yes_no("burns_palm", "Painless burns or wounds on palm"),
            ],
        );

        let mut feet_fields = vec![FieldSpec::yes_no(
            "lateral_popliteal",
            "Thickened or tender lateral popliteal nerve",
        )];
        feet_fields.extend(
            [
                "Unable to do foot up (foot drop) /Weakness/Dragging the foot while walking less than 6 months",
                "Unable to do foot up(foot drop) /Weakness/Dragging the foot while walking for more than 6 months",
                "Loss of sensation in sole of foot/feet",
                "Ulceration in foot /feet; painless wounds or burns on foot/feet",
                "Clawing (toes )",
            ]
            .iter()
            .map(|q| FieldSpec::yes_no_question(q)),
        );
        let feet = SectionSpec::new("Feet", feet_fields);

        let history = SectionSpec::new(
            "History and Progression",
            [
                "Number of skin lessions/Nodules less than 5",
                "Number of skin lesions /Nodules greater than 5",
                "Not treated MDT",
                "Irregular Treatment MDT",
                "Completed Treatment MDT",
                "Existing skin lesion /Nodules increasing in size, sudden onset",
                "Existing skin lesion /Nodules increasing in size, slow onset",
                "Appearing New Skin lesions/ Nodules suddenly",
                "Existing skin lesion /Nodules  not increasing size /anaesthesia remains same",
            ]
            .iter()
            .map(|q| FieldSpec::yes_no_question(q))
            .collect(),
        );

        FormSchema {
            sections: vec![patient, face, skin, hands, feet, history],
        }
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        FormSchema::leprosy_screening()
    }
}

/// Field values entered so far, keyed by wire name.
///
/// Unset fields read as the empty string, matching a blank control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues {
    values: HashMap<String, String>,
}

impl FormValues {
    pub fn new() -> Self {
        FormValues::default()
    }

    /// Current value of a field ("" when unset)
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Number of fields with a stored value
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build values from a JSON object. Numbers and booleans are stringified,
    /// nulls become empty strings; nested values are rejected.
    pub fn from_json(value: &serde_json::Value) -> ScreenResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            ScreenError::invalid_input("values", value.to_string(), "Expected a JSON object")
        })?;

        let mut values = FormValues::new();
        for (key, raw) in object {
            let text = match raw {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => String::new(),
                other => {
                    return Err(ScreenError::invalid_input(
                        key.clone(),
                        other.to_string(),
                        "Field values must be scalars",
                    ))
                }
            };
            values.set(key.clone(), text);
        }
        Ok(values)
    }

    /// Every named field of the schema with its current value.
    ///
    /// Covers the whole form, not only the active section.
    pub fn payload(&self, schema: &FormSchema) -> FormPayload {
        schema
            .fields()
            .map(|f| (f.name.clone(), self.get(&f.name).to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screening_schema_shape() {
        let schema = FormSchema::leprosy_screening();
        assert_eq!(schema.len(), 6);
        assert_eq!(schema.sections[0].title, "Patient Details");

        // 44 backend features minus Age (in patient details) plus 5 patient fields
        assert_eq!(schema.fields().count(), 48);
    }

    #[test]
    fn test_field_names_are_unique() {
        let schema = FormSchema::leprosy_screening();
        let mut names: Vec<&str> = schema.fields().map(|f| f.name.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_empty_schema_rejected() {
        assert!(FormSchema::new(vec![]).is_err());
    }

    #[test]
    fn test_question_label_is_trimmed() {
        let field = FieldSpec::yes_no_question("Clawing (toes )");
        assert_eq!(field.label, "Clawing (toes )");
        assert_eq!(field.kind, FieldKind::yes_no());
    }

    #[test]
    fn test_payload_covers_whole_form() {
        let schema = FormSchema::leprosy_screening();
        let mut values = FormValues::new();
        values.set("weak_grip", "Yes");
        values.set("not_a_field", "ignored");

        let payload = values.payload(&schema);
        assert_eq!(payload.len(), schema.fields().count());
        assert_eq!(payload["weak_grip"], "Yes");
        assert_eq!(payload["Clawing (toes )"], "");
        assert!(!payload.contains_key("not_a_field"));
    }

    #[test]
    fn test_values_from_json() {
        let json = serde_json::json!({ "name": "Ravi", "Age": 42, "Weight": 61.5, "exam_date": null });
        let values = FormValues::from_json(&json).unwrap();
        assert_eq!(values.get("name"), "Ravi");
        assert_eq!(values.get("Age"), "42");
        assert_eq!(values.get("Weight"), "61.5");
        assert_eq!(values.get("exam_date"), "");

        let nested = serde_json::json!({ "name": ["a"] });
        assert!(FormValues::from_json(&nested).is_err());
        assert!(FormValues::from_json(&serde_json::json!([1, 2])).is_err());
    }
}
