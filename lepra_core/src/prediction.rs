//! # Prediction Result
//!
//! The fixed-shape record returned by the `/predict` endpoint, plus the WHO
//! disability grade enumeration used for the per-site grades.
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "Output_Classification": "Multibacillary",
//!   "Output_Treatment": "MB-MDT 12 months",
//!   "Output_ReactionType": "Type 1 reaction",
//!   "Output_ReactionTreatment": "Prednisolone",
//!   "Eye_Disability_Grade": "Grade-I",
//!   "Hand_Disability_Grade": "Grade-II",
//!   "Foot_Disability_Grade": "Grade-0",
//!   "Max_Disability_Grade": "II"
//! }
//! ```
//!
//! The grade fields and `Max_Disability_Grade` are optional. The maximum
//! grade is always computed here from the three site grades; a server value
//! that disagrees is logged and ignored.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// WHO disability grade, ordered `Grade0 < GradeI < GradeII`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum DisabilityGrade {
    /// No disability
    #[default]
    Grade0,
    /// Loss of sensation, no visible damage
    GradeI,
    /// Visible damage or deformity
    GradeII,
}

impl DisabilityGrade {
    /// All grades in ascending order
    pub const ALL: [DisabilityGrade; 3] = [
        DisabilityGrade::Grade0,
        DisabilityGrade::GradeI,
        DisabilityGrade::GradeII,
    ];

    /// Parse a wire value. Total: anything unrecognized is `Grade0`.
    ///
    /// # Example
    /// ```
    /// use lepra_core::prediction::DisabilityGrade;
    ///
    /// assert_eq!(DisabilityGrade::from_wire("Grade-II"), DisabilityGrade::GradeII);
    /// assert_eq!(DisabilityGrade::from_wire("grade two"), DisabilityGrade::Grade0);
    /// ```
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            "Grade-I" => DisabilityGrade::GradeI,
            "Grade-II" => DisabilityGrade::GradeII,
            _ => DisabilityGrade::Grade0,
        }
    }

    /// Wire name ("Grade-0", "Grade-I", "Grade-II")
    pub fn wire_name(&self) -> &'static str {
        match self {
            DisabilityGrade::Grade0 => "Grade-0",
            DisabilityGrade::GradeI => "Grade-I",
            DisabilityGrade::GradeII => "Grade-II",
        }
    }

    /// Position in the enumeration (0, 1, 2)
    pub fn ordinal(&self) -> u8 {
        match self {
            DisabilityGrade::Grade0 => 0,
            DisabilityGrade::GradeI => 1,
            DisabilityGrade::GradeII => 2,
        }
    }

    /// Display label ("0", "I", "II")
    pub fn label(&self) -> &'static str {
        match self {
            DisabilityGrade::Grade0 => "0",
            DisabilityGrade::GradeI => "I",
            DisabilityGrade::GradeII => "II",
        }
    }

    /// Highest grade in the slice (`Grade0` when empty)
    pub fn max_of(grades: &[DisabilityGrade]) -> DisabilityGrade {
        grades.iter().copied().max().unwrap_or_default()
    }
}

impl fmt::Display for DisabilityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Accepts any JSON value: strings go through [`DisabilityGrade::from_wire`],
/// everything else (null, numbers, objects) is `Grade0`.
impl<'de> Deserialize<'de> for DisabilityGrade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(DisabilityGrade::from_wire)
            .unwrap_or_default())
    }
}

/// Keep a string value; drop anything else
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

impl From<DisabilityGrade> for String {
    fn from(grade: DisabilityGrade) -> Self {
        grade.wire_name().to_string()
    }
}

/// Body anatomical site carrying its own disability grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    Eye,
    Hand,
    Foot,
}

impl Site {
    pub const ALL: [Site; 3] = [Site::Eye, Site::Hand, Site::Foot];

    pub fn display_name(&self) -> &'static str {
        match self {
            Site::Eye => "Eye",
            Site::Hand => "Hand",
            Site::Foot => "Foot",
        }
    }
}

/// Response body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "Output_Classification")]
    pub classification: String,

    #[serde(rename = "Output_Treatment")]
    pub treatment: String,

    #[serde(rename = "Output_ReactionType")]
    pub reaction_type: String,

    #[serde(rename = "Output_ReactionTreatment")]
    pub reaction_treatment: String,

    #[serde(rename = "Eye_Disability_Grade", default)]
    pub eye_grade: DisabilityGrade,

    #[serde(rename = "Hand_Disability_Grade", default)]
    pub hand_grade: DisabilityGrade,

    #[serde(rename = "Foot_Disability_Grade", default)]
    pub foot_grade: DisabilityGrade,

    /// Server-computed maximum, kept only for cross-checking
    #[serde(
        rename = "Max_Disability_Grade",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub server_max_grade: Option<String>,
}

impl PredictionResult {
    /// Grade recorded for one site
    pub fn grade(&self, site: Site) -> DisabilityGrade {
        match site {
            Site::Eye => self.eye_grade,
            Site::Hand => self.hand_grade,
            Site::Foot => self.foot_grade,
        }
    }

    /// Maximum of the three site grades, computed client-side
    pub fn max_disability_grade(&self) -> DisabilityGrade {
        DisabilityGrade::max_of(&[self.eye_grade, self.hand_grade, self.foot_grade])
    }

    /// Whether the server sent a maximum grade that disagrees with ours.
    ///
    /// The server may send either the label ("II") or the wire name ("Grade-II").
    pub fn server_max_disagrees(&self) -> bool {
        let Some(server) = self.server_max_grade.as_deref() else {
            return false;
        };
        let ours = self.max_disability_grade();
        let server = server.trim();
        server != ours.label() && server != ours.wire_name()
    }
}
