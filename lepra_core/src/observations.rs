//! Observation list for the exported report.
//!
//! Rebuilt from the live form on every export; never cached.

use crate::form::{FormSchema, FormValues};
use crate::prediction::{PredictionResult, Site};

/// Line used when no field was answered "yes"
pub const NO_OBSERVATIONS: &str = "No positive observations reported.";

/// Collect the labels of every field answered "yes" (case-insensitive),
/// falling back to the field name when the label is blank.
///
/// When nothing matched, [`NO_OBSERVATIONS`] stands in. The three site
/// disability grades are always appended afterwards.
pub fn collect_observations(
    schema: &FormSchema,
    values: &FormValues,
    result: &PredictionResult,
) -> Vec<String> {
    let mut observations: Vec<String> = schema
        .fields()
        .filter(|field| values.get(&field.name).eq_ignore_ascii_case("yes"))
        .map(|field| {
            let label = field.label.trim();
            if label.is_empty() {
                field.name.trim().to_string()
            } else {
                label.to_string()
            }
        })
        .collect();

    if observations.is_empty() {
        observations.push(NO_OBSERVATIONS.to_string());
    }

    for site in Site::ALL {
        observations.push(format!(
            "{} Disability Grade: {}",
            site.display_name(),
            result.grade(site).wire_name()
        ));
    }

    observations
}
