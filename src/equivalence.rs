//! Cross-backend output comparison.
//!
//! The timed run discards every result, so this check runs each workload item
//! once per backend beforehand and compares the outputs.

use tracing::{debug, warn};

use crate::backend::{Backend, BackendError};
use crate::capability::ConversionCapability;
use crate::workload::Workload;

/// One item on which a backend disagreed with the reference backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub capability: ConversionCapability,
    pub input: String,
    pub reference_label: String,
    pub reference_output: String,
    pub label: String,
    pub output: String,
}

/// Canonical form used for comparison.
///
/// Romanized output is case-folded; kana output must match exactly.
pub fn normalize(capability: ConversionCapability, output: &str) -> String {
    let trimmed = output.trim();
    if capability.produces_latin() {
        trimmed.to_ascii_lowercase()
    } else {
        trimmed.to_string()
    }
}

/// Compare every backend against the first one, item by item.
pub fn check_equivalence(
    backends: &mut [Box<dyn Backend>],
    workload: &Workload,
) -> Result<Vec<Mismatch>, BackendError> {
    let mut mismatches = Vec::new();
    let Some((reference, others)) = backends.split_first_mut() else {
        return Ok(mismatches);
    };

    for item in workload.get() {
        let expected = reference.invoke(item.capability, &item.input)?;
        let expected_norm = normalize(item.capability, &expected);
        for backend in others.iter_mut() {
            let output = backend.invoke(item.capability, &item.input)?;
            if normalize(item.capability, &output) == expected_norm {
                continue;
            }
            warn!(
                reference = reference.label(),
                backend = backend.label(),
                capability = %item.capability,
                input = %item.input,
                "outputs differ"
            );
            mismatches.push(Mismatch {
                capability: item.capability,
                input: item.input.clone(),
                reference_label: reference.label().to_string(),
                reference_output: expected.clone(),
                label: backend.label().to_string(),
                output,
            });
        }
    }

    debug!(
        backends = backends.len(),
        mismatches = mismatches.len(),
        "equivalence check done"
    );
    Ok(mismatches)
}
