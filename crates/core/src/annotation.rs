//! Rating annotations for a single order.
//!
//! [`Annotator`] decides whether an order gets a rating at all and, if it does, builds the three
//! PAMA extensions. An order either gets all three extensions or none.

use crate::coding::find_codes;
use crate::constants::{
    CONSULT_ID_EXTENSION_URL, CPT_SYSTEM, PAMA_RATING_CODE_SYSTEM, PAMA_RATING_EXTENSION_URL,
    QCDSM_CONSULTED_EXTENSION_URL, SNOMED_SYSTEM,
};
use crate::guidelines::{GuidelineTable, IndicationSet, Rating};
use fhir::{ClinicalResource, CodeableConcept, Coding, Extension, ExtensionValue};
use pama_uuid::ConsultId;

/// Rates orders against a guideline table and builds their annotations.
#[derive(Clone, Copy, Debug)]
pub struct Annotator<'a> {
    guidelines: &'a GuidelineTable,
    consult_method: &'a str,
}

impl<'a> Annotator<'a> {
    pub fn new(guidelines: &'a GuidelineTable, consult_method: &'a str) -> Self {
        Self {
            guidelines,
            consult_method,
        }
    }

    /// Rating for `resource`, or `None` when no rating should be reported.
    ///
    /// No rating is reported when:
    /// - the order has no CPT code, or its first CPT code has no guideline;
    /// - the guidelines do not apply and the primary (first SNOMED CT) indication is not,
    ///   on its own, an appropriate indication for any procedure.
    pub fn rating_for(&self, resource: &ClinicalResource) -> Option<Rating> {
        let procedures = find_codes(resource.code.iter(), CPT_SYSTEM);
        let procedure = procedures.first()?;

        let Some(guideline) = self.guidelines.get(procedure) else {
            tracing::debug!(procedure = %procedure, "no guideline for procedure");
            return None;
        };

        let indications = find_codes(resource.reason_codes(), SNOMED_SYSTEM);
        let indication_set: IndicationSet = indications.iter().cloned().collect();
        let rating = guideline.rate(&indication_set);

        if rating == Rating::NoGuidelinesApply {
            let primary = indications.first();
            if !primary.is_some_and(|code| self.guidelines.has_guidelines_for(code)) {
                tracing::debug!(
                    procedure = %procedure,
                    primary = ?primary,
                    "primary indication has no guidelines; rating suppressed"
                );
                return None;
            }
        }

        tracing::debug!(procedure = %procedure, rating = %rating, "rated order");
        Some(rating)
    }

    /// The extensions to append to `resource`; empty when it gets no rating.
    pub fn extensions_for(&self, resource: &ClinicalResource) -> Vec<Extension> {
        build_extensions(self.rating_for(resource), self.consult_method)
    }
}

/// The rating, consult-method and consult-id extensions for `rating`.
///
/// Each call draws a new consult id. `None` yields no extensions.
pub fn build_extensions(rating: Option<Rating>, consult_method: &str) -> Vec<Extension> {
    let Some(rating) = rating else {
        return Vec::new();
    };

    vec![
        Extension::new(
            PAMA_RATING_EXTENSION_URL,
            ExtensionValue::CodeableConcept(CodeableConcept::from_coding(Coding::new(
                PAMA_RATING_CODE_SYSTEM,
                rating.code(),
            ))),
        ),
        Extension::new(
            QCDSM_CONSULTED_EXTENSION_URL,
            ExtensionValue::String(consult_method.to_owned()),
        ),
        Extension::new(
            CONSULT_ID_EXTENSION_URL,
            ExtensionValue::Uri(ConsultId::new().to_urn()),
        ),
    ]
}

/// The rating recorded in `extensions`, if one is present.
pub fn rating_in(extensions: &[Extension]) -> Option<Rating> {
    extensions
        .iter()
        .filter(|e| e.url == PAMA_RATING_EXTENSION_URL)
        .filter_map(|e| e.value_codeable_concept.as_ref())
        .flat_map(|concept| concept.coding.iter())
        .filter(|coding| coding.is_from(PAMA_RATING_CODE_SYSTEM))
        .find_map(|coding| coding.code.as_deref()?.parse().ok())
}
