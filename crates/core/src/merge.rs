//! Overlaying a recommended resource onto a selected order.

use crate::annotation::Annotator;
use fhir::ClinicalResource;

/// Field-by-field shallow override: every field present on `recommended` replaces the one on
/// `source`; absent fields keep `source`'s value. Pass-through fields follow the same rule
/// key by key.
pub fn overlay(source: &ClinicalResource, recommended: &ClinicalResource) -> ClinicalResource {
    let mut other = source.other.clone();
    other.extend(
        recommended
            .other
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );

    ClinicalResource {
        resource_type: recommended
            .resource_type
            .clone()
            .or_else(|| source.resource_type.clone()),
        id: recommended.id.clone().or_else(|| source.id.clone()),
        code: recommended.code.clone().or_else(|| source.code.clone()),
        reason_code: recommended
            .reason_code
            .clone()
            .or_else(|| source.reason_code.clone()),
        extension: recommended
            .extension
            .clone()
            .or_else(|| source.extension.clone()),
        other,
    }
}

/// Overlay `recommended` onto `source`, then append rating extensions computed for the merged
/// order, so the result is rated as the order it would become.
pub fn merge_resources(
    annotator: &Annotator<'_>,
    source: &ClinicalResource,
    recommended: &ClinicalResource,
) -> ClinicalResource {
    let merged = overlay(source, recommended);
    let ratings = annotator.extensions_for(&merged);
    merged.with_appended_extensions(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::rating_in;
    use crate::annotation::tests::order;
    use crate::constants::{cpt, snomed, DEFAULT_CONSULT_METHOD};
    use crate::guidelines::{GuidelineTable, Rating};
    use fhir::{CodeableConcept, Coding, Extension};
    use serde_json::json;

    fn recommended_mri() -> ClinicalResource {
        ClinicalResource {
            code: Some(CodeableConcept::from_coding(
                Coding::new(crate::constants::CPT_SYSTEM, cpt::CARDIAC_MRI)
                    .with_display("Cardiac MRI"),
            )),
            ..ClinicalResource::default()
        }
    }

    #[test]
    fn recommended_fields_override_source() {
        let mut source = order(cpt::CTA_WITH_CONTRAST, &[snomed::CONGENITAL_HEART_DISEASE]);
        source.other.insert("status".into(), json!("draft"));

        let merged = overlay(&source, &recommended_mri());
        assert_eq!(merged.code, recommended_mri().code);
        assert_eq!(merged.reason_code, source.reason_code);
        assert_eq!(merged.id, source.id);
        assert_eq!(merged.other.get("status"), Some(&json!("draft")));
    }

    #[test]
    fn pass_through_fields_override_key_by_key() {
        let mut source = ClinicalResource::default();
        source.other.insert("status".into(), json!("draft"));
        source.other.insert("intent".into(), json!("plan"));
        let mut recommended = ClinicalResource::default();
        recommended.other.insert("intent".into(), json!("order"));

        let merged = overlay(&source, &recommended);
        assert_eq!(merged.other.get("status"), Some(&json!("draft")));
        assert_eq!(merged.other.get("intent"), Some(&json!("order")));
    }

    #[test]
    fn merged_resource_is_rated_as_substituted_order() {
        let table = GuidelineTable::builtin().expect("builtin table");
        let annotator = Annotator::new(&table, DEFAULT_CONSULT_METHOD);
        let source = order(cpt::CTA_WITH_CONTRAST, &[snomed::CONGENITAL_HEART_DISEASE]);

        // The selected order is not appropriate; cardiac MRI for the same indication is.
        assert_eq!(annotator.rating_for(&source), Some(Rating::NotAppropriate));

        let merged = merge_resources(&annotator, &source, &recommended_mri());
        assert_eq!(merged.extensions().len(), 3);
        assert_eq!(rating_in(merged.extensions()), Some(Rating::Appropriate));
    }

    #[test]
    fn existing_extensions_precede_ratings() {
        let table = GuidelineTable::builtin().expect("builtin table");
        let annotator = Annotator::new(&table, DEFAULT_CONSULT_METHOD);
        let existing = Extension {
            url: "http://example.org/existing".into(),
            value_string: Some("keep".into()),
            ..Extension::default()
        };
        let source = ClinicalResource {
            extension: Some(vec![existing.clone()]),
            ..order(cpt::CTA_WITH_CONTRAST, &[snomed::CONGENITAL_HEART_DISEASE])
        };

        let merged = merge_resources(&annotator, &source, &recommended_mri());
        assert_eq!(merged.extensions().len(), 4);
        assert_eq!(merged.extensions()[0], existing);
    }

    #[test]
    fn unrated_merge_has_empty_extension_list() {
        let table = GuidelineTable::builtin().expect("builtin table");
        let annotator = Annotator::new(&table, DEFAULT_CONSULT_METHOD);
        let source = order("99999", &[snomed::HEADACHE]);

        let merged = merge_resources(&annotator, &source, &ClinicalResource::default());
        assert_eq!(merged.extension, Some(vec![]));
    }

    #[test]
    fn merge_is_idempotent_apart_from_extensions() {
        let table = GuidelineTable::builtin().expect("builtin table");
        let annotator = Annotator::new(&table, DEFAULT_CONSULT_METHOD);
        let source = order(cpt::CTA_WITH_CONTRAST, &[snomed::CONGENITAL_HEART_DISEASE]);
        let recommended = recommended_mri();

        let once = merge_resources(&annotator, &source, &recommended);
        let twice = merge_resources(&annotator, &once, &recommended);

        let without_extensions = |r: &ClinicalResource| ClinicalResource {
            extension: None,
            ..r.clone()
        };
        assert_eq!(without_extensions(&once), without_extensions(&twice));
        assert_eq!(overlay(&once, &recommended), once);
    }
}
