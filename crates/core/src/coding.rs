//! Coded-value extraction.
//!
//! Pulls `code` strings out of lists of `CodeableConcept`. Codings without a `code` are skipped;
//! nothing here fails.

use fhir::CodeableConcept;

/// Codes of every coding from `system`, across `concepts`, in encounter order.
///
/// Duplicates are kept so callers can decide what uniqueness means for them.
pub fn find_codes<'a, I>(concepts: I, system: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a CodeableConcept>,
{
    concepts
        .into_iter()
        .flat_map(|concept| concept.coding.iter())
        .filter(|coding| coding.is_from(system))
        .filter_map(|coding| coding.code.clone())
        .collect()
}

/// Codes of every coding across `concepts`, whatever their system.
pub fn all_codes<'a, I>(concepts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CodeableConcept>,
{
    concepts
        .into_iter()
        .flat_map(|concept| concept.coding.iter())
        .filter_map(|coding| coding.code.clone())
        .collect()
}
