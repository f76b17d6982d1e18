//! Constants used throughout the PAMA core crate.
//!
//! Terminology systems, the fixed extension URLs written onto rated orders, and the defaults
//! used when configuration does not override them.

/// Coding system of procedure codes (CPT).
pub const CPT_SYSTEM: &str = "http://www.ama-assn.org/go/cpt";

/// Coding system of indication codes (SNOMED CT).
pub const SNOMED_SYSTEM: &str = "http://snomed.info/sct";

/// Extension carrying the appropriateness rating.
pub const PAMA_RATING_EXTENSION_URL: &str = "http://fhir.org/argonaut/Extension/pama-rating";

/// Extension naming the qualified CDS mechanism that was consulted.
pub const QCDSM_CONSULTED_EXTENSION_URL: &str =
    "http://fhir.org/argonaut/Extension/pama-rating-qcdsm-consulted";

/// Extension carrying the unique consult identifier.
pub const CONSULT_ID_EXTENSION_URL: &str =
    "http://fhir.org/argonaut/Extension/pama-rating-consult-id";

/// Code system of the rating values.
pub const PAMA_RATING_CODE_SYSTEM: &str = "http://fhir.org/argonaut/CodeSystem/pama-rating";

/// Default consult-method marker (a G-code placeholder).
pub const DEFAULT_CONSULT_METHOD: &str = "example-gcode";

/// Default SMART app launched from cards.
pub const DEFAULT_APP_URL: &str = "https://cds-hooks.github.io/pama-demo-app/";

/// Default label of the SMART app link.
pub const DEFAULT_APP_LABEL: &str = "SMART PAMA Demo App";

/// Identifier of the service in CDS Hooks discovery and its route.
pub const SERVICE_ID: &str = "pama-imaging";

/// Hook the service answers.
pub const SERVICE_HOOK: &str = "order-select";

/// Built-in guideline table.
pub const BUILTIN_GUIDELINES_YAML: &str = include_str!("../rules/guidelines.yaml");

/// Built-in recommendation catalog.
pub const BUILTIN_RECOMMENDATIONS_YAML: &str = include_str!("../rules/recommendations.yaml");

/// CPT codes referenced by the built-in rules.
pub mod cpt {
    pub const CARDIAC_MRI: &str = "75561";
    pub const CT_HEAD_NO_CONTRAST: &str = "70450";
    pub const CTA_WITH_CONTRAST: &str = "71275";
    pub const LUMBAR_SPINE_CT: &str = "72133";
    pub const MRA_HEAD: &str = "70544";
}

/// SNOMED CT codes referenced by the built-in rules.
pub mod snomed {
    pub const CONGENITAL_HEART_DISEASE: &str = "13213009";
    pub const HEADACHE: &str = "25064002";
    pub const LOW_BACK_PAIN: &str = "279039007";
    pub const OPTIC_DISC_EDEMA: &str = "423341008";
    pub const TOOTHACHE: &str = "27355003";
}
