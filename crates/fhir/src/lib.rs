//! FHIR and CDS Hooks wire models for the PAMA imaging service.
//!
//! This crate provides **wire models** and **parse helpers** for the JSON exchanged with an EHR:
//! - FHIR datatypes used by draft orders (`Coding`, `CodeableConcept`, `Extension`)
//! - the order resource itself ([`ClinicalResource`])
//! - CDS Hooks request, response and card shapes
//!
//! This crate focuses on:
//! - FHIR semantic alignment (field names, optionality, pass-through of unknown fields)
//! - serialisation/deserialisation
//! - reporting the JSON path of a schema mismatch
//!
//! It contains no rating logic; that lives in `pama-core`.

pub mod cds_hooks;
pub mod datatypes;
pub mod resource;

// Re-export wire types
pub use cds_hooks::{
    Action, ActionType, BundleEntry, Card, CdsRequest, CdsResponse, DraftOrders, Indicator, Link,
    LinkType, RequestContext, ResponseExtension, Source, Suggestion, SystemAction,
};
pub use datatypes::{CodeableConcept, Coding, Extension, ExtensionValue};
pub use resource::ClinicalResource;

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;

/// Deserialize `T` from JSON text, naming the failing field path on mismatch.
pub(crate) fn parse_json<T>(json_text: &str, what: &str) -> FhirResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_str(json_text);

    match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(parsed) => {
            deserializer.end()?;
            Ok(parsed)
        }
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            // Syntax errors carry no useful path.
            if source.is_syntax() || source.is_eof() {
                return Err(FhirError::InvalidJson(source));
            }
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            Err(FhirError::Translation(format!(
                "{what} schema mismatch at {path}: {source}"
            )))
        }
    }
}
