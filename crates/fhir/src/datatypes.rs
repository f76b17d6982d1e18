//! FHIR datatypes used on draft orders.
//!
//! Fields FHIR marks optional are optional here too. Inbound EHR payloads are not always
//! complete, and a missing `system` or `code` must not make the whole request unreadable.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

// ============================================================================
// Coding / CodeableConcept
// ============================================================================

/// A single coded value within one terminology system.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            display: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// True when this coding belongs to `system`.
    pub fn is_from(&self, system: &str) -> bool {
        self.system.as_deref() == Some(system)
    }
}

/// One clinical idea, possibly expressed in several terminologies at once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            text: None,
        }
    }
}

// ============================================================================
// Extension
// ============================================================================

/// Value carried by an [`Extension`] written by this service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtensionValue {
    CodeableConcept(CodeableConcept),
    String(String),
    Uri(String),
}

/// An annotation attached to a resource.
///
/// The three value kinds this service writes are typed; any other `value[x]` (or nested
/// `extension`) received from the EHR is kept in `other` and written back unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<CodeableConcept>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_uri: Option<String>,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub other: Map<String, Value>,
}

impl Extension {
    pub fn new(url: impl Into<String>, value: ExtensionValue) -> Self {
        let mut extension = Self {
            url: url.into(),
            ..Self::default()
        };
        match value {
            ExtensionValue::CodeableConcept(concept) => {
                extension.value_codeable_concept = Some(concept)
            }
            ExtensionValue::String(s) => extension.value_string = Some(s),
            ExtensionValue::Uri(uri) => extension.value_uri = Some(uri),
        }
        extension
    }

    /// The typed value, if this extension carries one of the three known kinds.
    pub fn value(&self) -> Option<ExtensionValue> {
        if let Some(concept) = &self.value_codeable_concept {
            return Some(ExtensionValue::CodeableConcept(concept.clone()));
        }
        if let Some(s) = &self.value_string {
            return Some(ExtensionValue::String(s.clone()));
        }
        self.value_uri.clone().map(ExtensionValue::Uri)
    }
}
