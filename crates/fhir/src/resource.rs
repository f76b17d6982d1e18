//! The draft order resource (typically a `ServiceRequest`).
//!
//! Only the fields the rating engine reads or writes are typed. Everything else the EHR sends
//! (status, intent, subject, occurrence, ...) is held in `other` so an annotated order is the
//! received order plus extensions, never a lossy copy.

use crate::datatypes::{CodeableConcept, Extension};
use crate::FhirResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A clinical order resource as received in `draftOrders`.
///
/// Every typed field is optional because card templates carry partial resources that are
/// overlaid onto a full order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The ordered procedure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    /// Clinical indications for the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<Vec<CodeableConcept>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub other: Map<String, Value>,
}

impl ClinicalResource {
    /// Parse a single resource from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FhirError`] if the text is not JSON or a typed field has the wrong shape.
    pub fn from_json(json_text: &str) -> FhirResult<Self> {
        crate::parse_json(json_text, "Resource")
    }

    /// Indications, or an empty slice when `reasonCode` is absent.
    pub fn reason_codes(&self) -> &[CodeableConcept] {
        self.reason_code.as_deref().unwrap_or_default()
    }

    /// Existing extensions, or an empty slice when `extension` is absent.
    pub fn extensions(&self) -> &[Extension] {
        self.extension.as_deref().unwrap_or_default()
    }

    /// A copy of this resource with `appended` added after its existing extensions.
    pub fn with_appended_extensions(&self, appended: Vec<Extension>) -> Self {
        let mut extension = self.extensions().to_vec();
        extension.extend(appended);
        Self {
            extension: Some(extension),
            ..self.clone()
        }
    }

    /// `Type/id` of this resource, when both are present.
    pub fn reference(&self) -> Option<String> {
        match (&self.resource_type, &self.id) {
            (Some(resource_type), Some(id)) => Some(format!("{resource_type}/{id}")),
            _ => None,
        }
    }
}
