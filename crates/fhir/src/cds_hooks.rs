//! CDS Hooks request and response wire models.
//!
//! Shapes follow CDS Hooks 1.0 for the `order-select` hook, plus the
//! `extension.systemActions` response member used by the PAMA connectathon track.

use crate::resource::ClinicalResource;
use crate::FhirResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

// ============================================================================
// Request
// ============================================================================

/// A hook invocation as POSTed by the EHR.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CdsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_instance: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fhir_server: Option<String>,

    pub context: RequestContext,

    /// `prefetch`, `fhirAuthorization` and anything else the EHR includes.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub other: Map<String, Value>,
}

impl CdsRequest {
    /// Parse a hook request from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FhirError::InvalidJson`] for malformed JSON and
    /// [`crate::FhirError::Translation`] (naming the failing path) when the JSON does not match
    /// the request schema, for example when `context` is missing.
    pub fn from_json(json_text: &str) -> FhirResult<Self> {
        crate::parse_json(json_text, "CDS Hooks request")
    }
}

/// The `context` member of an `order-select` request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter_id: Option<String>,

    #[serde(default)]
    pub draft_orders: DraftOrders,

    /// `Type/id` strings naming the orders the clinician just selected.
    #[serde(default)]
    pub selections: Vec<String>,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub other: Map<String, Value>,
}

/// The `draftOrders` Bundle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default)]
    pub entry: Vec<BundleEntry>,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub other: Map<String, Value>,
}

impl DraftOrders {
    /// Resources of every entry that has one, in bundle order.
    pub fn resources(&self) -> impl Iterator<Item = &ClinicalResource> {
        self.entry.iter().filter_map(|e| e.resource.as_ref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ClinicalResource>,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub other: Map<String, Value>,
}

// ============================================================================
// Response
// ============================================================================

/// The service's answer to one hook invocation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CdsResponse {
    pub cards: Vec<Card>,

    /// Omitted entirely when there are no system actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<ResponseExtension>,
}

impl CdsResponse {
    /// Build a response, dropping the `extension` member when `system_actions` is empty.
    pub fn new(cards: Vec<Card>, system_actions: Vec<SystemAction>) -> Self {
        let extension = if system_actions.is_empty() {
            None
        } else {
            Some(ResponseExtension { system_actions })
        };
        Self { cards, extension }
    }

    pub fn system_actions(&self) -> &[SystemAction] {
        self.extension
            .as_ref()
            .map(|e| e.system_actions.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseExtension {
    pub system_actions: Vec<SystemAction>,
}

/// A machine-applied instruction to replace a selected order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SystemAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,

    pub resource: ClinicalResource,
}

impl SystemAction {
    pub fn update(resource: ClinicalResource) -> Self {
        Self {
            action_type: ActionType::Update,
            resource,
        }
    }
}

// ============================================================================
// Cards
// ============================================================================

/// Urgency of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    #[default]
    Info,
    Warning,
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Create,
    Update,
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Absolute,
    Smart,
}

/// A recommendation surfaced to the clinician.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    pub summary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default)]
    pub indicator: Indicator,

    pub source: Source,

    #[serde(default)]
    pub suggestions: Vec<Suggestion>,

    #[serde(default)]
    pub links: Vec<Link>,
    /// `selectionBehavior`, `overrideReasons` and anything else a template carries.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub other: Map<String, Value>,
}

impl Card {
    /// Every resource proposed by any action of any suggestion, in order.
    pub fn action_resources(&self) -> impl Iterator<Item = &ClinicalResource> {
        self.suggestions
            .iter()
            .flat_map(|s| s.actions.iter())
            .filter_map(|a| a.resource.as_ref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Source {
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub other: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Suggestion {
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub other: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ClinicalResource>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub other: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub label: String,

    pub url: String,

    #[serde(rename = "type")]
    pub link_type: LinkType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_context: Option<String>,
}
