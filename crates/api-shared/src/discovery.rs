//! CDS Hooks discovery document.

use pama_core::constants::{SERVICE_HOOK, SERVICE_ID};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One entry of the discovery document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceDefinition {
    pub hook: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
}

impl ServiceDefinition {
    /// The imaging appropriate-use service answering `order-select`.
    pub fn pama_imaging() -> Self {
        Self {
            hook: SERVICE_HOOK.into(),
            id: SERVICE_ID.into(),
            title: Some("PAMA Imaging".into()),
            description: "PAMA imaging appropriate-use ratings and alternative order suggestions"
                .into(),
        }
    }
}

/// Body of `GET /cds-services`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DiscoveryResponse {
    pub services: Vec<ServiceDefinition>,
}

impl Default for DiscoveryResponse {
    fn default() -> Self {
        Self {
            services: vec![ServiceDefinition::pama_imaging()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_pama_imaging_without_prefetch() {
        let json = serde_json::to_value(DiscoveryResponse::default()).expect("serialise");
        let service = &json["services"][0];
        assert_eq!(service["id"], "pama-imaging");
        assert_eq!(service["hook"], "order-select");
        assert!(service.get("prefetch").is_none());
    }
}
