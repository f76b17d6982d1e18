//! The `pama-imaging` CDS service.
//!
//! [`PamaImagingService`] owns the loaded rule registries and the configuration, and turns one
//! `order-select` request into one response. It is cheap to clone and safe to share across
//! request handlers.

use crate::annotation::Annotator;
use crate::cards::CardGenerator;
use crate::config::CoreConfig;
use crate::constants::{CPT_SYSTEM, SNOMED_SYSTEM};
use crate::error::CdsResult;
use crate::guidelines::{GuidelineTable, Rating};
use crate::orders::{resolve_selections, system_actions};
use crate::recommendations::RecommendationCatalog;
use fhir::{CdsRequest, CdsResponse, ClinicalResource, CodeableConcept, Coding};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct PamaImagingService {
    cfg: Arc<CoreConfig>,
    guidelines: Arc<GuidelineTable>,
    recommendations: Arc<RecommendationCatalog>,
}

impl PamaImagingService {
    /// Creates the service, loading the rule files named by `cfg`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CdsError`] if a rule file cannot be read or parsed.
    pub fn new(cfg: Arc<CoreConfig>) -> CdsResult<Self> {
        let guidelines = cfg.load_guidelines()?;
        let recommendations = cfg.load_recommendations()?;
        tracing::info!(
            guidelines = guidelines.len(),
            recommendations = recommendations.len(),
            "loaded PAMA rules"
        );
        Ok(Self::with_rules(cfg, guidelines, recommendations))
    }

    pub fn with_rules(
        cfg: Arc<CoreConfig>,
        guidelines: GuidelineTable,
        recommendations: RecommendationCatalog,
    ) -> Self {
        Self {
            cfg,
            guidelines: Arc::new(guidelines),
            recommendations: Arc::new(recommendations),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn guidelines(&self) -> &GuidelineTable {
        &self.guidelines
    }

    pub fn recommendations(&self) -> &RecommendationCatalog {
        &self.recommendations
    }

    fn annotator(&self) -> Annotator<'_> {
        Annotator::new(&self.guidelines, self.cfg.consult_method())
    }

    /// Evaluate one `order-select` invocation.
    ///
    /// Never fails: anything the rules cannot rate simply produces no card and no action.
    pub fn evaluate(&self, request: &CdsRequest) -> CdsResponse {
        let context = &request.context;
        let selected = resolve_selections(&context.draft_orders, &context.selections);
        let annotator = self.annotator();

        let cards = CardGenerator::new(&self.recommendations, annotator, self.cfg.app_link())
            .make_cards(&selected, context);
        let actions = system_actions(&annotator, &selected);

        tracing::debug!(
            hook_instance = ?request.hook_instance,
            selected = selected.len(),
            cards = cards.len(),
            system_actions = actions.len(),
            "evaluated order-select"
        );
        CdsResponse::new(cards, actions)
    }

    /// Rating for a bare procedure code and indication codes, as the engine would report it
    /// for an order carrying exactly those codes.
    pub fn rate_codes(&self, procedure: &str, indications: &[String]) -> Option<Rating> {
        let resource = ClinicalResource {
            code: Some(CodeableConcept::from_coding(Coding::new(CPT_SYSTEM, procedure))),
            reason_code: Some(
                indications
                    .iter()
                    .map(|code| CodeableConcept::from_coding(Coding::new(SNOMED_SYSTEM, code.as_str())))
                    .collect(),
            ),
            ..ClinicalResource::default()
        };
        self.annotator().rating_for(&resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::rating_in;
    use crate::config::AppLink;
    use crate::constants::{
        cpt, snomed, CONSULT_ID_EXTENSION_URL, PAMA_RATING_EXTENSION_URL,
        QCDSM_CONSULTED_EXTENSION_URL,
    };
    use pama_types::NonEmptyText;
    use serde_json::{json, Value};

    fn service() -> PamaImagingService {
        PamaImagingService::new(Arc::new(CoreConfig::default())).expect("builtin rules")
    }

    fn service_request(id: &str, procedure: &str, indications: &[&str]) -> Value {
        json!({
            "resourceType": "ServiceRequest",
            "id": id,
            "status": "draft",
            "intent": "plan",
            "code": {
                "coding": [{
                    "system": "http://www.ama-assn.org/go/cpt",
                    "code": procedure
                }]
            },
            "reasonCode": indications.iter().map(|code| json!({
                "coding": [{ "system": "http://snomed.info/sct", "code": code }]
            })).collect::<Vec<_>>()
        })
    }

    fn request(orders: Vec<Value>, selections: &[&str]) -> CdsRequest {
        let body = json!({
            "hook": "order-select",
            "hookInstance": "d1577c69-dfbe-44ad-ba6d-3e05e953b2ea",
            "fhirServer": "http://hapi.fhir.org/baseDstu3",
            "context": {
                "patientId": "MRI-59879846",
                "userId": "Practitioner/example",
                "draftOrders": {
                    "resourceType": "Bundle",
                    "entry": orders.into_iter().map(|resource| json!({ "resource": resource })).collect::<Vec<_>>()
                },
                "selections": selections
            }
        });
        CdsRequest::from_json(&body.to_string()).expect("valid request")
    }

    #[test]
    fn low_back_pain_ct_is_flagged_not_appropriate() {
        let response = service().evaluate(&request(
            vec![service_request("lumbar", cpt::LUMBAR_SPINE_CT, &[snomed::LOW_BACK_PAIN])],
            &["ServiceRequest/lumbar"],
        ));

        assert!(response.cards.is_empty());
        let actions = response.system_actions();
        assert_eq!(actions.len(), 1);

        let extensions = actions[0].resource.extensions();
        let urls: Vec<_> = extensions.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                PAMA_RATING_EXTENSION_URL,
                QCDSM_CONSULTED_EXTENSION_URL,
                CONSULT_ID_EXTENSION_URL
            ]
        );
        assert_eq!(rating_in(extensions), Some(Rating::NotAppropriate));
        assert_eq!(extensions[1].value_string.as_deref(), Some("example-gcode"));
        assert_eq!(
            actions[0].resource.other.get("status"),
            Some(&json!("draft"))
        );
    }

    #[test]
    fn congenital_heart_disease_cta_gets_mri_card() {
        let response = service().evaluate(&request(
            vec![service_request(
                "cta",
                cpt::CTA_WITH_CONTRAST,
                &[snomed::CONGENITAL_HEART_DISEASE],
            )],
            &["ServiceRequest/cta"],
        ));

        assert_eq!(response.cards.len(), 1);
        let card = &response.cards[0];
        assert_eq!(card.summary, "ACC recommends cardiac MRI");
        assert_eq!(card.links[0].label, "SMART PAMA Demo App");

        let suggested = card.action_resources().next().expect("suggested order");
        assert_eq!(suggested.id.as_deref(), Some("cta"));
        assert_eq!(rating_in(suggested.extensions()), Some(Rating::Appropriate));

        assert_eq!(response.system_actions().len(), 1);
        assert_eq!(
            rating_in(response.system_actions()[0].resource.extensions()),
            Some(Rating::NotAppropriate)
        );
    }

    #[test]
    fn cardiac_mri_for_congenital_heart_disease_needs_no_card() {
        let response = service().evaluate(&request(
            vec![service_request("mri", cpt::CARDIAC_MRI, &[snomed::CONGENITAL_HEART_DISEASE])],
            &["ServiceRequest/mri"],
        ));
        assert!(response.cards.is_empty());
        assert_eq!(
            rating_in(response.system_actions()[0].resource.extensions()),
            Some(Rating::Appropriate)
        );
    }

    #[test]
    fn unknown_procedure_without_precedent_omits_extension_member() {
        let response = service().evaluate(&request(
            vec![service_request("x", "99999", &[snomed::HEADACHE])],
            &["ServiceRequest/x"],
        ));
        assert!(response.cards.is_empty());
        assert!(response.extension.is_none());

        let json = serde_json::to_value(&response).expect("serialise");
        assert_eq!(json, json!({ "cards": [] }));
    }

    #[test]
    fn unmatched_selection_yields_empty_response() {
        let response = service().evaluate(&request(
            vec![service_request("lumbar", cpt::LUMBAR_SPINE_CT, &[snomed::LOW_BACK_PAIN])],
            &["ServiceRequest/elsewhere"],
        ));
        assert!(response.cards.is_empty());
        assert!(response.system_actions().is_empty());
    }

    #[test]
    fn consult_method_comes_from_config() {
        let cfg = CoreConfig::new(
            NonEmptyText::new("G1001").expect("valid text"),
            AppLink::default(),
        );
        let service = PamaImagingService::new(Arc::new(cfg)).expect("builtin rules");
        let response = service.evaluate(&request(
            vec![service_request("lumbar", cpt::LUMBAR_SPINE_CT, &[snomed::LOW_BACK_PAIN])],
            &["ServiceRequest/lumbar"],
        ));
        let extensions = response.system_actions()[0].resource.extensions();
        assert_eq!(extensions[1].value_string.as_deref(), Some("G1001"));
    }

    #[test]
    fn rate_codes_matches_engine() {
        let service = service();
        assert_eq!(
            service.rate_codes(
                cpt::CT_HEAD_NO_CONTRAST,
                &[snomed::HEADACHE.into(), snomed::OPTIC_DISC_EDEMA.into()]
            ),
            Some(Rating::Appropriate)
        );
        assert_eq!(
            service.rate_codes(cpt::MRA_HEAD, &[snomed::TOOTHACHE.into()]),
            Some(Rating::NoGuidelinesApply)
        );
        assert_eq!(service.rate_codes("99999", &[]), None);
    }
}
