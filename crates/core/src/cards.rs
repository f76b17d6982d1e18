//! Card generation: alternative-order suggestions for the selected orders.

use crate::annotation::Annotator;
use crate::coding::all_codes;
use crate::config::AppLink;
use crate::guidelines::covers;
use crate::merge::merge_resources;
use crate::recommendations::RecommendationCatalog;
use fhir::{Card, ClinicalResource, Link, LinkType, RequestContext};
use pama_uuid::CardId;
use std::collections::BTreeSet;

/// Builds cards from the recommendation catalog.
#[derive(Clone, Copy, Debug)]
pub struct CardGenerator<'a> {
    catalog: &'a RecommendationCatalog,
    annotator: Annotator<'a>,
    app_link: &'a AppLink,
}

impl<'a> CardGenerator<'a> {
    pub fn new(
        catalog: &'a RecommendationCatalog,
        annotator: Annotator<'a>,
        app_link: &'a AppLink,
    ) -> Self {
        Self {
            catalog,
            annotator,
            app_link,
        }
    }

    /// Cards for the indications of `resources`.
    ///
    /// Returns no cards when every procedure the matching templates would suggest is already
    /// among the selected orders' procedures (which includes the case of no matching template).
    /// Otherwise each matching template becomes a card with a fresh id, a SMART app link whose
    /// `appContext` is `context` as JSON, and its action resources merged onto the first
    /// selected order.
    pub fn make_cards(&self, resources: &[ClinicalResource], context: &RequestContext) -> Vec<Card> {
        let proposed: BTreeSet<String> =
            all_codes(resources.iter().flat_map(|r| r.reason_codes())).into_iter().collect();
        let templates = self.catalog.matching(&proposed);

        let guideline_actions: BTreeSet<String> = templates
            .iter()
            .flat_map(|card| card.action_resources())
            .flat_map(|r| all_codes(r.code.iter()))
            .collect();
        let selected_actions: BTreeSet<String> =
            all_codes(resources.iter().filter_map(|r| r.code.as_ref()))
                .into_iter()
                .collect();

        if covers(&guideline_actions, &selected_actions) {
            tracing::debug!(
                templates = templates.len(),
                "selected orders already meet guidelines; no cards"
            );
            return Vec::new();
        }

        let Some(source) = resources.first() else {
            return Vec::new();
        };
        let link = self.link_for(context);

        templates
            .into_iter()
            .map(|template| self.finalise(template, source, &link))
            .collect()
    }

    fn finalise(&self, template: &Card, source: &ClinicalResource, link: &Link) -> Card {
        let mut card = template.clone();
        card.uuid = Some(CardId::new().to_string());
        card.links = vec![link.clone()];
        for action in card
            .suggestions
            .iter_mut()
            .flat_map(|s| s.actions.iter_mut())
        {
            if let Some(recommended) = action.resource.take() {
                action.resource = Some(merge_resources(&self.annotator, source, &recommended));
            }
        }
        card
    }

    fn link_for(&self, context: &RequestContext) -> Link {
        let app_context = match serde_json::to_string(context) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::warn!("failed to serialise request context for app link: {}", e);
                None
            }
        };

        Link {
            label: self.app_link.label().to_owned(),
            url: self.app_link.url().to_owned(),
            link_type: LinkType::Smart,
            app_context,
        }
    }
}
