//! Selected-order resolution and system actions.

use crate::annotation::Annotator;
use fhir::{ClinicalResource, DraftOrders, SystemAction};
use pama_types::ResourceReference;

/// The draft orders named by `selections`, in selection order.
///
/// Selections that are not `Type/id` strings, or that match no draft order, are skipped with a
/// warning.
pub fn resolve_selections(draft_orders: &DraftOrders, selections: &[String]) -> Vec<ClinicalResource> {
    selections
        .iter()
        .filter_map(|selection| {
            let reference = match ResourceReference::parse(selection) {
                Ok(reference) => reference,
                Err(e) => {
                    tracing::warn!("skipping selection: {}", e);
                    return None;
                }
            };

            let found = draft_orders.resources().find(|resource| {
                reference.matches(resource.resource_type.as_deref(), resource.id.as_deref())
            });
            if found.is_none() {
                tracing::warn!(selection = %reference, "selection matches no draft order; skipping");
            }
            found.cloned()
        })
        .collect()
}

/// One `update` action per rated resource, carrying its existing extensions followed by the
/// rating extensions. Unrated resources contribute nothing.
pub fn system_actions(annotator: &Annotator<'_>, resources: &[ClinicalResource]) -> Vec<SystemAction> {
    resources
        .iter()
        .filter_map(|resource| {
            let ratings = annotator.extensions_for(resource);
            if ratings.is_empty() {
                return None;
            }
            Some(SystemAction::update(resource.with_appended_extensions(ratings)))
        })
        .collect()
}
