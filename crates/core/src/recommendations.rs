//! Recommendation catalog: alternative-order card templates keyed by indication.

use crate::config::parse_yaml;
use crate::constants::BUILTIN_RECOMMENDATIONS_YAML;
use crate::error::CdsResult;
use fhir::Card;
use std::collections::{BTreeMap, BTreeSet};

/// Read-only registry of card templates keyed by the indication code that triggers them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecommendationCatalog {
    templates: BTreeMap<String, Vec<Card>>,
}

impl RecommendationCatalog {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<Card>)>,
    {
        Self {
            templates: entries.into_iter().collect(),
        }
    }

    /// The catalog shipped with the service.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CdsError`] only if the embedded rule file is broken.
    pub fn builtin() -> CdsResult<Self> {
        Self::from_yaml(BUILTIN_RECOMMENDATIONS_YAML)
    }

    /// Parse a catalog from YAML mapping indication codes to lists of CDS Hooks cards.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CdsError::RuleFileParse`] naming the failing path when a template does not
    /// match the card schema.
    pub fn from_yaml(yaml_text: &str) -> CdsResult<Self> {
        let templates = parse_yaml(yaml_text, "recommendation")?;
        Ok(Self { templates })
    }

    /// Templates of every entry whose indication is in `indications`, in key order.
    pub fn matching(&self, indications: &BTreeSet<String>) -> Vec<&Card> {
        self.templates
            .iter()
            .filter(|(indication, _)| indications.contains(*indication))
            .flat_map(|(_, cards)| cards.iter())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Card])> {
        self.templates
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
