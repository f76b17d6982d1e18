//! Guideline table and rating engine.
//!
//! A [`Guideline`] lists, for one procedure, the indication combinations that make an order
//! appropriate and those that make it not appropriate. Rating an order is a set-covering test
//! over those combinations, with `appropriate` checked first.
//!
//! The [`GuidelineTable`] is built once at startup (from the built-in YAML or an override file)
//! and is read-only afterwards.

use crate::config::parse_yaml;
use crate::constants::BUILTIN_GUIDELINES_YAML;
use crate::error::{CdsError, CdsResult};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// A set of indication codes.
pub type IndicationSet = BTreeSet<String>;

/// True iff every member of `subset` is also in `set`.
///
/// A larger `subset` can never be covered, so that case returns before looking at members.
pub fn covers<T: Ord>(subset: &BTreeSet<T>, set: &BTreeSet<T>) -> bool {
    if subset.len() > set.len() {
        return false;
    }
    subset.iter().all(|member| set.contains(member))
}

// ============================================================================
// Rating
// ============================================================================

/// Outcome of rating an order against its procedure's guideline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rating {
    Appropriate,
    NotAppropriate,
    NoGuidelinesApply,
}

impl Rating {
    /// Code in the PAMA rating code system.
    pub fn code(self) -> &'static str {
        match self {
            Rating::Appropriate => "appropriate",
            Rating::NotAppropriate => "not-appropriate",
            Rating::NoGuidelinesApply => "no-guidelines-apply",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Rating {
    type Err = CdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "appropriate" => Ok(Rating::Appropriate),
            "not-appropriate" => Ok(Rating::NotAppropriate),
            "no-guidelines-apply" => Ok(Rating::NoGuidelinesApply),
            other => Err(CdsError::InvalidInput(format!("unknown rating '{other}'"))),
        }
    }
}

// ============================================================================
// Guideline
// ============================================================================

/// Appropriateness rules for one procedure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Guideline {
    appropriate: Vec<IndicationSet>,
    not_appropriate: Vec<IndicationSet>,
}

impl Guideline {
    /// Build a guideline from its indication sets.
    ///
    /// # Errors
    ///
    /// Returns [`CdsError::InvalidGuideline`] if any indication set is empty. An empty set would
    /// be covered by every order, including orders with no indications at all.
    pub fn new(
        procedure: &str,
        appropriate: Vec<IndicationSet>,
        not_appropriate: Vec<IndicationSet>,
    ) -> CdsResult<Self> {
        if appropriate
            .iter()
            .chain(not_appropriate.iter())
            .any(BTreeSet::is_empty)
        {
            return Err(CdsError::InvalidGuideline {
                procedure: procedure.to_owned(),
                reason: "indication sets must not be empty".into(),
            });
        }
        Ok(Self {
            appropriate,
            not_appropriate,
        })
    }

    pub fn appropriate(&self) -> &[IndicationSet] {
        &self.appropriate
    }

    pub fn not_appropriate(&self) -> &[IndicationSet] {
        &self.not_appropriate
    }

    /// Rate a set of indications.
    ///
    /// `appropriate` is checked before `not_appropriate`, so indications that satisfy both
    /// lists are rated appropriate.
    pub fn rate(&self, indications: &IndicationSet) -> Rating {
        if self.appropriate.iter().any(|s| covers(s, indications)) {
            return Rating::Appropriate;
        }
        if self.not_appropriate.iter().any(|s| covers(s, indications)) {
            return Rating::NotAppropriate;
        }
        Rating::NoGuidelinesApply
    }
}

// ============================================================================
// Guideline table
// ============================================================================

/// Read-only registry of guidelines keyed by procedure code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuidelineTable {
    guidelines: BTreeMap<String, Guideline>,
    indications_with_guidelines: BTreeSet<String>,
}

impl GuidelineTable {
    /// Build a table from `(procedure code, guideline)` pairs.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Guideline)>,
    {
        let guidelines: BTreeMap<String, Guideline> = entries.into_iter().collect();

        // Indications that alone make some procedure appropriate.
        let indications_with_guidelines = guidelines
            .values()
            .flat_map(|g| g.appropriate.iter())
            .filter(|set| set.len() == 1)
            .flat_map(|set| set.iter().cloned())
            .collect();

        Self {
            guidelines,
            indications_with_guidelines,
        }
    }

    /// The table shipped with the service.
    ///
    /// # Errors
    ///
    /// Returns [`CdsError`] only if the embedded rule file is broken.
    pub fn builtin() -> CdsResult<Self> {
        Self::from_yaml(BUILTIN_GUIDELINES_YAML)
    }

    /// Parse a table from guideline YAML.
    ///
    /// The document maps procedure codes to `{appropriate, not_appropriate}` lists of
    /// indication-code lists. The error names the failing entry on mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`CdsError::RuleFileParse`] when the YAML does not match the schema and
    /// [`CdsError::InvalidGuideline`] when an indication set is empty.
    pub fn from_yaml(yaml_text: &str) -> CdsResult<Self> {
        let wire: BTreeMap<String, GuidelineWire> = parse_yaml(yaml_text, "guideline")?;

        let entries = wire
            .into_iter()
            .map(|(procedure, g)| {
                let guideline = Guideline::new(
                    &procedure,
                    to_sets(g.appropriate),
                    to_sets(g.not_appropriate),
                )?;
                Ok((procedure, guideline))
            })
            .collect::<CdsResult<Vec<_>>>()?;

        Ok(Self::from_entries(entries))
    }

    pub fn get(&self, procedure: &str) -> Option<&Guideline> {
        self.guidelines.get(procedure)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Guideline)> {
        self.guidelines.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.guidelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guidelines.is_empty()
    }

    /// True when `indication` is, on its own, an appropriate indication for some procedure.
    pub fn has_guidelines_for(&self, indication: &str) -> bool {
        self.indications_with_guidelines.contains(indication)
    }

    pub fn indications_with_guidelines(&self) -> &BTreeSet<String> {
        &self.indications_with_guidelines
    }
}

/// Wire representation of one guideline in the rule file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GuidelineWire {
    #[serde(default)]
    appropriate: Vec<Vec<String>>,

    #[serde(default)]
    not_appropriate: Vec<Vec<String>>,
}

fn to_sets(lists: Vec<Vec<String>>) -> Vec<IndicationSet> {
    lists
        .into_iter()
        .map(|codes| codes.into_iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{cpt, snomed};

    fn set(codes: &[&str]) -> IndicationSet {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn covers_empty_subset() {
        assert!(covers(&set(&[]), &set(&["a", "b"])));
        assert!(covers(&set(&[]), &set(&[])));
    }

    #[test]
    fn covers_itself() {
        let s = set(&["a", "b"]);
        assert!(covers(&s, &s));
    }

    #[test]
    fn non_empty_never_covered_by_empty() {
        assert!(!covers(&set(&["a"]), &set(&[])));
    }

    #[test]
    fn covers_requires_every_member() {
        assert!(covers(&set(&["a"]), &set(&["a", "b"])));
        assert!(!covers(&set(&["a", "c"]), &set(&["a", "b"])));
        assert!(!covers(&set(&["a", "b", "c"]), &set(&["a", "b"])));
    }

    #[test]
    fn empty_guideline_never_applies() {
        let guideline = Guideline::default();
        assert_eq!(guideline.rate(&set(&[])), Rating::NoGuidelinesApply);
        assert_eq!(guideline.rate(&set(&["a", "b"])), Rating::NoGuidelinesApply);
    }

    #[test]
    fn appropriate_wins_over_not_appropriate() {
        let guideline = Guideline::new("p", vec![set(&["a"])], vec![set(&["a"]), set(&["b"])])
            .expect("valid guideline");
        assert_eq!(guideline.rate(&set(&["a", "b"])), Rating::Appropriate);
        assert_eq!(guideline.rate(&set(&["b"])), Rating::NotAppropriate);
    }

    #[test]
    fn partial_indication_set_does_not_match() {
        let guideline = Guideline::new("p", vec![set(&["a", "b"])], vec![]).expect("valid");
        assert_eq!(guideline.rate(&set(&["a"])), Rating::NoGuidelinesApply);
    }

    #[test]
    fn rejects_empty_indication_set() {
        let err = Guideline::new("p", vec![set(&[])], vec![]).expect_err("should reject");
        assert!(matches!(err, CdsError::InvalidGuideline { procedure, .. } if procedure == "p"));
    }

    #[test]
    fn rating_codes_round_trip() {
        for rating in [
            Rating::Appropriate,
            Rating::NotAppropriate,
            Rating::NoGuidelinesApply,
        ] {
            assert_eq!(rating.code().parse::<Rating>().expect("parse"), rating);
        }
        assert!("maybe".parse::<Rating>().is_err());
    }

    #[test]
    fn builtin_table_rates_reference_scenarios() {
        let table = GuidelineTable::builtin().expect("builtin table");

        let lumbar = table.get(cpt::LUMBAR_SPINE_CT).expect("lumbar spine CT");
        assert_eq!(
            lumbar.rate(&set(&[snomed::LOW_BACK_PAIN])),
            Rating::NotAppropriate
        );

        let ct_head = table.get(cpt::CT_HEAD_NO_CONTRAST).expect("CT head");
        assert_eq!(
            ct_head.rate(&set(&[snomed::HEADACHE, snomed::OPTIC_DISC_EDEMA])),
            Rating::Appropriate
        );

        let mra = table.get(cpt::MRA_HEAD).expect("MRA head");
        assert_eq!(mra.rate(&set(&[snomed::TOOTHACHE])), Rating::NoGuidelinesApply);
    }

    #[test]
    fn builtin_indications_with_guidelines() {
        let table = GuidelineTable::builtin().expect("builtin table");
        assert!(table.has_guidelines_for(snomed::TOOTHACHE));
        assert!(table.has_guidelines_for(snomed::CONGENITAL_HEART_DISEASE));
        // Only single-indication appropriate sets count.
        assert!(!table.has_guidelines_for(snomed::HEADACHE));
        assert!(!table.has_guidelines_for(snomed::LOW_BACK_PAIN));
        assert_eq!(table.indications_with_guidelines().len(), 2);
    }

    #[test]
    fn from_yaml_reports_failing_path() {
        let err = GuidelineTable::from_yaml("\"70450\":\n  appropriate: \"25064002\"\n")
            .expect_err("should reject");
        match err {
            CdsError::RuleFileParse(msg) => assert!(msg.contains("appropriate"), "{msg}"),
            other => panic!("expected RuleFileParse error, got {other:?}"),
        }
    }

    #[test]
    fn from_yaml_rejects_unknown_keys() {
        let err = GuidelineTable::from_yaml("\"70450\":\n  maybe: []\n").expect_err("should reject");
        assert!(matches!(err, CdsError::RuleFileParse(msg) if msg.contains("maybe")));
    }

    #[test]
    fn from_yaml_rejects_empty_indication_set() {
        let err = GuidelineTable::from_yaml("\"70450\":\n  appropriate:\n    - []\n")
            .expect_err("should reject");
        assert!(matches!(err, CdsError::InvalidGuideline { .. }));
    }
}
