//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the service. Nothing in
//! the request path reads environment variables.

use crate::constants::{DEFAULT_APP_LABEL, DEFAULT_APP_URL, DEFAULT_CONSULT_METHOD};
use crate::error::{CdsError, CdsResult};
use crate::guidelines::GuidelineTable;
use crate::recommendations::RecommendationCatalog;
use pama_types::NonEmptyText;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// The SMART app offered on every card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppLink {
    label: String,
    url: String,
}

impl AppLink {
    /// # Errors
    ///
    /// Returns [`CdsError::InvalidInput`] if `url` is not an absolute http(s) URL.
    pub fn new(label: NonEmptyText, url: NonEmptyText) -> CdsResult<Self> {
        validate_app_url(url.as_str())?;
        Ok(Self {
            label: label.to_string(),
            url: url.to_string(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for AppLink {
    fn default() -> Self {
        Self {
            label: DEFAULT_APP_LABEL.to_owned(),
            url: DEFAULT_APP_URL.to_owned(),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    consult_method: String,
    app_link: AppLink,
    guidelines_file: Option<PathBuf>,
    recommendations_file: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            consult_method: DEFAULT_CONSULT_METHOD.to_owned(),
            app_link: AppLink::default(),
            guidelines_file: None,
            recommendations_file: None,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig` using the built-in rule files.
    pub fn new(consult_method: NonEmptyText, app_link: AppLink) -> Self {
        Self {
            consult_method: consult_method.to_string(),
            app_link,
            guidelines_file: None,
            recommendations_file: None,
        }
    }

    /// Use rule files from disk instead of the built-in ones. `None` keeps the built-in file.
    pub fn with_rule_files(
        mut self,
        guidelines_file: Option<PathBuf>,
        recommendations_file: Option<PathBuf>,
    ) -> Self {
        self.guidelines_file = guidelines_file;
        self.recommendations_file = recommendations_file;
        self
    }

    /// Build a config from raw (typically environment) values.
    ///
    /// Missing or blank values fall back to the defaults in [`crate::constants`].
    ///
    /// # Errors
    ///
    /// Returns [`CdsError::InvalidInput`] if the app URL is not an absolute http(s) URL.
    pub fn from_env_values(
        consult_method: Option<String>,
        app_url: Option<String>,
        app_label: Option<String>,
        guidelines_file: Option<String>,
        recommendations_file: Option<String>,
    ) -> CdsResult<Self> {
        let consult_method = text_or_default(consult_method, DEFAULT_CONSULT_METHOD)?;
        let app_link = AppLink::new(
            text_or_default(app_label, DEFAULT_APP_LABEL)?,
            text_or_default(app_url, DEFAULT_APP_URL)?,
        )?;

        Ok(Self::new(consult_method, app_link).with_rule_files(
            path_if_set(guidelines_file),
            path_if_set(recommendations_file),
        ))
    }

    pub fn consult_method(&self) -> &str {
        &self.consult_method
    }

    pub fn app_link(&self) -> &AppLink {
        &self.app_link
    }

    pub fn guidelines_file(&self) -> Option<&Path> {
        self.guidelines_file.as_deref()
    }

    pub fn recommendations_file(&self) -> Option<&Path> {
        self.recommendations_file.as_deref()
    }

    /// Load the guideline table: the configured file, or the built-in table.
    ///
    /// # Errors
    ///
    /// Returns [`CdsError`] if the file cannot be read or does not parse.
    pub fn load_guidelines(&self) -> CdsResult<GuidelineTable> {
        match &self.guidelines_file {
            Some(path) => GuidelineTable::from_yaml(&read_rule_file(path)?),
            None => GuidelineTable::builtin(),
        }
    }

    /// Load the recommendation catalog: the configured file, or the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CdsError`] if the file cannot be read or does not parse.
    pub fn load_recommendations(&self) -> CdsResult<RecommendationCatalog> {
        match &self.recommendations_file {
            Some(path) => RecommendationCatalog::from_yaml(&read_rule_file(path)?),
            None => RecommendationCatalog::builtin(),
        }
    }
}

fn text_or_default(value: Option<String>, default: &str) -> CdsResult<NonEmptyText> {
    let value = value.filter(|v| !v.trim().is_empty());
    Ok(NonEmptyText::new(value.as_deref().unwrap_or(default))?)
}

fn path_if_set(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn read_rule_file(path: &Path) -> CdsResult<String> {
    std::fs::read_to_string(path).map_err(|source| CdsError::RuleFileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserialize a rule document, naming the failing path (`<root>` for the document itself).
///
/// # Errors
///
/// Returns [`CdsError::RuleFileParse`] prefixed with `what` when the YAML does not match `T`.
pub(crate) fn parse_yaml<T: DeserializeOwned>(yaml_text: &str, what: &str) -> CdsResult<T> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>"
        } else {
            path.as_str()
        };
        CdsError::RuleFileParse(format!("{what} schema mismatch at {path}: {source}"))
    })
}

/// Validates that a card link URL is absolute http(s) with a host.
///
/// # Errors
///
/// Returns [`CdsError::InvalidInput`] if the URL is not acceptable.
pub fn validate_app_url(url: &str) -> CdsResult<()> {
    const MAX_URL_LEN: usize = 2048;

    if url.len() > MAX_URL_LEN {
        return Err(CdsError::InvalidInput(format!(
            "app url exceeds maximum length of {} characters",
            MAX_URL_LEN
        )));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| CdsError::InvalidInput(format!("invalid app url '{url}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CdsError::InvalidInput(
            "app url must use http or https".into(),
        ));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(CdsError::InvalidInput("app url must include a host".into()));
    }

    if url.chars().any(char::is_whitespace) {
        return Err(CdsError::InvalidInput(
            "app url must not contain whitespace".into(),
        ));
    }

    Ok(())
}
