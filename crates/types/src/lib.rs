//! Small validated primitives shared across the PAMA crates.
//!
//! - [`NonEmptyText`] for configuration values that must carry content.
//! - [`ResourceReference`] for CDS Hooks selection strings of the form `Type/id`.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// A reference string was not of the form `Type/id`
    #[error("invalid resource reference '{0}': expected 'Type/id'")]
    InvalidReference(String),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A literal reference to a resource inside a request, e.g. `ServiceRequest/example-MRI-59879846`.
///
/// Only the first `/` separates type from id; both halves must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceReference {
    resource_type: String,
    id: String,
}

impl ResourceReference {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Parse a `Type/id` selection string.
    ///
    /// Only the first two `/`-separated segments are read, so `Type/id/_history/2` selects `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::InvalidReference`] when there is no `/` or either segment is empty.
    pub fn parse(input: &str) -> Result<Self, TextError> {
        let mut segments = input.split('/');
        match (segments.next(), segments.next()) {
            (Some(resource_type), Some(id)) if !resource_type.is_empty() && !id.is_empty() => {
                Ok(Self::new(resource_type, id))
            }
            _ => Err(TextError::InvalidReference(input.to_owned())),
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True when `resource_type` and `id` both match this reference.
    pub fn matches(&self, resource_type: Option<&str>, id: Option<&str>) -> bool {
        resource_type == Some(self.resource_type.as_str()) && id == Some(self.id.as_str())
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}

impl FromStr for ResourceReference {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceReference::parse(s)
    }
}
