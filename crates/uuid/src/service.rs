//! Internal implementation of the identifier wrappers.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Prefix of a UUID expressed as a URN (RFC 4122 section 3).
pub const URN_UUID_PREFIX: &str = "urn:uuid:";

/// Returns true if `input` is a lowercase hyphenated UUID (`8-4-4-4-12` hex groups).
fn is_canonical_hyphenated(input: &str) -> bool {
    input.len() == 36
        && input.bytes().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
        })
}

fn parse_hyphenated(input: &str) -> UuidResult<Uuid> {
    if !is_canonical_hyphenated(input) {
        return Err(UuidError::InvalidInput(format!(
            "UUID must be lowercase hyphenated (8-4-4-4-12), got: '{}'",
            input
        )));
    }
    Uuid::parse_str(input).map_err(|e| UuidError::InvalidInput(e.to_string()))
}

/// Identifier of a single appropriateness consult.
///
/// A fresh `ConsultId` is drawn every time a rating is attached to an order, so two ratings
/// never share an identifier even when they rate the same order twice.
///
/// # Display format
/// Always the URN form, `urn:uuid:<hyphenated lowercase uuid>`, which is what the consult-id
/// extension carries as its `valueUri`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConsultId(Uuid);

impl Default for ConsultId {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsultId {
    /// Generates a new random consult identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a consult identifier in URN form.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if the `urn:uuid:` prefix is missing or the remainder
    /// is not a lowercase hyphenated UUID.
    pub fn parse(input: &str) -> UuidResult<Self> {
        let rest = input.strip_prefix(URN_UUID_PREFIX).ok_or_else(|| {
            UuidError::InvalidInput(format!(
                "consult id must start with '{URN_UUID_PREFIX}', got: '{input}'"
            ))
        })?;
        parse_hyphenated(rest).map(Self)
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// The URN string carried on the wire.
    pub fn to_urn(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConsultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", URN_UUID_PREFIX, self.0.hyphenated())
    }
}

impl FromStr for ConsultId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConsultId::parse(s)
    }
}

/// Identifier of one returned card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CardId(Uuid);

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl CardId {
    /// Generates a new random card identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a lowercase hyphenated UUID.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not lowercase hyphenated.
    pub fn parse(input: &str) -> UuidResult<Self> {
        parse_hyphenated(input).map(Self)
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for CardId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardId::parse(s)
    }
}
