//! Identifier generation for PAMA consults and CDS cards.
//!
//! Every rating annotation carries a consult identifier, and every returned card carries its
//! own identifier. Both are random (version 4) UUIDs drawn fresh for each use and never cached.
//!
//! Two wrapper types fix the textual form of each identifier:
//! - [`ConsultId`] renders as a URN: `urn:uuid:550e8400-e29b-41d4-a716-446655440000`
//! - [`CardId`] renders as a bare hyphenated UUID: `550e8400-e29b-41d4-a716-446655440000`
//!
//! Parsing is strict: only lowercase hyphenated UUIDs are accepted, so an identifier printed by
//! this crate always parses back to the same value.

mod service;

// Re-export public types
pub use service::{CardId, ConsultId, Uuid, URN_UUID_PREFIX};

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
