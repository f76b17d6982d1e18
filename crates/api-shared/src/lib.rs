//! # API Shared
//!
//! Shared definitions for the PAMA service APIs.
//!
//! Contains:
//! - `HealthService` and its response type
//! - the CDS Hooks discovery document for the `pama-imaging` service
//!
//! Used by `api-rest` and the `pama` CLI.

pub mod discovery;
pub mod health;

pub use discovery::{DiscoveryResponse, ServiceDefinition};
pub use health::{HealthRes, HealthService};
