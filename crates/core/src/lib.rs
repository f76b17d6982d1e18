//! # PAMA Core
//!
//! Imaging appropriate-use rules for the `pama-imaging` CDS Hooks service.
//!
//! This crate contains the pure decision logic:
//! - rating an order's procedure against its indications ([`GuidelineTable`])
//! - annotating rated orders with the three PAMA extensions ([`Annotator`])
//! - suggesting alternative orders as cards ([`RecommendationCatalog`], [`CardGenerator`])
//!
//! **No API concerns**: HTTP servers and service discovery belong in `api-rest` and
//! `api-shared`. Wire shapes live in the `fhir` crate.

pub mod annotation;
pub mod cards;
pub mod coding;
pub mod config;
pub mod constants;
pub mod error;
pub mod guidelines;
pub mod merge;
pub mod orders;
pub mod recommendations;
pub mod service;

pub use annotation::{build_extensions, rating_in, Annotator};
pub use cards::CardGenerator;
pub use config::{AppLink, CoreConfig};
pub use error::{CdsError, CdsResult};
pub use guidelines::{covers, Guideline, GuidelineTable, IndicationSet, Rating};
pub use merge::merge_resources;
pub use recommendations::RecommendationCatalog;
pub use service::PamaImagingService;
