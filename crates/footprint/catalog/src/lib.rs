//! Footprint Catalog - read-only coefficient tables
//!
//! The engine never owns coefficient data; it looks entries up by name through
//! the [`CoefficientCatalog`] trait. This crate provides:
//!
//! - **Schema**: the serde shape of hardware, software, transportation-mean and
//!   network entries
//! - **StaticCatalog**: an in-memory catalog loaded from JSON and validated once
//!   at construction (composite cycles, dangling references, missing sizes)
//!
//! ## Table layout
//!
//! ```json
//! {
//!   "hardware": { "laptop": { "kind": "atomic", "lifetime_years": 5, ... } },
//!   "software": { "jitsi": { "bandwidth": { "flat": 1200 } } },
//!   "transportation_means": { "train": { "subcategory": "train", ... } },
//!   "network": { "default": { "upper": {...}, "lower": {...} } }
//! }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod catalog;
pub mod error;
pub mod schema;
mod validate;

pub use catalog::{CoefficientCatalog, StaticCatalog};
pub use error::{CatalogError, Result};
pub use schema::{
    AtomicHardware, Bandwidth, CatalogData, EmbodiedCoefficient, HardwareDefinition, KnownUsage,
    SoftwareDefinition, TableKind, TransportSubcategory, TransportationMeanDefinition,
};
