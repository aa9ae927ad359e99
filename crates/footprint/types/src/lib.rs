//! Footprint Types - Core value types for meeting footprint estimation
//!
//! Every other footprint crate speaks in terms of these types:
//!
//! - **DamageVector**: the four damage endpoints (human health, ecosystem
//!   quality, climate change, resources) carried as one immutable value
//! - **DamageDelta**: the stale/refreshed pair produced by an incremental update
//! - **Bound / Ranged**: upper/lower estimates for coefficients given as a range
//! - **ScenarioId / ComponentId**: UUID-backed identifiers
//! - **Category**: hardware, software or journey

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod bound;
pub mod category;
pub mod damage;
pub mod ids;

pub use bound::{Bound, Ranged};
pub use category::Category;
pub use damage::{DamageDelta, DamageEndpoint, DamageVector};
pub use ids::{ComponentId, ScenarioId};
