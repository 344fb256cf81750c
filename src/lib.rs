//! Regionfund - location resolution, region classification and funding
//! eligibility.
//!
//! The library holds the engine; the `server` binary wires it to HTTP.

pub mod api;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod geocode;
pub mod location;
pub mod models;
pub mod regions;
pub mod resolve;

pub use error::ResolveError;
pub use models::{ApplicantProfile, ApplicantType, Coordinate, PopulationTier, RegionLabel};
