//! Core data models shared by the classification engine.

pub mod applicant;
pub mod location;
pub mod region;

pub use applicant::{ApplicantProfile, ApplicantType, PopulationTier};
pub use location::{Coordinate, InputKind, LocationQuery};
pub use region::RegionLabel;
