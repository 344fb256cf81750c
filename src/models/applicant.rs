//! Applicant profile types used for funding lookups.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ResolveError;

/// Kind of organization applying for funding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantType {
    /// Indigenous community or business
    Indigenous,
    /// Municipalities (population tier required)
    Municipality,
    /// Businesses, not for profit corporations, and broader public sector
    Business,
}

impl ApplicantType {
    pub fn all() -> &'static [ApplicantType] {
        &[
            ApplicantType::Indigenous,
            ApplicantType::Municipality,
            ApplicantType::Business,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantType::Indigenous => "indigenous",
            ApplicantType::Municipality => "municipality",
            ApplicantType::Business => "business",
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            ApplicantType::Indigenous => "Indigenous community or business",
            ApplicantType::Municipality => "Municipalities",
            ApplicantType::Business => {
                "Businesses, not for profit corporations, and broader public sector"
            }
        }
    }

    /// Whether a population tier must accompany this applicant type
    pub fn requires_tier(&self) -> bool {
        matches!(self, ApplicantType::Municipality)
    }
}

impl FromStr for ApplicantType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "indigenous" => Ok(ApplicantType::Indigenous),
            "municipality" => Ok(ApplicantType::Municipality),
            "business" => Ok(ApplicantType::Business),
            other => Err(format!("unknown applicant type '{}'", other)),
        }
    }
}

/// Municipality size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PopulationTier {
    #[serde(rename = "below-170k")]
    Below170k,
    #[serde(rename = "above-170k")]
    Above170k,
}

impl PopulationTier {
    pub fn all() -> &'static [PopulationTier] {
        &[PopulationTier::Below170k, PopulationTier::Above170k]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PopulationTier::Below170k => "below-170k",
            PopulationTier::Above170k => "above-170k",
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            PopulationTier::Below170k => "Below 170,000",
            PopulationTier::Above170k => "Above 170,000",
        }
    }
}

impl FromStr for PopulationTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "below-170k" => Ok(PopulationTier::Below170k),
            "above-170k" => Ok(PopulationTier::Above170k),
            other => Err(format!("unknown population tier '{}'", other)),
        }
    }
}

/// Validated applicant profile.
///
/// A municipality always carries a tier; other applicant types never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicantProfile {
    applicant_type: ApplicantType,
    tier: Option<PopulationTier>,
}

impl ApplicantProfile {
    pub fn new(
        applicant_type: ApplicantType,
        tier: Option<PopulationTier>,
    ) -> Result<Self, ResolveError> {
        if applicant_type.requires_tier() {
            match tier {
                Some(tier) => Ok(Self {
                    applicant_type,
                    tier: Some(tier),
                }),
                None => Err(ResolveError::Validation(
                    "Municipality population is required for municipality applicants".to_string(),
                )),
            }
        } else {
            Ok(Self {
                applicant_type,
                tier: None,
            })
        }
    }

    /// Build a profile from the raw request fields, producing the same
    /// messages a caller sees over HTTP
    pub fn from_raw(
        applicant_type: Option<&str>,
        tier: Option<&str>,
    ) -> Result<Self, ResolveError> {
        let applicant_type = match applicant_type.map(str::trim) {
            None | Some("") => {
                return Err(ResolveError::Validation(
                    "Applicant type is required".to_string(),
                ))
            }
            Some(raw) => raw
                .parse::<ApplicantType>()
                .map_err(|_| ResolveError::Validation("Invalid applicant type".to_string()))?,
        };

        if !applicant_type.requires_tier() {
            return Self::new(applicant_type, None);
        }

        let tier = match tier.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<PopulationTier>().map_err(|_| {
                ResolveError::Validation("Invalid municipality population size".to_string())
            })?),
        };

        Self::new(applicant_type, tier)
    }

    pub fn applicant_type(&self) -> ApplicantType {
        self.applicant_type
    }

    pub fn tier(&self) -> Option<PopulationTier> {
        self.tier
    }
}
