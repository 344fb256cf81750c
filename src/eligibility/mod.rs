//! Funding eligibility evaluation.

mod table;

use serde::Serialize;

use crate::models::{ApplicantProfile, ApplicantType, PopulationTier, RegionLabel};

pub use table::{FundingRule, FundingTable, FundingTableError, DEFAULT_RULES};

/// Funding determination for one applicant at one location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityResult {
    pub applicant_type: ApplicantType,
    pub applicant_type_display: String,
    pub municipality_population: Option<PopulationTier>,
    pub municipality_population_display: Option<String>,
    pub funding_percentage: u8,
    pub region: Option<RegionLabel>,
    pub summary: String,
}

/// Pure function of (region, profile) over the rule table
pub fn evaluate(
    table: &FundingTable,
    region: Option<RegionLabel>,
    profile: &ApplicantProfile,
) -> EligibilityResult {
    let applicant_type = profile.applicant_type();
    let tier = profile.tier();

    let funding_percentage = match region {
        // Total table + validated profile: the lookup always hits
        Some(label) => table.rate(label, applicant_type, tier).unwrap_or(0),
        None => 0,
    };

    let applicant = match tier {
        Some(tier) => format!("{} ({})", applicant_type.display(), tier.display()),
        None => applicant_type.display().to_string(),
    };

    let summary = match region {
        Some(label) => format!(
            "{} in {} are eligible for {}% funding.",
            applicant,
            label.phrase(),
            funding_percentage
        ),
        None => "Locations outside the mapped regions are not eligible for funding.".to_string(),
    };

    EligibilityResult {
        applicant_type,
        applicant_type_display: applicant_type.display().to_string(),
        municipality_population: tier,
        municipality_population_display: tier.map(|t| t.display().to_string()),
        funding_percentage,
        region,
        summary,
    }
}
