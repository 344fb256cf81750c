//! Funding-rate rule table keyed by region, applicant type and tier.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ApplicantType, PopulationTier, RegionLabel};

/// One row of the funding policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingRule {
    pub region: RegionLabel,
    pub applicant_type: ApplicantType,
    /// Set only for municipality rules
    #[serde(default)]
    pub municipality_population: Option<PopulationTier>,
    pub percentage: u8,
}

impl FundingRule {
    const fn new(
        region: RegionLabel,
        applicant_type: ApplicantType,
        municipality_population: Option<PopulationTier>,
        percentage: u8,
    ) -> Self {
        Self {
            region,
            applicant_type,
            municipality_population,
            percentage,
        }
    }

    fn key(&self) -> RuleKey {
        (self.region, self.applicant_type, self.municipality_population)
    }
}

type RuleKey = (RegionLabel, ApplicantType, Option<PopulationTier>);

/// Built-in policy: the north funds everyone at 75%; in the south
/// indigenous applicants and small municipalities get 75%, large
/// municipalities and businesses 50%.
pub const DEFAULT_RULES: &[FundingRule] = &[
    FundingRule::new(RegionLabel::North, ApplicantType::Indigenous, None, 75),
    FundingRule::new(
        RegionLabel::North,
        ApplicantType::Municipality,
        Some(PopulationTier::Below170k),
        75,
    ),
    FundingRule::new(
        RegionLabel::North,
        ApplicantType::Municipality,
        Some(PopulationTier::Above170k),
        75,
    ),
    FundingRule::new(RegionLabel::North, ApplicantType::Business, None, 75),
    FundingRule::new(RegionLabel::South, ApplicantType::Indigenous, None, 75),
    FundingRule::new(
        RegionLabel::South,
        ApplicantType::Municipality,
        Some(PopulationTier::Below170k),
        75,
    ),
    FundingRule::new(
        RegionLabel::South,
        ApplicantType::Municipality,
        Some(PopulationTier::Above170k),
        50,
    ),
    FundingRule::new(RegionLabel::South, ApplicantType::Business, None, 50),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FundingTableError {
    #[error("duplicate funding rule for {0}")]
    Duplicate(String),
    #[error("no funding rule for {0}")]
    Missing(String),
    #[error("funding rule for {0} has percentage {1}, must be 0-100")]
    OutOfRange(String, u8),
    #[error("funding rule for {0} must name a municipality population tier")]
    TierRequired(String),
    #[error("funding rule for {0} must not name a municipality population tier")]
    TierNotAllowed(String),
}

fn describe(key: &RuleKey) -> String {
    match key.2 {
        Some(tier) => format!("{}/{}/{}", key.0, key.1.as_str(), tier.as_str()),
        None => format!("{}/{}", key.0, key.1.as_str()),
    }
}

/// Every (region, applicant type, tier) combination a valid profile can
/// produce
fn required_keys() -> Vec<RuleKey> {
    let mut keys = Vec::new();
    for region in RegionLabel::all() {
        for applicant_type in ApplicantType::all() {
            if applicant_type.requires_tier() {
                for tier in PopulationTier::all() {
                    keys.push((*region, *applicant_type, Some(*tier)));
                }
            } else {
                keys.push((*region, *applicant_type, None));
            }
        }
    }
    keys
}

/// Validated, total funding table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingTable {
    rates: BTreeMap<RuleKey, u8>,
}

impl FundingTable {
    /// Build a table, rejecting duplicates, malformed rows and gaps
    pub fn new(rules: &[FundingRule]) -> Result<Self, FundingTableError> {
        let mut rates = BTreeMap::new();

        for rule in rules {
            let key = rule.key();
            let name = describe(&key);

            if rule.percentage > 100 {
                return Err(FundingTableError::OutOfRange(name, rule.percentage));
            }

            match (rule.applicant_type.requires_tier(), rule.municipality_population) {
                (true, None) => return Err(FundingTableError::TierRequired(name)),
                (false, Some(_)) => return Err(FundingTableError::TierNotAllowed(name)),
                _ => {}
            }

            if rates.insert(key, rule.percentage).is_some() {
                return Err(FundingTableError::Duplicate(name));
            }
        }

        if let Some(missing) = required_keys().iter().find(|k| !rates.contains_key(*k)) {
            return Err(FundingTableError::Missing(describe(missing)));
        }

        Ok(Self { rates })
    }

    /// Rate for a combination. Total by construction for any validated
    /// profile.
    pub fn rate(
        &self,
        region: RegionLabel,
        applicant_type: ApplicantType,
        tier: Option<PopulationTier>,
    ) -> Option<u8> {
        self.rates.get(&(region, applicant_type, tier)).copied()
    }

    pub fn rules(&self) -> impl Iterator<Item = FundingRule> + '_ {
        self.rates
            .iter()
            .map(|(&(region, applicant_type, tier), &percentage)| {
                FundingRule::new(region, applicant_type, tier, percentage)
            })
    }
}

impl Default for FundingTable {
    fn default() -> Self {
        Self {
            rates: DEFAULT_RULES.iter().map(|r| (r.key(), r.percentage)).collect(),
        }
    }
}
