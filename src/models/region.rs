//! Macro-region labels.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the two mutually exclusive macro-regions of the province
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionLabel {
    North,
    South,
}

impl RegionLabel {
    /// All labels, in table order
    pub fn all() -> &'static [RegionLabel] {
        &[RegionLabel::North, RegionLabel::South]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionLabel::North => "north",
            RegionLabel::South => "south",
        }
    }

    /// Phrase used in funding summaries
    pub fn phrase(&self) -> &'static str {
        match self {
            RegionLabel::North => "the northern region",
            RegionLabel::South => "the southern region",
        }
    }
}

impl std::fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "north" => Ok(RegionLabel::North),
            "south" => Ok(RegionLabel::South),
            other => Err(format!("unknown region label '{}'", other)),
        }
    }
}
