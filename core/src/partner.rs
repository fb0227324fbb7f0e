//! Partner derivation: which company is behind a product id.
//!
//! Matching is an ordered substring scan over known id fragments;
//! the first hit wins.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Partner {
    Verisure,
    SectorAlarm,
    Yale,
    If,
    Folksam,
    Lawline,
    Other,
}

/// Scan order is significant: earlier fragments take precedence.
const ID_FRAGMENTS: [(&str, Partner); 6] = [
    ("verisure", Partner::Verisure),
    ("sector",   Partner::SectorAlarm),
    ("yale",     Partner::Yale),
    ("if-",      Partner::If),
    ("folksam",  Partner::Folksam),
    ("lawline",  Partner::Lawline),
];

impl Partner {
    pub fn from_product_id(product_id: &str) -> Self {
        ID_FRAGMENTS
            .iter()
            .find(|(fragment, _)| product_id.contains(fragment))
            .map(|(_, partner)| *partner)
            .unwrap_or(Partner::Other)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Verisure    => "Verisure",
            Self::SectorAlarm => "Sector Alarm",
            Self::Yale        => "Yale",
            Self::If          => "If Försäkring",
            Self::Folksam     => "Folksam",
            Self::Lawline     => "Lawline",
            Self::Other       => "Other",
        }
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Human-readable partner name for a product id; `"Other"` when unknown.
pub fn partner_from_product_id(product_id: &str) -> &'static str {
    Partner::from_product_id(product_id).display_name()
}
