use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::SortKey;

/// Portal sections that list tier-gated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Events,
    Offers,
    Resources,
    MarketIntel,
    Opportunities,
    Updates,
    AccessHubs,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Events,
        Section::Offers,
        Section::Resources,
        Section::MarketIntel,
        Section::Opportunities,
        Section::Updates,
        Section::AccessHubs,
    ];

    /// Display name, used in the "Total ..." stats label.
    pub fn title(&self) -> &'static str {
        match self {
            Section::Events => "Events",
            Section::Offers => "Offers",
            Section::Resources => "Resources",
            Section::MarketIntel => "Market Intelligence",
            Section::Opportunities => "Opportunities",
            Section::Updates => "Updates",
            Section::AccessHubs => "Access Hubs",
        }
    }

    /// Backing Supabase table.
    pub fn table(&self) -> &'static str {
        match self {
            Section::Events => "events",
            Section::Offers => "offers",
            Section::Resources => "resources",
            Section::MarketIntel => "market_intel",
            Section::Opportunities => "opportunities",
            Section::Updates => "updates",
            Section::AccessHubs => "access_hubs",
        }
    }

    pub fn sort_key(&self) -> SortKey {
        match self {
            Section::Events => SortKey::DateAsc,
            Section::Offers | Section::Resources | Section::Updates => SortKey::DateDesc,
            Section::MarketIntel | Section::Opportunities | Section::AccessHubs => SortKey::Lexical,
        }
    }

    /// Category labels shown as filter chips, in display order.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Section::Events => &["Workshop", "Webinar", "Conference", "Networking", "Summit", "Awards"],
            Section::Offers => &["Software", "Services", "Training", "Travel", "Insurance"],
            Section::Resources => &["Report", "Template", "Guide", "Toolkit", "Video", "Case Study"],
            Section::MarketIntel => &["Market Report", "Trend Analysis", "Regional Insight", "Sector Brief"],
            Section::Opportunities => &["Full-time", "Part-time", "Contract", "Freelance", "Tender", "Internship"],
            Section::Updates => &["Announcements", "Governance", "Events", "Member News", "Industry"],
            Section::AccessHubs => &["Co-working", "Studio", "Office", "Event Space"],
        }
    }

    /// Whether members can register for items in this section.
    pub fn supports_registration(&self) -> bool {
        matches!(self, Section::Events)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown section '{0}'. Valid values: events, offers, resources, market-intel, opportunities, updates, access-hubs")]
pub struct ParseSectionError(pub String);

impl FromStr for Section {
    type Err = ParseSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "events" | "event" => Ok(Section::Events),
            "offers" | "offer" => Ok(Section::Offers),
            "resources" | "resource" => Ok(Section::Resources),
            "marketintel" | "marketintelligence" | "intel" => Ok(Section::MarketIntel),
            "opportunities" | "opportunity" | "jobs" => Ok(Section::Opportunities),
            "updates" | "update" => Ok(Section::Updates),
            "accesshubs" | "accesshub" | "hubs" => Ok(Section::AccessHubs),
            _ => Err(ParseSectionError(s.to_string())),
        }
    }
}
