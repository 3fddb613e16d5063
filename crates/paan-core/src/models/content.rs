//! Row models for the non-event portal sections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{ContentItem, Identified, ItemId};
use crate::utils::parse_timestamp;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub offer_type: Option<String>,
    pub discount: Option<String>,
    pub valid_until: Option<String>,
    pub tier_restriction: Option<String>,
    pub created_at: Option<String>,
}

impl Offer {
    /// Offers without an end date never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until
            .as_deref()
            .and_then(parse_timestamp)
            .map(|until| until < now)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub resource_type: Option<String>,
    pub file_url: Option<String>,
    pub tier_restriction: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketIntel {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub intel_type: Option<String>,
    pub region: Option<String>,
    pub tier_restriction: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: ItemId,
    pub title: String,
    pub organization_name: Option<String>,
    pub description: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub deadline: Option<String>,
    pub tier_restriction: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub id: ItemId,
    pub title: String,
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub tier_restriction: Option<String>,
    pub created_at: Option<String>,
}

impl Update {
    /// First non-blank tag; updates are grouped by it.
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags
            .iter()
            .map(|t| t.trim())
            .find(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessHub {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub hub_type: Option<String>,
    pub url: Option<String>,
    pub tier_restriction: Option<String>,
    pub created_at: Option<String>,
}

impl Identified for Offer {
    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

impl ContentItem for Offer {
    fn title(&self) -> &str {
        &self.title
    }
    fn tier_restriction(&self) -> Option<&str> {
        self.tier_restriction.as_deref()
    }
    fn category(&self) -> Option<&str> {
        self.offer_type.as_deref()
    }
    fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn detail(&self, now: DateTime<Utc>) -> Option<String> {
        if self.is_expired(now) {
            return Some("expired".to_string());
        }
        self.discount.clone()
    }
}

impl Identified for Resource {
    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

impl ContentItem for Resource {
    fn title(&self) -> &str {
        &self.title
    }
    fn tier_restriction(&self) -> Option<&str> {
        self.tier_restriction.as_deref()
    }
    fn category(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }
    fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

impl Identified for MarketIntel {
    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

impl ContentItem for MarketIntel {
    fn title(&self) -> &str {
        &self.title
    }
    fn tier_restriction(&self) -> Option<&str> {
        self.tier_restriction.as_deref()
    }
    fn category(&self) -> Option<&str> {
        self.intel_type.as_deref()
    }
    fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

impl Identified for Opportunity {
    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

impl ContentItem for Opportunity {
    fn title(&self) -> &str {
        &self.title
    }
    fn tier_restriction(&self) -> Option<&str> {
        self.tier_restriction.as_deref()
    }
    fn category(&self) -> Option<&str> {
        self.job_type.as_deref()
    }
    fn timestamp(&self) -> Option<&str> {
        self.deadline.as_deref()
    }
}

impl Identified for Update {
    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

impl ContentItem for Update {
    fn title(&self) -> &str {
        &self.title
    }
    fn tier_restriction(&self) -> Option<&str> {
        self.tier_restriction.as_deref()
    }
    fn category(&self) -> Option<&str> {
        self.primary_tag()
    }
    fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

impl Identified for AccessHub {
    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

impl ContentItem for AccessHub {
    fn title(&self) -> &str {
        &self.title
    }
    fn tier_restriction(&self) -> Option<&str> {
        self.tier_restriction.as_deref()
    }
    fn category(&self) -> Option<&str> {
        self.hub_type.as_deref()
    }
    fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}
