use serde::{Deserialize, Serialize};

use super::tier::{normalize_tier, CanonicalTier};

/// Member profile (`profiles` row). Only the tier matters for gating.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub selected_tier: Option<String>,
    pub job_type: Option<String>,
}

impl User {
    /// A bare user holding only a tier label.
    pub fn with_tier(tier: &str) -> Self {
        Self {
            selected_tier: Some(tier.to_string()),
            ..Self::default()
        }
    }

    pub fn tier(&self) -> CanonicalTier {
        normalize_tier(self.selected_tier.as_deref())
    }

    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Member")
    }
}
