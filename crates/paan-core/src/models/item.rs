use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row identity. Supabase tables key rows by bigint or uuid, so both
/// JSON numbers and strings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Int(id) => write!(f, "{}", id),
            ItemId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Int(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Text(id.to_string())
    }
}

/// Anything that refers to a content item by id.
pub trait Identified {
    fn item_id(&self) -> &ItemId;
}

impl Identified for ItemId {
    fn item_id(&self) -> &ItemId {
        self
    }
}

/// The attributes every portal section shares for gating, counting and ordering.
pub trait ContentItem: Identified {
    fn title(&self) -> &str;

    /// Raw tier label, `None` when the row has no restriction set.
    fn tier_restriction(&self) -> Option<&str>;

    /// Value of the section's grouping field (event type, resource type, ...).
    fn category(&self) -> Option<&str>;

    /// Raw timestamp used for date ordering.
    fn timestamp(&self) -> Option<&str>;

    /// Extra detail shown beside a listed row, as of `now`.
    fn detail(&self, _now: DateTime<Utc>) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_accepts_numbers_and_strings() {
        let ids: Vec<ItemId> = serde_json::from_str(r#"[7, "3f1c2a9e-0000-4000-8000-000000000001"]"#).unwrap();
        assert_eq!(ids[0], ItemId::Int(7));
        assert_eq!(ids[1], ItemId::from("3f1c2a9e-0000-4000-8000-000000000001"));
        assert_eq!(ids[0].to_string(), "7");
    }
}
