use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{ContentItem, Identified, ItemId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
    pub tier_restriction: Option<String>,
    pub registration_link: Option<String>,
    pub created_at: Option<String>,
}

impl Event {
    pub fn venue(&self) -> &str {
        if self.is_virtual {
            return "Virtual";
        }
        self.location.as_deref().unwrap_or("-")
    }
}

impl Identified for Event {
    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

impl ContentItem for Event {
    fn title(&self) -> &str {
        &self.title
    }

    fn tier_restriction(&self) -> Option<&str> {
        self.tier_restriction.as_deref()
    }

    fn category(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    fn timestamp(&self) -> Option<&str> {
        self.start_date.as_deref()
    }

    fn detail(&self, _now: DateTime<Utc>) -> Option<String> {
        Some(self.venue().to_string())
    }
}

/// A member's registration for an event (`event_registrations` row).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: ItemId,
    pub user_id: String,
    pub event_id: ItemId,
    pub created_at: Option<String>,
}

impl Identified for Registration {
    fn item_id(&self) -> &ItemId {
        &self.event_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> Event {
        serde_json::from_str(
            r#"{
                "id": 12,
                "title": "Lagos Creative Summit",
                "description": null,
                "event_type": "Conference",
                "start_date": "2025-06-10T09:00:00+00:00",
                "end_date": null,
                "location": "Lagos",
                "tier_restriction": "Full Member",
                "registration_link": null,
                "created_at": "2025-01-02T00:00:00+00:00"
            }"#,
        )
        .expect("Failed to parse event test JSON")
    }

    #[test]
    fn test_event_parses_supabase_row() {
        let event = sample_event();
        assert_eq!(event.id, ItemId::Int(12));
        assert!(!event.is_virtual);
        assert_eq!(event.category(), Some("Conference"));
        assert_eq!(event.tier_restriction(), Some("Full Member"));
        assert_eq!(event.venue(), "Lagos");
    }

    #[test]
    fn test_event_detail_is_venue() {
        let event = sample_event();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(event.detail(now).as_deref(), Some("Lagos"));

        let online = Event { is_virtual: true, start_date: None, ..event };
        assert_eq!(online.detail(now).as_deref(), Some("Virtual"));
    }

    #[test]
    fn test_registration_identifies_event() {
        let reg: Registration = serde_json::from_str(
            r#"{"id": 1, "user_id": "u-1", "event_id": 12, "created_at": null}"#,
        )
        .unwrap();
        assert_eq!(reg.item_id(), &ItemId::Int(12));
    }
}
