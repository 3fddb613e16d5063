//! Plain-text and JSON output for the stats bar and section lists.

use chrono::{DateTime, Utc};
use paan_core::access::AccessEvaluator;
use paan_core::models::{normalize_tier, CanonicalTier, ContentItem};
use paan_core::utils::{format_date, truncate};
use paan_core::{Section, StatBucket};
use serde::Serialize;

/// Width of the title column in list output
const TITLE_WIDTH: usize = 40;

/// Width of the label column in stats output
const LABEL_WIDTH: usize = 28;

/// One listed item with its gating state, for `--json` output.
#[derive(Serialize)]
pub struct ListedItem<'a, T: Serialize> {
    pub accessible: bool,
    pub required_tier: CanonicalTier,
    #[serde(flatten)]
    pub item: &'a T,
}

pub fn listed_items<'a, T: ContentItem + Serialize>(
    items: &[&'a T],
    access: &AccessEvaluator,
) -> Vec<ListedItem<'a, T>> {
    items
        .iter()
        .map(|item| ListedItem {
            accessible: access.allows_item(*item),
            required_tier: normalize_tier(item.tier_restriction()),
            item: *item,
        })
        .collect()
}

pub fn bucket_line(bucket: &StatBucket) -> String {
    let label = match bucket.category {
        Some(_) => format!("  {}", bucket.label),
        None => bucket.label.clone(),
    };
    format!("{:<width$} {:>5}", truncate(&label, LABEL_WIDTH), bucket.count, width = LABEL_WIDTH)
}

pub fn stats_header(section: Section, tier: CanonicalTier, member: Option<&str>) -> String {
    match member {
        Some(name) => format!("{} (viewing as {}, {})", section, name, tier),
        None => format!("{} (viewing as {})", section, tier),
    }
}

pub fn print_stats(section: Section, tier: CanonicalTier, member: Option<&str>, buckets: &[StatBucket]) {
    println!("{}", stats_header(section, tier, member));
    let mut shown_category_header = false;
    for bucket in buckets {
        if bucket.category.is_some() && !shown_category_header {
            println!("By category:");
            shown_category_header = true;
        }
        println!("{}", bucket_line(bucket));
    }
}

pub fn item_line<T: ContentItem + ?Sized>(item: &T, access: &AccessEvaluator, now: DateTime<Utc>) -> String {
    let decision = access.decide(item.tier_restriction());
    let marker = if decision.accessible { "open" } else { "lock" };
    let date = item.timestamp().map(format_date).unwrap_or_else(|| "-".to_string());
    let category = item.category().unwrap_or("-");
    let mut line = format!(
        "[{}] {:<12} {:<width$} {}",
        marker,
        date,
        truncate(item.title(), TITLE_WIDTH),
        category,
        width = TITLE_WIDTH
    );
    if let Some(detail) = item.detail(now) {
        line.push_str(&format!(" | {}", detail));
    }
    if let Some(reason) = decision.lock_reason() {
        line.push_str(&format!("  ({})", reason));
    }
    line
}

pub fn print_list<T: ContentItem>(section: Section, items: &[&T], access: &AccessEvaluator) {
    if items.is_empty() {
        println!("No {} match the current filter.", section.title().to_lowercase());
        return;
    }
    let now = Utc::now();
    for item in items {
        println!("{}", item_line(*item, access, now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use paan_core::models::{Event, ItemId, Offer, User};
    use paan_core::StatsFilter;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn event(tier: &str) -> Event {
        Event {
            id: ItemId::Int(1),
            title: "Lagos Creative Summit".to_string(),
            description: None,
            event_type: Some("Conference".to_string()),
            start_date: Some("2025-06-10T09:00:00Z".to_string()),
            end_date: None,
            location: None,
            is_virtual: true,
            tier_restriction: Some(tier.to_string()),
            registration_link: None,
            created_at: None,
        }
    }

    #[test]
    fn test_item_line_shows_lock_reason() {
        let access = AccessEvaluator::for_tier(Some("Free Member"));
        let locked = item_line(&event("Gold Member"), &access, now());
        assert!(locked.starts_with("[lock] Jun 10, 2025"));
        assert!(locked.ends_with("Conference | Virtual  (Requires Gold Member)"));

        let open = item_line(&event("All"), &access, now());
        assert!(open.starts_with("[open]"));
        assert!(!open.contains("Requires"));
    }

    #[test]
    fn test_item_line_marks_expired_offers() {
        let offer = Offer {
            id: ItemId::Int(4),
            title: "Figma seats".to_string(),
            description: None,
            offer_type: Some("Software".to_string()),
            discount: Some("20%".to_string()),
            valid_until: Some("2025-05-01".to_string()),
            tier_restriction: None,
            created_at: None,
        };
        let access = AccessEvaluator::for_tier(None);
        assert!(item_line(&offer, &access, now()).ends_with("Software | expired"));
    }

    #[test]
    fn test_stats_header_names_member() {
        let user = User {
            full_name: Some("Ada Obi".to_string()),
            ..User::with_tier("Full Member")
        };
        assert_eq!(
            stats_header(Section::Events, user.tier(), Some(user.display_name())),
            "Events (viewing as Ada Obi, Full Member)"
        );
        assert_eq!(
            stats_header(Section::Offers, CanonicalTier::FreeMember, None),
            "Offers (viewing as Free Member)"
        );
    }

    #[test]
    fn test_bucket_line_indents_categories() {
        let bucket = StatBucket {
            filter: StatsFilter::Categories,
            category: Some("Webinar".to_string()),
            label: "Webinar".to_string(),
            count: 3,
            color: "#000000".to_string(),
        };
        let line = bucket_line(&bucket);
        assert!(line.starts_with("  Webinar"));
        assert!(line.ends_with("    3"));
    }

    #[test]
    fn test_listed_items_json() {
        let access = AccessEvaluator::for_tier(Some("Full Member"));
        let e = event("Gold Member");
        let listed = listed_items(&[&e], &access);
        let json = serde_json::to_value(&listed).unwrap();
        assert_eq!(json[0]["accessible"], false);
        assert_eq!(json[0]["required_tier"], "Gold Member");
        assert_eq!(json[0]["title"], "Lagos Creative Summit");
    }
}
