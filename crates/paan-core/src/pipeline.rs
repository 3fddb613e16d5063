//! Filtering and ordering of a section's item list.
//!
//! Every section renders the list the same way: apply the selected stats
//! filter, then put accessible items before restricted ones and order each
//! group by the section's secondary key.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access::AccessEvaluator;
use crate::models::{ContentItem, ItemId, User};
use crate::stats::{clean_category, StatsFilter};
use crate::utils::{cmp_ignore_case, contains_ignore_case, parse_timestamp};

/// Secondary ordering within the accessible/restricted groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum SortKey {
    /// Soonest first (events)
    #[default]
    DateAsc,
    /// Newest first (updates, offers, feeds)
    DateDesc,
    /// By title (market intelligence, opportunities)
    Lexical,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sort key '{0}'. Valid values: dateAsc, dateDesc, lexical")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "dateasc" | "date" | "soonest" => Ok(SortKey::DateAsc),
            "datedesc" | "newest" => Ok(SortKey::DateDesc),
            "lexical" | "title" | "name" => Ok(SortKey::Lexical),
            _ => Err(ParseSortKeyError(s.to_string())),
        }
    }
}

/// Items to render for the selected filter, accessible items first.
///
/// - `Categories` with no (or a blank) `selected_category` behaves like `Total`.
/// - `Registered` without a registration set yields nothing.
///
/// The input slice is left untouched; the result borrows from it.
pub fn filter_and_sort<'a, T: ContentItem>(
    items: &'a [T],
    filter: StatsFilter,
    selected_category: Option<&str>,
    user: Option<&User>,
    registered: Option<&HashSet<ItemId>>,
    sort_key: SortKey,
) -> Vec<&'a T> {
    let access = AccessEvaluator::for_user(user);
    let selected_category = selected_category.map(str::trim).filter(|c| !c.is_empty());

    let mut rows: Vec<(bool, Option<DateTime<Utc>>, &T)> = items
        .iter()
        .map(|item| {
            let accessible = access.allows_item(item);
            let when = match sort_key {
                SortKey::Lexical => None,
                SortKey::DateAsc | SortKey::DateDesc => item.timestamp().and_then(parse_timestamp),
            };
            (accessible, when, item)
        })
        .collect();

    rows.retain(|(accessible, _, item)| match filter {
        StatsFilter::Total => true,
        StatsFilter::Available => *accessible,
        StatsFilter::Restricted => !*accessible,
        StatsFilter::Categories => match selected_category {
            Some(selected) => clean_category(*item)
                .map(|c| c.eq_ignore_ascii_case(selected))
                .unwrap_or(false),
            None => true,
        },
        StatsFilter::Registered => registered
            .map(|ids| ids.contains(item.item_id()))
            .unwrap_or(false),
    });

    // Stable: equal rows keep their input order
    rows.sort_by(|(acc_a, when_a, a), (acc_b, when_b, b)| {
        acc_b
            .cmp(acc_a)
            .then_with(|| match sort_key {
                SortKey::DateAsc => cmp_dates(when_a, when_b, false),
                SortKey::DateDesc => cmp_dates(when_a, when_b, true),
                SortKey::Lexical => Ordering::Equal,
            })
            .then_with(|| cmp_ignore_case(a.title(), b.title()))
            .then_with(|| a.item_id().cmp(b.item_id()))
    });

    rows.into_iter().map(|(_, _, item)| item).collect()
}

/// Dated items before undated ones regardless of direction.
fn cmp_dates(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>, newest_first: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if newest_first => b.cmp(a),
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Free-text match over title and category. Query should already be lowercased.
pub fn matches_search<T: ContentItem + ?Sized>(item: &T, query: &str) -> bool {
    contains_ignore_case(item.title(), query)
        || item
            .category()
            .map(|c| contains_ignore_case(c, query))
            .unwrap_or(false)
}

/// Narrow an already ordered list by a search box query. Blank queries keep everything.
pub fn search<'a, T: ContentItem>(mut items: Vec<&'a T>, query: &str) -> Vec<&'a T> {
    let query = query.trim().to_lowercase();
    if !query.is_empty() {
        items.retain(|item| matches_search(*item, &query));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use proptest::prelude::*;

    fn event(id: i64, tier: &str, title: &str, start: Option<&str>, event_type: Option<&str>) -> Event {
        Event {
            id: ItemId::Int(id),
            title: title.to_string(),
            description: None,
            event_type: event_type.map(str::to_string),
            start_date: start.map(str::to_string),
            end_date: None,
            location: None,
            is_virtual: false,
            tier_restriction: Some(tier.to_string()),
            registration_link: None,
            created_at: None,
        }
    }

    fn ids(items: &[&Event]) -> Vec<i64> {
        items
            .iter()
            .map(|e| match e.id {
                ItemId::Int(id) => id,
                ItemId::Text(_) => panic!("unexpected text id"),
            })
            .collect()
    }

    fn free_user() -> User {
        User::with_tier("Free Member")
    }

    #[test]
    fn test_accessible_first_scenario() {
        let items = vec![
            event(1, "Gold Member", "", None, None),
            event(2, "Free Member", "", None, None),
        ];
        let user = free_user();
        let result = filter_and_sort(&items, StatsFilter::Total, None, Some(&user), None, SortKey::Lexical);
        assert_eq!(ids(&result), vec![2, 1]);
        // Input untouched
        assert_eq!(items[0].id, ItemId::Int(1));
    }

    #[test]
    fn test_available_and_restricted_filters() {
        let items = vec![
            event(1, "Gold Member", "a", None, None),
            event(2, "Free Member", "b", None, None),
            event(3, "All", "c", None, None),
        ];
        let user = free_user();
        let available = filter_and_sort(&items, StatsFilter::Available, None, Some(&user), None, SortKey::Lexical);
        let restricted = filter_and_sort(&items, StatsFilter::Restricted, None, Some(&user), None, SortKey::Lexical);
        assert_eq!(ids(&available), vec![2, 3]);
        assert_eq!(ids(&restricted), vec![1]);
    }

    #[test]
    fn test_category_filter() {
        let items = vec![
            event(1, "All", "a", None, Some("Webinar")),
            event(2, "All", "b", None, Some(" webinar ")),
            event(3, "All", "c", None, Some("Workshop")),
            event(4, "All", "d", None, None),
        ];
        let webinars = filter_and_sort(&items, StatsFilter::Categories, Some("Webinar"), None, None, SortKey::Lexical);
        assert_eq!(ids(&webinars), vec![1, 2]);

        let everything = filter_and_sort(&items, StatsFilter::Categories, Some(""), None, None, SortKey::Lexical);
        assert_eq!(everything.len(), 4);
        let unselected = filter_and_sort(&items, StatsFilter::Categories, None, None, None, SortKey::Lexical);
        assert_eq!(unselected.len(), 4);
    }

    #[test]
    fn test_registered_filter() {
        let items = vec![
            event(1, "All", "a", None, None),
            event(2, "All", "b", None, None),
        ];
        let registered: HashSet<ItemId> = [ItemId::Int(2)].into_iter().collect();
        let result = filter_and_sort(&items, StatsFilter::Registered, None, None, Some(&registered), SortKey::Lexical);
        assert_eq!(ids(&result), vec![2]);

        let none_known = filter_and_sort(&items, StatsFilter::Registered, None, None, None, SortKey::Lexical);
        assert!(none_known.is_empty());
    }

    #[test]
    fn test_date_ascending_within_partition() {
        let items = vec![
            event(1, "Free Member", "late", Some("2025-09-01"), None),
            event(2, "Gold Member", "locked early", Some("2025-01-01"), None),
            event(3, "Free Member", "undated", None, None),
            event(4, "Free Member", "early", Some("2025-03-01T09:00:00Z"), None),
        ];
        let user = free_user();
        let result = filter_and_sort(&items, StatsFilter::Total, None, Some(&user), None, SortKey::DateAsc);
        assert_eq!(ids(&result), vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_date_descending_within_partition() {
        let items = vec![
            event(1, "All", "old", Some("2024-01-01"), None),
            event(2, "All", "undated", None, None),
            event(3, "All", "new", Some("2025-01-01"), None),
            event(4, "Full Member", "locked newest", Some("2026-01-01"), None),
        ];
        let result = filter_and_sort(&items, StatsFilter::Total, None, None, None, SortKey::DateDesc);
        assert_eq!(ids(&result), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_lexical_ignores_case() {
        let items = vec![
            event(1, "All", "zebra", None, None),
            event(2, "All", "Apple", None, None),
            event(3, "All", "mango", None, None),
        ];
        let result = filter_and_sort(&items, StatsFilter::Total, None, None, None, SortKey::Lexical);
        assert_eq!(ids(&result), vec![2, 3, 1]);
    }

    #[test]
    fn test_search() {
        let items = vec![
            event(1, "All", "Lagos Creative Summit", None, Some("Conference")),
            event(2, "All", "Pitch clinic", None, Some("Workshop")),
        ];
        let all = filter_and_sort(&items, StatsFilter::Total, None, None, None, SortKey::Lexical);
        assert_eq!(ids(&search(all.clone(), "SUMMIT")), vec![1]);
        assert_eq!(ids(&search(all.clone(), "workshop")), vec![2]);
        assert_eq!(search(all, "  ").len(), 2);
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("dateAsc".parse::<SortKey>(), Ok(SortKey::DateAsc));
        assert_eq!("date-desc".parse::<SortKey>(), Ok(SortKey::DateDesc));
        assert_eq!("LEXICAL".parse::<SortKey>(), Ok(SortKey::Lexical));
        assert!("random".parse::<SortKey>().is_err());
        assert_eq!(serde_json::to_string(&SortKey::DateDesc).unwrap(), "\"dateDesc\"");
    }

    const TIERS: [&str; 5] = ["All", "Free Member", "Associate Member", "Full Member", "Gold Member"];

    proptest! {
        #[test]
        fn prop_available_and_restricted_partition_ids(
            tiers in proptest::collection::vec(0usize..TIERS.len(), 0..30),
            user in 0usize..TIERS.len(),
        ) {
            let items: Vec<Event> = tiers
                .iter()
                .enumerate()
                .map(|(i, t)| event(i as i64, TIERS[*t], "x", None, None))
                .collect();
            let user = User::with_tier(TIERS[user]);
            let available: HashSet<i64> =
                ids(&filter_and_sort(&items, StatsFilter::Available, None, Some(&user), None, SortKey::Lexical))
                    .into_iter()
                    .collect();
            let restricted: HashSet<i64> =
                ids(&filter_and_sort(&items, StatsFilter::Restricted, None, Some(&user), None, SortKey::Lexical))
                    .into_iter()
                    .collect();
            prop_assert!(available.is_disjoint(&restricted));
            let union: HashSet<i64> = available.union(&restricted).copied().collect();
            let all: HashSet<i64> = (0..items.len() as i64).collect();
            prop_assert_eq!(union, all);
        }

        #[test]
        fn prop_accessible_always_first(
            tiers in proptest::collection::vec(0usize..TIERS.len(), 0..30),
            user in 0usize..TIERS.len(),
        ) {
            let items: Vec<Event> = tiers
                .iter()
                .enumerate()
                .map(|(i, t)| event(i as i64, TIERS[*t], "x", None, None))
                .collect();
            let user = User::with_tier(TIERS[user]);
            let access = AccessEvaluator::for_user(Some(&user));
            let result = filter_and_sort(&items, StatsFilter::Total, None, Some(&user), None, SortKey::DateDesc);
            let flags: Vec<bool> = result.iter().map(|e| access.allows_item(*e)).collect();
            prop_assert!(flags.windows(2).all(|w| w[0] || !w[1]));
        }
    }
}
