//! Counters for a section's filter/stats bar.
//!
//! Every section shows the same mandatory buckets (total, available,
//! restricted, categories, and registered when registrations are known),
//! followed by one bucket per category value present in the list. Each
//! bucket names the filter that reproduces it, so the page can hand a
//! clicked bucket straight to [`crate::pipeline::filter_and_sort`].

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access::AccessEvaluator;
use crate::models::{ContentItem, Identified, ItemId, User};
use crate::utils::cmp_ignore_case;

/// Fixed bucket palette, indexed by bucket position.
pub const PALETTE: [&str; 10] = [
    "#2563EB", // blue
    "#16A34A", // green
    "#DC2626", // red
    "#9333EA", // purple
    "#EA580C", // orange
    "#0891B2", // cyan
    "#DB2777", // pink
    "#CA8A04", // amber
    "#4F46E5", // indigo
    "#0D9488", // teal
];

/// Hue step for buckets past the palette. Coprime with 360, so the first
/// 360 generated hues are all different.
const HUE_STEP: u32 = 137;

/// Colour of the bucket at `index`: the palette first, then generated hues.
/// Each 360-hue cycle drops the lightness a step.
pub fn bucket_color(index: usize) -> String {
    if let Some(color) = PALETTE.get(index) {
        return color.to_string();
    }
    let n = (index - PALETTE.len()) as u32;
    let hue = (n * HUE_STEP) % 360;
    let lightness = 0.45 - 0.05 * ((n / 360) % 5) as f64;
    hsl_to_hex(hue as f64, 0.65, lightness)
}

fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round() as u8;
    format!("#{:02X}{:02X}{:02X}", channel(r), channel(g), channel(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum StatsFilter {
    Total,
    Available,
    Restricted,
    Categories,
    Registered,
}

impl StatsFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsFilter::Total => "total",
            StatsFilter::Available => "available",
            StatsFilter::Restricted => "restricted",
            StatsFilter::Categories => "categories",
            StatsFilter::Registered => "registered",
        }
    }
}

impl std::fmt::Display for StatsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown stats filter '{0}'. Valid values: total, available, restricted, categories, registered")]
pub struct ParseFilterError(pub String);

impl FromStr for StatsFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total" | "all" => Ok(StatsFilter::Total),
            "available" => Ok(StatsFilter::Available),
            "restricted" | "locked" => Ok(StatsFilter::Restricted),
            "categories" | "category" => Ok(StatsFilter::Categories),
            "registered" => Ok(StatsFilter::Registered),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

/// One counter in the stats bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StatBucket {
    pub filter: StatsFilter,
    /// Set on per-category buckets; `None` on the summary buckets.
    pub category: Option<String>,
    pub label: String,
    pub count: usize,
    pub color: String,
}

/// Collect the ids of registered items for membership checks.
pub fn registered_ids<R: Identified>(registered: &[R]) -> HashSet<ItemId> {
    registered.iter().map(|r| r.item_id().clone()).collect()
}

/// Trimmed, non-empty category of an item.
pub(crate) fn clean_category<T: ContentItem + ?Sized>(item: &T) -> Option<&str> {
    item.category().map(str::trim).filter(|c| !c.is_empty())
}

/// Distinct non-empty category values in first-seen order. Values differing
/// only by case count once, keeping the first spelling seen.
pub fn distinct_categories<T: ContentItem>(items: &[T]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(clean_category)
        .filter(|c| seen.insert(c.to_lowercase()))
        .collect()
}

/// Compute the stats bar for a section.
///
/// `categories` orders the per-category buckets; values present in `items`
/// but not listed follow alphabetically. Listed labels with no matching
/// items get no bucket.
pub fn compute_stats<T: ContentItem>(
    items: &[T],
    user: Option<&User>,
    categories: &[&str],
    section_name: &str,
    registered: Option<&HashSet<ItemId>>,
) -> Vec<StatBucket> {
    let access = AccessEvaluator::for_user(user);
    let available = items.iter().filter(|item| access.allows_item(*item)).count();
    let found = distinct_categories(items);

    let mut counts: Vec<(StatsFilter, Option<String>, String, usize)> = vec![
        (StatsFilter::Total, None, format!("Total {}", section_name), items.len()),
        (StatsFilter::Available, None, "Available".to_string(), available),
        (StatsFilter::Restricted, None, "Restricted".to_string(), items.len() - available),
        (StatsFilter::Categories, None, "Categories".to_string(), found.len()),
    ];

    if let Some(ids) = registered {
        let count = items.iter().filter(|item| ids.contains(item.item_id())).count();
        counts.push((StatsFilter::Registered, None, "Registered".to_string(), count));
    }

    for category in order_categories(&found, categories) {
        let count = items
            .iter()
            .filter(|item| {
                clean_category(*item)
                    .map(|c| c.eq_ignore_ascii_case(category))
                    .unwrap_or(false)
            })
            .count();
        counts.push((
            StatsFilter::Categories,
            Some(category.to_string()),
            category.to_string(),
            count,
        ));
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, (filter, category, label, count))| StatBucket {
            filter,
            category,
            label,
            count,
            color: bucket_color(i),
        })
        .collect()
}

/// Listed labels that occur in `found` (in list order, using the listed
/// spelling), then the remaining found values alphabetically.
fn order_categories<'a>(found: &[&'a str], listed: &[&'a str]) -> Vec<&'a str> {
    let mut ordered: Vec<&str> = Vec::with_capacity(found.len());
    for &label in listed {
        let label = label.trim();
        let present = found.iter().any(|f| f.eq_ignore_ascii_case(label));
        let duplicate = ordered.iter().any(|o| o.eq_ignore_ascii_case(label));
        if present && !duplicate {
            ordered.push(label);
        }
    }

    let mut rest: Vec<&str> = found
        .iter()
        .copied()
        .filter(|f| !ordered.iter().any(|o| o.eq_ignore_ascii_case(f)))
        .collect();
    rest.sort_by(|a, b| cmp_ignore_case(a, b));
    ordered.extend(rest);
    ordered
}
