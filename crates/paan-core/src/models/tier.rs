use serde::{Deserialize, Serialize};
use tracing::debug;

/// Membership tier as used for content gating.
///
/// The four member tiers are totally ordered
/// (`FreeMember < AssociateMember < FullMember < GoldMember`); `All` is the
/// "no restriction" sentinel and carries no rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CanonicalTier {
    All,
    FreeMember,
    AssociateMember,
    FullMember,
    GoldMember,
}

impl CanonicalTier {
    /// Member tiers from lowest to highest.
    pub const MEMBER_TIERS: [CanonicalTier; 4] = [
        CanonicalTier::FreeMember,
        CanonicalTier::AssociateMember,
        CanonicalTier::FullMember,
        CanonicalTier::GoldMember,
    ];

    /// Numeric rank (0 = Free Member, 3 = Gold Member). `All` has none.
    pub fn order(&self) -> Option<u8> {
        match self {
            CanonicalTier::All => None,
            CanonicalTier::FreeMember => Some(0),
            CanonicalTier::AssociateMember => Some(1),
            CanonicalTier::FullMember => Some(2),
            CanonicalTier::GoldMember => Some(3),
        }
    }

    /// Canonical label. Feeding it back to [`normalize_tier`] yields the same tier.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalTier::All => "All",
            CanonicalTier::FreeMember => "Free Member",
            CanonicalTier::AssociateMember => "Associate Member",
            CanonicalTier::FullMember => "Full Member",
            CanonicalTier::GoldMember => "Gold Member",
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, CanonicalTier::All)
    }

    /// The next tier up, if any. Used for "upgrade to ..." hints.
    pub fn next(&self) -> Option<Self> {
        match self {
            CanonicalTier::All | CanonicalTier::GoldMember => None,
            CanonicalTier::FreeMember => Some(CanonicalTier::AssociateMember),
            CanonicalTier::AssociateMember => Some(CanonicalTier::FullMember),
            CanonicalTier::FullMember => Some(CanonicalTier::GoldMember),
        }
    }
}

impl Default for CanonicalTier {
    fn default() -> Self {
        DEFAULT_TIER
    }
}

impl std::fmt::Display for CanonicalTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<CanonicalTier> for String {
    fn from(tier: CanonicalTier) -> Self {
        tier.label().to_string()
    }
}

impl From<String> for CanonicalTier {
    fn from(raw: String) -> Self {
        normalize_tier(Some(&raw))
    }
}

/// Tier assumed for missing or unrecognized labels, for users and content alike.
pub const DEFAULT_TIER: CanonicalTier = CanonicalTier::FreeMember;

/// Base labels content editors and profiles are known to use, keyed by the
/// cleaned form produced by [`clean_label`]. A trailing `(tier N)` marker is
/// split off before lookup; see [`split_tier_marker`].
const TIER_LABELS: &[(&str, CanonicalTier)] = &[
    // Unrestricted
    ("all", CanonicalTier::All),
    ("all members", CanonicalTier::All),
    ("all tiers", CanonicalTier::All),
    // Free
    ("free", CanonicalTier::FreeMember),
    ("free member", CanonicalTier::FreeMember),
    ("free members", CanonicalTier::FreeMember),
    ("free plan", CanonicalTier::FreeMember),
    // Associate
    ("associate", CanonicalTier::AssociateMember),
    ("associate member", CanonicalTier::AssociateMember),
    ("associate members", CanonicalTier::AssociateMember),
    // Full
    ("full", CanonicalTier::FullMember),
    ("full member", CanonicalTier::FullMember),
    ("full members", CanonicalTier::FullMember),
    // Gold
    ("gold", CanonicalTier::GoldMember),
    ("gold member", CanonicalTier::GoldMember),
    ("gold members", CanonicalTier::GoldMember),
    ("founding agency", CanonicalTier::GoldMember),
    ("founding agencies", CanonicalTier::GoldMember),
    ("founding member", CanonicalTier::GoldMember),
    ("founding members", CanonicalTier::GoldMember),
];

/// Legacy numbering: tier 1 is the top of the ladder.
fn tier_for_number(number: u8) -> Option<CanonicalTier> {
    match number {
        1 => Some(CanonicalTier::GoldMember),
        2 => Some(CanonicalTier::FullMember),
        3 => Some(CanonicalTier::AssociateMember),
        4 => Some(CanonicalTier::FreeMember),
        _ => None,
    }
}

/// Parse `tier N` / `tierN` from a cleaned label fragment.
fn parse_tier_number(text: &str) -> Option<CanonicalTier> {
    let number = text.trim().strip_prefix("tier")?.trim();
    tier_for_number(number.parse().ok()?)
}

/// Split a cleaned label into its base and an optional `(tier N)` marker,
/// with or without a space before the parenthesis.
fn split_tier_marker(key: &str) -> (&str, Option<CanonicalTier>) {
    if let Some(inner) = key.strip_suffix(')') {
        if let Some(open) = inner.rfind('(') {
            if let Some(tier) = parse_tier_number(&inner[open + 1..]) {
                return (inner[..open].trim_end(), Some(tier));
            }
        }
    }
    (key, None)
}

/// Trim, lowercase and collapse runs of whitespace.
fn clean_label(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

fn lookup(key: &str) -> Option<CanonicalTier> {
    let (base, marker) = split_tier_marker(key);
    let named = TIER_LABELS
        .iter()
        .find(|(label, _)| *label == base)
        .map(|(_, tier)| *tier);

    named.or(marker).or_else(|| parse_tier_number(base))
}

/// Map arbitrary tier text to its canonical tier.
///
/// A known base label decides; otherwise a `(tier N)` marker does, so an
/// unfamiliar name never drops numbered content to the default. Total: missing, empty and unrecognized labels all map to
/// [`DEFAULT_TIER`].
pub fn normalize_tier(raw: Option<&str>) -> CanonicalTier {
    let Some(raw) = raw else {
        return DEFAULT_TIER;
    };
    let key = clean_label(raw);
    if key.is_empty() {
        return DEFAULT_TIER;
    }

    match lookup(&key) {
        Some(tier) => tier,
        None => {
            debug!(label = %raw, default = %DEFAULT_TIER, "Unrecognized tier label");
            DEFAULT_TIER
        }
    }
}

/// Rank of a user's tier. A user labelled `All` has no privileges beyond
/// the lowest tier.
pub fn user_tier_order(raw: Option<&str>) -> u8 {
    normalize_tier(raw).order().unwrap_or(0)
}
