//! Tier-based content gating.
//!
//! Content carries a minimum tier (`tier_restriction`); a member sees it when
//! their own tier ranks at or above it. The `All` sentinel opens content to
//! everyone, and missing or unknown labels fall back to Free Member.
//!
//! ```rust,ignore
//! use paan_core::access::AccessEvaluator;
//!
//! let access = AccessEvaluator::for_user(Some(&user));
//! let unlocked = events.iter().filter(|e| access.allows_item(*e)).count();
//! ```

use serde::Serialize;

use crate::models::{normalize_tier, CanonicalTier, ContentItem, User};

/// Whether `user` may access content restricted to `content_tier`.
pub fn has_tier_access(content_tier: Option<&str>, user: Option<&User>) -> bool {
    AccessEvaluator::for_user(user).allows(content_tier)
}

/// Outcome of a single access check, with enough context to explain a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub accessible: bool,
    pub required: CanonicalTier,
    pub user_tier: CanonicalTier,
}

impl AccessDecision {
    /// Short reason shown on a locked card, e.g. "Requires Gold Member".
    pub fn lock_reason(&self) -> Option<String> {
        if self.accessible {
            None
        } else {
            Some(format!("Requires {}", self.required))
        }
    }
}

/// Access check bound to one member's tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessEvaluator {
    user_tier: CanonicalTier,
    user_order: u8,
}

impl AccessEvaluator {
    /// Evaluator for a (possibly absent) user; no user means Free Member.
    pub fn for_user(user: Option<&User>) -> Self {
        Self::for_tier(user.and_then(|u| u.selected_tier.as_deref()))
    }

    /// Evaluator for a raw tier label.
    pub fn for_tier(raw: Option<&str>) -> Self {
        let user_tier = normalize_tier(raw);
        Self {
            user_tier,
            user_order: user_tier.order().unwrap_or(0),
        }
    }

    pub fn user_tier(&self) -> CanonicalTier {
        self.user_tier
    }

    pub fn allows(&self, content_tier: Option<&str>) -> bool {
        self.decide(content_tier).accessible
    }

    pub fn allows_item<T: ContentItem + ?Sized>(&self, item: &T) -> bool {
        self.allows(item.tier_restriction())
    }

    pub fn decide(&self, content_tier: Option<&str>) -> AccessDecision {
        let required = normalize_tier(content_tier);
        let accessible =
            required.is_unrestricted() || self.user_order >= required.order().unwrap_or(0);
        AccessDecision {
            accessible,
            required,
            user_tier: self.user_tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user_tier_order;
    use proptest::prelude::*;

    const LABELS: [&str; 5] = ["All", "Free Member", "Associate Member", "Full Member", "Gold Member"];

    #[test]
    fn test_exact_tier_is_granted() {
        for tier in CanonicalTier::MEMBER_TIERS {
            let user = User::with_tier(tier.label());
            assert!(has_tier_access(Some(tier.label()), Some(&user)), "{} denied", tier);
        }
    }

    #[test]
    fn test_pairwise_ordering() {
        for user_tier in CanonicalTier::MEMBER_TIERS {
            for content_tier in CanonicalTier::MEMBER_TIERS {
                let user = User::with_tier(user_tier.label());
                let expected = user_tier.order() >= content_tier.order();
                assert_eq!(
                    has_tier_access(Some(content_tier.label()), Some(&user)),
                    expected,
                    "user {} / content {}",
                    user_tier,
                    content_tier
                );
            }
        }
    }

    #[test]
    fn test_all_is_always_granted() {
        assert!(has_tier_access(Some("All"), None));
        assert!(has_tier_access(Some("all members"), Some(&User::default())));
        assert!(has_tier_access(Some("All"), Some(&User::with_tier("Gold Member"))));
    }

    #[test]
    fn test_missing_user_is_free_member() {
        let free = User::with_tier("Free Member");
        for label in LABELS {
            assert_eq!(has_tier_access(Some(label), None), has_tier_access(Some(label), Some(&free)));
        }
        assert!(has_tier_access(None, None));
        assert!(!has_tier_access(Some("Associate Member"), None));
    }

    #[test]
    fn test_legacy_labels_compare_by_rank() {
        let associate = User::with_tier("Associate Member (Tier 3)");
        assert!(has_tier_access(Some("Free Member (Tier 4)"), Some(&associate)));
        assert!(!has_tier_access(Some("Founding Agency (Tier 1)"), Some(&associate)));
        let founding = User::with_tier("Founding Agency (Tier 1)");
        assert!(has_tier_access(Some("Gold Member"), Some(&founding)));
    }

    #[test]
    fn test_evaluator_rank_matches_user_tier_order() {
        for label in ["All", "Free Member", "Gold Members (Tier 1)", "Platinum Partner", "full"] {
            let access = AccessEvaluator::for_tier(Some(label));
            assert_eq!(access.user_tier(), normalize_tier(Some(label)));
            assert_eq!(access.user_order, user_tier_order(Some(label)), "{}", label);
        }
        let all = AccessEvaluator::for_tier(Some("All"));
        assert!(!all.allows(Some("Associate Member")));
        assert!(all.allows(Some("Free Member")));
    }

    #[test]
    fn test_decision_lock_reason() {
        let access = AccessEvaluator::for_tier(Some("Associate Member"));
        let locked = access.decide(Some("Gold Member"));
        assert!(!locked.accessible);
        assert_eq!(locked.required, CanonicalTier::GoldMember);
        assert_eq!(locked.user_tier, CanonicalTier::AssociateMember);
        assert_eq!(locked.lock_reason().as_deref(), Some("Requires Gold Member"));
        assert_eq!(access.decide(Some("All")).lock_reason(), None);
    }

    proptest! {
        #[test]
        fn prop_null_user_matches_free_member(content in proptest::option::of(".{0,24}")) {
            let free = User::with_tier("Free Member");
            prop_assert_eq!(
                has_tier_access(content.as_deref(), None),
                has_tier_access(content.as_deref(), Some(&free))
            );
        }

        #[test]
        fn prop_normalize_is_idempotent(raw in proptest::option::of(".{0,24}")) {
            let once = normalize_tier(raw.as_deref());
            prop_assert_eq!(normalize_tier(Some(once.label())), once);
        }

        #[test]
        fn prop_all_grants_any_user(user in proptest::option::of(".{0,24}")) {
            let access = AccessEvaluator::for_tier(user.as_deref());
            prop_assert!(access.allows(Some("All")));
        }
    }
}
