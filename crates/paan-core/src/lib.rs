//! Core library for the PAAN member portal.
//!
//! Decides what a member can see and how each section's list is counted
//! and ordered:
//!
//! - [`models`]: tier normalization, member profile, section rows
//! - [`access`]: tier gating (`has_tier_access`, `AccessEvaluator`)
//! - [`stats`]: stats bar buckets (`compute_stats`)
//! - [`pipeline`]: filter + accessible-first ordering (`filter_and_sort`)
//! - [`sections`]: per-section name, table, categories and sort key
//! - [`api`] / [`auth`]: Supabase REST client and persisted sessions
//!
//! The gating, stats and pipeline functions are pure: they never fail and
//! never mutate their inputs, so callers simply re-run them whenever the
//! item list, the member or the selected filter changes.

pub mod access;
pub mod api;
pub mod auth;
pub mod models;
pub mod pipeline;
pub mod sections;
pub mod stats;
pub mod utils;

pub use access::{has_tier_access, AccessDecision, AccessEvaluator};
pub use models::{normalize_tier, CanonicalTier, ContentItem, Identified, ItemId, User};
pub use pipeline::{filter_and_sort, search, SortKey};
pub use sections::Section;
pub use stats::{compute_stats, registered_ids, StatBucket, StatsFilter};
