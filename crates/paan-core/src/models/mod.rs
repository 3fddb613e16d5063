//! Data models for PAAN portal entities.
//!
//! - `CanonicalTier` and tier normalization
//! - `User`: member profile carrying the selected tier
//! - Section rows: `Event`, `Offer`, `Resource`, `MarketIntel`,
//!   `Opportunity`, `Update`, `AccessHub`
//! - `Registration`: event registrations used for the "Registered" filter
//! - `ContentItem` / `Identified`: the shared view the access, stats and
//!   pipeline modules work against

pub mod content;
pub mod event;
pub mod item;
pub mod tier;
pub mod user;

pub use content::{AccessHub, MarketIntel, Offer, Opportunity, Resource, Update};
pub use event::{Event, Registration};
pub use item::{ContentItem, Identified, ItemId};
pub use tier::{normalize_tier, user_tier_order, CanonicalTier, DEFAULT_TIER};
pub use user::User;
