//! REST client module for the portal's Supabase backend.
//!
//! Content tables are read through PostgREST (`/rest/v1`) and members sign
//! in through GoTrue (`/auth/v1`). Every request carries the project's anon
//! key; signed-in requests additionally carry the member's access token.

pub mod client;
pub mod error;

pub use client::SupabaseClient;
pub use error::ApiError;
