//! Member session management.
//!
//! `Session` persists the Supabase access token between CLI runs. Tokens
//! carry their own lifetime (`expires_in`, one hour by default) and expired
//! sessions are ignored on load.

pub mod session;

pub use session::{Session, SessionData};
