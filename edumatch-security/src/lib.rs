//! EduMatch Security
//!
//! The two pieces of client-side security logic in EduMatch:
//! - [`sanitize`]: strips script-injection patterns from free text and bounds its length
//! - [`session`]: checks the persisted session for expiry and role before a protected view opens
//!
//! They share no state and can be used independently.

pub mod auth;
pub mod sanitize;
pub mod session;

pub use auth::Role;
pub use sanitize::{sanitize, Sanitizer};
pub use session::{
    login, logout, DenialReason, FileSessionStore, GuardDecision, MemorySessionStore,
    SessionGuard, SessionRecord, SessionStore,
};
