//! Session management
//!
//! Session records, the slot they live in, and the guard that checks them.

pub mod guard;
pub mod manager;
pub mod storage;
pub mod types;

pub use guard::{DenialReason, GuardDecision, SessionGuard};
pub use manager::{login, logout};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore};
pub use types::SessionRecord;
