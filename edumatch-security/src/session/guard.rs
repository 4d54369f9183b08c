//! Session Guard
//!
//! Decides whether the caller may enter a protected view. Every failure mode
//! (no record, unreadable record, expiry, insufficient role) resolves to a
//! denial that sends the caller to the login path; nothing is returned as an
//! error.

use super::storage::SessionStore;
use super::types::SessionRecord;
use crate::auth::Role;
use chrono::{DateTime, Duration, Utc};
use edumatch_core::SessionConfig;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Why a check was denied. Callers all redirect the same way; the reason is
/// for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenialReason {
    NoSession,
    Malformed,
    Expired,
    InsufficientRole { required: Role, actual: Role },
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenialReason::NoSession => write!(f, "no session"),
            DenialReason::Malformed => write!(f, "malformed session"),
            DenialReason::Expired => write!(f, "session expired"),
            DenialReason::InsufficientRole { required, actual } => {
                write!(f, "role {} does not meet {}", actual, required)
            }
        }
    }
}

/// Outcome of one guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Authorized(SessionRecord),
    Denied {
        reason: DenialReason,
        redirect_to: String,
    },
}

impl GuardDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GuardDecision::Authorized(_))
    }

    /// Navigation target on denial
    pub fn redirect(&self) -> Option<&str> {
        match self {
            GuardDecision::Authorized(_) => None,
            GuardDecision::Denied { redirect_to, .. } => Some(redirect_to.as_str()),
        }
    }

    pub fn session(&self) -> Option<&SessionRecord> {
        match self {
            GuardDecision::Authorized(record) => Some(record),
            GuardDecision::Denied { .. } => None,
        }
    }

    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            GuardDecision::Authorized(_) => None,
            GuardDecision::Denied { reason, .. } => Some(*reason),
        }
    }
}

/// Gate for protected views, reading the session from an injected store
pub struct SessionGuard<S> {
    store: S,
    ttl: Duration,
    login_path: String,
}

impl<S: SessionStore> SessionGuard<S> {
    pub fn new(store: S, config: &SessionConfig) -> Self {
        Self {
            store,
            ttl: Duration::hours(i64::from(config.ttl_hours)),
            login_path: config.login_path.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Check against the wall clock
    pub fn check(&self, required: Option<Role>) -> GuardDecision {
        self.check_at(Utc::now(), required)
    }

    /// Check as of `now`
    pub fn check_at(&self, now: DateTime<Utc>, required: Option<Role>) -> GuardDecision {
        let raw = match self.store.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("No session record; redirecting to {}", self.login_path);
                return self.deny(DenialReason::NoSession);
            }
            Err(e) => {
                warn!(error = %e, "Session store unreadable; treating as no session");
                return self.deny(DenialReason::Malformed);
            }
        };

        let record = match SessionRecord::from_json(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Stored session is not parseable; treating as no session");
                return self.deny(DenialReason::Malformed);
            }
        };

        if record.is_expired(now, self.ttl) {
            info!(
                user_id = %record.user_id,
                age_hours = record.age(now).num_hours(),
                "Session expired; clearing stored record"
            );
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear expired session");
            }
            return self.deny(DenialReason::Expired);
        }

        if let Some(required) = required {
            if !record.role.meets(required) {
                info!(
                    user_id = %record.user_id,
                    role = %record.role,
                    required = %required,
                    "Insufficient role for protected view"
                );
                return self.deny(DenialReason::InsufficientRole {
                    required,
                    actual: record.role,
                });
            }
        }

        debug!(user_id = %record.user_id, role = %record.role, "Session authorized");
        GuardDecision::Authorized(record)
    }

    fn deny(&self, reason: DenialReason) -> GuardDecision {
        GuardDecision::Denied {
            reason,
            redirect_to: self.login_path.clone(),
        }
    }
}
