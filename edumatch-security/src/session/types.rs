//! Session record
//!
//! The serialized claim written at login and checked on every protected view.

use crate::auth::Role;
use chrono::{DateTime, Duration, Utc};
use edumatch_core::EdumatchResult;
use serde::{Deserialize, Serialize};

/// Persisted authorization claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub role: Role,
    /// RFC 3339 timestamp of the login that created this record
    #[serde(alias = "loginTime")]
    pub login_time: DateTime<Utc>,
    /// Opaque identity reference from the auth provider
    #[serde(alias = "userId")]
    pub user_id: String,
}

impl SessionRecord {
    /// Create a record for a login happening now
    pub fn new(role: Role, user_id: impl Into<String>) -> Self {
        Self::with_login_time(role, user_id, Utc::now())
    }

    pub fn with_login_time(role: Role, user_id: impl Into<String>, login_time: DateTime<Utc>) -> Self {
        Self {
            role,
            login_time,
            user_id: user_id.into(),
        }
    }

    /// Time since login; negative if `login_time` lies in the future
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.login_time)
    }

    /// Expired once the age strictly exceeds `ttl`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) > ttl
    }

    pub fn to_json(&self) -> EdumatchResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> EdumatchResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
