//! Role hierarchy
//!
//! Staff roles form a total order; a protected view names the lowest role
//! allowed in and every higher role passes too.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Staff role stored in a session record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Support staff: read-mostly moderation views
    SupportUser,
    /// Administrator: vacancy and user moderation
    AdminUser,
    /// Super administrator: everything, including managing admins
    SuperAdmin,
}

impl Role {
    /// All roles, lowest privilege first
    pub const ALL: [Role; 3] = [Role::SupportUser, Role::AdminUser, Role::SuperAdmin];

    /// Hierarchy level; the highest-privilege role has the highest rank
    pub fn rank(&self) -> u8 {
        match self {
            Role::SupportUser => 1,
            Role::AdminUser => 2,
            Role::SuperAdmin => 3,
        }
    }

    /// Whether this role may enter a view that requires `required`
    pub fn meets(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SupportUser => "support_user",
            Role::AdminUser => "admin_user",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts exactly the snake_case names serde reads and writes
impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "support_user" => Ok(Role::SupportUser),
            "admin_user" => Ok(Role::AdminUser),
            "super_admin" => Ok(Role::SuperAdmin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}
