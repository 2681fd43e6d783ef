use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse-grained permission tag attached to an identity.
///
/// The set is closed: anything the backend sends outside of it is carried
/// as [`RoleClaim::Unrecognized`] and never grants access.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Organizer,
    Admin,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Organizer, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Organizer => "ORGANIZER",
            Role::Admin => "ADMIN",
        }
    }

    /// Landing route for this role.
    ///
    /// Total over the known set; used for the "wrong dashboard" redirect.
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::User => "/user/dashboard",
            Role::Organizer => "/organizer/dashboard",
            Role::Admin => "/admin/dashboard",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Exact match on the wire names; `"admin"` is not `ADMIN`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// The role as it appeared in a decoded credential.
///
/// `Missing` is an explicit sentinel so callers cannot confuse "no role" with
/// a default role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleClaim {
    Known(Role),
    Unrecognized(String),
    Missing,
}

impl RoleClaim {
    pub fn from_raw(raw: &str) -> Self {
        match raw.parse::<Role>() {
            Ok(role) => RoleClaim::Known(role),
            Err(UnknownRole(raw)) => RoleClaim::Unrecognized(raw),
        }
    }

    pub fn known(&self) -> Option<Role> {
        match self {
            RoleClaim::Known(role) => Some(*role),
            _ => None,
        }
    }
}
