//! Acting identities: users and roles
//!
//! The engine never manages authentication itself. The calling framework
//! supplies an authenticated [`Identity`] with every action request.

use serde::{Deserialize, Serialize};

// ── User Identifier ──────────────────────────────────────────────────

/// Unique identifier for a user
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Role Name ────────────────────────────────────────────────────────

/// A role carried by a user (e.g. "reviewer", "manager", "admin")
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleName(pub String);

impl RoleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The role that may perform administrative cleanup of audit logs
    pub fn admin() -> Self {
        Self("admin".into())
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Identity ─────────────────────────────────────────────────────────

/// An authenticated acting identity, supplied by the calling framework
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The user's unique identifier
    pub id: UserId,
    /// The single role the user holds
    pub role: RoleName,
}

impl Identity {
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            role: RoleName::new(role),
        }
    }

    /// Whether this identity holds the administrative role
    pub fn is_admin(&self) -> bool {
        self.role == RoleName::admin()
    }
}
