//! Role and status enums shared across the workspace.

use serde::{Deserialize, Serialize};

/// Account role, as issued by the backend at login.
///
/// Gates the admin surface (inventory management, request approval).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular employee: browse the catalog, submit and track requests.
    #[default]
    User,
    /// Administrator: everything a user can do, plus inventory management
    /// and request approval.
    Admin,
}

impl Role {
    /// Whether this role carries administrator capabilities.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" | "user" => Ok(Self::User),
            "ADMIN" | "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Lifecycle status of an equipment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Submitted, awaiting an administrator's decision.
    #[default]
    Pending,
    /// Approved by an administrator.
    Approved,
    /// Rejected by an administrator, with a reason.
    Rejected,
}

impl RequestStatus {
    /// Whether an administrator has already processed this request.
    #[must_use]
    pub const fn is_processed(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}
