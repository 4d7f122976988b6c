use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tasklane_core::AppError;

/// Permissions enforced by application policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// Allows creating tasks.
    CreateTask,
    /// Allows reading tasks.
    ReadTask,
    /// Allows editing and reordering tasks.
    UpdateTask,
    /// Allows deleting tasks.
    DeleteTask,
    /// Allows flipping a task between done and todo.
    ToggleComplete,
    /// Allows reading the audit log.
    ViewAudit,
    /// Allows reading analytics views.
    ViewAnalytics,
    /// Allows creating organizations.
    CreateOrg,
}

impl Permission {
    /// Returns a stable transport value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTask => "CREATE_TASK",
            Self::ReadTask => "READ_TASK",
            Self::UpdateTask => "UPDATE_TASK",
            Self::DeleteTask => "DELETE_TASK",
            Self::ToggleComplete => "TOGGLE_COMPLETE",
            Self::ViewAudit => "VIEW_AUDIT",
            Self::ViewAnalytics => "VIEW_ANALYTICS",
            Self::CreateOrg => "CREATE_ORG",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::CreateTask,
            Permission::ReadTask,
            Permission::UpdateTask,
            Permission::DeleteTask,
            Permission::ToggleComplete,
            Permission::ViewAudit,
            Permission::ViewAnalytics,
            Permission::CreateOrg,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Closed set of roles a subject can hold within an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full control over an organization subtree.
    Owner,
    /// Manages tasks across an organization subtree.
    Admin,
    /// Read access to a single organization.
    Viewer,
}

impl Role {
    /// Returns a stable transport value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::Viewer => "VIEWER",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Owner, Self::Admin, Self::Viewer]
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "OWNER" => Ok(Self::Owner),
            "ADMIN" => Ok(Self::Admin),
            "VIEWER" => Ok(Self::Viewer),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}
