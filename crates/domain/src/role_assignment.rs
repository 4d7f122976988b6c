use serde::{Deserialize, Serialize};
use tasklane_core::OrganizationId;

use crate::Role;

/// A role held by a subject, optionally scoped to an organization.
///
/// An assignment without an organization is a global grant of the role's
/// permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    organization_id: Option<OrganizationId>,
}

impl RoleAssignment {
    /// Creates a role assignment.
    #[must_use]
    pub fn new(role: Role, organization_id: Option<OrganizationId>) -> Self {
        Self {
            role,
            organization_id,
        }
    }

    /// Creates an assignment scoped to one organization.
    #[must_use]
    pub fn scoped(role: Role, organization_id: OrganizationId) -> Self {
        Self::new(role, Some(organization_id))
    }

    /// Creates an unscoped assignment.
    #[must_use]
    pub fn global(role: Role) -> Self {
        Self::new(role, None)
    }

    /// Returns the assigned role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the scoping organization, `None` for global grants.
    #[must_use]
    pub fn organization_id(&self) -> Option<&OrganizationId> {
        self.organization_id.as_ref()
    }
}
