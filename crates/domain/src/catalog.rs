use crate::{Permission, Role};

const OWNER_PERMISSIONS: &[Permission] = &[
    Permission::CreateOrg,
    Permission::CreateTask,
    Permission::ReadTask,
    Permission::UpdateTask,
    Permission::DeleteTask,
    Permission::ViewAudit,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::CreateOrg,
    Permission::CreateTask,
    Permission::ReadTask,
    Permission::UpdateTask,
    Permission::ViewAudit,
];

const VIEWER_PERMISSIONS: &[Permission] = &[Permission::ReadTask, Permission::ToggleComplete];

const STANDARD_POLICIES: &[RolePolicy] = &[
    RolePolicy::new(Role::Owner, OWNER_PERMISSIONS, true),
    RolePolicy::new(Role::Admin, ADMIN_PERMISSIONS, true),
    RolePolicy::new(Role::Viewer, VIEWER_PERMISSIONS, false),
];

/// Static policy for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePolicy {
    role: Role,
    permissions: &'static [Permission],
    inheritable: bool,
}

impl RolePolicy {
    /// Creates a role policy entry.
    #[must_use]
    pub const fn new(role: Role, permissions: &'static [Permission], inheritable: bool) -> Self {
        Self {
            role,
            permissions,
            inheritable,
        }
    }

    /// Returns the role this entry describes.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the permissions granted by the role.
    #[must_use]
    pub fn permissions(&self) -> &'static [Permission] {
        self.permissions
    }

    /// Returns whether grants flow down to descendant organizations.
    #[must_use]
    pub fn is_inheritable(&self) -> bool {
        self.inheritable
    }
}

/// Immutable role to permission table.
///
/// The catalog answers two questions only: which permissions a role grants,
/// and whether a grant made at an organization also covers its descendants.
/// Tables are `'static` and cannot be changed after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePermissionCatalog {
    policies: &'static [RolePolicy],
}

impl RolePermissionCatalog {
    /// Creates a catalog from a static policy table.
    #[must_use]
    pub const fn new(policies: &'static [RolePolicy]) -> Self {
        Self { policies }
    }

    /// Returns the built-in OWNER/ADMIN/VIEWER policy.
    #[must_use]
    pub const fn standard() -> Self {
        Self::new(STANDARD_POLICIES)
    }

    /// Returns the permissions granted by a role, empty when the role has no entry.
    #[must_use]
    pub fn permissions_of(&self, role: Role) -> &'static [Permission] {
        self.policy(role)
            .map(RolePolicy::permissions)
            .unwrap_or_default()
    }

    /// Returns whether the role grants the permission.
    #[must_use]
    pub fn grants(&self, role: Role, permission: Permission) -> bool {
        self.permissions_of(role).contains(&permission)
    }

    /// Returns whether the role's grants propagate down the hierarchy.
    #[must_use]
    pub fn is_inheritable(&self, role: Role) -> bool {
        self.policy(role).is_some_and(RolePolicy::is_inheritable)
    }

    /// Returns every policy entry in table order.
    #[must_use]
    pub fn policies(&self) -> &'static [RolePolicy] {
        self.policies
    }

    fn policy(&self, role: Role) -> Option<&'static RolePolicy> {
        self.policies.iter().find(|policy| policy.role == role)
    }
}

impl Default for RolePermissionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
