use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tasklane_core::{AppError, AppResult, CallerClaims, OrganizationId, PermissionClaim, RoleClaim};

use crate::{Permission, Role, RoleAssignment};

/// What an authenticated caller brings to an authorization check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum CallerGrants {
    /// Role assignments resolved against the organization hierarchy.
    RoleAssignments(Vec<RoleAssignment>),
    /// Flat permission set computed by the issuer; no hierarchy walk.
    PrecomputedPermissions(BTreeSet<Permission>),
}

impl CallerGrants {
    /// Returns role assignments, empty for precomputed permission sets.
    #[must_use]
    pub fn role_assignments(&self) -> &[RoleAssignment] {
        match self {
            Self::RoleAssignments(assignments) => assignments.as_slice(),
            Self::PrecomputedPermissions(_) => &[],
        }
    }

    /// Returns whether the caller carries no grant at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::RoleAssignments(assignments) => assignments.is_empty(),
            Self::PrecomputedPermissions(permissions) => permissions.is_empty(),
        }
    }
}

/// Normalized identity of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    subject: String,
    email: Option<String>,
    organization_id: Option<OrganizationId>,
    grants: CallerGrants,
}

impl CallerIdentity {
    /// Creates a caller identity from already normalized parts.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        email: Option<String>,
        organization_id: Option<OrganizationId>,
        grants: CallerGrants,
    ) -> Self {
        Self {
            subject: subject.into(),
            email,
            organization_id,
            grants,
        }
    }

    /// Creates an identity holding role assignments only.
    #[must_use]
    pub fn with_roles(subject: impl Into<String>, assignments: Vec<RoleAssignment>) -> Self {
        Self::new(subject, None, None, CallerGrants::RoleAssignments(assignments))
    }

    /// Normalizes a trusted claims record.
    ///
    /// A present `permissions` list wins over `roles`. Entries naming an
    /// unknown role or permission are dropped since they cannot grant
    /// anything.
    pub fn from_claims(claims: &CallerClaims) -> AppResult<Self> {
        if claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized(
                "caller claims are missing a subject".to_owned(),
            ));
        }

        let grants = match &claims.permissions {
            Some(permissions) => {
                CallerGrants::PrecomputedPermissions(normalize_permissions(permissions))
            }
            None => CallerGrants::RoleAssignments(normalize_roles(&claims.roles)),
        };

        Ok(Self::new(
            claims.sub.clone(),
            claims.email.clone(),
            OrganizationId::from_optional(claims.home_organization()),
            grants,
        ))
    }

    /// Returns the stable subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the email, if the issuer provided one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the caller's home organization.
    #[must_use]
    pub fn organization_id(&self) -> Option<&OrganizationId> {
        self.organization_id.as_ref()
    }

    /// Returns the caller's grants.
    #[must_use]
    pub fn grants(&self) -> &CallerGrants {
        &self.grants
    }
}

fn normalize_roles(claims: &[RoleClaim]) -> Vec<RoleAssignment> {
    claims
        .iter()
        .filter_map(|claim| {
            let role = Role::from_str(claim.role_name()?).ok()?;
            // A scope that is present but not a valid id drops the entry.
            let organization_id = match claim.organization_id() {
                Some(value) => Some(OrganizationId::new(value).ok()?),
                None => None,
            };
            Some(RoleAssignment::new(role, organization_id))
        })
        .collect()
}

fn normalize_permissions(claims: &[PermissionClaim]) -> BTreeSet<Permission> {
    claims
        .iter()
        .filter_map(|claim| Permission::from_str(claim.permission_name()?).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;
    use tasklane_core::{CallerClaims, OrganizationId, PermissionClaim, RoleClaim};

    use super::{CallerGrants, CallerIdentity};
    use crate::{Permission, Role, RoleAssignment};

    fn org(value: &str) -> OrganizationId {
        OrganizationId::new(value).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn role_claims_normalize_to_canonical_assignments() {
        let mut claims = CallerClaims::new(
            "user-1",
            vec![
                RoleClaim::Name("OWNER".to_owned()),
                RoleClaim::scoped("ADMIN", "org-b"),
                RoleClaim::scoped("VIEWER", ""),
                RoleClaim::Name("SUPERUSER".to_owned()),
            ],
        );
        claims.organization_id = Some("org-a".to_owned());

        let identity = CallerIdentity::from_claims(&claims);
        assert!(identity.is_ok());
        let identity = identity.unwrap_or_else(|_| unreachable!());

        assert_eq!(identity.subject(), "user-1");
        assert_eq!(identity.organization_id(), Some(&org("org-a")));
        assert_eq!(
            identity.grants().role_assignments(),
            &[
                RoleAssignment::global(Role::Owner),
                RoleAssignment::scoped(Role::Admin, org("org-b")),
                RoleAssignment::global(Role::Viewer),
            ]
        );
    }

    #[test]
    fn whitespace_scoped_role_is_dropped_not_widened() {
        let claims = CallerClaims::new(
            "user-1",
            vec![
                RoleClaim::scoped("ADMIN", "   "),
                RoleClaim::scoped("VIEWER", "org-b"),
            ],
        );

        let identity = CallerIdentity::from_claims(&claims).unwrap_or_else(|_| unreachable!());
        assert_eq!(
            identity.grants().role_assignments(),
            &[RoleAssignment::scoped(Role::Viewer, org("org-b"))]
        );
    }

    #[test]
    fn permission_list_takes_precedence_over_roles() {
        let mut claims = CallerClaims::new("user-1", vec![RoleClaim::Name("OWNER".to_owned())]);
        claims.permissions = Some(vec![
            PermissionClaim::Name("READ_TASK".to_owned()),
            PermissionClaim::Name("NOT_A_PERMISSION".to_owned()),
        ]);

        let identity = CallerIdentity::from_claims(&claims).unwrap_or_else(|_| unreachable!());
        assert_eq!(
            identity.grants(),
            &CallerGrants::PrecomputedPermissions(BTreeSet::from([Permission::ReadTask]))
        );
        assert!(identity.grants().role_assignments().is_empty());
    }

    #[test]
    fn blank_subject_is_rejected() {
        let claims = CallerClaims::new(" ", Vec::new());
        assert!(CallerIdentity::from_claims(&claims).is_err());
    }

    proptest! {
        #[test]
        fn known_role_names_are_never_dropped(
            roles in prop::collection::vec(prop::sample::select(Role::all().to_vec()), 0..8)
        ) {
            let claims = CallerClaims::new(
                "user-1",
                roles.iter().map(|role| RoleClaim::Name(role.as_str().to_owned())).collect(),
            );
            let identity = CallerIdentity::from_claims(&claims);
            prop_assert!(identity.is_ok());

            let identity = identity.unwrap_or_else(|_| unreachable!());
            let normalized: Vec<Role> = identity
                .grants()
                .role_assignments()
                .iter()
                .map(RoleAssignment::role)
                .collect();
            prop_assert_eq!(normalized, roles);
        }
    }
}
