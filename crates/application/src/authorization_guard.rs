use tasklane_core::{AppError, AppResult, OrganizationId};
use tasklane_domain::{CallerIdentity, Permission};
use tracing::debug;

use crate::{PermissionResolver, ResolutionCache};


/// Permissions an operation declares as required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredPermissions(Vec<Permission>);

impl RequiredPermissions {
    /// Creates a requirement list.
    #[must_use]
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self(permissions.into_iter().collect())
    }

    /// Returns the declared permissions in declaration order.
    #[must_use]
    pub fn as_slice(&self) -> &[Permission] {
        self.0.as_slice()
    }
}

/// Why a guarded operation was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No caller identity was attached before the guard ran.
    NoIdentity,
    /// The caller lacks the first permission that failed to resolve.
    InsufficientPermission(Permission),
}

/// Terminal outcome of one guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// The operation may proceed.
    Allow,
    /// The operation is rejected.
    Deny(DenyReason),
}

impl AuthorizationDecision {
    /// Returns whether the decision allows the operation.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts the decision into the application error taxonomy.
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(DenyReason::NoIdentity) => Err(AppError::Unauthorized(
                "authentication required".to_owned(),
            )),
            Self::Deny(DenyReason::InsufficientPermission(_)) => Err(AppError::Forbidden(
                "insufficient permissions".to_owned(),
            )),
        }
    }
}

/// Result of evaluating one permission without short-circuiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionCheck {
    /// Evaluated permission.
    pub permission: Permission,
    /// Whether the caller holds it for the resource.
    pub allowed: bool,
}

/// Request-time authorization contract.
///
/// Runs after authentication. Every evaluation allocates its own
/// [`ResolutionCache`], shared only by the permissions of that evaluation.
#[derive(Clone)]
pub struct AuthorizationGuard {
    resolver: PermissionResolver,
}

impl AuthorizationGuard {
    /// Creates a guard around a resolver.
    #[must_use]
    pub fn new(resolver: PermissionResolver) -> Self {
        Self { resolver }
    }

    /// Returns the underlying resolver.
    #[must_use]
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Evaluates the required permissions, stopping at the first unmet one.
    pub async fn authorize(
        &self,
        identity: Option<&CallerIdentity>,
        required: &[Permission],
        resource_organization_id: Option<&OrganizationId>,
    ) -> AuthorizationDecision {
        let Some(identity) = identity else {
            debug!("denying request without caller identity");
            return AuthorizationDecision::Deny(DenyReason::NoIdentity);
        };

        if required.is_empty() {
            return AuthorizationDecision::Allow;
        }

        let mut cache = ResolutionCache::new();
        for permission in required {
            let granted = self
                .resolver
                .grants_permission(
                    identity.grants(),
                    *permission,
                    resource_organization_id,
                    &mut cache,
                )
                .await;

            if !granted {
                debug!(
                    subject = identity.subject(),
                    permission = permission.as_str(),
                    resource_organization_id = resource_organization_id.map(OrganizationId::as_str),
                    "denying request with insufficient permission"
                );
                return AuthorizationDecision::Deny(DenyReason::InsufficientPermission(
                    *permission,
                ));
            }
        }

        AuthorizationDecision::Allow
    }

    /// Same as [`Self::authorize`] but reports denial as an [`AppError`].
    pub async fn require(
        &self,
        identity: Option<&CallerIdentity>,
        required: &[Permission],
        resource_organization_id: Option<&OrganizationId>,
    ) -> AppResult<()> {
        self.authorize(identity, required, resource_organization_id)
            .await
            .into_result()
    }

    /// Evaluates every permission for reporting, sharing one cache.
    pub async fn evaluate(
        &self,
        identity: &CallerIdentity,
        permissions: &[Permission],
        resource_organization_id: Option<&OrganizationId>,
    ) -> Vec<PermissionCheck> {
        let mut cache = ResolutionCache::new();
        let mut checks = Vec::with_capacity(permissions.len());

        for permission in permissions {
            let allowed = self
                .resolver
                .grants_permission(
                    identity.grants(),
                    *permission,
                    resource_organization_id,
                    &mut cache,
                )
                .await;
            checks.push(PermissionCheck {
                permission: *permission,
                allowed,
            });
        }

        checks
    }
}
