use std::collections::HashMap;
use std::sync::Arc;

use tasklane_core::OrganizationId;
use tasklane_domain::{
    CallerGrants, OrganizationLink, Permission, RoleAssignment, RolePermissionCatalog,
};
use tracing::warn;

use crate::OrganizationHierarchy;


/// Default bound on ancestry hops for one inheritance walk.
pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 64;

/// Per-query memo of organization lookups.
///
/// A cache belongs to exactly one authorization query (or one guarded
/// request) and is dropped with it. Failed and unknown lookups are cached as
/// `None` so each organization id reaches the accessor at most once.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<OrganizationId, Option<OrganizationLink>>,
}

impl ResolutionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of memoized organization ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing has been memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, organization_id: &OrganizationId) -> Option<Option<&OrganizationLink>> {
        self.entries.get(organization_id).map(Option::as_ref)
    }

    fn insert(&mut self, organization_id: OrganizationId, link: Option<OrganizationLink>) {
        self.entries.insert(organization_id, link);
    }
}

/// Decides whether role assignments grant a permission on a resource.
#[derive(Clone)]
pub struct PermissionResolver {
    catalog: RolePermissionCatalog,
    hierarchy: Arc<dyn OrganizationHierarchy>,
    max_depth: usize,
}

impl PermissionResolver {
    /// Creates a resolver over the standard role catalog.
    #[must_use]
    pub fn new(hierarchy: Arc<dyn OrganizationHierarchy>) -> Self {
        Self {
            catalog: RolePermissionCatalog::standard(),
            hierarchy,
            max_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
        }
    }

    /// Replaces the role catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: RolePermissionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sets the maximum number of hops for one inheritance walk (at least 1).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Returns the role catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &RolePermissionCatalog {
        &self.catalog
    }

    /// Returns the inheritance walk bound.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns whether the assignments grant `permission` on a resource owned by
    /// `resource_organization_id`, using a cache private to this call.
    pub async fn has_permission(
        &self,
        assignments: &[RoleAssignment],
        permission: Permission,
        resource_organization_id: Option<&OrganizationId>,
    ) -> bool {
        let mut cache = ResolutionCache::new();
        self.has_permission_cached(assignments, permission, resource_organization_id, &mut cache)
            .await
    }

    /// Same as [`Self::has_permission`] but memoizes lookups in `cache`.
    ///
    /// The result is an OR across assignments and does not depend on their
    /// order. Hierarchy failures cut a walk short and can only deny.
    pub async fn has_permission_cached(
        &self,
        assignments: &[RoleAssignment],
        permission: Permission,
        resource_organization_id: Option<&OrganizationId>,
        cache: &mut ResolutionCache,
    ) -> bool {
        if assignments.is_empty() {
            return false;
        }

        for assignment in assignments {
            if !self.catalog.grants(assignment.role(), permission) {
                continue;
            }

            let Some(scope) = assignment.organization_id() else {
                return true;
            };

            let Some(resource) = resource_organization_id else {
                continue;
            };

            if scope == resource {
                return true;
            }

            if self.catalog.is_inheritable(assignment.role())
                && self.is_ancestor_of(scope, resource, cache).await
            {
                return true;
            }
        }

        false
    }

    /// Dispatches on the caller's grant shape before resolving.
    pub async fn grants_permission(
        &self,
        grants: &CallerGrants,
        permission: Permission,
        resource_organization_id: Option<&OrganizationId>,
        cache: &mut ResolutionCache,
    ) -> bool {
        match grants {
            CallerGrants::PrecomputedPermissions(permissions) => permissions.contains(&permission),
            CallerGrants::RoleAssignments(assignments) => {
                self.has_permission_cached(
                    assignments,
                    permission,
                    resource_organization_id,
                    cache,
                )
                .await
            }
        }
    }

    async fn is_ancestor_of(
        &self,
        ancestor: &OrganizationId,
        start: &OrganizationId,
        cache: &mut ResolutionCache,
    ) -> bool {
        let mut current = start.clone();

        for _ in 0..self.max_depth {
            let Some(link) = self.lookup(&current, cache).await else {
                return false;
            };

            if link.id() == ancestor {
                return true;
            }

            match link.parent_id() {
                Some(parent_id) => current = parent_id.clone(),
                None => return false,
            }
        }

        warn!(
            start = %start,
            ancestor = %ancestor,
            max_depth = self.max_depth,
            "organization ancestry walk exceeded depth bound"
        );
        false
    }

    async fn lookup(
        &self,
        organization_id: &OrganizationId,
        cache: &mut ResolutionCache,
    ) -> Option<OrganizationLink> {
        if let Some(cached) = cache.get(organization_id) {
            return cached.cloned();
        }

        let resolved = match self.hierarchy.resolve(organization_id).await {
            Ok(link) => link,
            Err(error) => {
                warn!(
                    organization_id = %organization_id,
                    %error,
                    "organization lookup failed, treating as not found"
                );
                None
            }
        };

        cache.insert(organization_id.clone(), resolved.clone());
        resolved
    }
}
