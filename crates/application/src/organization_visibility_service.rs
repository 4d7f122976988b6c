use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;

use tasklane_core::OrganizationId;
use tasklane_domain::{CallerIdentity, RolePermissionCatalog};
use tracing::warn;

use crate::{DEFAULT_MAX_HIERARCHY_DEPTH, OrganizationHierarchy};

/// Computes which organizations a caller can list resources from.
#[derive(Clone)]
pub struct OrganizationVisibilityService {
    catalog: RolePermissionCatalog,
    hierarchy: Arc<dyn OrganizationHierarchy>,
    max_depth: usize,
}

impl OrganizationVisibilityService {
    /// Creates a visibility service over the standard role catalog.
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

    /// Sets how many levels below a root are expanded (at least 1).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Returns the organizations visible to the caller.
    ///
    /// Inheritable roles see their organization and all descendants; other
    /// roles see their organization only. Unscoped assignments fall back to
    /// the caller's home organization, as does an otherwise empty result.
    pub async fn visible_organizations(
        &self,
        identity: &CallerIdentity,
    ) -> BTreeSet<OrganizationId> {
        let mut visible = BTreeSet::new();

        for assignment in identity.grants().role_assignments() {
            let Some(scope) = assignment
                .organization_id()
                .or_else(|| identity.organization_id())
            else {
                continue;
            };

            if self.catalog.is_inheritable(assignment.role()) {
                visible.extend(self.descendants_of(scope).await);
            } else {
                visible.insert(scope.clone());
            }
        }

        if visible.is_empty() {
            if let Some(home) = identity.organization_id() {
                visible.insert(home.clone());
            }
        }

        visible
    }

    /// Returns `root` followed by its descendants in breadth-first order.
    ///
    /// Revisits are skipped and expansion stops at the depth bound. A failed
    /// child lookup contributes no children.
    pub async fn descendants_of(&self, root: &OrganizationId) -> Vec<OrganizationId> {
        let mut ordered = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(root.clone(), 0_usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            ordered.push(current.clone());

            if depth >= self.max_depth {
                warn!(
                    root = %root,
                    organization_id = %current,
                    max_depth = self.max_depth,
                    "organization descendant expansion reached depth bound"
                );
                continue;
            }

            match self.hierarchy.list_children(&current).await {
                Ok(children) => queue.extend(
                    children
                        .into_iter()
                        .map(|child| (child.id().clone(), depth + 1)),
                ),
                Err(error) => warn!(
                    organization_id = %current,
                    %error,
                    "listing child organizations failed, skipping subtree"
                ),
            }
        }

        ordered
    }
}
