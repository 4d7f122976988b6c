use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tasklane_application::OrganizationHierarchy;
use tasklane_core::{AppError, AppResult, OrganizationId};
use tasklane_domain::OrganizationLink;

/// Bounds every hierarchy lookup of the wrapped accessor by a deadline.
///
/// An elapsed deadline surfaces as [`AppError::Internal`], which resolvers
/// treat like any other lookup failure.
#[derive(Clone)]
pub struct TimeoutOrganizationHierarchy {
    inner: Arc<dyn OrganizationHierarchy>,
    timeout: Duration,
}

impl TimeoutOrganizationHierarchy {
    /// Wraps an accessor with a per-lookup deadline.
    #[must_use]
    pub fn new(inner: Arc<dyn OrganizationHierarchy>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Returns the per-lookup deadline.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn elapsed(&self, operation: &str, organization_id: &OrganizationId) -> AppError {
        AppError::Internal(format!(
            "organization {operation} for '{organization_id}' timed out after {} ms",
            self.timeout.as_millis()
        ))
    }
}

#[async_trait]
impl OrganizationHierarchy for TimeoutOrganizationHierarchy {
    async fn resolve(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Option<OrganizationLink>> {
        tokio::time::timeout(self.timeout, self.inner.resolve(organization_id))
            .await
            .map_err(|_| self.elapsed("lookup", organization_id))?
    }

    async fn list_children(
        &self,
        organization_id: &OrganizationId,
    ) -> AppResult<Vec<OrganizationLink>> {
        tokio::time::timeout(self.timeout, self.inner.list_children(organization_id))
            .await
            .map_err(|_| self.elapsed("child listing", organization_id))?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tasklane_application::{OrganizationHierarchy, PermissionResolver};
    use tasklane_core::{AppError, AppResult, OrganizationId};
    use tasklane_domain::{OrganizationLink, Permission, Role, RoleAssignment};

    use super::TimeoutOrganizationHierarchy;

    fn org(value: &str) -> OrganizationId {
        OrganizationId::new(value).unwrap_or_else(|_| unreachable!())
    }

    /// A -> B, answering after `delay`.
    struct SlowHierarchy {
        delay: Duration,
    }

    #[async_trait]
    impl OrganizationHierarchy for SlowHierarchy {
        async fn resolve(
            &self,
            organization_id: &OrganizationId,
        ) -> AppResult<Option<OrganizationLink>> {
            tokio::time::sleep(self.delay).await;
            let parent = (organization_id.as_str() == "B").then(|| org("A"));
            Ok(Some(OrganizationLink::new(organization_id.clone(), parent)))
        }

        async fn list_children(
            &self,
            organization_id: &OrganizationId,
        ) -> AppResult<Vec<OrganizationLink>> {
            tokio::time::sleep(self.delay).await;
            if organization_id.as_str() == "A" {
                return Ok(vec![OrganizationLink::new(org("B"), Some(org("A")))]);
            }
            Ok(Vec::new())
        }
    }

    fn wrapped(delay_ms: u64, timeout_ms: u64) -> TimeoutOrganizationHierarchy {
        TimeoutOrganizationHierarchy::new(
            Arc::new(SlowHierarchy {
                delay: Duration::from_millis(delay_ms),
            }),
            Duration::from_millis(timeout_ms),
        )
    }

    #[tokio::test]
    async fn fast_lookups_pass_through() {
        let hierarchy = wrapped(0, 1_000);

        let link = hierarchy.resolve(&org("B")).await.unwrap_or_default();
        assert_eq!(link.and_then(|link| link.parent_id().cloned()), Some(org("A")));

        let children = hierarchy.list_children(&org("A")).await.unwrap_or_default();
        assert_eq!(children.len(), 1);
    }

    #[tokio::test]
    async fn slow_lookups_fail_as_internal() {
        let hierarchy = wrapped(500, 10);

        assert!(matches!(
            hierarchy.resolve(&org("B")).await,
            Err(AppError::Internal(_))
        ));
        assert!(matches!(
            hierarchy.list_children(&org("A")).await,
            Err(AppError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn resolver_denies_when_lookups_time_out() {
        let admin_at_a = vec![RoleAssignment::scoped(Role::Admin, org("A"))];

        let fast = PermissionResolver::new(Arc::new(wrapped(0, 1_000)));
        assert!(
            fast.has_permission(&admin_at_a, Permission::ReadTask, Some(&org("B")))
                .await
        );

        let slow = PermissionResolver::new(Arc::new(wrapped(500, 10)));
        assert!(
            !slow
                .has_permission(&admin_at_a, Permission::ReadTask, Some(&org("B")))
                .await
        );
        assert!(
            slow.has_permission(&admin_at_a, Permission::ReadTask, Some(&org("A")))
                .await
        );
    }
}
