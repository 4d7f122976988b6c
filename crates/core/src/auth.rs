use serde::{Deserialize, Serialize};

/// Trusted claims record attached to a request by the authentication step.
///
/// The record is deliberately loose: role and permission entries arrive in
/// whatever shape the issuing side produced and are normalized by the domain
/// layer before any authorization decision is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerClaims {
    /// Stable subject of the caller.
    pub sub: String,
    /// Email, if the issuer included one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Home organization of the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Role assignments in any supported shape.
    #[serde(default)]
    pub roles: Vec<RoleClaim>,
    /// Precomputed flat permission list, when the issuer embedded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<PermissionClaim>>,
}

impl CallerClaims {
    /// Creates a claims record with role assignments only.
    #[must_use]
    pub fn new(sub: impl Into<String>, roles: Vec<RoleClaim>) -> Self {
        Self {
            sub: sub.into(),
            email: None,
            organization_id: None,
            roles,
            permissions: None,
        }
    }

    /// Returns the home organization when it is present and non-blank.
    #[must_use]
    pub fn home_organization(&self) -> Option<&str> {
        non_blank(self.organization_id.as_deref())
    }
}

/// One role entry from a claims payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleClaim {
    /// Bare role name with no organization scope.
    Name(String),
    /// Structured entry with optional organization scope.
    Record(RoleClaimRecord),
}

impl RoleClaim {
    /// Creates a structured role claim scoped to an organization.
    #[must_use]
    pub fn scoped(role: impl Into<String>, organization_id: impl Into<String>) -> Self {
        Self::Record(RoleClaimRecord {
            role: Some(role.into()),
            organization_id: Some(organization_id.into()),
            ..RoleClaimRecord::default()
        })
    }

    /// Returns the role name carried by this entry.
    #[must_use]
    pub fn role_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => non_blank(Some(name.as_str())),
            Self::Record(record) => record.role_name(),
        }
    }

    /// Returns the scoping organization carried by this entry.
    #[must_use]
    pub fn organization_id(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::Record(record) => record.organization_id(),
        }
    }
}

/// Structured role entry. Several field spellings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleClaimRecord {
    /// Role name under `role`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Role name under `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role name under `roleName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    /// Scope under `organizationId`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Scope under `org`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
}

impl RoleClaimRecord {
    /// Returns the first non-blank role spelling, `role` first.
    #[must_use]
    pub fn role_name(&self) -> Option<&str> {
        non_blank(self.role.as_deref())
            .or_else(|| non_blank(self.name.as_deref()))
            .or_else(|| non_blank(self.role_name.as_deref()))
    }

    /// Returns the first non-empty scope spelling, `organizationId` first.
    ///
    /// Only an absent or empty value leaves the entry unscoped. Whitespace is
    /// returned as is and rejected later as an invalid organization id.
    #[must_use]
    pub fn organization_id(&self) -> Option<&str> {
        non_empty(self.organization_id.as_deref()).or_else(|| non_empty(self.org.as_deref()))
    }
}

/// One entry of a precomputed permission list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionClaim {
    /// Bare permission name.
    Name(String),
    /// Structured entry naming the permission.
    Record(PermissionClaimRecord),
}

impl PermissionClaim {
    /// Returns the permission name carried by this entry.
    #[must_use]
    pub fn permission_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => non_blank(Some(name.as_str())),
            Self::Record(record) => non_blank(record.permission.as_deref())
                .or_else(|| non_blank(record.name.as_deref())),
        }
    }
}

/// Structured permission entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionClaimRecord {
    /// Permission name under `permission`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    /// Permission name under `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{CallerClaims, PermissionClaim, RoleClaim};

    #[test]
    fn mixed_role_shapes_deserialize() {
        let claims = serde_json::from_str::<CallerClaims>(
            r#"{
                "sub": "user-1",
                "organizationId": "org-a",
                "roles": [
                    "OWNER",
                    {"role": "ADMIN", "organizationId": "org-b"},
                    {"name": "VIEWER", "org": "org-c"},
                    {"roleName": "VIEWER"}
                ]
            }"#,
        );
        assert!(claims.is_ok());

        let claims = claims.unwrap_or_else(|_| unreachable!());
        assert_eq!(claims.home_organization(), Some("org-a"));
        assert_eq!(claims.roles.len(), 4);
        assert_eq!(claims.roles[0].role_name(), Some("OWNER"));
        assert_eq!(claims.roles[0].organization_id(), None);
        assert_eq!(claims.roles[1].organization_id(), Some("org-b"));
        assert_eq!(claims.roles[2].role_name(), Some("VIEWER"));
        assert_eq!(claims.roles[2].organization_id(), Some("org-c"));
        assert_eq!(claims.roles[3].organization_id(), None);
        assert!(claims.permissions.is_none());
    }

    #[test]
    fn role_record_prefers_role_over_other_spellings() {
        let claim = serde_json::from_str::<RoleClaim>(
            r#"{"role": "", "name": "ADMIN", "organizationId": "", "org": "org-x"}"#,
        );
        assert!(claim.is_ok());

        let claim = claim.unwrap_or_else(|_| unreachable!());
        assert_eq!(claim.role_name(), Some("ADMIN"));
        assert_eq!(claim.organization_id(), Some("org-x"));
    }

    #[test]
    fn whitespace_scope_is_kept_as_a_scope() {
        let claim = serde_json::from_str::<RoleClaim>(
            r#"{"role": "ADMIN", "organizationId": "   ", "org": "org-x"}"#,
        );
        assert!(claim.is_ok());

        let claim = claim.unwrap_or_else(|_| unreachable!());
        assert_eq!(claim.organization_id(), Some("   "));
    }

    #[test]
    fn permission_entries_accept_strings_and_records() {
        let permissions = serde_json::from_str::<Vec<PermissionClaim>>(
            r#"["READ_TASK", {"permission": "CREATE_TASK"}, {"name": "VIEW_AUDIT"}, {}]"#,
        );
        assert!(permissions.is_ok());

        let names: Vec<Option<&str>> = permissions
            .as_ref()
            .map(|values| values.iter().map(PermissionClaim::permission_name).collect())
            .unwrap_or_default();
        assert_eq!(
            names,
            vec![
                Some("READ_TASK"),
                Some("CREATE_TASK"),
                Some("VIEW_AUDIT"),
                None
            ]
        );
    }

    #[test]
    fn missing_roles_default_to_empty() {
        let claims = serde_json::from_str::<CallerClaims>(r#"{"sub": "user-2"}"#);
        assert!(claims.is_ok());
        assert!(claims.unwrap_or_else(|_| unreachable!()).roles.is_empty());
    }
}
