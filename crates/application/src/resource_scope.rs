use std::collections::HashMap;

use serde_json::Value;
use tasklane_core::OrganizationId;

const ORGANIZATION_ID_KEY: &str = "organizationId";
const ORGANIZATION_ALIAS_PATH_KEY: &str = "idOrg";
const TASK_BODY_KEY: &str = "task";

/// Request locations that may carry the resource organization id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceScopeSources {
    path_params: HashMap<String, String>,
    query_params: HashMap<String, String>,
    body: Option<Value>,
}

impl ResourceScopeSources {
    /// Creates empty sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the matched path parameters.
    #[must_use]
    pub fn with_path_params(mut self, path_params: HashMap<String, String>) -> Self {
        self.path_params = path_params;
        self
    }

    /// Sets the decoded query parameters.
    #[must_use]
    pub fn with_query_params(mut self, query_params: HashMap<String, String>) -> Self {
        self.query_params = query_params;
        self
    }

    /// Sets the parsed JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    /// Extracts the resource organization id; the first non-empty source wins.
    ///
    /// Order: path `organizationId`, body `organizationId`, query
    /// `organizationId`, body `task.organizationId`, path `idOrg`.
    #[must_use]
    pub fn resource_organization_id(&self) -> Option<OrganizationId> {
        let body = self.body.as_ref();

        OrganizationId::from_optional(self.path_param(ORGANIZATION_ID_KEY))
            .or_else(|| {
                body.and_then(|body| body_organization_id(body.get(ORGANIZATION_ID_KEY)))
            })
            .or_else(|| OrganizationId::from_optional(self.query_param(ORGANIZATION_ID_KEY)))
            .or_else(|| {
                body.and_then(|body| {
                    body_organization_id(
                        body.get(TASK_BODY_KEY)
                            .and_then(|task| task.get(ORGANIZATION_ID_KEY)),
                    )
                })
            })
            .or_else(|| OrganizationId::from_optional(self.path_param(ORGANIZATION_ALIAS_PATH_KEY)))
    }

    fn path_param(&self, key: &str) -> Option<&str> {
        self.path_params.get(key).map(String::as_str)
    }

    fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params.get(key).map(String::as_str)
    }
}

fn body_organization_id(value: Option<&Value>) -> Option<OrganizationId> {
    match value? {
        Value::String(value) => OrganizationId::from_optional(Some(value.as_str())),
        Value::Number(value) => OrganizationId::new(value.to_string()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use tasklane_core::OrganizationId;

    use super::ResourceScopeSources;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    fn extracted(sources: &ResourceScopeSources) -> Option<String> {
        sources
            .resource_organization_id()
            .map(|value| OrganizationId::as_str(&value).to_owned())
    }

    #[test]
    fn path_parameter_wins_over_everything() {
        let sources = ResourceScopeSources::new()
            .with_path_params(params(&[("organizationId", "path"), ("idOrg", "alias")]))
            .with_query_params(params(&[("organizationId", "query")]))
            .with_body(Some(json!({"organizationId": "body"})));

        assert_eq!(extracted(&sources).as_deref(), Some("path"));
    }

    #[test]
    fn body_wins_over_query() {
        let sources = ResourceScopeSources::new()
            .with_query_params(params(&[("organizationId", "query")]))
            .with_body(Some(json!({"organizationId": "body"})));

        assert_eq!(extracted(&sources).as_deref(), Some("body"));
    }

    #[test]
    fn query_wins_over_nested_task_and_alias() {
        let sources = ResourceScopeSources::new()
            .with_path_params(params(&[("idOrg", "alias")]))
            .with_query_params(params(&[("organizationId", "query")]))
            .with_body(Some(json!({"task": {"organizationId": "nested"}})));

        assert_eq!(extracted(&sources).as_deref(), Some("query"));
    }

    #[test]
    fn nested_task_wins_over_path_alias() {
        let sources = ResourceScopeSources::new()
            .with_path_params(params(&[("idOrg", "alias")]))
            .with_body(Some(json!({"task": {"organizationId": "nested"}})));

        assert_eq!(extracted(&sources).as_deref(), Some("nested"));
    }

    #[test]
    fn empty_values_fall_through() {
        let sources = ResourceScopeSources::new()
            .with_path_params(params(&[("organizationId", ""), ("idOrg", "alias")]))
            .with_query_params(params(&[("organizationId", "  ")]))
            .with_body(Some(json!({"organizationId": null, "task": {"organizationId": ""}})));

        assert_eq!(extracted(&sources).as_deref(), Some("alias"));
    }

    #[test]
    fn numeric_body_ids_are_accepted() {
        let sources = ResourceScopeSources::new().with_body(Some(json!({"organizationId": 42})));
        assert_eq!(extracted(&sources).as_deref(), Some("42"));
    }

    #[test]
    fn nothing_to_extract_yields_none() {
        let sources = ResourceScopeSources::new().with_body(Some(json!(["not", "an", "object"])));
        assert!(sources.resource_organization_id().is_none());
    }
}
