//! Query parameters and the checks applied to them.

use std::sync::Arc;

use indexmap::IndexMap;
use jsonapi_core::{ErrorCode, ErrorCollection, ErrorRepository};
use serde::{Deserialize, Serialize};

use crate::error::ValidatorError;
use crate::validator::{ValidationContext, Validator};

pub const INCLUDE: &str = "include";
pub const FIELDS: &str = "fields";
pub const SORT: &str = "sort";
pub const PAGE: &str = "page";
pub const FILTER: &str = "filter";

/// One `sort` field with its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortParameter {
    pub field: String,
    pub ascending: bool,
}

impl SortParameter {
    /// Parse `-field` (descending) or `field` (ascending).
    pub fn parse(value: &str) -> Self {
        match value.strip_prefix('-') {
            Some(field) => Self {
                field: field.to_string(),
                ascending: false,
            },
            None => Self {
                field: value.to_string(),
                ascending: true,
            },
        }
    }
}

/// The JSON:API query parameters of a request.
///
/// `None` means the parameter was not sent, which is distinct from an
/// empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodingParameters {
    pub include: Option<Vec<String>>,
    pub fields: Option<IndexMap<String, Vec<String>>>,
    pub sort: Option<Vec<SortParameter>>,
    pub page: Option<IndexMap<String, String>>,
    pub filter: Option<IndexMap<String, String>>,
    /// Any other parameters, by name.
    pub unrecognized: IndexMap<String, String>,
}

impl EncodingParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_none()
            && self.fields.is_none()
            && self.sort.is_none()
            && self.page.is_none()
            && self.filter.is_none()
            && self.unrecognized.is_empty()
    }
}

/// The query parameters an endpoint accepts.
///
/// Each list restricts the matching parameter; `None` allows any value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub include: Option<Vec<String>>,
    /// Allowed sparse fields by resource type.
    pub fields: Option<IndexMap<String, Vec<String>>>,
    pub sort: Option<Vec<String>>,
    pub page: Option<Vec<String>>,
    pub filter: Option<Vec<String>>,
    pub allow_unrecognized: bool,
}

/// Checks request query parameters against [`QuerySettings`].
///
/// Every violation is an `invalid-query-parameter` error whose source is
/// the offending parameter.
#[derive(Debug, Clone)]
pub struct QueryChecker {
    repository: Arc<ErrorRepository>,
    settings: QuerySettings,
}

impl QueryChecker {
    pub fn new(repository: Arc<ErrorRepository>, settings: QuerySettings) -> Self {
        Self { repository, settings }
    }

    /// A checker that allows every JSON:API parameter but rejects
    /// unrecognized ones.
    pub fn permissive(repository: Arc<ErrorRepository>) -> Self {
        Self::new(repository, QuerySettings::default())
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    pub fn check(&self, parameters: &EncodingParameters) -> Result<(), ErrorCollection> {
        let errors = self.errors(parameters);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn errors(&self, parameters: &EncodingParameters) -> ErrorCollection {
        let mut scope = self.repository.scope();
        let settings = &self.settings;

        if let (Some(paths), Some(allowed)) = (&parameters.include, &settings.include) {
            for path in paths.iter().filter(|path| !allowed.contains(path)) {
                scope
                    .parameter_error(ErrorCode::InvalidQueryParameter, INCLUDE)
                    .interpolate(&[format!("Include path '{}' is not allowed.", path)]);
            }
        }

        if let (Some(fields), Some(allowed)) = (&parameters.fields, &settings.fields) {
            for (resource_type, names) in fields {
                let Some(allowed_names) = allowed.get(resource_type) else {
                    scope
                        .parameter_error(ErrorCode::InvalidQueryParameter, FIELDS)
                        .interpolate(&[format!(
                            "Sparse fieldsets are not allowed for resource type '{}'.",
                            resource_type
                        )]);
                    continue;
                };
                for name in names.iter().filter(|name| !allowed_names.contains(name)) {
                    scope
                        .parameter_error(ErrorCode::InvalidQueryParameter, FIELDS)
                        .interpolate(&[format!(
                            "Field '{}' is not allowed for resource type '{}'.",
                            name, resource_type
                        )]);
                }
            }
        }

        if let (Some(sort), Some(allowed)) = (&parameters.sort, &settings.sort) {
            for parameter in sort.iter().filter(|p| !allowed.contains(&p.field)) {
                scope
                    .parameter_error(ErrorCode::InvalidQueryParameter, SORT)
                    .interpolate(&[format!("Sort field '{}' is not allowed.", parameter.field)]);
            }
        }

        self.check_keys(&mut scope, PAGE, parameters.page.as_ref(), settings.page.as_ref(), "Paging");
        self.check_keys(
            &mut scope,
            FILTER,
            parameters.filter.as_ref(),
            settings.filter.as_ref(),
            "Filter",
        );

        if !settings.allow_unrecognized {
            for name in parameters.unrecognized.keys() {
                scope
                    .parameter_error(ErrorCode::InvalidQueryParameter, name)
                    .interpolate(&[format!("Parameter '{}' is not recognised.", name)]);
            }
        }

        if !scope.is_empty() {
            tracing::debug!("Query check failed with {} error(s)", scope.len());
        }
        scope.finish()
    }

    fn check_keys(
        &self,
        scope: &mut jsonapi_core::ErrorScope<'_>,
        parameter: &str,
        values: Option<&IndexMap<String, String>>,
        allowed: Option<&Vec<String>>,
        label: &str,
    ) {
        let (Some(values), Some(allowed)) = (values, allowed) else {
            return;
        };
        for key in values.keys().filter(|key| !allowed.contains(key)) {
            scope
                .parameter_error(ErrorCode::InvalidQueryParameter, parameter)
                .interpolate(&[format!("{} parameter '{}' is not allowed.", label, key)]);
        }
    }
}

impl Validator<EncodingParameters> for QueryChecker {
    fn validate(
        &self,
        parameters: &EncodingParameters,
        _ctx: &ValidationContext<'_>,
    ) -> Result<ErrorCollection, ValidatorError> {
        Ok(self.errors(parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn checker(settings: QuerySettings) -> QueryChecker {
        QueryChecker::new(Arc::new(ErrorRepository::new()), settings)
    }

    fn parameters_of(errors: &ErrorCollection) -> Vec<Option<&str>> {
        errors.iter().map(|e| e.parameter()).collect()
    }

    #[test]
    fn test_sort_parameter() {
        assert_eq!(
            SortParameter::parse("-created"),
            SortParameter {
                field: "created".into(),
                ascending: false
            }
        );
        assert!(SortParameter::parse("title").ascending);
    }

    #[test]
    fn test_permissive_allows_jsonapi_parameters() {
        let parameters = EncodingParameters {
            include: Some(vec!["author".into()]),
            sort: Some(vec![SortParameter::parse("-title")]),
            ..EncodingParameters::default()
        };
        assert!(checker(QuerySettings::default()).check(&parameters).is_ok());
    }

    #[test]
    fn test_restricted_parameters() {
        let settings = QuerySettings {
            include: Some(vec!["author".into()]),
            fields: Some(IndexMap::from([("posts".to_string(), vec!["title".to_string()])])),
            sort: Some(vec!["title".into()]),
            page: Some(vec!["number".into(), "size".into()]),
            filter: Some(vec![]),
            allow_unrecognized: false,
        };
        let parameters = EncodingParameters {
            include: Some(vec!["author".into(), "comments".into()]),
            fields: Some(IndexMap::from([
                ("posts".to_string(), vec!["title".to_string(), "body".to_string()]),
                ("users".to_string(), vec!["name".to_string()]),
            ])),
            sort: Some(vec![SortParameter::parse("-created")]),
            page: Some(IndexMap::from([("offset".to_string(), "1".to_string())])),
            filter: Some(IndexMap::from([("title".to_string(), "x".to_string())])),
            unrecognized: IndexMap::from([("foo".to_string(), "bar".to_string())]),
        };

        let errors = checker(settings).check(&parameters).unwrap_err();
        assert_eq!(
            parameters_of(&errors),
            vec![
                Some("include"),
                Some("fields"),
                Some("fields"),
                Some("sort"),
                Some("page"),
                Some("filter"),
                Some("foo"),
            ]
        );
        assert_eq!(errors.status(), Some(400));
        assert_eq!(
            errors.first().and_then(|e| e.detail()),
            Some("Include path 'comments' is not allowed.")
        );
        assert!(errors.pointers().iter().all(Option::is_none));
    }

    #[test]
    fn test_allow_unrecognized() {
        let parameters = EncodingParameters {
            unrecognized: IndexMap::from([("foo".to_string(), "bar".to_string())]),
            ..EncodingParameters::default()
        };
        let settings = QuerySettings {
            allow_unrecognized: true,
            ..QuerySettings::default()
        };
        assert!(checker(settings).check(&parameters).is_ok());
        assert!(checker(QuerySettings::default()).check(&parameters).is_err());
    }
}
