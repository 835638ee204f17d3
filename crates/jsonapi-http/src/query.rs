//! Parsing query strings into encoding parameters.

use indexmap::IndexMap;
use jsonapi_core::{ErrorCode, ErrorCollection, ErrorRepository};
use jsonapi_validation::query::{FIELDS, FILTER, INCLUDE, PAGE, SORT};
use jsonapi_validation::{EncodingParameters, SortParameter};

/// Split `family[member]` into its member. `Some(None)` for a bare family.
fn member<'a>(key: &'a str, family: &str) -> Option<Option<&'a str>> {
    if key == family {
        return Some(None);
    }
    key.strip_prefix(family)
        .and_then(|rest| rest.strip_prefix('['))
        .and_then(|rest| rest.strip_suffix(']'))
        .map(Some)
}

fn list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

/// Parse a raw query string (without the leading `?`).
///
/// `fields`, `page` and `filter` must be keyed, as in `fields[posts]=title`;
/// a bare family is an `invalid-query-parameter` error. Parameters outside
/// the JSON:API families are kept as unrecognized.
pub fn parse_query(repository: &ErrorRepository, query: &str) -> Result<EncodingParameters, ErrorCollection> {
    let mut parameters = EncodingParameters::new();
    let mut scope = repository.scope();

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key == INCLUDE {
            parameters.include.get_or_insert_with(Vec::new).extend(list(&value));
        } else if key == SORT {
            parameters
                .sort
                .get_or_insert_with(Vec::new)
                .extend(list(&value).map(|field| SortParameter::parse(&field)));
        } else if let Some(resource_type) = member(&key, FIELDS) {
            match resource_type {
                Some(resource_type) => {
                    parameters
                        .fields
                        .get_or_insert_with(IndexMap::new)
                        .insert(resource_type.to_string(), list(&value).collect());
                }
                None => {
                    scope
                        .parameter_error(ErrorCode::InvalidQueryParameter, FIELDS)
                        .interpolate(&["Sparse fieldsets must be keyed by resource type."]);
                }
            }
        } else if let Some(name) = member(&key, PAGE) {
            keyed(&mut scope, &mut parameters.page, PAGE, name, &value);
        } else if let Some(name) = member(&key, FILTER) {
            keyed(&mut scope, &mut parameters.filter, FILTER, name, &value);
        } else {
            parameters.unrecognized.insert(key.into_owned(), value.into_owned());
        }
    }

    if scope.is_empty() {
        Ok(parameters)
    } else {
        Err(scope.finish())
    }
}

fn keyed(
    scope: &mut jsonapi_core::ErrorScope<'_>,
    target: &mut Option<IndexMap<String, String>>,
    family: &str,
    name: Option<&str>,
    value: &str,
) {
    match name {
        Some(name) => {
            target
                .get_or_insert_with(IndexMap::new)
                .insert(name.to_string(), value.to_string());
        }
        None => {
            scope
                .parameter_error(ErrorCode::InvalidQueryParameter, family)
                .interpolate(&[format!("The {} parameter must be keyed, as in {}[name].", family, family)]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(query: &str) -> Result<EncodingParameters, ErrorCollection> {
        parse_query(&ErrorRepository::new(), query)
    }

    #[test]
    fn test_empty_query() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_jsonapi_families() {
        let parameters = parse(
            "include=author,comments.author&fields%5Bposts%5D=title,body&sort=-created,title&page[number]=2&filter[title]=hello%20world&foo=bar",
        )
        .unwrap();

        assert_eq!(
            parameters.include,
            Some(vec!["author".to_string(), "comments.author".to_string()])
        );
        assert_eq!(
            parameters.fields.as_ref().and_then(|fields| fields.get("posts")).cloned(),
            Some(vec!["title".to_string(), "body".to_string()])
        );
        assert_eq!(
            parameters.sort,
            Some(vec![SortParameter::parse("-created"), SortParameter::parse("title")])
        );
        assert_eq!(
            parameters.page.as_ref().and_then(|page| page.get("number")).map(String::as_str),
            Some("2")
        );
        assert_eq!(
            parameters.filter.as_ref().and_then(|filter| filter.get("title")).map(String::as_str),
            Some("hello world")
        );
        assert_eq!(parameters.unrecognized.get("foo").map(String::as_str), Some("bar"));
    }

    #[test]
    fn test_empty_include_is_present() {
        assert_eq!(parse("include=").unwrap().include, Some(vec![]));
    }

    #[test]
    fn test_bare_families_are_errors() {
        let errors = parse("fields=title&page=2&filter=x").unwrap_err();
        let parameters: Vec<_> = errors.iter().map(|e| e.parameter()).collect();
        assert_eq!(parameters, vec![Some("fields"), Some("page"), Some("filter")]);
        assert_eq!(errors.status(), Some(400));
    }

    #[test]
    fn test_lookalike_keys_are_unrecognized() {
        let parameters = parse("pages=1&includes=x").unwrap();
        assert_eq!(parameters.unrecognized.len(), 2);
        assert!(parameters.page.is_none());
    }
}
