use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use jsonapi_core::{ErrorCode, ErrorCollection, ErrorRepository, ErrorScope};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidatorError;
use crate::validator::{ValidationContext, Validator};

/// The JSON type an attribute value must have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Any,
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Any => "any",
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }

    /// Whether a non-null value has this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueKind::Any => true,
            ValueKind::String => value.is_string(),
            ValueKind::Integer => value.is_i64() || value.is_u64(),
            ValueKind::Number => value.is_number(),
            ValueKind::Boolean => value.is_boolean(),
            ValueKind::Array => value.is_array(),
            ValueKind::Object => value.is_object(),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(ValueKind::Any),
            "string" => Ok(ValueKind::String),
            "integer" => Ok(ValueKind::Integer),
            "number" => Ok(ValueKind::Number),
            "boolean" => Ok(ValueKind::Boolean),
            "array" => Ok(ValueKind::Array),
            "object" => Ok(ValueKind::Object),
            other => Err(format!("unknown value kind '{}'", other)),
        }
    }
}

/// Checks the JSON type of a value and optional constraints on it.
///
/// Every violated constraint is reported, each as an `invalid-value` error
/// whose `meta` names the `rule` along with the `expected` and `actual`
/// values.
#[derive(Debug, Clone)]
pub struct ValueValidator {
    repository: Arc<ErrorRepository>,
    kind: ValueKind,
    nullable: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    allowed: Option<Vec<String>>,
}

impl ValueValidator {
    pub fn new(repository: Arc<ErrorRepository>, kind: ValueKind) -> Self {
        Self {
            repository,
            kind,
            nullable: false,
            min_length: None,
            max_length: None,
            pattern: None,
            minimum: None,
            maximum: None,
            allowed: None,
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    pub fn maximum(mut self, max: f64) -> Self {
        self.maximum = Some(max);
        self
    }

    pub fn allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    fn check_string(&self, scope: &mut ErrorScope<'_>, value: &str) {
        let length = value.chars().count();

        if let Some(min) = self.min_length {
            if length < min {
                violation(
                    scope,
                    format!("The value must be at least {} characters.", min),
                    "minLength",
                    format!(">= {}", min),
                    length.to_string(),
                );
            }
        }

        if let Some(max) = self.max_length {
            if length > max {
                violation(
                    scope,
                    format!("The value must not exceed {} characters.", max),
                    "maxLength",
                    format!("<= {}", max),
                    length.to_string(),
                );
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                violation(
                    scope,
                    "The value does not match the required format.".to_string(),
                    "pattern",
                    pattern.as_str().to_string(),
                    value.to_string(),
                );
            }
        }

        if let Some(allowed) = &self.allowed {
            if !allowed.iter().any(|a| a == value) {
                violation(
                    scope,
                    format!("The value must be one of: {}.", allowed.join(", ")),
                    "enum",
                    allowed.join(" | "),
                    value.to_string(),
                );
            }
        }
    }

    fn check_number(&self, scope: &mut ErrorScope<'_>, value: f64) {
        if let Some(min) = self.minimum {
            if value < min {
                violation(
                    scope,
                    format!("The value must be at least {}.", min),
                    "minimum",
                    format!(">= {}", min),
                    value.to_string(),
                );
            }
        }

        if let Some(max) = self.maximum {
            if value > max {
                violation(
                    scope,
                    format!("The value must not exceed {}.", max),
                    "maximum",
                    format!("<= {}", max),
                    value.to_string(),
                );
            }
        }
    }
}

fn violation(scope: &mut ErrorScope<'_>, detail: String, rule: &str, expected: String, actual: String) {
    let mut meta = Map::new();
    meta.insert("rule".to_string(), Value::String(rule.to_string()));
    meta.insert("expected".to_string(), Value::String(expected));
    meta.insert("actual".to_string(), Value::String(actual));

    scope
        .error(ErrorCode::InvalidValue, "")
        .set_detail(detail)
        .set_meta(meta);
}

impl Validator for ValueValidator {
    fn validate(&self, value: &Value, _ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        let mut scope = self.repository.scope();

        if value.is_null() {
            if !self.nullable {
                scope
                    .error(ErrorCode::InvalidValue, "")
                    .set_detail("The value cannot be null.");
            }
            return Ok(scope.finish());
        }

        if !self.kind.matches(value) {
            scope
                .error(ErrorCode::InvalidValue, "")
                .set_detail(format!("Expecting a value of type {}.", self.kind));
            return Ok(scope.finish());
        }

        if let Some(s) = value.as_str() {
            self.check_string(&mut scope, s);
        } else if let Some(n) = value.as_f64() {
            self.check_number(&mut scope, n);
        }

        Ok(scope.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn validator(kind: ValueKind) -> ValueValidator {
        ValueValidator::new(Arc::new(ErrorRepository::new()), kind)
    }

    fn errors(validator: &ValueValidator, value: Value) -> ErrorCollection {
        validator.validate(&value, &ValidationContext::new()).unwrap()
    }

    #[test]
    fn test_kinds() {
        assert!(errors(&validator(ValueKind::String), json!("a")).is_empty());
        assert!(errors(&validator(ValueKind::Integer), json!(3)).is_empty());
        assert!(!errors(&validator(ValueKind::Integer), json!(3.5)).is_empty());
        assert!(errors(&validator(ValueKind::Number), json!(3.5)).is_empty());
        assert!(errors(&validator(ValueKind::Boolean), json!(true)).is_empty());
        assert!(errors(&validator(ValueKind::Any), json!([1])).is_empty());

        let wrong = errors(&validator(ValueKind::String), json!(1));
        assert_eq!(wrong.codes(), vec![Some("invalid-value")]);
        assert_eq!(wrong.first().and_then(|e| e.detail()), Some("Expecting a value of type string."));
    }

    #[test]
    fn test_null_policy() {
        assert_eq!(errors(&validator(ValueKind::String), Value::Null).len(), 1);
        assert!(errors(&validator(ValueKind::String).nullable(true), Value::Null).is_empty());
    }

    #[test]
    fn test_string_constraints_report_every_violation() {
        let validator = validator(ValueKind::String)
            .min_length(3)
            .pattern(Regex::new("^[a-z]+$").unwrap())
            .allowed(["draft", "published"]);

        let errors = errors(&validator, json!("A1"));
        let rules: Vec<_> = errors
            .iter()
            .filter_map(|e| e.meta().and_then(|m| m.get("rule")).and_then(Value::as_str))
            .collect();
        assert_eq!(rules, vec!["minLength", "pattern", "enum"]);
    }

    #[test]
    fn test_length_counts_characters() {
        let validator = validator(ValueKind::String).max_length(3);
        assert!(errors(&validator, json!("éèê")).is_empty());
        assert_eq!(errors(&validator, json!("abcd")).len(), 1);
    }

    #[test]
    fn test_numeric_bounds() {
        let validator = validator(ValueKind::Integer).minimum(1.0).maximum(10.0);
        assert!(errors(&validator, json!(5)).is_empty());

        let below = errors(&validator, json!(0));
        let meta = below.first().and_then(|e| e.meta()).cloned().unwrap();
        assert_eq!(meta["rule"], json!("minimum"));
        assert_eq!(meta["expected"], json!(">= 1"));
        assert_eq!(meta["actual"], json!("0"));

        assert_eq!(errors(&validator, json!(11)).len(), 1);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("integer".parse::<ValueKind>(), Ok(ValueKind::Integer));
        assert!("date".parse::<ValueKind>().is_err());
    }
}
