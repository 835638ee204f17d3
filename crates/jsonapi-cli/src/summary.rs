//! Human-readable schema summaries.

use std::fmt::Write;

use jsonapi_validation::{ResourceSchema, SchemaFile};

/// Describe every resource type in `schema`, one block per type.
pub fn summarize(schema: &SchemaFile) -> String {
    let mut out = String::new();

    for (resource_type, resource) in &schema.resources {
        let _ = writeln!(out, "{}", resource_type);
        describe(&mut out, resource);
    }

    if !schema.errors.is_empty() {
        let codes: Vec<&str> = schema.errors.keys().map(String::as_str).collect();
        let _ = writeln!(out, "error overrides: {}", codes.join(", "));
    }

    out
}

fn describe(out: &mut String, resource: &ResourceSchema) {
    if resource.strict_attributes {
        let _ = writeln!(out, "  strict attributes");
    }

    for (name, attribute) in &resource.attributes {
        let mut flags = Vec::new();
        if attribute.required {
            flags.push("required");
        }
        if attribute.nullable {
            flags.push("nullable");
        }
        let _ = write!(out, "  attribute {}: {}", name, attribute.kind.as_str());
        if !flags.is_empty() {
            let _ = write!(out, " ({})", flags.join(", "));
        }
        let _ = writeln!(out);
    }

    for (key, relationship) in &resource.relationships {
        let types = if relationship.types.is_empty() {
            "any".to_string()
        } else {
            relationship.types.join("|")
        };
        let _ = write!(out, "  relationship {}: {} -> {}", key, relationship.kind.as_str(), types);
        if relationship.required {
            let _ = write!(out, " (required)");
        }
        let _ = writeln!(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary() {
        let schema = SchemaFile::parse(
            r#"
[errors.not-found]
status = 422

[resources.posts]
strict_attributes = true

[resources.posts.attributes.title]
kind = "string"
required = true

[resources.posts.relationships.author]
kind = "has-one"
types = ["users"]
required = true

[resources.posts.relationships.tags]
kind = "has-many"
"#,
        )
        .unwrap();

        assert_eq!(
            summarize(&schema),
            "posts\n  strict attributes\n  attribute title: string (required)\n  relationship author: has-one -> users (required)\n  relationship tags: has-many -> any\nerror overrides: not-found\n"
        );
    }
}
