//! JSON:API error objects.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The `source` member of an error object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl SourceObject {
    pub fn is_empty(&self) -> bool {
        self.pointer.is_none() && self.parameter.is_none()
    }
}

/// A single JSON:API error object.
///
/// `id`, `status` and `code` are always held as strings; numeric input is
/// stringified when decoding. Empty `status`, `title` and `detail` values
/// read as absent. Absent members are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    #[serde(default, deserialize_with = "stringify", skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    links: Option<Value>,

    #[serde(default, deserialize_with = "stringify", skip_serializing_if = "Option::is_none")]
    status: Option<String>,

    #[serde(default, deserialize_with = "stringify", skip_serializing_if = "Option::is_none")]
    code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<SourceObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<Map<String, Value>>,
}

fn stringify<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.is_empty()).then_some(value)
}

impl ErrorObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an error object, stringifying numeric `id`, `status` and `code`.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut error: Self = serde_json::from_value(value)?;
        error.status = error.status.and_then(non_empty);
        error.title = error.title.and_then(non_empty);
        error.detail = error.detail.and_then(non_empty);
        Ok(error)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    pub fn links(&self) -> Option<&Value> {
        self.links.as_ref()
    }

    pub fn set_links(&mut self, links: Value) -> &mut Self {
        self.links = Some(links);
        self
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// The status parsed as an HTTP status code.
    pub fn http_status(&self) -> Option<u16> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn set_status(&mut self, status: impl ToString) -> &mut Self {
        self.status = non_empty(status.to_string());
        self
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn set_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.code = Some(code.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = non_empty(title);
        self
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn set_detail(&mut self, detail: impl Into<String>) -> &mut Self {
        self.detail = non_empty(detail);
        self
    }

    /// Substitute each `%s` in the detail with the next argument, in order.
    ///
    /// Surplus placeholders are left untouched; surplus arguments are ignored.
    pub fn interpolate<S: AsRef<str>>(&mut self, args: &[S]) -> &mut Self {
        if let Some(detail) = self.detail.take() {
            let mut out = String::with_capacity(detail.len());
            let mut args = args.iter();
            let mut rest = detail.as_str();

            while let Some(at) = rest.find("%s") {
                out.push_str(&rest[..at]);
                match args.next() {
                    Some(arg) => out.push_str(arg.as_ref()),
                    None => out.push_str("%s"),
                }
                rest = &rest[at + 2..];
            }
            out.push_str(rest);
            self.detail = Some(out);
        }
        self
    }

    pub fn source(&self) -> Option<&SourceObject> {
        self.source.as_ref()
    }

    pub fn set_source(&mut self, source: Option<SourceObject>) -> &mut Self {
        self.source = source;
        self
    }

    pub fn pointer(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.pointer.as_deref())
    }

    pub fn set_pointer(&mut self, pointer: impl Into<String>) -> &mut Self {
        self.source.get_or_insert_with(SourceObject::default).pointer = Some(pointer.into());
        self
    }

    pub fn parameter(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.parameter.as_deref())
    }

    pub fn set_parameter(&mut self, parameter: impl Into<String>) -> &mut Self {
        self.source.get_or_insert_with(SourceObject::default).parameter = Some(parameter.into());
        self
    }

    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.meta.as_ref()
    }

    pub fn set_meta(&mut self, meta: Map<String, Value>) -> &mut Self {
        self.meta = Some(meta);
        self
    }

    /// Chainable form of [`set_pointer`](Self::set_pointer).
    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.set_pointer(pointer);
        self
    }

    pub fn with_status(mut self, status: impl ToString) -> Self {
        self.set_status(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.set_code(code);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(title);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.set_detail(detail);
        self
    }
}

impl std::fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(pointer) = self.pointer() {
            write!(f, "{}: ", if pointer.is_empty() { "/" } else { pointer })?;
        } else if let Some(parameter) = self.parameter() {
            write!(f, "?{}: ", parameter)?;
        }

        let message = self
            .detail
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("Unknown error");
        write!(f, "{}", message)?;

        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        Ok(())
    }
}
