//! Validating a document file against a schema file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use jsonapi_core::{DocumentDecoder, ErrorCollection};
use jsonapi_http::{parse_query, validate_request, InboundRequest, Method, RequestError};
use jsonapi_store::{adapters_from_json, ResourceStore};
use jsonapi_validation::{ProviderRegistry, RequestIntent, SchemaFile, ValidatorFactory};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// What to validate.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub schema: PathBuf,
    pub document: PathBuf,
    pub intent: RequestIntent,
    /// Defaults to the document's primary data type, except for
    /// relationship intents.
    pub resource_type: Option<String>,
    pub id: Option<String>,
    pub relationship: Option<String>,
    /// Raw query string to check alongside the document.
    pub query: Option<String>,
    /// Seed records as `{"type": [{"id": ..}, ..]}`.
    pub records: Option<PathBuf>,
}

impl ValidateOptions {
    pub fn new(schema: impl Into<PathBuf>, document: impl Into<PathBuf>) -> Self {
        Self {
            schema: schema.into(),
            document: document.into(),
            intent: RequestIntent::Create,
            resource_type: None,
            id: None,
            relationship: None,
            query: None,
            records: None,
        }
    }
}

/// The outcome printed by `jsonapi validate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub valid: bool,
    pub status: Option<u16>,
    pub errors: Value,
}

impl Report {
    fn valid() -> Self {
        Self {
            valid: true,
            status: None,
            errors: Value::Array(Vec::new()),
        }
    }

    fn invalid(status: u16, errors: &ErrorCollection) -> Self {
        let errors = errors
            .to_document()
            .get("errors")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        Self {
            valid: false,
            status: Some(status),
            errors,
        }
    }
}

/// Load a schema file and report its warnings.
pub fn load_schema(path: &Path) -> Result<SchemaFile> {
    let schema = SchemaFile::from_file(path).with_context(|| format!("Failed to load schema {}", path.display()))?;
    for warning in schema.validate()? {
        warn!("{}", warning);
    }
    Ok(schema)
}

/// Validate the document described by `options`.
///
/// Problems with the document, its query or the records it addresses are
/// part of the [`Report`]. Problems with the schema or the options are
/// errors.
pub fn run_validation(options: &ValidateOptions) -> Result<Report> {
    info!("Validating {} against {}", options.document.display(), options.schema.display());

    let schema = load_schema(&options.schema)?;
    let repository = Arc::new(schema.repository()?);
    let store = Arc::new(ResourceStore::new(adapters_from_json(&seed(&schema, options.records.as_deref())?)?));
    let factory = ValidatorFactory::new(repository.clone(), store.clone());
    let providers = ProviderRegistry::from_schema(&schema, &factory)?;

    let content = fs::read_to_string(&options.document)
        .with_context(|| format!("Failed to read document {}", options.document.display()))?;
    let document = match DocumentDecoder::new().decode(&content) {
        Ok(document) => document,
        Err(err) => {
            debug!("Document could not be decoded: {}", err);
            return Ok(Report::invalid(400, &err.to_errors(&repository)));
        }
    };

    let resource_type = match &options.resource_type {
        Some(resource_type) => resource_type.clone(),
        None if !options.intent.is_relationship() => primary_type(&document.to_value())
            .context("No --type given and the document has no primary data type")?,
        None => bail!("Intent '{}' needs a --type", options.intent),
    };

    let mut request = InboundRequest::new(method(options.intent)?, resource_type);
    if let Some(id) = &options.id {
        request = request.with_id(id.clone());
    }
    if let Some(key) = &options.relationship {
        request = request.with_relationship(key.clone());
    }
    if let Some(query) = &options.query {
        match parse_query(&repository, query) {
            Ok(parameters) => request = request.with_parameters(parameters),
            Err(errors) => return Ok(Report::invalid(400, &errors)),
        }
    }
    let request = request.with_document(document);

    if request.intent().ok() != Some(options.intent) {
        bail!("Intent '{}' needs {}", options.intent, requirements(options.intent));
    }

    match validate_request(&request, store.as_ref(), &providers, None) {
        Ok(_) => Ok(Report::valid()),
        Err(RequestError::Configuration(message)) => bail!(message),
        Err(err) => Ok(Report::invalid(err.status().as_u16(), &err.errors())),
    }
}

fn method(intent: RequestIntent) -> Result<Method> {
    let method = match intent {
        RequestIntent::Create | RequestIntent::AddToRelationship => Method::POST,
        RequestIntent::Update | RequestIntent::ReplaceRelationship => Method::PATCH,
        RequestIntent::RemoveFromRelationship => Method::DELETE,
        other => bail!("Intent '{}' carries no document", other),
    };
    Ok(method)
}

fn requirements(intent: RequestIntent) -> &'static str {
    match intent {
        RequestIntent::Create => "no --id",
        RequestIntent::Update => "an --id and no --relationship",
        _ => "an --id and a --relationship",
    }
}

fn primary_type(document: &Value) -> Option<String> {
    document
        .get("data")
        .and_then(|data| data.get("type"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Seed records for the store, with an empty set for every schema type the
/// records file does not mention.
fn seed(schema: &SchemaFile, records: Option<&Path>) -> Result<Value> {
    let mut seed = match records {
        Some(path) => {
            let content =
                fs::read_to_string(path).with_context(|| format!("Failed to read records {}", path.display()))?;
            match serde_json::from_str::<Value>(&content)
                .with_context(|| format!("Failed to parse records {}", path.display()))?
            {
                Value::Object(map) => map,
                _ => bail!("Records file {} must hold an object keyed by resource type", path.display()),
            }
        }
        None => Map::new(),
    };

    for resource_type in schema.resource_types() {
        seed.entry(resource_type.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
    }
    Ok(Value::Object(seed))
}
