//! JSON Schema loading for document snapshots.
//!
//! The canonical schema ships inside the crate; callers may point at an
//! on-disk copy instead (for example a newer schema next to a document). The
//! loader extracts the `schema_version` const, enforces the allowed set, and
//! compiles a validator.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

/// Schema bundled with the crate; see `schema/document.schema.json`.
pub const BUNDLED_DOCUMENT_SCHEMA: &str = include_str!("../schema/document.schema.json");

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

/// Controls where the schema comes from and which versions are accepted.
pub(crate) struct SchemaLoadOptions<'a> {
    /// Read the schema from disk instead of the bundled copy.
    pub schema_path: Option<&'a Path>,
    /// Where to find the schema_version const inside the schema payload.
    pub schema_version_pointer: &'a str,
    /// Allowed schema_version values; enforced when present.
    pub allowed_versions: Option<&'a BTreeSet<String>>,
}

impl<'a> Default for SchemaLoadOptions<'a> {
    fn default() -> Self {
        Self {
            schema_path: None,
            schema_version_pointer: "/properties/schema_version/const",
            allowed_versions: None,
        }
    }
}

pub(crate) fn load_json_schema(options: SchemaLoadOptions<'_>) -> Result<SchemaLoadResult> {
    let (schema_value, origin): (Value, String) = match options.schema_path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
            let value = serde_json::from_reader(file)
                .with_context(|| format!("parsing schema {}", path.display()))?;
            (value, path.display().to_string())
        }
        None => (
            serde_json::from_str(BUNDLED_DOCUMENT_SCHEMA).context("parsing bundled schema")?,
            "bundled document schema".to_string(),
        ),
    };

    let schema_version = extract_schema_version(&schema_value, options.schema_version_pointer)
        .ok_or_else(|| anyhow!("{origin} is missing a schema_version const"))?;

    if let Some(allowed) = options.allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|err| anyhow!("compiling {origin}: {err}"))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

/// Validate `instance`, joining every violation into one error.
pub(crate) fn validate_instance(
    schema: &SchemaLoadResult,
    instance: &Value,
    label: &str,
) -> Result<()> {
    if let Err(errors) = schema.compiled.validate(instance) {
        let details = errors
            .map(|err| format!("{}: {}", err.instance_path, err))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{label} failed schema validation:\n{details}");
    }
    Ok(())
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}
