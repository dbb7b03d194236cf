//! Deserializable representation of a host document snapshot.
//!
//! The types mirror `schema/document.schema.json` so fixtures, tests, and the
//! CLI can describe a host model without ad-hoc JSON handling. Use
//! `DocumentIndex` for validation and querying; use these structs when the raw
//! document is needed.

use crate::catalog::identity::{CategoryId, ClassName, ElementId, ElementKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
/// Full document as stored on disk.
pub struct Document {
    pub schema_version: String,
    pub title: String,
    #[serde(default)]
    pub categories: Vec<CategoryDescriptor>,
    #[serde(default)]
    pub classes: Vec<ClassDescriptor>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// One domain category: a localized display name plus its stable identifier.
pub struct CategoryDescriptor {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// One object-model class reachable by name.
///
/// `base` lets the store reproduce the host's inheritance: querying a class
/// also yields elements of its descendants.
pub struct ClassDescriptor {
    pub name: ClassName,
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<ClassName>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// A domain object: either a type definition or a placed instance.
pub struct Element {
    pub id: ElementId,
    pub name: String,
    pub class: ClassName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    pub kind: ElementKind,
    /// Owning family name for loadable components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_template: bool,
}

impl Element {
    /// Name shown to users: `"<family>: <type>"` for family members.
    pub fn display_name(&self) -> String {
        match &self.family {
            Some(family) => format!("{family}: {}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_type(&self) -> bool {
        self.kind == ElementKind::TypeDefinition
    }

    pub fn in_category(&self, id: &CategoryId) -> bool {
        self.category.as_ref() == Some(id)
    }
}

/// Read and parse a document from disk without additional validation.
pub fn load_document_from_path(path: &Path) -> Result<Document> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let document: Document = serde_json::from_str(&data)
        .with_context(|| format!("parsing document {}", path.display()))?;
    Ok(document)
}
