//! Indexed, validated view of a document snapshot.
//!
//! The index enforces the document schema and the referential rules the
//! schema cannot express (unique ids, known categories, acyclic class
//! hierarchy), then answers `ElementStore` queries from in-memory maps.

use crate::catalog::identity::{CategoryId, ClassName, ElementId};
use crate::catalog::load_document_from_path;
use crate::catalog::model::{CategoryDescriptor, ClassDescriptor, Document, Element};
use crate::schema_loader::{SchemaLoadOptions, load_json_schema, validate_instance};
use crate::store::ElementStore;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

// Longest base chain accepted before the hierarchy is treated as cyclic.
const MAX_CLASS_DEPTH: usize = 64;

/// Schema versions the document model can read.
pub const SUPPORTED_SCHEMA_VERSIONS: &[&str] = &["hydrator_document_v1"];

#[derive(Debug)]
/// Document plus derived lookups keyed by element id, category, and class.
pub struct DocumentIndex {
    document: Document,
    by_id: BTreeMap<ElementId, usize>,
    /// Ancestor chain per class, nearest base first.
    lineage: BTreeMap<ClassName, Vec<ClassName>>,
}

impl DocumentIndex {
    /// Load, validate against the bundled schema, and index a document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_schema(path, None)
    }

    /// Like `load`, but validates against an on-disk schema when one is given.
    ///
    /// The schema must declare one of `SUPPORTED_SCHEMA_VERSIONS`; the document
    /// model only understands those.
    pub fn load_with_schema(path: &Path, schema_path: Option<&Path>) -> Result<Self> {
        validate_against_schema(path, schema_path)?;
        let document =
            load_document_from_path(path).with_context(|| format!("loading {}", path.display()))?;
        Self::from_document(document)
    }

    /// Index an already-parsed document, applying the referential checks.
    pub fn from_document(document: Document) -> Result<Self> {
        if document.title.trim().is_empty() {
            bail!("document title must not be empty");
        }
        let categories_by_id = build_category_index(&document.categories)?;
        let classes_by_name = build_class_index(&document.classes)?;
        let lineage = build_lineage(&document.classes, &classes_by_name)?;
        let by_id = build_element_index(&document.elements, &categories_by_id)?;
        Ok(Self {
            document,
            by_id,
            lineage,
        })
    }

    pub fn title(&self) -> &str {
        &self.document.title
    }

    /// Resolve an element by id.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.by_id.get(&id).map(|&idx| &self.document.elements[idx])
    }

    fn descends_from(&self, class: &ClassName, ancestor: &ClassName) -> bool {
        if class == ancestor {
            return true;
        }
        self.lineage
            .get(class)
            .is_some_and(|chain| chain.contains(ancestor))
    }

    fn filter_elements(&self, predicate: impl Fn(&Element) -> bool) -> Vec<Element> {
        self.document
            .elements
            .iter()
            .filter(|element| predicate(element))
            .cloned()
            .collect()
    }
}

impl ElementStore for DocumentIndex {
    fn query_by_class(&self, class: &ClassName) -> Result<Vec<Element>> {
        Ok(self.filter_elements(|element| self.descends_from(&element.class, class)))
    }

    fn query_category_types(&self, category: &CategoryId) -> Result<Vec<Element>> {
        Ok(self.filter_elements(|element| element.in_category(category) && element.is_type()))
    }

    fn query_category_instances(&self, category: &CategoryId) -> Result<Vec<Element>> {
        Ok(self.filter_elements(|element| element.in_category(category) && !element.is_type()))
    }

    fn categories(&self) -> Result<Vec<CategoryDescriptor>> {
        Ok(self.document.categories.clone())
    }

    fn find_category_by_display_name(&self, name: &str) -> Result<Option<CategoryDescriptor>> {
        let name = name.trim();
        Ok(self
            .document
            .categories
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    fn find_category_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<CategoryDescriptor>> {
        let identifier = identifier.trim();
        Ok(self
            .document
            .categories
            .iter()
            .find(|category| category.id.as_str().eq_ignore_ascii_case(identifier))
            .cloned())
    }

    fn classes(&self) -> Result<Vec<ClassDescriptor>> {
        Ok(self.document.classes.clone())
    }

    fn find_class_by_name(&self, name: &str) -> Result<Option<ClassDescriptor>> {
        let name = name.trim();
        Ok(self
            .document
            .classes
            .iter()
            .find(|class| class.name.as_str().eq_ignore_ascii_case(name))
            .cloned())
    }
}

fn build_category_index(categories: &[CategoryDescriptor]) -> Result<BTreeMap<CategoryId, usize>> {
    let mut map = BTreeMap::new();
    let mut names: BTreeSet<String> = BTreeSet::new();
    for (idx, category) in categories.iter().enumerate() {
        if category.id.as_str().trim().is_empty() {
            bail!("encountered category with no id");
        }
        if map.insert(category.id.clone(), idx).is_some() {
            bail!("duplicate category id {}", category.id);
        }
        if !names.insert(category.name.to_lowercase()) {
            bail!("duplicate category display name '{}'", category.name);
        }
    }
    Ok(map)
}

fn build_class_index(classes: &[ClassDescriptor]) -> Result<BTreeMap<ClassName, usize>> {
    let mut map = BTreeMap::new();
    for (idx, class) in classes.iter().enumerate() {
        if class.name.as_str().trim().is_empty() {
            bail!("encountered class with no name");
        }
        if map.insert(class.name.clone(), idx).is_some() {
            bail!("duplicate class {}", class.name);
        }
    }
    for class in classes {
        if let Some(base) = &class.base {
            if !map.contains_key(base) {
                bail!("class {} references unknown base {}", class.name, base);
            }
        }
    }
    Ok(map)
}

fn build_lineage(
    classes: &[ClassDescriptor],
    by_name: &BTreeMap<ClassName, usize>,
) -> Result<BTreeMap<ClassName, Vec<ClassName>>> {
    let mut lineage = BTreeMap::new();
    for class in classes {
        let mut chain = Vec::new();
        let mut current = class.base.clone();
        while let Some(base) = current {
            if base == class.name || chain.len() >= MAX_CLASS_DEPTH {
                bail!("class hierarchy of {} is cyclic", class.name);
            }
            current = by_name
                .get(&base)
                .and_then(|&idx| classes[idx].base.clone());
            chain.push(base);
        }
        lineage.insert(class.name.clone(), chain);
    }
    Ok(lineage)
}

fn build_element_index(
    elements: &[Element],
    categories: &BTreeMap<CategoryId, usize>,
) -> Result<BTreeMap<ElementId, usize>> {
    let mut map = BTreeMap::new();
    for (idx, element) in elements.iter().enumerate() {
        if map.insert(element.id, idx).is_some() {
            bail!("duplicate element id {}", element.id);
        }
        if let Some(category) = &element.category {
            if !categories.contains_key(category) {
                bail!(
                    "element {} references unknown category {}",
                    element.id,
                    category
                );
            }
        }
    }
    Ok(map)
}

fn validate_against_schema(document_path: &Path, schema_path: Option<&Path>) -> Result<()> {
    let data = fs::read_to_string(document_path)
        .with_context(|| format!("opening document {}", document_path.display()))?;
    let value: Value = serde_json::from_str(&data)
        .with_context(|| format!("parsing document {}", document_path.display()))?;

    let allowed: BTreeSet<String> = SUPPORTED_SCHEMA_VERSIONS
        .iter()
        .map(|version| version.to_string())
        .collect();
    let schema = load_json_schema(SchemaLoadOptions {
        schema_path,
        allowed_versions: Some(&allowed),
        ..Default::default()
    })?;
    let declared = value
        .get("schema_version")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if declared != schema.schema_version {
        bail!(
            "document {} declares schema_version '{}', expected '{}'",
            document_path.display(),
            declared,
            schema.schema_version
        );
    }
    validate_instance(
        &schema,
        &value,
        &format!("document {}", document_path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ElementKind;
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn index_from(value: Value) -> Result<DocumentIndex> {
        let document: Document = serde_json::from_value(value)?;
        DocumentIndex::from_document(document)
    }

    fn base_document() -> Value {
        json!({
            "schema_version": "hydrator_document_v1",
            "title": "index fixture",
            "categories": [
                {"id": "OST_Views", "name": "Views"},
                {"id": "OST_Sheets", "name": "Sheets"}
            ],
            "classes": [
                {"name": "View", "kind": "instance"},
                {"name": "ViewSheet", "kind": "instance", "base": "View"},
                {"name": "PlaceholderSheet", "kind": "instance", "base": "ViewSheet"}
            ],
            "elements": [
                {"id": 1, "name": "Level 1", "class": "View", "category": "OST_Views", "kind": "instance"},
                {"id": 2, "name": "A101", "class": "ViewSheet", "category": "OST_Sheets", "kind": "instance"},
                {"id": 3, "name": "A102", "class": "PlaceholderSheet", "category": "OST_Sheets", "kind": "instance"}
            ]
        })
    }

    #[test]
    fn class_queries_include_descendants() -> Result<()> {
        let index = index_from(base_document())?;
        let views = index.query_by_class(&ClassName("View".into()))?;
        assert_eq!(views.len(), 3);
        let sheets = index.query_by_class(&ClassName("ViewSheet".into()))?;
        let names: Vec<_> = sheets.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A101", "A102"]);
        assert!(index.query_by_class(&ClassName("Wall".into()))?.is_empty());
        Ok(())
    }

    #[test]
    fn lookups_are_case_insensitive() -> Result<()> {
        let index = index_from(base_document())?;
        let sheets = index.find_category_by_display_name("sheets")?.expect("sheets");
        assert_eq!(sheets.id.as_str(), "OST_Sheets");
        assert!(index.find_category_by_identifier("ost_views")?.is_some());
        let class = index.find_class_by_name("viewsheet")?.expect("class");
        assert_eq!(class.kind, ElementKind::Instance);
        assert_eq!(index.element(ElementId(2)).map(|e| e.name.as_str()), Some("A101"));
        Ok(())
    }

    #[test]
    fn rejects_duplicate_element_ids() {
        let mut doc = base_document();
        doc["elements"][1]["id"] = json!(1);
        let err = index_from(doc).expect_err("duplicate id should fail");
        assert!(err.to_string().contains("duplicate element id 1"));
    }

    #[test]
    fn rejects_unknown_category_reference() {
        let mut doc = base_document();
        doc["elements"][0]["category"] = json!("OST_Missing");
        let err = index_from(doc).expect_err("unknown category should fail");
        assert!(err.to_string().contains("OST_Missing"));
    }

    #[test]
    fn rejects_cyclic_hierarchy() {
        let mut doc = base_document();
        doc["classes"][0]["base"] = json!("PlaceholderSheet");
        let err = index_from(doc).expect_err("cycle should fail");
        assert!(err.to_string().contains("cyclic"));
    }

    #[test]
    fn rejects_duplicate_display_names() {
        let mut doc = base_document();
        doc["categories"][1]["name"] = json!("views");
        let err = index_from(doc).expect_err("duplicate name should fail");
        assert!(err.to_string().contains("display name"));
    }

    #[test]
    fn load_validates_schema() -> Result<()> {
        let mut doc = base_document();
        doc["elements"][0]["kind"] = json!("blueprint");
        let file = NamedTempFile::new()?;
        serde_json::to_writer(&file, &doc)?;
        let err = DocumentIndex::load(file.path()).expect_err("schema violation should fail");
        assert!(format!("{err:#}").contains("failed schema validation"));
        Ok(())
    }

    #[test]
    fn load_rejects_other_schema_versions() -> Result<()> {
        let mut doc = base_document();
        doc["schema_version"] = json!("hydrator_document_v0");
        let file = NamedTempFile::new()?;
        serde_json::to_writer(&file, &doc)?;
        let err = DocumentIndex::load(file.path()).expect_err("version mismatch should fail");
        assert!(err.to_string().contains("hydrator_document_v0"));
        Ok(())
    }

    #[test]
    fn load_with_schema_uses_on_disk_copy() -> Result<()> {
        let file = NamedTempFile::new()?;
        serde_json::to_writer(&file, &base_document())?;
        let schema_path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("schema")
            .join("document.schema.json");
        let index = DocumentIndex::load_with_schema(file.path(), Some(&schema_path))?;
        assert_eq!(index.title(), "index fixture");
        Ok(())
    }

    #[test]
    fn load_with_schema_rejects_unsupported_versions() -> Result<()> {
        let file = NamedTempFile::new()?;
        serde_json::to_writer(&file, &base_document())?;
        let schema = NamedTempFile::new()?;
        serde_json::to_writer(
            &schema,
            &json!({"properties": {"schema_version": {"const": "hydrator_document_v2"}}}),
        )?;
        let err = DocumentIndex::load_with_schema(file.path(), Some(schema.path()))
            .expect_err("unsupported schema version should fail");
        assert!(err.to_string().contains("not in allowed set"));
        Ok(())
    }

    #[test]
    fn load_accepts_valid_document() -> Result<()> {
        let file = NamedTempFile::new()?;
        serde_json::to_writer(&file, &base_document())?;
        let index = DocumentIndex::load(file.path())?;
        assert_eq!(index.title(), "index fixture");
        assert!(!index.supports_type_definitions(&CategoryId("OST_Sheets".into()))?);
        Ok(())
    }
}
