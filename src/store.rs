//! Query capabilities the resolver consumes from the host.
//!
//! Everything the resolver knows about a document flows through
//! `ElementStore`. Host adapters implement it over the live model;
//! `DocumentIndex` implements it over a JSON snapshot. Every method returns a
//! `Result` so adapters can report upstream failures, which the resolver
//! swallows per strategy.

use crate::catalog::{CategoryDescriptor, CategoryId, ClassDescriptor, ClassName, Element};
use anyhow::Result;

/// Read-only view of the "current document" passed explicitly to every query.
pub trait ElementStore {
    /// All elements whose class is `class` or descends from it, in store order.
    fn query_by_class(&self, class: &ClassName) -> Result<Vec<Element>>;

    /// Type definitions belonging to a category.
    fn query_category_types(&self, category: &CategoryId) -> Result<Vec<Element>>;

    /// Placed instances belonging to a category.
    fn query_category_instances(&self, category: &CategoryId) -> Result<Vec<Element>>;

    /// The category catalog in its stable order.
    fn categories(&self) -> Result<Vec<CategoryDescriptor>>;

    /// Exact, case-insensitive lookup by localized display name.
    fn find_category_by_display_name(&self, name: &str) -> Result<Option<CategoryDescriptor>>;

    /// Exact, case-insensitive lookup by language-neutral identifier.
    fn find_category_by_identifier(&self, identifier: &str)
    -> Result<Option<CategoryDescriptor>>;

    /// The class catalog in its stable order.
    fn classes(&self) -> Result<Vec<ClassDescriptor>>;

    /// Exact, case-insensitive lookup by class name.
    fn find_class_by_name(&self, name: &str) -> Result<Option<ClassDescriptor>>;

    /// Whether the category currently exposes any type definitions.
    fn supports_type_definitions(&self, category: &CategoryId) -> Result<bool> {
        Ok(!self.query_category_types(category)?.is_empty())
    }
}
