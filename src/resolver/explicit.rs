//! Strategy 1: a fixed allow-list of well-known type names.
//!
//! Each key maps straight to a class query, so the highest-traffic requests
//! never touch the fuzzy category or class matching. Every key names a
//! blueprint class, so only type-definition elements are returned.

use super::category::match_category;
use super::{Resolution, ResolutionRequest, ResolutionStrategy, ResolvedBy};
use crate::catalog::{CategoryDescriptor, ClassName, Element};
use crate::store::ElementStore;
use anyhow::Result;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refinement {
    Plain,
    /// View templates share the `View` class but are never wanted in a picker.
    ExcludeTemplates,
    /// Loadable components honor the request's `category` argument.
    NarrowByCategory,
    /// Families carry no category of their own; their symbols decide.
    NarrowFamiliesByCategory,
}

struct ExplicitEntry {
    key: &'static str,
    class: &'static str,
    refinement: Refinement,
}

const fn entry(key: &'static str, class: &'static str, refinement: Refinement) -> ExplicitEntry {
    ExplicitEntry {
        key,
        class,
        refinement,
    }
}

const EXPLICIT_MAP: &[ExplicitEntry] = &[
    entry("WallType", "WallType", Refinement::Plain),
    entry("FloorType", "FloorType", Refinement::Plain),
    entry("RoofType", "RoofType", Refinement::Plain),
    entry("CeilingType", "CeilingType", Refinement::Plain),
    entry("Level", "Level", Refinement::Plain),
    entry("Grid", "Grid", Refinement::Plain),
    entry("View", "View", Refinement::ExcludeTemplates),
    entry("ViewFamilyType", "ViewFamilyType", Refinement::Plain),
    entry("FamilySymbol", "FamilySymbol", Refinement::NarrowByCategory),
    entry("Family", "Family", Refinement::NarrowFamiliesByCategory),
    entry("Material", "Material", Refinement::Plain),
    entry("LineStyle", "GraphicsStyle", Refinement::Plain),
    entry("DimensionType", "DimensionType", Refinement::Plain),
    entry("TextNoteType", "TextNoteType", Refinement::Plain),
    entry("FilledRegionType", "FilledRegionType", Refinement::Plain),
];

/// Keys accepted by the explicit map, in declaration order.
pub const EXPLICIT_KEYS: &[&str] = &[
    "WallType",
    "FloorType",
    "RoofType",
    "CeilingType",
    "Level",
    "Grid",
    "View",
    "ViewFamilyType",
    "FamilySymbol",
    "Family",
    "Material",
    "LineStyle",
    "DimensionType",
    "TextNoteType",
    "FilledRegionType",
];

fn lookup(target: &str) -> Option<&'static ExplicitEntry> {
    EXPLICIT_MAP
        .iter()
        .find(|entry| entry.key.eq_ignore_ascii_case(target))
}

/// Case-insensitive exact match against the allow-list.
pub struct ExplicitMapStrategy;

impl ResolutionStrategy for ExplicitMapStrategy {
    fn name(&self) -> &'static str {
        "explicit_map"
    }

    fn try_resolve(
        &self,
        request: &ResolutionRequest,
        store: &dyn ElementStore,
    ) -> Result<Option<Resolution>> {
        let Some(entry) = lookup(&request.target) else {
            return Ok(None);
        };
        let mut elements = store.query_by_class(&ClassName(entry.class.to_string()))?;
        elements.retain(Element::is_type);
        match (entry.refinement, &request.category) {
            (Refinement::ExcludeTemplates, _) => elements.retain(|element| !element.is_template),
            (Refinement::NarrowByCategory, Some(category)) => {
                match narrowing_category(store, category)? {
                    Some(found) => elements.retain(|element| element.in_category(&found.id)),
                    None => elements.clear(),
                }
            }
            (Refinement::NarrowFamiliesByCategory, Some(category)) => {
                match narrowing_category(store, category)? {
                    Some(found) => {
                        let families: BTreeSet<String> = store
                            .query_category_types(&found.id)?
                            .into_iter()
                            .filter_map(|symbol| symbol.family)
                            .collect();
                        elements.retain(|element| families.contains(&element.name));
                    }
                    None => elements.clear(),
                }
            }
            _ => {}
        }
        Ok(Some(Resolution::new(elements, ResolvedBy::ExplicitMap)))
    }
}

/// An unknown narrowing category narrows to nothing.
fn narrowing_category(
    store: &dyn ElementStore,
    category: &str,
) -> Result<Option<CategoryDescriptor>> {
    let found = match_category(store, category)?.map(|(descriptor, _)| descriptor);
    if found.is_none() {
        tracing::debug!(category, "narrowing category not found");
    }
    Ok(found)
}
