//! Strategy 3: last-resort lookup by class identity.
//!
//! The class catalog stands in for runtime reflection: the store registers
//! every class it can query, with its kind. Results carry whatever the store's
//! class hierarchy yields, so a base class may bring subclass elements along.

use super::{Resolution, ResolutionRequest, ResolutionStrategy, ResolvedBy};
use crate::catalog::{ClassDescriptor, Element, ElementKind};
use crate::names::NameKey;
use crate::store::ElementStore;
use anyhow::Result;
use std::collections::BTreeSet;

pub struct ClassCatalogStrategy {
    distinct_instances: bool,
}

impl ClassCatalogStrategy {
    pub fn new(distinct_instances: bool) -> Self {
        Self { distinct_instances }
    }
}

impl Default for ClassCatalogStrategy {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ResolutionStrategy for ClassCatalogStrategy {
    fn name(&self) -> &'static str {
        "class_catalog"
    }

    fn try_resolve(
        &self,
        request: &ResolutionRequest,
        store: &dyn ElementStore,
    ) -> Result<Option<Resolution>> {
        let Some(class) = find_class(store, &request.target)? else {
            return Ok(None);
        };
        let elements = store.query_by_class(&class.name)?;
        let elements = match class.kind {
            ElementKind::TypeDefinition => elements,
            ElementKind::Instance => {
                let placed: Vec<Element> =
                    elements.into_iter().filter(|element| !element.is_type()).collect();
                if self.distinct_instances {
                    distinct_by_display_name(placed)
                } else {
                    placed
                }
            }
        };
        tracing::debug!(
            class = %class.name,
            kind = %class.kind,
            count = elements.len(),
            "class catalog hit"
        );
        Ok(Some(Resolution::new(
            elements,
            ResolvedBy::ClassCatalog { kind: class.kind },
        )))
    }
}

fn find_class(store: &dyn ElementStore, target: &str) -> Result<Option<ClassDescriptor>> {
    if let Some(found) = store.find_class_by_name(target)? {
        return Ok(Some(found));
    }
    let key = NameKey::new(target);
    if key.is_empty() {
        return Ok(None);
    }
    Ok(store
        .classes()?
        .into_iter()
        .find(|class| NameKey::new(class.name.as_str()) == key))
}

/// One element per display name; the first in store order represents the group.
fn distinct_by_display_name(elements: Vec<Element>) -> Vec<Element> {
    let mut seen = BTreeSet::new();
    elements
        .into_iter()
        .filter(|element| seen.insert(element.display_name()))
        .collect()
}
