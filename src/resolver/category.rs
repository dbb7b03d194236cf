//! Strategy 2: resolve by category semantics.
//!
//! Stage 2a matches the localized display name. A category with type
//! definitions wins immediately (the "type interceptor") unless the target is
//! a bare spatial word, in which case the same category continues into the
//! spatial/standard branch. Stage 2b runs only when no display name matched
//! and retries against language-neutral identifiers (`OST_Rooms`), then takes
//! the same branch:
//!
//! - spatial targets (mentioning room, area, or space) return instances;
//! - everything else returns types, or instances when the category has none.

use super::{CategoryStage, Resolution, ResolutionRequest, ResolutionStrategy, ResolvedBy};
use crate::catalog::{CategoryDescriptor, Element};
use crate::names::NameKey;
use crate::store::ElementStore;
use anyhow::Result;
use std::collections::BTreeSet;

pub struct CategoryStrategy;

impl ResolutionStrategy for CategoryStrategy {
    fn name(&self) -> &'static str {
        "category"
    }

    fn try_resolve(
        &self,
        request: &ResolutionRequest,
        store: &dyn ElementStore,
    ) -> Result<Option<Resolution>> {
        let target_key = NameKey::new(&request.target);

        if let Some(category) = first_match(request, |name| match_display_name(store, name))? {
            let types = store.query_category_types(&category.id)?;
            if !types.is_empty() && !target_key.is_spatial_token() {
                tracing::debug!(category = %category.id, count = types.len(), "type interceptor");
                return Ok(Some(Resolution::new(
                    aggregate_types(types),
                    ResolvedBy::TypeInterceptor,
                )));
            }
            return resolve_in_category(
                store,
                &category,
                &target_key,
                CategoryStage::DisplayName,
                Some(types),
            );
        }

        if let Some(category) = first_match(request, |name| match_identifier(store, name))? {
            return resolve_in_category(
                store,
                &category,
                &target_key,
                CategoryStage::Identifier,
                None,
            );
        }

        Ok(None)
    }
}

/// Try the target first, then the optional category argument.
fn first_match<F>(request: &ResolutionRequest, mut matcher: F) -> Result<Option<CategoryDescriptor>>
where
    F: FnMut(&str) -> Result<Option<CategoryDescriptor>>,
{
    if let Some(found) = matcher(&request.target)? {
        return Ok(Some(found));
    }
    match &request.category {
        Some(category) => matcher(category),
        None => Ok(None),
    }
}

/// Spatial/standard branch shared by both stages.
///
/// `known_types` carries the Stage 2a type query so it is not repeated.
/// An empty branch is `None`.
fn resolve_in_category(
    store: &dyn ElementStore,
    category: &CategoryDescriptor,
    target_key: &NameKey,
    stage: CategoryStage,
    known_types: Option<Vec<Element>>,
) -> Result<Option<Resolution>> {
    let resolution = if target_key.mentions_spatial() {
        let instances = store.query_category_instances(&category.id)?;
        tracing::debug!(category = %category.id, count = instances.len(), "spatial exception");
        Resolution::new(instances, ResolvedBy::SpatialInstances { stage })
    } else {
        let types = match known_types {
            Some(types) => types,
            None => store.query_category_types(&category.id)?,
        };
        if types.is_empty() {
            let instances = store.query_category_instances(&category.id)?;
            Resolution::new(instances, ResolvedBy::CategoryInstances { stage })
        } else {
            Resolution::new(aggregate_types(types), ResolvedBy::CategoryTypes { stage })
        }
    };
    Ok((!resolution.is_empty()).then_some(resolution))
}

/// Collapse type entries sharing a family and type name, keeping the first.
fn aggregate_types(types: Vec<Element>) -> Vec<Element> {
    let mut seen: BTreeSet<(Option<String>, String)> = BTreeSet::new();
    types
        .into_iter()
        .filter(|element| seen.insert((element.family.clone(), element.name.clone())))
        .collect()
}

/// Match a localized display name: exact lookup first, then folded names.
pub(crate) fn match_display_name(
    store: &dyn ElementStore,
    name: &str,
) -> Result<Option<CategoryDescriptor>> {
    if let Some(found) = store.find_category_by_display_name(name)? {
        return Ok(Some(found));
    }
    let key = NameKey::new(name);
    if key.is_empty() {
        return Ok(None);
    }
    Ok(store
        .categories()?
        .into_iter()
        .find(|category| NameKey::new(&category.name) == key))
}

/// Match a language-neutral identifier, with or without its `OST_` prefix.
pub(crate) fn match_identifier(
    store: &dyn ElementStore,
    name: &str,
) -> Result<Option<CategoryDescriptor>> {
    if let Some(found) = store.find_category_by_identifier(name)? {
        return Ok(Some(found));
    }
    let key = NameKey::from_identifier(name);
    if key.is_empty() {
        return Ok(None);
    }
    Ok(store
        .categories()?
        .into_iter()
        .find(|category| NameKey::from_identifier(category.id.as_str()) == key))
}

/// Display name first, identifier second.
pub(crate) fn match_category(
    store: &dyn ElementStore,
    name: &str,
) -> Result<Option<(CategoryDescriptor, CategoryStage)>> {
    if let Some(found) = match_display_name(store, name)? {
        return Ok(Some((found, CategoryStage::DisplayName)));
    }
    Ok(match_identifier(store, name)?.map(|found| (found, CategoryStage::Identifier)))
}
