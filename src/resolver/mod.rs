//! Element resolution: turns a loosely named request into a uniform element list.
//!
//! # Strategy order
//!
//! ```text
//! request ──► [options provider] ──► explicit map ──► category ──► class catalog ──► empty
//!                  (optional)          (Strategy 1)   (Strategy 2)   (Strategy 3)
//! ```
//!
//! The first strategy that produces elements wins. Explicit-map hits and
//! options-provider answers are authoritative and win even when empty. A
//! strategy whose store queries fail is logged and skipped; only an empty
//! target is reported to the caller as an error.

mod category;
mod class_catalog;
mod explicit;

pub use category::CategoryStrategy;
pub use class_catalog::ClassCatalogStrategy;
pub use explicit::{EXPLICIT_KEYS, ExplicitMapStrategy};

use crate::catalog::{Element, ElementKind};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::store::ElementStore;
use anyhow::Result;
use serde::Serialize;

/// Input to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    /// Type, class, or category name such as `Wall`, `WallType`, or `Rooms`.
    pub target: String,
    /// Category display name used to narrow loadable-component lookups.
    pub category: Option<String>,
}

impl ResolutionRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Trimmed copy; `None` when the target is blank.
    fn normalized(&self) -> Option<Self> {
        let target = self.target.trim();
        if target.is_empty() {
            return None;
        }
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Some(Self {
            target: target.to_string(),
            category,
        })
    }
}

/// Which lookup path of the category strategy found the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStage {
    /// Stage 2a: localized display name.
    DisplayName,
    /// Stage 2b: language-neutral identifier.
    Identifier,
}

/// Diagnostic record of the path that satisfied a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ResolvedBy {
    OptionsProvider,
    ExplicitMap,
    /// Stage 2a priority exit: the category had type definitions.
    TypeInterceptor,
    SpatialInstances { stage: CategoryStage },
    CategoryTypes { stage: CategoryStage },
    CategoryInstances { stage: CategoryStage },
    ClassCatalog { kind: ElementKind },
}

impl ResolvedBy {
    /// Authoritative answers end resolution even when they are empty.
    pub fn is_authoritative(&self) -> bool {
        matches!(self, ResolvedBy::OptionsProvider | ResolvedBy::ExplicitMap)
    }
}

/// Ordered, kind-uniform elements plus the path that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub resolved_by: Option<ResolvedBy>,
    pub elements: Vec<Element>,
}

impl Resolution {
    pub fn new(elements: Vec<Element>, resolved_by: ResolvedBy) -> Self {
        Self {
            resolved_by: Some(resolved_by),
            elements,
        }
    }

    /// Nothing matched.
    pub fn empty() -> Self {
        Self {
            resolved_by: None,
            elements: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Kind shared by every element, or `None` for an empty result.
    pub fn kind(&self) -> Option<ElementKind> {
        self.elements.first().map(|element| element.kind)
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    fn is_accepted(&self) -> bool {
        !self.is_empty() || self.resolved_by.is_some_and(|by| by.is_authoritative())
    }
}

/// One resolution heuristic.
///
/// `Ok(None)` means the strategy does not recognize the request; `Ok(Some)`
/// with no elements means it recognized the request but found nothing.
pub trait ResolutionStrategy: Send + Sync {
    /// Strategy name for logs and diagnostics.
    fn name(&self) -> &'static str;

    fn try_resolve(
        &self,
        request: &ResolutionRequest,
        store: &dyn ElementStore,
    ) -> Result<Option<Resolution>>;
}

/// User-supplied override consulted before any built-in strategy.
///
/// Returning `Some` short-circuits resolution with exactly that list.
pub trait OptionsProvider: Send + Sync {
    fn options(
        &self,
        request: &ResolutionRequest,
        store: &dyn ElementStore,
    ) -> Result<Option<Vec<Element>>>;
}

/// Chains the strategies in priority order. Holds no per-call state.
pub struct CategoryTypeResolver {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
    options_provider: Option<Box<dyn OptionsProvider>>,
}

impl Default for CategoryTypeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryTypeResolver {
    /// Resolver with every built-in strategy enabled.
    pub fn new() -> Self {
        Self::with_config(&ResolverConfig::default())
    }

    pub fn with_config(config: &ResolverConfig) -> Self {
        let mut resolver = Self::without_strategies();
        if config.explicit_map {
            resolver.add_strategy(Box::new(ExplicitMapStrategy));
        }
        if config.category_match {
            resolver.add_strategy(Box::new(CategoryStrategy));
        }
        if config.class_catalog {
            resolver.add_strategy(Box::new(ClassCatalogStrategy::new(
                config.distinct_instances,
            )));
        }
        resolver
    }

    /// Resolver with no strategies; add them with `with_strategy`.
    pub fn without_strategies() -> Self {
        Self {
            strategies: Vec::new(),
            options_provider: None,
        }
    }

    /// Append a strategy (order is priority).
    pub fn add_strategy(&mut self, strategy: Box<dyn ResolutionStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn with_strategy(mut self, strategy: Box<dyn ResolutionStrategy>) -> Self {
        self.add_strategy(strategy);
        self
    }

    pub fn with_options_provider(mut self, provider: Box<dyn OptionsProvider>) -> Self {
        self.options_provider = Some(provider);
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve a request against the store.
    ///
    /// Fails only for a blank target. Everything else, including upstream
    /// query failures, degrades to an empty `Resolution`.
    pub fn resolve(
        &self,
        store: &dyn ElementStore,
        request: &ResolutionRequest,
    ) -> Result<Resolution, ResolveError> {
        let request = request.normalized().ok_or_else(|| {
            ResolveError::MalformedRequest("target must not be empty".to_string())
        })?;

        if let Some(provider) = &self.options_provider {
            match provider.options(&request, store) {
                Ok(Some(elements)) => {
                    tracing::debug!(
                        query = %request.target,
                        count = elements.len(),
                        "options provider answered"
                    );
                    return Ok(enforce_uniform(
                        Resolution::new(elements, ResolvedBy::OptionsProvider),
                        &request,
                    ));
                }
                Ok(None) => {}
                Err(err) => tracing::warn!(
                    query = %request.target,
                    error = %format!("{err:#}"),
                    "options provider failed; continuing with built-in strategies"
                ),
            }
        }

        for strategy in &self.strategies {
            match strategy.try_resolve(&request, store) {
                Ok(Some(resolution)) if resolution.is_accepted() => {
                    tracing::debug!(
                        query = %request.target,
                        strategy = strategy.name(),
                        count = resolution.len(),
                        "resolved"
                    );
                    return Ok(enforce_uniform(resolution, &request));
                }
                Ok(Some(_)) => tracing::debug!(
                    query = %request.target,
                    strategy = strategy.name(),
                    "matched but produced no elements"
                ),
                Ok(None) => tracing::debug!(
                    query = %request.target,
                    strategy = strategy.name(),
                    "no match"
                ),
                Err(err) => tracing::warn!(
                    query = %request.target,
                    strategy = strategy.name(),
                    error = %format!("{err:#}"),
                    "upstream query failed; treating as no match"
                ),
            }
        }

        tracing::debug!(query = %request.target, "no strategy resolved the request");
        Ok(Resolution::empty())
    }

    /// Convenience entry point returning only the elements.
    pub fn resolve_elements(
        &self,
        store: &dyn ElementStore,
        target: &str,
        category: Option<&str>,
    ) -> Result<Vec<Element>, ResolveError> {
        let mut request = ResolutionRequest::new(target);
        request.category = category.map(str::to_string);
        Ok(self.resolve(store, &request)?.into_elements())
    }
}

/// Drop elements whose kind differs from the first one, even when the first
/// element's kind is the smaller group.
fn enforce_uniform(mut resolution: Resolution, request: &ResolutionRequest) -> Resolution {
    let Some(kind) = resolution.kind() else {
        return resolution;
    };
    let before = resolution.elements.len();
    resolution.elements.retain(|element| element.kind == kind);
    let dropped = before - resolution.elements.len();
    if dropped > 0 {
        tracing::warn!(
            query = %request.target,
            kept = %kind,
            dropped,
            "result mixed type definitions and instances; kept the first element's kind"
        );
    }
    resolution
}
