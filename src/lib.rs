//! Category/type resolution for element pickers.
//!
//! Given a free-form target name ("WallType", "Walls", "Rooms", "ViewSheet")
//! and an optional category argument, the resolver returns the element set a
//! picker should show. Three strategies run in order (an explicit allow-list,
//! category matching, and a class-catalog fallback) against any
//! [`ElementStore`]. [`catalog::DocumentIndex`] implements the store over a
//! JSON document snapshot so the resolver can run without a host.

use anyhow::{Context, Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod config;
pub mod error;
pub mod names;
pub mod resolver;
pub(crate) mod schema_loader;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{
    CategoryDescriptor, CategoryId, ClassDescriptor, ClassName, Document, DocumentIndex, Element,
    ElementId, ElementKind, load_document_from_path,
};
pub use config::ResolverConfig;
pub use error::ResolveError;
pub use names::NameKey;
pub use resolver::{
    CategoryStage, CategoryTypeResolver, OptionsProvider, Resolution, ResolutionRequest,
    ResolutionStrategy, ResolvedBy,
};
pub use schema_loader::BUNDLED_DOCUMENT_SCHEMA;
pub use store::ElementStore;

/// Environment variable naming the document used when no path is passed.
pub const DOCUMENT_ENV: &str = "HYDRATOR_DOCUMENT";

/// Locate the document to load.
///
/// An explicit path wins; otherwise `HYDRATOR_DOCUMENT` must name an existing
/// file. The result is canonicalized so error messages point at one place.
pub fn resolve_document_path(explicit: Option<&Path>) -> Result<PathBuf> {
    let hint = env::var(DOCUMENT_ENV).ok();
    document_path_from(explicit, hint.as_deref())
}

fn document_path_from(explicit: Option<&Path>, hint: Option<&str>) -> Result<PathBuf> {
    let candidate = match (explicit, hint.map(str::trim)) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(hint)) if !hint.is_empty() => PathBuf::from(hint),
        _ => bail!("No document given. Pass --document PATH or set {DOCUMENT_ENV}."),
    };
    if !candidate.is_file() {
        bail!("Document not found at {}", candidate.display());
    }
    fs::canonicalize(&candidate)
        .with_context(|| format!("Unable to canonicalize {}", candidate.display()))
}

/// Split comma- or whitespace-delimited configuration lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
