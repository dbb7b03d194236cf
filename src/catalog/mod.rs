//! Document catalog wiring.
//!
//! This module wraps the JSON document format under `schema/document.schema.json`
//! so callers can load a validated snapshot of a host model. Types here mirror
//! the schema fields; callers use `DocumentIndex` as the `ElementStore` the
//! resolver queries.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{CategoryId, ClassName, ElementId, ElementKind};
pub use index::DocumentIndex;
pub use model::{CategoryDescriptor, ClassDescriptor, Document, Element};

pub use model::load_document_from_path;
