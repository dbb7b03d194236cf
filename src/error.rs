//! Errors surfaced by the resolver.
//!
//! Only malformed requests reach the caller. Upstream query failures and
//! "nothing matched" both collapse into an empty `Resolution`; see
//! `CategoryTypeResolver::resolve`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}
