use crate::catalog::DocumentIndex;
use std::path::PathBuf;

pub(crate) fn sample_document_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("sample_document.json")
}

pub(crate) fn sample_index() -> DocumentIndex {
    DocumentIndex::load(&sample_document_path()).expect("sample document loads")
}
