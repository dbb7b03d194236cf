use anyhow::{Context, Result, bail};
use hydrator::DocumentIndex;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn sample_document_path() -> PathBuf {
    repo_root().join("fixtures").join("sample_document.json")
}

pub fn sample_index() -> DocumentIndex {
    DocumentIndex::load(&sample_document_path()).expect("sample document loads")
}

/// Command for the CLI with a clean resolver environment.
pub fn resolve_elements_command(document: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_resolve-elements"));
    cmd.arg("--document")
        .arg(document)
        .env_remove("HYDRATOR_DOCUMENT")
        .env_remove("HYDRATOR_DISABLE_STRATEGIES")
        .env_remove("HYDRATOR_DISTINCT_INSTANCES")
        .env_remove("HYDRATOR_LOG");
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}
