//! Resolve a picker target against a document snapshot.
//!
//! Loads a hydrator document (validated against the bundled schema, or the one
//! named by `--schema`), runs the
//! resolver with the environment's configuration, and prints JSON on stdout.
//! Logs go to stderr, filtered by `HYDRATOR_LOG` (default `warn`).

use anyhow::{Context, Result, anyhow, bail};
use hydrator::{
    CategoryTypeResolver, DocumentIndex, ElementStore, ResolutionRequest, ResolverConfig,
    resolve_document_path,
};
use serde::Serialize;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HYDRATOR_LOG";

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_logging();
    let args = CliArgs::parse(env::args_os().skip(1))?;
    let path = resolve_document_path(args.document.as_deref())?;
    let index = DocumentIndex::load_with_schema(&path, args.schema.as_deref())
        .with_context(|| format!("loading {}", path.display()))?;
    tracing::debug!(document = %path.display(), title = index.title(), "document loaded");

    let output = match args.mode {
        Mode::ListCategories => serde_json::to_string_pretty(&category_rows(&index)?)?,
        Mode::Resolve {
            target,
            category,
            trace,
        } => {
            let config = ResolverConfig::from_env()?;
            let resolver = CategoryTypeResolver::with_config(&config);
            let mut request = ResolutionRequest::new(target);
            request.category = category;
            let resolution = resolver.resolve(&index, &request)?;
            if trace {
                serde_json::to_string_pretty(&resolution)?
            } else {
                serde_json::to_string_pretty(&resolution.elements)?
            }
        }
    };
    println!("{output}");
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Serialize)]
struct CategoryRow {
    id: String,
    name: String,
    supports_types: bool,
}

fn category_rows(store: &dyn ElementStore) -> Result<Vec<CategoryRow>> {
    store
        .categories()?
        .into_iter()
        .map(|category| {
            let supports_types = store.supports_type_definitions(&category.id)?;
            Ok(CategoryRow {
                id: category.id.0,
                name: category.name,
                supports_types,
            })
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Resolve {
        target: String,
        category: Option<String>,
        trace: bool,
    },
    ListCategories,
}

#[derive(Debug)]
struct CliArgs {
    document: Option<PathBuf>,
    schema: Option<PathBuf>,
    mode: Mode,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = OsString>) -> Result<Self> {
        let mut args = args.into_iter();
        let mut document: Option<PathBuf> = None;
        let mut schema: Option<PathBuf> = None;
        let mut target: Option<String> = None;
        let mut category: Option<String> = None;
        let mut trace = false;
        let mut list_categories = false;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--document" => {
                    document = Some(PathBuf::from(next_value(&mut args, "--document")?));
                }
                "--schema" => schema = Some(PathBuf::from(next_value(&mut args, "--schema")?)),
                "--target" => target = Some(next_value(&mut args, "--target")?),
                "--category" => category = Some(next_value(&mut args, "--category")?),
                "--trace" => trace = true,
                "--list-categories" => list_categories = true,
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n{}", usage()),
            }
        }

        let mode = match (list_categories, target) {
            (true, None) => {
                if category.is_some() || trace {
                    bail!("--list-categories does not take --category or --trace");
                }
                Mode::ListCategories
            }
            (true, Some(_)) => bail!("--list-categories and --target are mutually exclusive"),
            (false, Some(target)) => Mode::Resolve {
                target,
                category,
                trace,
            },
            (false, None) => bail!("missing --target\n{}", usage()),
        };

        Ok(CliArgs {
            document,
            schema,
            mode,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: resolve-elements [--document PATH] [--schema PATH] --target NAME [--category NAME] [--trace]\n\
       resolve-elements [--document PATH] [--schema PATH] --list-categories\n\
--document falls back to HYDRATOR_DOCUMENT; --schema replaces the bundled document schema. Prints the resolved elements (or, with --trace, the winning strategy and elements) as JSON.\n"
}
