use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use trellis_markup::GeneratedView;

pub use trellis_markup::{CompileOptions, Diagnostic};

/// Where generated files land when no output directory is given.
pub const DEFAULT_OUT_DIR: &str = "target/trellis-gen";

#[derive(Debug)]
pub enum BuildOutcome {
    /// Source written to `path`; `diagnostics` are the warnings the compiler
    /// recorded on the way.
    Generated {
        path: PathBuf,
        diagnostics: Vec<Diagnostic>,
    },
    /// The template could not be compiled but the build carries on.
    Skipped { reason: String },
}

impl BuildOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            BuildOutcome::Generated { path, .. } => Some(path),
            BuildOutcome::Skipped { .. } => None,
        }
    }
}

/// Load compile options from a TOML file. Missing keys keep their defaults.
pub fn load_options(path: &Path) -> Result<CompileOptions> {
    let txt =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&txt).with_context(|| format!("invalid config {}", path.display()))
}

/// Compile a markup file for `host` and write `<stem>.rs` into `out_dir`.
///
/// A missing or malformed template is logged and reported as
/// [`BuildOutcome::Skipped`]; every other failure is an error.
pub fn build_cmd(
    input: &Path,
    host: &str,
    out_dir: Option<&Path>,
    options: &CompileOptions,
) -> Result<BuildOutcome> {
    let view = match trellis_markup::compile_file(input, host, options) {
        Ok(view) => view,
        Err(e) if e.is_skippable() => {
            warn!("skipping {}: {e}", input.display());
            return Ok(BuildOutcome::Skipped {
                reason: e.to_string(),
            });
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to compile {}", input.display()));
        }
    };
    for d in &view.diagnostics {
        warn!("{}: {d}", input.display());
    }

    let name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("view");

    let out_dir = out_dir
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let out_path = out_dir.join(format!("{name}.rs"));
    fs::write(&out_path, &view.source)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    info!("generated {} ({})", out_path.display(), view.module_name);
    Ok(BuildOutcome::Generated {
        path: out_path,
        diagnostics: view.diagnostics,
    })
}

/// Compile without writing anything. Unlike [`build_cmd`], nothing is
/// skipped: every failure is an error.
pub fn check_cmd(input: &Path, host: &str, options: &CompileOptions) -> Result<GeneratedView> {
    trellis_markup::compile_file(input, host, options)
        .with_context(|| format!("failed to compile {}", input.display()))
}

/// Entry point for `build.rs`: compile `input` into `$OUT_DIR/<stem>.rs`,
/// register it for rebuilds and forward diagnostics as cargo warnings.
pub fn build_script(input: &Path, host: &str, options: &CompileOptions) -> Result<BuildOutcome> {
    let out_dir = std::env::var_os("OUT_DIR").context("OUT_DIR is not set; call from build.rs")?;
    println!("cargo:rerun-if-changed={}", input.display());

    let outcome = build_cmd(input, host, Some(Path::new(&out_dir)), options)?;
    match &outcome {
        BuildOutcome::Generated { diagnostics, .. } => {
            for d in diagnostics {
                println!("cargo:warning={}: {d}", input.display());
            }
        }
        BuildOutcome::Skipped { reason } => {
            println!("cargo:warning=skipped {}: {reason}", input.display());
        }
    }
    Ok(outcome)
}
