use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use trellis_cli::{build_cmd, check_cmd, load_options, BuildOutcome};
use trellis_markup::CompileOptions;

#[derive(Parser)]
#[command(name = "trellis", version, about = "Trellis markup compiler")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a markup document into a Rust module.
    Build {
        #[command(flatten)]
        target: Target,
        /// Output directory (default: target/trellis-gen)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Compile a markup document and report diagnostics without writing.
    Check {
        #[command(flatten)]
        target: Target,
    },
}

#[derive(Args)]
struct Target {
    /// Path to the markup document
    input: PathBuf,
    /// Rust path of the host type the view is generated for
    #[arg(long)]
    host: String,
    /// TOML file with compile options
    #[arg(long)]
    config: Option<PathBuf>,
    /// Reject malformed directives instead of dropping them
    #[arg(long)]
    strict: bool,
    /// Path of the runtime crate in generated code
    #[arg(long)]
    runtime_path: Option<String>,
}

impl Target {
    fn options(&self) -> Result<CompileOptions> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => CompileOptions::default(),
        };
        if self.strict {
            options.strict_directives = true;
        }
        if let Some(rt) = &self.runtime_path {
            options.runtime_path = rt.clone();
        }
        Ok(options)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Build { target, out_dir } => {
            let options = target.options()?;
            match build_cmd(&target.input, &target.host, out_dir.as_deref(), &options)? {
                BuildOutcome::Generated { path, .. } => println!("Generated: {}", path.display()),
                BuildOutcome::Skipped { reason } => println!("Skipped: {reason}"),
            }
        }
        Commands::Check { target } => {
            let options = target.options()?;
            check(&target.input, &target.host, &options)?;
        }
    }
    Ok(())
}

fn check(input: &Path, host: &str, options: &CompileOptions) -> Result<()> {
    let view = check_cmd(input, host, options)?;
    for d in &view.diagnostics {
        println!("{}: warning: {d}", input.display());
    }
    println!(
        "{}: ok ({} warnings)",
        input.display(),
        view.diagnostics.len()
    );
    Ok(())
}
