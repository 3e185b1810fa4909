//! Stoke CLI: the command-line interface for the Stoke incremental builder.
//!
//! Provides `stoke build` to compile changed C/C++ files and link the program,
//! `stoke check` to verify that headers compile on their own, and
//! `stoke clean` to remove the build folder.

#![warn(missing_docs)]

mod build;
mod check;
mod clean;
mod settings;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stoke_cache::MarkerKind;
use stoke_config::ProjectConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Stoke: incremental builds for C and C++ source trees.
#[derive(Parser, Debug)]
#[command(name = "stoke", version, about = "Incremental C/C++ builder")]
pub struct Cli {
    /// Only print the run summary, warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print skipped files and debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `stoke.toml` file or the folder containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile changed sources and link the program.
    Build(BuildArgs),
    /// Check that headers compile on their own.
    Check(CheckArgs),
    /// Remove the build folder.
    Clean(CleanArgs),
}

/// Folder options shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// Build folder (object files, snapshots, program).
    #[arg(short = 'b', long = "build")]
    pub build: Option<PathBuf>,

    /// Source folder to scan.
    #[arg(short = 's', long = "src")]
    pub source: Option<PathBuf>,
}

/// Arguments for the `stoke build` subcommand.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Build and source folders.
    #[command(flatten)]
    pub paths: PathArgs,

    /// Name of the linked program.
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// C++ compiler, or `none` to skip C++ files.
    #[arg(short = 'k', long)]
    pub cpp_compiler: Option<String>,

    /// Flag passed to the C++ compiler as `-<flag>`.
    #[arg(short = 'f', long, allow_hyphen_values = true)]
    pub cpp_flag: Option<String>,

    /// C compiler, or `none` to skip C files.
    #[arg(short = 'l', long)]
    pub c_compiler: Option<String>,

    /// Flag passed to the C compiler as `-<flag>`.
    #[arg(short = 'g', long, allow_hyphen_values = true)]
    pub c_flag: Option<String>,

    /// Linker binary.
    #[arg(long)]
    pub linker: Option<String>,

    /// Stop after this many failed files (0 = never).
    #[arg(short = 'e', long)]
    pub max_errors: Option<usize>,

    /// Extra link input appended after the objects (repeatable).
    #[arg(short = 'L', long = "library", allow_hyphen_values = true)]
    pub libraries: Vec<String>,

    /// How file changes are detected.
    #[arg(long, value_enum)]
    pub marker: Option<MarkerArg>,

    /// Ignore previous timestamps and delete old object files.
    #[arg(short = 'c', long)]
    pub clean: bool,
}

/// Arguments for the `stoke check` subcommand.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Build and source folders.
    #[command(flatten)]
    pub paths: PathArgs,

    /// Check only this header, relative to the source folder.
    #[arg(long)]
    pub header: Option<PathBuf>,

    /// Compiler used for the check, or `none` to check nothing.
    #[arg(short = 'k', long)]
    pub compiler: Option<String>,

    /// Flag passed to the compiler as `-<flag>`.
    #[arg(short = 'f', long, allow_hyphen_values = true)]
    pub flag: Option<String>,

    /// Extra include folder (repeatable).
    #[arg(short = 'I', long = "include")]
    pub include_dirs: Vec<PathBuf>,

    /// Stop after this many failed headers (0 = never).
    #[arg(short = 'e', long)]
    pub max_errors: Option<usize>,

    /// How file changes are detected.
    #[arg(long, value_enum)]
    pub marker: Option<MarkerArg>,

    /// Ignore previous timestamps.
    #[arg(short = 'c', long)]
    pub clean: bool,
}

/// Arguments for the `stoke clean` subcommand.
#[derive(Args, Debug, Default)]
pub struct CleanArgs {
    /// Build folder to remove.
    #[arg(short = 'b', long = "build")]
    pub build: Option<PathBuf>,
}

/// Change detection selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MarkerArg {
    /// Last-modified time.
    Mtime,
    /// Hash of the file content.
    Content,
}

impl From<MarkerArg> for MarkerKind {
    fn from(arg: MarkerArg) -> Self {
        match arg {
            MarkerArg::Mtime => MarkerKind::Mtime,
            MarkerArg::Content => MarkerKind::Content,
        }
    }
}

impl PathArgs {
    /// Applies the folder overrides to `config`.
    pub fn apply(&self, config: &mut ProjectConfig) {
        if let Some(build) = &self.build {
            config.paths.build = build.clone();
        }
        if let Some(source) = &self.source {
            config.paths.source = source.clone();
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to print only the summary and problems.
    pub quiet: bool,
    /// Whether to print skipped files and debug logging.
    pub verbose: bool,
    /// Optional path to a `stoke.toml` file or its folder.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose && !cli.quiet);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Clean(ref args) => clean::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the log subscriber. `STOKE_LOG` takes precedence over `-v`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,stoke=debug,stoke_build=debug,stoke_cache=debug,stoke_config=debug,stoke_toolchain=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env("STOKE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
