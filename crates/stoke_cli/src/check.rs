//! `stoke check`: verify that headers compile on their own.

use stoke_build::{HeaderChecker, TerminalReporter};
use stoke_config::{validate_config, ProjectConfig};
use stoke_toolchain::ProcessToolchain;

use crate::settings::load_project;
use crate::{CheckArgs, GlobalArgs};

/// Runs the `stoke check` command. Returns exit code 0 when no header failed.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = load_project(global)?;
    args.apply(&mut config);
    validate_config(&config)?;

    let toolchain = ProcessToolchain::new();
    let reporter = TerminalReporter::new(config.run.verbosity);
    let checker = HeaderChecker::new(&config, &toolchain, &reporter);

    let summary = checker.run()?;
    Ok(summary.exit_code())
}

impl CheckArgs {
    /// Applies the command-line overrides to `config`.
    pub fn apply(&self, config: &mut ProjectConfig) {
        self.paths.apply(config);
        if let Some(compiler) = &self.compiler {
            config.check.compiler = compiler.clone();
        }
        if let Some(flag) = &self.flag {
            config.check.flag = flag.clone();
        }
        config
            .check
            .include_dirs
            .extend(self.include_dirs.iter().cloned());
        if let Some(max) = self.max_errors {
            config.check.max_errors = max;
        }
        if let Some(marker) = self.marker {
            config.build.marker = marker.into();
        }
        config.run.header = self.header.clone();
        config.run.clean = self.clean;
    }
}
