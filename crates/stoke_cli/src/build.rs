//! `stoke build`: compile changed sources and link the program.

use stoke_build::{Builder, TerminalReporter};
use stoke_config::{validate_config, ProjectConfig};
use stoke_toolchain::ProcessToolchain;

use crate::settings::load_project;
use crate::{BuildArgs, GlobalArgs};

/// Runs the `stoke build` command.
///
/// Returns exit code 0 when every file compiled and the link step did not
/// fail, 1 otherwise.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = load_project(global)?;
    args.apply(&mut config);
    validate_config(&config)?;

    let toolchain = ProcessToolchain::new();
    let reporter = TerminalReporter::new(config.run.verbosity);
    let builder = Builder::new(&config, &toolchain, &reporter);

    let summary = builder.run()?;
    Ok(summary.exit_code())
}

impl BuildArgs {
    /// Applies the command-line overrides to `config`.
    pub fn apply(&self, config: &mut ProjectConfig) {
        self.paths.apply(config);
        if let Some(output) = &self.output {
            config.paths.output = output.clone();
        }
        if let Some(compiler) = &self.cpp_compiler {
            config.toolchain.cpp.compiler = compiler.clone();
        }
        if let Some(flag) = &self.cpp_flag {
            config.toolchain.cpp.flag = flag.clone();
        }
        if let Some(compiler) = &self.c_compiler {
            config.toolchain.c.compiler = compiler.clone();
        }
        if let Some(flag) = &self.c_flag {
            config.toolchain.c.flag = flag.clone();
        }
        if let Some(linker) = &self.linker {
            config.toolchain.link.linker = linker.clone();
        }
        if let Some(max) = self.max_errors {
            config.build.max_errors = max;
        }
        if !self.libraries.is_empty() {
            config.build.libraries = self.libraries.clone();
        }
        if let Some(marker) = self.marker {
            config.build.marker = marker.into();
        }
        config.run.clean = self.clean;
    }
}
