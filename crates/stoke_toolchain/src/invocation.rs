//! Argument vector construction for compile and link steps.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// A compiler and the options it is always run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerProfile {
    /// Compiler binary.
    pub binary: String,
    /// Single free-form flag, passed as `-<flag>` when non-empty.
    pub flag: String,
    /// Include directories, each passed as `-I <dir>`.
    pub include_dirs: Vec<PathBuf>,
}

/// A linker and the option it is always run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkerProfile {
    /// Linker binary.
    pub binary: String,
    /// Single free-form flag, passed as `-<flag>` when non-empty.
    pub flag: String,
}

/// A fully constructed toolchain command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
    output: PathBuf,
}

impl Invocation {
    /// Builds `[binary, -flag?, -I dir..., -c, input, -o, output]`.
    pub fn compile(profile: &CompilerProfile, input: &Path, output: &Path) -> Self {
        let mut args = Vec::new();
        push_flag(&mut args, &profile.flag);
        for dir in &profile.include_dirs {
            args.push(OsString::from("-I"));
            args.push(dir.as_os_str().to_owned());
        }
        args.push(OsString::from("-c"));
        args.push(input.as_os_str().to_owned());
        args.push(OsString::from("-o"));
        args.push(output.as_os_str().to_owned());

        Self {
            program: profile.binary.clone(),
            args,
            output: output.to_path_buf(),
        }
    }

    /// Builds `[linker, -flag?, inputs..., -o, artifact, libraries...]`.
    pub fn link(
        profile: &LinkerProfile,
        inputs: &[PathBuf],
        artifact: &Path,
        libraries: &[String],
    ) -> Self {
        let mut args = Vec::new();
        push_flag(&mut args, &profile.flag);
        args.extend(inputs.iter().map(|p| p.as_os_str().to_owned()));
        args.push(OsString::from("-o"));
        args.push(artifact.as_os_str().to_owned());
        args.extend(libraries.iter().map(OsString::from));

        Self {
            program: profile.binary.clone(),
            args,
            output: artifact.to_path_buf(),
        }
    }

    /// The program to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// The file the toolchain is asked to produce.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Returns the argument that follows the first `-c`, if any.
    pub fn input(&self) -> Option<&Path> {
        let pos = self.args.iter().position(|a| a == OsStr::new("-c"))?;
        self.args.get(pos + 1).map(Path::new)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

fn push_flag(args: &mut Vec<OsString>, flag: &str) {
    if !flag.is_empty() {
        args.push(OsString::from(format!("-{flag}")));
    }
}
