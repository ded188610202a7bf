//! External .NET toolchain invocation.
//!
//! Two commands are run: a version query before anything is staged, and the
//! build itself inside the workspace.

use std::path::{Path, PathBuf};

use semver::Version;

use crate::core::error::BuildError;
use crate::util::config::{BuildConfig, Config};
use crate::util::process::{find_executable, ProcessBuilder};

/// Captured output of a successful build.
#[derive(Debug, Clone, Default)]
pub struct BuildLog {
    pub stdout: String,
    pub stderr: String,
}

/// The external build toolchain.
pub trait Toolchain {
    /// Query and validate the installed toolchain version.
    fn check_version(&self) -> Result<Version, BuildError>;

    /// Build `project_file` with `workspace_dir` as the working directory.
    fn run_build(&self, workspace_dir: &Path, project_file: &Path) -> Result<BuildLog, BuildError>;
}

/// The `dotnet` CLI.
#[derive(Debug, Clone)]
pub struct DotnetToolchain {
    program: PathBuf,
    min_major: u64,
    build: BuildConfig,
    base_dir: Option<PathBuf>,
}

impl DotnetToolchain {
    pub fn new(program: impl Into<PathBuf>, min_major: u64, build: BuildConfig) -> Self {
        DotnetToolchain {
            program: program.into(),
            min_major,
            build,
            base_dir: None,
        }
    }

    /// Resolve relative program paths against `dir` instead of the process
    /// working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn from_config(config: &Config) -> Self {
        DotnetToolchain::new(
            config.toolchain.program.clone(),
            config.toolchain.min_major,
            config.build.clone(),
        )
    }

    pub fn min_major(&self) -> u64 {
        self.min_major
    }

    /// Resolve the configured program to an executable.
    ///
    /// Bare names are looked up in PATH. Paths with a directory part are made
    /// absolute, since the build runs with the workspace as its working
    /// directory.
    pub fn resolve_program(&self) -> Result<PathBuf, BuildError> {
        if self.program.is_absolute() {
            return Ok(self.program.clone());
        }
        if self.program.components().count() > 1 {
            let base = match self.base_dir {
                Some(ref dir) => dir.clone(),
                None => std::env::current_dir()
                    .map_err(|e| BuildError::io(&self.program, e))?,
            };
            return Ok(base.join(&self.program));
        }

        let name = self.program.to_string_lossy();
        find_executable(&name).ok_or_else(|| {
            BuildError::validation_with_help(
                format!("`{}` was not found in PATH", name),
                format!(
                    "Install the .NET SDK {} or newer, or set `toolchain.program` in .apphost/config.toml",
                    self.min_major
                ),
            )
        })
    }

    fn base_command(&self, program: &Path) -> ProcessBuilder {
        ProcessBuilder::new(program)
            .env("DOTNET_NOLOGO", "1")
            .env("DOTNET_CLI_TELEMETRY_OPTOUT", "1")
    }

    /// `dotnet --version`
    pub fn version_command(&self, program: &Path) -> ProcessBuilder {
        self.base_command(program).arg("--version")
    }

    /// `dotnet <command> <project> -c <configuration> [-f <framework>] [extra...]`
    pub fn build_command(
        &self,
        program: &Path,
        workspace_dir: &Path,
        project_file: &Path,
    ) -> ProcessBuilder {
        let mut cmd = self
            .base_command(program)
            .arg(&self.build.command)
            .arg(project_file)
            .args(["-c", self.build.configuration.as_str()]);

        if let Some(ref framework) = self.build.framework {
            cmd = cmd.args(["-f", framework.as_str()]);
        }

        cmd.args(&self.build.extra_args).cwd(workspace_dir)
    }
}

impl Toolchain for DotnetToolchain {
    fn check_version(&self) -> Result<Version, BuildError> {
        let program = self.resolve_program()?;
        let cmd = self.version_command(&program);
        let output = cmd.exec()?;

        if !output.status.success() {
            return Err(BuildError::validation(format!(
                "`{}` exited with {:?}: {}",
                cmd.display_command(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let version = parse_version(&stdout).ok_or_else(|| {
            BuildError::validation(format!(
                "could not parse toolchain version from `{}`",
                stdout.trim()
            ))
        })?;

        check_minimum(&version, self.min_major)?;
        tracing::info!("using {} {}", program.display(), version);
        Ok(version)
    }

    fn run_build(&self, workspace_dir: &Path, project_file: &Path) -> Result<BuildLog, BuildError> {
        let program = self.resolve_program()?;
        let cmd = self.build_command(&program, workspace_dir, project_file);
        tracing::info!("running `{}`", cmd.display_command());

        let output = cmd.exec()?;
        let log = BuildLog {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            // dotnet reports compiler errors on stdout; fall back to it.
            let diagnostics = if log.stderr.trim().is_empty() {
                log.stdout
            } else {
                log.stderr
            };
            return Err(BuildError::Process {
                command: cmd.display_command(),
                exit_code: output.status.code(),
                stderr: diagnostics.trim_end().to_string(),
            });
        }

        Ok(log)
    }
}

/// Parse the first line of `output` that holds a version number.
///
/// Accepts full semver (`9.0.100`, `9.0.100-rc.1.24452.12`) as well as
/// `major.minor`.
pub fn parse_version(output: &str) -> Option<Version> {
    output.lines().map(str::trim).find_map(|line| {
        Version::parse(line).ok().or_else(|| {
            let mut parts = line.split('.');
            let major = parts.next()?.parse().ok()?;
            let minor = parts.next()?.parse().ok()?;
            parts.next().is_none().then(|| Version::new(major, minor, 0))
        })
    })
}

/// Reject versions older than `min_major`.
pub fn check_minimum(version: &Version, min_major: u64) -> Result<(), BuildError> {
    if version.major < min_major {
        return Err(BuildError::validation_with_help(
            format!(
                "toolchain version {} is not supported; {} or newer is required",
                version, min_major
            ),
            format!("Install the .NET SDK {} or newer", min_major),
        ));
    }
    Ok(())
}
