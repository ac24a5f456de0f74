//! Toolchain management for plugin builds.
//!
//! Locates the Go driver and the import formatter and runs them as blocking
//! subprocesses, turning a failed exit status into an error.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::types::ToolchainConfig;
use crate::error::{Error, Result};

/// Manages the external Go toolchain.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    /// Path to the formatter (if the format step is enabled)
    formatter_path: Option<PathBuf>,

    /// Path to the go driver (if the build step is enabled)
    go_path: Option<PathBuf>,
}

impl GoToolchain {
    /// Resolve the programs required by `config`.
    pub fn new(config: &ToolchainConfig) -> Result<Self> {
        let formatter_path = if config.run_formatter {
            Some(Self::find_program(&config.formatter)?)
        } else {
            None
        };
        let go_path = if config.run_build {
            Some(Self::find_program(&config.go)?)
        } else {
            None
        };

        Ok(Self {
            formatter_path,
            go_path,
        })
    }

    /// Whether the format step will run.
    pub fn formats(&self) -> bool {
        self.formatter_path.is_some()
    }

    /// Whether the build step will run.
    pub fn builds(&self) -> bool {
        self.go_path.is_some()
    }

    /// Fix imports and format `source` in place.
    pub fn format(&self, source: &Path) -> Result<()> {
        let Some(formatter) = &self.formatter_path else {
            return Ok(());
        };

        tracing::debug!("Formatting {}", source.display());
        let output = Self::run(Command::new(formatter).arg("-w").arg(source), formatter)?;
        Self::check("format", source, &output)
    }

    /// Build `source` into a plugin at `artifact`.
    ///
    /// Returns `None` when the build step is disabled.
    pub fn build_plugin(&self, source: &Path, artifact: &Path) -> Result<Option<PathBuf>> {
        let Some(go) = &self.go_path else {
            return Ok(None);
        };

        tracing::debug!("Building plugin {}", artifact.display());
        let output = Self::run(
            Command::new(go)
                .args(["build", "-buildmode=plugin", "-o"])
                .arg(artifact)
                .arg(source),
            go,
        )?;
        Self::check("build", source, &output)?;

        Ok(Some(artifact.to_path_buf()))
    }

    /// Find a program in PATH (or accept an explicit path).
    fn find_program(program: &str) -> Result<PathBuf> {
        which::which(program)
            .map_err(|e| Error::Toolchain(format!("{} not found in PATH: {}", program, e)))
    }

    fn run(cmd: &mut Command, program: &Path) -> Result<Output> {
        cmd.output().map_err(|e| {
            Error::Toolchain(format!("Failed to run {}: {}", program.display(), e))
        })
    }

    fn check(step: &'static str, source: &Path, output: &Output) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = if stderr.trim().is_empty() {
            output.status.to_string()
        } else {
            format!("{}\n{}", output.status, stderr.trim_end())
        };

        Err(Error::Build {
            step,
            path: source.to_path_buf(),
            message,
        })
    }
}
