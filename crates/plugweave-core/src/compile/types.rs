//! Common types for the plugin build pipeline.

use std::path::PathBuf;

use serde::Serialize;

/// Configuration for the external toolchain steps.
#[derive(Debug, Clone)]
pub struct ToolchainConfig {
    /// Import-fixing formatter, invoked as `<formatter> -w <file>`.
    pub formatter: String,

    /// Go driver, invoked as `<go> build -buildmode=plugin ...`.
    pub go: String,

    /// Run the formatter on the emitted source.
    pub run_formatter: bool,

    /// Build the plugin artifact.
    pub run_build: bool,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            formatter: "goimports".to_string(),
            go: "go".to_string(),
            run_formatter: true,
            run_build: true,
        }
    }
}

impl ToolchainConfig {
    /// Emit the source only; neither format nor build.
    pub fn transform_only() -> Self {
        Self {
            run_formatter: false,
            run_build: false,
            ..Default::default()
        }
    }

    /// Whether any external program will be invoked.
    pub fn needs_toolchain(&self) -> bool {
        self.run_formatter || self.run_build
    }
}

/// Outcome of a plugin build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Emitted Go source.
    pub source_path: PathBuf,

    /// Built artifact, if the build step ran.
    pub artifact_path: Option<PathBuf>,

    /// Functions declared by the block.
    pub functions: Vec<String>,

    /// Functions bound from earlier units.
    pub imports: Vec<String>,

    /// Number of top-level statements moved into the export function.
    pub relocated: usize,

    /// Build time in milliseconds
    pub build_time_ms: u64,
}
