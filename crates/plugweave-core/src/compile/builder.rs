//! Plugin builder: one block in, one plugin out.

use std::fs;
use std::path::Path;
use std::time::Instant;

use super::toolchain::GoToolchain;
use super::types::{BuildReport, ToolchainConfig};
use crate::error::{Error, Result};
use crate::paths::PluginPaths;
use crate::registry::SignatureRegistry;
use crate::transform;

/// Builds plugin units from block sources.
pub struct PluginBuilder {
    /// Toolchain configuration
    config: ToolchainConfig,
}

impl PluginBuilder {
    /// Create a new plugin builder.
    pub fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    /// Builder that only emits source.
    pub fn transform_only() -> Self {
        Self::new(ToolchainConfig::transform_only())
    }

    /// Transform `input_name` (relative to `base_dir`), build it, and update
    /// the signature store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The block or the boilerplate template cannot be read
    /// - A function declaration is malformed
    /// - The formatter or the build fails (the emitted source stays on disk
    ///   and the signature store is left untouched)
    pub fn run(&self, input_name: &str, base_dir: impl AsRef<Path>) -> Result<BuildReport> {
        let start = Instant::now();
        let paths = PluginPaths::new(base_dir, input_name);

        // Fail on a missing toolchain before touching any file.
        let toolchain = GoToolchain::new(&self.config)?;
        if self.config.needs_toolchain() {
            tracing::debug!(
                "Building {} in {} (format: {}, build: {})",
                paths.input_name,
                paths.base_dir.display(),
                toolchain.formats(),
                toolchain.builds()
            );
        } else {
            tracing::debug!("Format and build steps disabled, emitting source only");
        }

        let mut registry = SignatureRegistry::load(&paths.signatures);
        let boilerplate = read(&paths.boilerplate)?;
        let source = read(&paths.input)?;

        let transformed =
            transform::transform(&source, &boilerplate, &paths.file_id(), &mut registry)?;
        fs::write(&paths.source, &transformed.source)?;
        tracing::info!(
            "Emitted {} ({} functions, {} imports, {} relocated statements)",
            paths.source.display(),
            transformed.functions.len(),
            transformed.imports.len(),
            transformed.relocated
        );

        toolchain.format(&paths.source)?;
        let artifact_path = toolchain.build_plugin(&paths.source, &paths.artifact)?;
        if let Some(artifact) = &artifact_path {
            tracing::info!("Plugin built: {}", artifact.display());
        }

        registry.persist(&paths.signatures)?;

        Ok(BuildReport {
            source_path: paths.source,
            artifact_path,
            functions: transformed.functions,
            imports: transformed.imports,
            relocated: transformed.relocated,
            build_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}
