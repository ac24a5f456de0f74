//! Build command implementation for the plugweave CLI.

use plugweave_core::{BuildReport, PluginBuilder, ToolchainConfig};

/// Options collected from the command line.
pub struct BuildOptions {
    pub input: String,
    pub base_dir: String,
    pub config: ToolchainConfig,
    pub json: bool,
}

/// Build one block into a plugin.
pub fn execute(options: &BuildOptions) -> anyhow::Result<()> {
    let builder = PluginBuilder::new(options.config.clone());
    let report = builder.run(&options.input, &options.base_dir)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &BuildReport) {
    println!("Emitted {}", report.source_path.display());
    if let Some(artifact) = &report.artifact_path {
        println!("Built   {}", artifact.display());
    }
    if !report.functions.is_empty() {
        println!("Exports: {}", report.functions.join(", "));
    }
    if !report.imports.is_empty() {
        println!("Imports: {}", report.imports.join(", "));
    }
    println!(
        "Relocated {} statements in {}ms",
        report.relocated, report.build_time_ms
    );
}
