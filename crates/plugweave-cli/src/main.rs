//! plugweave CLI - rewrite a Go block into a loadable plugin.

mod build;

use clap::Parser;

#[derive(Parser)]
#[command(name = "plugweave")]
#[command(about = "Rewrite a Go block into a plugin exporting its functions by name")]
#[command(version)]
struct Cli {
    /// Block file name, relative to the base directory
    input: String,

    /// Directory holding the block, the `base` template and `signatures.json`
    base_dir: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Skip the import-fixing formatter
    #[arg(long)]
    no_format: bool,

    /// Skip the plugin build
    #[arg(long)]
    no_build: bool,

    /// Formatter program
    #[arg(long, default_value = "goimports")]
    formatter: String,

    /// Go driver program
    #[arg(long, default_value = "go")]
    go: String,

    /// Print the build report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Helper to format plugweave-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<plugweave_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    let options = build::BuildOptions {
        input: cli.input,
        base_dir: cli.base_dir,
        config: plugweave_core::ToolchainConfig {
            formatter: cli.formatter,
            go: cli.go,
            run_formatter: !cli.no_format,
            run_build: !cli.no_build,
        },
        json: cli.json,
    };

    build::execute(&options).map_err(format_error)
}
