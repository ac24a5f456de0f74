//! Build pipeline for plugin units.
//!
//! This module provides:
//! - Toolchain management (goimports, `go build -buildmode=plugin`)
//! - The plugin builder tying registry, transform, and toolchain together
//!
//! # Architecture
//!
//! ```text
//! <base>/<input> ──► transform ──► <base>/<input>.go ──► goimports -w ──► go build ──► <input>.go.so
//!                        ▲                                                                 │
//!                        │                                                                 ▼
//!              <base>/signatures.json ◄──────────────── merged registry ◄────────────── success
//! ```

mod builder;
mod toolchain;
mod types;

pub use builder::PluginBuilder;
pub use toolchain::GoToolchain;
pub use types::{BuildReport, ToolchainConfig};
