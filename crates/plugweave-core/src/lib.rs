//! Core engine for plugweave.
//!
//! This crate provides:
//! - Signature registry persisted across plugin builds
//! - Line-oriented transformation of Go blocks into plugin sources
//! - Toolchain driving (goimports, `go build -buildmode=plugin`)

pub mod compile;
pub mod error;
pub mod paths;
pub mod registry;
pub mod transform;

pub use compile::{BuildReport, GoToolchain, PluginBuilder, ToolchainConfig};
pub use error::{Error, Result};
pub use paths::PluginPaths;
pub use registry::SignatureRegistry;
pub use transform::{Transformed, transform};
