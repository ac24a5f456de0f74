//! Signature registry shared across plugin builds.
//!
//! Every run loads the signatures recorded by earlier runs, records the
//! declarations it finds, and writes the union back with the current run's
//! entries taking precedence.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Persisted mapping from function name to its `func(<params>)` signature.
#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    /// Entries loaded from the store at the start of the run.
    previous: BTreeMap<String, String>,

    /// Entries recorded by the current run.
    current: BTreeMap<String, String>,
}

impl SignatureRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with previously persisted entries.
    pub fn with_previous(previous: BTreeMap<String, String>) -> Self {
        Self {
            previous,
            current: BTreeMap::new(),
        }
    }

    /// Load the registry from a JSON store.
    ///
    /// Never fails: a missing, unreadable, or malformed store yields an empty
    /// registry.
    pub fn load(path: &Path) -> Self {
        let previous = fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str::<BTreeMap<String, String>>(&raw).ok());

        match previous {
            Some(previous) => {
                tracing::debug!(
                    "Loaded {} signatures from {}",
                    previous.len(),
                    path.display()
                );
                Self::with_previous(previous)
            }
            None => {
                tracing::debug!("No usable signature store at {}", path.display());
                Self::new()
            }
        }
    }

    /// Signature recorded by an earlier run, if any.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.previous.get(name).map(String::as_str)
    }

    /// Whether `name` was declared in the current run.
    pub fn is_declared(&self, name: &str) -> bool {
        self.current.contains_key(name)
    }

    /// Signature recorded by the current run, if any.
    #[cfg(test)]
    pub(crate) fn current(&self, name: &str) -> Option<&str> {
        self.current.get(name).map(String::as_str)
    }

    /// Record a declaration found in the current run.
    pub fn record_current(&mut self, name: impl Into<String>, signature: impl Into<String>) {
        self.current.insert(name.into(), signature.into());
    }

    /// Union of previous and current entries; current entries win.
    pub fn merged(&self) -> BTreeMap<String, String> {
        let mut merged = self.previous.clone();
        merged.extend(
            self.current
                .iter()
                .map(|(name, sig)| (name.clone(), sig.clone())),
        );
        merged
    }

    /// Write the merged registry back to the store.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let merged = self.merged();
        let json = serde_json::to_string_pretty(&merged)?;
        fs::write(path, json)?;

        tracing::debug!("Persisted {} signatures to {}", merged.len(), path.display());
        Ok(())
    }
}
