//! Plugin path management.
//!
//! Derives every file location a single run touches from the input file name
//! and the base directory, so the CLI and the builder agree on the layout.

use std::path::{Path, PathBuf};

/// File name of the persisted signature store inside the base directory.
pub const SIGNATURES_FILE: &str = "signatures.json";

/// File name of the boilerplate template inside the base directory.
pub const BOILERPLATE_FILE: &str = "base";

/// Suffix appended to the input path for the emitted Go source.
pub const SOURCE_SUFFIX: &str = ".go";

/// Suffix appended to the emitted source path for the plugin artifact.
pub const ARTIFACT_SUFFIX: &str = ".so";

/// File layout for one plugin build.
///
/// ```text
/// <base>/
/// ├── base              # boilerplate template
/// ├── signatures.json   # signature store shared across runs
/// ├── <input>           # block source
/// ├── <input>.go        # emitted plugin source
/// └── <input>.go.so     # built plugin artifact
/// ```
#[derive(Debug, Clone)]
pub struct PluginPaths {
    /// The base directory itself.
    pub base_dir: PathBuf,

    /// Input file name, relative to the base directory.
    pub input_name: String,

    /// Full path of the input block.
    pub input: PathBuf,

    /// Emitted Go source.
    pub source: PathBuf,

    /// Plugin artifact produced by the build.
    pub artifact: PathBuf,

    /// Signature store.
    pub signatures: PathBuf,

    /// Boilerplate template.
    pub boilerplate: PathBuf,
}

impl PluginPaths {
    /// Build the layout for `input_name` inside `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>, input_name: &str) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let input = base_dir.join(input_name);
        let source = append_suffix(&input, SOURCE_SUFFIX);
        let artifact = append_suffix(&source, ARTIFACT_SUFFIX);

        Self {
            signatures: base_dir.join(SIGNATURES_FILE),
            boilerplate: base_dir.join(BOILERPLATE_FILE),
            input_name: input_name.to_string(),
            base_dir,
            input,
            source,
            artifact,
        }
    }

    /// Identifier used in the generated export function name.
    pub fn file_id(&self) -> String {
        file_id(&self.input_name)
    }
}

/// Turn an input file name into a Go identifier fragment.
///
/// Any character that is not ASCII alphanumeric or `_` becomes `_`.
pub fn file_id(input_name: &str) -> String {
    input_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}
