//! Block-to-plugin source transformation.
//!
//! # Architecture
//!
//! ```text
//! block source
//!     │
//!     └── SourceScanner (one pass, brace depth)
//!             │
//!             ├── func declarations + bodies ──► CodeEmitter (after boilerplate)
//!             │
//!             └── top-level statements ──► ExportBuffer ──► ExportSynthesizer
//!                                                              │
//!                                                              └── Export_<fileId> appended last
//! ```

mod emitter;
mod export;
mod scanner;

pub use emitter::CodeEmitter;
pub use export::{ExportBuffer, ExportFragment, ExportSynthesizer, TABLE_LOCAL, TABLE_PARAM};
pub use scanner::{
    BraceDepth, FUNC_KEYWORD, FunctionDecl, LineKind, SourceScanner, Transformed, classify,
};

use crate::error::Result;
use crate::registry::SignatureRegistry;

/// Transform a block into plugin source.
///
/// Declarations found in `source` are recorded into `registry`; the caller
/// decides when to persist it.
pub fn transform(
    source: &str,
    boilerplate: &str,
    file_id: &str,
    registry: &mut SignatureRegistry,
) -> Result<Transformed> {
    let mut scanner = SourceScanner::new(registry, boilerplate);
    scanner.scan(source)?;
    Ok(scanner.finish(file_id))
}
