//! Line-oriented scanner for block sources.
//!
//! The scanner makes one forward pass over the block. At brace depth zero it
//! classifies each line: function declarations are emitted in place, every
//! other non-blank line is queued for the export function. Inside a function
//! body lines pass through untouched until the body's closing brace.

use rustc_hash::FxHashSet;

use super::emitter::CodeEmitter;
use super::export::{ExportBuffer, ExportSynthesizer};
use crate::error::{Error, Result};
use crate::registry::SignatureRegistry;

/// Keyword that starts a function declaration.
pub const FUNC_KEYWORD: &str = "func";

/// Classification of a line seen at brace depth zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// First token is the `func` keyword.
    FunctionStart,
    /// First token looks like `identifier(`.
    Call { callee: &'a str },
    /// Anything else.
    Statement,
}

/// Classify a top-level line by its first whitespace-delimited token.
pub fn classify(line: &str) -> LineKind<'_> {
    let Some(first) = line.split_whitespace().next() else {
        return LineKind::Blank;
    };

    if first == FUNC_KEYWORD {
        return LineKind::FunctionStart;
    }

    match first.split_once('(') {
        Some((callee, _)) if callee != FUNC_KEYWORD && is_identifier(callee) => {
            LineKind::Call { callee }
        }
        _ => LineKind::Statement,
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Name and parameter list of a function declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    /// Text of the first parenthesized group after the name, as written.
    pub params: String,
}

impl FunctionDecl {
    /// Parse a line whose first token is `func`.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let malformed = |message: &str| Error::Parse {
            line: line_no,
            message: message.to_string(),
        };

        let rest = line
            .trim_start()
            .strip_prefix(FUNC_KEYWORD)
            .ok_or_else(|| malformed("expected `func` keyword"))?
            .trim_start();

        let name_len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        if !is_identifier(name) {
            return Err(malformed("missing function name"));
        }

        let after_name = &rest[name_len..];
        let open = after_name
            .find('(')
            .ok_or_else(|| malformed("missing parameter list"))?;
        let params_start = open + 1;

        let mut depth = 1usize;
        let mut close = None;
        for (offset, c) in after_name[params_start..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(params_start + offset);
                        break;
                    }
                }
                _ => {}
            }
        }
        let close = close.ok_or_else(|| malformed("unterminated parameter list"))?;

        Ok(Self {
            name: name.to_string(),
            params: after_name[params_start..close].to_string(),
        })
    }

    /// Signature stored in the registry, e.g. `func(a int, b int)`.
    pub fn signature(&self) -> String {
        format!("{}({})", FUNC_KEYWORD, self.params)
    }
}

/// Depth of open braces inside the current function body.
///
/// Counting is purely character-level: a brace inside a string literal or a
/// comment is counted like any other and will skew the depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceDepth {
    depth: usize,
}

impl BraceDepth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open one level.
    pub fn push(&mut self) {
        self.depth += 1;
    }

    /// Close one level.
    pub fn pop(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// True when the scanner is at top level.
    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// Count the braces of `text`, stopping as soon as the depth returns to
    /// zero. Returns true if the depth reached zero.
    pub fn scan(&mut self, text: &str) -> bool {
        for c in text.chars() {
            if self.is_empty() {
                break;
            }
            match c {
                '{' => self.push(),
                '}' => self.pop(),
                _ => {}
            }
        }
        self.is_empty()
    }
}

/// Result of scanning one block.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// Complete emitted Go source.
    pub source: String,

    /// Functions declared in the block, in declaration order.
    pub functions: Vec<String>,

    /// Functions bound from earlier units, in first-use order.
    pub imports: Vec<String>,

    /// Number of relocated top-level statements.
    pub relocated: usize,
}

/// Single-pass scanner routing block lines to the emitter or the export
/// buffer.
pub struct SourceScanner<'r> {
    registry: &'r mut SignatureRegistry,
    emitter: CodeEmitter,
    exports: ExportBuffer,
    /// Declared function names, first declaration order, no repeats.
    functions: Vec<String>,
    /// Names already bound by a prelude in this unit.
    bound: FxHashSet<String>,
    depth: BraceDepth,
    line_no: usize,
}

impl<'r> SourceScanner<'r> {
    /// Create a scanner that writes after `boilerplate`.
    pub fn new(registry: &'r mut SignatureRegistry, boilerplate: &str) -> Self {
        Self {
            registry,
            emitter: CodeEmitter::new(boilerplate),
            exports: ExportBuffer::new(),
            functions: Vec::new(),
            bound: FxHashSet::default(),
            depth: BraceDepth::new(),
            line_no: 0,
        }
    }

    /// Whether the scanner is inside a function body.
    pub fn in_function(&self) -> bool {
        !self.depth.is_empty()
    }

    /// Scan every line of `source`.
    pub fn scan(&mut self, source: &str) -> Result<()> {
        for line in source.lines() {
            self.scan_line(line)?;
        }
        Ok(())
    }

    /// Process one line (without its line terminator).
    pub fn scan_line(&mut self, line: &str) -> Result<()> {
        self.line_no += 1;

        if self.in_function() {
            self.emitter.emit_line(line);
            if self.depth.scan(line) {
                tracing::debug!("line {}: function body closed", self.line_no);
            }
            return Ok(());
        }

        match classify(line) {
            LineKind::Blank => {}
            LineKind::FunctionStart => self.start_function(line)?,
            LineKind::Call { callee } => self.queue_call(callee, line),
            LineKind::Statement => self.exports.push_statement(line),
        }
        Ok(())
    }

    fn start_function(&mut self, line: &str) -> Result<()> {
        let decl = FunctionDecl::parse(line, self.line_no)?;
        self.emitter.emit_line(line);

        tracing::debug!(
            "line {}: declared {} {}",
            self.line_no,
            decl.name,
            decl.signature()
        );
        self.registry.record_current(&decl.name, decl.signature());
        if !self.functions.contains(&decl.name) {
            self.functions.push(decl.name);
        }

        // The body is opened by the declaration itself; counting resumes
        // after the first `{` on the line.
        self.depth.push();
        let keyword_end = line.find(FUNC_KEYWORD).map_or(0, |i| i + FUNC_KEYWORD.len());
        if let Some(open) = line[keyword_end..].find('{') {
            self.depth.scan(&line[keyword_end + open + 1..]);
        }
        Ok(())
    }

    fn queue_call(&mut self, callee: &str, line: &str) {
        if self.registry.is_declared(callee) {
            self.exports.push_statement(line);
            return;
        }

        match self.registry.lookup(callee) {
            Some(signature) if !self.bound.contains(callee) => {
                tracing::debug!("line {}: binding {} from an earlier unit", self.line_no, callee);
                self.exports.push_imported(callee, signature, line);
                self.bound.insert(callee.to_string());
            }
            _ => self.exports.push_statement(line),
        }
    }

    /// Finish the pass and render the export function.
    pub fn finish(self, file_id: &str) -> Transformed {
        if self.in_function() {
            tracing::warn!(
                "block ended inside a function body ({} unclosed braces)",
                self.depth.depth()
            );
        }

        if self.exports.is_empty() {
            tracing::debug!("no top-level statements to relocate");
        }

        let export = ExportSynthesizer::new(file_id, &self.exports, &self.functions).synthesize();
        let imports = self.exports.imported_names();
        let relocated = self.exports.len();

        Transformed {
            source: self.emitter.finish(&export),
            functions: self.functions,
            imports,
            relocated,
        }
    }
}
