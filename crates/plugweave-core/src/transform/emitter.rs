//! Output assembly for the emitted plugin source.

/// Accumulates the emitted Go file in its fixed order: boilerplate, function
/// definitions as the scanner meets them, then the export function.
#[derive(Debug, Clone)]
pub struct CodeEmitter {
    out: String,
}

impl CodeEmitter {
    /// Start a new file with the boilerplate template.
    pub fn new(boilerplate: &str) -> Self {
        let mut out = String::with_capacity(boilerplate.len() + 1024);
        out.push_str(boilerplate);
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        Self { out }
    }

    /// Pass a line of a function definition through.
    pub fn emit_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    /// Append the export function and return the finished source.
    pub fn finish(mut self, export: &str) -> String {
        self.out.push_str(export);
        self.out
    }
}
