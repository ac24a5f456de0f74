//! Export function synthesis.
//!
//! Top-level statements of a block are queued in an [`ExportBuffer`] while the
//! scanner runs and are materialized afterwards into a single
//! `Export_<fileId>` function that also registers every declared function in
//! the capability table.

use std::fmt::Write as _;

/// Name of the dereferenced capability table inside the export function.
pub const TABLE_LOCAL: &str = "funcsMap";

/// Name of the capability table parameter.
pub const TABLE_PARAM: &str = "funcMap";

/// A relocated piece of the export function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportFragment {
    /// A top-level statement moved verbatim.
    Statement(String),

    /// A statement calling a function exported by an earlier unit, preceded
    /// by a prelude that looks it up in the table and asserts its type.
    Imported {
        name: String,
        signature: String,
        statement: String,
    },
}

impl ExportFragment {
    fn render(&self, out: &mut String) {
        match self {
            Self::Statement(statement) => {
                out.push_str(statement);
                out.push('\n');
            }
            Self::Imported {
                name,
                signature,
                statement,
            } => {
                // `write!` into a String cannot fail.
                let _ = writeln!(out, "\t{name} := {TABLE_LOCAL}[\"{name}\"].({signature})");
                out.push_str(statement);
                out.push('\n');
            }
        }
    }
}

/// Ordered queue of relocated top-level statements.
#[derive(Debug, Clone, Default)]
pub struct ExportBuffer {
    fragments: Vec<ExportFragment>,
}

impl ExportBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a statement that needs no prelude.
    pub fn push_statement(&mut self, statement: impl Into<String>) {
        self.fragments
            .push(ExportFragment::Statement(statement.into()));
    }

    /// Queue a statement together with its lookup-and-bind prelude.
    pub fn push_imported(
        &mut self,
        name: impl Into<String>,
        signature: impl Into<String>,
        statement: impl Into<String>,
    ) {
        self.fragments.push(ExportFragment::Imported {
            name: name.into(),
            signature: signature.into(),
            statement: statement.into(),
        });
    }

    /// Whether any queued fragment binds a function from the table.
    pub fn has_imports(&self) -> bool {
        self.fragments
            .iter()
            .any(|f| matches!(f, ExportFragment::Imported { .. }))
    }

    /// Names bound from the table, in queue order.
    pub fn imported_names(&self) -> Vec<String> {
        self.fragments
            .iter()
            .filter_map(|f| match f {
                ExportFragment::Imported { name, .. } => Some(name.clone()),
                ExportFragment::Statement(_) => None,
            })
            .collect()
    }

    pub fn fragments(&self) -> &[ExportFragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Generates the `Export_<fileId>` function for one block.
pub struct ExportSynthesizer<'a> {
    file_id: &'a str,
    buffer: &'a ExportBuffer,
    functions: &'a [String],
}

impl<'a> ExportSynthesizer<'a> {
    /// Create a synthesizer over the queued statements and declared functions.
    pub fn new(file_id: &'a str, buffer: &'a ExportBuffer, functions: &'a [String]) -> Self {
        Self {
            file_id,
            buffer,
            functions,
        }
    }

    /// Name of the generated function.
    pub fn function_name(&self) -> String {
        format!("Export_{}", self.file_id)
    }

    /// The table parameter is only named when the body reads or writes it;
    /// Go rejects unused locals.
    fn uses_table(&self) -> bool {
        !self.functions.is_empty() || self.buffer.has_imports()
    }

    /// Render the generated function.
    pub fn synthesize(&self) -> String {
        let mut code = String::new();
        let uses_table = self.uses_table();
        let table_param = if uses_table { TABLE_PARAM } else { "_" };

        let _ = writeln!(
            code,
            "\nfunc {}(_ *map[string]any, {} *map[string]any) {{",
            self.function_name(),
            table_param
        );
        if uses_table {
            let _ = writeln!(code, "\t{TABLE_LOCAL} := *{TABLE_PARAM}");
        }

        // Preludes shadow package-level names; keep them inside a block so the
        // registrations below see this unit's own functions.
        let scoped = self.buffer.has_imports();
        if scoped {
            code.push_str("\t{\n");
        }
        for fragment in self.buffer.fragments() {
            fragment.render(&mut code);
        }
        if scoped {
            code.push_str("\t}\n");
        }

        for name in self.functions {
            let _ = writeln!(code, "\t{TABLE_LOCAL}[\"{name}\"] = {name}");
        }

        code.push_str("}\n");
        code
    }
}
