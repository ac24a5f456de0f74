//! Integration tests for block-to-plugin builds.
//!
//! Runs the builder end to end (without the Go toolchain) against a temporary
//! base directory and checks the emitted source and the signature store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use plugweave_core::{Error, PluginBuilder, SignatureRegistry, ToolchainConfig, transform};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

const BOILERPLATE: &str = "package main\n\nimport \"fmt\"\n\nvar _ = fmt.Sprint\n";

/// Temporary base directory with a boilerplate template.
struct BaseDir {
    dir: TempDir,
}

impl BaseDir {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(dir.path().join("base"), BOILERPLATE).expect("Failed to write base");
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write_block(&self, name: &str, source: &str) {
        fs::write(self.path().join(name), source).expect("Failed to write block");
    }

    /// Build a block without invoking the Go toolchain.
    fn build(&self, name: &str, source: &str) -> String {
        self.write_block(name, source);
        let report = PluginBuilder::transform_only()
            .run(name, self.path())
            .expect("Build failed");
        fs::read_to_string(&report.source_path).expect("Failed to read emitted source")
    }

    fn signatures(&self) -> BTreeMap<String, String> {
        let raw = fs::read_to_string(self.signatures_path()).expect("Failed to read store");
        serde_json::from_str(&raw).expect("Store is not a JSON object of strings")
    }

    fn signatures_path(&self) -> PathBuf {
        self.path().join("signatures.json")
    }
}

/// Body of the generated export function, without the signature line, the
/// table binding, and the closing brace.
fn export_body(source: &str) -> Vec<&str> {
    let start = source.find("\nfunc Export_").expect("No export function");
    let lines: Vec<&str> = source[start..].lines().collect();
    lines[2..lines.len() - 1]
        .iter()
        .copied()
        .filter(|line| *line != "\tfuncsMap := *funcMap")
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_add_then_helper_call() {
    let base = BaseDir::new();
    let source = base.build(
        "block_1",
        "func Add(a int, b int) int { return a + b }\nhelperCall(5)\n",
    );

    assert_eq!(
        base.signatures(),
        BTreeMap::from([("Add".to_string(), "func(a int, b int)".to_string())])
    );

    assert!(source.starts_with(BOILERPLATE));
    assert!(source.contains("\nfunc Add(a int, b int) int { return a + b }\n"));
    assert!(source.contains(
        "func Export_block_1(_ *map[string]any, funcMap *map[string]any) {\n\tfuncsMap := *funcMap\n"
    ));
    assert_eq!(
        export_body(&source),
        vec!["helperCall(5)", "\tfuncsMap[\"Add\"] = Add"]
    );
}

#[test]
fn test_unregistered_callee_gets_no_prelude() {
    let base = BaseDir::new();
    base.build("producer", "func Foo(x int) {\n\tfmt.Println(x)\n}\n");

    let source = base.build(
        "consumer",
        "func Add(a int, b int) int { return a + b }\nhelperCall(5)\n",
    );

    assert!(!source.contains(":= funcsMap["));
    assert!(source.contains("helperCall(5)\n"));
}

#[test]
fn test_registered_callee_gets_prelude() {
    let base = BaseDir::new();
    base.build("producer", "func Foo(x int) {\n\tfmt.Println(x)\n}\n");

    let source = base.build("consumer", "Foo(3)\n");

    assert_eq!(
        export_body(&source),
        vec!["\t{", "\tFoo := funcsMap[\"Foo\"].(func(x int))", "Foo(3)", "\t}"]
    );
    assert!(source.contains("func Export_consumer(_ *map[string]any, funcMap *map[string]any)"));
}

#[test]
fn test_redeclared_import_registers_own_function() {
    let base = BaseDir::new();
    base.build("producer", "func Foo(x int) {}\n");

    let source = base.build(
        "consumer",
        "Foo(1)\nFoo(2)\nfunc Foo(x int, y int) {}\nFoo(3)\n",
    );

    // The imported binding is confined to its block; the registration after
    // it refers to the package-level function declared by this unit.
    assert_eq!(
        export_body(&source),
        vec![
            "\t{",
            "\tFoo := funcsMap[\"Foo\"].(func(x int))",
            "Foo(1)",
            "Foo(2)",
            "Foo(3)",
            "\t}",
            "\tfuncsMap[\"Foo\"] = Foo",
        ]
    );
    assert_eq!(base.signatures()["Foo"], "func(x int, y int)");
}

// =============================================================================
// Registry Properties
// =============================================================================

#[test]
fn test_redeclaration_updates_signature_and_keeps_others() {
    let base = BaseDir::new();
    base.build("first", "func Add(a int) int { return a }\nfunc Keep(s string) {}\n");
    base.build("second", "func Add(a int, b int) int { return a + b }\n");

    let signatures = base.signatures();
    assert_eq!(signatures["Add"], "func(a int, b int)");
    assert_eq!(signatures["Keep"], "func(s string)");

    let registry = SignatureRegistry::load(&base.signatures_path());
    assert_eq!(registry.lookup("Keep"), Some("func(s string)"));
}

#[test]
fn test_corrupt_store_is_treated_as_empty() {
    let base = BaseDir::new();
    fs::write(base.signatures_path(), "[1, 2").expect("Failed to write store");

    let source = base.build("blk", "Foo(1)\nfunc Bar() {}\n");

    assert!(!source.contains(":= funcsMap["));
    assert_eq!(
        base.signatures(),
        BTreeMap::from([("Bar".to_string(), "func()".to_string())])
    );
}

// =============================================================================
// Export Body Properties
// =============================================================================

#[test]
fn test_every_declared_name_registered_once() {
    let base = BaseDir::new();
    let source = base.build(
        "blk",
        "func A() {}\nfunc B(x int) {\n}\nfunc C(s string) string { return s }\nA()\n",
    );

    for name in ["A", "B", "C"] {
        let registration = format!("\tfuncsMap[\"{name}\"] = {name}\n");
        assert_eq!(source.matches(&registration).count(), 1, "{name}");
    }
}

#[test]
fn test_top_level_lines_keep_relative_order() {
    let base = BaseDir::new();
    let block = "\
first := 1

func A() int {
\treturn 1
}

second := A()
\tfmt.Println(first, second)


func B() {}
last()
";
    let source = base.build("blk", block);

    assert_eq!(
        export_body(&source),
        vec![
            "first := 1",
            "second := A()",
            "\tfmt.Println(first, second)",
            "last()",
            "\tfuncsMap[\"A\"] = A",
            "\tfuncsMap[\"B\"] = B",
        ]
    );
}

#[test]
fn test_nested_blocks_do_not_end_function_early() {
    let base = BaseDir::new();
    let block = "\
func Classify(x int) string {
\tif x > 0 {
\t\tfor i := 0; i < x; i++ {
\t\t\tif i == 3 { return \"three\" }
\t\t}
\t\treturn \"positive\"
\t}
\treturn \"other\"
}
Classify(4)
";
    let source = base.build("blk", block);

    let defs_end = source.find("\nfunc Export_").expect("No export function");
    assert!(source[..defs_end].contains("\treturn \"other\"\n}\n"));
    assert_eq!(
        export_body(&source),
        vec!["Classify(4)", "\tfuncsMap[\"Classify\"] = Classify"]
    );
}

#[test]
fn test_statement_only_block_leaves_table_unnamed() {
    let base = BaseDir::new();
    let source = base.build("blk", "fmt.Println(\"hi\")\n");

    assert!(source.contains("func Export_blk(_ *map[string]any, _ *map[string]any) {\n"));
    assert!(!source.contains("funcsMap"));
}

#[test]
fn test_in_memory_transform_matches_builder() {
    let base = BaseDir::new();
    let block = "func Add(a int, b int) int { return a + b }\nAdd(1, 2)\n";
    let built = base.build("blk", block);

    let mut registry = SignatureRegistry::new();
    let transformed =
        transform(block, BOILERPLATE, "blk", &mut registry).expect("transform failed");

    assert_eq!(built, transformed.source);
}

// =============================================================================
// Toolchain Failures
// =============================================================================

#[cfg(unix)]
#[test]
fn test_failed_format_keeps_source_and_skips_store() {
    let base = BaseDir::new();
    base.write_block("blk", "func Add(a int, b int) int { return a + b }\nAdd(1, 2)\n");

    // `false` ignores its arguments and exits with status 1.
    let config = ToolchainConfig {
        formatter: "false".to_string(),
        run_build: false,
        ..Default::default()
    };
    let err = PluginBuilder::new(config)
        .run("blk", base.path())
        .unwrap_err();

    assert!(matches!(err, Error::Build { step: "format", .. }), "{err}");
    assert!(base.path().join("blk.go").exists());
    assert!(!base.signatures_path().exists());
}
