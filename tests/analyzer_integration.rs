//! Integration tests for structural analysis.
//!
//! These tests run the analyzer against the testdata fixtures through the
//! same entry points the CLI uses.

use std::path::PathBuf;

use docgauge::analysis::{analyzer_for, AnalysisContext, Dialect, DialectChoice};
use docgauge::config::Config;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(testdata_path().join(name)).expect("fixture should exist")
}

#[test]
fn test_sample_ts_functions() {
    let structure = analyzer_for(Dialect::TypeScript).analyze(&read_fixture("sample.ts"));
    assert!(structure.is_valid, "{:?}", structure.error_message);

    let names: Vec<_> = structure.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["findItem", "countItems", "formatPrice", "loadInventory"]);

    let find = structure.find_function("findItem").unwrap();
    assert_eq!(find.parameters, vec!["id"]);
    assert_eq!(find.return_type_text.as_deref(), Some("Item | undefined"));
    assert_eq!((find.line_start, find.line_end), (14, 16));
    assert!(find.is_exported);
    assert!(!find.is_async);
    let doc = find.leading_doc_comment.as_deref().unwrap();
    assert!(doc.starts_with("Find an item by its identifier."));
    assert!(doc.contains("@param id - The item identifier"));

    let count = structure.find_function("countItems").unwrap();
    assert!(count.leading_doc_comment.is_none(), "line comments are not doc comments");
    assert!(!count.is_exported);

    let format = structure.find_function("formatPrice").unwrap();
    assert_eq!(format.parameters, vec!["value", "currency"]);
    assert_eq!(format.return_type_text.as_deref(), Some("string"));
    assert_eq!((format.line_start, format.line_end), (24, 26));
    assert!(format.is_exported);

    let load = structure.find_function("loadInventory").unwrap();
    assert!(load.is_async);
    assert_eq!(load.parameters, vec!["path", "options"]);
    assert_eq!(load.return_type_text.as_deref(), Some("Promise<Item[]>"));
}

#[test]
fn test_sample_ts_classes_and_module_doc() {
    let structure = analyzer_for(Dialect::TypeScript).analyze(&read_fixture("sample.ts"));

    assert_eq!(
        structure.module_doc_comment.as_deref(),
        Some("Inventory helpers for the warehouse service.")
    );

    let store = structure.find_class("ItemStore").unwrap();
    assert_eq!(store.leading_doc_comment.as_deref(), Some("Stores items in memory."));
    let methods: Vec<_> = store.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["addItem", "removeItem"]);
    assert_eq!(
        store.methods[0].leading_doc_comment.as_deref(),
        Some("Add an item to the store.")
    );
    assert!(store.methods[1].leading_doc_comment.is_none());

    // four top-level functions plus two methods
    assert_eq!(structure.function_count(), 6);
    assert_eq!(structure.total_line_count, 50);
}

#[test]
fn test_sample_js() {
    let structure = analyzer_for(Dialect::JavaScript).analyze(&read_fixture("sample.js"));
    assert!(structure.is_valid);

    let names: Vec<_> = structure.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["sum", "range"]);
    assert_eq!(structure.functions[1].parameters, vec!["start", "end"]);
    assert_eq!(structure.module_doc_comment.as_deref(), Some("Utility helpers."));
}

#[test]
fn test_broken_fixture_is_invalid() {
    let structure = analyzer_for(Dialect::TypeScript).analyze(&read_fixture("broken.ts"));
    assert!(!structure.is_valid);
    assert!(structure.functions.is_empty());
    assert!(structure
        .error_message
        .as_deref()
        .unwrap()
        .starts_with("Syntax error"));
}

#[test]
fn test_context_analyzes_in_parallel() {
    let testdata = testdata_path();
    let ctx = AnalysisContext::new(&testdata, DialectChoice::Auto);
    let files = vec![
        testdata.join("sample.ts"),
        testdata.join("broken.ts"),
        testdata.join("sample.js"),
        testdata.join("does-not-exist.ts"),
    ];

    let units = ctx.analyze_files_parallel(&files);
    let paths: Vec<_> = units.iter().map(|u| u.path.as_str()).collect();
    assert_eq!(paths, vec!["broken.ts", "sample.js", "sample.ts"]);
    assert_eq!(units[1].dialect, Dialect::JavaScript);
    assert_eq!(units[2].dialect, Dialect::TypeScript);
    assert!(!units[0].structure.is_valid);
    assert!(ctx.cached(testdata.join("sample.ts")).is_some());
}

#[test]
fn test_project_config_fixture() {
    let config = Config::parse_file(testdata_path().join("project/docgauge.yaml")).unwrap();
    assert_eq!(config.dialect, DialectChoice::Auto);
    assert_eq!(config.synthesizer.concurrency, 4);
    assert!(config.is_path_excluded(std::path::Path::new("dist/bundle.js")));
    assert!(!config.is_path_excluded(std::path::Path::new("src/index.ts")));
}
