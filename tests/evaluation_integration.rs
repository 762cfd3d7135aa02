//! Integration tests for the synthesize, render and evaluate pipeline.

use std::path::PathBuf;

use docgauge::analysis::{analyzer_for, CodeStructure, Dialect};
use docgauge::evaluation::{compare_sections, evaluate, evaluate_payloads, CoverageBasis};
use docgauge::render;
use docgauge::score::Grade;
use docgauge::synth::{synthesize_structure_blocking, LocalSynthesizer};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn sample_structure() -> CodeStructure {
    let source = std::fs::read_to_string(testdata_path().join("sample.ts")).unwrap();
    analyzer_for(Dialect::TypeScript).analyze(&source)
}

fn reference() -> String {
    std::fs::read_to_string(testdata_path().join("reference.md")).unwrap()
}

#[test]
fn test_generated_document_covers_every_function() {
    let structure = sample_structure();
    let payloads = synthesize_structure_blocking(&LocalSynthesizer, &structure, 4).unwrap();
    assert_eq!(payloads.len(), structure.function_count());

    let document = render::render_document(&render::render_all(&structure, &payloads));
    assert!(document.starts_with("# Generated Documentation"));
    for name in ["findItem", "countItems", "formatPrice", "loadInventory", "addItem", "removeItem"] {
        assert!(
            document.contains(&format!("## Function: {name}\n")),
            "missing section for {name}"
        );
    }
    assert!(document.contains("@param currency - "));
    assert!(document.contains("const result = await loadInventory(path, { key: \"value\" });"));
}

#[test]
fn test_evaluate_payloads_against_reference() {
    let structure = sample_structure();
    let payloads = synthesize_structure_blocking(&LocalSynthesizer, &structure, 2).unwrap();
    let result = evaluate_payloads(&payloads, &reference(), &structure);

    assert_eq!(result.coverage_score, 100.0);
    assert_eq!(result.detailed_analysis.coverage.basis, CoverageBasis::PayloadEntries);
    assert_eq!(result.detailed_analysis.coverage.documented_functions, 6);
    assert_eq!(result.consistency_score, 100.0);
    assert!(result.keyword_overlap_score > 0.0 && result.keyword_overlap_score < 100.0);
    assert!((0.0..=100.0).contains(&result.overall_score));
    assert!(result
        .detailed_analysis
        .keyword_overlap
        .shared_keywords
        .contains("item"));
}

#[test]
fn test_self_referential_evaluation() {
    let structure = sample_structure();
    let payloads = synthesize_structure_blocking(&LocalSynthesizer, &structure, 8).unwrap();
    let generated = render::render_document(&render::render_all(&structure, &payloads));

    let result = evaluate(&generated, &generated, &structure);
    assert_eq!(result.keyword_overlap_score, 100.0);
    assert_eq!(result.length_ratio, 1.0);
    // 35 + 30 + 15 + 20
    assert_eq!(result.overall_score, 100.0);
    assert_eq!(result.grade(), Grade::Excellent);
}

#[test]
fn test_section_comparison_with_reference() {
    let structure = sample_structure();
    let payloads = synthesize_structure_blocking(&LocalSynthesizer, &structure, 4).unwrap();
    let generated = render::render_document(&render::render_all(&structure, &payloads));

    let (rows, summary) = compare_sections(&generated, &reference());
    assert_eq!(summary.total_functions, 7);
    assert_eq!(summary.both_documented, 2);
    assert_eq!(summary.only_generated, 4);
    assert_eq!(summary.only_reference, 1);

    let legacy = rows.iter().find(|r| r.function == "legacyHelper").unwrap();
    assert!(legacy.generated.is_none());
    assert!(!legacy.matched);
}
