//! Documentation quality evaluation.
//!
//! Scores a generated documentation text against a reference text and the
//! structure it documents. Four sub-scores feed a weighted overall score:
//!
//! - keyword overlap (Jaccard similarity of keyword sets)
//! - coverage (documented functions / documentable functions)
//! - length ratio (word count balance)
//! - consistency (presence of `@param`, `@returns` and `@example` markers)
//!
//! Evaluation is pure and deterministic.

mod compare;
mod keywords;
mod metrics;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::CodeStructure;
use crate::render;
use crate::score::{self, Grade};
use crate::synth::DocumentationPayload;

pub use compare::{compare_sections, split_by_function, ComparisonSummary, SectionComparison};
pub use keywords::{extract_keywords, jaccard, MIN_TOKEN_CHARS};
pub use metrics::{
    coverage_score, is_balanced, length_contribution, length_ratio, penalties, word_count,
    Markers, BALANCED_RATIO,
};

/// How the documented-function count was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageBasis {
    /// Every extracted function is counted as documented once generation ran.
    AssumedComplete,
    /// Counted from non-empty payloads matched by function name.
    PayloadEntries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordAnalysis {
    pub generated_keywords: BTreeSet<String>,
    pub reference_keywords: BTreeSet<String>,
    pub shared_keywords: BTreeSet<String>,
    pub union_size: usize,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageAnalysis {
    pub total_functions: usize,
    pub documented_functions: usize,
    pub basis: CoverageBasis,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthAnalysis {
    pub generated_words: usize,
    pub reference_words: usize,
    /// The ratio mapped onto 0-100 for the overall score.
    pub contribution: f64,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyAnalysis {
    pub has_param_markers: bool,
    pub has_return_markers: bool,
    pub has_example_markers: bool,
    pub penalty: u32,
    pub interpretation: String,
}

/// The raw inputs behind each sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub keyword_overlap: KeywordAnalysis,
    pub coverage: CoverageAnalysis,
    pub length: LengthAnalysis,
    pub consistency: ConsistencyAnalysis,
}

/// Scores produced by one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub keyword_overlap_score: f64,
    pub coverage_score: f64,
    /// Raw `generated / reference` word ratio.
    pub length_ratio: f64,
    pub consistency_score: f64,
    /// Weighted score, one decimal.
    pub overall_score: f64,
    pub detailed_analysis: DetailedAnalysis,
}

impl EvaluationResult {
    pub fn grade(&self) -> Grade {
        Grade::from_score(self.overall_score)
    }
}

/// Evaluate generated documentation against a reference.
///
/// Coverage counts every documentable function as documented
/// ([`CoverageBasis::AssumedComplete`]). Use [`evaluate_payloads`] to measure
/// coverage from actual entries.
pub fn evaluate(generated: &str, reference: &str, structure: &CodeStructure) -> EvaluationResult {
    let total = structure.function_count();
    score_texts(
        generated,
        reference,
        total,
        total,
        CoverageBasis::AssumedComplete,
    )
}

/// Render `payloads` and evaluate the result.
///
/// Payloads are paired with the documentable functions by position (see
/// [`render::pair_records`]). A function counts as documented only when the
/// payload at its position names it and is non-empty.
pub fn evaluate_payloads(
    payloads: &[DocumentationPayload],
    reference: &str,
    structure: &CodeStructure,
) -> EvaluationResult {
    let generated = render::render_document(&render::render_all(structure, payloads));
    let total = structure.function_count();
    let documented = render::pair_records(structure, payloads)
        .filter(|(payload, record)| record.is_some() && !payload.is_empty())
        .count();

    score_texts(
        &generated,
        reference,
        total,
        documented,
        CoverageBasis::PayloadEntries,
    )
}

fn score_texts(
    generated: &str,
    reference: &str,
    total: usize,
    documented: usize,
    basis: CoverageBasis,
) -> EvaluationResult {
    let generated_keywords = extract_keywords(generated);
    let reference_keywords = extract_keywords(reference);
    let keyword_overlap_score = jaccard(&generated_keywords, &reference_keywords) * 100.0;
    let shared_keywords: BTreeSet<String> = generated_keywords
        .intersection(&reference_keywords)
        .cloned()
        .collect();
    let union_size = generated_keywords.union(&reference_keywords).count();

    let coverage = coverage_score(total, documented);

    let generated_words = word_count(generated);
    let reference_words = word_count(reference);
    let ratio = length_ratio(generated_words, reference_words);
    let contribution = length_contribution(ratio);

    let markers = Markers::scan(generated);
    let consistency = markers.score();

    let overall_score = score::overall(keyword_overlap_score, coverage, contribution, consistency);

    EvaluationResult {
        keyword_overlap_score,
        coverage_score: coverage,
        length_ratio: ratio,
        consistency_score: consistency,
        overall_score,
        detailed_analysis: DetailedAnalysis {
            keyword_overlap: KeywordAnalysis {
                generated_keywords,
                reference_keywords,
                shared_keywords,
                union_size,
                interpretation: interpret_keyword_overlap(keyword_overlap_score).to_string(),
            },
            coverage: CoverageAnalysis {
                total_functions: total,
                documented_functions: documented.min(total),
                basis,
                interpretation: interpret_coverage(coverage).to_string(),
            },
            length: LengthAnalysis {
                generated_words,
                reference_words,
                contribution,
                interpretation: interpret_length_ratio(ratio).to_string(),
            },
            consistency: ConsistencyAnalysis {
                has_param_markers: markers.param,
                has_return_markers: markers.returns,
                has_example_markers: markers.example,
                penalty: markers.penalty(),
                interpretation: interpret_consistency(consistency).to_string(),
            },
        },
    }
}

fn interpret_keyword_overlap(score: f64) -> &'static str {
    match score {
        s if s >= 80.0 => "Excellent - high semantic similarity",
        s if s >= 60.0 => "Good - adequate coverage of key concepts",
        s if s >= 40.0 => "Moderate - some important concepts missing",
        _ => "Low - significant semantic differences",
    }
}

fn interpret_coverage(score: f64) -> &'static str {
    match score {
        s if s >= 100.0 => "Complete - all elements documented",
        s if s >= 80.0 => "High - most elements documented",
        s if s >= 60.0 => "Moderate - some elements missing documentation",
        _ => "Low - many elements undocumented",
    }
}

fn interpret_length_ratio(ratio: f64) -> &'static str {
    if is_balanced(ratio) {
        "Balanced - similar verbosity to the reference"
    } else if ratio > BALANCED_RATIO.1 {
        "Verbose - generated documentation is more detailed"
    } else {
        "Concise - generated documentation is briefer"
    }
}

fn interpret_consistency(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "Highly consistent - uniform style throughout",
        s if s >= 70.0 => "Generally consistent - minor variations",
        s if s >= 50.0 => "Moderately consistent - some inconsistencies",
        _ => "Inconsistent - significant style variations",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, FunctionRecord};

    fn one_function() -> CodeStructure {
        CodeStructure::valid(
            vec![FunctionRecord {
                name: "lookup".to_string(),
                parameters: vec!["key".to_string()],
                return_type_text: None,
                leading_doc_comment: None,
                line_start: 1,
                line_end: 1,
                body_text: "function lookup(key) {}".to_string(),
                is_async: false,
                is_exported: false,
            }],
            vec![],
            None,
            1,
        )
    }

    #[test]
    fn test_identical_texts() {
        let result = evaluate("fast lookup cache hit", "fast lookup cache hit", &one_function());
        assert_eq!(result.keyword_overlap_score, 100.0);
        assert_eq!(result.length_ratio, 1.0);
        assert_eq!(result.coverage_score, 100.0);
        assert_eq!(
            result.detailed_analysis.coverage.basis,
            CoverageBasis::AssumedComplete
        );
        // "hit" is too short to be a keyword
        assert_eq!(result.detailed_analysis.keyword_overlap.union_size, 3);
    }

    #[test]
    fn test_consistency_without_example() {
        let result = evaluate("@param a first\n@returns sum", "", &one_function());
        assert_eq!(result.consistency_score, 90.0);
        assert!(!result.detailed_analysis.consistency.has_example_markers);
        assert_eq!(result.detailed_analysis.consistency.penalty, 10);
    }

    #[test]
    fn test_empty_inputs_are_zero_safe() {
        let structure = analyze("");
        let result = evaluate("", "", &structure);
        assert_eq!(result.keyword_overlap_score, 0.0);
        assert_eq!(result.length_ratio, 1.0);
        assert_eq!(result.coverage_score, 100.0);
        assert_eq!(result.consistency_score, 60.0);
        assert!((0.0..=100.0).contains(&result.overall_score));
        // 0 + 30 + 15 + 12
        assert_eq!(result.overall_score, 57.0);
    }

    #[test]
    fn test_vacuous_coverage_for_any_text() {
        let structure = analyze("const x = 1;\n");
        for generated in ["", "anything at all", "@param x"] {
            assert_eq!(evaluate(generated, "ref", &structure).coverage_score, 100.0);
        }
    }

    #[test]
    fn test_evaluate_payloads_counts_entries() {
        let structure = analyze("function first() {}\nfunction second() {}\n");
        let payloads = vec![
            DocumentationPayload::new("first", "Does the first thing."),
            DocumentationPayload::new("second", ""),
        ];
        let result = evaluate_payloads(&payloads, "Does the first thing.", &structure);
        assert_eq!(result.coverage_score, 50.0);
        assert_eq!(result.detailed_analysis.coverage.documented_functions, 1);
        assert_eq!(
            result.detailed_analysis.coverage.basis,
            CoverageBasis::PayloadEntries
        );
    }

    #[test]
    fn test_evaluate_payloads_repeated_method_names() {
        let structure = analyze(
            "class A {\n  run(x) {}\n}\nclass B {\n  run(first, second, third) {}\n}\n",
        );
        let payloads = vec![
            DocumentationPayload::new("run", "Runs A."),
            DocumentationPayload::new("run", ""),
        ];
        let result = evaluate_payloads(&payloads, "Runs A.", &structure);
        assert_eq!(result.coverage_score, 50.0);
        assert_eq!(result.detailed_analysis.coverage.documented_functions, 1);
    }

    #[test]
    fn test_evaluate_payloads_missing_entries() {
        let structure = analyze("function first() {}\nfunction second() {}\n");
        let payloads = vec![DocumentationPayload::new("first", "Does the first thing.")];
        let result = evaluate_payloads(&payloads, "", &structure);
        assert_eq!(result.coverage_score, 50.0);
    }

    #[test]
    fn test_interpretations() {
        assert!(interpret_keyword_overlap(80.0).starts_with("Excellent"));
        assert!(interpret_keyword_overlap(39.9).starts_with("Low"));
        assert!(interpret_coverage(100.0).starts_with("Complete"));
        assert!(interpret_coverage(60.0).starts_with("Moderate"));
        assert!(interpret_length_ratio(1.21).starts_with("Verbose"));
        assert!(interpret_length_ratio(0.79).starts_with("Concise"));
        assert!(interpret_consistency(90.0).starts_with("Highly"));
        assert!(interpret_consistency(49.0).starts_with("Inconsistent"));
    }

    #[test]
    fn test_result_json_shape() {
        let result = evaluate("a", "b", &one_function());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("keywordOverlapScore").is_some());
        assert!(json["detailedAnalysis"]["coverage"]["basis"] == "assumedComplete");
    }
}
