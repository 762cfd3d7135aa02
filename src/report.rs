//! Output formatting for docgauge results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - Markdown: a standalone evaluation report document

use colored::*;
use serde::Serialize;

use crate::analysis::{count_lines, AnalyzedUnit, CodeStructure, Dialect, FunctionRecord};
use crate::evaluation::{ComparisonSummary, EvaluationResult, SectionComparison, BALANCED_RATIO};
use crate::score::Grade;

const TOOL_NAME: &str = "docgauge";

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report for the analyze command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureReport<'a> {
    pub version: &'static str,
    pub files_analyzed: usize,
    pub invalid_files: usize,
    pub files: Vec<FileStructure<'a>>,
}

/// One file's structure.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStructure<'a> {
    pub path: &'a str,
    pub dialect: Dialect,
    pub structure: &'a CodeStructure,
}

/// JSON report for the evaluate command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport<'a> {
    pub version: &'static str,
    pub path: &'a str,
    /// Reference file, or `None` for a self-referential run.
    pub reference: Option<&'a str>,
    pub grade: Grade,
    pub result: &'a EvaluationResult,
    pub comparison: &'a [SectionComparison],
    pub comparison_summary: ComparisonSummary,
}

impl<'a> StructureReport<'a> {
    pub fn new(units: &'a [AnalyzedUnit]) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            files_analyzed: units.len(),
            invalid_files: units.iter().filter(|u| !u.structure.is_valid).count(),
            files: units
                .iter()
                .map(|u| FileStructure {
                    path: &u.path,
                    dialect: u.dialect,
                    structure: &u.structure,
                })
                .collect(),
        }
    }
}

/// Write analysis results in JSON format.
pub fn write_structure_json(units: &[AnalyzedUnit]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&StructureReport::new(units))?;
    println!("{}", json);
    Ok(())
}

/// Write an evaluation in JSON format.
pub fn write_evaluation_json(report: &EvaluationReport<'_>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Markdown Format
// =============================================================================

/// Render the evaluation as a markdown report document.
pub fn evaluation_markdown(result: &EvaluationResult, structure: &CodeStructure) -> String {
    let detail = &result.detailed_analysis;
    let grade = result.grade();
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Documentation Evaluation Report".to_string());
    lines.push(String::new());
    lines.push("## Overall Score".to_string());
    lines.push(format!("**{:.1}/100**", result.overall_score));
    lines.push(String::new());
    lines.push(format!("**{}** - {}", grade, grade.summary()));
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    lines.push("## Individual Metrics".to_string());
    lines.push(String::new());

    lines.push("### 1. Keyword Overlap Score".to_string());
    lines.push(format!("**Score:** {:.1}%", result.keyword_overlap_score));
    lines.push(format!("**Assessment:** {}", detail.keyword_overlap.interpretation));
    lines.push(String::new());
    lines.push(format!(
        "*Jaccard similarity of keyword sets: {} shared of {}.*",
        detail.keyword_overlap.shared_keywords.len(),
        detail.keyword_overlap.union_size
    ));
    lines.push(String::new());

    lines.push("### 2. Coverage Score".to_string());
    lines.push(format!("**Score:** {:.1}%", result.coverage_score));
    lines.push(format!("**Assessment:** {}", detail.coverage.interpretation));
    lines.push(String::new());
    lines.push(format!(
        "*Documented {} out of {} functions.*",
        detail.coverage.documented_functions, detail.coverage.total_functions
    ));
    lines.push(String::new());

    lines.push("### 3. Length Comparison".to_string());
    lines.push(format!("**Ratio:** {:.2}", result.length_ratio));
    lines.push(format!("**Assessment:** {}", detail.length.interpretation));
    lines.push(String::new());
    lines.push(format!(
        "*Generated words / reference words ({} / {}). Ideal range: {}-{}*",
        detail.length.generated_words, detail.length.reference_words, BALANCED_RATIO.0,
        BALANCED_RATIO.1
    ));
    lines.push(String::new());

    lines.push("### 4. Consistency Score".to_string());
    lines.push(format!("**Score:** {:.1}%", result.consistency_score));
    lines.push(format!("**Assessment:** {}", detail.consistency.interpretation));
    lines.push(String::new());
    lines.push("*Checks for @param, @returns and @example markers.*".to_string());
    lines.push(String::new());

    lines.push("---".to_string());
    lines.push(String::new());

    lines.push("## Code Statistics".to_string());
    lines.push(String::new());
    lines.push(format!("- **Total Lines:** {}", structure.total_line_count));
    lines.push(format!("- **Functions:** {}", structure.functions.len()));
    lines.push(format!("- **Classes:** {}", structure.classes.len()));
    lines.push(format!("- **Documentable Functions:** {}", structure.function_count()));
    lines.push(String::new());

    lines.join("\n")
}

// =============================================================================
// Pretty Format
// =============================================================================

fn write_header() {
    println!();
    print!("  ");
    print!("{}", TOOL_NAME.cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
}

/// Write analysis results in pretty (human-readable) format.
pub fn write_structure_pretty(units: &[AnalyzedUnit]) {
    write_header();

    for unit in units {
        write_unit(unit);
        println!();
    }

    let invalid = units.iter().filter(|u| !u.structure.is_valid).count();
    let functions: usize = units.iter().map(|u| u.structure.function_count()).sum();
    print!("  {}", format!("Files: {}", units.len()).dimmed());
    print!("  {}", format!("Functions: {}", functions).dimmed());
    print!("  ");
    if invalid == 0 {
        print!("{}", "ALL VALID".green());
    } else {
        print!("{}", format!("{} INVALID", invalid).red());
    }
    println!();
    println!();
}

fn write_unit(unit: &AnalyzedUnit) {
    let structure = &unit.structure;
    print!("  {}", unit.path.blue());
    print!("  {}", format!("({})", unit.dialect).dimmed());
    println!();

    if !structure.is_valid {
        print!("    {} ", "ERROR".red());
        println!("{}", structure.error_message.as_deref().unwrap_or("invalid input"));
        return;
    }

    let lines = count_lines(&unit.source);
    println!(
        "    {}",
        format!(
            "{} lines ({} code, {} comment, {} blank)",
            lines.total, lines.code, lines.comment, lines.blank
        )
        .dimmed()
    );
    if let Some(doc) = &structure.module_doc_comment {
        println!("    {} {}", "module:".dimmed(), doc.lines().next().unwrap_or(""));
    }

    for f in &structure.functions {
        print!("    ");
        write_function(f);
    }
    for class in &structure.classes {
        print!("    {} {}", "class".magenta(), class.name.bold());
        println!("{}", format!(":{}-{}", class.line_start, class.line_end).dimmed());
        for m in &class.methods {
            print!("      ");
            write_function(m);
        }
    }
}

fn write_function(f: &FunctionRecord) {
    let marker = if f.has_doc_comment() {
        "✓".green()
    } else {
        "·".dimmed()
    };
    print!("{} ", marker);
    if f.is_exported {
        print!("{}", "export ".dimmed());
    }
    if f.is_async {
        print!("{}", "async ".dimmed());
    }
    print!("{}({})", f.name.bold(), f.parameters.join(", "));
    if let Some(ret) = &f.return_type_text {
        print!(": {}", ret.yellow());
    }
    println!("{}", format!(":{}-{}", f.line_start, f.line_end).dimmed());
}

/// Write an evaluation in pretty format.
pub fn write_evaluation_pretty(report: &EvaluationReport<'_>) {
    let result = report.result;
    let detail = &result.detailed_analysis;

    write_header();

    print!("  {}", "Evaluating: ".dimmed());
    println!("{}", report.path);
    print!("  {}", "Reference:  ".dimmed());
    println!("{}", report.reference.unwrap_or("(self)"));
    println!();

    print!("  Overall: ");
    write_colored_score(result.overall_score);
    print!("/100  Grade: ");
    write_colored_grade(report.grade);
    println!();
    println!("  {}", report.grade.summary().dimmed());
    println!();

    println!("  {}", "Metrics:".bold());
    write_metric("Keyword overlap", result.keyword_overlap_score, &detail.keyword_overlap.interpretation);
    write_metric("Coverage", result.coverage_score, &detail.coverage.interpretation);
    println!(
        "    {:<18} {:>6.2}x  {}",
        "Length ratio",
        result.length_ratio,
        detail.length.interpretation.dimmed()
    );
    write_metric("Consistency", result.consistency_score, &detail.consistency.interpretation);
    println!();

    if !report.comparison.is_empty() {
        write_comparison(report.comparison, &report.comparison_summary);
        println!();
    }
}

fn write_metric(label: &str, value: f64, interpretation: &str) {
    println!("    {:<18} {:>6.1}%  {}", label, value, interpretation.dimmed());
}

fn write_comparison(rows: &[SectionComparison], summary: &ComparisonSummary) {
    println!("  {} ({}):", "Functions".bold(), summary.total_functions);
    for row in rows {
        let tag = match (row.generated.is_some(), row.reference.is_some()) {
            (true, true) => "BOTH ".green(),
            (true, false) => "GEN  ".yellow(),
            (false, true) => "REF  ".blue(),
            (false, false) => "NONE ".red(),
        };
        println!("    {} {}", tag, row.function);
    }
    println!(
        "    {}",
        format!(
            "{} both, {} generated only, {} reference only",
            summary.both_documented, summary.only_generated, summary.only_reference
        )
        .dimmed()
    );
}

fn write_colored_score(s: f64) {
    let text = format!("{:.1}", s);
    match Grade::from_score(s) {
        Grade::Excellent => print!("{}", text.green().bold()),
        Grade::Good => print!("{}", text.green()),
        Grade::Fair => print!("{}", text.yellow()),
        Grade::NeedsImprovement => print!("{}", text.red()),
    }
}

fn write_colored_grade(grade: Grade) {
    let text = grade.as_str();
    match grade {
        Grade::Excellent => print!("{}", text.green().bold()),
        Grade::Good => print!("{}", text.green()),
        Grade::Fair => print!("{}", text.yellow()),
        Grade::NeedsImprovement => print!("{}", text.red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::evaluation::{compare_sections, evaluate};

    #[test]
    fn test_markdown_report_sections() {
        let structure = analyze("function a() {}\nclass B {\n  c() {}\n}\n");
        let result = evaluate("@param x\n@returns y\n@example z", "reference text", &structure);
        let md = evaluation_markdown(&result, &structure);

        assert!(md.starts_with("# Documentation Evaluation Report\n"));
        assert!(md.contains(&format!("**{:.1}/100**", result.overall_score)));
        assert!(md.contains("### 1. Keyword Overlap Score"));
        assert!(md.contains("### 2. Coverage Score"));
        assert!(md.contains("*Documented 2 out of 2 functions.*"));
        assert!(md.contains("### 3. Length Comparison"));
        assert!(md.contains("### 4. Consistency Score\n**Score:** 100.0%"));
        assert!(md.contains("- **Total Lines:** 5"));
        assert!(md.contains("- **Functions:** 1"));
        assert!(md.contains("- **Classes:** 1"));
    }

    #[test]
    fn test_evaluation_report_json() {
        let structure = analyze("function a() {}\n");
        let generated = "## Function: a\n\nDoes a.\n";
        let result = evaluate(generated, generated, &structure);
        let (rows, summary) = compare_sections(generated, generated);
        let report = EvaluationReport {
            version: env!("CARGO_PKG_VERSION"),
            path: "a.ts",
            reference: None,
            grade: result.grade(),
            result: &result,
            comparison: &rows,
            comparison_summary: summary,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["path"], "a.ts");
        assert!(json["reference"].is_null());
        assert_eq!(json["comparisonSummary"]["bothDocumented"], 1);
        assert!(json["result"]["overallScore"].is_number());
        assert!(json["grade"].is_string());
    }

    #[test]
    fn test_structure_report_counts_invalid() {
        let units = vec![
            AnalyzedUnit {
                path: "ok.ts".to_string(),
                dialect: Dialect::TypeScript,
                source: "function f() {}".to_string(),
                structure: analyze("function f() {}"),
            },
            AnalyzedUnit {
                path: "bad.ts".to_string(),
                dialect: Dialect::TypeScript,
                source: "function (".to_string(),
                structure: analyze("function ("),
            },
        ];
        let report = StructureReport::new(&units);
        assert_eq!(report.files_analyzed, 2);
        assert_eq!(report.invalid_files, 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["files"][0]["dialect"], "typescript");
        assert_eq!(json["files"][1]["structure"]["isValid"], false);
    }
}
