//! Command-line interface for docgauge.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::analysis::{AnalysisContext, AnalyzedUnit, CodeStructure, Dialect};
use crate::config::{self, Config, SynthMode};
use crate::evaluation::{self, compare_sections};
use crate::render;
use crate::report::{self, EvaluationReport};
use crate::synth::{self, DocumentationPayload, Synthesizer};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INVALID: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Structural analysis and documentation quality scoring for JavaScript and
/// TypeScript.
///
/// docgauge extracts the functions and classes of a source unit, synthesizes
/// JSDoc documentation for them, and scores documentation against a
/// reference for keyword overlap, coverage, length balance and consistency.
#[derive(Parser)]
#[command(name = "docgauge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the extracted structure of source files
    Analyze(AnalyzeArgs),
    /// Synthesize and render documentation
    Generate(GenerateArgs),
    /// Score documentation against a reference
    Evaluate(EvaluateArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Files or directories to analyze
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the generate command.
#[derive(Parser)]
pub struct GenerateArgs {
    /// File or directory to document
    pub path: PathBuf,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the remote synthesizer regardless of config
    #[arg(long)]
    pub remote: bool,

    /// Append a module overview listing functions and classes
    #[arg(long)]
    pub overview: bool,

    /// Append each source file annotated with suggested inline comments
    #[arg(long)]
    pub inline: bool,
}

/// Arguments for the evaluate command.
#[derive(Parser)]
pub struct EvaluateArgs {
    /// File or directory whose documentation is evaluated
    pub path: PathBuf,

    /// Reference documentation (default: the generated text itself)
    #[arg(short, long)]
    pub reference: Option<PathBuf>,

    /// Previously generated documentation (default: synthesize now)
    #[arg(short, long)]
    pub generated: Option<PathBuf>,

    /// Output format: pretty, json, or markdown
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Use the remote synthesizer regardless of config
    #[arg(long)]
    pub remote: bool,
}

/// Load and validate configuration, printing any error.
fn load_config(explicit: Option<&Path>) -> Option<Config> {
    let (config, path) = match config::load(explicit) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return None;
        }
    };

    if let Err(e) = config::validate(&config) {
        eprintln!("Error: invalid config: {}", e);
        return None;
    }

    match path {
        Some(p) => info!(path = %p.display(), "using config"),
        None => debug!("using default config"),
    }
    Some(config)
}

/// True for files whose extension maps to a dialect.
fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Dialect::from_extension)
        .is_some()
}

/// Collect source files under `root`, sorted by path.
fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            // Skip hidden directories and installed packages
            !(name.starts_with('.') || name == "node_modules")
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_source_file(entry.path()) {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if config.is_path_excluded(rel) {
            debug!(path = %rel.display(), "excluded by config");
            continue;
        }
        files.push(entry.path().to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Expand a file or directory argument into source files.
fn resolve_path(path: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let abs_path = path
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("cannot access path {:?}: {}", path, e))?;

    if fs::metadata(&abs_path)?.is_dir() {
        collect_files(&abs_path, config)
    } else {
        Ok(vec![abs_path])
    }
}

/// Analyze every file under `paths`. Returns `None` after printing an error.
fn analyze_paths(paths: &[PathBuf], config: &Config) -> Option<Vec<AnalyzedUnit>> {
    let mut files = Vec::new();
    for path in paths {
        match resolve_path(path, config) {
            Ok(found) => files.extend(found),
            Err(e) => {
                eprintln!("Error: {}", e);
                return None;
            }
        }
    }
    files.sort();
    files.dedup();

    let base_dir = std::env::current_dir()
        .and_then(|d| d.canonicalize())
        .unwrap_or_else(|_| PathBuf::from("."));
    let ctx = AnalysisContext::new(base_dir, config.dialect);
    let units = ctx.analyze_files_parallel(&files);
    info!(files = units.len(), "analysis complete");
    Some(units)
}

/// Combine the valid units into one structure. A single unit is kept as is.
fn pool_structures(units: &[AnalyzedUnit]) -> CodeStructure {
    let valid: Vec<&AnalyzedUnit> = units.iter().filter(|u| u.structure.is_valid).collect();
    if let [only] = valid.as_slice() {
        return only.structure.clone();
    }

    let mut functions = Vec::new();
    let mut classes = Vec::new();
    let mut total = 0;
    for unit in valid {
        functions.extend(unit.structure.functions.iter().cloned());
        classes.extend(unit.structure.classes.iter().cloned());
        total += unit.structure.total_line_count;
    }
    CodeStructure::valid(functions, classes, None, total)
}

fn report_invalid(units: &[AnalyzedUnit]) -> bool {
    let mut any = false;
    for unit in units.iter().filter(|u| !u.structure.is_valid) {
        any = true;
        warn!(
            path = %unit.path,
            error = unit.structure.error_message.as_deref().unwrap_or(""),
            "skipping unparseable file"
        );
    }
    any
}

fn progress_bar(len: usize) -> ProgressBar {
    if len <= 1 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░  "),
    );
    bar
}

/// Synthesize payloads for every valid unit on one runtime.
///
/// Returns one list per valid unit, in unit order, each following that unit's
/// documentable functions.
fn synthesize_units(
    synth: &dyn Synthesizer,
    units: &[AnalyzedUnit],
    concurrency: usize,
) -> anyhow::Result<Vec<Vec<DocumentationPayload>>> {
    let valid: Vec<&AnalyzedUnit> = units.iter().filter(|u| u.structure.is_valid).collect();
    let runtime = tokio::runtime::Runtime::new()?;
    let bar = progress_bar(valid.len());

    let mut per_unit = Vec::with_capacity(valid.len());
    for unit in valid {
        bar.set_message(unit.path.clone());
        let records: Vec<_> = unit.structure.documentable_functions().collect();
        per_unit.push(runtime.block_on(synth::synthesize_all(synth, &records, concurrency)));
        bar.inc(1);
    }
    bar.finish_and_clear();

    let total: usize = per_unit.iter().map(Vec::len).sum();
    info!(synthesizer = synth.name(), payloads = total, "synthesis complete");
    Ok(per_unit)
}

/// Flatten per-unit payloads into the order [`pool_structures`] lists
/// documentable functions: every unit's top-level functions, then every
/// unit's methods.
fn pool_payloads(
    units: &[AnalyzedUnit],
    per_unit: &[Vec<DocumentationPayload>],
) -> Vec<DocumentationPayload> {
    let valid = units.iter().filter(|u| u.structure.is_valid);
    let mut functions = Vec::new();
    let mut methods = Vec::new();
    for (unit, payloads) in valid.zip(per_unit) {
        let split = unit.structure.functions.len().min(payloads.len());
        functions.extend_from_slice(&payloads[..split]);
        methods.extend_from_slice(&payloads[split..]);
    }
    functions.extend(methods);
    functions
}

/// Render the generate command's document.
fn compose_document(
    args: &GenerateArgs,
    units: &[AnalyzedUnit],
    per_unit: &[Vec<DocumentationPayload>],
) -> String {
    let structure = pool_structures(units);
    let payloads = pool_payloads(units, per_unit);
    let mut document = render::render_document(&render::render_all(&structure, &payloads));

    if args.overview {
        let title = args.path.to_string_lossy();
        document.push_str(&format!(
            "\n## Module Overview\n\n{}\n",
            render::render_module_overview(&structure, &title)
        ));
    }
    if args.inline {
        let valid = units.iter().filter(|u| u.structure.is_valid);
        for (unit, payloads) in valid.zip(per_unit) {
            let annotated = render::annotate_unit(&unit.structure, &unit.source, payloads);
            document.push_str(&format!(
                "\n## Annotated Source: {}\n\n```\n{}\n```\n",
                unit.path, annotated
            ));
        }
    }
    document
}

fn select_synthesizer(config: &mut Config, force_remote: bool) -> Box<dyn Synthesizer> {
    if force_remote {
        config.synthesizer.mode = SynthMode::Remote;
    }
    synth::from_config(&config.synthesizer)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs, config_path: Option<&Path>) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!("Error: invalid format {:?}, must be 'pretty' or 'json'", args.format);
        return Ok(EXIT_ERROR);
    }

    let Some(config) = load_config(config_path) else {
        return Ok(EXIT_ERROR);
    };
    let Some(units) = analyze_paths(&args.paths, &config) else {
        return Ok(EXIT_ERROR);
    };
    if units.is_empty() {
        eprintln!("Warning: no files to analyze");
        return Ok(EXIT_SUCCESS);
    }

    match args.format.as_str() {
        "json" => report::write_structure_json(&units)?,
        _ => report::write_structure_pretty(&units),
    }

    if units.iter().any(|u| !u.structure.is_valid) {
        Ok(EXIT_INVALID)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the generate command.
pub fn run_generate(args: &GenerateArgs, config_path: Option<&Path>) -> anyhow::Result<i32> {
    let Some(mut config) = load_config(config_path) else {
        return Ok(EXIT_ERROR);
    };
    let Some(units) = analyze_paths(std::slice::from_ref(&args.path), &config) else {
        return Ok(EXIT_ERROR);
    };
    if units.is_empty() {
        eprintln!("Warning: no files to document");
        return Ok(EXIT_SUCCESS);
    }
    let invalid = report_invalid(&units);

    let synth = select_synthesizer(&mut config, args.remote);
    let per_unit = synthesize_units(synth.as_ref(), &units, config.synthesizer.concurrency)?;
    let document = compose_document(args, &units, &per_unit);

    match &args.output {
        Some(out) => {
            if let Err(e) = fs::write(out, &document) {
                eprintln!("Error: failed to write {}: {}", out.display(), e);
                return Ok(EXIT_ERROR);
            }
            info!(path = %out.display(), "wrote documentation");
        }
        None => println!("{}", document),
    }

    Ok(if invalid { EXIT_INVALID } else { EXIT_SUCCESS })
}

/// Run the evaluate command.
pub fn run_evaluate(args: &EvaluateArgs, config_path: Option<&Path>) -> anyhow::Result<i32> {
    if !matches!(args.format.as_str(), "pretty" | "json" | "markdown") {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty', 'json', or 'markdown'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let Some(mut config) = load_config(config_path) else {
        return Ok(EXIT_ERROR);
    };
    let Some(units) = analyze_paths(std::slice::from_ref(&args.path), &config) else {
        return Ok(EXIT_ERROR);
    };
    let invalid = report_invalid(&units);
    let structure = pool_structures(&units);

    let (generated, payloads) = match &args.generated {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => (text, None),
            Err(e) => {
                eprintln!("Error: failed to read {}: {}", path.display(), e);
                return Ok(EXIT_ERROR);
            }
        },
        None => {
            let synth = select_synthesizer(&mut config, args.remote);
            let per_unit =
                synthesize_units(synth.as_ref(), &units, config.synthesizer.concurrency)?;
            let payloads = pool_payloads(&units, &per_unit);
            let text = render::render_document(&render::render_all(&structure, &payloads));
            (text, Some(payloads))
        }
    };

    let reference = match &args.reference {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error: failed to read {}: {}", path.display(), e);
                return Ok(EXIT_ERROR);
            }
        },
        None => {
            warn!("no reference given, evaluating against the generated text itself");
            generated.clone()
        }
    };

    let result = match &payloads {
        Some(payloads) => evaluation::evaluate_payloads(payloads, &reference, &structure),
        None => evaluation::evaluate(&generated, &reference, &structure),
    };
    let (comparison, comparison_summary) = compare_sections(&generated, &reference);

    let path_str = args.path.to_string_lossy().to_string();
    let reference_str = args
        .reference
        .as_ref()
        .map(|p| p.to_string_lossy().to_string());
    let report = EvaluationReport {
        version: env!("CARGO_PKG_VERSION"),
        path: &path_str,
        reference: reference_str.as_deref(),
        grade: result.grade(),
        result: &result,
        comparison: &comparison,
        comparison_summary,
    };

    match args.format.as_str() {
        "json" => report::write_evaluation_json(&report)?,
        "markdown" => println!("{}", report::evaluation_markdown(&result, &structure)),
        _ => report::write_evaluation_pretty(&report),
    }

    Ok(if invalid { EXIT_INVALID } else { EXIT_SUCCESS })
}
