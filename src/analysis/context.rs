//! Analysis context for analyzing files on disk.
//!
//! Every file is analyzed independently; the context only resolves paths,
//! picks a dialect per file and caches structures so a file is parsed once
//! per run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::Context;
use tracing::{debug, warn};

use super::dialect::analyzer_for;
use super::{CodeStructure, Dialect, DialectChoice};

/// One analyzed file.
#[derive(Debug, Clone)]
pub struct AnalyzedUnit {
    /// Path relative to the context's base directory.
    pub path: String,
    pub dialect: Dialect,
    /// The decoded source text.
    pub source: String,
    pub structure: CodeStructure,
}

/// Analysis context for a set of files.
pub struct AnalysisContext {
    /// Base directory for relative path resolution.
    base_dir: PathBuf,
    /// How to pick a dialect for each file.
    dialect_choice: DialectChoice,
    /// Cached results, keyed by absolute path.
    cache: RwLock<HashMap<PathBuf, AnalyzedUnit>>,
}

impl AnalysisContext {
    /// Create a new analysis context.
    pub fn new<P: AsRef<Path>>(base_dir: P, dialect_choice: DialectChoice) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            dialect_choice,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Get the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Analyze a file and cache the result.
    ///
    /// Fails only when the file cannot be read; unparseable content yields an
    /// invalid structure.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<AnalyzedUnit> {
        let abs_path = self.absolute(path.as_ref());

        {
            let cache = self.cache.read().unwrap();
            if let Some(unit) = cache.get(&abs_path) {
                return Ok(unit.clone());
            }
        }

        let bytes = fs::read(&abs_path)
            .with_context(|| format!("failed to read {}", abs_path.display()))?;
        let source = String::from_utf8_lossy(&bytes).into_owned();
        let dialect = self.dialect_choice.resolve(&abs_path);
        let structure = analyzer_for(dialect).analyze(&source);

        let rel_path = abs_path
            .strip_prefix(&self.base_dir)
            .unwrap_or(&abs_path)
            .to_string_lossy()
            .to_string();

        debug!(path = %rel_path, %dialect, valid = structure.is_valid, "analyzed file");

        let unit = AnalyzedUnit {
            path: rel_path,
            dialect,
            source,
            structure,
        };

        {
            let mut cache = self.cache.write().unwrap();
            cache.insert(abs_path, unit.clone());
        }

        Ok(unit)
    }

    /// Analyze multiple files in parallel.
    ///
    /// Uses rayon; unreadable files are logged and skipped. Results are
    /// sorted by path.
    pub fn analyze_files_parallel(&self, paths: &[PathBuf]) -> Vec<AnalyzedUnit> {
        use rayon::prelude::*;

        let results: Vec<_> = paths.par_iter().map(|p| self.analyze_file(p)).collect();

        let mut units = Vec::new();
        for result in results {
            match result {
                Ok(unit) => units.push(unit),
                Err(e) => warn!("failed to analyze file: {:#}", e),
            }
        }

        // Sort by path for deterministic ordering
        units.sort_by(|a, b| a.path.cmp(&b.path));
        units
    }

    /// Get a cached result. Returns None if the file hasn't been analyzed yet.
    pub fn cached<P: AsRef<Path>>(&self, path: P) -> Option<AnalyzedUnit> {
        let abs_path = self.absolute(path.as_ref());
        let cache = self.cache.read().unwrap();
        cache.get(&abs_path).cloned()
    }
}
