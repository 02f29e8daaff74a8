use globset::GlobBuilder;
use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::PathBuf;

use crate::error::{Result, ScanError};

pub struct CollectorConfig {
    pub root: PathBuf,
    /// Glob matched against paths relative to `root`, e.g. `**/*.py`
    pub pattern: String,
    /// Skip files excluded by `.gitignore` / `.ignore` files
    pub respect_gitignore: bool,
}

/// Expands a directory into the files matching the configured pattern.
///
/// Hidden files are included, like `pathlib.Path.glob`. Files are returned
/// sorted by path so repeated scans visit modules in the same order.
pub fn collect_modules(cfg: &CollectorConfig) -> Result<Vec<PathBuf>> {
    debug!("Collecting modules matching '{}'", cfg.pattern);
    let matcher = GlobBuilder::new(&cfg.pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| ScanError::Pattern { pattern: cfg.pattern.clone(), source })?
        .compile_matcher();

    let root = &cfg.root;
    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .ignore(cfg.respect_gitignore)
        .git_ignore(cfg.respect_gitignore)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files: Vec<PathBuf> = Vec::new();
    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !p.is_file() {
            continue;
        }

        let Ok(rel_path) = p.strip_prefix(root) else {
            continue;
        };
        if matcher.is_match(rel_path) {
            trace!("Matched module with pattern '{}': {}", cfg.pattern, rel_path.display());
            files.push(p.to_path_buf());
        } else {
            trace!("Skipping file not matching pattern: {}", rel_path.display());
        }
    }
    debug!("Collected {} modules", files.len());
    Ok(files)
}
