use dashmap::DashMap;
use log::{debug, info, trace};
use path_clean::clean;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::{
    collector::{CollectorConfig, collect_modules},
    constants::DEFAULT_PATTERN,
    error::{Result, ScanError},
    parser::imports_for,
    types::{DependencySet, ImportOccurrence},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Drop modules of the Python standard library from the results
    pub ignore_stdlib: bool,
    /// Glob used to expand directories; `None` skips directories entirely
    pub pattern: Option<String>,
    /// Dotted segments kept beyond the root package name
    pub level: usize,
    /// Skip files excluded by `.gitignore` / `.ignore` while expanding directories
    pub respect_gitignore: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignore_stdlib: true,
            pattern: Some(DEFAULT_PATTERN.to_string()),
            level: 0,
            respect_gitignore: false,
        }
    }
}

/// Accumulates the dependencies of every module scanned through it.
///
/// Scanning only records raw mandatory/optional names. The sets are
/// reconciled once all targets have been scanned, either explicitly with
/// [`DependencyScanner::normalize`] or by [`DependencyScanner::into_results`].
pub struct DependencyScanner {
    options: ScanOptions,
    data: DependencySet,
    import_cache: DashMap<PathBuf, Vec<ImportOccurrence>>,
}

impl DependencyScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options, data: DependencySet::default(), import_cache: DashMap::new() }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn data(&self) -> &DependencySet {
        &self.data
    }

    /// Number of distinct modules parsed so far.
    pub fn modules_scanned(&self) -> usize {
        self.import_cache.len()
    }

    /// Scans a module or, if `path` is a directory, the package it contains.
    pub fn scan_path(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ScanError::NotFound { path: path.to_path_buf() });
        }
        if path.is_dir() { self.scan_package(path) } else { self.scan_module(path) }
    }

    pub fn scan_module(&mut self, path: &Path) -> Result<()> {
        debug!("scan {} module ...", path.display());
        let imports = imports_for(path, &self.import_cache)?;
        self.data.merge(classify(&imports, self.options.level));
        Ok(())
    }

    /// Scans every module of a package directory matching the pattern, then
    /// discards the package's own name from the results.
    ///
    /// Modules are parsed in parallel and merged in path order.
    pub fn scan_package(&mut self, path: &Path) -> Result<()> {
        let Some(pattern) = self.options.pattern.clone() else {
            debug!("Skipping directory {} (no pattern)", path.display());
            return Ok(());
        };

        debug!("scan {} directory ...", path.display());
        let modules = collect_modules(&CollectorConfig {
            root: path.to_path_buf(),
            pattern,
            respect_gitignore: self.options.respect_gitignore,
        })?;
        info!("Found {} modules in {}", modules.len(), path.display());

        let import_cache = &self.import_cache;
        let level = self.options.level;
        let partials: Vec<Result<DependencySet>> = modules
            .par_iter()
            .map(|module| {
                trace!("scan {} module ...", module.display());
                imports_for(module, import_cache).map(|imports| classify(&imports, level))
            })
            .collect();

        // Report the first failure in path order and leave the data untouched
        let partials = partials.into_iter().collect::<Result<Vec<_>>>()?;
        for partial in partials {
            self.data.merge(partial);
        }

        let package = clean(path);
        if let Some(name) = package.file_name().and_then(|n| n.to_str()) {
            debug!("Discarding self references to package '{}'", name);
            self.data.discard_package(name);
        }
        Ok(())
    }

    /// Reconciles the accumulated sets according to the scan options.
    pub fn normalize(&mut self) {
        self.data.normalize(self.options.ignore_stdlib);
    }

    /// Resets the accumulated dependencies and the parse cache.
    pub fn clear(&mut self) {
        self.data.clear();
        self.import_cache.clear();
    }

    pub fn into_results(mut self) -> DependencySet {
        self.normalize();
        self.data
    }
}

/// Raw dependencies of a single module.
fn classify(imports: &[ImportOccurrence], level: usize) -> DependencySet {
    let mut data = DependencySet::default();
    for import in imports {
        let name = import.package_name(level);
        trace!(
            "Classified '{}' as {}",
            name,
            if import.is_global() { "mandatory" } else { "optional" }
        );
        data.insert(name, import.is_global());
    }
    data
}

/// Scans modules and packages for dependencies.
///
/// Targets are processed in order and the results are normalized once, after
/// the last target.
pub fn scan<P: AsRef<Path>>(paths: &[P], options: &ScanOptions) -> Result<DependencySet> {
    let mut scanner = DependencyScanner::new(options.clone());
    for path in paths {
        scanner.scan_path(path.as_ref())?;
    }
    debug!("Scanned {} modules", scanner.modules_scanned());
    Ok(scanner.into_results())
}
