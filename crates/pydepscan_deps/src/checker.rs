use anyhow::{Context, Result};
use log::{debug, info};
use pydepscan_core::DependencyScanner;

use crate::{config::Config, types::ScanResults};

pub fn run_dependency_scan(cfg: &Config) -> Result<ScanResults> {
    info!("Starting dependency scan of {} paths", cfg.modules.len());

    let options = cfg.scan_options();
    debug!(
        "Scan options: ignore_stdlib={}, pattern={:?}, level={}",
        options.ignore_stdlib, options.pattern, options.level
    );

    let mut scanner = DependencyScanner::new(options);
    for module in &cfg.modules {
        scanner
            .scan_path(module)
            .with_context(|| format!("Failed to scan {}", module.display()))?;
    }

    let modules_scanned = scanner.modules_scanned();
    let (dependencies, optional_dependencies) = scanner.into_results().sorted();
    info!(
        "Dependency scan complete. Found {} dependencies and {} optional dependencies in {} modules",
        dependencies.len(),
        optional_dependencies.len(),
        modules_scanned
    );

    Ok(ScanResults { dependencies, optional_dependencies, modules_scanned })
}
