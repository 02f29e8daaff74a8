//! Dependency scanning for Python projects.
//!
//! This crate lists the packages imported by Python modules, split into
//! mandatory dependencies (imported unconditionally at module level) and
//! optional dependencies (imported inside a branch, a `try` block, a function
//! or a class).
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use pydepscan_deps::{Config, Format, run_dependency_scan};
//! use std::io::BufWriter;
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     format: Format::Json,
//!     pattern: "**/*.py".to_string(),
//!     no_recursive: false,
//!     include_stdlib: false,
//!     level: 0,
//!     respect_gitignore: false,
//!     modules: vec![std::path::PathBuf::from("/path/to/package")],
//! };
//!
//! let result = run_dependency_scan(&cfg)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! pydepscan_deps::print_dependencies(&mut stdout, &result, cfg.format)?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod reporter;
mod types;

// Re-export public API
pub use checker::run_dependency_scan;
pub use config::Config;
pub use reporter::{Format, format_dependencies, print_dependencies};
pub use types::ScanResults;
