//! Core utilities for pydepscan.
//!
//! This crate provides the dependency classification engine for Python
//! sources, including:
//! - Parsing import statements and classifying them by nesting depth
//! - Reconciling mandatory/optional dependency sets across files
//! - Filtering modules of the Python standard library
//! - Expanding scanned directories into the files matching a glob pattern

mod collector;
mod constants;
mod error;
mod parser;
mod scanner;
mod types;

// Re-export public API
pub use collector::{CollectorConfig, collect_modules};
pub use constants::{DEFAULT_PATTERN, PYTHON_STDLIB, is_stdlib};
pub use error::{Result, ScanError};
pub use parser::{imports_for, imports_in_source};
pub use scanner::{DependencyScanner, ScanOptions, scan};
pub use types::{DependencySet, ImportOccurrence};
