use clap::Parser;
use log::debug;
use pydepscan_core::{DEFAULT_PATTERN, ScanOptions};
use std::path::PathBuf;

use crate::reporter::Format;

// Flattened into the binary's command line, so no command-level attributes here.
#[derive(Debug, Clone, Parser)]
pub struct Config {
    /// Format used to dump dependencies: FLAT or JSON
    #[arg(short = 'f', long = "format", default_value = "FLAT", value_name = "FORMAT")]
    pub format: Format,

    /// Scan directories and analyse files matching the specified pattern
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Ignore directories (including the ones provided in the input list)
    #[arg(long)]
    pub no_recursive: bool,

    /// Keep modules of the Python standard library in the output
    #[arg(long)]
    pub include_stdlib: bool,

    /// Number of dotted segments kept beyond the root package name
    #[arg(short = 'l', long, default_value = "0")]
    pub level: usize,

    /// Skip files excluded by .gitignore/.ignore while scanning directories
    #[arg(long)]
    pub respect_gitignore: bool,

    /// Path to the Python module or package to be analyzed
    #[arg(value_name = "MODULE", required = true)]
    pub modules: Vec<PathBuf>,
}

impl Config {
    /// Options for the core scanner derived from the command line flags.
    pub fn scan_options(&self) -> ScanOptions {
        let pattern = if self.no_recursive {
            debug!("Directories will be skipped (--no-recursive)");
            None
        } else {
            Some(self.pattern.clone())
        };
        ScanOptions {
            ignore_stdlib: !self.include_stdlib,
            pattern,
            level: self.level,
            respect_gitignore: self.respect_gitignore,
        }
    }
}
