use std::{fmt, io::Write, str::FromStr};

use anyhow::Result;
use log::debug;
use pydepscan_core::ScanError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::types::ScanResults;

/// Output format for the dependency lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// `# dependencies` / `# optional_dependencies` sections, one name per line
    #[default]
    Flat,
    /// Object with `dependencies` and `optional_dependencies` arrays
    Json,
}

impl FromStr for Format {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FLAT" => Ok(Format::Flat),
            "JSON" => Ok(Format::Json),
            _ => Err(ScanError::invalid_argument(format!(
                "Invalid format: '{}'. Valid formats: FLAT, JSON",
                s
            ))),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Flat => write!(f, "FLAT"),
            Format::Json => write!(f, "JSON"),
        }
    }
}

#[derive(Serialize)]
struct DependencyReport<'a> {
    dependencies: Vec<&'a str>,
    optional_dependencies: Vec<&'a str>,
}

/// Formats already sorted dependency lists.
pub fn format_dependencies<S: AsRef<str>>(
    dependencies: &[S],
    optional_dependencies: &[S],
    format: Format,
) -> Result<String> {
    let dependencies: Vec<&str> = dependencies.iter().map(AsRef::as_ref).collect();
    let optional_dependencies: Vec<&str> =
        optional_dependencies.iter().map(AsRef::as_ref).collect();

    match format {
        Format::Flat => {
            let mut lines = vec!["# dependencies"];
            lines.extend(dependencies);
            lines.push("");
            lines.push("# optional_dependencies");
            lines.extend(optional_dependencies);
            Ok(lines.join("\n"))
        }
        Format::Json => {
            let report = DependencyReport { dependencies, optional_dependencies };
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            report.serialize(&mut ser)?;
            Ok(String::from_utf8(buf)?)
        }
    }
}

/// Writes the scan results to `writer` followed by a newline.
pub fn print_dependencies<W: Write>(
    writer: &mut W,
    results: &ScanResults,
    format: Format,
) -> Result<()> {
    debug!(
        "Printing {} dependencies and {} optional dependencies as {}",
        results.dependencies.len(),
        results.optional_dependencies.len(),
        format
    );
    let out = format_dependencies(&results.dependencies, &results.optional_dependencies, format)?;
    writeln!(writer, "{}", out)?;
    writer.flush()?;
    Ok(())
}
