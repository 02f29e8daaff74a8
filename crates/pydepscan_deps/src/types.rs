/// Normalized, sorted output of a dependency scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResults {
    pub dependencies: Vec<String>,
    pub optional_dependencies: Vec<String>,
    pub modules_scanned: usize,
}
