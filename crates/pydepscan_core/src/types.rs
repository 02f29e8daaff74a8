use std::collections::HashSet;

use crate::constants::is_stdlib;

/// A single imported target found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOccurrence {
    /// Full dotted path. For from-style imports the imported member is appended
    /// (`from a import c` -> `a.c`), except for wildcard imports.
    pub module: String,
    /// Number of enclosing blocks (branch, handler, loop, function or class body)
    pub depth: usize,
}

impl ImportOccurrence {
    /// Top-level imports are executed unconditionally at module load time.
    pub fn is_global(&self) -> bool {
        self.depth == 0
    }

    /// Returns the dependency name, keeping `level` segments beyond the root.
    ///
    /// `a.b.c` gives `a` at level 0 and `a.b` at level 1.
    pub fn package_name(&self, level: usize) -> String {
        self.module.split('.').take(level + 1).collect::<Vec<_>>().join(".")
    }
}

/// Mandatory and optional dependencies of one or more scanned modules.
///
/// Names are accumulated raw while scanning and reconciled once with
/// [`DependencySet::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    pub dependencies: HashSet<String>,
    pub optional_dependencies: HashSet<String>,
}

impl DependencySet {
    pub fn new(
        dependencies: impl IntoIterator<Item = String>,
        optional_dependencies: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            dependencies: dependencies.into_iter().collect(),
            optional_dependencies: optional_dependencies.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, name: String, mandatory: bool) {
        if mandatory {
            self.dependencies.insert(name);
        } else {
            self.optional_dependencies.insert(name);
        }
    }

    /// Folds another raw set into this one.
    pub fn merge(&mut self, other: DependencySet) {
        self.dependencies.extend(other.dependencies);
        self.optional_dependencies.extend(other.optional_dependencies);
    }

    /// Removes standard library modules from both sets.
    pub fn remove_stdlib(&mut self) {
        self.dependencies.retain(|name| !is_stdlib(name));
        self.optional_dependencies.retain(|name| !is_stdlib(name));
    }

    /// Reconciles the two sets.
    ///
    /// Standard library modules are dropped first (when `ignore_stdlib` is
    /// set), then every mandatory dependency is removed from the optional ones.
    pub fn normalize(&mut self, ignore_stdlib: bool) {
        if ignore_stdlib {
            self.remove_stdlib();
        }
        let dependencies = &self.dependencies;
        self.optional_dependencies.retain(|name| !dependencies.contains(name));
    }

    /// Removes `name` from both sets.
    pub fn discard(&mut self, name: &str) {
        self.dependencies.remove(name);
        self.optional_dependencies.remove(name);
    }

    /// Removes the package `name` and all of its submodules from both sets.
    ///
    /// `mypkg` discards `mypkg` and `mypkg.core` but keeps `mypkg_extra`.
    pub fn discard_package(&mut self, name: &str) {
        let belongs = |dep: &String| {
            dep.strip_prefix(name).is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        };
        self.dependencies.retain(|dep| !belongs(dep));
        self.optional_dependencies.retain(|dep| !belongs(dep));
    }

    pub fn clear(&mut self) {
        self.dependencies.clear();
        self.optional_dependencies.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.optional_dependencies.is_empty()
    }

    /// Returns both sets sorted lexicographically.
    pub fn sorted(&self) -> (Vec<String>, Vec<String>) {
        let mut dependencies: Vec<String> = self.dependencies.iter().cloned().collect();
        let mut optional_dependencies: Vec<String> =
            self.optional_dependencies.iter().cloned().collect();
        dependencies.sort();
        optional_dependencies.sort();
        (dependencies, optional_dependencies)
    }
}
