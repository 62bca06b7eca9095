//! Shared types for module declaration parsing.
//!
//! This module defines the data structures produced by the extractor and
//! consumed by the graph builder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw module document handed over by the discovery step.
///
/// The analyzer never reads files itself; it works on `(source_path, text)`
/// pairs collected beforehand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource {
    /// Where the document came from (diagnostics only).
    pub path: String,
    /// Full document text.
    pub text: String,
}

impl ModuleSource {
    /// Creates a new module source.
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// One discovered module and the fields declared on it.
///
/// # Example
///
/// ```
/// use modscope::parser::ModuleNode;
///
/// let node = ModuleNode::new("AppModule", "src/app.module.ts")
///     .with_imports(["UsersModule", "AuthModule", "UsersModule"]);
///
/// assert_eq!(node.imports, vec!["UsersModule", "AuthModule"]);
/// assert_eq!(node.out_degree(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleNode {
    /// Unique module name (e.g., "UsersModule").
    pub name: String,

    /// Origin of the document, for diagnostics only.
    pub source_path: String,

    /// Imported module names, in extraction order, without duplicates.
    pub imports: Vec<String>,

    /// Exported symbol names, without duplicates.
    pub exports: Vec<String>,

    /// Service-like symbols declared by the module.
    pub providers: Vec<String>,

    /// Entry-point symbols declared by the module.
    pub controllers: Vec<String>,
}

impl ModuleNode {
    /// Creates a module with no declared fields.
    pub fn new(name: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
            imports: Vec::new(),
            exports: Vec::new(),
            providers: Vec::new(),
            controllers: Vec::new(),
        }
    }

    /// Sets the imports, collapsing duplicates.
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = dedup(imports);
        self
    }

    /// Sets the exports, collapsing duplicates.
    pub fn with_exports<I, S>(mut self, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exports = dedup(exports);
        self
    }

    /// Sets the providers, collapsing duplicates.
    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = dedup(providers);
        self
    }

    /// Sets the controllers, collapsing duplicates.
    pub fn with_controllers<I, S>(mut self, controllers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.controllers = dedup(controllers);
        self
    }

    /// Number of modules this module directly imports.
    pub fn out_degree(&self) -> usize {
        self.imports.len()
    }

    /// Returns true if this module imports `name`.
    pub fn imports_module(&self, name: &str) -> bool {
        self.imports.iter().any(|i| i == name)
    }
}

impl fmt::Display for ModuleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.source_path)
    }
}

/// Collects strings, keeping the first occurrence of each.
pub(crate) fn dedup<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.into();
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_node_new() {
        let node = ModuleNode::new("UsersModule", "src/users/users.module.ts");
        assert_eq!(node.name, "UsersModule");
        assert_eq!(node.source_path, "src/users/users.module.ts");
        assert!(node.imports.is_empty());
        assert_eq!(node.out_degree(), 0);
    }

    #[test]
    fn test_imports_are_case_sensitive_set() {
        let node = ModuleNode::new("A", "a.ts").with_imports(["B", "b", "B", "C"]);
        assert_eq!(node.imports, vec!["B", "b", "C"]);
        assert!(node.imports_module("b"));
        assert!(!node.imports_module("c"));
    }

    #[test]
    fn test_module_node_display() {
        let node = ModuleNode::new("AppModule", "src/app.module.ts");
        assert_eq!(format!("{}", node), "AppModule (src/app.module.ts)");
    }

    #[test]
    fn test_module_node_serializes_camel_case() {
        let node = ModuleNode::new("A", "a.ts").with_providers(["AService"]);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["sourcePath"], "a.ts");
        assert_eq!(value["providers"][0], "AService");
    }
}
