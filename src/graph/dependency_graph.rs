//! Module dependency graph built on petgraph.
//!
//! The graph owns the extracted modules in discovery order and one import
//! edge per declared import. Targets that no module declares are kept as
//! unresolved edges so reports can surface them.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::parser::ModuleNode;

/// The kind of relationship an edge represents.
///
/// Only imports are produced today; other kinds (e.g. injection) can be
/// added without changing the graph shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// `imports: [...]` entry
    #[default]
    Import,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Import => write!(f, "import"),
        }
    }
}

/// A directed `from -> to` relationship between two modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    /// The importing module
    pub from: String,
    /// The imported module name as declared
    pub to: String,
    /// Relationship kind
    pub kind: EdgeKind,
    /// Whether `to` names a module present in the graph
    pub resolved: bool,
}

impl DependencyEdge {
    /// Creates a new import edge.
    pub fn import(from: impl Into<String>, to: impl Into<String>, resolved: bool) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: EdgeKind::Import,
            resolved,
        }
    }
}

/// An immutable directed graph of module dependencies.
///
/// Built once from the extracted modules; nothing downstream mutates it.
/// Besides the module list and edge list, a petgraph `DiGraph` indexes every
/// referenced name (including unresolved targets) for neighbour queries.
///
/// # Example
///
/// ```rust
/// use modscope::graph::DependencyGraph;
/// use modscope::parser::ModuleNode;
///
/// let graph = DependencyGraph::build(vec![
///     ModuleNode::new("AppModule", "app.module.ts").with_imports(["UsersModule", "ConfigModule"]),
///     ModuleNode::new("UsersModule", "users.module.ts"),
/// ]);
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.unresolved_targets(), vec!["ConfigModule"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Modules in discovery order
    modules: Vec<ModuleNode>,
    /// Edges in module-then-import order
    edges: Vec<DependencyEdge>,
    /// Names declared by more than one document
    duplicates: Vec<String>,
    /// Maps module names to their position in `modules`
    module_indices: HashMap<String, usize>,
    /// Index over every referenced name
    graph: DiGraph<String, EdgeKind>,
    /// Maps names to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from extracted modules.
    ///
    /// Duplicate names are last-write-wins: the later document replaces the
    /// earlier one in place and the collision is recorded and logged. One
    /// edge is added per import, in module-then-import order, whether or not
    /// the target is a known module.
    pub fn build(nodes: impl IntoIterator<Item = ModuleNode>) -> Self {
        let mut modules: Vec<ModuleNode> = Vec::new();
        let mut module_indices: HashMap<String, usize> = HashMap::new();
        let mut duplicates: Vec<String> = Vec::new();

        for node in nodes {
            match module_indices.get(&node.name) {
                Some(&pos) => {
                    warn!(
                        module = %node.name,
                        previous = %modules[pos].source_path,
                        replacement = %node.source_path,
                        "duplicate module name, keeping the later declaration"
                    );
                    if !duplicates.contains(&node.name) {
                        duplicates.push(node.name.clone());
                    }
                    modules[pos] = node;
                }
                None => {
                    module_indices.insert(node.name.clone(), modules.len());
                    modules.push(node);
                }
            }
        }

        let edge_total = modules.iter().map(ModuleNode::out_degree).sum();
        let mut graph = Self {
            graph: DiGraph::with_capacity(modules.len(), edge_total),
            node_indices: HashMap::with_capacity(modules.len()),
            edges: Vec::with_capacity(edge_total),
            modules: Vec::new(),
            module_indices,
            duplicates,
        };

        for module in &modules {
            graph.intern(&module.name);
        }
        for module in &modules {
            for target in &module.imports {
                let resolved = graph.module_indices.contains_key(target);
                let from = graph.intern(&module.name);
                let to = graph.intern(target);
                graph.graph.add_edge(from, to, EdgeKind::Import);
                graph
                    .edges
                    .push(DependencyEdge::import(&module.name, target, resolved));
            }
        }

        graph.modules = modules;
        graph
    }

    /// Returns the node index for `name`, adding it if needed.
    fn intern(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    /// All modules in discovery order.
    pub fn modules(&self) -> &[ModuleNode] {
        &self.modules
    }

    /// All edges in module-then-import order.
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Module names that more than one document declared.
    pub fn duplicate_names(&self) -> &[String] {
        &self.duplicates
    }

    /// Gets a module by name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modscope::graph::DependencyGraph;
    /// use modscope::parser::ModuleNode;
    ///
    /// let graph = DependencyGraph::build(vec![ModuleNode::new("AuthModule", "auth.module.ts")]);
    /// assert_eq!(graph.get_module("AuthModule").unwrap().source_path, "auth.module.ts");
    /// assert!(graph.get_module("Missing").is_none());
    /// ```
    pub fn get_module(&self, name: &str) -> Option<&ModuleNode> {
        self.module_indices.get(name).map(|&pos| &self.modules[pos])
    }

    /// Checks if a module with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.module_indices.contains_key(name)
    }

    /// Names `name` imports, in declaration order.
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        self.get_module(name)
            .map(|m| m.imports.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Modules that import `name` (incoming edges).
    ///
    /// Works for unresolved targets as well.
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(name) else {
            return Vec::new();
        };

        let mut dependents: Vec<&str> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|edge| self.graph.node_weight(edge.source()))
            .map(String::as_str)
            .collect();
        // petgraph walks edges newest-first
        dependents.reverse();
        dependents.dedup();
        dependents
    }

    /// Number of edges pointing at `name`.
    pub fn in_degree(&self, name: &str) -> usize {
        self.node_indices
            .get(name)
            .map(|&idx| self.graph.edges_directed(idx, Direction::Incoming).count())
            .unwrap_or(0)
    }

    /// Imported names that no module declares, in first-seen order.
    pub fn unresolved_targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        for edge in self.edges.iter().filter(|e| !e.resolved) {
            if !targets.contains(&edge.to.as_str()) {
                targets.push(&edge.to);
            }
        }
        targets
    }

    /// Checks if the graph contains at least one cycle.
    ///
    /// Cheap petgraph check used to skip the full cycle search on acyclic
    /// graphs.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Returns the number of modules in the graph.
    pub fn node_count(&self) -> usize {
        self.modules.len()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Checks if the graph has no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, imports: &[&str]) -> ModuleNode {
        ModuleNode::new(name, format!("{}.module.ts", name.to_lowercase()))
            .with_imports(imports.iter().copied())
    }

    #[test]
    fn test_create_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_build_from_modules() {
        let graph = DependencyGraph::build(vec![
            module("A", &["B", "C"]),
            module("B", &["C"]),
            module("C", &[]),
        ]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.contains("A"));
        assert!(!graph.contains("D"));
    }

    #[test]
    fn test_edges_follow_module_then_import_order() {
        let graph = DependencyGraph::build(vec![module("A", &["C", "B"]), module("B", &["A"])]);

        let pairs: Vec<(&str, &str)> = graph
            .edges()
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "C"), ("A", "B"), ("B", "A")]);
        assert!(graph.edges().iter().all(|e| e.kind == EdgeKind::Import));
    }

    #[test]
    fn test_unresolved_edges_are_kept() {
        let graph = DependencyGraph::build(vec![module("A", &["Z", "B"]), module("B", &["Z"])]);

        assert_eq!(graph.edge_count(), 3);
        assert!(!graph.contains("Z"));
        assert!(!graph.edges()[0].resolved);
        assert!(graph.edges()[1].resolved);
        assert_eq!(graph.unresolved_targets(), vec!["Z"]);
        assert_eq!(graph.dependents_of("Z"), vec!["A", "B"]);
    }

    #[test]
    fn test_get_module() {
        let graph = DependencyGraph::build(vec![module("UsersModule", &["AuthModule"])]);

        let node = graph.get_module("UsersModule").unwrap();
        assert_eq!(node.source_path, "usersmodule.module.ts");
        assert_eq!(graph.dependencies_of("UsersModule"), vec!["AuthModule"]);
        assert!(graph.dependencies_of("Missing").is_empty());
    }

    #[test]
    fn test_dependents_and_in_degree() {
        let graph = DependencyGraph::build(vec![
            module("A", &["C"]),
            module("B", &["C"]),
            module("C", &[]),
        ]);

        assert_eq!(graph.dependents_of("C"), vec!["A", "B"]);
        assert_eq!(graph.in_degree("C"), 2);
        assert_eq!(graph.in_degree("A"), 0);
        assert!(graph.dependents_of("Missing").is_empty());
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let graph = DependencyGraph::build(vec![
            ModuleNode::new("A", "first.ts").with_imports(["B"]),
            module("B", &[]),
            ModuleNode::new("A", "second.ts").with_imports(["C"]),
        ]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.modules()[0].source_path, "second.ts");
        assert_eq!(graph.dependencies_of("A"), vec!["C"]);
        assert_eq!(graph.duplicate_names(), &["A".to_string()]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_has_cycles() {
        let acyclic = DependencyGraph::build(vec![module("A", &["B"]), module("B", &["C"])]);
        assert!(!acyclic.has_cycles());

        let cyclic = DependencyGraph::build(vec![module("A", &["B"]), module("B", &["A"])]);
        assert!(cyclic.has_cycles());
    }

    #[test]
    fn test_build_is_deterministic() {
        let input = vec![module("A", &["B", "Z"]), module("B", &["A"]), module("C", &[])];
        let first = DependencyGraph::build(input.clone());
        let second = DependencyGraph::build(input);
        assert_eq!(first.edges(), second.edges());
        assert_eq!(first.modules(), second.modules());
    }

    #[test]
    fn test_edge_kind_display() {
        assert_eq!(format!("{}", EdgeKind::Import), "import");
        assert_eq!(EdgeKind::default(), EdgeKind::Import);
    }
}
