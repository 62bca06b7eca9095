//! Circular dependency detection.
//!
//! A depth-first search is started from every module, carrying the current
//! path. Reaching a node already on the path closes a cycle; that branch is
//! not explored further. Because every member of a cycle finds it again,
//! detections are deduplicated by their sorted member set and the first
//! discovered path is kept as the representative.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

use super::DependencyGraph;

/// How serious a cycle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Self-import or direct mutual dependency
    Error,
    /// Indirect cycle through three or more modules
    Warning,
}

impl Severity {
    /// Severity for a cycle with `len` distinct members.
    pub fn for_length(len: usize) -> Self {
        if len <= 2 {
            Self::Error
        } else {
            Self::Warning
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A closed chain of imports, e.g. `[A, B, C, A]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    /// Module names along the cycle; the last entry repeats the first
    #[serde(rename = "cycle")]
    pub path: Vec<String>,
    /// Error for length <= 2, warning otherwise
    pub severity: Severity,
}

impl Cycle {
    /// Creates a cycle from a closed path, deriving its severity.
    pub fn new(path: Vec<String>) -> Self {
        let len = path.len().saturating_sub(1);
        Self {
            path,
            severity: Severity::for_length(len),
        }
    }

    /// Distinct modules on the cycle, in path order.
    pub fn members(&self) -> &[String] {
        match self.path.split_last() {
            Some((_, rest)) if !rest.is_empty() => rest,
            _ => &self.path,
        }
    }

    /// Number of distinct modules on the cycle.
    pub fn len(&self) -> usize {
        self.members().len()
    }

    /// Returns true if the cycle has no members (should not happen).
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns true if `name` is on the cycle.
    pub fn contains(&self, name: &str) -> bool {
        self.path.iter().any(|n| n == name)
    }

    /// Formatted path, e.g. `"A -> B -> A"`.
    pub fn cycle_path(&self) -> String {
        self.path.join(" -> ")
    }

    /// Identity of the cycle: its members, sorted.
    fn key(&self) -> BTreeSet<&str> {
        self.members().iter().map(String::as_str).collect()
    }
}

/// Finds all distinct cycles in the graph.
///
/// # Example
///
/// ```rust
/// use modscope::graph::{detect_cycles, DependencyGraph, Severity};
/// use modscope::parser::ModuleNode;
///
/// let graph = DependencyGraph::build(vec![
///     ModuleNode::new("A", "a.ts").with_imports(["B"]),
///     ModuleNode::new("B", "b.ts").with_imports(["C"]),
///     ModuleNode::new("C", "c.ts").with_imports(["A"]),
/// ]);
///
/// let cycles = detect_cycles(&graph);
/// assert_eq!(cycles.len(), 1);
/// assert_eq!(cycles[0].cycle_path(), "A -> B -> C -> A");
/// assert_eq!(cycles[0].severity, Severity::Warning);
/// ```
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    if !graph.has_cycles() {
        return Vec::new();
    }

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in graph.edges() {
        adjacency.entry(&edge.from).or_default().push(&edge.to);
    }

    let mut found: Vec<Cycle> = Vec::new();
    for module in graph.modules() {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut path: Vec<&str> = vec![module.name.as_str()];
        visit(&module.name, &adjacency, &mut path, &mut visited, &mut found);
    }

    let raw = found.len();
    let mut seen: HashSet<BTreeSet<&str>> = HashSet::new();
    let mut unique_positions = Vec::new();
    for (pos, cycle) in found.iter().enumerate() {
        if seen.insert(cycle.key()) {
            unique_positions.push(pos);
        }
    }
    let cycles: Vec<Cycle> = unique_positions
        .into_iter()
        .map(|pos| found[pos].clone())
        .collect();

    debug!(raw, distinct = cycles.len(), "cycle detection finished");
    cycles
}

fn visit<'g>(
    node: &'g str,
    adjacency: &HashMap<&'g str, Vec<&'g str>>,
    path: &mut Vec<&'g str>,
    visited: &mut HashSet<&'g str>,
    found: &mut Vec<Cycle>,
) {
    visited.insert(node);

    let Some(targets) = adjacency.get(node) else {
        return;
    };

    for &next in targets {
        if let Some(start) = path.iter().position(|&n| n == next) {
            let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
            cycle.push(next.to_string());
            found.push(Cycle::new(cycle));
            continue;
        }

        if !visited.contains(next) {
            path.push(next);
            visit(next, adjacency, path, visited, found);
            path.pop();
        }
    }
}

/// Names of every module that participates in at least one cycle.
pub fn nodes_in_cycles(cycles: &[Cycle]) -> HashSet<&str> {
    cycles
        .iter()
        .flat_map(|c| c.members().iter().map(String::as_str))
        .collect()
}
