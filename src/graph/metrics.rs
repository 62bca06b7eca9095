//! Summary statistics over a dependency graph.

use serde::Serialize;

use super::DependencyGraph;

/// The module with the highest out-degree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaxDependencies {
    /// Module name, empty for an empty graph
    pub module: String,
    /// Its number of imports
    pub count: usize,
}

/// Aggregate numbers for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub total_modules: usize,
    pub total_edges: usize,
    /// Mean imports per module, rounded to 2 decimals
    pub avg_dependencies: f64,
    pub max_dependencies: MaxDependencies,
    /// Modules that import nothing and that nothing imports
    pub orphan_modules: Vec<String>,
}

/// Computes metrics for `graph`. An empty graph yields zeroed metrics.
///
/// # Example
///
/// ```rust
/// use modscope::graph::{compute_metrics, DependencyGraph};
/// use modscope::parser::ModuleNode;
///
/// let graph = DependencyGraph::build(vec![
///     ModuleNode::new("A", "a.ts").with_imports(["B", "C"]),
///     ModuleNode::new("B", "b.ts"),
///     ModuleNode::new("D", "d.ts"),
/// ]);
///
/// let metrics = compute_metrics(&graph);
/// assert_eq!(metrics.total_edges, 2);
/// assert_eq!(metrics.avg_dependencies, 0.67);
/// assert_eq!(metrics.max_dependencies.module, "A");
/// assert_eq!(metrics.orphan_modules, vec!["D"]);
/// ```
pub fn compute_metrics(graph: &DependencyGraph) -> GraphMetrics {
    let total_modules = graph.node_count();
    let total_edges = graph.edge_count();

    let avg_dependencies = if total_modules == 0 {
        0.0
    } else {
        let sum: usize = graph.modules().iter().map(|m| m.out_degree()).sum();
        round2(sum as f64 / total_modules as f64)
    };

    let mut max_dependencies = MaxDependencies::default();
    for module in graph.modules() {
        // Strictly greater: ties keep the first module seen.
        if max_dependencies.module.is_empty() || module.out_degree() > max_dependencies.count {
            max_dependencies = MaxDependencies {
                module: module.name.clone(),
                count: module.out_degree(),
            };
        }
    }

    let orphan_modules = graph
        .modules()
        .iter()
        .filter(|m| m.out_degree() == 0 && graph.in_degree(&m.name) == 0)
        .map(|m| m.name.clone())
        .collect();

    GraphMetrics {
        total_modules,
        total_edges,
        avg_dependencies,
        max_dependencies,
        orphan_modules,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ModuleNode;

    fn module(name: &str, imports: &[&str]) -> ModuleNode {
        ModuleNode::new(name, format!("{}.ts", name)).with_imports(imports.iter().copied())
    }

    #[test]
    fn test_empty_graph_metrics() {
        let metrics = compute_metrics(&DependencyGraph::new());
        assert_eq!(metrics.total_modules, 0);
        assert_eq!(metrics.total_edges, 0);
        assert_eq!(metrics.avg_dependencies, 0.0);
        assert_eq!(
            metrics.max_dependencies,
            MaxDependencies {
                module: String::new(),
                count: 0
            }
        );
        assert!(metrics.orphan_modules.is_empty());
    }

    #[test]
    fn test_orphans_exclude_imported_leaves() {
        let graph = DependencyGraph::build(vec![
            module("A", &["E"]),
            module("D", &[]),
            module("E", &[]),
        ]);
        let metrics = compute_metrics(&graph);

        assert_eq!(metrics.orphan_modules, vec!["D"]);
    }

    #[test]
    fn test_max_dependencies_ties_keep_first() {
        let graph = DependencyGraph::build(vec![
            module("A", &["X", "Y"]),
            module("B", &["X", "Z"]),
            module("C", &["X"]),
        ]);
        let metrics = compute_metrics(&graph);

        assert_eq!(metrics.max_dependencies.module, "A");
        assert_eq!(metrics.max_dependencies.count, 2);
    }

    #[test]
    fn test_all_modules_without_imports() {
        let graph = DependencyGraph::build(vec![module("A", &[]), module("B", &[])]);
        let metrics = compute_metrics(&graph);

        assert_eq!(metrics.max_dependencies.module, "A");
        assert_eq!(metrics.max_dependencies.count, 0);
        assert_eq!(metrics.orphan_modules, vec!["A", "B"]);
    }

    #[test]
    fn test_average_counts_unresolved_imports() {
        let graph = DependencyGraph::build(vec![module("A", &["Z", "Y", "X"]), module("B", &[])]);
        let metrics = compute_metrics(&graph);

        assert_eq!(metrics.total_edges, 3);
        assert_eq!(metrics.avg_dependencies, 1.5);
    }

    #[test]
    fn test_metrics_are_idempotent() {
        let graph = DependencyGraph::build(vec![
            module("A", &["B"]),
            module("B", &["A"]),
            module("C", &[]),
        ]);
        assert_eq!(compute_metrics(&graph), compute_metrics(&graph));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(1.005_1), 1.01);
    }
}
