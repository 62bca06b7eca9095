//! Analysis pipeline for modscope.
//!
//! Wires the stages together: extraction, graph building, then cycle
//! detection and metrics over the finished graph.
//!
//! # Example
//!
//! ```
//! use modscope::analysis::analyze;
//! use modscope::parser::ModuleSource;
//!
//! let report = analyze(&[
//!     ModuleSource::new("a.module.ts", "@Module({ imports: [BModule] }) export class AModule {}"),
//!     ModuleSource::new("b.module.ts", "@Module({ imports: [AModule] }) export class BModule {}"),
//! ]);
//!
//! assert_eq!(report.metrics.total_modules, 2);
//! assert_eq!(report.cycles.len(), 1);
//! ```

pub mod discovery;

pub use discovery::{discover_modules, DiscoveryError, DiscoveryResult, DEFAULT_MODULE_SUFFIX};

use tracing::info;

use crate::graph::{compute_metrics, detect_cycles, Cycle, DependencyGraph, GraphMetrics, Severity};
use crate::parser::{DecoratorExtractor, ModuleExtractor, ModuleSource};

/// The completed result of one analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub graph: DependencyGraph,
    pub cycles: Vec<Cycle>,
    pub metrics: GraphMetrics,
}

impl AnalysisReport {
    /// Returns true if no module documents contributed a node.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Returns true if any cycle has error severity.
    pub fn has_error_cycles(&self) -> bool {
        self.cycles.iter().any(|c| c.severity == Severity::Error)
    }
}

/// Analyzes module documents with the default extractor.
pub fn analyze(sources: &[ModuleSource]) -> AnalysisReport {
    analyze_with(&DecoratorExtractor, sources)
}

/// Analyzes module documents with a caller-supplied extractor.
///
/// Never fails: documents without a module declaration are skipped and an
/// empty input produces an empty report.
pub fn analyze_with<E: ModuleExtractor>(extractor: &E, sources: &[ModuleSource]) -> AnalysisReport {
    let nodes: Vec<_> = sources.iter().filter_map(|s| extractor.extract(s)).collect();

    if nodes.is_empty() {
        info!(documents = sources.len(), "no modules discovered");
        return AnalysisReport::default();
    }

    let graph = DependencyGraph::build(nodes);
    let cycles = detect_cycles(&graph);
    let metrics = compute_metrics(&graph);

    info!(
        modules = metrics.total_modules,
        edges = metrics.total_edges,
        cycles = cycles.len(),
        "analysis complete"
    );

    AnalysisReport {
        graph,
        cycles,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ModuleNode;

    fn source(name: &str, imports: &[&str]) -> ModuleSource {
        ModuleSource::new(
            format!("src/{}.module.ts", name.to_lowercase()),
            format!(
                "@Module({{ imports: [{}] }})\nexport class {} {{}}",
                imports.join(", "),
                name
            ),
        )
    }

    #[test]
    fn test_empty_input() {
        let report = analyze(&[]);
        assert!(report.is_empty());
        assert_eq!(report.metrics.total_modules, 0);
        assert_eq!(report.metrics.total_edges, 0);
        assert_eq!(report.metrics.avg_dependencies, 0.0);
        assert_eq!(report.metrics.max_dependencies.module, "");
        assert!(report.cycles.is_empty());
    }

    #[test]
    fn test_non_module_documents_are_skipped() {
        let report = analyze(&[
            ModuleSource::new("src/app.service.ts", "export class AppService {}"),
            source("AppModule", &[]),
        ]);
        assert_eq!(report.metrics.total_modules, 1);
    }

    #[test]
    fn test_mutual_dependency_scenario() {
        let report = analyze(&[source("A", &["B"]), source("B", &["A"])]);

        assert_eq!(report.metrics.total_edges, 2);
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].len(), 2);
        assert!(report.has_error_cycles());
    }

    #[test]
    fn test_indirect_cycle_scenario() {
        let report = analyze(&[source("A", &["B"]), source("B", &["C"]), source("C", &["A"])]);

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].severity, Severity::Warning);
        assert!(!report.has_error_cycles());
    }

    #[test]
    fn test_orphan_scenario() {
        let report = analyze(&[source("A", &["E"]), source("D", &[]), source("E", &[])]);
        assert_eq!(report.metrics.orphan_modules, vec!["D"]);
    }

    #[test]
    fn test_unknown_import_scenario() {
        let report = analyze(&[source("A", &["Z"])]);

        assert_eq!(report.graph.edge_count(), 1);
        assert_eq!(report.graph.edges()[0].to, "Z");
        assert!(!report.graph.contains("Z"));
    }

    #[test]
    fn test_self_import_never_becomes_edge() {
        let report = analyze(&[source("A", &["A", "B"])]);
        assert!(report.graph.edges().iter().all(|e| e.from != e.to));
        assert!(report.cycles.is_empty());
    }

    struct FixedExtractor;

    impl ModuleExtractor for FixedExtractor {
        fn extract(&self, source: &ModuleSource) -> Option<ModuleNode> {
            Some(ModuleNode::new(source.text.clone(), source.path.clone()))
        }
    }

    #[test]
    fn test_custom_extractor() {
        let report = analyze_with(
            &FixedExtractor,
            &[ModuleSource::new("x", "One"), ModuleSource::new("y", "Two")],
        );
        assert_eq!(report.metrics.orphan_modules, vec!["One", "Two"]);
    }
}
