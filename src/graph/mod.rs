//! Graph module for module dependency modeling.
//!
//! This module provides the [`DependencyGraph`] built from extracted
//! modules, the cycle detector and the metrics calculator that both read it.
//!
//! # Example
//!
//! ```rust
//! use modscope::graph::{compute_metrics, detect_cycles, DependencyGraph};
//! use modscope::parser::ModuleNode;
//!
//! let graph = DependencyGraph::build(vec![
//!     ModuleNode::new("A", "a.module.ts").with_imports(["B"]),
//!     ModuleNode::new("B", "b.module.ts").with_imports(["A"]),
//! ]);
//!
//! assert_eq!(detect_cycles(&graph).len(), 1);
//! assert_eq!(compute_metrics(&graph).total_edges, 2);
//! ```

mod cycles;
mod dependency_graph;
mod metrics;

pub use cycles::{detect_cycles, nodes_in_cycles, Cycle, Severity};
pub use dependency_graph::{DependencyEdge, DependencyGraph, EdgeKind};
pub use metrics::{compute_metrics, GraphMetrics, MaxDependencies};
