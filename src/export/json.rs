//! JSON export implementation.
//!
//! The canonical, lossless output: every module, every edge, every cycle,
//! the names declared more than once and the metrics, serialized as-is.

use super::Renderer;
use crate::analysis::AnalysisReport;
use crate::graph::{Cycle, DependencyEdge, GraphMetrics};
use crate::parser::ModuleNode;
use serde::Serialize;
use std::io::{self, Write};

/// JSON renderer implementation.
pub struct JsonRenderer;

/// Root JSON export structure.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    modules: &'a [ModuleNode],
    edges: &'a [DependencyEdge],
    circular_dependencies: &'a [Cycle],
    duplicate_names: &'a [String],
    metrics: &'a GraphMetrics,
}

impl Renderer for JsonRenderer {
    fn render<W: Write>(&self, report: &AnalysisReport, writer: &mut W) -> io::Result<()> {
        let export = JsonReport {
            modules: report.graph.modules(),
            edges: report.graph.edges(),
            circular_dependencies: &report.cycles,
            duplicate_names: report.graph.duplicate_names(),
            metrics: &report.metrics,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
