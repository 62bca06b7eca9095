//! Graphviz DOT export.
//!
//! Identifiers are always quoted so module names such as `node`, `graph` or
//! `2fa` are never read as keywords or numerals.

use super::{DiagramIds, Renderer};
use crate::analysis::AnalysisReport;
use crate::graph::nodes_in_cycles;
use std::io::{self, Write};

/// DOT renderer implementation.
pub struct DotRenderer;

impl DotRenderer {
    /// Escapes a label for use inside a quoted DOT string.
    fn escape_label(label: &str) -> String {
        label.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

impl Renderer for DotRenderer {
    fn render<W: Write>(&self, report: &AnalysisReport, writer: &mut W) -> io::Result<()> {
        let graph = &report.graph;
        let in_cycle = nodes_in_cycles(&report.cycles);
        let ids = DiagramIds::assign(report, "");

        writeln!(writer, "digraph modules {{")?;
        writeln!(writer, "  rankdir=LR;")?;
        writeln!(writer, "  node [shape=box, fontname=\"monospace\"];")?;
        writeln!(writer)?;

        for module in graph.modules() {
            let id = ids.get(&module.name);
            let label = Self::escape_label(&module.name);
            if in_cycle.contains(module.name.as_str()) {
                writeln!(
                    writer,
                    "  \"{}\" [label=\"{}\", color=red, style=filled, fillcolor=\"#ffe0e0\"];",
                    id, label
                )?;
            } else {
                writeln!(writer, "  \"{}\" [label=\"{}\"];", id, label)?;
            }
        }
        for name in graph.unresolved_targets() {
            writeln!(
                writer,
                "  \"{}\" [label=\"{}\", style=dashed, color=gray];",
                ids.get(name),
                Self::escape_label(name)
            )?;
        }

        writeln!(writer)?;

        for edge in graph.edges() {
            let from = ids.get(&edge.from);
            let to = ids.get(&edge.to);
            if edge.resolved {
                writeln!(writer, "  \"{}\" -> \"{}\";", from, to)?;
            } else {
                writeln!(writer, "  \"{}\" -> \"{}\" [style=dashed, color=gray];", from, to)?;
            }
        }

        writeln!(writer, "}}")
    }
}
