//! Mermaid flowchart export.
//!
//! One node per module, one arrow per edge. Modules on a cycle get a
//! highlight `style` line; unresolved targets are drawn with a dotted arrow
//! and the `unresolved` class. Node ids carry an `m_` prefix so names like
//! `end` or `2fa` stay valid.

use super::{DiagramIds, Renderer};
use crate::analysis::AnalysisReport;
use crate::graph::nodes_in_cycles;
use std::io::{self, Write};

const ID_PREFIX: &str = "m_";
const CYCLE_STYLE: &str = "fill:#ffe0e0,stroke:#d00,stroke-width:2px";
const UNRESOLVED_STYLE: &str = "fill:#f4f4f4,stroke:#999,stroke-dasharray: 5 5";

/// Mermaid renderer implementation.
pub struct MermaidRenderer;

impl MermaidRenderer {
    /// Escapes a label for use inside `["..."]`.
    fn escape_label(label: &str) -> String {
        label.replace('"', "#quot;")
    }
}

impl Renderer for MermaidRenderer {
    fn render<W: Write>(&self, report: &AnalysisReport, writer: &mut W) -> io::Result<()> {
        let graph = &report.graph;
        let in_cycle = nodes_in_cycles(&report.cycles);
        let unresolved = graph.unresolved_targets();
        let ids = DiagramIds::assign(report, ID_PREFIX);

        writeln!(writer, "graph TD")?;

        for module in graph.modules() {
            writeln!(
                writer,
                "    {}[\"{}\"]",
                ids.get(&module.name),
                Self::escape_label(&module.name)
            )?;
        }
        for name in &unresolved {
            writeln!(writer, "    {}[\"{}\"]", ids.get(name), Self::escape_label(name))?;
        }

        for edge in graph.edges() {
            let arrow = if edge.resolved { "-->" } else { "-.->" };
            writeln!(writer, "    {} {} {}", ids.get(&edge.from), arrow, ids.get(&edge.to))?;
        }

        for module in graph.modules() {
            if in_cycle.contains(module.name.as_str()) {
                writeln!(writer, "    style {} {}", ids.get(&module.name), CYCLE_STYLE)?;
            }
        }
        if !unresolved.is_empty() {
            writeln!(writer, "    classDef unresolved {}", UNRESOLVED_STYLE)?;
            for name in &unresolved {
                writeln!(writer, "    class {} unresolved", ids.get(name))?;
            }
        }

        Ok(())
    }
}
