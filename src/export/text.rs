//! Plain-text report for terminals and logs.

use super::Renderer;
use crate::analysis::AnalysisReport;
use crate::graph::Severity;
use std::io::{self, Write};

/// Entries shown per list before truncating.
const LIST_LIMIT: usize = 5;

/// Text renderer implementation.
pub struct TextRenderer;

impl TextRenderer {
    /// Joins up to [`LIST_LIMIT`] items, noting how many were left out.
    fn truncated(items: &[String]) -> String {
        if items.is_empty() {
            return "-".to_string();
        }
        let shown = items
            .iter()
            .take(LIST_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if items.len() > LIST_LIMIT {
            format!("{} ... and {} more", shown, items.len() - LIST_LIMIT)
        } else {
            shown
        }
    }
}

impl Renderer for TextRenderer {
    fn render<W: Write>(&self, report: &AnalysisReport, writer: &mut W) -> io::Result<()> {
        let metrics = &report.metrics;

        writeln!(writer, "Module Dependency Analysis")?;
        writeln!(writer, "==========================")?;
        writeln!(writer)?;

        if report.is_empty() {
            writeln!(writer, "No modules found.")?;
            return Ok(());
        }

        writeln!(writer, "Modules:           {}", metrics.total_modules)?;
        writeln!(writer, "Dependencies:      {}", metrics.total_edges)?;
        writeln!(writer, "Avg dependencies:  {:.2}", metrics.avg_dependencies)?;
        writeln!(
            writer,
            "Most dependencies: {} ({})",
            metrics.max_dependencies.module, metrics.max_dependencies.count
        )?;
        writeln!(writer, "Circular:          {}", report.cycles.len())?;
        writeln!(writer)?;

        writeln!(writer, "Modules")?;
        writeln!(writer, "-------")?;
        for module in report.graph.modules() {
            writeln!(writer, "{}  [{}]", module.name, module.source_path)?;

            let imports: Vec<String> = module
                .imports
                .iter()
                .map(|name| {
                    if report.graph.contains(name) {
                        name.clone()
                    } else {
                        format!("{} (unresolved)", name)
                    }
                })
                .collect();
            writeln!(writer, "  imports:   {}", Self::truncated(&imports))?;
            writeln!(writer, "  providers: {}", Self::truncated(&module.providers))?;
            if !module.controllers.is_empty() {
                writeln!(writer, "  controllers: {}", Self::truncated(&module.controllers))?;
            }
        }
        writeln!(writer)?;

        let duplicates = report.graph.duplicate_names();
        if !duplicates.is_empty() {
            writeln!(writer, "Duplicate module names (last declaration kept)")?;
            writeln!(writer, "----------------------------------------------")?;
            for name in duplicates {
                writeln!(writer, "  {}", name)?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "Circular dependencies")?;
        writeln!(writer, "---------------------")?;
        if report.cycles.is_empty() {
            writeln!(writer, "  ✓ none")?;
        }
        for cycle in &report.cycles {
            let marker = match cycle.severity {
                Severity::Error => "✖ error",
                Severity::Warning => "⚠ warning",
            };
            writeln!(writer, "  {}: {}", marker, cycle.cycle_path())?;
        }

        if !metrics.orphan_modules.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Orphan modules")?;
            writeln!(writer, "--------------")?;
            for name in &metrics.orphan_modules {
                writeln!(writer, "  {}", name)?;
            }
        }

        Ok(())
    }
}
