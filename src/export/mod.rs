//! Report rendering for analysis results.
//!
//! This module provides renderers for outputting an [`AnalysisReport`] in
//! various formats: plain text, JSON, Mermaid diagrams and Graphviz DOT.

pub mod dot;
pub mod json;
pub mod mermaid;
pub mod text;

use crate::analysis::AnalysisReport;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use thiserror::Error;

/// Errors that can occur while rendering a report.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The caller asked for a format that does not exist.
    #[error("Unsupported report format: '{0}'. Valid formats: text, json, mermaid, dot")]
    UnsupportedFormat(String),

    /// Writing the rendered output failed.
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON format - machine-readable, lossless
    Json,
    /// Mermaid flowchart
    Mermaid,
    /// Graphviz digraph
    Dot,
}

impl std::str::FromStr for ReportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "mermaid" => Ok(ReportFormat::Mermaid),
            "dot" => Ok(ReportFormat::Dot),
            _ => Err(RenderError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Mermaid => write!(f, "mermaid"),
            ReportFormat::Dot => write!(f, "dot"),
        }
    }
}

/// Trait for renderers.
pub trait Renderer {
    /// Render the report to the given writer.
    fn render<W: Write>(&self, report: &AnalysisReport, writer: &mut W) -> io::Result<()>;
}

/// Render the report in the specified format.
pub fn render<W: Write>(
    format: ReportFormat,
    report: &AnalysisReport,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => text::TextRenderer.render(report, writer),
        ReportFormat::Json => json::JsonRenderer.render(report, writer),
        ReportFormat::Mermaid => mermaid::MermaidRenderer.render(report, writer),
        ReportFormat::Dot => dot::DotRenderer.render(report, writer),
    }
}

/// Render the report to a string.
pub fn render_to_string(format: ReportFormat, report: &AnalysisReport) -> io::Result<String> {
    let mut buffer = Vec::new();
    render(format, report, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Render the report in a format named by the caller.
///
/// Fails with [`RenderError::UnsupportedFormat`] for unknown names.
pub fn render_named(format: &str, report: &AnalysisReport) -> RenderResult<String> {
    let format: ReportFormat = format.parse()?;
    Ok(render_to_string(format, report)?)
}

/// Turns a module name into a diagram identifier: every character outside
/// `[A-Za-z0-9]` becomes `_`.
pub fn sanitize_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Per-render mapping from module names to diagram identifiers.
///
/// Modules are assigned first, in graph order, then unresolved targets.
/// Every identifier is `prefix` followed by [`sanitize_id`]; names that
/// sanitize to an identifier already taken get `_2`, `_3`, ... appended.
#[derive(Debug, Default)]
pub(crate) struct DiagramIds {
    ids: HashMap<String, String>,
}

impl DiagramIds {
    pub(crate) fn assign(report: &AnalysisReport, prefix: &str) -> Self {
        let graph = &report.graph;
        let mut ids = HashMap::new();
        let mut taken: HashSet<String> = HashSet::new();

        let names = graph
            .modules()
            .iter()
            .map(|m| m.name.as_str())
            .chain(graph.unresolved_targets());

        for name in names {
            if ids.contains_key(name) {
                continue;
            }
            let base = format!("{}{}", prefix, sanitize_id(name));
            let mut id = base.clone();
            let mut n = 2;
            while taken.contains(&id) {
                id = format!("{}_{}", base, n);
                n += 1;
            }
            taken.insert(id.clone());
            ids.insert(name.to_string(), id);
        }

        Self { ids }
    }

    /// Identifier for `name`; every module and unresolved target has one.
    pub(crate) fn get<'a>(&'a self, name: &'a str) -> &'a str {
        self.ids.get(name).map(String::as_str).unwrap_or(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::parser::ModuleSource;

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!(
            "mermaid".parse::<ReportFormat>().unwrap(),
            ReportFormat::Mermaid
        );
        assert_eq!("dot".parse::<ReportFormat>().unwrap(), ReportFormat::Dot);
        assert!("csv".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_unsupported_format_names_the_format() {
        let err = "yaml".parse::<ReportFormat>().unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat(ref f) if f == "yaml"));
        assert!(err.to_string().contains("'yaml'"));
    }

    #[test]
    fn test_render_named() {
        let report = analyze(&[]);
        assert!(render_named("json", &report).is_ok());
        assert!(render_named("svg", &report).is_err());
    }

    #[test]
    fn test_report_format_display() {
        assert_eq!(format!("{}", ReportFormat::Text), "text");
        assert_eq!(format!("{}", ReportFormat::Json), "json");
        assert_eq!(format!("{}", ReportFormat::Mermaid), "mermaid");
        assert_eq!(format!("{}", ReportFormat::Dot), "dot");
    }

    #[test]
    fn test_sanitize_id() {
        assert_eq!(sanitize_id("UsersModule"), "UsersModule");
        assert_eq!(sanitize_id("@scope/pkg-name"), "_scope_pkg_name");
        assert_eq!(sanitize_id("a.b c"), "a_b_c");
    }

    #[test]
    fn test_diagram_ids_are_unique() {
        let report = analyze(&[
            ModuleSource::new("src/node.module.ts", "@Module({ imports: [feature_flags] })"),
            ModuleSource::new("src/feature-flags.module.ts", "@Module({})"),
        ]);
        let ids = DiagramIds::assign(&report, "m_");

        assert_eq!(ids.get("node"), "m_node");
        assert_eq!(ids.get("feature-flags"), "m_feature_flags");
        assert_eq!(ids.get("feature_flags"), "m_feature_flags_2");
    }
}
