//! modscope - module dependency-graph analyzer
//!
//! This crate reads module declaration documents, builds the directed
//! dependency graph between modules, detects circular dependencies,
//! computes summary metrics, and renders the result as text, JSON,
//! Mermaid or Graphviz DOT.

pub mod analysis;
pub mod export;
pub mod graph;
pub mod logger;
pub mod parser;
