//! UI components.

/// Force-directed knowledge graph canvas.
pub mod force_graph;
