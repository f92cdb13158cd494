//! Force-directed knowledge graph visualization.
//!
//! Renders entities and relationships as an interactive force-directed graph
//! on an HTML canvas:
//! - An adapter turning CMS records into simulation nodes and edges
//! - A deterministic, steppable force simulation
//! - Frame rendering through a [`Surface`] trait, with pointer hit-testing
//! - Viewport tracking with device pixel ratio support
//!
//! # Example
//!
//! ```ignore
//! use knowledge_graph_canvas::{Category, Entity, GraphData, KnowledgeGraphCanvas, Relationship};
//!
//! let data = GraphData {
//!     entities: vec![
//!         Entity::new("a", "Ada Lovelace", Category::Person),
//!         Entity::new("b", "Analytical Engine", Category::Product),
//!     ],
//!     relationships: vec![Relationship::new("a", "b", "created")],
//!     focus_entity: None,
//! };
//!
//! view! { <KnowledgeGraphCanvas data=data /> }
//! ```
//!
//! Headless use, e.g. for precomputing a layout:
//!
//! ```ignore
//! let input = build_simulation_input(&entities, &relationships, &viewport, &mut rng);
//! let mut sim = Simulation::new(input, viewport, SimulationParams::default());
//! sim.step(500);
//! ```

mod adapter;
mod canvas;
mod component;
mod render;
mod simulation;
/// Colors and node styling.
pub mod theme;
mod types;
mod viewport;

pub use adapter::{SimulationInput, build_simulation_input, canonical_id};
pub use component::KnowledgeGraphCanvas;
pub use render::{
	CircleStyle, DrawCommand, FrameStats, RecordingSurface, Surface, hit_test, node_radius,
	render_frame, tooltip_position,
};
pub use simulation::{SimEdge, SimNode, Simulation, SimulationParams, repulsion, spring};
pub use theme::Theme;
pub use types::{Category, DEFAULT_STRENGTH, DEFAULT_WEIGHT, Entity, GraphData, Relationship};
pub use viewport::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Viewport, ViewportManager};
