//! knowledge-graph-canvas: interactive force-directed knowledge graph view.
//!
//! This crate provides a WASM-based graph visualization component that lays
//! out CMS entities and relationships with a force simulation, renders them
//! to a canvas, and reports hovered and clicked nodes to the host page.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

/// UI components.
pub mod components;

pub use components::force_graph::{
	Category, Entity, GraphData, KnowledgeGraphCanvas, Relationship, Simulation, SimulationParams,
	Viewport,
};

/// Id of the `<script type="application/json">` element holding graph data.
pub const GRAPH_DATA_ELEMENT: &str = "graph-data";
/// Id of the optional element holding [`SimulationParams`] overrides.
pub const GRAPH_CONFIG_ELEMENT: &str = "graph-config";

/// Failure to read an embedded JSON payload from the page.
#[derive(Debug, Error)]
pub enum LoadError {
	/// Not running in a browser page.
	#[error("no browser window or document")]
	NoDocument,
	/// No element with the given id.
	#[error("element #{0} not found")]
	MissingElement(String),
	/// The element exists but is not a `<script>`.
	#[error("element #{0} is not a <script>")]
	NotAScript(String),
	/// The script text could not be read.
	#[error("could not read the text of #{0}")]
	Unreadable(String),
	/// The script text is not valid JSON for the expected type.
	#[error("invalid JSON in #{id}: {source}")]
	Parse {
		/// Element id.
		id: String,
		/// Underlying parse error.
		#[source]
		source: serde_json::Error,
	},
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("knowledge-graph: logging initialized");
}

fn read_script_text(id: &str) -> Result<String, LoadError> {
	let window: Window = web_sys::window().ok_or(LoadError::NoDocument)?;
	let document = window.document().ok_or(LoadError::NoDocument)?;
	let element = document
		.get_element_by_id(id)
		.ok_or_else(|| LoadError::MissingElement(id.to_string()))?;
	let script: HtmlScriptElement = element
		.dyn_into()
		.map_err(|_| LoadError::NotAScript(id.to_string()))?;
	script
		.text()
		.map_err(|_| LoadError::Unreadable(id.to_string()))
}

/// Parses the JSON payload of element `id`.
pub fn parse_payload<T: DeserializeOwned>(id: &str, json: &str) -> Result<T, LoadError> {
	serde_json::from_str(json).map_err(|source| LoadError::Parse {
		id: id.to_string(),
		source,
	})
}

/// Load graph data from the script element with id="graph-data".
/// Expected format: JSON with { entities: [...], relationships: [...] }
pub fn load_graph_data() -> Result<GraphData, LoadError> {
	let data: GraphData = parse_payload(GRAPH_DATA_ELEMENT, &read_script_text(GRAPH_DATA_ELEMENT)?)?;
	info!(
		"knowledge-graph: loaded {} entities, {} relationships",
		data.entities.len(),
		data.relationships.len()
	);
	Ok(data)
}

/// Load simulation overrides from id="graph-config". A page without the
/// element gets the defaults.
pub fn load_simulation_params() -> Result<SimulationParams, LoadError> {
	match read_script_text(GRAPH_CONFIG_ELEMENT) {
		Ok(json) => parse_payload(GRAPH_CONFIG_ELEMENT, &json),
		Err(LoadError::MissingElement(_)) => Ok(SimulationParams::default()),
		Err(e) => Err(e),
	}
}

/// Main application component.
/// Loads graph data and config from the DOM and renders the visualization.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(|e| {
		warn!("knowledge-graph: {}", e);
		GraphData::default()
	});
	let params = load_simulation_params().unwrap_or_else(|e| {
		warn!("knowledge-graph: {}, using default layout parameters", e);
		SimulationParams::default()
	});
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Knowledge Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="graph-page">
			<div class="graph-overlay">
				<h1>"Knowledge Graph"</h1>
				<p class="subtitle">"Hover a node for details. Click it to open the entity."</p>
			</div>
			<KnowledgeGraphCanvas data=graph_signal params=params />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_payload_reports_element_and_cause() {
		let err = parse_payload::<GraphData>(GRAPH_DATA_ELEMENT, "{ not json").unwrap_err();
		match &err {
			LoadError::Parse { id, .. } => assert_eq!(id, GRAPH_DATA_ELEMENT),
			other => panic!("unexpected error: {other:?}"),
		}
		assert!(err.to_string().starts_with("invalid JSON in #graph-data:"));
	}

	#[test]
	fn parse_payload_reads_params() {
		let params: SimulationParams =
			parse_payload(GRAPH_CONFIG_ELEMENT, r#"{ "damping": 0.8, "seed": 42 }"#).unwrap();
		assert_eq!(params.damping, 0.8);
		assert_eq!(params.seed, Some(42));
		assert_eq!(params.margin, 50.0);
	}
}
