//! Converts CMS entities and relationships into simulation nodes and edges.
//!
//! Ids are normalized here, at the boundary: the CMS prefixes unpublished
//! documents with `drafts.`, and relationships may point at either variant.
//! After normalization endpoints are looked up by exact id; if that fails a
//! containment match (either id containing the other) is accepted. Edges
//! whose endpoints still do not resolve are dropped.

use std::collections::HashMap;

use rand::Rng;

use super::simulation::{SimEdge, SimNode};
use super::types::{DEFAULT_STRENGTH, DEFAULT_WEIGHT, Entity, Relationship};
use super::viewport::Viewport;

/// Prefix the CMS puts on unpublished document ids.
const DRAFT_PREFIX: &str = "drafts.";

/// Horizontal and vertical extent of the initial position jitter.
const JITTER: (f64, f64) = (400.0, 300.0);

/// Nodes and edges ready for a [`Simulation`](super::simulation::Simulation).
#[derive(Clone, Debug, Default)]
pub struct SimulationInput {
	/// One node per usable entity, in input order.
	pub nodes: Vec<SimNode>,
	/// Edges whose endpoints both resolved.
	pub edges: Vec<SimEdge>,
	/// Relationships left out because an endpoint did not resolve.
	pub dropped_edges: usize,
	/// Entities left out because their id was empty or already taken.
	pub dropped_nodes: usize,
}

/// Strips the draft prefix and surrounding whitespace from a document id.
pub fn canonical_id(id: &str) -> &str {
	let id = id.trim();
	id.strip_prefix(DRAFT_PREFIX).unwrap_or(id)
}

/// First node whose id contains `id` or is contained in it.
pub(crate) fn find_by_containment(nodes: &[SimNode], id: &str) -> Option<usize> {
	if id.is_empty() {
		return None;
	}
	nodes
		.iter()
		.position(|n| !n.id().is_empty() && (n.id().contains(id) || id.contains(n.id())))
}

/// Builds the initial simulation state for a data set.
///
/// Every entity with a usable id yields one node, jittered around the
/// viewport center. Relationships whose endpoints cannot be resolved are
/// silently dropped.
pub fn build_simulation_input<R: Rng>(
	entities: &[Entity],
	relationships: &[Relationship],
	viewport: &Viewport,
	rng: &mut R,
) -> SimulationInput {
	let (cx, cy) = viewport.center();
	let mut nodes = Vec::with_capacity(entities.len());
	let mut index: HashMap<&str, usize> = HashMap::with_capacity(entities.len());
	let mut dropped_nodes = 0;

	for entity in entities {
		let id = canonical_id(&entity.id);
		if id.is_empty() || index.contains_key(id) {
			dropped_nodes += 1;
			continue;
		}
		let weight = entity
			.weight
			.filter(|w| w.is_finite())
			.unwrap_or(DEFAULT_WEIGHT);
		let x = cx + rng.gen_range(-0.5..0.5) * JITTER.0;
		let y = cy + rng.gen_range(-0.5..0.5) * JITTER.1;

		index.insert(id, nodes.len());
		nodes.push(
			SimNode::new(id, entity.name.clone(), entity.category, weight, x, y)
				.with_external_ref(entity.external_ref.clone()),
		);
	}

	let resolve = |raw: &str| -> Option<usize> {
		let id = canonical_id(raw);
		if id.is_empty() {
			return None;
		}
		index
			.get(id)
			.copied()
			.or_else(|| find_by_containment(&nodes, id))
	};

	let mut edges = Vec::with_capacity(relationships.len());
	let mut dropped_edges = 0;
	for rel in relationships {
		match (resolve(&rel.source_id), resolve(&rel.target_id)) {
			(Some(source), Some(target)) => {
				let strength = rel
					.strength
					.filter(|s| s.is_finite())
					.unwrap_or(DEFAULT_STRENGTH);
				edges.push(SimEdge::new(source, target, rel.kind.clone(), strength));
			}
			_ => dropped_edges += 1,
		}
	}

	if dropped_nodes > 0 || dropped_edges > 0 {
		log::debug!(
			"knowledge-graph: dropped {} entities and {} relationships that did not resolve",
			dropped_nodes,
			dropped_edges
		);
	}

	SimulationInput {
		nodes,
		edges,
		dropped_edges,
		dropped_nodes,
	}
}
