//! Force-directed layout simulation.
//!
//! Each tick applies, in order: pairwise inverse-square repulsion, spring
//! attraction along edges, a weak pull toward the viewport center, velocity
//! damping with integration, and a clamp keeping nodes inside the viewport.
//!
//! The simulation never stops on its own; [`Simulation::tick`] is meant to be
//! driven by the display refresh loop, and [`Simulation::step`] runs a fixed
//! number of ticks for deterministic use. An optional kinetic energy
//! threshold freezes the layout once it has settled.

use std::collections::HashMap;

use serde::Deserialize;

use super::adapter::{SimulationInput, canonical_id, find_by_containment};
use super::types::Category;
use super::viewport::Viewport;

/// Tunable force constants. Defaults reproduce the dashboard's layout.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationParams {
	/// Repulsion constant `k` in `k / d²`.
	pub repulsion: f64,
	/// Spring constant applied to `(d - rest_length)`.
	pub spring: f64,
	/// Edge length at which the spring force vanishes.
	pub rest_length: f64,
	/// Fraction of the offset from the viewport center added to velocity.
	pub gravity: f64,
	/// Velocity multiplier applied every tick, in (0, 1].
	pub damping: f64,
	/// Minimum distance kept between a node and the viewport edges.
	pub margin: f64,
	/// Scale each edge's spring by `strength / 50`.
	pub strength_scaled_springs: bool,
	/// Freeze the layout once total kinetic energy drops below this value.
	pub settle_energy: Option<f64>,
	/// Seed for the initial position jitter. Unset means a random seed.
	pub seed: Option<u64>,
}

impl Default for SimulationParams {
	fn default() -> Self {
		Self {
			repulsion: 2000.0,
			spring: 0.01,
			rest_length: 150.0,
			gravity: 0.001,
			damping: 0.9,
			margin: 50.0,
			strength_scaled_springs: false,
			settle_energy: None,
			seed: None,
		}
	}
}

/// A node with its layout state.
///
/// Position and velocity are private: only the simulation moves nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	id: String,
	name: String,
	category: Category,
	weight: f64,
	external_ref: Option<String>,
	x: f64,
	y: f64,
	vx: f64,
	vy: f64,
}

impl SimNode {
	/// Creates a node at rest at the given position. `id` is normalized.
	pub fn new(
		id: impl AsRef<str>,
		name: impl Into<String>,
		category: Category,
		weight: f64,
		x: f64,
		y: f64,
	) -> Self {
		Self {
			id: canonical_id(id.as_ref()).to_string(),
			name: name.into(),
			category,
			weight: weight.clamp(0.0, 100.0),
			external_ref: None,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
		}
	}

	/// Attaches the slug used for click navigation.
	pub fn with_external_ref(mut self, external_ref: Option<String>) -> Self {
		self.external_ref = external_ref;
		self
	}

	/// Normalized id.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Display label.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Entity category.
	pub fn category(&self) -> Category {
		self.category
	}

	/// Importance in [0, 100].
	pub fn weight(&self) -> f64 {
		self.weight
	}

	/// Slug for click navigation, if any.
	pub fn external_ref(&self) -> Option<&str> {
		self.external_ref.as_deref()
	}

	/// Horizontal position.
	pub fn x(&self) -> f64 {
		self.x
	}

	/// Vertical position.
	pub fn y(&self) -> f64 {
		self.y
	}

	/// Position in CSS pixels.
	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}

	/// Velocity carried into the next tick.
	pub fn velocity(&self) -> (f64, f64) {
		(self.vx, self.vy)
	}

	fn speed_squared(&self) -> f64 {
		self.vx * self.vx + self.vy * self.vy
	}
}

/// An immutable edge between two node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct SimEdge {
	source: usize,
	target: usize,
	kind: String,
	strength: f64,
}

impl SimEdge {
	/// Edge between two node indices.
	pub fn new(source: usize, target: usize, kind: impl Into<String>, strength: f64) -> Self {
		Self {
			source,
			target,
			kind: kind.into(),
			strength: strength.clamp(0.0, 100.0),
		}
	}

	/// Index of the source node.
	pub fn source(&self) -> usize {
		self.source
	}

	/// Index of the target node.
	pub fn target(&self) -> usize {
		self.target
	}

	/// Relationship label.
	pub fn kind(&self) -> &str {
		&self.kind
	}

	/// Strength in [0, 100].
	pub fn strength(&self) -> f64 {
		self.strength
	}
}

/// Repulsive force on the first node of a pair, given `delta` pointing from
/// it to the second node. Magnitude `strength / d²`, `d` floored at 1.
///
/// Coincident nodes are pushed apart along the x axis so they can separate.
pub fn repulsion(delta: (f64, f64), strength: f64) -> (f64, f64) {
	let (dx, dy) = delta;
	let raw = (dx * dx + dy * dy).sqrt();
	let (ux, uy) = if raw > 0.0 {
		(dx / raw, dy / raw)
	} else {
		(1.0, 0.0)
	};
	let dist = raw.max(1.0);
	let force = strength / (dist * dist);
	(-ux * force, -uy * force)
}

/// Spring force on an edge's source, given `delta` pointing from source to
/// target. Positive `(d - rest_length)` pulls the source toward the target.
pub fn spring(delta: (f64, f64), rest_length: f64, k: f64) -> (f64, f64) {
	let (dx, dy) = delta;
	let dist = (dx * dx + dy * dy).sqrt().max(1.0);
	let force = (dist - rest_length) * k;
	(dx / dist * force, dy / dist * force)
}

/// Layout state for one graph: nodes, edges and the bounds they live in.
///
/// Created when the host supplies a data set and dropped when it is replaced
/// or the view is torn down.
#[derive(Clone, Debug)]
pub struct Simulation {
	nodes: Vec<SimNode>,
	edges: Vec<SimEdge>,
	index: HashMap<String, usize>,
	viewport: Viewport,
	pending_viewport: Option<Viewport>,
	params: SimulationParams,
	settled: bool,
	ticks: u64,
}

impl Simulation {
	/// Starts a simulation from adapter output.
	pub fn new(input: SimulationInput, viewport: Viewport, params: SimulationParams) -> Self {
		let SimulationInput { nodes, edges, .. } = input;
		Self::from_parts(nodes, edges, viewport, params)
	}

	/// Builds a simulation from prepared nodes and edges. Edges whose
	/// endpoints are out of range are discarded.
	pub fn from_parts(
		nodes: Vec<SimNode>,
		edges: Vec<SimEdge>,
		viewport: Viewport,
		params: SimulationParams,
	) -> Self {
		let mut index = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			index.entry(node.id.clone()).or_insert(i);
		}
		let edges = edges
			.into_iter()
			.filter(|e| e.source < nodes.len() && e.target < nodes.len())
			.collect();
		Self {
			nodes,
			edges,
			index,
			viewport,
			pending_viewport: None,
			params,
			settled: false,
			ticks: 0,
		}
	}

	/// Nodes in input order.
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Resolved edges.
	pub fn edges(&self) -> &[SimEdge] {
		&self.edges
	}

	/// Bounds in effect for the current tick.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Number of ticks that actually advanced the layout.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Whether ticks are frozen by the settle threshold.
	pub fn is_settled(&self) -> bool {
		self.settled
	}

	/// Node at `index`.
	pub fn node(&self, index: usize) -> Option<&SimNode> {
		self.nodes.get(index)
	}

	/// Resolves an external id to a node index: exact match on the
	/// normalized id first, then containment either way.
	pub fn resolve(&self, id: &str) -> Option<usize> {
		let id = canonical_id(id);
		if id.is_empty() {
			return None;
		}
		self.index
			.get(id)
			.copied()
			.or_else(|| find_by_containment(&self.nodes, id))
	}

	/// Node for an external id, see [`Simulation::resolve`].
	pub fn find(&self, id: &str) -> Option<&SimNode> {
		self.resolve(id).and_then(|i| self.nodes.get(i))
	}

	/// Total kinetic energy (sum of squared speeds).
	pub fn kinetic_energy(&self) -> f64 {
		self.nodes.iter().map(SimNode::speed_squared).sum()
	}

	/// Schedules new bounds. They apply at the start of the next tick, so a
	/// resize never lands halfway through a force pass.
	pub fn resize(&mut self, viewport: Viewport) {
		self.pending_viewport = Some(viewport);
		self.settled = false;
	}

	/// Un-freezes a settled layout.
	pub fn wake(&mut self) {
		self.settled = false;
	}

	/// Runs `n` ticks.
	pub fn step(&mut self, n: usize) {
		for _ in 0..n {
			self.tick();
		}
	}

	/// Advances the layout by one frame.
	pub fn tick(&mut self) {
		if let Some(viewport) = self.pending_viewport.take() {
			log::debug!(
				"knowledge-graph: viewport {}x{} -> {}x{}",
				self.viewport.width,
				self.viewport.height,
				viewport.width,
				viewport.height
			);
			self.viewport = viewport;
		}
		if self.settled {
			return;
		}

		self.apply_repulsion();
		self.apply_springs();
		self.apply_gravity();
		self.integrate();
		self.ticks += 1;

		if let Some(threshold) = self.params.settle_energy {
			if self.kinetic_energy() < threshold {
				self.settled = true;
				log::debug!("knowledge-graph: layout settled after {} ticks", self.ticks);
			}
		}
	}

	fn apply_repulsion(&mut self) {
		let strength = self.params.repulsion;
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let delta = (
					self.nodes[j].x - self.nodes[i].x,
					self.nodes[j].y - self.nodes[i].y,
				);
				let (fx, fy) = repulsion(delta, strength);
				self.nodes[i].vx += fx;
				self.nodes[i].vy += fy;
				self.nodes[j].vx -= fx;
				self.nodes[j].vy -= fy;
			}
		}
	}

	fn apply_springs(&mut self) {
		let SimulationParams {
			spring: k,
			rest_length,
			strength_scaled_springs,
			..
		} = self.params;
		for edge in &self.edges {
			let (s, t) = (edge.source, edge.target);
			if s == t {
				continue;
			}
			let k = if strength_scaled_springs {
				k * edge.strength / 50.0
			} else {
				k
			};
			let delta = (
				self.nodes[t].x - self.nodes[s].x,
				self.nodes[t].y - self.nodes[s].y,
			);
			let (fx, fy) = spring(delta, rest_length, k);
			self.nodes[s].vx += fx;
			self.nodes[s].vy += fy;
			self.nodes[t].vx -= fx;
			self.nodes[t].vy -= fy;
		}
	}

	fn apply_gravity(&mut self) {
		let (cx, cy) = self.viewport.center();
		let g = self.params.gravity;
		for node in &mut self.nodes {
			node.vx += (cx - node.x) * g;
			node.vy += (cy - node.y) * g;
		}
	}

	fn integrate(&mut self) {
		let damping = self.params.damping;
		let margin = self.params.margin;
		for node in &mut self.nodes {
			node.vx *= damping;
			node.vy *= damping;
			let (x, y) = self.viewport.clamp(node.x + node.vx, node.y + node.vy, margin);
			node.x = x;
			node.y = y;
		}
	}
}
