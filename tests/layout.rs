use knowledge_graph_canvas::components::force_graph::{
	Category, DrawCommand, Entity, FrameStats, GraphData, RecordingSurface, Relationship,
	SimEdge, SimNode, Simulation, SimulationParams, Theme, Viewport, build_simulation_input,
	hit_test, render_frame,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn distance(a: &SimNode, b: &SimNode) -> f64 {
	((a.x() - b.x()).powi(2) + (a.y() - b.y()).powi(2)).sqrt()
}

fn seeded(data: &GraphData, viewport: Viewport, seed: u64) -> Simulation {
	let mut rng = StdRng::seed_from_u64(seed);
	let input = build_simulation_input(&data.entities, &data.relationships, &viewport, &mut rng);
	Simulation::new(input, viewport, SimulationParams::default())
}

fn sample_graph(n: usize) -> GraphData {
	let entities = (0..n)
		.map(|i| {
			let category = Category::ALL[i % Category::ALL.len()];
			Entity::new(format!("e{i}"), format!("Entity {i}"), category).with_weight((i * 7 % 100) as f64)
		})
		.collect();
	let relationships = (1..n)
		.map(|i| Relationship::new(format!("e{i}"), format!("e{}", i / 2), "relatedTo"))
		.collect();
	GraphData {
		entities,
		relationships,
		focus_entity: None,
	}
}

#[test]
fn chain_of_three_settles_near_rest_length() {
	let nodes = vec![
		SimNode::new("A", "A", Category::Person, 10.0, 350.0, 250.0),
		SimNode::new("B", "B", Category::Organization, 90.0, 400.0, 260.0),
		SimNode::new("C", "C", Category::Product, 50.0, 450.0, 240.0),
	];
	let edges = vec![
		SimEdge::new(0, 1, "worksAt", 50.0),
		SimEdge::new(1, 2, "created", 50.0),
	];
	let mut sim = Simulation::from_parts(
		nodes,
		edges,
		Viewport::new(800.0, 500.0),
		SimulationParams::default(),
	);
	sim.step(500);

	let n = sim.nodes();
	let ab = distance(&n[0], &n[1]);
	let bc = distance(&n[1], &n[2]);
	let ac = distance(&n[0], &n[2]);
	assert!((120.0..=180.0).contains(&ab), "A-B distance {ab}");
	assert!((120.0..=180.0).contains(&bc), "B-C distance {bc}");
	assert!(ac > 150.0, "A-C distance {ac}");
}

#[test]
fn shrinking_viewport_does_not_teleport_nodes() {
	let data = sample_graph(25);
	let mut sim = seeded(&data, Viewport::new(800.0, 500.0), 11);
	sim.step(100);

	let mut control = sim.clone();
	control.tick();

	let before: Vec<(f64, f64)> = sim.nodes().iter().map(SimNode::position).collect();
	sim.resize(Viewport::new(400.0, 500.0));
	sim.tick();

	for (i, node) in sim.nodes().iter().enumerate() {
		let (x0, y0) = before[i];
		let (x1, y1) = node.position();
		let moved = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
		let clamp_adjustment = (x0 - 350.0).max(0.0);
		let (vx, vy) = control.nodes()[i].velocity();
		let normal_step = (vx * vx + vy * vy).sqrt();
		assert!(
			moved <= clamp_adjustment + normal_step + 1.0,
			"node {i} moved {moved} (clamp {clamp_adjustment}, step {normal_step})"
		);
		assert!((50.0..=350.0).contains(&x1));
	}
}

#[test]
fn empty_graph_renders_nothing_and_hits_nothing() {
	let mut sim = seeded(&GraphData::default(), Viewport::new(800.0, 500.0), 1);
	sim.step(3);

	let mut surface = RecordingSurface::default();
	let stats = render_frame(&mut surface, &sim, None, None, &Theme::default());
	assert_eq!(stats, FrameStats::default());
	assert_eq!(surface.commands.len(), 1);
	assert!(matches!(surface.commands[0], DrawCommand::Clear { .. }));

	for x in (0..800).step_by(40) {
		for y in (0..500).step_by(40) {
			assert_eq!(hit_test(sim.nodes(), x as f64, y as f64), None);
		}
	}
}

#[test]
fn dangling_relationship_is_excluded_and_simulation_runs() {
	let data = GraphData {
		entities: vec![Entity::new("X", "X", Category::Concept)],
		relationships: vec![Relationship::new("X", "missing", "dependsOn")],
		focus_entity: None,
	};
	let mut sim = seeded(&data, Viewport::new(800.0, 500.0), 3);
	assert!(sim.edges().is_empty());
	sim.step(200);
	let (x, y) = sim.nodes()[0].position();
	assert!(x.is_finite() && y.is_finite());
}

#[test]
fn same_seed_reproduces_layout() {
	let data = sample_graph(12);
	let mut first = seeded(&data, Viewport::new(800.0, 500.0), 99);
	let mut second = seeded(&data, Viewport::new(800.0, 500.0), 99);
	first.step(250);
	second.step(250);
	assert_eq!(first.nodes(), second.nodes());
}

#[test]
fn cms_payload_renders_end_to_end() {
	let json = r#"{
		"entities": [
			{ "_id": "drafts.openai", "name": "OpenAI", "entityType": "organization",
			  "importance": 90, "slug": { "current": "openai" } },
			{ "_id": "gpt", "name": "GPT", "entityType": "product", "importance": 70 },
			{ "_id": "sf", "name": "San Francisco", "entityType": "place" }
		],
		"relationships": [
			{ "source": { "_ref": "openai" }, "target": { "_ref": "gpt" }, "relationshipType": "created" },
			{ "source": { "_ref": "openai" }, "target": { "_ref": "sf" }, "relationshipType": "locatedIn" },
			{ "source": { "_ref": "gpt" }, "target": { "_ref": "ghost" }, "relationshipType": "uses" }
		],
		"focusEntity": "openai"
	}"#;
	let data: GraphData = serde_json::from_str(json).unwrap();
	let mut sim = seeded(&data, Viewport::new(800.0, 500.0), 5);
	assert_eq!(sim.nodes().len(), 3);
	assert_eq!(sim.edges().len(), 2);
	sim.step(300);

	let mut surface = RecordingSurface::default();
	let stats = render_frame(
		&mut surface,
		&sim,
		None,
		data.focus_entity.as_deref(),
		&Theme::default(),
	);
	assert_eq!(stats, FrameStats { edges: 2, nodes: 3 });
	assert_eq!(surface.labels(), vec!["OpenAI", "GPT", "San Francisco"]);

	let glowing: Vec<bool> = surface.circles().map(|(_, _, s)| s.glow.is_some()).collect();
	assert_eq!(glowing, vec![true, false, false]);

	let openai = sim.find("openai").unwrap();
	let hit = hit_test(sim.nodes(), openai.x(), openai.y()).map(|i| sim.nodes()[i].id());
	assert_eq!(hit, Some("openai"));
	assert_eq!(openai.external_ref(), Some("openai"));
}

#[test]
fn null_references_and_fields_degrade_to_fewer_elements() {
	let json = r#"{
		"entities": [
			{ "_id": "a", "name": "Alpha", "entityType": "person" },
			{ "_id": "b", "name": null, "entityType": null },
			{ "_id": "c", "name": "Gamma", "entityType": "event", "importance": null }
		],
		"relationships": [
			{ "source": { "_id": "a" }, "target": { "_id": "b" }, "relationshipType": "knows" },
			{ "source": null, "target": { "_id": "c" }, "relationshipType": "mentions" },
			{ "source": { "_id": "c" }, "target": null, "relationshipType": null },
			{ "target": "a" }
		]
	}"#;
	let data: GraphData = serde_json::from_str(json).unwrap();
	assert_eq!(data.entities[1].name, "");
	assert_eq!(data.entities[1].category, Category::Concept);
	assert_eq!(data.entities[2].category, Category::Concept);
	assert_eq!(data.relationships.len(), 4);

	let mut sim = seeded(&data, Viewport::new(800.0, 500.0), 8);
	assert_eq!(sim.nodes().len(), 3);
	assert_eq!(sim.edges().len(), 1);
	sim.step(50);

	let mut surface = RecordingSurface::default();
	let stats = render_frame(&mut surface, &sim, None, None, &Theme::default());
	assert_eq!(stats, FrameStats { edges: 1, nodes: 3 });
}
