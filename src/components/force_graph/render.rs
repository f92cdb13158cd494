//! Frame rendering and pointer hit-testing.
//!
//! Drawing goes through the [`Surface`] trait so the same frame logic
//! targets an HTML canvas in the browser and a [`RecordingSurface`] in tests
//! or headless hosts. Rendering uses two passes for correct z-ordering:
//! 1. Background clear, then edges
//! 2. Nodes (with glow when hovered or focused), each followed by its label
//!
//! The render layer only reads simulation state.

use super::simulation::{SimNode, Simulation};
use super::theme::{Color, Theme};
use super::viewport::Viewport;

/// Radius of a node with zero weight.
pub const MIN_RADIUS: f64 = 8.0;
/// Extra radius gained at weight 100.
pub const RADIUS_RANGE: f64 = 12.0;

/// Tooltip box size used when keeping it inside the viewport.
pub const TOOLTIP_SIZE: (f64, f64) = (200.0, 80.0);
/// Offset of the tooltip's top-left corner from the node center.
pub const TOOLTIP_OFFSET: (f64, f64) = (20.0, -40.0);

/// Rendered radius for a weight in [0, 100].
pub fn node_radius(weight: f64) -> f64 {
	MIN_RADIUS + (weight.clamp(0.0, 100.0) / 100.0) * RADIUS_RANGE
}

/// Fill, outline and optional glow of a node circle.
#[derive(Clone, Debug, PartialEq)]
pub struct CircleStyle {
	/// Fill color.
	pub fill: Color,
	/// Border color.
	pub stroke: Color,
	/// Border width in CSS pixels.
	pub stroke_width: f64,
	/// Shadow blur radius and color.
	pub glow: Option<(f64, Color)>,
}

/// A 2D raster target.
pub trait Surface {
	/// Fills the whole surface with `color`.
	fn clear(&mut self, width: f64, height: f64, color: Color);
	/// Strokes a straight segment.
	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64);
	/// Fills and strokes a circle, with an optional glow.
	fn circle(&mut self, center: (f64, f64), radius: f64, style: &CircleStyle);
	/// Draws `text` horizontally centered on `at`.
	fn text(&mut self, text: &str, at: (f64, f64), color: Color, font: &str);
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum DrawCommand {
	Clear {
		width: f64,
		height: f64,
		color: Color,
	},
	Line {
		from: (f64, f64),
		to: (f64, f64),
	},
	Circle {
		center: (f64, f64),
		radius: f64,
		style: CircleStyle,
	},
	Text {
		text: String,
		at: (f64, f64),
	},
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
	/// Draw calls in the order they were made.
	pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
	/// Recorded circles as `(center, radius, style)`.
	pub fn circles(&self) -> impl Iterator<Item = (&(f64, f64), &f64, &CircleStyle)> {
		self.commands.iter().filter_map(|c| match c {
			DrawCommand::Circle {
				center,
				radius,
				style,
			} => Some((center, radius, style)),
			_ => None,
		})
	}

	/// Number of recorded lines.
	pub fn line_count(&self) -> usize {
		self.commands
			.iter()
			.filter(|c| matches!(c, DrawCommand::Line { .. }))
			.count()
	}

	/// Recorded label texts.
	pub fn labels(&self) -> Vec<&str> {
		self.commands
			.iter()
			.filter_map(|c| match c {
				DrawCommand::Text { text, .. } => Some(text.as_str()),
				_ => None,
			})
			.collect()
	}
}

impl Surface for RecordingSurface {
	fn clear(&mut self, width: f64, height: f64, color: Color) {
		self.commands.push(DrawCommand::Clear {
			width,
			height,
			color,
		});
	}

	fn line(&mut self, from: (f64, f64), to: (f64, f64), _color: Color, _width: f64) {
		self.commands.push(DrawCommand::Line { from, to });
	}

	/// Fills and strokes a circle, with an optional glow.
	fn circle(&mut self, center: (f64, f64), radius: f64, style: &CircleStyle) {
		self.commands.push(DrawCommand::Circle {
			center,
			radius,
			style: style.clone(),
		});
	}

	fn text(&mut self, text: &str, at: (f64, f64), _color: Color, _font: &str) {
		self.commands.push(DrawCommand::Text {
			text: text.to_string(),
			at,
		});
	}
}

/// Element counts for one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
	/// Edges drawn.
	pub edges: usize,
	/// Nodes drawn.
	pub nodes: usize,
}

/// Renders the complete graph to `surface`.
///
/// `hovered` and `focus` are external ids, resolved the same tolerant way
/// relationship endpoints are.
pub fn render_frame<S: Surface + ?Sized>(
	surface: &mut S,
	sim: &Simulation,
	hovered: Option<&str>,
	focus: Option<&str>,
	theme: &Theme,
) -> FrameStats {
	let viewport = sim.viewport();
	surface.clear(viewport.width, viewport.height, theme.background);

	let mut stats = FrameStats::default();
	let nodes = sim.nodes();

	for edge in sim.edges() {
		let (Some(source), Some(target)) = (nodes.get(edge.source()), nodes.get(edge.target()))
		else {
			continue;
		};
		surface.line(
			source.position(),
			target.position(),
			theme.edge_color,
			theme.edge_width,
		);
		stats.edges += 1;
	}

	let hovered = hovered.and_then(|id| sim.resolve(id));
	let focus = focus.and_then(|id| sim.resolve(id));

	for (i, node) in nodes.iter().enumerate() {
		let highlighted = hovered == Some(i) || focus == Some(i);
		draw_node(surface, node, highlighted, theme);
		stats.nodes += 1;
	}

	stats
}

fn draw_node<S: Surface + ?Sized>(surface: &mut S, node: &SimNode, highlighted: bool, theme: &Theme) {
	let radius = node_radius(node.weight());
	let fill = theme.category_color(node.category());
	let style = if highlighted {
		CircleStyle {
			fill,
			stroke: theme.node.highlight_border_color,
			stroke_width: theme.node.highlight_border_width,
			glow: Some((theme.node.glow_blur, fill)),
		}
	} else {
		CircleStyle {
			fill,
			stroke: theme.node.border_color,
			stroke_width: theme.node.border_width,
			glow: None,
		}
	};
	surface.circle(node.position(), radius, &style);

	let (x, y) = node.position();
	surface.text(
		node.name(),
		(x, y + radius + theme.node.label_offset),
		theme.node.label_color,
		&theme.node.label_font,
	);
}

/// Index of the first node whose circle strictly contains the point.
///
/// Iteration order wins; overlapping nodes are not disambiguated by z-order.
pub fn hit_test(nodes: &[SimNode], x: f64, y: f64) -> Option<usize> {
	nodes.iter().position(|node| {
		let radius = node_radius(node.weight());
		let (dx, dy) = (node.x() - x, node.y() - y);
		dx * dx + dy * dy < radius * radius
	})
}

/// Top-left corner of the hover tooltip for a node, kept inside the viewport.
pub fn tooltip_position(node: &SimNode, viewport: &Viewport) -> (f64, f64) {
	let (x, y) = node.position();
	let left = (x + TOOLTIP_OFFSET.0).min(viewport.width - TOOLTIP_SIZE.0).max(0.0);
	let top = (y + TOOLTIP_OFFSET.1).min(viewport.height - TOOLTIP_SIZE.1).max(0.0);
	(left, top)
}
