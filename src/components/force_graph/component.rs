//! Leptos component wrapping the knowledge graph canvas.
//!
//! The component creates an HTML canvas element sized to its container and
//! wires up pointer handlers for hover and click. An animation loop runs via
//! `requestAnimationFrame`, ticking the simulation and rendering each frame.
//! The loop is cancelled when the data set changes (a fresh loop replaces it)
//! and when the component is unmounted.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};

use leptos::ev;
use leptos::leptos_dom::helpers::window_event_listener;
use leptos::prelude::*;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use super::adapter::build_simulation_input;
use super::render;
use super::simulation::{Simulation, SimulationParams};
use super::theme::Theme;
use super::types::GraphData;
use super::viewport::{DEFAULT_WIDTH, Viewport, ViewportManager};

/// Bundles the simulation with the drawing context and per-frame display state.
struct GraphContext {
	sim: Simulation,
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	hovered: Option<String>,
	focus: Option<String>,
}

/// What the tooltip overlay shows for the hovered node.
#[derive(Clone, Debug, PartialEq)]
struct HoverInfo {
	name: String,
	category: &'static str,
	external_ref: Option<String>,
	left: f64,
	top: f64,
}

/// Lifetime flags for the frame loop.
///
/// Every (re)initialization bumps `generation`; a frame callback that sees a
/// newer generation, or an unmounted component, stops without rescheduling.
/// Only atomics are held so the unmount hook can own a copy.
#[derive(Clone)]
struct FrameLoopGuard {
	mounted: Arc<AtomicBool>,
	generation: Arc<AtomicU64>,
	pending_frame: Arc<AtomicI32>,
}

impl FrameLoopGuard {
	fn new() -> Self {
		Self {
			mounted: Arc::new(AtomicBool::new(true)),
			generation: Arc::new(AtomicU64::new(0)),
			pending_frame: Arc::new(AtomicI32::new(0)),
		}
	}

	fn is_mounted(&self) -> bool {
		self.mounted.load(Ordering::Relaxed)
	}

	fn is_current(&self, generation: u64) -> bool {
		self.is_mounted() && self.generation.load(Ordering::Relaxed) == generation
	}

	/// Invalidates the running loop and returns the generation for the next one.
	fn restart(&self) -> u64 {
		self.cancel_pending();
		self.generation.fetch_add(1, Ordering::Relaxed) + 1
	}

	fn schedule(&self, callback: &Closure<dyn FnMut()>) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Ok(handle) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
			self.pending_frame.store(handle, Ordering::Relaxed);
		}
	}

	fn cancel_pending(&self) {
		let handle = self.pending_frame.swap(0, Ordering::Relaxed);
		if handle != 0 {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(handle);
			}
		}
	}

	fn unmount(&self) {
		self.mounted.store(false, Ordering::Relaxed);
		self.cancel_pending();
	}
}

fn container_width(canvas: &HtmlCanvasElement) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(DEFAULT_WIDTH)
}

fn canvas_context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Sizes the backing raster for the device pixel ratio and scales the
/// context so drawing stays in CSS pixels.
fn apply_viewport(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, viewport: &Viewport) {
	let (w, h) = viewport.backing_size();
	canvas.set_width(w);
	canvas.set_height(h);
	let style = HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{}px", viewport.width));
	let _ = style.set_property("height", &format!("{}px", viewport.height));
	let dpr = viewport.device_pixel_ratio;
	let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn navigate_to_entity(slug: &str) {
	if let Some(window) = web_sys::window() {
		let _ = window.location().set_href(&format!("/graph/{slug}"));
	}
}

/// Renders an interactive knowledge graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal; every new value rebuilds
/// the layout from scratch. The canvas takes its container's width and a
/// fixed height (500px unless `height` is set), and follows window resizes.
/// Clicking a node with a slug calls `on_select`, or navigates to
/// `/graph/{slug}` when no handler is given.
#[component]
pub fn KnowledgeGraphCanvas(
	/// Entities and relationships to lay out.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Entity to highlight. Overrides the payload's `focusEntity`.
	#[prop(optional, into)]
	focus: Option<String>,
	/// Canvas height in CSS pixels.
	#[prop(default = None)]
	height: Option<f64>,
	/// Force constants.
	#[prop(optional)]
	params: Option<SimulationParams>,
	/// Colors and fonts.
	#[prop(optional)]
	theme: Option<Theme>,
	/// Receives the slug of a clicked node.
	#[prop(optional, into)]
	on_select: Option<Callback<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let viewports = Rc::new(RefCell::new(ViewportManager::new(height)));
	let guard = FrameLoopGuard::new();
	let params = params.unwrap_or_default();
	let theme = theme.unwrap_or_default();

	let hover = RwSignal::new(None::<HoverInfo>);
	let counts = RwSignal::new((0usize, 0usize));

	let (context_resize, viewports_resize) = (context.clone(), viewports.clone());
	let resize_listener = window_event_listener(ev::resize, move |_| {
		let (Some(canvas), Some(win)) = (canvas_ref.get_untracked(), web_sys::window()) else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(viewport) = viewports_resize
			.borrow_mut()
			.observe(container_width(&canvas), win.device_pixel_ratio())
		else {
			return;
		};
		if let Some(ref mut c) = *context_resize.borrow_mut() {
			apply_viewport(&canvas, &c.ctx, &viewport);
			c.sim.resize(viewport);
		}
	});

	let guard_cleanup = guard.clone();
	on_cleanup(move || {
		guard_cleanup.unmount();
		resize_listener.remove();
	});

	let (context_init, animate_init, viewports_init, guard_init) = (
		context.clone(),
		animate.clone(),
		viewports.clone(),
		guard.clone(),
	);

	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window): Option<Window> = web_sys::window() else {
			return;
		};

		let generation = guard_init.restart();
		*animate_init.borrow_mut() = None;

		let Some(ctx) = canvas_context(&canvas) else {
			warn!("knowledge-graph: canvas has no 2d context");
			return;
		};

		let viewport = {
			let mut viewports = viewports_init.borrow_mut();
			viewports.observe(container_width(&canvas), window.device_pixel_ratio());
			viewports.current()
		};
		apply_viewport(&canvas, &ctx, &viewport);

		let seed = params
			.seed
			.unwrap_or_else(|| (js_sys::Math::random() * u64::MAX as f64) as u64);
		let mut rng = StdRng::seed_from_u64(seed);
		let input = build_simulation_input(&data.entities, &data.relationships, &viewport, &mut rng);
		let sim = Simulation::new(input, viewport, params.clone());
		info!(
			"knowledge-graph: laid out {} nodes, {} edges",
			sim.nodes().len(),
			sim.edges().len()
		);
		counts.set((sim.nodes().len(), sim.edges().len()));
		hover.set(None);

		*context_init.borrow_mut() = Some(GraphContext {
			sim,
			ctx,
			theme: theme.clone(),
			hovered: None,
			focus: focus.clone().or(data.focus_entity),
		});

		let (context_anim, animate_inner, guard_anim) =
			(context_init.clone(), animate_init.clone(), guard_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !guard_anim.is_current(generation) {
				return;
			}
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.sim.tick();
				render::render_frame(
					&mut c.ctx,
					&c.sim,
					c.hovered.as_deref(),
					c.focus.as_deref(),
					&c.theme,
				);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				guard_anim.schedule(cb);
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			guard_init.schedule(cb);
		}
	});

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);

		let info = {
			let mut context = context_mm.borrow_mut();
			let Some(c) = context.as_mut() else {
				return;
			};
			let node = render::hit_test(c.sim.nodes(), x, y).and_then(|i| c.sim.node(i));
			c.hovered = node.map(|n| n.id().to_string());
			node.map(|n| {
				let (left, top) = render::tooltip_position(n, &c.sim.viewport());
				HoverInfo {
					name: n.name().to_string(),
					category: n.category().label(),
					external_ref: n.external_ref().map(str::to_string),
					left,
					top,
				}
			})
		};

		let cursor = if info.is_some() { "pointer" } else { "default" };
		let _ = HtmlElement::style(&canvas).set_property("cursor", cursor);
		if hover.with_untracked(|current| *current != info) {
			hover.set(info);
		}
	};

	let context_me = context.clone();
	let on_mouseenter = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_me.borrow_mut() {
			c.sim.wake();
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.hovered = None;
		}
		hover.set(None);
	};

	let on_click = move |_: MouseEvent| {
		let Some(slug) = hover.get_untracked().and_then(|h| h.external_ref) else {
			return;
		};
		match on_select.as_ref() {
			Some(cb) => cb.run(slug),
			None => navigate_to_entity(&slug),
		}
	};

	view! {
		<div class="knowledge-graph" style="position: relative; overflow: hidden;">
			<canvas
				node_ref=canvas_ref
				class="knowledge-graph-canvas"
				on:mouseenter=on_mouseenter
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_click
				style="display: block;"
			/>
			{move || {
				hover
					.get()
					.map(|info| {
						view! {
							<div
								class="knowledge-graph-tooltip"
								style=format!(
									"position: absolute; pointer-events: none; left: {}px; top: {}px;",
									info.left,
									info.top,
								)
							>
								<p class="knowledge-graph-tooltip-name">{info.name}</p>
								<p class="knowledge-graph-tooltip-category">{info.category}</p>
							</div>
						}
					})
			}}
			<div class="knowledge-graph-legend">
				<span>{move || format!("{} nodes", counts.get().0)}</span>
				<span>{move || format!("{} edges", counts.get().1)}</span>
			</div>
		</div>
	}
}
