//! Drawing surface dimensions and device pixel ratio handling.
//!
//! All simulation and hit-testing coordinates are CSS pixels. The backing
//! raster is `css size * device_pixel_ratio` so strokes stay crisp on HiDPI
//! screens; the canvas context is scaled by the ratio to compensate.

/// Width used before the container has been measured.
pub const DEFAULT_WIDTH: f64 = 800.0;
/// Height used when the host does not fix one.
pub const DEFAULT_HEIGHT: f64 = 500.0;

/// Pixel box of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
	/// Physical pixels per CSS pixel.
	pub device_pixel_ratio: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
	}
}

impl Viewport {
	/// Viewport at a pixel ratio of 1. Non-positive sizes fall back to the defaults.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width: sanitize_extent(width, DEFAULT_WIDTH),
			height: sanitize_extent(height, DEFAULT_HEIGHT),
			device_pixel_ratio: 1.0,
		}
	}

	/// Sets the device pixel ratio. Invalid ratios become 1.
	pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
		self.device_pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
			ratio
		} else {
			1.0
		};
		self
	}

	/// Center point in CSS pixels.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Backing raster size in device pixels.
	pub fn backing_size(&self) -> (u32, u32) {
		(
			(self.width * self.device_pixel_ratio).round() as u32,
			(self.height * self.device_pixel_ratio).round() as u32,
		)
	}

	/// Clamps a point to lie at least `margin` inside every edge.
	///
	/// When the viewport is narrower than two margins the lower bound wins,
	/// pinning nodes at `margin`.
	pub fn clamp(&self, x: f64, y: f64, margin: f64) -> (f64, f64) {
		(
			x.min(self.width - margin).max(margin),
			y.min(self.height - margin).max(margin),
		)
	}
}

fn sanitize_extent(value: f64, fallback: f64) -> f64 {
	if value.is_finite() && value > 0.0 {
		value
	} else {
		fallback
	}
}

/// Tracks the host container's measured box and reports real changes.
///
/// The container width is authoritative; the height is fixed (by default
/// [`DEFAULT_HEIGHT`]) since the graph panel does not stretch vertically.
#[derive(Clone, Debug)]
pub struct ViewportManager {
	current: Viewport,
	fixed_height: f64,
}

impl ViewportManager {
	/// Manager with a fixed height, [`DEFAULT_HEIGHT`] when `None`.
	pub fn new(fixed_height: Option<f64>) -> Self {
		let fixed_height = sanitize_extent(fixed_height.unwrap_or(DEFAULT_HEIGHT), DEFAULT_HEIGHT);
		Self {
			current: Viewport::new(DEFAULT_WIDTH, fixed_height),
			fixed_height,
		}
	}

	/// Most recently observed viewport.
	pub fn current(&self) -> Viewport {
		self.current
	}

	/// Records a new measurement. Returns the new viewport if anything
	/// changed, `None` if the measurement matches the current one.
	pub fn observe(&mut self, container_width: f64, device_pixel_ratio: f64) -> Option<Viewport> {
		let next =
			Viewport::new(container_width, self.fixed_height).with_pixel_ratio(device_pixel_ratio);
		if next == self.current {
			return None;
		}
		self.current = next;
		Some(next)
	}
}

impl Default for ViewportManager {
	fn default() -> Self {
		Self::new(None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backing_size_accounts_for_pixel_ratio() {
		let vp = Viewport::new(800.0, 500.0).with_pixel_ratio(2.0);
		assert_eq!(vp.backing_size(), (1600, 1000));

		let vp = Viewport::new(333.0, 500.0).with_pixel_ratio(1.5);
		assert_eq!(vp.backing_size(), (500, 750));
	}

	#[test]
	fn invalid_dimensions_fall_back_to_defaults() {
		let vp = Viewport::new(0.0, f64::NAN).with_pixel_ratio(-1.0);
		assert_eq!(vp.width, DEFAULT_WIDTH);
		assert_eq!(vp.height, DEFAULT_HEIGHT);
		assert_eq!(vp.device_pixel_ratio, 1.0);
	}

	#[test]
	fn clamp_keeps_points_inside_margin() {
		let vp = Viewport::new(400.0, 500.0);
		assert_eq!(vp.clamp(10.0, 600.0, 50.0), (50.0, 450.0));
		assert_eq!(vp.clamp(200.0, 250.0, 50.0), (200.0, 250.0));
		assert_eq!(vp.clamp(399.0, 20.0, 50.0), (350.0, 50.0));
	}

	#[test]
	fn clamp_in_tiny_viewport_pins_to_margin() {
		let vp = Viewport::new(60.0, 60.0);
		assert_eq!(vp.clamp(30.0, 0.0, 50.0), (50.0, 50.0));
	}

	#[test]
	fn manager_uses_fixed_height_and_reports_changes_once() {
		let mut manager = ViewportManager::default();
		assert_eq!(manager.current().height, DEFAULT_HEIGHT);

		let changed = manager.observe(640.0, 2.0).expect("first measurement is a change");
		assert_eq!(changed.width, 640.0);
		assert_eq!(changed.height, DEFAULT_HEIGHT);
		assert_eq!(changed.device_pixel_ratio, 2.0);

		assert!(manager.observe(640.0, 2.0).is_none());
		assert!(manager.observe(640.0, 1.0).is_some());
	}

	#[test]
	fn manager_honors_custom_height() {
		let mut manager = ViewportManager::new(Some(320.0));
		let vp = manager.observe(500.0, 1.0).unwrap();
		assert_eq!((vp.width, vp.height), (500.0, 320.0));
	}
}
