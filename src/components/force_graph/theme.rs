//! Visual theming for the knowledge graph.
//!
//! Colors for the frame, edges and labels, plus the fixed category palette
//! shared with the dashboard's entity badges.

use super::types::Category;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Alpha in [0, 1].
	pub a: f64,
}

impl Color {
	/// Opaque white.
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Same color with a different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS color string, hex when opaque.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// One color per entity category.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryPalette {
	/// Blue.
	pub person: Color,
	/// Green.
	pub organization: Color,
	/// Orange.
	pub product: Color,
	/// Cyan.
	pub place: Color,
	/// Violet, also used for unknown categories.
	pub concept: Color,
	/// Magenta.
	pub topic: Color,
}

impl CategoryPalette {
	/// Fill color for a category.
	pub fn color(&self, category: Category) -> Color {
		match category {
			Category::Person => self.person,
			Category::Organization => self.organization,
			Category::Product => self.product,
			Category::Place => self.place,
			Category::Concept => self.concept,
			Category::Topic => self.topic,
		}
	}
}

impl Default for CategoryPalette {
	// sRGB renderings of the badge colors (oklch 0.65-0.75 lightness).
	fn default() -> Self {
		Self {
			person: Color::rgb(79, 157, 245),       // Blue
			organization: Color::rgb(88, 184, 102), // Green
			product: Color::rgb(236, 144, 80),      // Orange
			place: Color::rgb(42, 179, 192),        // Teal
			concept: Color::rgb(140, 124, 232),     // Violet
			topic: Color::rgb(200, 95, 208),        // Magenta
		}
	}
}

/// Node outline, glow and label styling.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Border of nodes that are neither hovered nor focused.
	pub border_color: Color,
	/// Border width for normal nodes.
	pub border_width: f64,
	/// Border of hovered/focused nodes.
	pub highlight_border_color: Color,
	/// Border width for hovered or focused nodes.
	pub highlight_border_width: f64,
	/// Shadow blur radius for the hover/focus glow.
	pub glow_blur: f64,
	/// Label text color.
	pub label_color: Color,
	/// CSS font shorthand for labels.
	pub label_font: String,
	/// Distance from the node's bottom edge to the label baseline.
	pub label_offset: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	/// Frame clear color.
	pub background: Color,
	/// Edge stroke color.
	pub edge_color: Color,
	/// Edge stroke width.
	pub edge_width: f64,
	/// Node styling.
	pub node: NodeStyle,
	/// Category fill colors.
	pub palette: CategoryPalette,
}

impl Theme {
	/// Dark dashboard theme.
	pub fn dark() -> Self {
		Self {
			background: Color::rgb(10, 10, 10),
			edge_color: Color::rgb(46, 46, 46),
			edge_width: 1.0,
			node: NodeStyle {
				border_color: Color::rgb(46, 46, 46),
				border_width: 1.0,
				highlight_border_color: Color::WHITE,
				highlight_border_width: 2.0,
				glow_blur: 20.0,
				label_color: Color::rgb(205, 205, 205),
				label_font: "12px Geist, sans-serif".to_string(),
				label_offset: 16.0,
			},
			palette: CategoryPalette::default(),
		}
	}

	/// Fill color for a category.
	pub fn category_color(&self, category: Category) -> Color {
		self.palette.color(category)
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(10, 10, 10).to_css(), "#0a0a0a");
		assert_eq!(
			Color::rgb(255, 0, 0).with_alpha(0.5).to_css(),
			"rgba(255, 0, 0, 0.5)"
		);
	}

	#[test]
	fn every_category_has_a_distinct_color() {
		let palette = CategoryPalette::default();
		let colors: Vec<Color> = Category::ALL.iter().map(|&c| palette.color(c)).collect();
		for (i, a) in colors.iter().enumerate() {
			for b in &colors[i + 1..] {
				assert_ne!(a, b);
			}
		}
	}
}
