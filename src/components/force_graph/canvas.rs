//! [`Surface`] implementation for an HTML canvas 2D context.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::render::{CircleStyle, Surface};
use super::theme::Color;

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64, color: Color) {
		self.set_fill_style_str(&color.to_css());
		self.fill_rect(0.0, 0.0, width, height);
	}

	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64) {
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}

	fn circle(&mut self, center: (f64, f64), radius: f64, style: &CircleStyle) {
		if let Some((blur, color)) = style.glow {
			self.set_shadow_blur(blur);
			self.set_shadow_color(&color.to_css());
		}

		self.begin_path();
		let _ = self.arc(center.0, center.1, radius, 0.0, 2.0 * PI);
		self.set_fill_style_str(&style.fill.to_css());
		self.fill();

		// Glow applies to the fill only.
		self.set_shadow_blur(0.0);

		self.set_stroke_style_str(&style.stroke.to_css());
		self.set_line_width(style.stroke_width);
		self.stroke();
	}

	fn text(&mut self, text: &str, at: (f64, f64), color: Color, font: &str) {
		self.set_fill_style_str(&color.to_css());
		self.set_font(font);
		self.set_text_align("center");
		let _ = self.fill_text(text, at.0, at.1);
	}
}
