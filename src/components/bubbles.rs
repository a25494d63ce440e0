//! Circles placed by the force layout, shared by the bubble chart and bubble map.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::color::color_for_code;
use super::marks::MarkSet;
use super::scale::format_value;
use super::tooltip::Tooltip;
use crate::config::ChartConfig;
use crate::layout::{ForceLayout, LayoutNode, NodeSpec, SimulationStatus};

/// Below this radius a bubble carries no code label.
const LABEL_MIN_RADIUS: f64 = 14.0;

pub struct BubbleField {
	pub layout: ForceLayout,
	/// Drawn radii, eased separately from the collision radii in the layout.
	pub radii: MarkSet<f64>,
}

impl BubbleField {
	pub fn new(config: &ChartConfig) -> Self {
		Self {
			layout: ForceLayout::new(config.force),
			radii: MarkSet::new(config.transition_ms / 1000.0),
		}
	}

	/// Keyed update of both the solver and the drawn radii. New bubbles grow from zero.
	pub fn set_nodes(&mut self, specs: Vec<NodeSpec>) {
		self.radii
			.apply(specs.iter().map(|s| (s.code.clone(), s.radius)), |_| 0.0);
		self.layout.set_nodes(specs);
	}

	/// One solver pass plus radius easing; true while either still moves.
	pub fn tick(&mut self, dt: f64) -> bool {
		let simulating = self.layout.status() == SimulationStatus::Simulating;
		if simulating {
			self.layout.tick();
		}
		let easing = self.radii.tick(dt);
		simulating || easing
	}

	/// Runs the solver to rest synchronously and snaps radii to their targets.
	pub fn settle(&mut self, max_ticks: usize) -> usize {
		let ticks = self.layout.settle(max_ticks);
		self.radii.finish();
		ticks
	}

	pub fn radius_of(&self, node: &LayoutNode) -> f64 {
		self.radii.get(&node.code).unwrap_or(node.radius)
	}

	pub fn tooltip_at(&self, x: f64, y: f64, unit: &str) -> Option<Tooltip> {
		let node = self.layout.node_at(x, y)?;
		Some(Tooltip::new(x, y, &node.country, format_value(node.value, unit)))
	}

	pub fn clear(&mut self) {
		self.layout.set_nodes(Vec::new());
		self.radii.clear();
	}
}

pub fn paint_bubbles(field: &BubbleField, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(1.0);
	ctx.set_stroke_style_str("#ffffff");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for node in field.layout.nodes() {
		let radius = field.radius_of(node);
		if radius <= 0.0 {
			continue;
		}
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&color_for_code(&node.code).css_alpha(0.85));
		ctx.fill();
		ctx.stroke();

		if radius >= LABEL_MIN_RADIUS {
			ctx.set_fill_style_str("#ffffff");
			ctx.set_font(&format!("{}px sans-serif", (radius / 2.5).min(14.0)));
			let _ = ctx.fill_text(&node.code, node.x, node.y);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn spec(code: &str, radius: f64) -> NodeSpec {
		NodeSpec {
			code: code.into(),
			country: format!("Country {code}"),
			value: radius * 10.0,
			radius,
			target: [100.0, 100.0],
		}
	}

	#[test]
	fn bubbles_grow_in_and_settle() {
		let mut field = BubbleField::new(&ChartConfig::default());
		field.set_nodes(vec![spec("AAA", 10.0), spec("BBB", 20.0)]);
		assert_eq!(field.radii.get("AAA"), Some(0.0));
		assert!(field.tick(0.016));

		field.settle(1000);
		assert_eq!(field.layout.status(), SimulationStatus::Idle);
		assert_eq!(field.radii.get("BBB"), Some(20.0));
		assert!(!field.tick(0.016));
	}

	#[test]
	fn tooltip_reports_node_under_pointer() {
		let mut field = BubbleField::new(&ChartConfig::default());
		field.set_nodes(vec![spec("AAA", 10.0)]);
		field.settle(1000);
		let node = field.layout.node("AAA").unwrap().clone();
		let tip = field.tooltip_at(node.x, node.y, "").unwrap();
		assert_eq!(tip.title, "Country AAA");
		assert_eq!(tip.detail, "100");
		assert!(field.tooltip_at(node.x + 50.0, node.y, "").is_none());
	}

	#[test]
	fn clear_empties_everything() {
		let mut field = BubbleField::new(&ChartConfig::default());
		field.set_nodes(vec![spec("AAA", 10.0)]);
		field.clear();
		assert!(field.layout.nodes().is_empty());
		assert!(field.radii.is_empty());
		assert_eq!(field.layout.status(), SimulationStatus::Idle);
	}
}
