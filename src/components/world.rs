//! Projected world outlines shared by the map charts.

use std::sync::Arc;

use geo::Rect;
use log::debug;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule};

use crate::atlas::{Fit, ProjectedShape, WorldMap, project_world};

const BORDER: &str = "#ffffff";

/// Country paths, projected once at mount; a resize only replaces the [`Fit`].
pub struct WorldFrame {
	world: Arc<WorldMap>,
	pub shapes: Vec<ProjectedShape>,
	bounds: Option<Rect<f64>>,
	pub fit: Fit,
}

impl WorldFrame {
	pub fn new(world: Arc<WorldMap>) -> Self {
		Self {
			world,
			shapes: Vec::new(),
			bounds: None,
			fit: Fit::default(),
		}
	}

	/// Projects the topology. Later calls are no-ops.
	pub fn mount(&mut self) {
		if !self.shapes.is_empty() {
			return;
		}
		let (shapes, bounds) = project_world(&self.world);
		debug!("world frame: projected {} shapes", shapes.len());
		self.shapes = shapes;
		self.bounds = bounds;
	}

	pub fn fit_to(&mut self, width: f64, height: f64, padding: f64) {
		if let Some(bounds) = self.bounds {
			self.fit = Fit::to_size(bounds, width, height, padding);
		}
	}

	/// Last painted shape under the point.
	pub fn shape_at(&self, x: f64, y: f64) -> Option<&ProjectedShape> {
		self.shapes
			.iter()
			.rev()
			.find(|shape| shape.contains(&self.fit, [x, y]))
	}

	#[cfg(test)]
	pub fn centroid_of(&self, code: &str) -> Option<[f64; 2]> {
		self.shapes
			.iter()
			.find(|shape| shape.code.as_deref() == Some(code))
			.and_then(|shape| shape.centroid(&self.fit))
	}

	/// Fills every shape with the color `fill` picks for it, then strokes borders.
	pub fn paint(&self, ctx: &CanvasRenderingContext2d, fill: impl Fn(&ProjectedShape) -> String) {
		ctx.set_stroke_style_str(BORDER);
		ctx.set_line_width(0.5);
		for shape in &self.shapes {
			ctx.begin_path();
			for ring in shape.screen_rings(&self.fit) {
				let mut points = ring.iter();
				if let Some(first) = points.next() {
					ctx.move_to(first.x, first.y);
					for p in points {
						ctx.line_to(p.x, p.y);
					}
					ctx.close_path();
				}
			}
			ctx.set_fill_style_str(&fill(shape));
			ctx.fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
			ctx.stroke();
		}
	}
}
