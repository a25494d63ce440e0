use log::debug;

use crate::components::ChartKind;
use crate::components::bubbles::BubbleField;
use crate::components::scale::{SqrtScale, domain_max};
use crate::components::surface::Size;
use crate::config::ChartConfig;
use crate::data::ChartData;
use crate::layout::NodeSpec;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BubbleInput {
	pub chart: ChartData,
	pub unit: String,
}

/// Every country of the year as a bubble, packed around the center of the canvas.
pub struct BubbleState {
	pub field: BubbleField,
	pub size: Size,
	pub unit: String,
	chart: ChartData,
	min_radius_px: f64,
	max_radius_fraction: f64,
}

impl BubbleState {
	pub fn new(config: &ChartConfig) -> Self {
		Self {
			field: BubbleField::new(config),
			size: Size::default(),
			unit: String::new(),
			chart: ChartData::default(),
			min_radius_px: config.min_radius_px,
			max_radius_fraction: config.max_radius_fraction,
		}
	}

	pub fn center(&self) -> [f64; 2] {
		[self.size.width / 2.0, self.size.height / 2.0]
	}

	/// Radii follow this year's extremes.
	pub fn radius_scale(&self) -> SqrtScale {
		SqrtScale::radius(
			domain_max(ChartKind::Bubble.domain_policy(), &self.chart, None),
			self.min_radius_px,
			self.size.width,
			self.max_radius_fraction,
		)
	}

	pub fn resize(&mut self, size: Size) {
		self.size = size;
		if !self.chart.data.is_empty() {
			self.relayout();
		}
	}

	pub fn update(&mut self, input: &BubbleInput) {
		self.chart.clone_from(&input.chart);
		self.unit.clone_from(&input.unit);
		self.relayout();
	}

	/// Radius depends on the width and the anchor on both dimensions, so resize and
	/// data changes share one keyed update.
	fn relayout(&mut self) {
		let scale = self.radius_scale();
		let center = self.center();
		let specs: Vec<NodeSpec> = self
			.chart
			.data
			.iter()
			.map(|d| NodeSpec {
				code: d.code.clone(),
				country: d.country.clone(),
				value: d.value,
				radius: scale.scale(d.value),
				target: center,
			})
			.collect();
		debug!("bubble chart: {} nodes", specs.len());
		self.field.set_nodes(specs);
	}
}
