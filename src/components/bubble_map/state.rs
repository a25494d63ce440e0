use std::sync::Arc;

use log::debug;

use crate::atlas::WorldMap;
use crate::components::ChartKind;
use crate::components::bubbles::BubbleField;
use crate::components::scale::{SqrtScale, domain_max};
use crate::components::surface::Size;
use crate::components::tooltip::Tooltip;
use crate::components::world::WorldFrame;
use crate::config::ChartConfig;
use crate::data::{ChartData, CountryCodeResolver};
use crate::layout::NodeSpec;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BubbleMapInput {
	pub chart: ChartData,
	pub year: i32,
	pub unit: String,
}

pub const PADDING: f64 = 8.0;

/// Proportional circles over each country's centroid, nudged apart where they collide.
pub struct BubbleMapState {
	pub frame: WorldFrame,
	pub field: BubbleField,
	pub size: Size,
	pub unit: String,
	/// When false every data change settles the layout before the first paint.
	pub animate: bool,
	chart: ChartData,
	year: i32,
	resolver: Arc<CountryCodeResolver>,
	config: ChartConfig,
}

impl BubbleMapState {
	pub fn new(
		world: Arc<WorldMap>,
		resolver: Arc<CountryCodeResolver>,
		config: &ChartConfig,
		animate: bool,
	) -> Self {
		Self {
			frame: WorldFrame::new(world),
			field: BubbleField::new(config),
			size: Size::default(),
			unit: String::new(),
			animate,
			chart: ChartData::default(),
			year: config.year_max,
			resolver,
			config: config.clone(),
		}
	}

	pub fn mount(&mut self, size: Size) {
		self.frame.mount();
		self.resize(size);
	}

	pub fn resize(&mut self, size: Size) {
		self.size = size;
		self.frame.fit_to(size.width, size.height, PADDING);
		if !self.chart.data.is_empty() {
			self.relayout();
		}
	}

	pub fn update(&mut self, input: &BubbleMapInput) {
		self.chart.clone_from(&input.chart);
		self.unit.clone_from(&input.unit);
		self.year = input.year;
		self.relayout();
	}

	/// Radii hold one scale for the whole dataset so bubbles only grow or shrink
	/// with their own values during playback.
	pub fn radius_scale(&self) -> SqrtScale {
		SqrtScale::radius(
			domain_max(ChartKind::BubbleMap.domain_policy(), &self.chart, None),
			self.config.min_radius_px,
			self.size.width,
			self.config.max_radius_fraction,
		)
	}

	fn relayout(&mut self) {
		let scale = self.radius_scale();
		let year_map = self.chart.year_map();
		let mut specs: Vec<NodeSpec> = self
			.frame
			.shapes
			.iter()
			.filter_map(|shape| {
				let code = shape.code.as_deref()?;
				let value = self.resolver.resolve_value(
					code,
					self.year,
					&year_map,
					self.config.gate_succession,
				)?;
				let target = shape.centroid(&self.frame.fit)?;
				Some(NodeSpec {
					code: code.to_owned(),
					country: shape.name.clone(),
					value,
					radius: scale.scale(value),
					target,
				})
			})
			.collect();
		// Small bubbles paint last so they stay visible on top of large ones.
		specs.sort_by(|a, b| b.value.total_cmp(&a.value));
		debug!("bubble map: {} nodes", specs.len());
		self.field.set_nodes(specs);
		if !self.animate {
			let ticks = self.field.settle(self.config.static_layout_ticks);
			debug!("bubble map: settled in {ticks} ticks");
		}
	}

	pub fn tooltip_at(&self, x: f64, y: f64) -> Option<Tooltip> {
		self.field.tooltip_at(x, y, &self.unit).or_else(|| {
			let shape = self.frame.shape_at(x, y)?;
			Some(Tooltip::new(x, y, &shape.name, "No data"))
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::world::fixtures::three_countries;
	use crate::data::ChartDatum;
	use crate::layout::SimulationStatus;

	fn input(rows: &[(&str, f64)]) -> BubbleMapInput {
		BubbleMapInput {
			chart: ChartData {
				total_size: rows.len(),
				max_value: 1000.0,
				data: rows
					.iter()
					.map(|(code, value)| ChartDatum {
						country: (*code).into(),
						code: (*code).into(),
						value: *value,
					})
					.collect(),
				all_names: Vec::new(),
			},
			year: 1980,
			unit: String::new(),
		}
	}

	fn state(animate: bool) -> BubbleMapState {
		let mut state = BubbleMapState::new(
			Arc::new(three_countries()),
			Arc::new(CountryCodeResolver::new()),
			&ChartConfig::default(),
			animate,
		);
		state.mount(Size::new(800.0, 400.0));
		state
	}

	#[test]
	fn bubbles_anchor_at_centroids() {
		let mut state = state(true);
		state.update(&input(&[("FRA", 100.0), ("SUN", 400.0)]));
		let centroid = state.frame.centroid_of("FRA").unwrap();
		let node = state.field.layout.node("FRA").unwrap();
		assert_eq!([node.target_x, node.target_y], centroid);
		assert_eq!(state.field.layout.node("RUS").map(|n| n.value), Some(400.0));
		assert_eq!(state.field.layout.nodes().len(), 2);
		assert_eq!(state.field.layout.status(), SimulationStatus::Simulating);
	}

	#[test]
	fn radius_domain_is_dataset_global() {
		let mut state = state(true);
		state.update(&input(&[("FRA", 1000.0)]));
		let full = state.field.layout.node("FRA").unwrap().radius;
		state.update(&input(&[("FRA", 250.0)]));
		let quarter = state.field.layout.node("FRA").unwrap().radius;
		let min = ChartConfig::default().min_radius_px;
		assert!(((quarter - min) - (full - min) / 2.0).abs() < 1e-9);
	}

	#[test]
	fn static_variant_settles_before_paint() {
		let mut state = state(false);
		state.update(&input(&[("FRA", 100.0), ("RUS", 400.0)]));
		assert_eq!(state.field.layout.status(), SimulationStatus::Idle);
		assert_eq!(
			state.field.radii.get("RUS"),
			Some(state.field.layout.node("RUS").unwrap().radius)
		);
	}

	#[test]
	fn resize_reanchors_without_new_nodes() {
		let mut state = state(true);
		state.update(&input(&[("FRA", 100.0)]));
		let before = state.frame.centroid_of("FRA").unwrap();
		state.resize(Size::new(1600.0, 800.0));
		let node = state.field.layout.node("FRA").unwrap();
		assert_ne!([node.target_x, node.target_y], before);
		assert_eq!([node.target_x, node.target_y], state.frame.centroid_of("FRA").unwrap());
		assert_eq!(state.field.layout.nodes().len(), 1);
	}

	#[test]
	fn regions_without_bubbles_report_no_data() {
		let mut state = state(false);
		state.update(&input(&[("FRA", 100.0)]));
		let [x, y] = state
			.frame
			.shapes
			.iter()
			.find(|s| s.code.is_none())
			.and_then(|s| s.centroid(&state.frame.fit))
			.unwrap();
		let tip = state.tooltip_at(x, y).unwrap();
		assert_eq!(tip.detail, "No data");
	}
}
