use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::atlas::WorldMap;
use crate::components::ChartKind;
use crate::components::color::{NO_DATA, Rgb, ramp};
use crate::components::marks::MarkSet;
use crate::components::scale::{domain_max, format_value};
use crate::components::surface::Size;
use crate::components::tooltip::Tooltip;
use crate::components::world::WorldFrame;
use crate::config::ChartConfig;
use crate::data::{ChartData, CountryCodeResolver};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChoroplethInput {
	pub chart: ChartData,
	pub year: i32,
	pub ceiling: Option<f64>,
	pub unit: String,
}

pub const LEGEND_HEIGHT: f64 = 40.0;
pub const PADDING: f64 = 8.0;

/// Ramp position for `value`: the square root of its share of the domain, so the
/// long tail of small economies still separates.
pub fn fill_for(value: Option<f64>, domain: f64) -> Rgb {
	match value {
		Some(v) if v.is_finite() => ramp((v.max(0.0) / domain).sqrt()),
		_ => NO_DATA,
	}
}

/// Legend colors at evenly spaced values from zero to `domain`, so a swatch halfway
/// along the legend matches a country at half the domain.
pub fn legend_ramp(domain: f64, steps: usize) -> Vec<Rgb> {
	let last = steps.saturating_sub(1).max(1) as f64;
	(0..steps)
		.map(|i| fill_for(Some(domain * i as f64 / last), domain))
		.collect()
}

pub struct ChoroplethState {
	pub frame: WorldFrame,
	pub fills: MarkSet<Rgb>,
	/// Resolved value per mapped code for the current year, successors included.
	pub values: HashMap<String, f64>,
	pub domain: f64,
	pub unit: String,
	pub size: Size,
	resolver: Arc<CountryCodeResolver>,
	gate_succession: bool,
}

impl ChoroplethState {
	pub fn new(
		world: Arc<WorldMap>,
		resolver: Arc<CountryCodeResolver>,
		config: &ChartConfig,
	) -> Self {
		Self {
			frame: WorldFrame::new(world),
			fills: MarkSet::new(config.transition_ms / 1000.0),
			values: HashMap::new(),
			domain: 1.0,
			unit: String::new(),
			size: Size::default(),
			resolver,
			gate_succession: config.gate_succession,
		}
	}

	pub fn mount(&mut self, size: Size) {
		self.frame.mount();
		self.resize(size);
	}

	pub fn resize(&mut self, size: Size) {
		self.size = size;
		self.frame
			.fit_to(size.width, (size.height - LEGEND_HEIGHT).max(0.0), PADDING);
	}

	pub fn update(&mut self, input: &ChoroplethInput) {
		let policy = ChartKind::Choropleth.domain_policy();
		self.domain = domain_max(policy, &input.chart, input.ceiling);
		self.unit.clone_from(&input.unit);

		let year_map = input.chart.year_map();
		self.values = self
			.frame
			.shapes
			.iter()
			.filter_map(|shape| shape.code.as_deref())
			.filter_map(|code| {
				self.resolver
					.resolve_value(code, input.year, &year_map, self.gate_succession)
					.map(|v| (code.to_owned(), v))
			})
			.collect();

		let domain = self.domain;
		let values = &self.values;
		let targets = self
			.frame
			.shapes
			.iter()
			.filter_map(|shape| shape.code.clone())
			.map(|code| {
				let fill = fill_for(values.get(&code).copied(), domain);
				(code, fill)
			});
		let diff = self.fills.apply(targets, |_| NO_DATA);
		debug!(
			"choropleth: {} regions with data, {} entered",
			self.values.len(),
			diff.entered.len()
		);
	}

	/// Unmapped regions and regions without a value keep the placeholder fill.
	pub fn fill_of(&self, code: Option<&str>) -> Rgb {
		code.and_then(|c| self.fills.get(c)).unwrap_or(NO_DATA)
	}

	pub fn tooltip_at(&self, x: f64, y: f64) -> Option<Tooltip> {
		let shape = self.frame.shape_at(x, y)?;
		let value = shape
			.code
			.as_deref()
			.and_then(|code| self.values.get(code))
			.copied();
		let detail = value.map_or_else(|| "No data".to_owned(), |v| format_value(v, &self.unit));
		Some(Tooltip::new(x, y, &shape.name, detail))
	}
}
