//! Static configuration: metric catalog, year bounds and chart tuning.

/// First year covered by the bundled datasets.
pub const YEAR_MIN: i32 = 1960;
/// Last year covered by the bundled datasets.
pub const YEAR_MAX: i32 = 2023;

pub const TOPOLOGY_PATH: &str = "/data/countries-110m.json";
pub const TOPOLOGY_OBJECT: &str = "countries";

/// A metric the page can load, with an optional fixed axis ceiling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metric {
	pub id: &'static str,
	pub label: &'static str,
	pub unit: &'static str,
	/// Fixed domain ceiling for dataset-global scales. `None` falls back to the
	/// dataset's own `max_value`.
	pub ceiling: Option<f64>,
}

pub const METRICS: &[Metric] = &[
	Metric {
		id: "gdp_per_capita",
		label: "GDP (current US$)",
		unit: "USD",
		ceiling: Some(3.0e13),
	},
	Metric {
		id: "population",
		label: "Population",
		unit: "people",
		ceiling: Some(1.5e9),
	},
];

pub fn metric(id: &str) -> Option<&'static Metric> {
	METRICS.iter().find(|m| m.id == id)
}

pub fn dataset_path(metric_id: &str) -> String {
	format!("/data/{metric_id}.json")
}

/// Tuning for the force layout. Mirrors the shape of a physics simulation's
/// parameter block: strengths are per-tick fractions, decays are geometric.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParameters {
	/// Pull toward the anchor, scaled by the current energy.
	pub anchor_strength: f64,
	/// Extra gap kept between two marks.
	pub collide_padding: f64,
	/// Collision relaxation passes per tick.
	pub collide_iterations: usize,
	/// Fraction of remaining energy shed per tick.
	pub alpha_decay: f64,
	/// Energy below which the solver goes idle.
	pub alpha_min: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Distance from the anchor at which new nodes are seeded.
	pub seed_radius: f64,
}

impl Default for ForceParameters {
	fn default() -> Self {
		Self {
			anchor_strength: 0.05,
			collide_padding: 1.0,
			collide_iterations: 2,
			alpha_decay: 0.0228,
			alpha_min: 0.001,
			velocity_decay: 0.4,
			seed_radius: 40.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
	pub year_min: i32,
	pub year_max: i32,
	/// Playback cadence, one year per interval.
	pub playback_interval_ms: u32,
	/// Duration of attribute transitions on data change.
	pub transition_ms: f64,
	pub bar_count: usize,
	pub slope_count: usize,
	pub min_radius_px: f64,
	/// Largest bubble radius as a fraction of the container width.
	pub max_radius_fraction: f64,
	/// Ticks run synchronously per data change by the static bubble map.
	pub static_layout_ticks: usize,
	/// Only let a successor inherit its predecessor's value for years before the breakup.
	pub gate_succession: bool,
	pub force: ForceParameters,
}

impl Default for ChartConfig {
	fn default() -> Self {
		Self {
			year_min: YEAR_MIN,
			year_max: YEAR_MAX,
			playback_interval_ms: 700,
			transition_ms: 600.0,
			bar_count: 15,
			slope_count: 12,
			min_radius_px: 2.0,
			max_radius_fraction: 0.06,
			static_layout_ticks: 300,
			gate_succession: false,
			force: ForceParameters::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn metric_lookup_and_paths() {
		let gdp = metric("gdp_per_capita").unwrap();
		assert_eq!(gdp.unit, "USD");
		assert!(metric("unknown").is_none());
		assert_eq!(dataset_path("population"), "/data/population.json");
	}

	#[test]
	fn default_year_range_is_ordered() {
		let config = ChartConfig::default();
		assert!(config.year_min < config.year_max);
		assert!(config.force.alpha_decay > 0.0 && config.force.alpha_decay < 1.0);
	}
}
