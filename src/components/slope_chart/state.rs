use std::collections::HashMap;

use log::debug;

use crate::components::color::{Rgb, color_for_code};
use crate::components::marks::{Lerp, MarkSet};
use crate::components::scale::{LinearScale, format_value, sane_max};
use crate::components::surface::Size;
use crate::components::tooltip::Tooltip;
use crate::config::ChartConfig;
use crate::data::AnimationChartData;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlopeInput {
	pub history: AnimationChartData,
	pub from_year: i32,
	pub to_year: i32,
	pub unit: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SlopeAttrs {
	pub start: f64,
	pub end: f64,
	pub color: Rgb,
}

impl Lerp for SlopeAttrs {
	fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			start: self.start.lerp(&to.start, t),
			end: self.end.lerp(&to.end, t),
			color: self.color.lerp(&to.color, t),
		}
	}
}

pub const MARGIN_Y: f64 = 32.0;
/// Pointer distance within which a line counts as hovered.
const HIT_DISTANCE: f64 = 6.0;

/// Two value columns joined by one line per country.
pub struct SlopeState {
	pub marks: MarkSet<SlopeAttrs>,
	pub names: HashMap<String, String>,
	pub size: Size,
	pub unit: String,
	pub years: [i32; 2],
	/// Value extremes across both columns.
	pub extent: [f64; 2],
	count: usize,
}

impl SlopeState {
	pub fn new(config: &ChartConfig) -> Self {
		Self {
			marks: MarkSet::new(config.transition_ms / 1000.0),
			names: HashMap::new(),
			size: Size::default(),
			unit: String::new(),
			years: [config.year_min, config.year_max],
			extent: [0.0, 1.0],
			count: config.slope_count.max(1),
		}
	}

	pub fn resize(&mut self, size: Size) {
		self.size = size;
	}

	/// Label space beside each column.
	pub fn margin_x(&self) -> f64 {
		(self.size.width * 0.25).clamp(60.0, 200.0)
	}

	pub fn columns(&self) -> [f64; 2] {
		let margin = self.margin_x();
		[margin, (self.size.width - margin).max(margin + 1.0)]
	}

	pub fn y_scale(&self) -> LinearScale {
		LinearScale::new(
			self.extent,
			[(self.size.height - MARGIN_Y).max(MARGIN_Y), MARGIN_Y],
		)
	}

	/// Keeps the countries with the largest end-year values among those recorded in
	/// both years.
	pub fn update(&mut self, input: &SlopeInput) {
		self.unit.clone_from(&input.unit);
		self.years = [input.from_year, input.to_year];

		let mut rows: Vec<(&str, &str, f64, f64)> = input
			.history
			.data
			.iter()
			.filter_map(|d| {
				Some((
					d.code.as_str(),
					d.country.as_str(),
					d.value_in(input.from_year)?,
					d.value_in(input.to_year)?,
				))
			})
			.collect();
		rows.sort_by(|a, b| b.3.total_cmp(&a.3));
		rows.truncate(self.count);

		let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
			(lo.min(r.2).min(r.3), hi.max(r.2).max(r.3))
		});
		self.extent = if lo.is_finite() {
			[lo.min(0.0), sane_max(hi)]
		} else {
			[0.0, 1.0]
		};

		self.names = rows
			.iter()
			.map(|(code, country, ..)| ((*code).to_owned(), (*country).to_owned()))
			.collect();
		let diff = self.marks.apply(
			rows.iter().map(|(code, _, start, end)| {
				(
					(*code).to_owned(),
					SlopeAttrs {
						start: *start,
						end: *end,
						color: color_for_code(code),
					},
				)
			}),
			|target| SlopeAttrs {
				end: target.start,
				..target.clone()
			},
		);
		debug!(
			"slope chart {}-{}: {} lines, {} entered",
			input.from_year,
			input.to_year,
			self.marks.len(),
			diff.entered.len()
		);
	}

	/// Screen endpoints of a line.
	pub fn endpoints(&self, attrs: &SlopeAttrs) -> [[f64; 2]; 2] {
		let [left, right] = self.columns();
		let y = self.y_scale();
		[[left, y.scale(attrs.start)], [right, y.scale(attrs.end)]]
	}

	/// Topmost line within reach of the pointer.
	pub fn code_at(&self, x: f64, y: f64) -> Option<&str> {
		self.marks
			.iter()
			.filter_map(|(code, attrs)| {
				let [a, b] = self.endpoints(&attrs);
				let d = segment_distance([x, y], a, b);
				(d <= HIT_DISTANCE).then_some((code, d))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(code, _)| code)
	}

	pub fn tooltip_at(&self, x: f64, y: f64) -> Option<Tooltip> {
		let code = self.code_at(x, y)?;
		let attrs = self.marks.target(code)?;
		let name = self.names.get(code).map_or(code, String::as_str);
		let detail = format!(
			"{}: {} → {}: {}",
			self.years[0],
			format_value(attrs.start, &self.unit),
			self.years[1],
			format_value(attrs.end, &self.unit)
		);
		Some(Tooltip::new(x, y, name, detail))
	}
}

fn segment_distance(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
	let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
	let len2 = dx * dx + dy * dy;
	let t = if len2 > 0.0 {
		(((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len2).clamp(0.0, 1.0)
	} else {
		0.0
	};
	(p[0] - (a[0] + t * dx)).hypot(p[1] - (a[1] + t * dy))
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use super::*;
	use crate::data::AnimationChartDatum;

	fn datum(code: &str, values: &[(i32, f64)]) -> AnimationChartDatum {
		AnimationChartDatum {
			country: format!("Country {code}"),
			code: code.into(),
			values: values.iter().copied().collect::<BTreeMap<_, _>>(),
		}
	}

	fn input(data: Vec<AnimationChartDatum>) -> SlopeInput {
		SlopeInput {
			history: AnimationChartData {
				total_size: data.len(),
				max_value: 0.0,
				data,
				all_names: Vec::new(),
			},
			from_year: 1960,
			to_year: 2020,
			unit: String::new(),
		}
	}

	fn mounted() -> SlopeState {
		let mut state = SlopeState::new(&ChartConfig::default());
		state.resize(Size::new(800.0, 464.0));
		state
	}

	#[test]
	fn keeps_largest_end_values_with_both_years() {
		let mut state = mounted();
		let mut data: Vec<AnimationChartDatum> = (0..20)
			.map(|i| datum(&format!("C{i:02}"), &[(1960, 1.0), (2020, i as f64)]))
			.collect();
		data.push(datum("ONE", &[(2020, 1000.0)]));
		data.push(datum("NAN", &[(1960, f64::NAN), (2020, 900.0)]));
		state.update(&input(data));
		assert_eq!(state.marks.len(), 12);
		assert!(state.marks.get("C19").is_some());
		assert!(state.marks.get("C07").is_none());
		assert!(state.marks.get("ONE").is_none());
		assert!(state.marks.get("NAN").is_none());
		assert_eq!(state.extent, [0.0, 19.0]);
	}

	#[test]
	fn extent_covers_both_columns() {
		let mut state = mounted();
		state.update(&input(vec![
			datum("AAA", &[(1960, 50.0), (2020, 10.0)]),
			datum("BBB", &[(1960, -5.0), (2020, 20.0)]),
		]));
		assert_eq!(state.extent, [-5.0, 50.0]);
		let y = state.y_scale();
		assert_eq!(y.scale(50.0), MARGIN_Y);
		assert_eq!(y.scale(-5.0), 464.0 - MARGIN_Y);
	}

	#[test]
	fn hover_follows_the_line() {
		let mut state = mounted();
		state.update(&input(vec![datum("AAA", &[(1960, 100.0), (2020, 0.0)])]));
		state.marks.finish();
		let [a, b] = state.endpoints(state.marks.target("AAA").unwrap());
		let mid = [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0];
		let tip = state.tooltip_at(mid[0], mid[1] + 2.0).unwrap();
		assert_eq!(tip.title, "Country AAA");
		assert_eq!(tip.detail, "1960: 100 → 2020: 0");
		assert!(state.tooltip_at(mid[0], mid[1] + 50.0).is_none());
	}

	#[test]
	fn entering_lines_start_flat() {
		let mut state = mounted();
		state.update(&input(vec![datum("AAA", &[(1960, 10.0), (2020, 30.0)])]));
		assert_eq!(state.marks.get("AAA").map(|a| a.end), Some(10.0));
		state.marks.finish();
		assert_eq!(state.marks.get("AAA").map(|a| a.end), Some(30.0));
	}

	#[test]
	fn segment_distance_clamps_to_ends() {
		assert_eq!(segment_distance([5.0, 3.0], [0.0, 0.0], [10.0, 0.0]), 3.0);
		assert_eq!(segment_distance([-3.0, 4.0], [0.0, 0.0], [10.0, 0.0]), 5.0);
		assert!((segment_distance([1.0, 1.0], [0.0, 0.0], [0.0, 0.0]) - 2f64.sqrt()).abs() < 1e-12);
	}
}
