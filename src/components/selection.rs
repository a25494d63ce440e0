//! Cross-chart country selection and the trend panel it reveals.

use std::collections::BTreeMap;

use leptos::prelude::*;

use super::scale::format_value;

/// Clicking the selected country clears the selection; anything else selects it.
pub fn toggle_selection(current: Option<&str>, clicked: &str) -> Option<String> {
	match current {
		Some(code) if code == clicked => None,
		_ => Some(clicked.to_owned()),
	}
}

/// Selection owned by the caller when `external` is given, otherwise kept here.
#[derive(Clone, Copy)]
pub struct Selection {
	external: Option<Signal<Option<String>>>,
	internal: RwSignal<Option<String>>,
	on_change: Option<Callback<Option<String>>>,
}

impl Selection {
	pub fn new(
		external: Option<Signal<Option<String>>>,
		on_change: Option<Callback<Option<String>>>,
	) -> Self {
		Self {
			external,
			internal: RwSignal::new(None),
			on_change,
		}
	}

	pub fn current(&self) -> Option<String> {
		match self.external {
			Some(signal) => signal.get(),
			None => self.internal.get(),
		}
	}

	pub fn toggle(&self, clicked: &str) {
		let current = match self.external {
			Some(signal) => signal.get_untracked(),
			None => self.internal.get_untracked(),
		};
		let next = toggle_selection(current.as_deref(), clicked);
		if self.external.is_none() {
			self.internal.set(next.clone());
		}
		if let Some(on_change) = self.on_change {
			on_change.run(next);
		}
	}
}

/// First and last recorded points of a series and the change between them.
#[derive(Clone, Debug, PartialEq)]
pub struct TrendSummary {
	pub start_year: i32,
	pub end_year: i32,
	pub start: f64,
	pub end: f64,
	pub delta: f64,
	/// `None` when the series starts at zero.
	pub percent: Option<f64>,
}

impl TrendSummary {
	/// Needs at least two finite points.
	pub fn from_series(values: &BTreeMap<i32, f64>) -> Option<Self> {
		let mut finite = values.iter().filter(|(_, v)| v.is_finite());
		let (&start_year, &start) = finite.next()?;
		let (&end_year, &end) = finite.last()?;
		let delta = end - start;
		let percent = (start != 0.0).then(|| delta / start.abs() * 100.0);
		Some(Self {
			start_year,
			end_year,
			start,
			end,
			delta,
			percent,
		})
	}

	pub fn describe(&self, unit: &str) -> String {
		let sign = if self.delta >= 0.0 { "+" } else { "" };
		let delta = format!("{sign}{}", format_value(self.delta, unit));
		match self.percent {
			Some(p) => format!(
				"{}–{}: {delta} ({sign}{p:.1}%)",
				self.start_year, self.end_year
			),
			None => format!("{}–{}: {delta}", self.start_year, self.end_year),
		}
	}
}

/// Polyline points for `values` scaled into a `width` x `height` box.
pub fn sparkline_points(values: &BTreeMap<i32, f64>, width: f64, height: f64) -> String {
	let points: Vec<(i32, f64)> = values
		.iter()
		.filter(|(_, v)| v.is_finite())
		.map(|(y, v)| (*y, *v))
		.collect();
	let (Some(first), Some(last)) = (points.first(), points.last()) else {
		return String::new();
	};
	let span_x = ((last.0 - first.0) as f64).max(1.0);
	let (lo, hi) = points
		.iter()
		.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| (lo.min(*v), hi.max(*v)));
	let span_y = if hi - lo > 0.0 { hi - lo } else { 1.0 };
	points
		.iter()
		.map(|(year, value)| {
			let x = (year - first.0) as f64 / span_x * width;
			let y = height - (value - lo) / span_y * height;
			format!("{x:.1},{y:.1}")
		})
		.collect::<Vec<_>>()
		.join(" ")
}

const SPARK_WIDTH: f64 = 220.0;
const SPARK_HEIGHT: f64 = 60.0;

/// Small multi-year line plot for the selected country.
#[component]
pub fn TrendPanel(country: String, values: BTreeMap<i32, f64>, unit: String) -> impl IntoView {
	let summary = TrendSummary::from_series(&values);
	let points = sparkline_points(&values, SPARK_WIDTH, SPARK_HEIGHT);
	let caption = summary.map(|s| s.describe(&unit)).unwrap_or_else(|| "Not enough data".into());

	view! {
		<div class="trend-panel">
			<h3>{country}</h3>
			<svg
				width=SPARK_WIDTH
				height=SPARK_HEIGHT
				viewBox=format!("0 0 {SPARK_WIDTH} {SPARK_HEIGHT}")
			>
				<polyline points=points fill="none" stroke="#1f77b4" stroke-width="1.5" />
			</svg>
			<p class="trend-caption">{caption}</p>
		</div>
	}
}
