//! Scales, domain policy and value formatting.

use crate::data::ChartData;

/// Whether a chart rescales every frame or holds one scale for the whole dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainPolicy {
	/// Recomputed from the current slice for maximum contrast.
	YearLocal,
	/// Fixed across years so playback does not make marks jump.
	DatasetGlobal,
}

/// Upper domain bound under `policy`. Dataset-global domains use the ceiling when it
/// covers the whole collection and the collection maximum otherwise, so the result is
/// the same for every year of one collection. Never returns zero.
pub fn domain_max(policy: DomainPolicy, chart: &ChartData, ceiling: Option<f64>) -> f64 {
	let local = chart.local_max().unwrap_or(0.0);
	let max = match policy {
		DomainPolicy::YearLocal => local,
		DomainPolicy::DatasetGlobal => {
			// a stale max_value in the file must not cut off a visible value
			let global = chart.max_value.max(local);
			match ceiling.filter(|c| c.is_finite() && *c >= global) {
				Some(ceiling) => ceiling,
				None => global,
			}
		}
	};
	sane_max(max)
}

/// Guards against empty or all-zero slices.
pub fn sane_max(max: f64) -> f64 {
	if max.is_finite() && max > 0.0 { max } else { 1.0 }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
	domain: [f64; 2],
	range: [f64; 2],
}

impl LinearScale {
	/// A zero-width domain is widened to one unit.
	pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
		let span = domain[1] - domain[0];
		let domain = if span.abs() < f64::EPSILON || !span.is_finite() {
			[domain[0], domain[0] + 1.0]
		} else {
			domain
		};
		Self { domain, range }
	}

	pub fn domain(&self) -> [f64; 2] {
		self.domain
	}

	pub fn scale(&self, value: f64) -> f64 {
		let t = (value - self.domain[0]) / (self.domain[1] - self.domain[0]);
		self.range[0] + t * (self.range[1] - self.range[0])
	}

	pub fn ticks(&self, count: usize) -> Vec<f64> {
		ticks(self.domain[0], self.domain[1], count)
	}
}

/// Square-root scale from `[0, max]`: area, not radius, tracks the value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SqrtScale {
	max: f64,
	range: [f64; 2],
}

impl SqrtScale {
	pub fn new(max: f64, range: [f64; 2]) -> Self {
		Self {
			max: sane_max(max),
			range,
		}
	}

	/// Radius bounds: `min_px` up to `fraction` of `width`, never below `min_px`.
	pub fn radius(max: f64, min_px: f64, width: f64, fraction: f64) -> Self {
		let max_px = (width * fraction).max(min_px);
		Self::new(max, [min_px, max_px])
	}

	pub fn scale(&self, value: f64) -> f64 {
		let t = (value.max(0.0) / self.max).sqrt().min(1.0);
		self.range[0] + t * (self.range[1] - self.range[0])
	}
}

/// Round tick values covering `[start, stop]`, roughly `count` of them.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
	if !(start.is_finite() && stop.is_finite()) || count == 0 || start == stop {
		return vec![start];
	}
	let (lo, hi) = if start < stop { (start, stop) } else { (stop, start) };
	let step = tick_step(lo, hi, count);
	let first = (lo / step).ceil() as i64;
	let last = (hi / step).floor() as i64;
	let mut out: Vec<f64> = (first..=last).map(|i| i as f64 * step).collect();
	if start > stop {
		out.reverse();
	}
	out
}

fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
	let raw = (hi - lo) / count as f64;
	let power = 10f64.powf(raw.log10().floor());
	let error = raw / power;
	let factor = if error >= 50f64.sqrt() {
		10.0
	} else if error >= 10f64.sqrt() {
		5.0
	} else if error >= 2f64.sqrt() {
		2.0
	} else {
		1.0
	};
	factor * power
}

/// Short human form: `1.2T`, `350B`, `12.3M`, `4.5k`. USD values get a `$` prefix.
pub fn format_value(value: f64, unit: &str) -> String {
	if !value.is_finite() {
		return "No data".into();
	}
	const TIERS: [(f64, &str); 5] = [(1.0, ""), (1e3, "k"), (1e6, "M"), (1e9, "B"), (1e12, "T")];
	let abs = value.abs();
	let mut tier = TIERS.iter().rposition(|(divisor, _)| abs >= *divisor).unwrap_or(0);
	// 999_950 rounds to 1000k, which reads as 1M
	if tier + 1 < TIERS.len() && rounded(abs / TIERS[tier].0) >= 1000.0 {
		tier += 1;
	}
	let (divisor, suffix) = TIERS[tier];
	let scaled = value / divisor;
	let shown = rounded(scaled.abs());
	let digits = if shown >= 100.0 || shown.fract() == 0.0 { 0 } else { 1 };
	let number = format!("{scaled:.digits$}{suffix}");
	match unit {
		"USD" if number.starts_with('-') => format!("-${}", &number[1..]),
		"USD" => format!("${number}"),
		_ => number,
	}
}

/// `value` as printed by [`format_value`]: whole from 100 up, one decimal below.
fn rounded(value: f64) -> f64 {
	if value >= 99.95 { value.round() } else { (value * 10.0).round() / 10.0 }
}

/// Characters that fit in `width_px` at `char_px` per character.
pub fn max_chars(width_px: f64, char_px: f64) -> usize {
	if char_px <= 0.0 || !width_px.is_finite() {
		return 0;
	}
	(width_px / char_px).floor().max(0.0) as usize
}

/// Cuts `label` to `max` characters, ending with an ellipsis when cut.
pub fn truncate_label(label: &str, max: usize) -> String {
	let count = label.chars().count();
	if count <= max {
		return label.to_owned();
	}
	if max == 0 {
		return String::new();
	}
	let mut out: String = label.chars().take(max - 1).collect();
	out.push('…');
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::ChartDatum;

	fn chart(values: &[f64], max_value: f64) -> ChartData {
		ChartData {
			total_size: values.len(),
			max_value,
			data: values
				.iter()
				.enumerate()
				.map(|(i, v)| ChartDatum {
					country: format!("C{i}"),
					code: format!("C{i:02}"),
					value: *v,
				})
				.collect(),
			all_names: Vec::new(),
		}
	}

	#[test]
	fn domain_policy_picks_local_or_global() {
		let data = chart(&[50.0, 10.0], 400.0);
		assert_eq!(domain_max(DomainPolicy::YearLocal, &data, Some(1000.0)), 50.0);
		assert_eq!(domain_max(DomainPolicy::DatasetGlobal, &data, None), 400.0);
		assert_eq!(domain_max(DomainPolicy::DatasetGlobal, &data, Some(1000.0)), 1000.0);
		// a ceiling below the collection maximum gives way to it
		assert_eq!(domain_max(DomainPolicy::DatasetGlobal, &data, Some(20.0)), 400.0);
	}

	#[test]
	fn global_domain_holds_across_years_with_aggregates() {
		use crate::data::{CountryRecord, MetricDataset, project};

		let record = |country: &str, code: &str, values: &[(&str, f64)]| CountryRecord {
			country: country.into(),
			code: code.into(),
			values: values.iter().map(|(y, v)| (y.to_string(), *v)).collect(),
		};
		let dataset = MetricDataset {
			metric_id: "population".into(),
			data: vec![
				record("World", "WLD", &[("1960", 3.0e9), ("2023", 8.0e9)]),
				record("China", "CHN", &[("1960", 0.66e9), ("2023", 1.41e9)]),
			],
			..Default::default()
		}
		.prepare();
		let domain = |year, only_countries| {
			let chart = project(&dataset, year, only_countries);
			domain_max(DomainPolicy::DatasetGlobal, &chart, Some(1.5e9))
		};

		assert_eq!(domain(1960, false), domain(2023, false));
		assert_eq!(domain(1960, false), 8.0e9);
		// the countries-only collection fits under the ceiling in every year
		assert_eq!((domain(1960, true), domain(2023, true)), (1.5e9, 1.5e9));
	}

	#[test]
	fn degenerate_domains_clamp() {
		let empty = chart(&[], 0.0);
		assert_eq!(domain_max(DomainPolicy::YearLocal, &empty, None), 1.0);
		assert_eq!(domain_max(DomainPolicy::DatasetGlobal, &empty, None), 1.0);

		let flat = LinearScale::new([5.0, 5.0], [0.0, 100.0]);
		assert!(flat.scale(5.0).is_finite());
		assert_eq!(flat.domain(), [5.0, 6.0]);

		let radius = SqrtScale::new(0.0, [2.0, 40.0]);
		assert_eq!(radius.scale(0.0), 2.0);
		assert!(radius.scale(10.0).is_finite());
	}

	#[test]
	fn sqrt_scale_tracks_area() {
		let scale = SqrtScale::new(100.0, [0.0, 10.0]);
		assert_eq!(scale.scale(100.0), 10.0);
		assert_eq!(scale.scale(25.0), 5.0);
		assert_eq!(scale.scale(-5.0), 0.0);
		assert_eq!(scale.scale(400.0), 10.0);

		let radius = SqrtScale::radius(100.0, 2.0, 1000.0, 0.06);
		assert_eq!(radius.scale(100.0), 60.0);
		let tiny = SqrtScale::radius(100.0, 2.0, 10.0, 0.06);
		assert_eq!(tiny.scale(100.0), 2.0);
	}

	#[test]
	fn linear_scale_maps_range() {
		let scale = LinearScale::new([0.0, 200.0], [10.0, 110.0]);
		assert_eq!(scale.scale(100.0), 60.0);
		assert_eq!(scale.ticks(4), [0.0, 50.0, 100.0, 150.0, 200.0]);
	}

	#[test]
	fn nice_ticks() {
		let close = |a: &[f64], b: &[f64]| {
			a.len() == b.len()
				&& a.iter()
					.zip(b)
					.all(|(x, y)| (x - y).abs() <= 1e-9 * y.abs().max(1.0))
		};
		assert!(close(&ticks(0.0, 1.0, 5), &[0.0, 0.2, 0.4, 0.6, 0.8, 1.0]));
		assert!(close(&ticks(0.0, 3.0e13, 5), &[0.0, 5e12, 1e13, 1.5e13, 2e13, 2.5e13, 3e13]));
		assert!(close(&ticks(10.0, 0.0, 2), &[10.0, 5.0, 0.0]));
		assert_eq!(ticks(3.0, 3.0, 5), [3.0]);
	}

	#[test]
	fn formats_values() {
		assert_eq!(format_value(1.234e12, "USD"), "$1.2T");
		assert_eq!(format_value(350e9, "USD"), "$350B");
		assert_eq!(format_value(12.34e6, "people"), "12.3M");
		assert_eq!(format_value(-4_500.0, "USD"), "-$4.5k");
		assert_eq!(format_value(12.0, ""), "12");
		assert_eq!(format_value(999_950.0, "people"), "1M");
		assert_eq!(format_value(999_400.0, "people"), "999k");
		assert_eq!(format_value(-999_950.0, "USD"), "-$1M");
		assert_eq!(format_value(999.96, ""), "1k");
		assert_eq!(format_value(f64::NAN, "USD"), "No data");
	}

	#[test]
	fn truncates_labels_to_margin() {
		assert_eq!(max_chars(100.0, 7.0), 14);
		assert_eq!(max_chars(100.0, 0.0), 0);
		assert_eq!(truncate_label("Bosnia and Herzegovina", 10), "Bosnia an…");
		assert_eq!(truncate_label("Chad", 10), "Chad");
		assert_eq!(truncate_label("Chad", 0), "");
		assert_eq!(truncate_label("Côte d'Ivoire", 5).chars().count(), 5);
	}
}
