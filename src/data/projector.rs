use std::collections::{BTreeMap, HashMap};

use super::dataset::MetricDataset;

/// A single country's value for one resolved year.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartDatum {
	pub country: String,
	pub code: String,
	pub value: f64,
}

/// One year's slice of a dataset, sorted largest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartData {
	pub total_size: usize,
	/// Dataset-wide maximum; charts with year-local domains ignore it.
	pub max_value: f64,
	pub data: Vec<ChartDatum>,
	/// Every country in the source collection, with or without a value this year.
	pub all_names: Vec<String>,
}

impl ChartData {
	/// Largest value present in this slice.
	pub fn local_max(&self) -> Option<f64> {
		self.data.first().map(|d| d.value)
	}

	pub fn year_map(&self) -> HashMap<String, f64> {
		self.data
			.iter()
			.map(|d| (d.code.clone(), d.value))
			.collect()
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationChartDatum {
	pub country: String,
	pub code: String,
	pub values: BTreeMap<i32, f64>,
}

impl AnimationChartDatum {
	pub fn value_in(&self, year: i32) -> Option<f64> {
		self.values.get(&year).copied().filter(|v| v.is_finite())
	}
}

/// The full per-year series for client-side animation across years.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationChartData {
	pub total_size: usize,
	pub max_value: f64,
	pub data: Vec<AnimationChartDatum>,
	pub all_names: Vec<String>,
}

impl AnimationChartData {
	/// Code to value for one year, skipping countries with no finite value.
	pub fn year_map(&self, year: i32) -> HashMap<String, f64> {
		self.data
			.iter()
			.filter_map(|d| d.value_in(year).map(|v| (d.code.clone(), v)))
			.collect()
	}

	pub fn history(&self, code: &str) -> Option<&AnimationChartDatum> {
		self.data.iter().find(|d| d.code == code)
	}
}

/// Slices `dataset` to `year`, dropping countries without a finite value and sorting
/// the rest in descending order.
pub fn project(dataset: &MetricDataset, year: i32, only_countries: bool) -> ChartData {
	let records = dataset.records(only_countries);
	let mut data: Vec<ChartDatum> = records
		.iter()
		.filter_map(|record| {
			record.value_in(year).map(|value| ChartDatum {
				country: record.country.clone(),
				code: record.code.clone(),
				value,
			})
		})
		.collect();
	data.sort_by(|a, b| b.value.total_cmp(&a.value));

	ChartData {
		total_size: records.len(),
		max_value: dataset.max_for(only_countries).unwrap_or(0.0),
		data,
		all_names: records.iter().map(|r| r.country.clone()).collect(),
	}
}

/// Keeps every record's full series; year keys that are not integers are dropped.
pub fn project_animated(dataset: &MetricDataset, only_countries: bool) -> AnimationChartData {
	let records = dataset.records(only_countries);
	let data = records
		.iter()
		.map(|record| AnimationChartDatum {
			country: record.country.clone(),
			code: record.code.clone(),
			values: record
				.values
				.iter()
				.filter_map(|(year, value)| year.parse::<i32>().ok().map(|y| (y, *value)))
				.collect(),
		})
		.collect();

	AnimationChartData {
		total_size: records.len(),
		max_value: dataset.max_for(only_countries).unwrap_or(0.0),
		data,
		all_names: records.iter().map(|r| r.country.clone()).collect(),
	}
}
