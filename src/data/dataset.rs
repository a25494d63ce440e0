use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

use super::countries::is_real_country;
use crate::error::{ChartError, Result};

/// One country's (or aggregate's) sparse series of yearly values.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CountryRecord {
	pub country: String,
	pub code: String,
	#[serde(default, deserialize_with = "numeric_values")]
	pub values: BTreeMap<String, f64>,
}

impl CountryRecord {
	pub fn value_in(&self, year: i32) -> Option<f64> {
		self.values
			.get(&year.to_string())
			.copied()
			.filter(|v| v.is_finite())
	}
}

/// The static payload for one metric, as served from `/data/{metric_id}.json`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct MetricDataset {
	pub metric_id: String,
	#[serde(default)]
	pub unit: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub source: Option<String>,
	#[serde(default)]
	pub max_value: Option<f64>,
	#[serde(default)]
	pub only_countries_max_value: Option<f64>,
	#[serde(default)]
	pub data: Vec<CountryRecord>,
	#[serde(default)]
	pub only_countries: Vec<CountryRecord>,
}

impl MetricDataset {
	/// Decodes, fills in derived fields and checks code uniqueness.
	pub fn from_json(text: &str) -> Result<Self> {
		let dataset: MetricDataset =
			serde_json::from_str(text).map_err(|e| ChartError::decode("dataset", e))?;
		let dataset = dataset.prepare();
		dataset.validate()?;
		Ok(dataset)
	}

	/// Derives `only_countries` and the two maxima when the file omits them.
	pub fn prepare(mut self) -> Self {
		if self.only_countries.is_empty() {
			self.only_countries = self
				.data
				.iter()
				.filter(|r| is_real_country(&r.code))
				.cloned()
				.collect();
		}
		if self.max_value.is_none() {
			self.max_value = series_max(&self.data);
		}
		if self.only_countries_max_value.is_none() {
			self.only_countries_max_value = series_max(&self.only_countries);
		}
		self
	}

	/// Codes key every diff and layout node, so each collection must not repeat one.
	pub fn validate(&self) -> Result<()> {
		ensure_unique(&self.data, "data")?;
		ensure_unique(&self.only_countries, "only_countries")
	}

	pub fn records(&self, only_countries: bool) -> &[CountryRecord] {
		if only_countries {
			&self.only_countries
		} else {
			&self.data
		}
	}

	pub fn max_for(&self, only_countries: bool) -> Option<f64> {
		if only_countries {
			self.only_countries_max_value
		} else {
			self.max_value
		}
	}
}

fn series_max(records: &[CountryRecord]) -> Option<f64> {
	records
		.iter()
		.flat_map(|r| r.values.values())
		.copied()
		.filter(|v| v.is_finite())
		.fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
}

fn ensure_unique(records: &[CountryRecord], collection: &'static str) -> Result<()> {
	let mut seen = HashSet::with_capacity(records.len());
	for record in records {
		if !seen.insert(record.code.as_str()) {
			return Err(ChartError::DuplicateCode {
				code: record.code.clone(),
				collection,
			});
		}
	}
	Ok(())
}

/// Keeps numeric year values and drops anything else (`null`, strings).
fn numeric_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
	Ok(raw
		.into_iter()
		.filter_map(|(year, value)| value.as_f64().map(|v| (year, v)))
		.collect())
}
