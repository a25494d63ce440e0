//! Loading the static dataset and topology files.

use gloo_net::http::Request;
use log::{error, info};

use crate::atlas::WorldMap;
use crate::config::{TOPOLOGY_OBJECT, TOPOLOGY_PATH, dataset_path};
use crate::data::{CountryCodeResolver, MetricDataset};
use crate::error::{ChartError, Result};

async fn fetch_text(path: &str) -> Result<String> {
	let fetch_error = |message: String| ChartError::Fetch {
		path: path.to_owned(),
		message,
	};
	let resp = Request::get(path)
		.send()
		.await
		.map_err(|e| fetch_error(e.to_string()))?;
	if !resp.ok() {
		return Err(fetch_error(format!("HTTP {}", resp.status())));
	}
	resp.text().await.map_err(|e| fetch_error(e.to_string()))
}

/// Fetches `/data/{metric_id}.json` and prepares it for projection.
pub async fn load_dataset(metric_id: &str) -> Result<MetricDataset> {
	let path = dataset_path(metric_id);
	let loaded = fetch_text(&path)
		.await
		.and_then(|text| MetricDataset::from_json(&text));
	match &loaded {
		Ok(dataset) => info!(
			"loaded {metric_id}: {} records, {} countries",
			dataset.data.len(),
			dataset.only_countries.len()
		),
		Err(err) => error!("{err}"),
	}
	loaded
}

/// Fetches and decodes the world topology used by the map charts.
pub async fn load_world(resolver: &CountryCodeResolver) -> Result<WorldMap> {
	let loaded = fetch_text(TOPOLOGY_PATH)
		.await
		.and_then(|text| WorldMap::from_topojson(&text, TOPOLOGY_OBJECT, resolver));
	match &loaded {
		Ok(world) => info!("loaded world topology: {} countries", world.len()),
		Err(err) => error!("{err}"),
	}
	loaded
}
