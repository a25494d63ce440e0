mod render;
mod state;

use std::sync::Arc;

use leptos::prelude::*;
use web_sys::CanvasRenderingContext2d;

use state::{ChoroplethInput, ChoroplethState};

use super::surface::{ChartSurface, Size, chart_canvas};
use super::tooltip::Tooltip;
use crate::atlas::WorldMap;
use crate::config::ChartConfig;
use crate::data::{ChartData, CountryCodeResolver};

impl ChartSurface for ChoroplethState {
	type Input = ChoroplethInput;

	fn mount(&mut self, size: Size) {
		ChoroplethState::mount(self, size);
	}

	fn on_resize(&mut self, size: Size) {
		self.resize(size);
	}

	fn on_data_change(&mut self, input: &ChoroplethInput) {
		self.update(input);
	}

	fn tick(&mut self, dt: f64) -> bool {
		self.fills.tick(dt)
	}

	fn paint(&self, ctx: &CanvasRenderingContext2d) {
		render::render(self, ctx);
	}

	fn hover(&self, x: f64, y: f64) -> Option<Tooltip> {
		self.tooltip_at(x, y)
	}

	fn teardown(&mut self) {
		self.fills.clear();
		self.values.clear();
	}
}

/// World map shaded by each country's value for the year.
#[component]
pub fn Choropleth(
	world: Arc<WorldMap>,
	#[prop(into)] chart_data: Signal<ChartData>,
	#[prop(into)] year: Signal<i32>,
	#[prop(into)] unit: Signal<String>,
	#[prop(into)] ceiling: Signal<Option<f64>>,
) -> impl IntoView {
	let config = use_context::<ChartConfig>().unwrap_or_default();
	let resolver = use_context::<Arc<CountryCodeResolver>>().unwrap_or_default();
	let input = Signal::derive(move || ChoroplethInput {
		chart: chart_data.get(),
		year: year.get(),
		ceiling: ceiling.get(),
		unit: unit.get(),
	});

	view! {
		<div class="chart-host choropleth">
			{chart_canvas(ChoroplethState::new(world, resolver, &config), input, None)}
		</div>
	}
}
