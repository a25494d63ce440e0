mod render;
mod state;

use leptos::prelude::*;
use web_sys::CanvasRenderingContext2d;

use state::{SlopeInput, SlopeState};

use super::surface::{ChartSurface, Size, chart_canvas};
use super::tooltip::Tooltip;
use crate::config::ChartConfig;
use crate::data::AnimationChartData;

impl ChartSurface for SlopeState {
	type Input = SlopeInput;

	fn mount(&mut self, size: Size) {
		self.resize(size);
	}

	fn on_resize(&mut self, size: Size) {
		self.resize(size);
	}

	fn on_data_change(&mut self, input: &SlopeInput) {
		self.update(input);
	}

	fn tick(&mut self, dt: f64) -> bool {
		self.marks.tick(dt)
	}

	fn paint(&self, ctx: &CanvasRenderingContext2d) {
		render::render(self, ctx);
	}

	fn hover(&self, x: f64, y: f64) -> Option<Tooltip> {
		self.tooltip_at(x, y)
	}

	fn teardown(&mut self) {
		self.marks.clear();
		self.names.clear();
	}
}

/// How the leading countries moved between two years.
#[component]
pub fn SlopeChart(
	#[prop(into)] history: Signal<AnimationChartData>,
	#[prop(into)] unit: Signal<String>,
	#[prop(optional)] from_year: Option<i32>,
	#[prop(optional)] to_year: Option<i32>,
) -> impl IntoView {
	let config = use_context::<ChartConfig>().unwrap_or_default();
	let from_year = from_year.unwrap_or(config.year_min);
	let to_year = to_year.unwrap_or(config.year_max);
	let input = Signal::derive(move || SlopeInput {
		history: history.get(),
		from_year,
		to_year,
		unit: unit.get(),
	});

	view! {
		<div class="chart-host slope-chart">
			{chart_canvas(SlopeState::new(&config), input, None)}
		</div>
	}
}
