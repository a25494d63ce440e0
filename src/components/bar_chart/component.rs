use leptos::prelude::*;
use web_sys::CanvasRenderingContext2d;

use super::render;
use super::state::{BarInput, BarState};
use crate::components::selection::{Selection, TrendPanel};
use crate::components::surface::{ChartSurface, Size, chart_canvas};
use crate::components::tooltip::Tooltip;
use crate::config::ChartConfig;
use crate::data::{AnimationChartData, ChartData};

impl ChartSurface for BarState {
	type Input = BarInput;

	fn mount(&mut self, size: Size) {
		self.resize(size);
	}

	fn on_resize(&mut self, size: Size) {
		self.resize(size);
	}

	fn on_data_change(&mut self, input: &BarInput) {
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

	fn pick(&self, x: f64, y: f64) -> Option<String> {
		self.code_at(x, y).map(str::to_owned)
	}

	fn teardown(&mut self) {
		self.marks.clear();
		self.rows.clear();
	}
}

/// Horizontal bars for the largest values of one year. Clicking a bar or its label
/// toggles the selected country; with `history_by_country` the selection also opens
/// a trend panel.
#[component]
pub fn BarChart(
	#[prop(into)] chart_data: Signal<ChartData>,
	#[prop(into)] unit: Signal<String>,
	#[prop(into)] ceiling: Signal<Option<f64>>,
	#[prop(optional, into)] selected_country: Option<Signal<Option<String>>>,
	#[prop(optional, into)] on_select_country: Option<Callback<Option<String>>>,
	#[prop(optional, into)] history_by_country: Option<Signal<AnimationChartData>>,
) -> impl IntoView {
	let config = use_context::<ChartConfig>().unwrap_or_default();
	let selection = Selection::new(selected_country, on_select_country);

	let input = Signal::derive(move || BarInput {
		chart: chart_data.get(),
		ceiling: ceiling.get(),
		unit: unit.get(),
		selected: selection.current(),
	});
	let on_pick = Callback::new(move |code: String| selection.toggle(&code));

	let trend = move || {
		let code = selection.current()?;
		let history = history_by_country?;
		let (country, values) = history.with(|h| {
			h.history(&code)
				.map(|d| (d.country.clone(), d.values.clone()))
		})?;
		Some(view! { <TrendPanel country=country values=values unit=unit.get() /> })
	};

	view! {
		<div class="bar-chart">
			<div class="chart-host">
				{chart_canvas(BarState::new(&config), input, Some(on_pick))}
			</div>
			{trend}
		</div>
	}
}
