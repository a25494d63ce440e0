mod state;

use leptos::prelude::*;
use web_sys::CanvasRenderingContext2d;

pub use state::{BubbleInput, BubbleState};

use super::bubbles::paint_bubbles;
use super::surface::{ChartSurface, Size, chart_canvas};
use super::tooltip::Tooltip;
use crate::config::ChartConfig;
use crate::data::ChartData;

impl ChartSurface for BubbleState {
	type Input = BubbleInput;

	fn mount(&mut self, size: Size) {
		self.resize(size);
	}

	fn on_resize(&mut self, size: Size) {
		self.resize(size);
	}

	fn on_data_change(&mut self, input: &BubbleInput) {
		self.update(input);
	}

	fn tick(&mut self, dt: f64) -> bool {
		self.field.tick(dt)
	}

	fn paint(&self, ctx: &CanvasRenderingContext2d) {
		ctx.clear_rect(0.0, 0.0, self.size.width, self.size.height);
		paint_bubbles(&self.field, ctx);
	}

	fn hover(&self, x: f64, y: f64) -> Option<Tooltip> {
		self.field.tooltip_at(x, y, &self.unit)
	}

	fn teardown(&mut self) {
		self.field.clear();
	}
}

/// Packed bubbles, one per country, sized by value.
#[component]
pub fn BubbleChart(
	#[prop(into)] chart_data: Signal<ChartData>,
	#[prop(into)] unit: Signal<String>,
) -> impl IntoView {
	let config = use_context::<ChartConfig>().unwrap_or_default();
	let input = Signal::derive(move || BubbleInput {
		chart: chart_data.get(),
		unit: unit.get(),
	});

	view! {
		<div class="chart-host bubble-chart">
			{chart_canvas(BubbleState::new(&config), input, None)}
		</div>
	}
}
