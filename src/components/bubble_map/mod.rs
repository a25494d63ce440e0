mod state;

use std::sync::Arc;

use leptos::prelude::*;
use web_sys::CanvasRenderingContext2d;

use state::{BubbleMapInput, BubbleMapState};

use super::bubbles::paint_bubbles;
use super::surface::{ChartSurface, Size, chart_canvas};
use super::tooltip::Tooltip;
use crate::atlas::WorldMap;
use crate::config::ChartConfig;
use crate::data::{ChartData, CountryCodeResolver};

const LAND: &str = "#ececec";

impl ChartSurface for BubbleMapState {
	type Input = BubbleMapInput;

	fn mount(&mut self, size: Size) {
		BubbleMapState::mount(self, size);
	}

	fn on_resize(&mut self, size: Size) {
		self.resize(size);
	}

	fn on_data_change(&mut self, input: &BubbleMapInput) {
		self.update(input);
	}

	fn tick(&mut self, dt: f64) -> bool {
		self.field.tick(dt)
	}

	fn paint(&self, ctx: &CanvasRenderingContext2d) {
		ctx.clear_rect(0.0, 0.0, self.size.width, self.size.height);
		self.frame.paint(ctx, |_| LAND.to_owned());
		paint_bubbles(&self.field, ctx);
	}

	fn hover(&self, x: f64, y: f64) -> Option<Tooltip> {
		self.tooltip_at(x, y)
	}

	fn teardown(&mut self) {
		self.field.clear();
	}
}

/// Bubbles over a world map. With `animate` off the layout is solved before the
/// first paint of each year, giving a still image.
#[component]
pub fn BubbleMap(
	world: Arc<WorldMap>,
	#[prop(into)] chart_data: Signal<ChartData>,
	#[prop(into)] year: Signal<i32>,
	#[prop(into)] unit: Signal<String>,
	#[prop(default = true)] animate: bool,
) -> impl IntoView {
	let config = use_context::<ChartConfig>().unwrap_or_default();
	let resolver = use_context::<Arc<CountryCodeResolver>>().unwrap_or_default();
	let input = Signal::derive(move || BubbleMapInput {
		chart: chart_data.get(),
		year: year.get(),
		unit: unit.get(),
	});

	view! {
		<div class="chart-host bubble-map">
			{chart_canvas(BubbleMapState::new(world, resolver, &config, animate), input, None)}
		</div>
	}
}
