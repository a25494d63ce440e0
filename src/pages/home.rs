use std::sync::Arc;

use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use crate::atlas::WorldMap;
use crate::components::ChartKind;
use crate::components::bar_chart::BarChart;
use crate::components::bubble_chart::BubbleChart;
use crate::components::bubble_map::BubbleMap;
use crate::components::choropleth::Choropleth;
use crate::components::slope_chart::SlopeChart;
use crate::config::{ChartConfig, METRICS, metric};
use crate::data::{
	AnimationChartData, ChartData, CountryCodeResolver, MetricDataset, project, project_animated,
};
use crate::error::ChartError;
use crate::fetch::{load_dataset, load_world};
use crate::playback::YearPlayback;

type Loaded<T> = Option<Result<Arc<T>, ChartError>>;

fn status(text: &'static str) -> AnyView {
	view! { <p class="chart-status">{text}</p> }.into_any()
}

fn failure(err: &ChartError) -> AnyView {
	view! { <p class="chart-error">{err.to_string()}</p> }.into_any()
}

/// Controls plus the active chart.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<ChartConfig>().unwrap_or_default();
	let resolver = use_context::<Arc<CountryCodeResolver>>().unwrap_or_default();

	let metric_id = RwSignal::new(METRICS[0].id.to_owned());
	let chart_kind = RwSignal::new(ChartKind::Bar);
	let only_countries = RwSignal::new(true);
	let playback = RwSignal::new(YearPlayback::new(config.year_min, config.year_max));
	let selected = RwSignal::new(None::<String>);
	let dataset = RwSignal::new(None as Loaded<MetricDataset>);
	let world = RwSignal::new(None as Loaded<WorldMap>);

	Effect::new(move |_| {
		let id = metric_id.get();
		dataset.set(None);
		selected.set(None);
		spawn_local(async move {
			let loaded = load_dataset(&id).await.map(Arc::new);
			// a newer metric may have been picked while this one loaded
			if metric_id.get_untracked() == id {
				dataset.set(Some(loaded));
			}
		});
	});

	let world_requested = StoredValue::new(false);
	Effect::new(move |_| {
		if !chart_kind.get().needs_world() || world_requested.get_value() {
			return;
		}
		world_requested.set_value(true);
		let resolver = resolver.clone();
		spawn_local(async move {
			let loaded = load_world(&resolver).await.map(Arc::new);
			world.set(Some(loaded));
		});
	});

	let year = Signal::derive(move || playback.with(|p| p.year));
	let unit = Signal::derive(move || {
		metric(&metric_id.get())
			.map(|m| m.unit.to_owned())
			.unwrap_or_default()
	});
	let ceiling = Signal::derive(move || metric(&metric_id.get()).and_then(|m| m.ceiling));
	let chart_data = Memo::new(move |_| {
		dataset.with(|loaded| match loaded {
			Some(Ok(ds)) => project(ds, year.get(), only_countries.get()),
			_ => ChartData::default(),
		})
	});
	let history = Memo::new(move |_| {
		dataset.with(|loaded| match loaded {
			Some(Ok(ds)) => project_animated(ds, only_countries.get()),
			_ => AnimationChartData::default(),
		})
	});

	// Dropping the interval cancels it.
	let timer = StoredValue::new_local(None::<Interval>);
	Effect::new(move |_| {
		if !playback.with(|p| p.playing) {
			timer.set_value(None);
		}
	});
	Effect::new(move |_| {
		if !chart_kind.get().uses_year() {
			playback.update(YearPlayback::stop);
		}
	});
	on_cleanup(move || timer.set_value(None));

	let interval_ms = config.playback_interval_ms;
	let toggle_play = move |_| {
		if playback.with_untracked(|p| p.playing) {
			playback.update(YearPlayback::stop);
			return;
		}
		if !chart_kind.get_untracked().uses_year() {
			return;
		}
		playback.update(YearPlayback::start);
		debug!("playback from {}", playback.with_untracked(|p| p.year));
		timer.set_value(Some(Interval::new(interval_ms, move || {
			playback.update(|p| {
				p.tick();
			});
		})));
	};

	let on_select_country = Callback::new(move |code: Option<String>| selected.set(code));

	let chart_view = move || {
		let ds = match dataset.get() {
			None => return status("Loading data…"),
			Some(Err(err)) => return failure(&err),
			Some(Ok(ds)) => ds,
		};
		let kind = chart_kind.get();
		debug!("mounting {} for {}", kind.id(), ds.metric_id);
		match kind {
			ChartKind::Bar => view! {
				<BarChart
					chart_data=chart_data
					unit=unit
					ceiling=ceiling
					selected_country=selected
					on_select_country=on_select_country
					history_by_country=history
				/>
			}
			.into_any(),
			ChartKind::Bubble => {
				view! { <BubbleChart chart_data=chart_data unit=unit /> }.into_any()
			}
			ChartKind::Slope => view! { <SlopeChart history=history unit=unit /> }.into_any(),
			ChartKind::Choropleth | ChartKind::BubbleMap => match world.get() {
				None => status("Loading map…"),
				Some(Err(err)) => failure(&err),
				Some(Ok(world)) if kind == ChartKind::Choropleth => view! {
					<Choropleth
						world=world
						chart_data=chart_data
						year=year
						unit=unit
						ceiling=ceiling
					/>
				}
				.into_any(),
				Some(Ok(world)) => view! {
					<BubbleMap world=world chart_data=chart_data year=year unit=unit />
				}
				.into_any(),
			},
		}
	};

	let (year_min, year_max) = (config.year_min, config.year_max);
	view! {
		<main class="home">
			<header class="controls">
				<select
					prop:value=move || metric_id.get()
					on:change=move |ev| metric_id.set(event_target_value(&ev))
				>
					{METRICS
						.iter()
						.map(|m| view! { <option value=m.id>{m.label}</option> })
						.collect_view()}
				</select>
				<select
					prop:value=move || chart_kind.get().id()
					on:change=move |ev| {
						if let Some(kind) = ChartKind::from_id(&event_target_value(&ev)) {
							chart_kind.set(kind);
						}
					}
				>
					{ChartKind::ALL
						.iter()
						.map(|k| view! { <option value=k.id()>{k.label()}</option> })
						.collect_view()}
				</select>
				<label>
					<input
						type="checkbox"
						prop:checked=move || only_countries.get()
						on:change=move |ev| only_countries.set(event_target_checked(&ev))
					/>
					" Countries only"
				</label>
				<input
					type="range"
					min=year_min
					max=year_max
					prop:value=move || year.get().to_string()
					prop:disabled=move || !chart_kind.get().uses_year()
					on:input=move |ev| {
						if let Ok(y) = event_target_value(&ev).parse::<i32>() {
							playback.update(|p| p.set_year(y));
						}
					}
				/>
				<span class="year">{move || year.get()}</span>
				<button
					prop:disabled=move || !chart_kind.get().uses_year()
					on:click=toggle_play
				>
					{move || if playback.with(|p| p.playing) { "Pause" } else { "Play" }}
				</button>
			</header>
			<section class="chart-area">{chart_view}</section>
		</main>
	}
}
