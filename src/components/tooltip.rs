use leptos::prelude::*;

/// Hover payload: where the pointer is and what to say about the mark under it.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub x: f64,
	pub y: f64,
	pub title: String,
	pub detail: String,
}

impl Tooltip {
	pub fn new(x: f64, y: f64, title: impl Into<String>, detail: impl Into<String>) -> Self {
		Self {
			x,
			y,
			title: title.into(),
			detail: detail.into(),
		}
	}
}

const OFFSET: f64 = 12.0;

/// The single tooltip of a chart surface.
#[component]
pub fn TooltipOverlay(tooltip: RwSignal<Option<Tooltip>>) -> impl IntoView {
	move || {
		tooltip.get().map(|t| {
			view! {
				<div
					class="chart-tooltip"
					style=format!(
						"position: absolute; left: {}px; top: {}px; pointer-events: none;",
						t.x + OFFSET,
						t.y + OFFSET,
					)
				>
					<strong>{t.title}</strong>
					<br />
					<span>{t.detail}</span>
				</div>
			}
		})
	}
}
