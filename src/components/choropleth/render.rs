use web_sys::CanvasRenderingContext2d;

use super::state::{ChoroplethState, LEGEND_HEIGHT, PADDING, legend_ramp};
use crate::components::color::NO_DATA;
use crate::components::scale::format_value;

const LEGEND_WIDTH: f64 = 200.0;
const LEGEND_STEPS: usize = 40;
const SWATCH: f64 = 10.0;
const TEXT: &str = "#333333";

pub fn render(state: &ChoroplethState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.size.width, state.size.height);
	state
		.frame
		.paint(ctx, |shape| state.fill_of(shape.code.as_deref()).css());
	draw_legend(state, ctx);
}

/// Values from zero to the domain maximum at even spacing, plus the placeholder swatch.
fn draw_legend(state: &ChoroplethState, ctx: &CanvasRenderingContext2d) {
	let top = state.size.height - LEGEND_HEIGHT + PADDING;
	let left = PADDING;
	let step = LEGEND_WIDTH / LEGEND_STEPS as f64;
	for (i, color) in legend_ramp(state.domain, LEGEND_STEPS).iter().enumerate() {
		ctx.set_fill_style_str(&color.css());
		ctx.fill_rect(left + i as f64 * step, top, step + 0.5, SWATCH);
	}

	ctx.set_font("11px sans-serif");
	ctx.set_fill_style_str(TEXT);
	ctx.set_text_baseline("top");
	ctx.set_text_align("left");
	let _ = ctx.fill_text(&format_value(0.0, &state.unit), left, top + SWATCH + 3.0);
	ctx.set_text_align("center");
	let _ = ctx.fill_text(
		&format_value(state.domain / 2.0, &state.unit),
		left + LEGEND_WIDTH / 2.0,
		top + SWATCH + 3.0,
	);
	ctx.set_text_align("right");
	let _ = ctx.fill_text(
		&format_value(state.domain, &state.unit),
		left + LEGEND_WIDTH,
		top + SWATCH + 3.0,
	);

	let no_data_left = left + LEGEND_WIDTH + 24.0;
	ctx.set_fill_style_str(&NO_DATA.css());
	ctx.fill_rect(no_data_left, top, SWATCH, SWATCH);
	ctx.set_fill_style_str(TEXT);
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text("No data", no_data_left + SWATCH + 4.0, top + SWATCH / 2.0);
}
