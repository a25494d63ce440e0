use web_sys::CanvasRenderingContext2d;

use super::state::{BarState, LABEL_GAP, MARGIN_TOP};
use crate::components::scale::{format_value, truncate_label};

const AXIS_TICKS: usize = 5;
const GRID: &str = "#e5e5e5";
const TEXT: &str = "#333333";

pub fn render(state: &BarState, ctx: &CanvasRenderingContext2d) {
	let layout = &state.layout;
	ctx.clear_rect(0.0, 0.0, layout.width, layout.height);
	ctx.set_font(&format!("{}px sans-serif", layout.font_px));
	draw_axis(state, ctx);
	draw_bars(state, ctx);
}

fn draw_axis(state: &BarState, ctx: &CanvasRenderingContext2d) {
	let layout = &state.layout;
	let x = layout.x_scale(state.domain);
	let bottom = layout.row_y(state.count as f64);

	ctx.set_stroke_style_str(GRID);
	ctx.set_line_width(1.0);
	ctx.set_fill_style_str(TEXT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("bottom");
	for tick in x.ticks(AXIS_TICKS) {
		let px = x.scale(tick).round() + 0.5;
		ctx.begin_path();
		ctx.move_to(px, MARGIN_TOP);
		ctx.line_to(px, bottom);
		ctx.stroke();
		let _ = ctx.fill_text(&format_value(tick, &state.unit), px, MARGIN_TOP - 6.0);
	}
}

fn draw_bars(state: &BarState, ctx: &CanvasRenderingContext2d) {
	let layout = &state.layout;
	let x = layout.x_scale(state.domain);
	let zero = x.scale(0.0);
	let bar_height = (layout.row_height * 0.8).max(1.0);
	let inset = (layout.row_height - bar_height) / 2.0;

	ctx.set_text_baseline("middle");
	for (code, attrs) in state.marks.iter() {
		let top = layout.row_y(attrs.rank) + inset;
		let mid = top + bar_height / 2.0;
		let width = (x.scale(attrs.value) - zero).max(0.0);

		ctx.set_global_alpha(if state.is_dimmed(code) { 0.35 } else { 1.0 });
		ctx.set_fill_style_str(&attrs.color.css());
		ctx.fill_rect(zero, top, width, bar_height);
		if state.selected.as_deref() == Some(code) {
			ctx.set_stroke_style_str(TEXT);
			ctx.set_line_width(2.0);
			ctx.stroke_rect(zero, top, width, bar_height);
		}

		ctx.set_fill_style_str(TEXT);
		if let Some(name) = state.names.get(code) {
			ctx.set_text_align("right");
			let label = truncate_label(name, layout.label_chars);
			let _ = ctx.fill_text(&label, layout.margin_left - LABEL_GAP, mid);
		}
		ctx.set_text_align("left");
		let _ = ctx.fill_text(
			&format_value(attrs.value, &state.unit),
			zero + width + LABEL_GAP,
			mid,
		);
	}
	ctx.set_global_alpha(1.0);
}
