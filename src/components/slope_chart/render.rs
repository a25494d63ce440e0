use web_sys::CanvasRenderingContext2d;

use super::state::{MARGIN_Y, SlopeState};
use crate::components::scale::{format_value, max_chars, truncate_label};

const AXIS: &str = "#999999";
const TEXT: &str = "#333333";
const FONT_PX: f64 = 11.0;
const LABEL_GAP: f64 = 6.0;

pub fn render(state: &SlopeState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.size.width, state.size.height);
	draw_columns(state, ctx);
	draw_lines(state, ctx);
}

fn draw_columns(state: &SlopeState, ctx: &CanvasRenderingContext2d) {
	let [left, right] = state.columns();
	let bottom = (state.size.height - MARGIN_Y).max(MARGIN_Y);
	ctx.set_stroke_style_str(AXIS);
	ctx.set_line_width(1.0);
	ctx.set_font(&format!("bold {FONT_PX}px sans-serif"));
	ctx.set_fill_style_str(TEXT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("bottom");
	for (x, year) in [(left, state.years[0]), (right, state.years[1])] {
		ctx.begin_path();
		ctx.move_to(x, MARGIN_Y);
		ctx.line_to(x, bottom);
		ctx.stroke();
		let _ = ctx.fill_text(&year.to_string(), x, MARGIN_Y - 8.0);
	}
}

fn draw_lines(state: &SlopeState, ctx: &CanvasRenderingContext2d) {
	let label_chars = max_chars(state.margin_x() - LABEL_GAP * 2.0, FONT_PX * 0.6);
	ctx.set_font(&format!("{FONT_PX}px sans-serif"));
	ctx.set_text_baseline("middle");
	ctx.set_line_width(2.0);
	for (code, attrs) in state.marks.iter() {
		let [a, b] = state.endpoints(&attrs);
		let color = attrs.color.css();
		ctx.set_stroke_style_str(&color);
		ctx.begin_path();
		ctx.move_to(a[0], a[1]);
		ctx.line_to(b[0], b[1]);
		ctx.stroke();

		let name = state.names.get(code).map_or(code, String::as_str);
		ctx.set_fill_style_str(&color);
		ctx.set_text_align("right");
		let left = format!("{} {}", name, format_value(attrs.start, &state.unit));
		let _ = ctx.fill_text(&truncate_label(&left, label_chars), a[0] - LABEL_GAP, a[1]);
		ctx.set_text_align("left");
		let right = format!("{} {}", format_value(attrs.end, &state.unit), name);
		let _ = ctx.fill_text(&truncate_label(&right, label_chars), b[0] + LABEL_GAP, b[1]);
	}
}
