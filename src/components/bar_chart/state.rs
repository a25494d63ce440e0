use std::collections::HashMap;

use log::debug;

use crate::components::ChartKind;
use crate::components::color::{Rgb, color_for_rank};
use crate::components::marks::{Lerp, MarkSet};
use crate::components::scale::{LinearScale, domain_max, format_value, max_chars};
use crate::components::surface::Size;
use crate::components::tooltip::Tooltip;
use crate::config::ChartConfig;
use crate::data::ChartData;

/// Everything the bar chart redraws from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BarInput {
	pub chart: ChartData,
	/// Fixed upper bound for the metric, if it has one.
	pub ceiling: Option<f64>,
	pub unit: String,
	pub selected: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarAttrs {
	/// Row position; fractional while a bar slides to a new rank.
	pub rank: f64,
	pub value: f64,
	pub color: Rgb,
}

impl Lerp for BarAttrs {
	fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			rank: self.rank.lerp(&to.rank, t),
			value: self.value.lerp(&to.value, t),
			color: self.color.lerp(&to.color, t),
		}
	}
}

pub const MARGIN_RIGHT: f64 = 56.0;
pub const MARGIN_TOP: f64 = 28.0;
pub const MARGIN_BOTTOM: f64 = 8.0;
pub const LABEL_GAP: f64 = 6.0;
/// Average glyph width relative to the font size.
const CHAR_WIDTH: f64 = 0.6;

/// Size-dependent geometry. Font and left margin both follow the container width,
/// so the label budget is recomputed with them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarLayout {
	pub width: f64,
	pub height: f64,
	pub font_px: f64,
	pub margin_left: f64,
	pub row_height: f64,
	pub label_chars: usize,
}

impl BarLayout {
	pub fn for_size(size: Size, rows: usize) -> Self {
		let font_px = (size.width / 55.0).clamp(10.0, 14.0);
		let margin_left = (size.width * 0.22).clamp(70.0, 180.0);
		let plot_height = (size.height - MARGIN_TOP - MARGIN_BOTTOM).max(0.0);
		Self {
			width: size.width,
			height: size.height,
			font_px,
			margin_left,
			row_height: plot_height / rows.max(1) as f64,
			label_chars: max_chars(margin_left - LABEL_GAP * 2.0, font_px * CHAR_WIDTH),
		}
	}

	pub fn x_scale(&self, max: f64) -> LinearScale {
		let right = (self.width - MARGIN_RIGHT).max(self.margin_left + 1.0);
		LinearScale::new([0.0, max], [self.margin_left, right])
	}

	/// Top edge of the row at `rank`.
	pub fn row_y(&self, rank: f64) -> f64 {
		MARGIN_TOP + rank * self.row_height
	}

	pub fn row_at(&self, y: f64) -> Option<usize> {
		if self.row_height <= 0.0 || y < MARGIN_TOP {
			return None;
		}
		Some(((y - MARGIN_TOP) / self.row_height).floor() as usize)
	}
}

pub struct BarState {
	pub count: usize,
	pub layout: BarLayout,
	pub marks: MarkSet<BarAttrs>,
	/// Codes of the current bars, top first.
	pub rows: Vec<String>,
	pub names: HashMap<String, String>,
	pub domain: f64,
	pub unit: String,
	pub selected: Option<String>,
}

impl BarState {
	pub fn new(config: &ChartConfig) -> Self {
		Self {
			count: config.bar_count.max(1),
			layout: BarLayout::for_size(Size::default(), config.bar_count),
			marks: MarkSet::new(config.transition_ms / 1000.0),
			rows: Vec::new(),
			names: HashMap::new(),
			domain: 1.0,
			unit: String::new(),
			selected: None,
		}
	}

	pub fn resize(&mut self, size: Size) {
		self.layout = BarLayout::for_size(size, self.count);
	}

	pub fn update(&mut self, input: &BarInput) {
		self.domain = domain_max(ChartKind::Bar.domain_policy(), &input.chart, input.ceiling);
		self.unit.clone_from(&input.unit);
		self.selected.clone_from(&input.selected);

		let top = &input.chart.data[..input.chart.data.len().min(self.count)];
		self.names = top
			.iter()
			.map(|d| (d.code.clone(), d.country.clone()))
			.collect();
		self.rows = top.iter().map(|d| d.code.clone()).collect();
		let diff = self.marks.apply(
			top.iter().enumerate().map(|(rank, d)| {
				(
					d.code.clone(),
					BarAttrs {
						rank: rank as f64,
						value: d.value,
						color: color_for_rank(rank),
					},
				)
			}),
			|target| BarAttrs {
				value: 0.0,
				..target.clone()
			},
		);
		debug!(
			"bar chart: {} entered, {} updated, {} exited",
			diff.entered.len(),
			diff.updated,
			diff.exited.len()
		);
	}

	/// Bars and their labels are both hit targets for a whole row.
	pub fn code_at(&self, _x: f64, y: f64) -> Option<&str> {
		self.layout
			.row_at(y)
			.and_then(|row| self.rows.get(row))
			.map(String::as_str)
	}

	pub fn tooltip_at(&self, x: f64, y: f64) -> Option<Tooltip> {
		let code = self.code_at(x, y)?;
		let value = self.marks.target(code)?.value;
		let name = self.names.get(code).map_or(code, String::as_str);
		Some(Tooltip::new(x, y, name, format_value(value, &self.unit)))
	}

	pub fn is_dimmed(&self, code: &str) -> bool {
		self.selected.as_deref().is_some_and(|selected| selected != code)
	}
}
