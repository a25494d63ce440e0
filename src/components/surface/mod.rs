//! The responsive drawing surface every chart is built on.

mod component;

pub use component::chart_canvas;

use log::debug;
use web_sys::CanvasRenderingContext2d;

use super::tooltip::Tooltip;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width: width.max(0.0),
			height: height.max(0.0),
		}
	}
}

/// A chart's retained scene, driven through mount, resize and data phases.
pub trait ChartSurface: 'static {
	type Input: Clone + Send + Sync + 'static;

	/// Builds size-independent structure once, then lays out for `size`.
	fn mount(&mut self, size: Size);

	/// Recomputes size-dependent geometry only.
	fn on_resize(&mut self, size: Size);

	/// Keyed update of the marks for new data.
	fn on_data_change(&mut self, input: &Self::Input);

	/// Advances transitions and simulations; true while anything still moves.
	fn tick(&mut self, dt: f64) -> bool;

	fn paint(&self, ctx: &CanvasRenderingContext2d);

	fn hover(&self, x: f64, y: f64) -> Option<Tooltip>;

	/// Code of the mark under a click, if the chart supports selection.
	fn pick(&self, _x: f64, _y: f64) -> Option<String> {
		None
	}

	fn teardown(&mut self);
}

/// Orders pending work for a surface within one animation frame: resize first,
/// then data, then animation.
pub struct SurfaceDriver<S: ChartSurface> {
	surface: S,
	mounted: bool,
	torn_down: bool,
	dirty: bool,
	pending_size: Option<Size>,
	pending_input: Option<S::Input>,
}

impl<S: ChartSurface> SurfaceDriver<S> {
	pub fn new(surface: S) -> Self {
		Self {
			surface,
			mounted: false,
			torn_down: false,
			dirty: false,
			pending_size: None,
			pending_input: None,
		}
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	pub fn queue_resize(&mut self, size: Size) {
		self.pending_size = Some(size);
	}

	/// Only the latest input matters; older queued inputs are replaced.
	pub fn queue_input(&mut self, input: S::Input) {
		self.pending_input = Some(input);
	}

	/// Runs one frame and reports whether the canvas needs repainting.
	pub fn frame(&mut self, dt: f64) -> bool {
		if self.torn_down {
			return false;
		}
		if let Some(size) = self.pending_size.take() {
			if self.mounted {
				debug!("surface resize {}x{}", size.width, size.height);
				self.surface.on_resize(size);
			} else {
				debug!("surface mount {}x{}", size.width, size.height);
				self.surface.mount(size);
				self.mounted = true;
			}
			self.dirty = true;
		}
		if !self.mounted {
			return false;
		}
		if let Some(input) = self.pending_input.take() {
			self.surface.on_data_change(&input);
			self.dirty = true;
		}
		let animating = self.surface.tick(dt);
		let paint = self.dirty || animating;
		self.dirty = false;
		paint
	}

	pub fn hover(&self, x: f64, y: f64) -> Option<Tooltip> {
		if !self.mounted {
			return None;
		}
		self.surface.hover(x, y)
	}

	pub fn pick(&self, x: f64, y: f64) -> Option<String> {
		if !self.mounted {
			return None;
		}
		self.surface.pick(x, y)
	}

	pub fn teardown(&mut self) {
		if !self.torn_down {
			self.surface.teardown();
			self.torn_down = true;
			self.pending_input = None;
			self.pending_size = None;
		}
	}
}
