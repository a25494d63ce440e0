use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, ResizeObserver, Window,
};

use super::{ChartSurface, Size, SurfaceDriver};
use crate::components::tooltip::{Tooltip, TooltipOverlay};

/// Longest step fed to transitions, so a backgrounded tab does not jump.
const MAX_FRAME_DT: f64 = 0.1;

type Shared<S> = Rc<RefCell<SurfaceDriver<S>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Browser resources held by a mounted surface.
struct SurfaceRuntime {
	window: Window,
	frame: FrameCallback,
	frame_handle: Rc<Cell<Option<i32>>>,
	alive: Rc<Cell<bool>>,
	observer: ResizeObserver,
	_on_resize: Closure<dyn FnMut(js_sys::Array, ResizeObserver)>,
	teardown: Box<dyn FnOnce()>,
}

impl SurfaceRuntime {
	fn start<S: ChartSurface>(
		canvas: HtmlCanvasElement,
		driver: Shared<S>,
	) -> Result<Self, JsValue> {
		let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or_else(|| JsValue::from_str("no 2d context"))?
			.dyn_into()?;
		let host = canvas
			.parent_element()
			.ok_or_else(|| JsValue::from_str("canvas is not attached"))?;

		fit_to_host(&canvas, &host, &driver);

		let (canvas_obs, host_obs, driver_obs) = (canvas.clone(), host.clone(), driver.clone());
		let on_resize = Closure::<dyn FnMut(js_sys::Array, ResizeObserver)>::new(
			move |_entries: js_sys::Array, _observer: ResizeObserver| {
				fit_to_host(&canvas_obs, &host_obs, &driver_obs);
			},
		);
		let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref())?;
		observer.observe(&host);

		let alive = Rc::new(Cell::new(true));
		let frame: FrameCallback = Rc::new(RefCell::new(None));
		let frame_handle = Rc::new(Cell::new(None));
		let last_time = Rc::new(Cell::new(None::<f64>));

		let (frame_inner, handle_inner, alive_inner, driver_frame) = (
			frame.clone(),
			frame_handle.clone(),
			alive.clone(),
			driver.clone(),
		);
		*frame.borrow_mut() = Some(Closure::new(move |now: f64| {
			if !alive_inner.get() {
				return;
			}
			let dt = last_time
				.replace(Some(now))
				.map_or(0.0, |prev| ((now - prev) / 1000.0).clamp(0.0, MAX_FRAME_DT));
			let repaint = driver_frame.borrow_mut().frame(dt);
			if repaint {
				driver_frame.borrow().surface().paint(&ctx);
			}
			if let (Some(cb), Some(win)) = (frame_inner.borrow().as_ref(), web_sys::window()) {
				handle_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(cb) = frame.borrow().as_ref() {
			frame_handle.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
		}

		let driver_down = driver.clone();
		Ok(Self {
			window,
			frame,
			frame_handle,
			alive,
			observer,
			_on_resize: on_resize,
			teardown: Box::new(move || driver_down.borrow_mut().teardown()),
		})
	}

	/// Cancels the pending frame and observer before the closures they call are dropped.
	fn stop(self) {
		self.alive.set(false);
		if let Some(handle) = self.frame_handle.take() {
			let _ = self.window.cancel_animation_frame(handle);
		}
		self.observer.disconnect();
		(self.teardown)();
		self.frame.borrow_mut().take();
		debug!("surface stopped");
	}
}

fn fit_to_host<S: ChartSurface>(canvas: &HtmlCanvasElement, host: &Element, driver: &Shared<S>) {
	let size = Size::new(host.client_width() as f64, host.client_height() as f64);
	canvas.set_width(size.width as u32);
	canvas.set_height(size.height as u32);
	driver.borrow_mut().queue_resize(size);
}

/// Hosts `surface` on a canvas that fills its container. Data from `input` is handed
/// to the surface on the next animation frame; clicks on a mark report its code to
/// `on_pick`.
pub fn chart_canvas<S: ChartSurface>(
	surface: S,
	input: Signal<S::Input>,
	on_pick: Option<Callback<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let tooltip = RwSignal::new(None::<Tooltip>);
	let driver: Shared<S> = Rc::new(RefCell::new(SurfaceDriver::new(surface)));
	let runtime = StoredValue::new_local(None::<SurfaceRuntime>);

	let driver_data = driver.clone();
	Effect::new(move |_| {
		let value = input.get();
		driver_data.borrow_mut().queue_input(value);
	});

	let driver_mount = driver.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if runtime.with_value(Option::is_some) {
			return;
		}
		match SurfaceRuntime::start(canvas.into(), driver_mount.clone()) {
			Ok(started) => runtime.set_value(Some(started)),
			Err(err) => error!("chart surface failed to start: {err:?}"),
		}
	});

	on_cleanup(move || {
		if let Some(started) = runtime.try_update_value(Option::take).flatten() {
			started.stop();
		}
	});

	let driver_hover = driver.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let next = driver_hover
			.borrow()
			.hover(ev.offset_x() as f64, ev.offset_y() as f64);
		if tooltip.with_untracked(|current| current != &next) {
			tooltip.set(next);
		}
	};

	let on_mouseleave = move |_: MouseEvent| tooltip.set(None);

	let driver_click = driver;
	let on_click = move |ev: MouseEvent| {
		let picked = driver_click
			.borrow()
			.pick(ev.offset_x() as f64, ev.offset_y() as f64);
		if let (Some(code), Some(on_pick)) = (picked, on_pick) {
			on_pick.run(code);
		}
	};

	view! {
		<div class="chart-surface" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="chart-canvas"
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_click
				style="position: absolute; top: 0; left: 0; display: block;"
			/>
			<TooltipOverlay tooltip=tooltip />
		</div>
	}
}
