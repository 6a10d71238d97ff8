use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::NetworkState;
use super::types::GraphData;

/// Longest frame the simulation is advanced by; a backgrounded tab would
/// otherwise come back with one huge step.
const MAX_FRAME_DT: f64 = 0.05;

/// The recurring `requestAnimationFrame` callback and its pending request.
///
/// Cancelling drops the callback, so no tick can run against a torn-down view.
#[derive(Default)]
struct FrameLoop {
	frame_id: Cell<Option<i32>>,
	last_ts: Cell<Option<f64>>,
	callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameLoop {
	fn schedule(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *self.callback.borrow() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => self.frame_id.set(Some(id)),
				Err(err) => warn!("requestAnimationFrame failed: {err:?}"),
			}
		}
	}

	fn cancel(&self) {
		if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		self.last_ts.set(None);
		self.callback.borrow_mut().take();
	}
}

/// Canvas view of the entity network: nodes coloured by kind, edges weighted
/// by connection strength. Drag to pan, scroll to zoom, click a node to select it.
#[component]
pub fn EntityNetwork(
	/// Network to lay out; a new value restarts the simulation.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Canvas width in pixels.
	#[prop(default = 800.0)]
	width: f64,
	/// Canvas height in pixels.
	#[prop(default = 400.0)]
	height: f64,
	/// Called with the id of a clicked node.
	#[prop(optional)]
	on_select: Option<Callback<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<NetworkState>>> = Rc::new(RefCell::new(None));
	let frames: Rc<FrameLoop> = Rc::new(FrameLoop::default());

	let (state_init, frames_init) = (state.clone(), frames.clone());
	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		// A new payload starts a new session from freshly seeded positions.
		frames_init.cancel();
		if let Some(ref mut old) = *state_init.borrow_mut() {
			old.stop();
		}

		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("canvas context is not 2d; network view disabled");
					return;
				}
			},
			_ => {
				warn!("no 2d canvas context; network view disabled");
				return;
			}
		};
		*state_init.borrow_mut() = Some(NetworkState::new(&graph, width, height));

		let (state_anim, frames_anim) = (state_init.clone(), Rc::downgrade(&frames_init));
		*frames_init.callback.borrow_mut() = Some(Closure::new(move |ts: f64| {
			let Some(frames) = frames_anim.upgrade() else {
				return;
			};
			let dt = frames
				.last_ts
				.replace(Some(ts))
				.map_or(0.0, |last| ((ts - last) / 1000.0).clamp(0.0, MAX_FRAME_DT));

			let running = match *state_anim.borrow_mut() {
				Some(ref mut s) => {
					let running = s.tick(dt);
					render::render(s, &ctx);
					running
				}
				None => false,
			};
			if running {
				frames.schedule();
			} else {
				frames.frame_id.set(None);
			}
		}));
		frames_init.schedule();
	});

	let (state_cleanup, frames_cleanup) = (
		SendWrapper::new(state.clone()),
		SendWrapper::new(frames.clone()),
	);
	on_cleanup(move || {
		frames_cleanup.cancel();
		if let Some(ref mut s) = *state_cleanup.borrow_mut() {
			s.stop();
		}
		debug!("entity network unmounted");
	});

	let pointer = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev) else { return };
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.start_pan(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev) else { return };
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.pan_to(x, y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev) else { return };
		let selected = match *state_mu.borrow_mut() {
			// A drag that moved is a pan, not a click.
			Some(ref mut s) if s.pan.active => {
				let panned = s.end_pan();
				if panned {
					None
				} else {
					s.layout.hit_test(&s.transform, x, y).map(str::to_owned)
				}
			}
			_ => None,
		};
		if let (Some(id), Some(cb)) = (selected, on_select) {
			cb.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_pan();
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(&*ev) else { return };
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	let state_zoom_in = state.clone();
	let state_zoom_out = state.clone();
	let state_reset = state.clone();
	let (cx, cy) = (width / 2.0, height / 2.0);

	view! {
		<div class="entity-network">
			<div class="entity-network-toolbar">
				<button on:click=move |_| {
					if let Some(ref mut s) = *state_zoom_in.borrow_mut() {
						s.zoom_at(cx, cy, 1.1);
					}
				}>"+"</button>
				<button on:click=move |_| {
					if let Some(ref mut s) = *state_zoom_out.borrow_mut() {
						s.zoom_at(cx, cy, 0.9);
					}
				}>"−"</button>
				<button on:click=move |_| {
					if let Some(ref mut s) = *state_reset.borrow_mut() {
						s.reset_view();
					}
				}>"Reset"</button>
			</div>
			<canvas
				node_ref=canvas_ref
				class="entity-network-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
		</div>
	}
}
