use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{HOVER_RADIUS, NODE_RADIUS, NetworkState};

/// Connections weaker than this are drawn dashed.
const WEAK_EDGE: f64 = 0.25;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#0f172a");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let nodes = state.layout.nodes();
	let t = ease_out_cubic(state.hover.highlight_t);
	let dashed = js_sys::Array::of2(&JsValue::from_f64(4.0 / k), &JsValue::from_f64(4.0 / k));
	let solid = js_sys::Array::new();

	for edge in state.layout.edges() {
		let (a, b) = (&nodes[edge.source], &nodes[edge.target]);
		let lit = state.is_highlighted(edge.source) && state.is_highlighted(edge.target);

		// Alpha and width follow strength; a hover brightens its own edges and
		// fades the rest.
		let base_alpha = edge.strength * 0.5;
		let alpha = if lit {
			base_alpha + (1.0 - base_alpha) * 0.6 * t
		} else {
			base_alpha * (1.0 - 0.7 * t)
		};

		ctx.set_stroke_style_str(&format!("rgba(100, 116, 139, {alpha})"));
		ctx.set_line_width((edge.strength * 3.0).max(0.5 / k));
		let _ = ctx.set_line_dash(if edge.strength < WEAK_EDGE { &dashed } else { &solid });
		ctx.begin_path();
		ctx.move_to(a.position.x, a.position.y);
		ctx.line_to(b.position.x, b.position.y);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&solid);
}

fn draw_nodes(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	for (idx, node) in state.layout.nodes().iter().enumerate() {
		let (x, y) = (node.position.x, node.position.y);
		let hovered = state.is_hovered(idx);
		let lit = state.is_highlighted(idx);

		let radius = if hovered {
			NODE_RADIUS + (HOVER_RADIUS - NODE_RADIUS) * t
		} else {
			NODE_RADIUS
		};
		let alpha = if has_highlight && !lit { 1.0 - 0.6 * t } else { 1.0 };

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.kind.color());
		ctx.fill();

		if hovered {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
		ctx.set_global_alpha(1.0);

		// Labels only for the hovered node and its neighbours.
		if lit {
			ctx.set_fill_style_str("#ffffff");
			ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
			ctx.set_text_align("center");
			let _ = ctx.fill_text(&node.label, x, y + radius + 12.0 / k.max(0.5));
		}
	}
}
